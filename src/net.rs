use crate::Registry;
use std::sync::Arc;

pub mod gateway;
pub mod http;
pub mod protocol;

#[derive(Clone)]
pub struct AppCtx {
    pub registry: Arc<Registry>,
}
