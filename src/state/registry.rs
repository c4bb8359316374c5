use crate::config::Config;
use crate::db::repo::AccountRepo;
use crate::error::InfraError;
use crate::services::{AuthService, CredentialHasher};
use std::sync::Arc;

pub struct Services {
    pub auth: Arc<AuthService>,
}

/// Everything a connection handler needs, built once at startup and shared read-only.
pub struct Registry {
    pub services: Arc<Services>,
    pub config: Arc<Config>,
}

impl Registry {
    pub fn new(account_repo: Arc<dyn AccountRepo>, config: Arc<Config>) -> Result<Self, InfraError> {
        let hasher = CredentialHasher::new(config.hash_key.as_bytes())?;
        let services = Arc::new(Services {
            auth: Arc::new(AuthService::new(account_repo, hasher)),
        });

        Ok(Self { services, config })
    }
}
