use super::{Db, DbResult};
use deadpool_postgres::{Manager, ManagerConfig, Pool, RecyclingMethod, Runtime};
use std::str::FromStr;
use std::time::Duration;
use tokio_postgres::NoTls;

impl Db {
    /// Builds the connection pool. No connection is opened until the first query.
    pub fn new(url: &str, max_size: usize, op_timeout: Duration) -> DbResult<Self> {
        let cfg = tokio_postgres::Config::from_str(url)?;

        let mgr = Manager::from_config(
            cfg,
            NoTls,
            ManagerConfig {
                recycling_method: RecyclingMethod::Fast,
            },
        );

        let pool = Pool::builder(mgr)
            .max_size(max_size)
            .wait_timeout(Some(op_timeout))
            .create_timeout(Some(op_timeout))
            .runtime(Runtime::Tokio1)
            .build()?;

        Ok(Self { pool, op_timeout })
    }
}
