use crate::db::error::DbError;
use deadpool_postgres::{Pool, PoolError};
use std::future::Future;
use std::time::Duration;
use tokio_postgres::Row;

mod migrations;
mod pool;

pub mod error;
pub mod repo;

pub type DbResult<T> = Result<T, DbError>;

#[derive(Clone, Debug)]
pub struct Db {
    pub(crate) pool: Pool,
    op_timeout: Duration,
}

impl Db {
    pub async fn get_client(&self) -> DbResult<deadpool_postgres::Client> {
        self.pool.get().await.map_err(|e| match e {
            PoolError::Timeout(_) => DbError::Timeout,
            e => DbError::Pool(e),
        })
    }

    /// Runs a single store operation, failing with `DbError::Timeout` when it takes longer
    /// than the configured operation timeout.
    pub async fn timed<T, F>(&self, ctx: &str, fut: F) -> DbResult<T>
    where
        F: Future<Output = DbResult<T>>,
    {
        match tokio::time::timeout(self.op_timeout, fut).await {
            Ok(res) => res,
            Err(_) => {
                tracing::warn!(context = %ctx, timeout_ms = self.op_timeout.as_millis() as u64, "store operation timed out");
                Err(DbError::Timeout)
            }
        }
    }
}

pub fn map_row_opt<T, F>(row_opt: Option<Row>, f: F, ctx: &str) -> DbResult<Option<T>>
where
    F: FnOnce(&Row) -> DbResult<T>,
{
    match row_opt {
        Some(row) => match f(&row) {
            Ok(v) => Ok(Some(v)),
            Err(e) => {
                tracing::error!(error = %e, context = %ctx, "row mapping failed");
                Err(e)
            }
        },
        None => Ok(None),
    }
}
