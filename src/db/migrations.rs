mod embedded {
    use refinery::embed_migrations;
    embed_migrations!("migrations");
}

use super::{Db, DbResult};

impl Db {
    /// Creates the `accounts` table and its unique constraints (idempotent).
    pub async fn init(&self) -> DbResult<()> {
        let mut client = self.get_client().await?;
        let report = embedded::migrations::runner().run_async(&mut **client).await?;

        for m in report.applied_migrations() {
            tracing::info!(migration = %m, "applied schema migration");
        }

        Ok(())
    }
}
