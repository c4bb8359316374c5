use crate::db::DbResult;
use crate::models::account::{Credentials, NewAccount};

/// Storage for accounts. Every method runs a single statement.
///
/// `insert_account` must enforce uniqueness of `username` and `email` itself and report a
/// clash as `DbError::UniqueViolation` carrying `"username"` or `"email"`.
#[async_trait::async_trait]
pub trait AccountRepo: Send + Sync {
    async fn exists_by_username(&self, username: &str) -> DbResult<bool>;
    async fn exists_by_email(&self, email: &str) -> DbResult<bool>;
    async fn find_credentials(&self, username: &str) -> DbResult<Option<Credentials>>;
    /// Returns the id of the new account.
    async fn insert_account(&self, account: &NewAccount) -> DbResult<i64>;
}
