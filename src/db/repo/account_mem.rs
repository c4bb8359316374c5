use crate::db::error::DbError;
use crate::db::repo::account::AccountRepo;
use crate::db::DbResult;
use crate::models::account::{Credentials, NewAccount};
use parking_lot::Mutex;
use std::collections::HashMap;

/// Process-local account store. Data is lost when the process exits.
#[derive(Default)]
pub struct MemoryAccountRepository {
    inner: Mutex<Inner>,
}

#[derive(Default)]
struct Inner {
    by_username: HashMap<String, (i64, Credentials)>,
    emails: HashMap<String, i64>,
    next_id: i64,
}

impl MemoryAccountRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.inner.lock().by_username.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait::async_trait]
impl AccountRepo for MemoryAccountRepository {
    async fn exists_by_username(&self, username: &str) -> DbResult<bool> {
        Ok(self.inner.lock().by_username.contains_key(username))
    }

    async fn exists_by_email(&self, email: &str) -> DbResult<bool> {
        Ok(self.inner.lock().emails.contains_key(email))
    }

    async fn find_credentials(&self, username: &str) -> DbResult<Option<Credentials>> {
        Ok(self.inner.lock().by_username.get(username).map(|(_, c)| c.clone()))
    }

    async fn insert_account(&self, account: &NewAccount) -> DbResult<i64> {
        let mut g = self.inner.lock();

        if g.by_username.contains_key(&account.username) {
            return Err(DbError::UniqueViolation("username".into()));
        }
        if g.emails.contains_key(&account.email) {
            return Err(DbError::UniqueViolation("email".into()));
        }

        g.next_id += 1;
        let id = g.next_id;
        g.emails.insert(account.email.clone(), id);
        g.by_username.insert(
            account.username.clone(),
            (
                id,
                Credentials {
                    password: account.password.clone(),
                    salt: account.salt.clone(),
                },
            ),
        );

        Ok(id)
    }
}
