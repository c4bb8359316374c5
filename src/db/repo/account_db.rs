use crate::db::error::DbError;
use crate::db::repo::account::AccountRepo;
use crate::db::{Db, DbResult, map_row_opt};
use crate::models::account::{Credentials, NewAccount};
use std::sync::Arc;

const EMAIL_CONSTRAINT: &str = "accounts_email_key";
const USERNAME_CONSTRAINT: &str = "accounts_username_key";

pub struct AccountRepository {
    db: Arc<Db>,
}

impl AccountRepository {
    pub fn new(db: Arc<Db>) -> Self {
        Self { db }
    }

    async fn exists(&self, sql: &str, value: &str, ctx: &str) -> DbResult<bool> {
        self.db
            .timed(ctx, async {
                let client = self.db.get_client().await?;
                let stmt = client.prepare_cached(sql).await?;

                let row = client.query_one(&stmt, &[&value]).await?;
                Ok::<_, DbError>(row.try_get::<_, bool>(0)?)
            })
            .await
    }
}

#[async_trait::async_trait]
impl AccountRepo for AccountRepository {
    async fn exists_by_username(&self, username: &str) -> DbResult<bool> {
        self.exists(
            "SELECT EXISTS (SELECT 1 FROM accounts WHERE username = $1)",
            username,
            "AccountRepo::exists_by_username",
        )
        .await
    }

    async fn exists_by_email(&self, email: &str) -> DbResult<bool> {
        self.exists(
            "SELECT EXISTS (SELECT 1 FROM accounts WHERE email = $1)",
            email,
            "AccountRepo::exists_by_email",
        )
        .await
    }

    async fn find_credentials(&self, username: &str) -> DbResult<Option<Credentials>> {
        self.db
            .timed("AccountRepo::find_credentials", async {
                let client = self.db.get_client().await?;

                let stmt = client
                    .prepare_cached("SELECT password, salt FROM accounts WHERE username = $1")
                    .await?;

                let row_opt = client.query_opt(&stmt, &[&username]).await?;
                map_row_opt(
                    row_opt,
                    Credentials::try_from_row,
                    &format!("AccountRepo::find_credentials username={}", username),
                )
            })
            .await
    }

    async fn insert_account(&self, account: &NewAccount) -> DbResult<i64> {
        self.db
            .timed("AccountRepo::insert_account", async {
                let client = self.db.get_client().await?;

                let stmt = client
                    .prepare_cached(
                        r#"
                        INSERT INTO accounts (username, email, password, salt)
                        VALUES ($1, $2, $3, $4)
                        RETURNING id
                        "#,
                    )
                    .await?;

                let row = client
                    .query_one(
                        &stmt,
                        &[&account.username, &account.email, &account.password, &account.salt],
                    )
                    .await
                    .map_err(|e| match DbError::from(e) {
                        DbError::UniqueViolation(c) => DbError::UniqueViolation(unique_field(&c).to_string()),
                        other => other,
                    })?;

                Ok::<_, DbError>(row.try_get::<_, i64>("id")?)
            })
            .await
    }
}

fn unique_field(constraint: &str) -> &'static str {
    match constraint {
        EMAIL_CONSTRAINT => "email",
        USERNAME_CONSTRAINT => "username",
        other => {
            tracing::warn!(constraint = %other, "unexpected unique constraint on accounts");
            "username"
        }
    }
}
