use crate::db::DbResult;
use crate::db::error::DbError;
use crate::db::repo::AccountRepo;
use crate::error::DomainError;
use crate::models::account::{NewAccount, validate_email, validate_username};
use crate::models::auth::{
    AuthField, AuthResult, EMAIL_IN_USE, INTERNAL_ERROR, INVALID_PASSWORD, INVALID_USERNAME, USERNAME_IN_USE,
};
use crate::services::CredentialHasher;
use std::sync::Arc;

/// Signup and login. Neither operation returns an error: every outcome, including store
/// failures, is folded into the returned `AuthResult`.
pub struct AuthService {
    repo: Arc<dyn AccountRepo>,
    hasher: CredentialHasher,
}

impl AuthService {
    pub fn new(repo: Arc<dyn AccountRepo>, hasher: CredentialHasher) -> Self {
        Self { repo, hasher }
    }

    pub async fn create_account(&self, username: &str, email: &str, password: &str) -> AuthResult {
        let mut result = AuthResult::signup();

        // Only username and email exist in the signup result; the password is accepted as given.
        for check in [validate_username(username), validate_email(email)] {
            if let Err(DomainError::Validation { field, message }) = check {
                let field = AuthField::from_name(field).unwrap_or(AuthField::Username);
                result.reject(field, message);
            }
        }
        if result.is_rejected() {
            tracing::debug!(%username, "signup rejected: invalid input");
            return result;
        }

        if let Err(e) = self.try_create(username, email, password, &mut result).await {
            tracing::error!(error = %e, %username, "signup failed");
            result.fail(INTERNAL_ERROR);
        }

        result
    }

    async fn try_create(&self, username: &str, email: &str, password: &str, result: &mut AuthResult) -> DbResult<()> {
        if self.repo.exists_by_username(username).await? {
            result.reject(AuthField::Username, USERNAME_IN_USE);
        }
        if self.repo.exists_by_email(email).await? {
            result.reject(AuthField::Email, EMAIL_IN_USE);
        }
        if result.is_rejected() {
            tracing::debug!(%username, "signup rejected: username or email in use");
            return Ok(());
        }

        let salt = CredentialHasher::generate_salt();
        let account = NewAccount {
            username: username.to_string(),
            email: email.to_string(),
            password: self.hasher.hash(password, &salt),
            salt,
        };

        match self.repo.insert_account(&account).await {
            Ok(id) => {
                tracing::info!(account_id = id, %username, "account created");
                Ok(())
            }
            // Lost a race against a concurrent signup between the existence checks and the insert.
            Err(DbError::UniqueViolation(field)) => {
                match AuthField::from_name(&field) {
                    Some(AuthField::Email) => result.reject(AuthField::Email, EMAIL_IN_USE),
                    _ => result.reject(AuthField::Username, USERNAME_IN_USE),
                }
                tracing::debug!(%username, %field, "signup rejected at insert");
                Ok(())
            }
            Err(e) => Err(e),
        }
    }

    pub async fn valid_login(&self, username: &str, password: &str) -> AuthResult {
        let mut result = AuthResult::login();

        if validate_username(username).is_err() {
            result.reject(AuthField::Username, INVALID_USERNAME);
            return result;
        }

        match self.repo.find_credentials(username).await {
            Ok(None) => {
                tracing::warn!(%username, "login failed: unknown username");
                result.reject(AuthField::Username, INVALID_USERNAME);
            }
            Ok(Some(creds)) => {
                if !self.hasher.verify(password, &creds.salt, &creds.password) {
                    tracing::warn!(%username, "login failed: invalid password");
                    result.reject(AuthField::Password, INVALID_PASSWORD);
                }
            }
            Err(e) => {
                tracing::error!(error = %e, %username, "login failed");
                result.fail(INTERNAL_ERROR);
            }
        }

        result
    }
}
