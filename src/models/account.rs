use crate::db::DbResult;
use crate::error::{AppResult, DomainError};
use once_cell::sync::Lazy;
use regex::Regex;
use tokio_postgres::Row;

/// Longest username accepted at signup.
pub const MAX_USERNAME_LEN: usize = 32;

static EMAIL_RE: Lazy<Option<Regex>> = Lazy::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").ok());

/// An account as it is about to be inserted. `password` already holds the keyed hash.
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub username: String,
    pub email: String,
    pub password: String,
    pub salt: String,
}

/// The stored secrets needed to verify a login.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub password: String,
    pub salt: String,
}

impl Credentials {
    pub fn try_from_row(row: &Row) -> DbResult<Self> {
        Ok(Self {
            password: row.try_get("password")?,
            salt: row.try_get("salt")?,
        })
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Credentials { .. }")
    }
}

pub fn validate_username(s: &str) -> AppResult<()> {
    if s.trim().is_empty() {
        return Err(DomainError::Validation {
            field: "username",
            message: "Username cannot be empty".into(),
        });
    }
    if s.len() > MAX_USERNAME_LEN {
        return Err(DomainError::Validation {
            field: "username",
            message: format!("Username must be at most {MAX_USERNAME_LEN} characters"),
        });
    }
    if !s.chars().all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_')) {
        return Err(DomainError::Validation {
            field: "username",
            message: "Username may only contain letters, digits, hyphens and underscores".into(),
        });
    }
    Ok(())
}

pub fn validate_email(s: &str) -> AppResult<()> {
    let valid = EMAIL_RE.as_ref().is_some_and(|re| re.is_match(s));
    if !valid {
        return Err(DomainError::Validation {
            field: "email",
            message: "This is not a valid email address".into(),
        });
    }
    Ok(())
}
