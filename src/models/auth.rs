use serde::{Deserialize, Serialize};

pub const USERNAME_IN_USE: &str = "This username is in use";
pub const EMAIL_IN_USE: &str = "This email is in use";
pub const INVALID_USERNAME: &str = "Invalid username";
pub const INVALID_PASSWORD: &str = "Invalid password";
pub const INTERNAL_ERROR: &str = "Internal server error";

/// Fields that can be individually accepted or rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthField {
    Username,
    Email,
    Password,
}

impl AuthField {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "username" => Some(AuthField::Username),
            "email" => Some(AuthField::Email),
            "password" => Some(AuthField::Password),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldStatus {
    pub ok: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl FieldStatus {
    pub fn valid() -> Self {
        Self { ok: true, message: None }
    }

    pub fn invalid(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            message: Some(message.into()),
        }
    }
}

impl Default for FieldStatus {
    fn default() -> Self {
        Self::valid()
    }
}

/// Outcome of a signup or login attempt. Always returned, never raised.
///
/// `email` is only present for signups and `password` only for logins. `error` marks an
/// infrastructure failure and takes precedence over the field flags: when it is set the
/// flags only reflect what was determined before the failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthResult {
    pub username: FieldStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<FieldStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<FieldStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl AuthResult {
    pub fn signup() -> Self {
        Self {
            username: FieldStatus::valid(),
            email: Some(FieldStatus::valid()),
            password: None,
            error: None,
        }
    }

    pub fn login() -> Self {
        Self {
            username: FieldStatus::valid(),
            email: None,
            password: Some(FieldStatus::valid()),
            error: None,
        }
    }

    pub fn reject(&mut self, field: AuthField, message: impl Into<String>) {
        let status = FieldStatus::invalid(message);
        match field {
            AuthField::Username => self.username = status,
            AuthField::Email => self.email = Some(status),
            AuthField::Password => self.password = Some(status),
        }
    }

    pub fn fail(&mut self, message: impl Into<String>) {
        self.error = Some(message.into());
    }

    pub fn is_rejected(&self) -> bool {
        !self.username.ok
            || self.email.as_ref().is_some_and(|s| !s.ok)
            || self.password.as_ref().is_some_and(|s| !s.ok)
    }

    pub fn is_failed(&self) -> bool {
        self.error.is_some()
    }

    pub fn is_ok(&self) -> bool {
        !self.is_failed() && !self.is_rejected()
    }
}
