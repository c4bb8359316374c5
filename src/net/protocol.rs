//! JSON frames exchanged over the `/ws` socket.
//!
//! Inbound: `{"event": "signup"|"login", "ack": 7, "data": {...}}`.
//! Outbound: `{"ack": 7, "data": <AuthResult>}` or `{"ack": 7, "error": "..."}`.

use crate::models::auth::AuthResult;
use serde::{Deserialize, Serialize};

pub const EVENT_SIGNUP: &str = "signup";
pub const EVENT_LOGIN: &str = "login";

#[derive(Debug, Deserialize)]
pub struct Inbound {
    pub event: String,
    #[serde(default)]
    pub ack: Option<u64>,
    #[serde(default)]
    pub data: serde_json::Value,
}

#[derive(Deserialize)]
pub struct SignupRequest {
    pub username: String,
    pub password: String,
    pub email: String,
}

#[derive(Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reply {
    pub ack: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<AuthResult>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Reply {
    pub fn result(ack: Option<u64>, result: AuthResult) -> Self {
        Self {
            ack,
            data: Some(result),
            error: None,
        }
    }

    pub fn error(ack: Option<u64>, message: impl Into<String>) -> Self {
        Self {
            ack,
            data: None,
            error: Some(message.into()),
        }
    }
}
