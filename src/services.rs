mod auth;
mod hasher;

pub use auth::AuthService;
pub use hasher::CredentialHasher;
