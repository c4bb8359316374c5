pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod net;
pub mod services;
pub mod state;

// Convenient re-exports (so call sites can do `hometown::Registry`, etc.)
pub use services::{AuthService, CredentialHasher};
pub use state::registry::Registry;
