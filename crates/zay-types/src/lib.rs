//! Shared types and error types for the Zay credential core

pub mod errors;
pub mod models;

pub use errors::{AuthError, AuthResult};
pub use models::{AccessToken, BearerToken, LoginLink, TrustedDevice};
