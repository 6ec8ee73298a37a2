//! OAuth 2.0 authorization-code flow with PKCE (S256)
//!
//! Drives provider sign-in (Snapchat, Instagram) as a trust-establishing
//! path: generate PKCE parameters, send the user to the authorization
//! endpoint, validate the redirect callback (CSRF state first), then
//! exchange the code for a bearer token.

mod config;
mod flow;
mod pkce;
mod token_exchange;

pub use config::ProviderConfig;
pub use flow::{AuthorizationRequest, AuthorizedCode, FlowPhase, PkceFlow};
pub use pkce::PkceSession;
pub use token_exchange::TokenExchanger;
