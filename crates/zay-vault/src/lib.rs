//! Encrypted on-device vault for one-time profile-access tokens
//!
//! Tokens issued here back `zay://profile/<user>?token=...` links that are
//! generated and consumed on the same device. The vault enforces single use
//! and a 24-hour expiry; the backing store is abstracted so production uses
//! the OS keychain while tests use an in-memory map.

mod keyring_store;
mod store;
mod vault;

pub use keyring_store::KeyringStore;
pub use store::{MemoryStore, SecureKeyValueStore};
pub use vault::{LocalTokenVault, TOKEN_LENGTH, TOKEN_TTL_HOURS};
