//! Secure key/value storage abstraction
//!
//! The vault never talks to a platform store directly; everything goes
//! through [`SecureKeyValueStore`] so the encrypted backend can be swapped
//! (OS keychain in production, in-memory map in tests).

use parking_lot::RwLock;
use std::collections::HashMap;
use zay_types::AuthResult;

/// At-rest-encrypted key/value store for small secrets.
///
/// Implementations must be safe to call from multiple tasks; the vault adds
/// its own serialization around read-modify-write sequences.
pub trait SecureKeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> AuthResult<Option<String>>;

    fn set(&self, key: &str, value: &str) -> AuthResult<()>;

    /// Deleting a missing key is a no-op, not an error.
    fn delete(&self, key: &str) -> AuthResult<()>;

    /// All keys currently present, in no particular order.
    fn keys(&self) -> AuthResult<Vec<String>>;
}

/// In-memory store for tests and for hosts without a usable keychain.
#[derive(Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SecureKeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> AuthResult<Option<String>> {
        Ok(self.entries.read().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> AuthResult<()> {
        self.entries
            .write()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn delete(&self, key: &str) -> AuthResult<()> {
        self.entries.write().remove(key);
        Ok(())
    }

    fn keys(&self) -> AuthResult<Vec<String>> {
        Ok(self.entries.read().keys().cloned().collect())
    }
}
