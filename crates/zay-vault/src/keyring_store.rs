//! OS keychain implementation of the secure store
//!
//! Each vault key becomes a keychain entry under a fixed service name. The
//! platform keychain cannot enumerate entries, so an index entry tracks the
//! set of live keys; index updates happen under a lock so concurrent set and
//! delete calls do not lose entries.

use keyring::Entry;
use parking_lot::Mutex;
use tracing::warn;
use zay_types::{AuthError, AuthResult};

use crate::store::SecureKeyValueStore;

/// Keychain entry name holding the JSON list of live keys
const INDEX_KEY: &str = "__key_index";

pub struct KeyringStore {
    service: String,
    index_lock: Mutex<()>,
}

impl KeyringStore {
    /// `service` namespaces this store's entries in the OS keychain,
    /// e.g. "zay-link-security".
    pub fn new(service: impl Into<String>) -> Self {
        Self {
            service: service.into(),
            index_lock: Mutex::new(()),
        }
    }

    fn entry(&self, key: &str) -> AuthResult<Entry> {
        Entry::new(&self.service, key)
            .map_err(|e| AuthError::StorageUnavailable(e.to_string()))
    }

    fn read_index(&self) -> AuthResult<Vec<String>> {
        match self.entry(INDEX_KEY)?.get_password() {
            Ok(raw) => Ok(serde_json::from_str(&raw)?),
            Err(keyring::Error::NoEntry) => Ok(Vec::new()),
            Err(e) => Err(AuthError::StorageUnavailable(e.to_string())),
        }
    }

    fn write_index(&self, keys: &[String]) -> AuthResult<()> {
        self.entry(INDEX_KEY)?
            .set_password(&serde_json::to_string(keys)?)
            .map_err(|e| AuthError::StorageUnavailable(e.to_string()))
    }
}

impl SecureKeyValueStore for KeyringStore {
    fn get(&self, key: &str) -> AuthResult<Option<String>> {
        match self.entry(key)?.get_password() {
            Ok(value) => Ok(Some(value)),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(e) => Err(AuthError::StorageUnavailable(e.to_string())),
        }
    }

    fn set(&self, key: &str, value: &str) -> AuthResult<()> {
        self.entry(key)?
            .set_password(value)
            .map_err(|e| AuthError::StorageUnavailable(e.to_string()))?;

        let _guard = self.index_lock.lock();
        let mut index = self.read_index()?;
        if !index.iter().any(|k| k == key) {
            index.push(key.to_string());
            self.write_index(&index)?;
        }
        Ok(())
    }

    fn delete(&self, key: &str) -> AuthResult<()> {
        match self.entry(key)?.delete_credential() {
            Ok(()) | Err(keyring::Error::NoEntry) => {}
            Err(e) => return Err(AuthError::StorageUnavailable(e.to_string())),
        }

        let _guard = self.index_lock.lock();
        let mut index = self.read_index()?;
        let before = index.len();
        index.retain(|k| k != key);
        if index.len() != before {
            if let Err(e) = self.write_index(&index) {
                // The entry itself is gone; a stale index reference is
                // cleaned up on the next keys() consumer pass.
                warn!("Failed to update keychain index after delete: {}", e);
            }
        }
        Ok(())
    }

    fn keys(&self) -> AuthResult<Vec<String>> {
        let _guard = self.index_lock.lock();
        self.read_index()
    }
}
