//! One-time profile-access token vault

use chrono::{Duration, Utc};
use parking_lot::Mutex;
use std::sync::Arc;
use tracing::{debug, info, warn};
use zay_types::{AccessToken, AuthError, AuthResult};
use zay_utils::{random_token, TOKEN_ALPHABET};

use crate::store::SecureKeyValueStore;

/// Tokens live this long after issuance
pub const TOKEN_TTL_HOURS: i64 = 24;

pub const TOKEN_LENGTH: usize = 32;

/// Storage key prefix; the rest of the key is the token value itself
const TOKEN_KEY_PREFIX: &str = "token_";

pub struct LocalTokenVault {
    store: Arc<dyn SecureKeyValueStore>,

    // Serializes the check-and-mark step in validate_and_consume so two
    // concurrent calls with the same token cannot both read `consumed ==
    // false`. A single lock is adequate at this call volume.
    consume_lock: Mutex<()>,
}

fn storage_key(token: &str) -> String {
    format!("{}{}", TOKEN_KEY_PREFIX, token)
}

impl LocalTokenVault {
    pub fn new(store: Arc<dyn SecureKeyValueStore>) -> Self {
        Self {
            store,
            consume_lock: Mutex::new(()),
        }
    }

    /// Issue a fresh one-time token granting access to `owner_username`'s
    /// profile for the next 24 hours.
    pub fn issue(&self, owner_username: &str) -> AuthResult<AccessToken> {
        let token = random_token(TOKEN_LENGTH, TOKEN_ALPHABET)?;
        let now = Utc::now();
        let record = AccessToken {
            token: token.clone(),
            owner_username: owner_username.to_string(),
            issued_at: now,
            expires_at: now + Duration::hours(TOKEN_TTL_HOURS),
            consumed: false,
        };

        self.store
            .set(&storage_key(&token), &serde_json::to_string(&record)?)?;

        info!("Issued profile token for {}", owner_username);
        Ok(record)
    }

    /// Issue a token and render the shareable profile deep link.
    pub fn secure_profile_url(&self, username: &str) -> AuthResult<String> {
        let record = self.issue(username)?;
        Ok(format!(
            "zay://profile/{}?token={}",
            username, record.token
        ))
    }

    /// Validate a token and mark it consumed, returning the owner username.
    ///
    /// At most one call per token ever succeeds. Expired records are removed
    /// as a side effect.
    pub fn validate_and_consume(&self, token: &str) -> AuthResult<String> {
        let _guard = self.consume_lock.lock();

        let key = storage_key(token);
        let raw = self.store.get(&key)?.ok_or(AuthError::NotFound)?;
        let mut record: AccessToken = serde_json::from_str(&raw)?;

        if record.consumed {
            debug!("Rejected already-used profile token");
            return Err(AuthError::AlreadyUsed);
        }

        if record.is_expired(Utc::now()) {
            if let Err(e) = self.store.delete(&key) {
                warn!("Failed to remove expired token record: {}", e);
            }
            debug!("Rejected expired profile token");
            return Err(AuthError::Expired);
        }

        record.consumed = true;
        self.store.set(&key, &serde_json::to_string(&record)?)?;

        info!("Consumed profile token for {}", record.owner_username);
        Ok(record.owner_username)
    }

    /// Delete every expired token record. Non-expired tokens are untouched.
    ///
    /// Called once at process start; safe to call at any time.
    pub fn sweep_expired(&self) -> AuthResult<usize> {
        let now = Utc::now();
        let mut removed = 0;

        for key in self.store.keys()? {
            if !key.starts_with(TOKEN_KEY_PREFIX) {
                continue;
            }
            let expired = match self.store.get(&key)? {
                Some(raw) => match serde_json::from_str::<AccessToken>(&raw) {
                    Ok(record) => record.is_expired(now),
                    // Unreadable record: cannot ever validate, drop it.
                    Err(_) => true,
                },
                None => continue,
            };
            if expired {
                self.store.delete(&key)?;
                removed += 1;
            }
        }

        if removed > 0 {
            info!("Swept {} expired profile tokens", removed);
        }
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use serial_test::serial;

    fn vault_with_store() -> (LocalTokenVault, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::new());
        (LocalTokenVault::new(store.clone()), store)
    }

    fn plant_token(store: &MemoryStore, record: &AccessToken) {
        store
            .set(
                &storage_key(&record.token),
                &serde_json::to_string(record).unwrap(),
            )
            .unwrap();
    }

    fn expired_record(token: &str, owner: &str) -> AccessToken {
        let issued = Utc::now() - Duration::hours(TOKEN_TTL_HOURS) - Duration::seconds(1);
        AccessToken {
            token: token.to_string(),
            owner_username: owner.to_string(),
            issued_at: issued,
            expires_at: issued + Duration::hours(TOKEN_TTL_HOURS),
            consumed: false,
        }
    }

    #[test]
    fn test_issue_and_consume() {
        let (vault, _) = vault_with_store();
        let record = vault.issue("alice").unwrap();

        assert_eq!(record.token.len(), TOKEN_LENGTH);
        assert!(!record.consumed);
        assert_eq!(
            vault.validate_and_consume(&record.token).unwrap(),
            "alice"
        );
    }

    #[test]
    fn test_second_consume_is_already_used() {
        let (vault, _) = vault_with_store();
        let record = vault.issue("alice").unwrap();

        vault.validate_and_consume(&record.token).unwrap();
        assert!(matches!(
            vault.validate_and_consume(&record.token),
            Err(AuthError::AlreadyUsed)
        ));
        // Still AlreadyUsed on a third attempt, not NotFound.
        assert!(matches!(
            vault.validate_and_consume(&record.token),
            Err(AuthError::AlreadyUsed)
        ));
    }

    #[test]
    fn test_unknown_token_is_not_found() {
        let (vault, _) = vault_with_store();
        assert!(matches!(
            vault.validate_and_consume("nosuchtoken"),
            Err(AuthError::NotFound)
        ));
    }

    #[test]
    fn test_expired_token_is_rejected_and_removed() {
        let (vault, store) = vault_with_store();
        let record = expired_record("expiredtok", "alice");
        plant_token(&store, &record);

        assert!(matches!(
            vault.validate_and_consume("expiredtok"),
            Err(AuthError::Expired)
        ));
        assert_eq!(store.get(&storage_key("expiredtok")).unwrap(), None);
    }

    #[test]
    fn test_sweep_removes_only_expired() {
        let (vault, store) = vault_with_store();
        plant_token(&store, &expired_record("old1", "alice"));
        plant_token(&store, &expired_record("old2", "bob"));
        let live = vault.issue("carol").unwrap();

        assert_eq!(vault.sweep_expired().unwrap(), 2);
        assert_eq!(
            vault.validate_and_consume(&live.token).unwrap(),
            "carol"
        );
    }

    #[test]
    fn test_sweep_drops_unreadable_records() {
        let (vault, store) = vault_with_store();
        store.set(&storage_key("corrupt"), "not json").unwrap();

        assert_eq!(vault.sweep_expired().unwrap(), 1);
        assert_eq!(store.get(&storage_key("corrupt")).unwrap(), None);
    }

    #[test]
    fn test_secure_profile_url_embeds_valid_token() {
        let (vault, _) = vault_with_store();
        let url = vault.secure_profile_url("alice").unwrap();

        assert!(url.starts_with("zay://profile/alice?token="));
        let token = url.rsplit('=').next().unwrap();
        assert_eq!(vault.validate_and_consume(token).unwrap(), "alice");
    }

    #[test]
    #[serial]
    fn test_concurrent_consume_succeeds_exactly_once() {
        let store = Arc::new(MemoryStore::new());
        let vault = Arc::new(LocalTokenVault::new(store));
        let record = vault.issue("alice").unwrap();

        let mut handles = Vec::new();
        for _ in 0..8 {
            let vault = Arc::clone(&vault);
            let token = record.token.clone();
            handles.push(std::thread::spawn(move || {
                vault.validate_and_consume(&token).is_ok()
            }));
        }

        let successes = handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .filter(|ok| *ok)
            .count();
        assert_eq!(successes, 1);
    }
}
