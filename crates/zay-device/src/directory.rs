//! Account-document collaborator for trusted-device storage

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::HashMap;
use zay_types::{AuthResult, TrustedDevice};

/// Narrow interface over the account documents' `trustedDevices` set and
/// `trustedDeviceInfo` map. Inserts and removals are idempotent.
#[async_trait]
pub trait AccountDirectory: Send + Sync {
    async fn is_device_trusted(&self, username: &str, device_id: &str) -> AuthResult<bool>;

    /// Insert `device` into the account's trusted set. Re-inserting an
    /// already-trusted device keeps the original entry (no-op success).
    async fn add_trusted_device(&self, username: &str, device: &TrustedDevice) -> AuthResult<()>;

    async fn remove_trusted_device(&self, username: &str, device_id: &str) -> AuthResult<()>;

    async fn trusted_devices(&self, username: &str) -> AuthResult<Vec<TrustedDevice>>;
}

/// In-memory directory for tests.
#[derive(Default)]
pub struct InMemoryAccountDirectory {
    accounts: Mutex<HashMap<String, HashMap<String, TrustedDevice>>>,
}

impl InMemoryAccountDirectory {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AccountDirectory for InMemoryAccountDirectory {
    async fn is_device_trusted(&self, username: &str, device_id: &str) -> AuthResult<bool> {
        Ok(self
            .accounts
            .lock()
            .get(username)
            .is_some_and(|devices| devices.contains_key(device_id)))
    }

    async fn add_trusted_device(&self, username: &str, device: &TrustedDevice) -> AuthResult<()> {
        self.accounts
            .lock()
            .entry(username.to_string())
            .or_default()
            .entry(device.device_id.clone())
            .or_insert_with(|| device.clone());
        Ok(())
    }

    async fn remove_trusted_device(&self, username: &str, device_id: &str) -> AuthResult<()> {
        if let Some(devices) = self.accounts.lock().get_mut(username) {
            devices.remove(device_id);
        }
        Ok(())
    }

    async fn trusted_devices(&self, username: &str) -> AuthResult<Vec<TrustedDevice>> {
        Ok(self
            .accounts
            .lock()
            .get(username)
            .map(|devices| devices.values().cloned().collect())
            .unwrap_or_default())
    }
}
