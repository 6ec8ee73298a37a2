//! Per-account device trust decisions

use chrono::Utc;
use rand::Rng;
use std::sync::Arc;
use tracing::{info, warn};
use zay_types::{AuthResult, TrustedDevice};

use crate::directory::AccountDirectory;
use crate::identity::DeviceProfile;

/// Plausible device names shown on messages from non-Pro senders instead of
/// the real device label. Privacy, not security: the pick is uniform and
/// unrelated to the device identity.
pub const SPOOF_DEVICE_CATALOG: [&str; 15] = [
    "iPhone 15 Pro",
    "Samsung Galaxy S24",
    "Google Pixel 8",
    "OnePlus 12",
    "Xiaomi 14",
    "iPhone 14",
    "Samsung Galaxy A54",
    "Google Pixel 7a",
    "Nothing Phone 2",
    "Sony Xperia 1 V",
    "iPhone 13 mini",
    "Samsung Galaxy Z Flip5",
    "Motorola Edge 40",
    "Realme GT3",
    "OPPO Find X6",
];

pub struct DeviceTrustManager {
    directory: Arc<dyn AccountDirectory>,
    profile: DeviceProfile,
}

impl DeviceTrustManager {
    pub fn new(directory: Arc<dyn AccountDirectory>, profile: DeviceProfile) -> Self {
        Self { directory, profile }
    }

    /// Hashed identifier of this device. Stable across app reinstalls.
    pub fn device_id(&self) -> String {
        self.profile.device_id()
    }

    /// Whether this device is in `username`'s trusted set.
    ///
    /// Storage or network failures count as "not trusted" so an outage can
    /// never skip verification. Use [`try_is_trusted`](Self::try_is_trusted)
    /// where the caller needs to tell outage and distrust apart.
    pub async fn is_trusted(&self, username: &str) -> bool {
        match self.try_is_trusted(username).await {
            Ok(trusted) => trusted,
            Err(e) => {
                warn!("Trust check for {} failed, treating as untrusted: {}", username, e);
                false
            }
        }
    }

    /// Trust-set membership with the underlying error surfaced.
    pub async fn try_is_trusted(&self, username: &str) -> AuthResult<bool> {
        self.directory
            .is_device_trusted(username, &self.device_id())
            .await
    }

    /// Add this device to `username`'s trusted set. Idempotent: trusting an
    /// already-trusted device succeeds without duplicating the entry.
    pub async fn trust_current_device(&self, username: &str, label: &str) -> AuthResult<()> {
        let device = TrustedDevice {
            device_id: self.device_id(),
            device_info: label.to_string(),
            trusted_at: Utc::now(),
            last_used: None,
        };
        self.directory.add_trusted_device(username, &device).await?;
        info!("Trusted current device for {}", username);
        Ok(())
    }

    /// Remove a device from `username`'s trusted set. Idempotent.
    pub async fn untrust(&self, username: &str, device_id: &str) -> AuthResult<()> {
        self.directory
            .remove_trusted_device(username, device_id)
            .await?;
        info!("Untrusted device for {}", username);
        Ok(())
    }

    /// All trusted devices for the manage-devices screen.
    pub async fn trusted_devices(&self, username: &str) -> AuthResult<Vec<TrustedDevice>> {
        self.directory.trusted_devices(username).await
    }

    /// Device label attached to outgoing messages.
    ///
    /// Pro senders show their real device; everyone else gets a uniformly
    /// random catalog entry that reveals nothing about the actual device.
    pub fn device_label_for_messaging(&self, is_pro: bool) -> String {
        if is_pro {
            self.profile.label().to_string()
        } else {
            let idx = rand::thread_rng().gen_range(0..SPOOF_DEVICE_CATALOG.len());
            SPOOF_DEVICE_CATALOG[idx].to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::directory::InMemoryAccountDirectory;

    fn manager() -> (DeviceTrustManager, Arc<InMemoryAccountDirectory>) {
        let directory = Arc::new(InMemoryAccountDirectory::new());
        let profile = DeviceProfile::with_platform_id("device-1234", "Google Pixel 9 Pro");
        (DeviceTrustManager::new(directory.clone(), profile), directory)
    }

    #[tokio::test]
    async fn test_untrusted_by_default() {
        let (manager, _) = manager();
        assert!(!manager.is_trusted("alice").await);
    }

    #[tokio::test]
    async fn test_trust_then_check() {
        let (manager, _) = manager();
        manager
            .trust_current_device("alice", "Google Pixel 9 Pro")
            .await
            .unwrap();

        assert!(manager.is_trusted("alice").await);
        // Trust is per-account, not global.
        assert!(!manager.is_trusted("bob").await);
    }

    #[tokio::test]
    async fn test_trust_is_idempotent() {
        let (manager, _) = manager();
        manager
            .trust_current_device("alice", "Google Pixel 9 Pro")
            .await
            .unwrap();
        manager
            .trust_current_device("alice", "Google Pixel 9 Pro")
            .await
            .unwrap();

        assert_eq!(manager.trusted_devices("alice").await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_untrust_is_idempotent() {
        let (manager, _) = manager();
        manager
            .trust_current_device("alice", "Google Pixel 9 Pro")
            .await
            .unwrap();

        let device_id = manager.device_id();
        manager.untrust("alice", &device_id).await.unwrap();
        manager.untrust("alice", &device_id).await.unwrap();

        assert!(!manager.is_trusted("alice").await);
        assert!(manager.trusted_devices("alice").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_trusted_devices_lists_entry() {
        let (manager, _) = manager();
        manager
            .trust_current_device("alice", "Google Pixel 9 Pro")
            .await
            .unwrap();

        let devices = manager.trusted_devices("alice").await.unwrap();
        assert_eq!(devices.len(), 1);
        assert_eq!(devices[0].device_id, manager.device_id());
        assert_eq!(devices[0].device_info, "Google Pixel 9 Pro");
    }

    #[test]
    fn test_pro_sender_shows_real_label() {
        let directory = Arc::new(InMemoryAccountDirectory::new());
        let profile = DeviceProfile::with_platform_id("device-1234", "Real Device X");
        let manager = DeviceTrustManager::new(directory, profile);

        assert_eq!(manager.device_label_for_messaging(true), "Real Device X");
    }

    #[test]
    fn test_non_pro_sender_never_leaks_real_label() {
        let directory = Arc::new(InMemoryAccountDirectory::new());
        let profile = DeviceProfile::with_platform_id("device-1234", "Real Device X");
        let manager = DeviceTrustManager::new(directory, profile);

        for _ in 0..100 {
            let label = manager.device_label_for_messaging(false);
            assert_ne!(label, "Real Device X");
            assert!(SPOOF_DEVICE_CATALOG.contains(&label.as_str()));
        }
    }
}
