//! Stable device identity

use zay_types::{AuthError, AuthResult};
use zay_utils::sha256_hex;

/// The host device as seen by the trust layer: a stable platform identifier
/// and a human-readable label.
///
/// The platform identifier stays inside this struct; only its hash
/// ([`DeviceProfile::device_id`]) is ever persisted or sent anywhere.
#[derive(Debug, Clone)]
pub struct DeviceProfile {
    platform_id: String,
    label: String,
}

impl DeviceProfile {
    /// Detect the host device. The platform machine id is stable across app
    /// reinstalls, so the derived device id is too.
    pub fn detect() -> AuthResult<Self> {
        let platform_id = machine_uid::get()
            .map_err(|e| AuthError::Storage(format!("Platform device id unavailable: {}", e)))?;
        Ok(Self {
            platform_id,
            label: host_label(),
        })
    }

    /// Build a profile from an explicit platform identifier and label.
    pub fn with_platform_id(platform_id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            platform_id: platform_id.into(),
            label: label.into(),
        }
    }

    /// Hex-encoded SHA-256 of the platform identifier. Deterministic for a
    /// fixed device.
    pub fn device_id(&self) -> String {
        sha256_hex(&self.platform_id)
    }

    /// Real, human-readable device label, e.g. "Linux (x86_64)".
    pub fn label(&self) -> &str {
        &self.label
    }
}

fn host_label() -> String {
    let os = match std::env::consts::OS {
        "macos" => "macOS",
        "windows" => "Windows",
        "linux" => "Linux",
        "android" => "Android",
        "ios" => "iOS",
        other => other,
    };
    format!("{} ({})", os, std::env::consts::ARCH)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_device_id_deterministic() {
        let a = DeviceProfile::with_platform_id("device-1234", "Test");
        let b = DeviceProfile::with_platform_id("device-1234", "Other label");
        assert_eq!(a.device_id(), b.device_id());
    }

    #[test]
    fn test_device_id_differs_per_platform_id() {
        let a = DeviceProfile::with_platform_id("device-1234", "Test");
        let b = DeviceProfile::with_platform_id("device-1235", "Test");
        assert_ne!(a.device_id(), b.device_id());
    }

    #[test]
    fn test_device_id_is_hash_not_raw_id() {
        let profile = DeviceProfile::with_platform_id("device-1234", "Test");
        let id = profile.device_id();
        assert_eq!(id.len(), 64);
        assert!(!id.contains("device-1234"));
        assert!(id.chars().all(|c| c.is_ascii_hexdigit()));
    }
}
