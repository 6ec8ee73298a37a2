//! Device identity and per-account device trust
//!
//! A device is identified by a SHA-256 hash of its platform identifier; the
//! raw identifier never leaves the process. Each account carries a set of
//! trusted device hashes, checked at login to skip re-verification.

mod directory;
mod identity;
mod manager;

pub use directory::{AccountDirectory, InMemoryAccountDirectory};
pub use identity::DeviceProfile;
pub use manager::{DeviceTrustManager, SPOOF_DEVICE_CATALOG};
