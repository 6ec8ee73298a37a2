//! Data model shared across the credential core
//!
//! Field names on the remote records mirror the document-store schema
//! (camelCase), so these structs serialize directly into `login_links`
//! documents and the trusted-device fields on account documents.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One-time local profile-access token.
///
/// Stored as JSON in the encrypted on-device vault, keyed by token value.
/// A token with `consumed == true` or past `expires_at` must never resolve
/// to an identity again.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AccessToken {
    /// Opaque 32-character CSPRNG token value
    pub token: String,

    /// Username the token grants access to
    pub owner_username: String,

    pub issued_at: DateTime<Utc>,

    pub expires_at: DateTime<Utc>,

    /// Set on first successful validation; never cleared
    pub consumed: bool,
}

impl AccessToken {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at
    }
}

/// Agent-issued one-time login link, persisted in the `login_links`
/// collection with the link key as document id.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LoginLink {
    /// Document id; mirrors `link_key`
    pub id: String,

    /// Support ticket this link was issued for, e.g. "JH13BNK"
    pub ticket_id: String,

    /// Account the link logs into
    pub target_username: String,

    /// 27-character lowercase-alphanumeric key
    pub link_key: String,

    /// Admin who issued the link
    pub admin_username: String,

    pub created_at: DateTime<Utc>,

    pub expires_at: DateTime<Utc>,

    pub is_used: bool,

    #[serde(default)]
    pub used_at: Option<DateTime<Utc>>,
}

impl LoginLink {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at
    }
}

/// Membership entry in an account's trusted-device set.
///
/// `device_id` is a one-way hash of the platform device identifier; the raw
/// identifier is never persisted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TrustedDevice {
    pub device_id: String,

    /// Human-readable label, e.g. "Google Pixel 8 (Android 14)"
    pub device_info: String,

    pub trusted_at: DateTime<Utc>,

    #[serde(default)]
    pub last_used: Option<DateTime<Utc>>,
}

/// Parsed token-endpoint response from an OAuth code exchange.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BearerToken {
    pub access_token: String,

    /// Usually "Bearer"
    #[serde(default)]
    pub token_type: String,

    #[serde(default)]
    pub expires_in: Option<i64>,

    #[serde(default)]
    pub refresh_token: Option<String>,

    #[serde(skip, default = "Utc::now")]
    pub acquired_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_access_token_expiry() {
        let now = Utc::now();
        let token = AccessToken {
            token: "t".repeat(32),
            owner_username: "alice".to_string(),
            issued_at: now,
            expires_at: now + Duration::hours(24),
            consumed: false,
        };

        assert!(!token.is_expired(now));
        assert!(!token.is_expired(now + Duration::hours(24)));
        assert!(token.is_expired(now + Duration::hours(24) + Duration::seconds(1)));
    }

    #[test]
    fn test_login_link_serializes_camel_case() {
        let now = Utc::now();
        let link = LoginLink {
            id: "abc".to_string(),
            ticket_id: "JH13BNK".to_string(),
            target_username: "alice".to_string(),
            link_key: "abc".to_string(),
            admin_username: "support1".to_string(),
            created_at: now,
            expires_at: now + Duration::hours(24),
            is_used: false,
            used_at: None,
        };

        let json = serde_json::to_value(&link).unwrap();
        assert!(json.get("ticketId").is_some());
        assert!(json.get("targetUsername").is_some());
        assert!(json.get("isUsed").is_some());
        assert!(json.get("ticket_id").is_none());
    }

    #[test]
    fn test_login_link_round_trip() {
        let now = Utc::now();
        let link = LoginLink {
            id: "key1".to_string(),
            ticket_id: "AB12CD3".to_string(),
            target_username: "bob".to_string(),
            link_key: "key1".to_string(),
            admin_username: "support1".to_string(),
            created_at: now,
            expires_at: now + Duration::hours(24),
            is_used: true,
            used_at: Some(now),
        };

        let json = serde_json::to_string(&link).unwrap();
        let back: LoginLink = serde_json::from_str(&json).unwrap();
        assert_eq!(back, link);
    }

    #[test]
    fn test_bearer_token_minimal_response() {
        let json = r#"{"access_token": "tok"}"#;
        let token: BearerToken = serde_json::from_str(json).unwrap();
        assert_eq!(token.access_token, "tok");
        assert_eq!(token.token_type, "");
        assert_eq!(token.expires_in, None);
        assert_eq!(token.refresh_token, None);
    }
}
