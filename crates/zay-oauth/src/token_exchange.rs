//! Authorization-code token exchange

use chrono::Utc;
use reqwest::Client;
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;
use tracing::{error, info};
use zay_types::{AuthError, AuthResult, BearerToken};

use crate::config::ProviderConfig;

/// Bound on the token POST; a hung endpoint surfaces as `Timeout` instead of
/// blocking the sign-in indefinitely.
const EXCHANGE_TIMEOUT_SECS: u64 = 15;

/// Raw token-endpoint response. A missing `access_token` field fails
/// deserialization and is reported as an exchange failure.
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,

    #[serde(default)]
    token_type: String,

    #[serde(default)]
    expires_in: Option<i64>,

    #[serde(default)]
    refresh_token: Option<String>,
}

pub struct TokenExchanger {
    client: Client,
}

impl TokenExchanger {
    pub fn new() -> Self {
        Self {
            client: Client::new(),
        }
    }

    /// Exchange an authorization code for a bearer token.
    ///
    /// Cancellation-safe: dropping the future aborts the request; nothing
    /// durable has been written at that point.
    pub async fn exchange(
        &self,
        config: &ProviderConfig,
        code: &str,
        code_verifier: &str,
    ) -> AuthResult<BearerToken> {
        let mut params = HashMap::new();
        params.insert("grant_type", "authorization_code");
        params.insert("code", code);
        params.insert("redirect_uri", &config.redirect_uri);
        params.insert("client_id", &config.client_id);
        params.insert("code_verifier", code_verifier);

        let response = self
            .client
            .post(&config.token_url)
            .timeout(Duration::from_secs(EXCHANGE_TIMEOUT_SECS))
            .form(&params)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    AuthError::Timeout
                } else {
                    AuthError::ExchangeFailed(format!("Failed to send token request: {}", e))
                }
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            error!(
                "{} token exchange failed with status {}: {}",
                config.provider, status, body
            );
            return Err(AuthError::ExchangeFailed(format!(
                "Token endpoint returned status {}",
                status
            )));
        }

        let token_response: TokenResponse = response.json().await.map_err(|e| {
            AuthError::ExchangeFailed(format!("Failed to parse token response: {}", e))
        })?;

        info!("{} token exchange successful", config.provider);
        Ok(BearerToken {
            access_token: token_response.access_token,
            token_type: token_response.token_type,
            expires_in: token_response.expires_in,
            refresh_token: token_response.refresh_token,
            acquired_at: Utc::now(),
        })
    }
}

impl Default for TokenExchanger {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_response_deserialization() {
        let json = r#"{
            "access_token": "test_access",
            "token_type": "Bearer",
            "expires_in": 3600,
            "refresh_token": "test_refresh"
        }"#;

        let response: TokenResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.access_token, "test_access");
        assert_eq!(response.token_type, "Bearer");
        assert_eq!(response.expires_in, Some(3600));
        assert_eq!(response.refresh_token, Some("test_refresh".to_string()));
    }

    #[test]
    fn test_token_response_minimal() {
        let json = r#"{"access_token": "test_access"}"#;

        let response: TokenResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.access_token, "test_access");
        assert_eq!(response.token_type, "");
        assert_eq!(response.expires_in, None);
        assert_eq!(response.refresh_token, None);
    }

    #[test]
    fn test_missing_access_token_is_rejected() {
        let json = r#"{"token_type": "Bearer"}"#;
        assert!(serde_json::from_str::<TokenResponse>(json).is_err());
    }
}
