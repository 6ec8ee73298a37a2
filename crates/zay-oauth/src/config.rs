//! Provider endpoint configuration

use serde::{Deserialize, Serialize};

/// OAuth endpoints and client settings for one provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Provider slug as it appears in callback URLs, e.g. "snapchat"
    pub provider: String,

    pub client_id: String,

    /// Authorization endpoint the user is sent to
    pub auth_url: String,

    /// Token endpoint for the code exchange
    pub token_url: String,

    /// Must match the `zay://auth/<provider>/callback` deep-link form
    pub redirect_uri: String,

    /// Joined with spaces into the `scope` parameter
    pub scopes: Vec<String>,
}

impl ProviderConfig {
    /// Snapchat Login Kit, public client with PKCE.
    pub fn snapchat(client_id: impl Into<String>) -> Self {
        Self {
            provider: "snapchat".to_string(),
            client_id: client_id.into(),
            auth_url: "https://accounts.snapchat.com/accounts/oauth2/auth".to_string(),
            token_url: "https://accounts.snapchat.com/accounts/oauth2/token".to_string(),
            redirect_uri: "zay://auth/snapchat/callback".to_string(),
            scopes: vec![
                "https://auth.snapchat.com/oauth2/api/user.display_name".to_string(),
                "https://auth.snapchat.com/oauth2/api/user.external_id".to_string(),
                "https://auth.snapchat.com/oauth2/api/user.bitmoji.avatar".to_string(),
            ],
        }
    }

    /// Instagram Business API.
    pub fn instagram(client_id: impl Into<String>) -> Self {
        Self {
            provider: "instagram".to_string(),
            client_id: client_id.into(),
            auth_url: "https://www.instagram.com/oauth/authorize".to_string(),
            token_url: "https://api.instagram.com/oauth/access_token".to_string(),
            redirect_uri: "zay://auth/instagram/callback".to_string(),
            scopes: vec![
                "instagram_business_basic".to_string(),
                "instagram_business_content_publish".to_string(),
            ],
        }
    }
}
