//! Error types and conversions

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Token or link not found")]
    NotFound,

    #[error("Token or link has expired")]
    Expired,

    #[error("Token or link has already been used")]
    AlreadyUsed,

    #[error("Ticket id does not match the login link")]
    TicketMismatch,

    #[error("Link owner does not match the requested profile")]
    SecurityError,

    #[error("OAuth state parameter mismatch")]
    StateMismatch,

    #[error("Authorization denied by provider: {0}")]
    AuthorizationDenied(String),

    #[error("Token exchange failed: {0}")]
    ExchangeFailed(String),

    #[error("Operation timed out")]
    Timeout,

    #[error("Secure storage unavailable: {0}")]
    StorageUnavailable(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Invalid deep link: {0}")]
    InvalidLink(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Cryptography error: {0}")]
    Crypto(#[from] anyhow::Error),
}

pub type AuthResult<T> = Result<T, AuthError>;

impl AuthError {
    /// User-facing message for this error.
    ///
    /// Expired/used links call for requesting a new link, invalid links for
    /// checking the URL, and transient failures for retrying. The three must
    /// stay distinguishable, so callers should never collapse them into a
    /// generic failure string.
    pub fn user_message(&self) -> &'static str {
        match self {
            AuthError::NotFound => "This link is invalid or no longer exists.",
            AuthError::Expired => "This link has expired. Please request a new one.",
            AuthError::AlreadyUsed => {
                "This link has already been used. Please request a new one."
            }
            AuthError::TicketMismatch | AuthError::InvalidLink(_) => "This link is invalid.",
            AuthError::SecurityError => {
                "This link has expired or has already been used for security reasons."
            }
            AuthError::StateMismatch | AuthError::AuthorizationDenied(_) => {
                "Sign-in was cancelled or rejected. Please try again."
            }
            AuthError::ExchangeFailed(_) => "Sign-in failed. Please try again.",
            AuthError::Timeout => "Network timeout. Please check your connection and retry.",
            AuthError::StorageUnavailable(_)
            | AuthError::Storage(_)
            | AuthError::Io(_)
            | AuthError::Serialization(_)
            | AuthError::Crypto(_) => "Something went wrong. Please try again.",
        }
    }

    /// True for terminal link states where retrying the same link cannot
    /// succeed and the user needs a freshly issued one.
    pub fn needs_new_link(&self) -> bool {
        matches!(
            self,
            AuthError::Expired | AuthError::AlreadyUsed | AuthError::SecurityError
        )
    }
}

impl From<AuthError> for String {
    fn from(err: AuthError) -> String {
        err.to_string()
    }
}
