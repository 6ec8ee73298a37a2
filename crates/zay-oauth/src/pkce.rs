//! PKCE (Proof Key for Code Exchange) session parameters
//!
//! Implements PKCE as defined in RFC 7636 with the S256 challenge method.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use sha2::{Digest, Sha256};
use zay_types::AuthResult;
use zay_utils::{random_token, random_urlsafe, TOKEN_ALPHABET};

/// Challenge method sent to the authorization endpoint; S256 is mandatory,
/// the plain method is never offered.
pub const CODE_CHALLENGE_METHOD: &str = "S256";

/// Verifier entropy in bytes before base64url encoding
const CODE_VERIFIER_BYTES: usize = 32;

const STATE_LENGTH: usize = 32;

/// Ephemeral parameters for one authorization attempt.
///
/// Lives in memory only: created right before redirecting to the provider,
/// consumed exactly once when the callback arrives, and dropped either way.
#[derive(Debug, Clone)]
pub struct PkceSession {
    /// Locally held secret, base64url of 32 random bytes
    pub code_verifier: String,

    /// base64url(SHA-256(code_verifier)), sent in the authorization URL
    pub code_challenge: String,

    /// CSRF token echoed back by the provider on redirect
    pub state: String,
}

impl PkceSession {
    pub fn generate() -> AuthResult<Self> {
        let code_verifier = random_urlsafe(CODE_VERIFIER_BYTES)?;
        let code_challenge = Self::challenge_for(&code_verifier);
        let state = random_token(STATE_LENGTH, TOKEN_ALPHABET)?;

        Ok(Self {
            code_verifier,
            code_challenge,
            state,
        })
    }

    fn challenge_for(code_verifier: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(code_verifier.as_bytes());
        URL_SAFE_NO_PAD.encode(hasher.finalize())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_challenge_matches_verifier() {
        let session = PkceSession::generate().unwrap();

        let mut hasher = Sha256::new();
        hasher.update(session.code_verifier.as_bytes());
        let expected = URL_SAFE_NO_PAD.encode(hasher.finalize());

        assert_eq!(session.code_challenge, expected);
    }

    #[test]
    fn test_verifier_shape() {
        let session = PkceSession::generate().unwrap();

        // 32 bytes -> 43 base64url chars, within RFC 7636's 43-128 window
        assert_eq!(session.code_verifier.len(), 43);
        assert!(!session.code_verifier.contains('='));
        assert!(!session.code_challenge.contains('='));
    }

    #[test]
    fn test_state_shape() {
        let session = PkceSession::generate().unwrap();
        assert_eq!(session.state.len(), 32);
        assert!(session.state.chars().all(|c| c.is_ascii_alphanumeric()));
    }

    #[test]
    fn test_sessions_are_unique() {
        let mut verifiers = HashSet::new();
        let mut states = HashSet::new();
        for _ in 0..100 {
            let session = PkceSession::generate().unwrap();
            assert!(verifiers.insert(session.code_verifier));
            assert!(states.insert(session.state));
        }
    }

    #[test]
    fn test_challenge_deterministic() {
        let verifier = "test_verifier_12345678901234567890123456789012345678901234";
        assert_eq!(
            PkceSession::challenge_for(verifier),
            PkceSession::challenge_for(verifier)
        );
    }
}
