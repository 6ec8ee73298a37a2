//! Cryptographic utilities
//!
//! Functions for secure random generation and hashing. All randomness comes
//! from the system CSPRNG; entropy exhaustion is the only failure mode and is
//! not recoverable.

use anyhow::Result;
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use ring::rand::{SecureRandom, SystemRandom};
use sha2::{Digest, Sha256};

/// Alphabet for local profile-access tokens (62 alphanumeric characters)
pub const TOKEN_ALPHABET: &[u8] =
    b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";

/// Alphabet for support ticket ids, e.g. "JH13BNK"
pub const TICKET_ID_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Alphabet for remote login-link keys
pub const LINK_KEY_ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";

/// Generate `len` cryptographically secure random bytes
pub fn random_bytes(len: usize) -> Result<Vec<u8>> {
    let rng = SystemRandom::new();
    let mut bytes = vec![0u8; len];
    rng.fill(&mut bytes)
        .map_err(|_| anyhow::anyhow!("Failed to generate random bytes"))?;
    Ok(bytes)
}

/// Generate a random string of `len` characters drawn from `alphabet`.
///
/// Uses rejection sampling so every alphabet position is equally likely;
/// a plain modulo would bias toward the low end of the alphabet.
pub fn random_token(len: usize, alphabet: &[u8]) -> Result<String> {
    debug_assert!(!alphabet.is_empty() && alphabet.len() <= 256);
    let rng = SystemRandom::new();

    // Largest multiple of alphabet.len() that fits in a byte; bytes at or
    // above this are rejected and redrawn.
    let limit = 256 - (256 % alphabet.len());

    let mut out = String::with_capacity(len);
    let mut buf = [0u8; 64];
    while out.len() < len {
        rng.fill(&mut buf)
            .map_err(|_| anyhow::anyhow!("Failed to generate random bytes"))?;
        for &b in buf.iter() {
            if (b as usize) < limit {
                out.push(alphabet[b as usize % alphabet.len()] as char);
                if out.len() == len {
                    break;
                }
            }
        }
    }
    Ok(out)
}

/// Base64url (no padding) of `len` random bytes, for PKCE code verifiers
pub fn random_urlsafe(len: usize) -> Result<String> {
    Ok(URL_SAFE_NO_PAD.encode(random_bytes(len)?))
}

/// Hex-encoded SHA-256 digest of the input
pub fn sha256_hex(input: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(input.as_bytes());
    hex::encode(hasher.finalize())
}
