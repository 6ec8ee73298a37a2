//! Cryptographic utility functions for the Zay credential core

pub mod crypto;

pub use crypto::{
    random_bytes, random_token, random_urlsafe, sha256_hex, LINK_KEY_ALPHABET, TICKET_ID_ALPHABET,
    TOKEN_ALPHABET,
};
