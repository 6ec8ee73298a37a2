//! Support-ticket deep-link wire format
//!
//! `zay://zayapi/supportticket/id?=<TICKET_ID>/key?=<LINK_KEY>` — the embedded
//! `?=` markers mean the URL cannot be parsed as path plus query string, so
//! each field is extracted from the raw string independently.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::service::{LINK_KEY_LENGTH, TICKET_ID_LENGTH};

static TICKET_ID_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"id\?=([A-Z0-9]+)").unwrap());
static LINK_KEY_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"key\?=([a-z0-9]+)").unwrap());

/// Parsed fields of a support-ticket login link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SupportTicketLink {
    pub ticket_id: String,
    pub link_key: String,
}

impl SupportTicketLink {
    /// Extract ticket id and link key from a raw deep-link string.
    ///
    /// Fails closed: both fields must be present with exactly the expected
    /// shape, otherwise the whole link is treated as invalid. Never trusts
    /// one field without the other.
    pub fn parse(url: &str) -> Option<Self> {
        let ticket_id = TICKET_ID_RE
            .captures(url)
            .map(|c| c[1].to_string())
            .filter(|t| t.len() == TICKET_ID_LENGTH)?;
        let link_key = LINK_KEY_RE
            .captures(url)
            .map(|c| c[1].to_string())
            .filter(|k| k.len() == LINK_KEY_LENGTH)?;

        Some(Self {
            ticket_id,
            link_key,
        })
    }

    /// Render the deep-link wire form for this ticket/key pair.
    pub fn to_url(&self) -> String {
        format!(
            "zay://zayapi/supportticket/id?={}/key?={}",
            self.ticket_id, self.link_key
        )
    }
}
