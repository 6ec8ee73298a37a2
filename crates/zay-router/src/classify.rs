//! Incoming-URL classification

use url::Url;
use zay_links::SupportTicketLink;

/// What an incoming URL turned out to be.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeepLink {
    /// `zay://profile/<username>[?token=...]`
    Profile {
        username: String,
        token: Option<String>,
    },

    /// `zay://zayapi/supportticket/id?=.../key?=...` with both fields intact
    SupportTicket(SupportTicketLink),

    /// Support-ticket path recognized but ticket id or key missing or
    /// malformed. Unlike [`DeepLink::Unrecognized`] this is reported to the
    /// user, because they did tap a login link.
    MalformedSupportTicket,

    /// `zay://auth/<provider>/callback?...`
    OAuthCallback { provider: String },

    /// Anything else, including other schemes. Dropped silently.
    Unrecognized,
}

/// Classify a raw URL string.
///
/// Host and path decide the flow; field extraction for support-ticket links
/// runs on the raw string because the embedded `?=` markers defeat standard
/// path/query splitting.
pub fn classify(raw_url: &str) -> DeepLink {
    let Ok(url) = Url::parse(raw_url) else {
        return DeepLink::Unrecognized;
    };
    if url.scheme() != "zay" {
        return DeepLink::Unrecognized;
    }

    let segments: Vec<&str> = url
        .path_segments()
        .map(|s| s.filter(|seg| !seg.is_empty()).collect())
        .unwrap_or_default();

    match url.host_str() {
        Some("profile") => {
            let Some(username) = segments.first().map(|s| s.to_string()) else {
                return DeepLink::Unrecognized;
            };
            let token = url
                .query_pairs()
                .find(|(k, _)| k == "token")
                .map(|(_, v)| v.into_owned());
            DeepLink::Profile { username, token }
        }
        Some("zayapi") => {
            if segments.first() != Some(&"supportticket") {
                return DeepLink::Unrecognized;
            }
            match SupportTicketLink::parse(raw_url) {
                Some(link) => DeepLink::SupportTicket(link),
                None => DeepLink::MalformedSupportTicket,
            }
        }
        Some("auth") => match segments.as_slice() {
            [provider, "callback", ..] => DeepLink::OAuthCallback {
                provider: (*provider).to_string(),
            },
            _ => DeepLink::Unrecognized,
        },
        _ => DeepLink::Unrecognized,
    }
}
