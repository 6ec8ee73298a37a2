//! Deep-link classification and dispatch
//!
//! The router is the single entry point for incoming `zay://` URLs: it
//! decides which credential flow a link belongs to, drives that flow, and
//! hands any resolved identity to the session collaborator. Unsolicited or
//! malformed links are ignored rather than treated as errors — a deep link
//! is best-effort input from outside the app.

mod classify;
mod router;

pub use classify::{classify, DeepLink};
pub use router::{DeepLinkRouter, RouteOutcome, SessionSink};
