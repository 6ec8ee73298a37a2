//! Server-persisted one-time login links
//!
//! A support agent issues a link tied to a ticket; whichever device opens the
//! corresponding `zay://zayapi/supportticket/...` URL gets logged in as the
//! target user, once. The document store behind [`LinkRepository`] must
//! support a conditional update for the mark-used step.

mod repository;
mod service;
mod wire;

pub use repository::{InMemoryLinkRepository, LinkRepository};
pub use service::{RemoteLoginLinkService, LINK_KEY_LENGTH, LINK_TTL_HOURS, TICKET_ID_LENGTH};
pub use wire::SupportTicketLink;
