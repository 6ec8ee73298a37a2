//! One-time login-link issue and resolve flows

use chrono::{Duration, Utc};
use std::sync::Arc;
use tracing::{info, warn};
use zay_types::{AuthError, AuthResult, LoginLink};
use zay_utils::{random_token, LINK_KEY_ALPHABET, TICKET_ID_ALPHABET};

use crate::repository::LinkRepository;
use crate::wire::SupportTicketLink;

/// Login links expire this long after issuance
pub const LINK_TTL_HOURS: i64 = 24;

pub const LINK_KEY_LENGTH: usize = 27;

pub const TICKET_ID_LENGTH: usize = 7;

pub struct RemoteLoginLinkService {
    repo: Arc<dyn LinkRepository>,
}

impl RemoteLoginLinkService {
    pub fn new(repo: Arc<dyn LinkRepository>) -> Self {
        Self { repo }
    }

    /// Generate a support-ticket id like "JH13BNK".
    pub fn generate_ticket_id() -> AuthResult<String> {
        Ok(random_token(TICKET_ID_LENGTH, TICKET_ID_ALPHABET)?)
    }

    /// Create and persist a login link for `target_username`, tied to
    /// `ticket_id` and issued by `issuer`. Valid for 24 hours or one use,
    /// whichever comes first.
    pub async fn create(
        &self,
        ticket_id: &str,
        target_username: &str,
        issuer: &str,
    ) -> AuthResult<LoginLink> {
        let link_key = random_token(LINK_KEY_LENGTH, LINK_KEY_ALPHABET)?;
        let now = Utc::now();
        let link = LoginLink {
            id: link_key.clone(),
            ticket_id: ticket_id.to_string(),
            target_username: target_username.to_string(),
            link_key,
            admin_username: issuer.to_string(),
            created_at: now,
            expires_at: now + Duration::hours(LINK_TTL_HOURS),
            is_used: false,
            used_at: None,
        };

        self.repo.create(&link).await?;
        info!(
            "Created login link for {} on ticket {}",
            target_username, ticket_id
        );
        Ok(link)
    }

    /// Render the shareable deep link for an issued login link.
    pub fn support_ticket_url(link: &LoginLink) -> String {
        SupportTicketLink {
            ticket_id: link.ticket_id.clone(),
            link_key: link.link_key.clone(),
        }
        .to_url()
    }

    /// Validate and consume a login link, returning the target username.
    ///
    /// The conditional `mark_used` is the authority on consumption: of any
    /// number of concurrent resolves, exactly one passes it. The record is
    /// marked used first and deleted second; deletion is best-effort cleanup
    /// and a failure there never re-opens the link.
    pub async fn resolve(&self, link_key: &str, ticket_id: &str) -> AuthResult<String> {
        let link = self
            .repo
            .get(link_key)
            .await?
            .ok_or(AuthError::NotFound)?;

        if link.is_used {
            return Err(AuthError::AlreadyUsed);
        }

        if link.is_expired(Utc::now()) {
            if let Err(e) = self.repo.delete(link_key).await {
                warn!("Failed to remove expired login link: {}", e);
            }
            return Err(AuthError::Expired);
        }

        if link.ticket_id != ticket_id {
            warn!("Ticket id mismatch on login link for ticket {}", ticket_id);
            return Err(AuthError::TicketMismatch);
        }

        if !self.repo.mark_used(link_key).await? {
            // Lost the race to another device, or the link vanished.
            return Err(AuthError::AlreadyUsed);
        }

        if let Err(e) = self.repo.delete(link_key).await {
            warn!("Failed to delete consumed login link: {}", e);
        }

        info!(
            "Login link consumed for {} on ticket {}",
            link.target_username, link.ticket_id
        );
        Ok(link.target_username)
    }
}
