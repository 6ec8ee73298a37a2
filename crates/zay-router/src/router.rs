//! Deep-link dispatch

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info, warn};
use zay_links::RemoteLoginLinkService;
use zay_oauth::{AuthorizationRequest, AuthorizedCode, PkceFlow, ProviderConfig};
use zay_types::{AuthError, AuthResult};
use zay_vault::LocalTokenVault;

use crate::classify::{classify, DeepLink};

/// External session collaborator. Receives the resolved identity after a
/// successful login-link consumption; persisting login state is outside this
/// core.
#[async_trait]
pub trait SessionSink: Send + Sync {
    async fn persist_login(&self, username: &str) -> AuthResult<()>;
}

/// What handling a deep link produced.
#[derive(Debug, Clone)]
pub enum RouteOutcome {
    /// Open `username`'s profile (message sheet)
    ProfileOpened { username: String },

    /// Logged in as `username` via a support-ticket link; the session sink
    /// has already been handed the identity
    LoggedIn { username: String },

    /// A provider callback validated; the caller runs the token exchange
    /// with the returned code and verifier
    ProviderAuthorized(AuthorizedCode),

    /// Link was not for us; nothing happened
    Ignored,
}

pub struct DeepLinkRouter {
    vault: Arc<LocalTokenVault>,
    links: Arc<RemoteLoginLinkService>,
    session: Arc<dyn SessionSink>,

    /// Pending provider sign-ins, keyed by provider slug. A flow is removed
    /// when its callback arrives, so each begin allows exactly one redirect.
    flows: Mutex<HashMap<String, PkceFlow>>,
}

impl DeepLinkRouter {
    pub fn new(
        vault: Arc<LocalTokenVault>,
        links: Arc<RemoteLoginLinkService>,
        session: Arc<dyn SessionSink>,
    ) -> Self {
        Self {
            vault,
            links,
            session,
            flows: Mutex::new(HashMap::new()),
        }
    }

    /// Housekeeping at process start: drop expired local tokens.
    pub fn on_startup(&self) {
        if let Err(e) = self.vault.sweep_expired() {
            warn!("Token sweep at startup failed: {}", e);
        }
    }

    /// Start a provider sign-in. The returned URL goes to the browser or
    /// in-app web view; the matching callback later arrives via
    /// [`handle`](Self::handle).
    pub fn begin_provider_login(
        &self,
        config: ProviderConfig,
    ) -> AuthResult<AuthorizationRequest> {
        let mut flow = PkceFlow::new(config);
        let request = flow.begin()?;
        self.flows
            .lock()
            .insert(flow.provider().to_string(), flow);
        Ok(request)
    }

    /// Handle an incoming URL.
    ///
    /// Unrecognized links resolve to [`RouteOutcome::Ignored`]; recognized
    /// links surface their flow's error with its kind intact so the caller
    /// can pick the right user-facing message.
    pub async fn handle(&self, raw_url: &str) -> AuthResult<RouteOutcome> {
        match classify(raw_url) {
            DeepLink::Profile { username, token } => {
                self.handle_profile(username, token)
            }
            DeepLink::SupportTicket(link) => {
                let username = self.links.resolve(&link.link_key, &link.ticket_id).await?;
                self.session.persist_login(&username).await?;
                info!("Support-ticket login completed for {}", username);
                Ok(RouteOutcome::LoggedIn { username })
            }
            DeepLink::MalformedSupportTicket => Err(AuthError::InvalidLink(
                "Support-ticket link is missing its ticket id or key".to_string(),
            )),
            DeepLink::OAuthCallback { provider } => self.handle_callback(&provider, raw_url),
            DeepLink::Unrecognized => {
                debug!("Ignoring unrecognized link");
                Ok(RouteOutcome::Ignored)
            }
        }
    }

    fn handle_profile(
        &self,
        username: String,
        token: Option<String>,
    ) -> AuthResult<RouteOutcome> {
        let Some(token) = token else {
            // Plain share link without a token; nothing to validate.
            return Ok(RouteOutcome::ProfileOpened { username });
        };

        let owner = self.vault.validate_and_consume(&token)?;
        if owner != username {
            // A valid token pasted onto a different profile URL. The token
            // is already burned at this point, which is the safe side.
            warn!("Profile token owner does not match link target");
            return Err(AuthError::SecurityError);
        }
        Ok(RouteOutcome::ProfileOpened { username })
    }

    fn handle_callback(&self, provider: &str, raw_url: &str) -> AuthResult<RouteOutcome> {
        let mut flow = self
            .flows
            .lock()
            .remove(provider)
            .ok_or_else(|| {
                warn!("Callback for {} with no pending sign-in", provider);
                AuthError::InvalidLink(format!("No pending {} sign-in", provider))
            })?;

        let authorized = flow.handle_redirect(raw_url)?;
        Ok(RouteOutcome::ProviderAuthorized(authorized))
    }
}
