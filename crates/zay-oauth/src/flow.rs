//! Authorization flow state machine

use subtle::ConstantTimeEq;
use tracing::{debug, info, warn};
use url::Url;
use zay_types::{AuthError, AuthResult};

use crate::config::ProviderConfig;
use crate::pkce::{PkceSession, CODE_CHALLENGE_METHOD};

/// Where a flow currently stands: `Idle → AwaitingRedirect → (Resolved |
/// Failed)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowPhase {
    Idle,
    AwaitingRedirect,
    Resolved,
    Failed,
}

/// Everything the caller needs to send the user to the provider.
#[derive(Debug, Clone)]
pub struct AuthorizationRequest {
    pub auth_url: String,

    /// Echo of the session state, for callers that track flows externally
    pub state: String,
}

/// Outcome of a validated redirect: the authorization code plus the verifier
/// needed for the token exchange.
#[derive(Debug, Clone)]
pub struct AuthorizedCode {
    pub provider: String,
    pub code: String,
    pub code_verifier: String,
}

/// One provider sign-in attempt.
///
/// The PKCE session is held in memory only and consumed by the first
/// redirect, successful or not; a second callback for the same flow is
/// rejected outright.
pub struct PkceFlow {
    config: ProviderConfig,
    phase: FlowPhase,
    session: Option<PkceSession>,
}

impl PkceFlow {
    pub fn new(config: ProviderConfig) -> Self {
        Self {
            config,
            phase: FlowPhase::Idle,
            session: None,
        }
    }

    pub fn phase(&self) -> FlowPhase {
        self.phase
    }

    pub fn provider(&self) -> &str {
        &self.config.provider
    }

    /// Generate PKCE parameters and build the authorization URL.
    pub fn begin(&mut self) -> AuthResult<AuthorizationRequest> {
        let session = PkceSession::generate()?;
        let auth_url = self.build_authorization_url(&session);
        let state = session.state.clone();

        self.session = Some(session);
        self.phase = FlowPhase::AwaitingRedirect;

        info!("Started {} authorization flow", self.config.provider);
        Ok(AuthorizationRequest { auth_url, state })
    }

    fn build_authorization_url(&self, session: &PkceSession) -> String {
        let mut url = format!(
            "{}?response_type=code&client_id={}&redirect_uri={}&code_challenge={}&code_challenge_method={}&state={}",
            self.config.auth_url,
            urlencoding::encode(&self.config.client_id),
            urlencoding::encode(&self.config.redirect_uri),
            urlencoding::encode(&session.code_challenge),
            CODE_CHALLENGE_METHOD,
            urlencoding::encode(&session.state),
        );

        if !self.config.scopes.is_empty() {
            let scopes = self.config.scopes.join(" ");
            url.push_str(&format!("&scope={}", urlencoding::encode(&scopes)));
        }

        url
    }

    /// Validate the redirect callback and return the authorization code.
    ///
    /// The state comparison is the CSRF defense and happens before the code
    /// is looked at; it runs in constant time. The session is consumed no
    /// matter which branch is taken.
    pub fn handle_redirect(&mut self, callback_url: &str) -> AuthResult<AuthorizedCode> {
        let session = self.session.take().ok_or_else(|| {
            AuthError::InvalidLink("No authorization flow awaiting a redirect".to_string())
        })?;
        self.phase = FlowPhase::Failed;

        let parsed = Url::parse(callback_url)
            .map_err(|e| AuthError::InvalidLink(format!("Bad callback URL: {}", e)))?;

        let mut code = None;
        let mut state = None;
        let mut error = None;
        for (key, value) in parsed.query_pairs() {
            match key.as_ref() {
                "code" => code = Some(value.into_owned()),
                "state" => state = Some(value.into_owned()),
                "error" => error = Some(value.into_owned()),
                _ => {}
            }
        }

        if let Some(error) = error {
            warn!("{} authorization denied: {}", self.config.provider, error);
            return Err(AuthError::AuthorizationDenied(error));
        }

        let returned_state = state.unwrap_or_default();
        let state_ok: bool = returned_state
            .as_bytes()
            .ct_eq(session.state.as_bytes())
            .into();
        if !state_ok {
            warn!(
                "State mismatch on {} callback, dropping flow",
                self.config.provider
            );
            return Err(AuthError::StateMismatch);
        }

        let code = code.ok_or_else(|| {
            AuthError::InvalidLink("Callback carried no authorization code".to_string())
        })?;

        self.phase = FlowPhase::Resolved;
        debug!("{} callback validated", self.config.provider);
        Ok(AuthorizedCode {
            provider: self.config.provider.clone(),
            code,
            code_verifier: session.code_verifier,
        })
    }
}
