//! Browser OAuth handshake guarded by a single-use state token.
//!
//! The authorize redirect and the callback check are complete. Trading the
//! returned code for a token needs the application's client secret, which a
//! client-only program cannot hold, so [`exchange_code`] always fails and the
//! personal-access-token login remains the supported path.

use chrono::{DateTime, TimeZone, Utc};
use reqwest::Url;
use thiserror::Error;

use crate::storage::{KeyValueStore, OAUTH_STATE_ISSUED_AT_KEY, OAUTH_STATE_KEY};

use super::AuthError;

/// Authorization endpoint of the hosting service
pub const DEFAULT_AUTHORIZE_URL: &str = "https://github.com/login/oauth/authorize";
/// Scope needed to commit to private and public repositories
pub const DEFAULT_SCOPE: &str = "repo";
/// How long an issued state token stays valid
pub const STATE_TTL_SECS: i64 = 5 * 60;

const STATE_BYTES: usize = 16;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CsrfError {
    #[error("No login is in progress (missing state)")]
    MissingState,
    #[error("Login state does not match; the callback may be forged")]
    StateMismatch,
    #[error("Login took longer than five minutes; please start again")]
    Expired,
}

/// OAuth application settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OAuthConfig {
    pub client_id: String,
    pub redirect_uri: String,
    pub scope: String,
    pub authorize_url: String,
}

impl OAuthConfig {
    pub fn new(client_id: impl Into<String>, redirect_uri: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            redirect_uri: redirect_uri.into(),
            scope: DEFAULT_SCOPE.to_string(),
            authorize_url: DEFAULT_AUTHORIZE_URL.to_string(),
        }
    }

    /// Build from the `[api]` config section, if a client id is configured.
    pub fn from_config(config: &crate::config::Config) -> Option<Self> {
        config
            .api
            .oauth_client_id
            .as_ref()
            .map(|id| Self::new(id.clone(), config.api.oauth_redirect_uri.clone()))
    }
}

/// A state token and when it was issued
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingState {
    pub state: String,
    pub issued_at: DateTime<Utc>,
}

/// Query parameters the provider appends to the redirect URI
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CallbackParams {
    pub code: Option<String>,
    pub state: Option<String>,
    pub error: Option<String>,
    pub error_description: Option<String>,
}

impl CallbackParams {
    /// Parse the full callback URL pasted back by the user.
    pub fn parse(callback_url: &str) -> Result<Self, AuthError> {
        let url = Url::parse(callback_url.trim())
            .map_err(|e| AuthError::InvalidCallback(e.to_string()))?;

        let mut params = CallbackParams::default();
        for (key, value) in url.query_pairs() {
            let value = Some(value.into_owned()).filter(|v| !v.is_empty());
            match key.as_ref() {
                "code" => params.code = value,
                "state" => params.state = value,
                "error" => params.error = value,
                "error_description" => params.error_description = value,
                _ => {}
            }
        }
        Ok(params)
    }
}

/// Fresh hex-encoded state token from the thread-local CSPRNG.
pub fn generate_state() -> String {
    let bytes: [u8; STATE_BYTES] = rand::random();
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

/// Start a login: store a new state token and return the URL to open.
pub fn begin_authorization(
    config: &OAuthConfig,
    store: &dyn KeyValueStore,
    now: DateTime<Utc>,
) -> Result<Url, AuthError> {
    let state = generate_state();
    store.set(OAUTH_STATE_KEY, &state)?;
    store.set(OAUTH_STATE_ISSUED_AT_KEY, &now.timestamp_millis().to_string())?;

    let url = Url::parse_with_params(
        &config.authorize_url,
        &[
            ("client_id", config.client_id.as_str()),
            ("redirect_uri", config.redirect_uri.as_str()),
            ("scope", config.scope.as_str()),
            ("state", state.as_str()),
        ],
    )
    .map_err(|e| AuthError::InvalidCallback(e.to_string()))?;

    tracing::debug!("Issued OAuth state token");
    Ok(url)
}

/// Remove and return the pending state. Both keys are cleared even when
/// they are malformed, so a state can be checked at most once.
pub fn take_pending_state(store: &dyn KeyValueStore) -> Result<Option<PendingState>, AuthError> {
    let state = store.take(OAUTH_STATE_KEY)?;
    let issued_at = store.take(OAUTH_STATE_ISSUED_AT_KEY)?;

    let issued_at = issued_at
        .and_then(|raw| raw.parse::<i64>().ok())
        .and_then(|millis| Utc.timestamp_millis_opt(millis).single());

    Ok(match (state, issued_at) {
        (Some(state), Some(issued_at)) if !state.is_empty() => {
            Some(PendingState { state, issued_at })
        }
        _ => None,
    })
}

/// Check a returned state against the pending one.
pub fn verify_state(
    pending: Option<&PendingState>,
    returned: Option<&str>,
    now: DateTime<Utc>,
) -> Result<(), CsrfError> {
    let pending = pending.ok_or(CsrfError::MissingState)?;
    let returned = returned.ok_or(CsrfError::StateMismatch)?;

    if !constant_time_eq(pending.state.as_bytes(), returned.as_bytes()) {
        return Err(CsrfError::StateMismatch);
    }

    let elapsed_ms = now.signed_duration_since(pending.issued_at).num_milliseconds();
    if !(0..STATE_TTL_SECS * 1000).contains(&elapsed_ms) {
        return Err(CsrfError::Expired);
    }

    Ok(())
}

/// Validate a callback URL and return the authorization code.
///
/// The pending state is consumed before anything else happens.
pub fn handle_callback(
    store: &dyn KeyValueStore,
    callback_url: &str,
    now: DateTime<Utc>,
) -> Result<String, AuthError> {
    let pending = take_pending_state(store)?;
    let params = CallbackParams::parse(callback_url)?;

    if let Some(error) = params.error {
        return Err(AuthError::Denied(params.error_description.unwrap_or(error)));
    }

    verify_state(pending.as_ref(), params.state.as_deref(), now)?;
    params.code.ok_or(AuthError::MissingCode)
}

/// Trade an authorization code for an access token.
///
/// Not possible without a server-side component holding the client secret.
pub fn exchange_code(_code: &str) -> Result<String, AuthError> {
    tracing::info!("OAuth callback verified; code exchange is not available client-side");
    Err(AuthError::ExchangeUnsupported)
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}
