//! Login: personal access tokens (supported) and the OAuth handshake.

pub mod oauth;
mod session;

use thiserror::Error;

use crate::github::ApiError;
use crate::storage::StorageError;

pub use oauth::{CallbackParams, CsrfError, OAuthConfig, PendingState};
pub use session::{login, logout, restore, Session, SessionStores};

#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Please enter a personal access token")]
    EmptyToken,
    #[error("Failed to authenticate. Please check your token. ({0})")]
    InvalidToken(ApiError),
    #[error(transparent)]
    Api(ApiError),
    #[error("Failed to update session storage: {0}")]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Csrf(#[from] CsrfError),
    #[error("Authorization was denied: {0}")]
    Denied(String),
    #[error("Invalid callback URL: {0}")]
    InvalidCallback(String),
    #[error("Authorization callback is missing the code parameter")]
    MissingCode,
    #[error("OAuth login is not configured (set api.oauth_client_id)")]
    OAuthNotConfigured,
    #[error(
        "Exchanging the authorization code needs a server-side component. \
         Log in with a personal access token instead."
    )]
    ExchangeUnsupported,
}

impl AuthError {
    /// Classify a failed `GET /user` during login.
    fn from_validation(err: ApiError) -> Self {
        if err.is_unauthorized() {
            AuthError::InvalidToken(err)
        } else {
            AuthError::Api(err)
        }
    }
}
