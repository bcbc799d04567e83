//! Personal-access-token sessions.

use std::sync::Arc;

use crate::github::{ContentsApi, User};
use crate::storage::{KeyValueStore, TOKEN_KEY, USER_KEY};

use super::AuthError;

/// Authenticated session: the credential and the account it belongs to.
#[derive(Clone, PartialEq, Eq)]
pub struct Session {
    pub token: String,
    pub user: User,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("user", &self.user.login)
            .finish_non_exhaustive()
    }
}

impl Session {
    pub fn login(&self) -> &str {
        &self.user.login
    }
}

/// The two stores a session is mirrored into.
#[derive(Clone)]
pub struct SessionStores {
    /// Survives restarts (credential)
    pub persistent: Arc<dyn KeyValueStore>,
    /// Lives as long as the process (login name, OAuth state)
    pub ephemeral: Arc<dyn KeyValueStore>,
}

impl SessionStores {
    pub fn new(persistent: Arc<dyn KeyValueStore>, ephemeral: Arc<dyn KeyValueStore>) -> Self {
        Self {
            persistent,
            ephemeral,
        }
    }

    /// Credential saved by a previous login, if any.
    pub fn stored_token(&self) -> Option<String> {
        self.persistent
            .get(TOKEN_KEY)
            .filter(|token| !token.trim().is_empty())
    }
}

/// Validate `token` with `GET /user` and persist it on success.
///
/// `api` must already authenticate with `token`. On failure nothing is
/// persisted. A token the remote rejects also clears any stored credential;
/// network and other failures leave it in place for the next attempt.
pub async fn login<A: ContentsApi + ?Sized>(
    api: &A,
    stores: &SessionStores,
    token: &str,
) -> Result<Session, AuthError> {
    let token = token.trim();
    if token.is_empty() {
        return Err(AuthError::EmptyToken);
    }

    match api.current_user().await {
        Ok(user) => {
            stores.persistent.set(TOKEN_KEY, token)?;
            stores.ephemeral.set(USER_KEY, &user.login)?;
            tracing::info!(login = %user.login, "Logged in");
            Ok(Session {
                token: token.to_string(),
                user,
            })
        }
        Err(err) => {
            tracing::warn!(error = %err, "Token validation failed");
            if err.is_unauthorized() {
                logout(stores)?;
            }
            Err(AuthError::from_validation(err))
        }
    }
}

/// Re-validate the stored credential, if there is one.
///
/// Returns `Ok(None)` when no credential is stored. A credential the remote
/// rejects is cleared.
pub async fn restore<A, F>(stores: &SessionStores, make_api: F) -> Result<Option<Session>, AuthError>
where
    A: ContentsApi + ?Sized,
    F: FnOnce(&str) -> Arc<A>,
{
    let Some(token) = stores.stored_token() else {
        return Ok(None);
    };
    let api = make_api(&token);
    login(api.as_ref(), stores, &token).await.map(Some)
}

/// Forget the credential and user in both stores.
pub fn logout(stores: &SessionStores) -> Result<(), AuthError> {
    stores.persistent.remove(TOKEN_KEY)?;
    stores.ephemeral.remove(USER_KEY)?;
    Ok(())
}
