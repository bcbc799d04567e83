//! Key/value stores backing the session and login handshake.
//!
//! [`FileStore`] is the long-lived store: a JSON object on disk that survives
//! restarts. [`MemoryStore`] is the short-lived store: it lives exactly as long
//! as the process and is used for values that must not outlast the session,
//! such as the OAuth state token.

mod file_store;
mod memory_store;

use thiserror::Error;

pub use file_store::FileStore;
pub use memory_store::MemoryStore;

/// Key holding the access credential
pub const TOKEN_KEY: &str = "github_token";
/// Key holding the authenticated login name
pub const USER_KEY: &str = "github_user";
/// Key holding the pending OAuth state token
pub const OAUTH_STATE_KEY: &str = "oauth_state";
/// Key holding the issue time (unix millis) of the pending OAuth state token
pub const OAUTH_STATE_ISSUED_AT_KEY: &str = "oauth_state_issued_at";

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Storage file is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, StorageError>;

/// Minimal string key/value interface.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;

    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Remove `key`, returning the previous value if there was one.
    fn remove(&self, key: &str) -> Result<Option<String>>;

    /// Remove `key` and return its value in one step.
    fn take(&self, key: &str) -> Result<Option<String>> {
        self.remove(key)
    }
}
