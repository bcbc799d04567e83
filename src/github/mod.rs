//! Typed client for the repository contents API.

mod client;
pub mod codec;
mod error;
mod memory;
mod models;
mod target;

pub use client::{ApiProvider, ContentsApi, GitHubClient, CLIENT_USER_AGENT};
pub use error::ApiError;
pub use memory::{InMemoryContents, RecordedCommit};
pub use models::{
    ContentItem, ContentKind, DeleteContentRequest, PutContentRequest, PutContentResponse, User,
};
pub use target::{RepoTarget, DEFAULT_BASE_PATH, DEFAULT_BRANCH};
