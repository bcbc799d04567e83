pub mod auth;
pub mod cli;
pub mod config;
pub mod docs;
pub mod github;
pub mod storage;
pub mod store;
pub mod ui;
pub mod util;
pub mod view;

pub use auth::{Session, SessionStores};
pub use config::{Config, ThemeMode};
pub use docs::{Document, DocumentEntry, DocumentLibrary};
pub use github::{ApiError, ContentsApi, GitHubClient, InMemoryContents, RepoTarget};
pub use store::AppStore;
pub use ui::App;
pub use view::Screen;
