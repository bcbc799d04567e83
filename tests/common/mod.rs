//! Shared test utilities for mdocs
//!
//! - A fake GitHub contents server over real HTTP
//! - Application fixtures backed by in-memory stores
//! - TUI rendering helpers

#![allow(dead_code)]

pub mod fake_github;
pub mod terminal;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crossterm::event::{Event, KeyCode, KeyEvent, KeyModifiers};
use mdocs::storage::MemoryStore;
use mdocs::ui::AppEvent;
use mdocs::{App, Config, InMemoryContents, RepoTarget, SessionStores};

pub const TOKEN: &str = "ghp_test";
pub const LOGIN: &str = "octo";

pub fn target() -> RepoTarget {
    RepoTarget::new("octo", "handbook", "docs/", "main")
}

pub fn memory_stores() -> SessionStores {
    SessionStores::new(Arc::new(MemoryStore::new()), Arc::new(MemoryStore::new()))
}

/// In-memory repository that accepts [`TOKEN`] as [`LOGIN`].
pub fn contents() -> InMemoryContents {
    let api = InMemoryContents::new();
    api.add_user(TOKEN, LOGIN);
    api
}

/// App pointed at [`target`], writing config and downloads under `dir`.
pub fn app(api: &InMemoryContents, stores: SessionStores, dir: &Path) -> App {
    let config = Config::default().with_repository(target());
    App::new(
        config,
        dir.join("config.toml"),
        stores,
        Arc::new(api.clone()),
    )
    .with_download_dir(dir.join("downloads"))
}

pub fn key(code: KeyCode) -> AppEvent {
    AppEvent::Input(Event::Key(KeyEvent::new(code, KeyModifiers::NONE)))
}

pub fn char_key(c: char) -> AppEvent {
    key(KeyCode::Char(c))
}

pub fn ctrl(c: char) -> AppEvent {
    AppEvent::Input(Event::Key(KeyEvent::new(
        KeyCode::Char(c),
        KeyModifiers::CONTROL,
    )))
}

pub fn paste(text: &str) -> AppEvent {
    AppEvent::Input(Event::Paste(text.to_string()))
}

/// Feed `events` to `app` one at a time, running effects inline.
pub async fn press(app: &mut App, events: impl IntoIterator<Item = AppEvent>) {
    for event in events {
        app.process(event).await;
    }
}

/// Write `files` into `dir` and return their paths.
pub fn write_files(dir: &Path, files: &[(&str, &str)]) -> Vec<PathBuf> {
    files
        .iter()
        .map(|(name, text)| {
            let path = dir.join(name);
            std::fs::write(&path, text).expect("Failed to write fixture file");
            path
        })
        .collect()
}
