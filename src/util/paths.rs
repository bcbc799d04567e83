//! Locations of the files mdocs keeps between runs.
//!
//! Everything lives under one data directory (`~/.mdocs` unless overridden
//! with `--data-dir`):
//!
//! ```text
//! config.toml     repository, theme and API settings
//! storage.json    long-lived key/value store (access token)
//! logs/mdocs.log  tracing output
//! ```

use std::path::PathBuf;
use std::sync::OnceLock;

const DIR_NAME: &str = ".mdocs";

static DATA_DIR: OnceLock<PathBuf> = OnceLock::new();

/// Fix the data directory for this process. Call once, early in `main`;
/// later calls are ignored.
pub fn init_data_dir(custom_path: Option<PathBuf>) {
    let path = custom_path.unwrap_or_else(home_data_dir);
    if let Err(rejected) = DATA_DIR.set(path) {
        tracing::debug!(
            rejected = %rejected.display(),
            current = %data_dir().display(),
            "Data directory was already set"
        );
    }
}

fn home_data_dir() -> PathBuf {
    match dirs::home_dir() {
        Some(home) => home.join(DIR_NAME),
        None => PathBuf::from(DIR_NAME),
    }
}

/// The data directory chosen by [`init_data_dir`], or `~/.mdocs`.
pub fn data_dir() -> PathBuf {
    DATA_DIR.get().cloned().unwrap_or_else(home_data_dir)
}

pub fn logs_dir() -> PathBuf {
    data_dir().join("logs")
}

pub fn log_file_path() -> PathBuf {
    logs_dir().join("mdocs.log")
}

pub fn config_path() -> PathBuf {
    data_dir().join("config.toml")
}

pub fn storage_path() -> PathBuf {
    data_dir().join("storage.json")
}
