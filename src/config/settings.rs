use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use toml_edit::{DocumentMut, Item, Table};

use crate::github::RepoTarget;
use crate::util::paths::config_path;

/// Example configuration file contents (bundled with the binary)
pub const EXAMPLE_CONFIG: &str = include_str!("config.toml.example");

/// Default hosting API endpoint
pub const DEFAULT_API_BASE_URL: &str = "https://api.github.com";

/// Default OAuth redirect for the experimental browser login
pub const DEFAULT_OAUTH_REDIRECT_URI: &str = "http://localhost:8976/callback";

/// Color scheme used by the TUI
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    #[default]
    Dark,
    Light,
}

impl ThemeMode {
    pub fn toggled(self) -> Self {
        match self {
            ThemeMode::Dark => ThemeMode::Light,
            ThemeMode::Light => ThemeMode::Dark,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ThemeMode::Dark => "dark",
            ThemeMode::Light => "light",
        }
    }
}

impl fmt::Display for ThemeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ThemeMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "dark" => Ok(ThemeMode::Dark),
            "light" => Ok(ThemeMode::Light),
            other => Err(format!("unknown theme mode: {other}")),
        }
    }
}

/// Remote API settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    /// Base URL of the hosting API
    pub base_url: String,
    /// OAuth application client id (browser login only)
    pub oauth_client_id: Option<String>,
    /// OAuth redirect URI registered with the application
    pub oauth_redirect_uri: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_BASE_URL.to_string(),
            oauth_client_id: None,
            oauth_redirect_uri: DEFAULT_OAUTH_REDIRECT_URI.to_string(),
        }
    }
}

/// Application configuration
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Config {
    /// Where documents live
    pub repository: RepoTarget,
    /// Color scheme
    pub theme: ThemeMode,
    /// Remote API settings
    pub api: ApiConfig,
}

/// TOML representation of the repository section
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TomlRepositoryConfig {
    pub owner: Option<String>,
    pub name: Option<String>,
    pub path: Option<String>,
    pub branch: Option<String>,
}

/// TOML representation of the theme section
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TomlThemeConfig {
    pub mode: Option<ThemeMode>,
}

/// TOML representation of the api section
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TomlApiConfig {
    pub base_url: Option<String>,
    pub oauth_client_id: Option<String>,
    pub oauth_redirect_uri: Option<String>,
}

/// TOML representation of the config file
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TomlConfig {
    pub repository: Option<TomlRepositoryConfig>,
    pub theme: Option<TomlThemeConfig>,
    pub api: Option<TomlApiConfig>,
}

impl Config {
    /// Load configuration from the default file, merging with defaults
    pub fn load() -> Self {
        Self::load_from(&config_path())
    }

    /// Load configuration from `config_file`, merging with defaults.
    ///
    /// A missing file is created from the bundled example. Unreadable or
    /// malformed files fall back to defaults with a warning in the log.
    pub fn load_from(config_file: &Path) -> Self {
        if !config_file.exists() {
            Self::create_default_config(config_file);
        }

        let contents = match fs::read_to_string(config_file) {
            Ok(contents) => contents,
            Err(e) => {
                tracing::warn!(path = %config_file.display(), error = %e, "Failed to read config");
                return Config::default();
            }
        };

        match toml::from_str::<TomlConfig>(&contents) {
            Ok(toml_config) => Config::default().merged(toml_config),
            Err(e) => {
                tracing::warn!(path = %config_file.display(), error = %e, "Failed to parse config");
                Config::default()
            }
        }
    }

    fn merged(mut self, toml_config: TomlConfig) -> Self {
        if let Some(repo) = toml_config.repository {
            if let Some(owner) = repo.owner {
                self.repository.owner = owner.trim().to_string();
            }
            if let Some(name) = repo.name {
                self.repository.name = name.trim().to_string();
            }
            if let Some(path) = repo.path {
                self.repository.path = path.trim().to_string();
            }
            if let Some(branch) = repo.branch.filter(|b| !b.trim().is_empty()) {
                self.repository.branch = branch.trim().to_string();
            }
        }

        if let Some(mode) = toml_config.theme.and_then(|theme| theme.mode) {
            self.theme = mode;
        }

        if let Some(api) = toml_config.api {
            if let Some(base_url) = api.base_url.filter(|u| !u.trim().is_empty()) {
                self.api.base_url = base_url.trim().trim_end_matches('/').to_string();
            }
            self.api.oauth_client_id = api.oauth_client_id.filter(|id| !id.trim().is_empty());
            if let Some(redirect) = api.oauth_redirect_uri {
                self.api.oauth_redirect_uri = redirect;
            }
        }

        self
    }

    /// Create the default config file from the bundled example
    fn create_default_config(path: &Path) {
        if let Some(parent) = path.parent() {
            if !parent.exists() {
                if let Err(e) = fs::create_dir_all(parent) {
                    tracing::warn!(error = %e, "Failed to create config directory");
                    return;
                }
            }
        }

        if let Err(e) = fs::write(path, EXAMPLE_CONFIG) {
            tracing::warn!(error = %e, "Failed to write default config");
        }
    }

    pub fn with_repository(mut self, repository: RepoTarget) -> Self {
        self.repository = repository;
        self
    }

    pub fn with_api_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.api.base_url = base_url.into();
        self
    }
}

fn read_document(config_file: &Path) -> std::io::Result<DocumentMut> {
    let contents = if config_file.exists() {
        fs::read_to_string(config_file)?
    } else {
        String::new()
    };

    contents
        .parse()
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))
}

fn write_document(config_file: &Path, doc: &DocumentMut) -> std::io::Result<()> {
    if let Some(parent) = config_file.parent() {
        if !parent.exists() {
            fs::create_dir_all(parent)?;
        }
    }
    fs::write(config_file, doc.to_string())
}

fn ensure_table(doc: &mut DocumentMut, key: &str) {
    if !doc.contains_key(key) || !doc[key].is_table() {
        doc[key] = Item::Table(Table::new());
    }
}

/// Save the repository target to the config file.
pub fn save_repository(target: &RepoTarget) -> std::io::Result<()> {
    save_repository_to(&config_path(), target)
}

/// Save the repository target into `config_file`, preserving all other content.
pub fn save_repository_to(config_file: &Path, target: &RepoTarget) -> std::io::Result<()> {
    let mut doc = read_document(config_file)?;
    ensure_table(&mut doc, "repository");

    doc["repository"]["owner"] = toml_edit::value(target.owner.as_str());
    doc["repository"]["name"] = toml_edit::value(target.name.as_str());
    doc["repository"]["path"] = toml_edit::value(target.path.as_str());
    doc["repository"]["branch"] = toml_edit::value(target.branch.as_str());

    write_document(config_file, &doc)
}

/// Save the selected theme mode to the config file.
pub fn save_theme(mode: ThemeMode) -> std::io::Result<()> {
    save_theme_to(&config_path(), mode)
}

/// Save the theme mode into `config_file`, preserving all other content.
pub fn save_theme_to(config_file: &Path, mode: ThemeMode) -> std::io::Result<()> {
    let mut doc = read_document(config_file)?;
    ensure_table(&mut doc, "theme");
    doc["theme"]["mode"] = toml_edit::value(mode.as_str());
    write_document(config_file, &doc)
}
