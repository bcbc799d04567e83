//! Command-line interface: the TUI by default, plus scriptable subcommands.

mod commands;

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::auth::SessionStores;
use crate::config::{Config, ThemeMode};
use crate::github::{ApiProvider, GitHubClient};
use crate::storage::{FileStore, MemoryStore};
use crate::util;

pub use commands::{run_command, CommandContext};

/// mdocs - markdown documents in a GitHub repository.
#[derive(Parser, Debug)]
#[command(name = "mdocs", version, about, long_about = None)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Arguments that apply to every command.
#[derive(Args, Debug, Default, Clone)]
pub struct GlobalArgs {
    /// Data directory holding config, token storage and logs.
    #[arg(long = "data-dir", env = "MDOCS_DATA_DIR", global = true)]
    pub data_dir: Option<PathBuf>,

    /// Override the API base URL from the config file.
    #[arg(long = "api-url", env = "MDOCS_API_URL", global = true)]
    pub api_url: Option<String>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Open the full-screen interface (default).
    Tui,

    /// Validate a personal access token and store it.
    Login {
        /// Token; read from stdin when omitted.
        #[arg(long, env = "MDOCS_TOKEN", hide_env_values = true)]
        token: Option<String>,
    },

    /// Remove the stored token.
    Logout,

    /// Show the account the stored token belongs to.
    Whoami,

    /// Show or change the repository that holds the documents.
    Repo {
        #[command(subcommand)]
        command: RepoCommand,
    },

    /// List documents.
    List {
        /// Only names containing this text (case-insensitive).
        #[arg(long, short)]
        filter: Option<String>,

        /// Print JSON instead of names.
        #[arg(long)]
        json: bool,
    },

    /// Print a document's markdown.
    Show {
        /// Document name, with or without `.md`.
        name: String,
    },

    /// Save a document to a local directory.
    Download {
        name: String,

        /// Directory to write into.
        #[arg(long, short, default_value = ".")]
        out: PathBuf,
    },

    /// Upload local markdown files as new documents.
    Upload {
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },

    /// Delete a document.
    Delete {
        name: String,

        /// Confirm the deletion.
        #[arg(long, short)]
        yes: bool,
    },

    /// Show or change the color theme.
    Theme {
        #[command(subcommand)]
        command: ThemeCommand,
    },
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum RepoCommand {
    /// Print the configured repository.
    Show,

    /// Set the repository and save it to the config file.
    Set {
        #[arg(long)]
        owner: String,

        #[arg(long)]
        name: String,

        /// Directory inside the repository.
        #[arg(long, default_value = crate::github::DEFAULT_BASE_PATH)]
        path: String,

        #[arg(long, default_value = crate::github::DEFAULT_BRANCH)]
        branch: String,
    },
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum ThemeCommand {
    Show,
    Toggle,
    Set { mode: ThemeArg },
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThemeArg {
    Dark,
    Light,
}

impl From<ThemeArg> for ThemeMode {
    fn from(arg: ThemeArg) -> Self {
        match arg {
            ThemeArg::Dark => ThemeMode::Dark,
            ThemeArg::Light => ThemeMode::Light,
        }
    }
}

impl GlobalArgs {
    /// Load config, open the stores and build the API client.
    ///
    /// Call after [`util::init_data_dir`].
    pub fn context(&self) -> anyhow::Result<CommandContext> {
        let config_path = util::config_path();
        let mut config = Config::load_from(&config_path);
        if let Some(url) = &self.api_url {
            config = config.with_api_base_url(url.trim_end_matches('/'));
        }

        let persistent = FileStore::open(util::storage_path())?;
        let stores = SessionStores::new(Arc::new(persistent), Arc::new(MemoryStore::new()));
        let provider: Arc<dyn ApiProvider> = Arc::new(GitHubClient::new(&config.api.base_url));

        Ok(CommandContext {
            config,
            config_path,
            stores,
            provider,
        })
    }
}
