use std::io::{BufRead, Write};
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context};

use super::{Command, RepoCommand, ThemeCommand};
use crate::auth::{self, Session, SessionStores};
use crate::config::{self, Config, ThemeMode};
use crate::docs::{self, DocumentEntry, DocumentLibrary, UploadResult, MARKDOWN_EXTENSION};
use crate::github::{ApiProvider, ContentsApi, RepoTarget};

/// Everything a subcommand needs
pub struct CommandContext {
    pub config: Config,
    pub config_path: PathBuf,
    pub stores: SessionStores,
    pub provider: Arc<dyn ApiProvider>,
}

impl CommandContext {
    /// Session from the stored token, and a client for it.
    async fn session(&self) -> anyhow::Result<(Session, Arc<dyn ContentsApi>)> {
        let provider = Arc::clone(&self.provider);
        let session = auth::restore(&self.stores, |token| provider.connect(token))
            .await?
            .context("Not logged in. Run `mdocs login --token <TOKEN>` first")?;
        let api = self.provider.connect(&session.token);
        Ok((session, api))
    }

    async fn library(&self) -> anyhow::Result<DocumentLibrary<dyn ContentsApi>> {
        if !self.config.repository.is_configured() {
            bail!("No repository configured. Run `mdocs repo set --owner <OWNER> --name <NAME>`");
        }
        let (_, api) = self.session().await?;
        Ok(DocumentLibrary::new(api, self.config.repository.clone()))
    }

    async fn find(
        &self,
        library: &DocumentLibrary<dyn ContentsApi>,
        name: &str,
    ) -> anyhow::Result<DocumentEntry> {
        let name = name.trim();
        let wanted = if name.ends_with(MARKDOWN_EXTENSION) {
            name.to_string()
        } else {
            format!("{name}{MARKDOWN_EXTENSION}")
        };
        library
            .list()
            .await?
            .into_iter()
            .find(|entry| entry.name == wanted)
            .with_context(|| format!("No document named {wanted} in {}", library.target()))
    }
}

fn read_token_from_stdin() -> anyhow::Result<String> {
    let mut line = String::new();
    std::io::stdin()
        .lock()
        .read_line(&mut line)
        .context("Failed to read token from stdin")?;
    Ok(line.trim().to_string())
}

/// Run one non-interactive command, writing results to `out`.
pub async fn run_command(
    command: Command,
    ctx: &CommandContext,
    out: &mut dyn Write,
) -> anyhow::Result<()> {
    match command {
        Command::Tui => bail!("The interactive interface is started by main"),
        Command::Login { token } => {
            let token = match token {
                Some(token) => token,
                None => read_token_from_stdin()?,
            };
            let api = ctx.provider.connect(token.trim());
            let session = auth::login(api.as_ref(), &ctx.stores, &token).await?;
            writeln!(out, "Logged in as {}", session.login())?;
        }
        Command::Logout => {
            auth::logout(&ctx.stores)?;
            writeln!(out, "Logged out")?;
        }
        Command::Whoami => {
            let (session, _) = ctx.session().await?;
            writeln!(out, "{}", session.login())?;
        }
        Command::Repo { command } => match command {
            RepoCommand::Show => {
                if ctx.config.repository.is_configured() {
                    writeln!(out, "{}", ctx.config.repository)?;
                } else {
                    writeln!(out, "No repository configured")?;
                }
            }
            RepoCommand::Set {
                owner,
                name,
                path,
                branch,
            } => {
                let target = RepoTarget::new(owner, name, path, branch);
                if !target.is_configured() {
                    bail!("Owner and name must not be empty");
                }
                config::save_repository_to(&ctx.config_path, &target).with_context(|| {
                    format!("Failed to write {}", ctx.config_path.display())
                })?;
                writeln!(out, "Repository set to {target}")?;
            }
        },
        Command::List { filter, json } => {
            let library = ctx.library().await?;
            let entries = library.list().await?;
            let visible = docs::search(&entries, filter.as_deref().unwrap_or_default());
            if json {
                writeln!(out, "{}", serde_json::to_string_pretty(&visible)?)?;
            } else {
                for entry in visible {
                    writeln!(out, "{}", entry.name)?;
                }
            }
        }
        Command::Show { name } => {
            let library = ctx.library().await?;
            let entry = ctx.find(&library, &name).await?;
            let document = library.load(&entry).await?;
            write!(out, "{}", document.content)?;
            if !document.content.ends_with('\n') {
                writeln!(out)?;
            }
        }
        Command::Download { name, out: dir } => {
            let library = ctx.library().await?;
            let entry = ctx.find(&library, &name).await?;
            let document = library.load(&entry).await?;
            let path = docs::download(&document, &dir).await?;
            writeln!(out, "Saved {}", path.display())?;
        }
        Command::Upload { files } => {
            let library = ctx.library().await?;
            let report = library.upload_paths(&files).await;
            let mut failures = 0;
            for result in &report.results {
                match result {
                    UploadResult::Uploaded(outcome) => writeln!(out, "Uploaded {}", outcome.path)?,
                    UploadResult::Skipped { file_name, reason } => {
                        failures += 1;
                        writeln!(out, "Skipped {file_name}: {reason}")?;
                    }
                    UploadResult::Failed { file_name, error } => {
                        failures += 1;
                        writeln!(out, "Failed {file_name}: {error}")?;
                    }
                }
            }
            if let Some(Err(e)) = &report.documents {
                tracing::warn!(error = %e, "Listing reload after upload failed");
            }
            if failures > 0 {
                bail!("{failures} of {} file(s) were not uploaded", files.len());
            }
        }
        Command::Delete { name, yes } => {
            if !yes {
                bail!("Refusing to delete {name} without --yes");
            }
            let library = ctx.library().await?;
            let entry = ctx.find(&library, &name).await?;
            library.delete(&entry).await?;
            writeln!(out, "Deleted {}", entry.path)?;
        }
        Command::Theme { command } => {
            let mode = match command {
                ThemeCommand::Show => {
                    writeln!(out, "{}", ctx.config.theme)?;
                    return Ok(());
                }
                ThemeCommand::Toggle => ctx.config.theme.toggled(),
                ThemeCommand::Set { mode } => ThemeMode::from(mode),
            };
            config::save_theme_to(&ctx.config_path, mode)
                .with_context(|| format!("Failed to write {}", ctx.config_path.display()))?;
            writeln!(out, "Theme set to {mode}")?;
        }
    }
    Ok(())
}
