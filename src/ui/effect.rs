//! Side effects requested by the reducer and how they are carried out.
//!
//! Every effect produces exactly one completion [`AppEvent`], on success and
//! on failure alike, so a busy flag claimed for it is always released.

use std::path::PathBuf;
use std::sync::Arc;

use crate::auth::{self, SessionStores};
use crate::config::{self, ThemeMode};
use crate::docs::{self, DocsError, Document, DocumentEntry, DocumentLibrary, SaveRequest, UploadResult};
use crate::github::{ApiError, ApiProvider, ContentsApi, RepoTarget};

use super::events::{AppEvent, Mutation, UploadSummary};

/// Side effects that should be executed outside the reducer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    RestoreSession,
    Login { token: String },
    LoadDocuments,
    OpenDocument(DocumentEntry),
    SaveDocument(SaveRequest),
    DeleteDocument(DocumentEntry),
    UploadFiles(Vec<PathBuf>),
    DownloadDocument(Document),
    SaveRepository(RepoTarget),
    SaveTheme(ThemeMode),
}

impl Effect {
    /// Effects that talk to the remote API and hold the busy flag.
    pub fn is_remote(&self) -> bool {
        !matches!(
            self,
            Effect::DownloadDocument(_) | Effect::SaveRepository(_) | Effect::SaveTheme(_)
        )
    }

    /// Status bar text while the effect runs
    pub fn label(&self) -> &'static str {
        match self {
            Effect::RestoreSession => "Restoring session...",
            Effect::Login { .. } => "Logging in...",
            Effect::LoadDocuments => "Loading documents...",
            Effect::OpenDocument(_) => "Opening document...",
            Effect::SaveDocument(_) => "Saving...",
            Effect::DeleteDocument(_) => "Deleting...",
            Effect::UploadFiles(_) => "Uploading...",
            Effect::DownloadDocument(_) => "Downloading...",
            Effect::SaveRepository(_) | Effect::SaveTheme(_) => "Saving settings...",
        }
    }
}

/// Everything an effect needs, cloned out of the app when it is spawned
#[derive(Clone)]
pub struct EffectContext {
    pub provider: Arc<dyn ApiProvider>,
    pub api: Option<Arc<dyn ContentsApi>>,
    pub stores: SessionStores,
    pub target: RepoTarget,
    pub config_path: PathBuf,
    pub download_dir: PathBuf,
}

impl EffectContext {
    fn library(&self) -> Result<DocumentLibrary<dyn ContentsApi>, String> {
        let api = self
            .api
            .clone()
            .ok_or_else(|| "Please log in first".to_string())?;
        Ok(DocumentLibrary::new(api, self.target.clone()))
    }
}

/// User-facing text for a library error.
pub fn describe(err: &DocsError) -> String {
    match err {
        DocsError::Api(api) if api.is_conflict() => format!(
            "The document changed in the repository since it was opened. \
             Reload it and try again. ({api})"
        ),
        DocsError::Api(ApiError::Unauthorized(_)) => {
            "GitHub rejected the token. Log in again.".to_string()
        }
        other => other.to_string(),
    }
}

fn mutation<T>(outcome: T, documents: docs::Result<Vec<DocumentEntry>>) -> Mutation<T> {
    Mutation {
        outcome,
        documents: documents.map_err(|e| describe(&e)),
    }
}

/// Carry out `effect` and report its completion.
pub async fn perform(ctx: EffectContext, effect: Effect) -> AppEvent {
    match effect {
        Effect::RestoreSession => {
            let provider = Arc::clone(&ctx.provider);
            let result = auth::restore(&ctx.stores, |token| provider.connect(token)).await;
            AppEvent::SessionRestored(result.map_err(|e| e.to_string()))
        }
        Effect::Login { token } => {
            let api = ctx.provider.connect(token.trim());
            let result = auth::login(api.as_ref(), &ctx.stores, &token).await;
            AppEvent::LoggedIn(result.map_err(|e| e.to_string()))
        }
        Effect::LoadDocuments => {
            let result = match ctx.library() {
                Ok(library) => library.list().await.map_err(|e| describe(&e)),
                Err(msg) => Err(msg),
            };
            AppEvent::DocumentsLoaded(result)
        }
        Effect::OpenDocument(entry) => {
            let result = match ctx.library() {
                Ok(library) => library.load(&entry).await.map_err(|e| describe(&e)),
                Err(msg) => Err(msg),
            };
            AppEvent::DocumentOpened(result)
        }
        Effect::SaveDocument(request) => {
            let result = match ctx.library() {
                Ok(library) => library
                    .save(&request)
                    .await
                    .map(|r| mutation(r.outcome, r.documents))
                    .map_err(|e| describe(&e)),
                Err(msg) => Err(msg),
            };
            AppEvent::DocumentSaved { request, result }
        }
        Effect::DeleteDocument(entry) => {
            let result = match ctx.library() {
                Ok(library) => library
                    .delete(&entry)
                    .await
                    .map(|r| mutation(entry.path.clone(), r.documents))
                    .map_err(|e| describe(&e)),
                Err(msg) => Err(msg),
            };
            AppEvent::DocumentDeleted(result)
        }
        Effect::UploadFiles(paths) => {
            let library = match ctx.library() {
                Ok(library) => library,
                Err(msg) => {
                    return AppEvent::FilesUploaded(UploadSummary {
                        problems: vec![msg],
                        ..UploadSummary::default()
                    })
                }
            };
            let report = library.upload_paths(&paths).await;
            let mut summary = UploadSummary {
                documents: report
                    .documents
                    .map(|docs| docs.map_err(|e| describe(&e))),
                ..UploadSummary::default()
            };
            for result in report.results {
                match result {
                    UploadResult::Uploaded(outcome) => summary.uploaded.push(outcome),
                    UploadResult::Skipped { file_name, reason } => {
                        summary.problems.push(format!("{file_name}: {reason}"))
                    }
                    UploadResult::Failed { file_name, error } => summary
                        .problems
                        .push(format!("{file_name}: {}", describe(&error))),
                }
            }
            AppEvent::FilesUploaded(summary)
        }
        Effect::DownloadDocument(document) => {
            let result = docs::download(&document, &ctx.download_dir)
                .await
                .map_err(|e| describe(&e));
            AppEvent::DocumentDownloaded(result)
        }
        Effect::SaveRepository(target) => AppEvent::ConfigSaved(
            config::save_repository_to(&ctx.config_path, &target).map_err(|e| e.to_string()),
        ),
        Effect::SaveTheme(mode) => AppEvent::ConfigSaved(
            config::save_theme_to(&ctx.config_path, mode).map_err(|e| e.to_string()),
        ),
    }
}
