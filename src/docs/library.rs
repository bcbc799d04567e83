//! Document operations against one repository target.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use thiserror::Error;

use super::models::{is_markdown_name, Document, DocumentEntry, SaveOutcome, SaveRequest};
use crate::github::{
    codec, ApiError, ContentsApi, DeleteContentRequest, PutContentRequest, RepoTarget,
};

#[derive(Error, Debug)]
pub enum DocsError {
    #[error("Configure repository settings first")]
    NotConfigured,
    #[error("Please enter a file name")]
    EmptyFileName,
    #[error("Only .md files are supported: {0}")]
    NotMarkdown(String),
    #[error("File name must not contain path separators: {0}")]
    InvalidFileName(String),
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl DocsError {
    /// True for errors raised locally, before any request was sent.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            DocsError::NotConfigured
                | DocsError::EmptyFileName
                | DocsError::NotMarkdown(_)
                | DocsError::InvalidFileName(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, DocsError>;

/// Outcome of a mutation plus the listing reloaded after it.
///
/// The reload is a separate request: a failed reload does not undo the
/// commit, so it is reported on its own.
#[derive(Debug)]
pub struct Refreshed<T> {
    pub outcome: T,
    pub documents: Result<Vec<DocumentEntry>>,
}

/// Per-file result of a batch upload
#[derive(Debug)]
pub enum UploadResult {
    Uploaded(SaveOutcome),
    Skipped { file_name: String, reason: DocsError },
    Failed { file_name: String, error: DocsError },
}

/// Summary of [`DocumentLibrary::upload_paths`]
#[derive(Debug, Default)]
pub struct UploadReport {
    pub results: Vec<UploadResult>,
    /// Listing after the last successful upload, if any upload succeeded
    pub documents: Option<Result<Vec<DocumentEntry>>>,
}

impl UploadReport {
    pub fn uploaded(&self) -> usize {
        self.results
            .iter()
            .filter(|r| matches!(r, UploadResult::Uploaded(_)))
            .count()
    }
}

/// Validate a document file name before any request is made.
pub fn validate_file_name(file_name: &str) -> Result<&str> {
    let file_name = file_name.trim();
    if file_name.is_empty() {
        return Err(DocsError::EmptyFileName);
    }
    if file_name.contains('/') || file_name.contains('\\') {
        return Err(DocsError::InvalidFileName(file_name.to_string()));
    }
    if !is_markdown_name(file_name) {
        return Err(DocsError::NotMarkdown(file_name.to_string()));
    }
    Ok(file_name)
}

/// Case-insensitive substring filter on document names.
pub fn search<'a>(entries: &'a [DocumentEntry], query: &str) -> Vec<&'a DocumentEntry> {
    let query = query.trim().to_lowercase();
    entries
        .iter()
        .filter(|entry| query.is_empty() || entry.name.to_lowercase().contains(&query))
        .collect()
}

/// Documents stored under a [`RepoTarget`].
pub struct DocumentLibrary<A: ContentsApi + ?Sized> {
    api: Arc<A>,
    target: RepoTarget,
}

impl<A: ContentsApi + ?Sized> Clone for DocumentLibrary<A> {
    fn clone(&self) -> Self {
        Self {
            api: Arc::clone(&self.api),
            target: self.target.clone(),
        }
    }
}

impl<A: ContentsApi + ?Sized> DocumentLibrary<A> {
    pub fn new(api: Arc<A>, target: RepoTarget) -> Self {
        Self { api, target }
    }

    pub fn target(&self) -> &RepoTarget {
        &self.target
    }

    pub fn api(&self) -> &Arc<A> {
        &self.api
    }

    fn ensure_configured(&self) -> Result<()> {
        if self.target.is_configured() {
            Ok(())
        } else {
            Err(DocsError::NotConfigured)
        }
    }

    /// Markdown files directly under the base path. A missing directory is an
    /// empty listing.
    pub async fn list(&self) -> Result<Vec<DocumentEntry>> {
        self.ensure_configured()?;

        let items = match self
            .api
            .list_directory(&self.target, self.target.directory())
            .await
        {
            Ok(items) => items,
            Err(err) if err.is_not_found() => {
                tracing::debug!(target_repo = %self.target, "Document directory does not exist yet");
                return Ok(Vec::new());
            }
            Err(err) => return Err(err.into()),
        };

        let mut entries: Vec<DocumentEntry> = items
            .into_iter()
            .filter(|item| item.is_file() && is_markdown_name(&item.name))
            .map(DocumentEntry::from)
            .collect();
        entries.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));

        tracing::debug!(count = entries.len(), "Listed documents");
        Ok(entries)
    }

    /// Fetch the full text of `entry`.
    pub async fn load(&self, entry: &DocumentEntry) -> Result<Document> {
        self.ensure_configured()?;

        let item = self.api.get_file(&self.target, &entry.path).await?;
        let encoded = item
            .content
            .as_deref()
            .ok_or_else(|| ApiError::Decode(format!("{} has no content", entry.path)))?;
        let content = codec::decode_content(encoded)?;

        Ok(Document {
            entry: DocumentEntry {
                name: item.name,
                path: item.path,
                sha: item.sha,
                download_url: item.download_url.or_else(|| entry.download_url.clone()),
            },
            content,
        })
    }

    async fn put(
        &self,
        file_name: &str,
        body: &str,
        message: String,
        sha: Option<&str>,
    ) -> Result<SaveOutcome> {
        let path = self.target.file_path(file_name);
        let request = PutContentRequest {
            message: message.clone(),
            content: codec::encode_content(body),
            branch: self.target.branch.clone(),
            sha: sha.map(str::to_string),
        };

        let response = self.api.put_file(&self.target, &path, &request).await?;
        tracing::info!(%path, created = sha.is_none(), "Committed document");

        Ok(SaveOutcome {
            path,
            created: sha.is_none(),
            message,
            entry: DocumentEntry::from(response.content),
        })
    }

    /// Create or update a document from the editor, then reload the listing.
    ///
    /// Saving under the name the editor was opened with is an update carrying
    /// the original hash; any other name is a create.
    pub async fn save(&self, request: &SaveRequest) -> Result<Refreshed<SaveOutcome>> {
        let file_name = validate_file_name(&request.file_name)?;
        self.ensure_configured()?;

        let sha = request.update_sha();
        let message = match sha {
            Some(_) => format!("Update {file_name}"),
            None => format!("Create {file_name}"),
        };

        let outcome = self.put(file_name, &request.body, message, sha).await?;
        Ok(Refreshed {
            outcome,
            documents: self.list().await,
        })
    }

    /// Upload one local document as a new file, then reload the listing.
    pub async fn upload(&self, file_name: &str, content: &str) -> Result<Refreshed<SaveOutcome>> {
        let file_name = validate_file_name(file_name)?;
        self.ensure_configured()?;

        let outcome = self
            .put(file_name, content, format!("Upload {file_name}"), None)
            .await?;
        Ok(Refreshed {
            outcome,
            documents: self.list().await,
        })
    }

    /// Upload local files one after another. Non-markdown files are skipped
    /// without touching the network.
    pub async fn upload_paths(&self, paths: &[PathBuf]) -> UploadReport {
        let mut report = UploadReport::default();

        for path in paths {
            let file_name = path
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_default();

            if let Err(reason) = validate_file_name(&file_name) {
                tracing::info!(file = %path.display(), %reason, "Skipping upload");
                report.results.push(UploadResult::Skipped { file_name, reason });
                continue;
            }

            let content = match tokio::fs::read_to_string(path).await {
                Ok(content) => content,
                Err(e) => {
                    report.results.push(UploadResult::Failed {
                        file_name,
                        error: e.into(),
                    });
                    continue;
                }
            };

            match self.upload(&file_name, &content).await {
                Ok(refreshed) => {
                    report.documents = Some(refreshed.documents);
                    report.results.push(UploadResult::Uploaded(refreshed.outcome));
                }
                Err(error) => {
                    tracing::warn!(%file_name, %error, "Upload failed");
                    report.results.push(UploadResult::Failed { file_name, error });
                }
            }
        }

        report
    }

    /// Delete `entry` using its hash, then reload the listing.
    pub async fn delete(&self, entry: &DocumentEntry) -> Result<Refreshed<()>> {
        self.ensure_configured()?;

        let request = DeleteContentRequest {
            message: format!("Delete {}", entry.name),
            sha: entry.sha.clone(),
            branch: self.target.branch.clone(),
        };
        self.api
            .delete_file(&self.target, &entry.path, &request)
            .await?;
        tracing::info!(path = %entry.path, "Deleted document");

        Ok(Refreshed {
            outcome: (),
            documents: self.list().await,
        })
    }
}

/// Write `document` into `dir` under its own name and return the file path.
pub async fn download(document: &Document, dir: &Path) -> Result<PathBuf> {
    let file_name = validate_file_name(document.name())?;
    tokio::fs::create_dir_all(dir).await?;
    let path = dir.join(file_name);
    tokio::fs::write(&path, document.content.as_bytes()).await?;
    tracing::info!(path = %path.display(), "Downloaded document");
    Ok(path)
}
