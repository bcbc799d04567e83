//! In-process [`ContentsApi`] with the remote's concurrency rules.
//!
//! Lets the whole application run without network access. Writes follow the
//! hosting API: updating or deleting requires the current content hash, and a
//! missing or stale hash is rejected with the same statuses the remote uses.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use sha2::{Digest, Sha256};

use super::client::Result;
use super::{
    codec, ApiError, ContentItem, ContentKind, ContentsApi, DeleteContentRequest,
    ApiProvider, PutContentRequest, PutContentResponse, RepoTarget, User,
};

#[derive(Debug, Clone)]
struct StoredFile {
    text: String,
    sha: String,
}

/// A commit recorded by the in-memory store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedCommit {
    pub path: String,
    pub message: String,
    pub branch: String,
}

#[derive(Default)]
struct Inner {
    /// path -> file
    files: BTreeMap<String, StoredFile>,
    /// token -> login
    users: HashMap<String, String>,
    commits: Vec<RecordedCommit>,
    fail_next: Option<ApiError>,
}

/// Repository contents held in memory.
///
/// Handles made with [`InMemoryContents::with_token`] share one repository.
#[derive(Default, Clone)]
pub struct InMemoryContents {
    token: Option<String>,
    inner: Arc<Mutex<Inner>>,
    requests: Arc<AtomicUsize>,
}

impl InMemoryContents {
    pub fn new() -> Self {
        Self::default()
    }

    /// Authenticate subsequent calls as `token`.
    pub fn authenticated_as(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Handle on the same repository that authenticates with `token`.
    pub fn with_token(&self, token: impl Into<String>) -> Self {
        Self {
            token: Some(token.into()),
            inner: Arc::clone(&self.inner),
            requests: Arc::clone(&self.requests),
        }
    }

    /// Accept `token` as a credential belonging to `login`.
    pub fn add_user(&self, token: &str, login: &str) {
        self.inner
            .lock()
            .users
            .insert(token.to_string(), login.to_string());
    }

    /// Seed a file without recording a commit.
    pub fn insert_file(&self, path: &str, text: &str) -> String {
        let sha = content_sha(path, text);
        self.inner.lock().files.insert(
            path.to_string(),
            StoredFile {
                text: text.to_string(),
                sha: sha.clone(),
            },
        );
        sha
    }

    pub fn file_text(&self, path: &str) -> Option<String> {
        self.inner.lock().files.get(path).map(|f| f.text.clone())
    }

    pub fn file_sha(&self, path: &str) -> Option<String> {
        self.inner.lock().files.get(path).map(|f| f.sha.clone())
    }

    pub fn commits(&self) -> Vec<RecordedCommit> {
        self.inner.lock().commits.clone()
    }

    /// Number of API calls made so far.
    pub fn request_count(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }

    /// Make the next call fail with `err`.
    pub fn fail_next(&self, err: ApiError) {
        self.inner.lock().fail_next = Some(err);
    }

    /// Count the call, apply an injected failure and check the credential.
    fn begin(&self) -> Result<parking_lot::MutexGuard<'_, Inner>> {
        self.requests.fetch_add(1, Ordering::SeqCst);
        let mut inner = self.inner.lock();
        if let Some(err) = inner.fail_next.take() {
            return Err(err);
        }
        let authorized = self
            .token
            .as_ref()
            .is_some_and(|token| inner.users.contains_key(token));
        if !authorized {
            return Err(ApiError::Unauthorized("Bad credentials".to_string()));
        }
        Ok(inner)
    }
}

fn content_sha(path: &str, text: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(path.as_bytes());
    hasher.update([0u8]);
    hasher.update(text.as_bytes());
    hasher
        .finalize()
        .iter()
        .take(20)
        .map(|b| format!("{b:02x}"))
        .collect()
}

fn file_name(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

fn file_item(path: &str, file: &StoredFile, with_content: bool) -> ContentItem {
    ContentItem {
        name: file_name(path).to_string(),
        path: path.to_string(),
        sha: file.sha.clone(),
        kind: ContentKind::File,
        size: file.text.len() as u64,
        download_url: Some(format!("memory://{path}")),
        content: with_content.then(|| codec::encode_content(&file.text)),
        encoding: with_content.then(|| "base64".to_string()),
    }
}

fn dir_item(path: &str) -> ContentItem {
    ContentItem {
        name: file_name(path).to_string(),
        path: path.to_string(),
        sha: content_sha(path, ""),
        kind: ContentKind::Dir,
        size: 0,
        download_url: None,
        content: None,
        encoding: None,
    }
}

fn not_found() -> ApiError {
    ApiError::NotFound("Not Found".to_string())
}

#[async_trait]
impl ContentsApi for InMemoryContents {
    async fn current_user(&self) -> Result<User> {
        let inner = self.begin()?;
        let login = self
            .token
            .as_ref()
            .and_then(|token| inner.users.get(token))
            .cloned()
            .ok_or_else(|| ApiError::Unauthorized("Bad credentials".to_string()))?;
        Ok(User { login, name: None })
    }

    async fn list_directory(&self, _target: &RepoTarget, dir: &str) -> Result<Vec<ContentItem>> {
        let inner = self.begin()?;
        let dir = dir.trim_matches('/');
        let prefix = if dir.is_empty() {
            String::new()
        } else {
            format!("{dir}/")
        };

        let mut items = Vec::new();
        let mut subdirs = BTreeSet::new();
        for (path, file) in inner.files.iter() {
            let Some(rest) = path.strip_prefix(&prefix) else {
                continue;
            };
            match rest.split_once('/') {
                Some((sub, _)) => {
                    subdirs.insert(format!("{prefix}{sub}"));
                }
                None => items.push(file_item(path, file, false)),
            }
        }

        if items.is_empty() && subdirs.is_empty() && !dir.is_empty() {
            return Err(not_found());
        }

        items.extend(subdirs.iter().map(|d| dir_item(d)));
        Ok(items)
    }

    async fn get_file(&self, _target: &RepoTarget, path: &str) -> Result<ContentItem> {
        let inner = self.begin()?;
        inner
            .files
            .get(path)
            .map(|file| file_item(path, file, true))
            .ok_or_else(not_found)
    }

    async fn put_file(
        &self,
        target: &RepoTarget,
        path: &str,
        request: &PutContentRequest,
    ) -> Result<PutContentResponse> {
        let mut inner = self.begin()?;
        let text = codec::decode_content(&request.content).map_err(|e| ApiError::Rejected {
            status: 422,
            message: e.to_string(),
        })?;

        match (inner.files.get(path), request.sha.as_deref()) {
            (Some(_), None) => {
                return Err(ApiError::Rejected {
                    status: 422,
                    message: "Invalid request.\n\n\"sha\" wasn't supplied.".to_string(),
                });
            }
            (Some(existing), Some(sha)) if existing.sha != sha => {
                return Err(ApiError::Rejected {
                    status: 409,
                    message: format!("{path} does not match {sha}"),
                });
            }
            (None, Some(sha)) => {
                return Err(ApiError::Rejected {
                    status: 409,
                    message: format!("{path} does not match {sha}"),
                });
            }
            _ => {}
        }

        let file = StoredFile {
            sha: content_sha(path, &text),
            text,
        };
        let item = file_item(path, &file, false);
        inner.files.insert(path.to_string(), file);
        inner.commits.push(RecordedCommit {
            path: path.to_string(),
            message: request.message.clone(),
            branch: if request.branch.is_empty() {
                target.branch.clone()
            } else {
                request.branch.clone()
            },
        });

        Ok(PutContentResponse { content: item })
    }

    async fn delete_file(
        &self,
        _target: &RepoTarget,
        path: &str,
        request: &DeleteContentRequest,
    ) -> Result<()> {
        let mut inner = self.begin()?;
        let existing = inner.files.get(path).ok_or_else(not_found)?;
        if existing.sha != request.sha {
            return Err(ApiError::Rejected {
                status: 409,
                message: format!("{path} does not match {}", request.sha),
            });
        }

        inner.files.remove(path);
        inner.commits.push(RecordedCommit {
            path: path.to_string(),
            message: request.message.clone(),
            branch: request.branch.clone(),
        });
        Ok(())
    }
}

impl ApiProvider for InMemoryContents {
    fn connect(&self, token: &str) -> Arc<dyn ContentsApi> {
        Arc::new(self.with_token(token))
    }
}
