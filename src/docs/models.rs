use serde::{Deserialize, Serialize};

use crate::github::ContentItem;

/// Extension every managed document carries
pub const MARKDOWN_EXTENSION: &str = ".md";

/// One document in a listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentEntry {
    pub name: String,
    pub path: String,
    /// Content hash; the concurrency token for updates and deletes
    pub sha: String,
    pub download_url: Option<String>,
}

impl From<ContentItem> for DocumentEntry {
    fn from(item: ContentItem) -> Self {
        Self {
            name: item.name,
            path: item.path,
            sha: item.sha,
            download_url: item.download_url,
        }
    }
}

/// A loaded document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub entry: DocumentEntry,
    pub content: String,
}

impl Document {
    pub fn name(&self) -> &str {
        &self.entry.name
    }

    pub fn path(&self) -> &str {
        &self.entry.path
    }

    pub fn sha(&self) -> &str {
        &self.entry.sha
    }
}

/// What the editor submits on save
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveRequest {
    pub file_name: String,
    pub body: String,
    /// Document the editor was opened on, if any
    pub original: Option<DocumentEntry>,
}

impl SaveRequest {
    /// Hash to send: only when saving back to the file the editor opened.
    pub fn update_sha(&self) -> Option<&str> {
        self.original
            .as_ref()
            .filter(|entry| entry.name == self.file_name.trim())
            .map(|entry| entry.sha.as_str())
    }
}

/// Result of a successful save
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveOutcome {
    pub path: String,
    /// True when a new file was created, false for an update
    pub created: bool,
    pub message: String,
    /// The committed file, carrying its new hash
    pub entry: DocumentEntry,
}

/// Whether `name` is a markdown document name.
pub fn is_markdown_name(name: &str) -> bool {
    name.len() > MARKDOWN_EXTENSION.len() && name.ends_with(MARKDOWN_EXTENSION)
}
