use serde::{Deserialize, Serialize};

/// Authenticated account returned by `GET /user`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub login: String,
    #[serde(default)]
    pub name: Option<String>,
}

/// Kind of a directory entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentKind {
    File,
    Dir,
    Symlink,
    Submodule,
}

/// One entry of a `GET contents/{path}` response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentItem {
    pub name: String,
    pub path: String,
    pub sha: String,
    #[serde(rename = "type")]
    pub kind: ContentKind,
    #[serde(default)]
    pub size: u64,
    #[serde(default)]
    pub download_url: Option<String>,
    /// Present only when a single file is requested
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub encoding: Option<String>,
}

impl ContentItem {
    pub fn is_file(&self) -> bool {
        self.kind == ContentKind::File
    }
}

/// `GET contents/{path}` returns an array for directories and an object for files.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum ContentsResponse {
    Directory(Vec<ContentItem>),
    File(Box<ContentItem>),
}

impl ContentsResponse {
    pub(crate) fn into_items(self) -> Vec<ContentItem> {
        match self {
            ContentsResponse::Directory(items) => items,
            ContentsResponse::File(item) => vec![*item],
        }
    }
}

/// Body of `PUT contents/{path}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PutContentRequest {
    pub message: String,
    /// Base64 of the UTF-8 document body
    pub content: String,
    pub branch: String,
    /// Hash of the content being replaced; absent for a create
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sha: Option<String>,
}

/// Body of `DELETE contents/{path}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteContentRequest {
    pub message: String,
    pub sha: String,
    pub branch: String,
}

/// Subset of the `PUT contents/{path}` response we care about
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PutContentResponse {
    pub content: ContentItem,
}

/// Error body returned by the API on non-success statuses
#[derive(Debug, Default, Deserialize)]
pub(crate) struct ErrorBody {
    #[serde(default)]
    pub message: Option<String>,
}
