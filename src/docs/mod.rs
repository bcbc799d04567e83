//! Markdown documents stored in a repository directory.

mod library;
mod models;

pub use library::{
    download, search, validate_file_name, DocsError, DocumentLibrary, Refreshed, Result,
    UploadReport, UploadResult,
};
pub use models::{
    is_markdown_name, Document, DocumentEntry, SaveOutcome, SaveRequest, MARKDOWN_EXTENSION,
};
