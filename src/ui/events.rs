use std::path::PathBuf;

use crate::auth::Session;
use crate::docs::{Document, DocumentEntry, SaveOutcome, SaveRequest};

/// Result of a mutation and of the listing reload that followed it
#[derive(Debug, Clone)]
pub struct Mutation<T> {
    pub outcome: T,
    pub documents: Result<Vec<DocumentEntry>, String>,
}

/// Result of a batch upload
#[derive(Debug, Clone, Default)]
pub struct UploadSummary {
    pub uploaded: Vec<SaveOutcome>,
    /// `file: reason` for every file that was skipped or failed
    pub problems: Vec<String>,
    /// Listing after the last successful upload
    pub documents: Option<Result<Vec<DocumentEntry>, String>>,
}

/// Application-level events
#[derive(Debug, Clone)]
pub enum AppEvent {
    /// Terminal input event
    Input(crossterm::event::Event),

    /// Tick for the busy spinner
    Tick,

    /// Request to quit the application
    Quit,

    /// Stored credential checked at startup
    SessionRestored(Result<Option<Session>, String>),

    LoggedIn(Result<Session, String>),

    DocumentsLoaded(Result<Vec<DocumentEntry>, String>),

    DocumentOpened(Result<Document, String>),

    DocumentSaved {
        request: SaveRequest,
        result: Result<Mutation<SaveOutcome>, String>,
    },

    /// Outcome carries the deleted path
    DocumentDeleted(Result<Mutation<String>, String>),

    FilesUploaded(UploadSummary),

    DocumentDownloaded(Result<PathBuf, String>),

    /// A config file write finished
    ConfigSaved(Result<(), String>),
}

impl AppEvent {
    /// Completions whose listing or document belongs to the session and
    /// repository target they were requested under.
    pub fn follows_scope(&self) -> bool {
        matches!(
            self,
            AppEvent::DocumentsLoaded(_)
                | AppEvent::DocumentOpened(_)
                | AppEvent::DocumentSaved { .. }
                | AppEvent::DocumentDeleted(_)
                | AppEvent::FilesUploaded(_)
        )
    }
}

/// Which part of the screen receives key presses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputMode {
    /// Document list and viewer
    #[default]
    Browse,
    /// Typing in the list filter
    Searching,
    /// Document editor
    Editing,
    /// Token or OAuth login dialog
    LoggingIn,
    /// Repository settings dialog
    ConfiguringRepo,
    /// Upload path prompt
    Uploading,
    ShowingHelp,
    Confirming,
    ShowingError,
}
