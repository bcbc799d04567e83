//! Application state with controlled mutation entry points.
//!
//! [`AppStore`] is owned by whoever drives the application (the TUI loop or a
//! CLI command) and passed by reference; nothing here is global.

use thiserror::Error;

use crate::auth::Session;
use crate::config::{Config, ThemeMode};
use crate::docs::{self, Document, DocumentEntry, SaveOutcome, SaveRequest};
use crate::github::RepoTarget;
use crate::view::{Screen, TransitionError};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Still busy: {0}")]
pub struct Busy(pub String);

/// Which session and repository target a piece of remote work belongs to.
///
/// Advances whenever either changes, so a result fetched under an older
/// scope can be recognised and dropped.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Scope(u64);

#[derive(Debug, Clone, PartialEq, Eq)]
struct BusyClaim {
    label: String,
    scope: Scope,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Error,
}

/// One-line message for the status bar
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub text: String,
}

impl Notice {
    pub fn info(text: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            text: text.into(),
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            text: text.into(),
        }
    }
}

#[derive(Debug, Default)]
pub struct AppStore {
    session: Option<Session>,
    target: RepoTarget,
    theme: ThemeMode,
    documents: Vec<DocumentEntry>,
    query: String,
    screen: Screen,
    scope: Scope,
    busy: Option<BusyClaim>,
    notice: Option<Notice>,
}

impl AppStore {
    pub fn new(config: &Config) -> Self {
        Self {
            target: config.repository.clone(),
            theme: config.theme,
            ..Self::default()
        }
    }

    // Session

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn is_logged_in(&self) -> bool {
        self.session.is_some()
    }

    pub fn set_session(&mut self, session: Session) {
        self.session = Some(session);
        self.advance_scope();
    }

    /// Drop the session along with everything fetched under it.
    pub fn clear_session(&mut self) {
        self.session = None;
        self.advance_scope();
        self.documents.clear();
        self.query.clear();
        self.screen.reset();
    }

    // Repository target

    pub fn target(&self) -> &RepoTarget {
        &self.target
    }

    /// Point at a different repository; the old listing no longer applies.
    pub fn set_target(&mut self, target: RepoTarget) {
        if target != self.target {
            self.documents.clear();
            self.screen.reset();
            self.advance_scope();
        }
        self.target = target;
    }

    pub fn scope(&self) -> Scope {
        self.scope
    }

    fn advance_scope(&mut self) {
        self.scope = Scope(self.scope.0.wrapping_add(1));
    }

    // Theme

    pub fn theme(&self) -> ThemeMode {
        self.theme
    }

    pub fn toggle_theme(&mut self) -> ThemeMode {
        self.theme = self.theme.toggled();
        self.theme
    }

    // Listing

    pub fn documents(&self) -> &[DocumentEntry] {
        &self.documents
    }

    pub fn set_documents(&mut self, documents: Vec<DocumentEntry>) {
        self.documents = documents;
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
    }

    /// Listing filtered by the current search query.
    pub fn visible_documents(&self) -> Vec<&DocumentEntry> {
        docs::search(&self.documents, &self.query)
    }

    // Screens

    pub fn screen(&self) -> &Screen {
        &self.screen
    }

    pub fn current_document(&self) -> Option<&Document> {
        self.screen.current_document()
    }

    pub fn open_document(&mut self, document: Document) -> Result<(), TransitionError> {
        self.screen.open(document)
    }

    pub fn begin_edit(&mut self) -> Result<(), TransitionError> {
        self.screen.edit()
    }

    pub fn begin_new(&mut self) -> Result<(), TransitionError> {
        self.screen.new_document()
    }

    pub fn cancel_edit(&mut self) -> Result<(), TransitionError> {
        self.screen.cancel_edit()
    }

    /// Change the editor buffer. No-op outside the editor.
    pub fn edit_draft(&mut self, f: impl FnOnce(&mut crate::view::EditorDraft)) {
        if let Some(draft) = self.screen.draft_mut() {
            f(draft);
        }
    }

    /// Save request for the editor buffer, if the editor is showing.
    pub fn save_request(&self) -> Option<SaveRequest> {
        self.screen.draft().map(|draft| draft.to_save_request())
    }

    /// Apply a successful save of `request`.
    ///
    /// The listing and notice always apply. An editor still holding exactly
    /// what was saved closes to Welcome. An editor or viewer on the same file
    /// that was left or changed while the save ran picks up the committed
    /// version, so its next save carries the new hash.
    pub fn finish_save(
        &mut self,
        request: &SaveRequest,
        outcome: &SaveOutcome,
        documents: Option<Vec<DocumentEntry>>,
    ) {
        if let Some(documents) = documents {
            self.documents = documents;
        }
        let verb = if outcome.created { "Created" } else { "Updated" };
        self.notice = Some(Notice::info(format!("{verb} {}", outcome.path)));

        let committed = Document {
            entry: outcome.entry.clone(),
            content: request.body.clone(),
        };
        let unchanged = self
            .screen
            .draft()
            .is_some_and(|draft| draft.to_save_request() == *request);
        if unchanged && self.screen.saved().is_ok() {
            return;
        }

        match &mut self.screen {
            Screen::Editor(draft) if draft.file_name.trim() == request.file_name => {
                draft.original = Some(committed);
            }
            Screen::Viewer(document) if document.path() == outcome.path => {
                *document = committed;
            }
            _ => {}
        }
    }

    /// Apply a successful upload outside the editor.
    pub fn finish_upload(&mut self, outcome: &SaveOutcome, documents: Option<Vec<DocumentEntry>>) {
        if let Some(documents) = documents {
            self.documents = documents;
        }
        self.notice = Some(Notice::info(format!("Uploaded {}", outcome.path)));
    }

    /// Apply a successful delete of `path`.
    ///
    /// If it was the open document the screen returns to Welcome. The entry
    /// is dropped from the listing even when the reload failed.
    pub fn finish_delete(&mut self, path: &str, documents: Option<Vec<DocumentEntry>>) {
        if self
            .screen
            .current_document()
            .is_some_and(|doc| doc.path() == path)
        {
            self.screen.reset();
        }

        match documents {
            Some(documents) => self.documents = documents,
            None => self.documents.retain(|entry| entry.path != path),
        }
        self.notice = Some(Notice::info(format!("Deleted {path}")));
    }

    // Busy flag

    pub fn busy(&self) -> Option<&str> {
        self.busy.as_ref().map(|claim| claim.label.as_str())
    }

    pub fn is_busy(&self) -> bool {
        self.busy.is_some()
    }

    /// Claim the single remote-call slot for the current scope.
    pub fn begin_busy(&mut self, label: impl Into<String>) -> Result<(), Busy> {
        if let Some(current) = &self.busy {
            return Err(Busy(current.label.clone()));
        }
        self.busy = Some(BusyClaim {
            label: label.into(),
            scope: self.scope,
        });
        Ok(())
    }

    /// Release the slot. Returns the scope it was claimed under.
    pub fn end_busy(&mut self) -> Option<Scope> {
        self.busy.take().map(|claim| claim.scope)
    }

    // Notices

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    pub fn set_notice(&mut self, notice: Notice) {
        self.notice = Some(notice);
    }

    pub fn clear_notice(&mut self) {
        self.notice = None;
    }
}
