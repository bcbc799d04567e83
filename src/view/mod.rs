//! Which screen is showing, and the moves allowed between them.
//!
//! `Welcome`, `Viewer` and `Editor` are variants of one enum, so two screens
//! can never be visible together and the open document travels with the
//! screen that shows it.

use thiserror::Error;

use crate::docs::{Document, SaveRequest};

/// Editor buffer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditorDraft {
    /// Document the editor was opened on; `None` for a new document
    pub original: Option<Document>,
    pub file_name: String,
    pub body: String,
}

impl EditorDraft {
    pub fn blank() -> Self {
        Self {
            original: None,
            file_name: String::new(),
            body: String::new(),
        }
    }

    pub fn for_document(document: Document) -> Self {
        Self {
            file_name: document.entry.name.clone(),
            body: document.content.clone(),
            original: Some(document),
        }
    }

    pub fn is_new(&self) -> bool {
        self.original.is_none()
    }

    /// True when the buffer differs from what it was opened with.
    pub fn is_dirty(&self) -> bool {
        match &self.original {
            Some(doc) => doc.entry.name != self.file_name || doc.content != self.body,
            None => !self.file_name.is_empty() || !self.body.is_empty(),
        }
    }

    pub fn to_save_request(&self) -> SaveRequest {
        SaveRequest {
            file_name: self.file_name.trim().to_string(),
            body: self.body.clone(),
            original: self.original.as_ref().map(|doc| doc.entry.clone()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScreenKind {
    Welcome,
    Viewer,
    Editor,
}

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("cannot {action} from the {from:?} screen")]
pub struct TransitionError {
    pub from: ScreenKind,
    pub action: &'static str,
}

/// The visible screen
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Screen {
    #[default]
    Welcome,
    Viewer(Document),
    Editor(EditorDraft),
}

impl Screen {
    pub fn kind(&self) -> ScreenKind {
        match self {
            Screen::Welcome => ScreenKind::Welcome,
            Screen::Viewer(_) => ScreenKind::Viewer,
            Screen::Editor(_) => ScreenKind::Editor,
        }
    }

    /// The document that is open, in either the viewer or the editor.
    pub fn current_document(&self) -> Option<&Document> {
        match self {
            Screen::Welcome => None,
            Screen::Viewer(doc) => Some(doc),
            Screen::Editor(draft) => draft.original.as_ref(),
        }
    }

    pub fn draft(&self) -> Option<&EditorDraft> {
        match self {
            Screen::Editor(draft) => Some(draft),
            _ => None,
        }
    }

    pub fn draft_mut(&mut self) -> Option<&mut EditorDraft> {
        match self {
            Screen::Editor(draft) => Some(draft),
            _ => None,
        }
    }

    fn reject(&self, action: &'static str) -> TransitionError {
        TransitionError {
            from: self.kind(),
            action,
        }
    }

    /// Show a freshly loaded document. Allowed from Welcome and Viewer
    /// (switching documents); the editor must be left first.
    pub fn open(&mut self, document: Document) -> Result<(), TransitionError> {
        match self {
            Screen::Welcome | Screen::Viewer(_) => {
                *self = Screen::Viewer(document);
                Ok(())
            }
            Screen::Editor(_) => Err(self.reject("open a document")),
        }
    }

    /// Viewer -> Editor on the open document.
    pub fn edit(&mut self) -> Result<(), TransitionError> {
        match std::mem::take(self) {
            Screen::Viewer(document) => {
                *self = Screen::Editor(EditorDraft::for_document(document));
                Ok(())
            }
            other => {
                *self = other;
                Err(self.reject("edit"))
            }
        }
    }

    /// Welcome/Viewer -> Editor on a blank document.
    pub fn new_document(&mut self) -> Result<(), TransitionError> {
        match self {
            Screen::Welcome | Screen::Viewer(_) => {
                *self = Screen::Editor(EditorDraft::blank());
                Ok(())
            }
            Screen::Editor(_) => Err(self.reject("start a new document")),
        }
    }

    /// Editor -> Viewer (existing document) or Welcome (new document).
    /// Edits are discarded.
    pub fn cancel_edit(&mut self) -> Result<(), TransitionError> {
        match std::mem::take(self) {
            Screen::Editor(draft) => {
                *self = match draft.original {
                    Some(document) => Screen::Viewer(document),
                    None => Screen::Welcome,
                };
                Ok(())
            }
            other => {
                *self = other;
                Err(self.reject("cancel editing"))
            }
        }
    }

    /// Editor -> Welcome after a successful save.
    pub fn saved(&mut self) -> Result<(), TransitionError> {
        match self {
            Screen::Editor(_) => {
                *self = Screen::Welcome;
                Ok(())
            }
            _ => Err(self.reject("finish saving")),
        }
    }

    /// Viewer/Editor -> Welcome after the open document was deleted.
    pub fn deleted(&mut self) -> Result<(), TransitionError> {
        match self {
            Screen::Viewer(_) | Screen::Editor(_) => {
                *self = Screen::Welcome;
                Ok(())
            }
            Screen::Welcome => Err(self.reject("delete")),
        }
    }

    /// Back to Welcome from anywhere (logout, repository change).
    pub fn reset(&mut self) {
        *self = Screen::Welcome;
    }
}
