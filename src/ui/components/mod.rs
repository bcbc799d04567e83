mod confirmation_dialog;
mod dialog;
mod doc_list;
mod document_view;
mod editor_view;
mod error_dialog;
mod help_dialog;
pub mod highlight;
mod login_dialog;
mod markdown;
mod repo_dialog;
mod spinner;
mod status_bar;
mod text_area;
mod text_input;
pub mod theme;
mod upload_dialog;
mod welcome;

pub use confirmation_dialog::{
    ConfirmationContext, ConfirmationDialog, ConfirmationDialogState, ConfirmationType,
};
pub use dialog::{DialogFrame, InstructionBar, StatusLine};
pub use doc_list::{DocList, DocListState};
pub use document_view::{DocumentView, DocumentViewState};
pub use editor_view::{EditorField, EditorState, EditorView};
pub use error_dialog::{ErrorDialog, ErrorDialogState};
pub use help_dialog::{HelpCategory, HelpDialog, HelpDialogState, KeybindingEntry};
pub use login_dialog::{LoginDialog, LoginDialogState, LoginMode};
pub use markdown::MarkdownRenderer;
pub use repo_dialog::{RepoDialog, RepoDialogState};
pub use spinner::Spinner;
pub use status_bar::StatusBar;
pub use text_area::TextAreaState;
pub use text_input::TextInputState;
pub use theme::{apply_mode, current_mode, current_theme, set_theme, Theme};
pub use upload_dialog::{split_paths, UploadDialog, UploadDialogState};
pub use welcome::Welcome;
