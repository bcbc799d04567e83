//! Full-screen terminal interface.

pub mod app;
pub mod components;
pub mod effect;
pub mod events;
pub mod terminal_guard;

pub use app::{App, UiState};
pub use effect::{Effect, EffectContext};
pub use events::{AppEvent, InputMode, Mutation, UploadSummary};
pub use terminal_guard::{install_panic_hook, TerminalGuard};
