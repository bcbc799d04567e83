//! Repository settings: owner, name, base path and branch

use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Layout, Rect},
    style::Style,
    widgets::{Paragraph, Widget},
};

use super::dialog::{DialogFrame, InstructionBar, StatusLine};
use super::text_input::TextInputState;
use super::theme;
use crate::github::{RepoTarget, DEFAULT_BASE_PATH, DEFAULT_BRANCH};

const LABELS: [&str; 4] = ["Owner", "Repository", "Path", "Branch"];
const PLACEHOLDERS: [&str; 4] = ["octocat", "notes", DEFAULT_BASE_PATH, DEFAULT_BRANCH];

#[derive(Debug, Clone, Default)]
pub struct RepoDialogState {
    pub visible: bool,
    pub fields: [TextInputState; 4],
    pub focused: usize,
    pub error: Option<String>,
}

impl RepoDialogState {
    /// Open pre-filled with `target`.
    pub fn show(&mut self, target: &RepoTarget) {
        self.visible = true;
        self.fields = [
            TextInputState::with_value(&target.owner),
            TextInputState::with_value(&target.name),
            TextInputState::with_value(&target.path),
            TextInputState::with_value(&target.branch),
        ];
        self.focused = 0;
        self.error = None;
    }

    pub fn hide(&mut self) {
        self.visible = false;
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn next_field(&mut self) {
        self.focused = (self.focused + 1) % self.fields.len();
    }

    pub fn prev_field(&mut self) {
        self.focused = (self.focused + self.fields.len() - 1) % self.fields.len();
    }

    pub fn input_mut(&mut self) -> &mut TextInputState {
        &mut self.fields[self.focused]
    }

    /// Build the target; empty path and branch fall back to the defaults.
    pub fn to_target(&self) -> Result<RepoTarget, String> {
        let [owner, name, path, branch] = self.fields.each_ref().map(|f| f.value().trim());
        if owner.is_empty() || name.is_empty() {
            return Err("Owner and repository are required".to_string());
        }
        if owner.contains('/') || name.contains('/') {
            return Err("Owner and repository must not contain '/'".to_string());
        }
        let path = if path.is_empty() { DEFAULT_BASE_PATH } else { path };
        let branch = if branch.is_empty() { DEFAULT_BRANCH } else { branch };
        Ok(RepoTarget::new(owner, name, path, branch))
    }
}

pub struct RepoDialog;

impl RepoDialog {
    pub fn new() -> Self {
        Self
    }

    pub fn render(&self, area: Rect, buf: &mut Buffer, state: &RepoDialogState) {
        if !state.visible {
            return;
        }

        let frame = DialogFrame::new("Repository", 56, 11);
        let inner = frame.render(area, buf);

        let chunks = Layout::vertical([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(inner);

        for (i, field) in state.fields.iter().enumerate() {
            let [label_area, value_area] =
                Layout::horizontal([Constraint::Length(13), Constraint::Min(1)])
                    .areas(chunks[i]);
            let focused = i == state.focused;
            let label_style = if focused {
                Style::default().fg(theme::accent_primary())
            } else {
                Style::default().fg(theme::text_secondary())
            };
            Paragraph::new(format!(" {:<11} ", LABELS[i]))
                .style(label_style)
                .render(label_area, buf);

            let text_style = Style::default().fg(theme::text_bright());
            let placeholder = (PLACEHOLDERS[i], Style::default().fg(theme::text_muted()));
            if focused {
                field.render(value_area, buf, text_style, Some(placeholder));
            } else if field.is_empty() {
                Paragraph::new(placeholder.0)
                    .style(placeholder.1)
                    .render(value_area, buf);
            } else {
                Paragraph::new(field.value())
                    .style(text_style)
                    .render(value_area, buf);
            }
        }

        StatusLine::new()
            .error(state.error.as_deref())
            .hint("Documents are the .md files directly under Path")
            .render(chunks[5], buf);

        InstructionBar::new(vec![("Tab", "next"), ("Enter", "save"), ("Esc", "cancel")])
            .render(chunks[7], buf);
    }
}

impl Default for RepoDialog {
    fn default() -> Self {
        Self::new()
    }
}
