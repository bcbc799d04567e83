//! Prompt for local files to upload

use std::path::PathBuf;

use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Layout, Rect},
    style::Style,
    symbols::border,
    widgets::{Block, Borders, Paragraph, Widget},
};

use super::dialog::{DialogFrame, InstructionBar, StatusLine};
use super::text_input::TextInputState;
use super::theme;

#[derive(Debug, Clone, Default)]
pub struct UploadDialogState {
    pub visible: bool,
    pub input: TextInputState,
    pub error: Option<String>,
}

impl UploadDialogState {
    pub fn show(&mut self) {
        self.visible = true;
        self.input.clear();
        self.error = None;
    }

    pub fn hide(&mut self) {
        self.visible = false;
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Paths typed so far, `~` expanded.
    pub fn paths(&self) -> Vec<PathBuf> {
        split_paths(self.input.value())
            .into_iter()
            .map(|p| expand_home(&p))
            .collect()
    }
}

/// Split on whitespace; double quotes group a path containing spaces.
pub fn split_paths(input: &str) -> Vec<String> {
    let mut paths = Vec::new();
    let mut current = String::new();
    let mut quoted = false;

    for c in input.chars() {
        match c {
            '"' => quoted = !quoted,
            c if c.is_whitespace() && !quoted => {
                if !current.is_empty() {
                    paths.push(std::mem::take(&mut current));
                }
            }
            c => current.push(c),
        }
    }
    if !current.is_empty() {
        paths.push(current);
    }
    paths
}

fn expand_home(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix('~') {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest.trim_start_matches('/'));
        }
    }
    PathBuf::from(path)
}

pub struct UploadDialog;

impl UploadDialog {
    pub fn new() -> Self {
        Self
    }

    pub fn render(&self, area: Rect, buf: &mut Buffer, state: &UploadDialogState) {
        if !state.visible {
            return;
        }

        let frame = DialogFrame::new("Upload Documents", 64, 10);
        let inner = frame.render(area, buf);

        let chunks = Layout::vertical([
            Constraint::Length(1),
            Constraint::Length(3),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(inner);

        Paragraph::new("Local .md files, separated by spaces:")
            .style(Style::default().fg(theme::text_primary()))
            .render(chunks[0], buf);

        let block = Block::default()
            .borders(Borders::ALL)
            .border_set(border::ROUNDED)
            .border_style(Style::default().fg(theme::border_focused()));
        let field = block.inner(chunks[1]);
        block.render(chunks[1], buf);
        state.input.render(
            field,
            buf,
            Style::default().fg(theme::text_bright()),
            Some((
                "~/notes/intro.md ~/notes/todo.md",
                Style::default().fg(theme::text_muted()),
            )),
        );

        StatusLine::new()
            .error(state.error.as_deref())
            .hint("Each file becomes a new document in the repository")
            .render(chunks[2], buf);

        InstructionBar::new(vec![("Enter", "upload"), ("Esc", "cancel")]).render(chunks[4], buf);
    }
}

impl Default for UploadDialog {
    fn default() -> Self {
        Self::new()
    }
}
