//! Help dialog listing the keybindings by category

use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};

use super::dialog::{DialogFrame, InstructionBar};
use super::theme;

/// A keybinding entry for display
#[derive(Debug, Clone, Copy)]
pub struct KeybindingEntry {
    pub key: &'static str,
    pub description: &'static str,
}

const fn kb(key: &'static str, description: &'static str) -> KeybindingEntry {
    KeybindingEntry { key, description }
}

/// Category for grouping keybindings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HelpCategory {
    Global,
    Documents,
    Viewer,
    Editor,
}

impl HelpCategory {
    pub fn title(&self) -> &'static str {
        match self {
            HelpCategory::Global => "GLOBAL",
            HelpCategory::Documents => "DOCUMENTS",
            HelpCategory::Viewer => "VIEWER",
            HelpCategory::Editor => "EDITOR",
        }
    }

    pub fn entries(&self) -> &'static [KeybindingEntry] {
        match self {
            HelpCategory::Global => GLOBAL_KEYS,
            HelpCategory::Documents => DOCUMENT_KEYS,
            HelpCategory::Viewer => VIEWER_KEYS,
            HelpCategory::Editor => EDITOR_KEYS,
        }
    }
}

const GLOBAL_KEYS: &[KeybindingEntry] = &[
    kb("l", "Log in"),
    kb("L", "Log out"),
    kb("c", "Repository settings"),
    kb("t", "Toggle light/dark theme"),
    kb("?", "This help"),
    kb("q / Ctrl+C", "Quit"),
];

const DOCUMENT_KEYS: &[KeybindingEntry] = &[
    kb("j / k", "Select next / previous"),
    kb("Enter", "Open document"),
    kb("/", "Search by name"),
    kb("n", "New document"),
    kb("u", "Upload local files"),
    kb("r", "Reload listing"),
];

const VIEWER_KEYS: &[KeybindingEntry] = &[
    kb("Tab", "Switch between list and document"),
    kb("PgUp / PgDn", "Scroll"),
    kb("e", "Edit document"),
    kb("d", "Delete document"),
    kb("s", "Download to the current directory"),
];

const EDITOR_KEYS: &[KeybindingEntry] = &[
    kb("Ctrl+S", "Save (commit)"),
    kb("Tab", "Switch between name and body"),
    kb("Ctrl+P", "Toggle preview"),
    kb("Esc", "Cancel editing"),
];

const CATEGORIES: [HelpCategory; 4] = [
    HelpCategory::Global,
    HelpCategory::Documents,
    HelpCategory::Viewer,
    HelpCategory::Editor,
];

#[derive(Debug, Clone, Default)]
pub struct HelpDialogState {
    pub visible: bool,
    pub scroll_offset: usize,
}

impl HelpDialogState {
    pub fn show(&mut self) {
        self.visible = true;
        self.scroll_offset = 0;
    }

    pub fn hide(&mut self) {
        self.visible = false;
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn scroll_down(&mut self) {
        self.scroll_offset = (self.scroll_offset + 1).min(Self::total_lines().saturating_sub(1));
    }

    pub fn scroll_up(&mut self) {
        self.scroll_offset = self.scroll_offset.saturating_sub(1);
    }

    fn total_lines() -> usize {
        CATEGORIES.iter().map(|c| c.entries().len() + 2).sum()
    }
}

pub struct HelpDialog;

impl HelpDialog {
    pub fn new() -> Self {
        Self
    }

    fn lines() -> Vec<Line<'static>> {
        let mut lines = Vec::new();
        for category in CATEGORIES {
            lines.push(Line::from(Span::styled(
                category.title(),
                Style::default()
                    .fg(theme::accent_secondary())
                    .add_modifier(Modifier::BOLD),
            )));
            for entry in category.entries() {
                lines.push(Line::from(vec![
                    Span::styled(
                        format!("  {:<14}", entry.key),
                        Style::default().fg(theme::accent_primary()),
                    ),
                    Span::styled(entry.description, Style::default().fg(theme::text_primary())),
                ]));
            }
            lines.push(Line::default());
        }
        lines
    }

    pub fn render(&self, area: Rect, buf: &mut Buffer, state: &HelpDialogState) {
        if !state.visible {
            return;
        }

        let frame = DialogFrame::new("Keybindings", 56, 30);
        let inner = frame.render(area, buf);

        let [body, instructions] =
            Layout::vertical([Constraint::Min(1), Constraint::Length(1)]).areas(inner);

        Paragraph::new(Self::lines())
            .scroll((state.scroll_offset as u16, 0))
            .render(body, buf);

        InstructionBar::new(vec![("j/k", "scroll"), ("Esc", "close")]).render(instructions, buf);
    }
}

impl Default for HelpDialog {
    fn default() -> Self {
        Self::new()
    }
}
