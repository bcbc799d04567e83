//! Yes/no dialog guarding destructive actions

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget, Wrap},
};

use super::dialog::{DialogFrame, InstructionBar};
use super::theme;
use crate::docs::DocumentEntry;

const DIALOG_WIDTH: u16 = 52;

/// Determines the dialog's border color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConfirmationType {
    #[default]
    Info,
    Warning,
    Danger,
}

impl ConfirmationType {
    pub fn border_color(&self) -> Color {
        match self {
            ConfirmationType::Info => theme::accent_primary(),
            ConfirmationType::Warning => theme::accent_warning(),
            ConfirmationType::Danger => theme::accent_error(),
        }
    }
}

/// What happens when the user confirms
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfirmationContext {
    DeleteDocument(DocumentEntry),
    /// Leave the editor and drop unsaved changes
    DiscardEdits,
    Logout,
}

#[derive(Debug, Clone, Default)]
pub struct ConfirmationDialogState {
    pub visible: bool,
    pub title: String,
    pub message: String,
    pub warnings: Vec<String>,
    pub confirmation_type: ConfirmationType,
    pub confirm_text: String,
    /// Which button is selected; Cancel by default
    pub confirm_selected: bool,
    pub context: Option<ConfirmationContext>,
}

impl ConfirmationDialogState {
    pub fn show(
        &mut self,
        title: impl Into<String>,
        message: impl Into<String>,
        warnings: Vec<String>,
        confirmation_type: ConfirmationType,
        confirm_text: impl Into<String>,
        context: ConfirmationContext,
    ) {
        self.visible = true;
        self.title = title.into();
        self.message = message.into();
        self.warnings = warnings;
        self.confirmation_type = confirmation_type;
        self.confirm_text = confirm_text.into();
        self.confirm_selected = false;
        self.context = Some(context);
    }

    /// Ask before deleting `entry`.
    pub fn show_delete(&mut self, entry: &DocumentEntry) {
        self.show(
            "Delete Document",
            format!("Delete {}?", entry.name),
            vec!["This commits the deletion to the repository.".to_string()],
            ConfirmationType::Danger,
            "Delete",
            ConfirmationContext::DeleteDocument(entry.clone()),
        );
    }

    pub fn hide(&mut self) {
        self.visible = false;
        self.context = None;
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn toggle_selection(&mut self) {
        self.confirm_selected = !self.confirm_selected;
    }

    /// Close the dialog and hand back the context if Confirm was chosen.
    pub fn resolve(&mut self, confirmed: bool) -> Option<ConfirmationContext> {
        let context = self.context.take();
        self.hide();
        context.filter(|_| confirmed)
    }
}

pub struct ConfirmationDialog<'a> {
    state: &'a ConfirmationDialogState,
}

impl<'a> ConfirmationDialog<'a> {
    pub fn new(state: &'a ConfirmationDialogState) -> Self {
        Self { state }
    }

    fn message_lines(&self) -> u16 {
        if self.state.message.is_empty() {
            return 0;
        }
        let available = DIALOG_WIDTH.saturating_sub(6).max(1) as usize;
        self.state.message.chars().count().div_ceil(available).max(1) as u16
    }
}

impl Widget for ConfirmationDialog<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if !self.state.visible {
            return;
        }

        let message_lines = self.message_lines();
        let warnings_height = match self.state.warnings.len() as u16 {
            0 => 0,
            n => n + 1,
        };
        let height = 8 + message_lines + warnings_height;

        let accent = self.state.confirmation_type.border_color();
        let inner = DialogFrame::new(&self.state.title, DIALOG_WIDTH, height)
            .border_color(accent)
            .render(area, buf);
        if inner.height < 4 {
            return;
        }

        let bottom = inner.y + inner.height;
        let row = |y: u16, height: u16| Rect {
            x: inner.x + 1,
            y,
            width: inner.width.saturating_sub(2),
            height: height.min(bottom.saturating_sub(y)),
        };

        let mut y = inner.y + 1;
        Paragraph::new(self.state.message.as_str())
            .style(Style::default().fg(theme::text_primary()))
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .render(row(y, message_lines), buf);
        y += message_lines + 1;

        for warning in &self.state.warnings {
            if y >= bottom.saturating_sub(3) {
                break;
            }
            Paragraph::new(Line::from(vec![
                Span::styled("⚠ ", Style::default().fg(accent)),
                Span::styled(warning.as_str(), Style::default().fg(accent)),
            ]))
            .render(row(y, 1), buf);
            y += 1;
        }

        let buttons_y = bottom.saturating_sub(3);
        if buttons_y >= y {
            let selected = |on: bool, color: Color| {
                if on {
                    Style::default()
                        .fg(theme::bg_base())
                        .bg(color)
                        .add_modifier(Modifier::BOLD)
                } else {
                    Style::default().fg(color)
                }
            };
            let buttons = Line::from(vec![
                Span::styled(
                    " Cancel ",
                    selected(!self.state.confirm_selected, theme::text_primary()),
                ),
                Span::raw("    "),
                Span::styled(
                    format!(" {} ", self.state.confirm_text),
                    selected(self.state.confirm_selected, accent),
                ),
            ]);
            Paragraph::new(buttons)
                .alignment(Alignment::Center)
                .render(row(buttons_y, 1), buf);
        }

        InstructionBar::new(vec![
            ("←/→", "Select"),
            ("Enter", "Choose"),
            ("y/n", "Quick"),
        ])
        .render(row(bottom.saturating_sub(1), 1), buf);
    }
}
