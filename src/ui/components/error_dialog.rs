//! Modal error message, the terminal stand-in for an alert box

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget, Wrap},
};

use super::dialog::{DialogFrame, InstructionBar};
use super::theme;

const DIALOG_WIDTH: u16 = 56;

#[derive(Debug, Clone, Default)]
pub struct ErrorDialogState {
    pub visible: bool,
    pub title: String,
    pub message: String,
    /// Optional technical details, hidden until toggled
    pub details: Option<String>,
    pub details_expanded: bool,
}

impl ErrorDialogState {
    pub fn show(&mut self, title: impl Into<String>, message: impl Into<String>) {
        self.visible = true;
        self.title = title.into();
        self.message = message.into();
        self.details = None;
        self.details_expanded = false;
    }

    pub fn show_with_details(
        &mut self,
        title: impl Into<String>,
        message: impl Into<String>,
        details: impl Into<String>,
    ) {
        self.show(title, message);
        self.details = Some(details.into());
    }

    pub fn hide(&mut self) {
        self.visible = false;
        self.details_expanded = false;
    }

    pub fn toggle_details(&mut self) {
        if self.details.is_some() {
            self.details_expanded = !self.details_expanded;
        }
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }
}

pub struct ErrorDialog<'a> {
    state: &'a ErrorDialogState,
}

impl<'a> ErrorDialog<'a> {
    pub fn new(state: &'a ErrorDialogState) -> Self {
        Self { state }
    }

    fn wrapped_lines(text: &str, width: u16) -> u16 {
        let available = width.saturating_sub(6).max(1) as usize;
        text.lines()
            .map(|line| line.chars().count().div_ceil(available).max(1) as u16)
            .sum::<u16>()
            .max(1)
    }

    fn details_lines(&self) -> u16 {
        match (&self.state.details, self.state.details_expanded) {
            (Some(details), true) => Self::wrapped_lines(details, DIALOG_WIDTH),
            _ => 0,
        }
    }
}

impl Widget for ErrorDialog<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if !self.state.visible {
            return;
        }

        // borders, padding, button and instructions take 8 rows
        let message_lines = Self::wrapped_lines(&self.state.message, DIALOG_WIDTH);
        let toggle_lines = u16::from(self.state.details.is_some());
        let height = 8 + message_lines + toggle_lines + self.details_lines();

        let inner = DialogFrame::new(&self.state.title, DIALOG_WIDTH, height)
            .border_color(theme::accent_error())
            .render(area, buf);
        if inner.height < 4 {
            return;
        }

        let mut y = inner.y + 1;
        let bottom = inner.y + inner.height;
        let row = |y: u16, height: u16| Rect {
            x: inner.x + 1,
            y,
            width: inner.width.saturating_sub(2),
            height: height.min(bottom.saturating_sub(y)),
        };

        Paragraph::new(self.state.message.as_str())
            .style(Style::default().fg(theme::text_primary()))
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .render(row(y, message_lines), buf);
        y += message_lines + 1;

        if let Some(details) = &self.state.details {
            if y < bottom {
                let toggle = if self.state.details_expanded {
                    "▼ Details"
                } else {
                    "▶ Details (press 'd' to show)"
                };
                Paragraph::new(Line::from(Span::styled(
                    toggle,
                    Style::default().fg(theme::text_muted()),
                )))
                .alignment(Alignment::Center)
                .render(row(y, 1), buf);
            }
            y += 1;

            if self.state.details_expanded && y < bottom {
                Paragraph::new(details.as_str())
                    .style(Style::default().fg(theme::text_muted()))
                    .wrap(Wrap { trim: true })
                    .render(row(y, self.details_lines()), buf);
            }
        }

        let button_y = bottom.saturating_sub(3);
        if button_y > inner.y {
            let button = Span::styled(
                "  OK  ",
                Style::default()
                    .fg(theme::bg_base())
                    .bg(theme::accent_error())
                    .add_modifier(Modifier::BOLD),
            );
            Paragraph::new(Line::from(button))
                .alignment(Alignment::Center)
                .render(row(button_y, 1), buf);
        }

        let instructions = if self.state.details.is_some() {
            InstructionBar::new(vec![("Enter/Esc", "Dismiss"), ("d", "Details")])
        } else {
            InstructionBar::new(vec![("Enter/Esc", "Dismiss")])
        };
        instructions.render(row(bottom.saturating_sub(1), 1), buf);
    }
}
