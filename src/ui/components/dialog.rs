//! Dialog frame, instruction bar and status line shared by the dialogs

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Widget},
};

use super::theme;

/// A centered dialog frame with title and border
pub struct DialogFrame<'a> {
    title: &'a str,
    width: u16,
    height: u16,
    border_color: Color,
}

impl<'a> DialogFrame<'a> {
    pub fn new(title: &'a str, width: u16, height: u16) -> Self {
        Self {
            title,
            width,
            height,
            border_color: theme::border_focused(),
        }
    }

    pub fn border_color(mut self, color: Color) -> Self {
        self.border_color = color;
        self
    }

    /// Render the frame and return the inner area for content
    pub fn render(&self, area: Rect, buf: &mut Buffer) -> Rect {
        let width = self.width.min(area.width.saturating_sub(4));
        let height = self.height.min(area.height.saturating_sub(2));

        let dialog_area = Rect {
            x: area.x + area.width.saturating_sub(width) / 2,
            y: area.y + area.height.saturating_sub(height) / 2,
            width,
            height,
        };

        Clear.render(dialog_area, buf);

        let block = Block::default()
            .title(format!(" {} ", self.title))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(self.border_color))
            .style(Style::default().bg(theme::bg_surface()));

        let inner = block.inner(dialog_area);
        block.render(dialog_area, buf);

        inner
    }
}

/// Keyboard shortcuts shown at the bottom of a dialog
pub struct InstructionBar<'a> {
    instructions: Vec<(&'a str, &'a str)>,
}

impl<'a> InstructionBar<'a> {
    pub fn new(instructions: Vec<(&'a str, &'a str)>) -> Self {
        Self { instructions }
    }

    pub fn render(&self, area: Rect, buf: &mut Buffer) {
        let mut spans = Vec::new();
        for (i, (key, desc)) in self.instructions.iter().enumerate() {
            if i > 0 {
                spans.push(Span::raw("  "));
            }
            spans.push(Span::styled(
                *key,
                Style::default().fg(theme::accent_primary()),
            ));
            spans.push(Span::styled(
                format!(" {desc}"),
                Style::default().fg(theme::text_secondary()),
            ));
        }

        Paragraph::new(Line::from(spans))
            .alignment(Alignment::Center)
            .render(area, buf);
    }
}

/// Validation message under a form field
#[derive(Default)]
pub struct StatusLine<'a> {
    error: Option<&'a str>,
    hint: Option<&'a str>,
}

impl<'a> StatusLine<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn error(mut self, msg: Option<&'a str>) -> Self {
        self.error = msg;
        self
    }

    pub fn hint(mut self, msg: &'a str) -> Self {
        self.hint = Some(msg);
        self
    }

    pub fn render(&self, area: Rect, buf: &mut Buffer) {
        let line = match (self.error, self.hint) {
            (Some(error), _) => Line::from(Span::styled(
                format!("  {error}"),
                Style::default().fg(theme::accent_error()),
            )),
            (None, Some(hint)) => Line::from(Span::styled(
                format!("  {hint}"),
                Style::default().fg(theme::text_muted()),
            )),
            (None, None) => Line::default(),
        };

        Paragraph::new(line).render(area, buf);
    }
}
