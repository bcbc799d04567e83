//! Rendered markdown of the open document

use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Padding, Paragraph, Widget, Wrap},
};

use super::markdown::MarkdownRenderer;
use super::theme;
use crate::docs::Document;

/// Scroll position of the viewer
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DocumentViewState {
    pub scroll: u16,
    /// Set during render
    max_scroll: u16,
    page: u16,
}

impl DocumentViewState {
    pub fn reset(&mut self) {
        self.scroll = 0;
    }

    pub fn scroll_down(&mut self, lines: u16) {
        self.scroll = self.scroll.saturating_add(lines).min(self.max_scroll);
    }

    pub fn scroll_up(&mut self, lines: u16) {
        self.scroll = self.scroll.saturating_sub(lines);
    }

    pub fn page_down(&mut self) {
        self.scroll_down(self.page.max(1));
    }

    pub fn page_up(&mut self) {
        self.scroll_up(self.page.max(1));
    }
}

pub struct DocumentView<'a> {
    document: &'a Document,
    focused: bool,
}

impl<'a> DocumentView<'a> {
    pub fn new(document: &'a Document) -> Self {
        Self {
            document,
            focused: false,
        }
    }

    pub fn focused(mut self, focused: bool) -> Self {
        self.focused = focused;
        self
    }

    pub fn render(&self, area: Rect, buf: &mut Buffer, state: &mut DocumentViewState) {
        let border = if self.focused {
            theme::border_focused()
        } else {
            theme::border_default()
        };
        let block = Block::default()
            .title(Line::from(vec![
                Span::raw(" "),
                Span::styled(
                    self.document.name().to_string(),
                    Style::default()
                        .fg(theme::text_bright())
                        .add_modifier(Modifier::BOLD),
                ),
                Span::raw(" "),
            ]))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(border))
            .padding(Padding::horizontal(1))
            .style(Style::default().bg(theme::bg_base()));
        let inner = block.inner(area);
        block.render(area, buf);

        let [path_area, body_area] =
            Layout::vertical([Constraint::Length(2), Constraint::Min(0)]).areas(inner);
        Paragraph::new(Span::styled(
            self.document.path().to_string(),
            Style::default().fg(theme::text_muted()),
        ))
        .render(path_area, buf);

        let text: Text = MarkdownRenderer::new()
            .with_rule_width(body_area.width as usize)
            .render(&self.document.content);
        let total = wrapped_height(&text, body_area.width);
        let paragraph = Paragraph::new(text)
            .style(Style::default().fg(theme::text_primary()))
            .wrap(Wrap { trim: false });

        state.page = body_area.height;
        state.max_scroll = total.saturating_sub(body_area.height);
        state.scroll = state.scroll.min(state.max_scroll);

        paragraph.scroll((state.scroll, 0)).render(body_area, buf);
    }
}

/// Rows `text` takes when wrapped at `width` columns.
fn wrapped_height(text: &Text, width: u16) -> u16 {
    let width = width.max(1) as usize;
    text.lines
        .iter()
        .map(|line| line.width().div_ceil(width).max(1))
        .sum::<usize>()
        .min(u16::MAX as usize) as u16
}
