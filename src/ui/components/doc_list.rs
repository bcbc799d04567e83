//! Sidebar listing the documents in the configured directory

use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, StatefulWidget, Widget},
};

use super::text_input::TextInputState;
use super::theme;
use crate::docs::DocumentEntry;

/// Selection and search state of the list
#[derive(Debug, Clone, Default)]
pub struct DocListState {
    pub selected: usize,
    pub search: TextInputState,
    /// Keys go to the search field
    pub searching: bool,
    /// List (rather than the document pane) has focus
    pub focused: bool,
}

impl DocListState {
    pub fn new() -> Self {
        Self {
            focused: true,
            ..Self::default()
        }
    }

    pub fn select_next(&mut self, len: usize) {
        if len > 0 {
            self.selected = (self.selected + 1).min(len - 1);
        }
    }

    pub fn select_prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn select_first(&mut self) {
        self.selected = 0;
    }

    pub fn select_last(&mut self, len: usize) {
        self.selected = len.saturating_sub(1);
    }

    /// Keep the selection inside a list of `len` entries.
    pub fn clamp(&mut self, len: usize) {
        if self.selected >= len {
            self.selected = len.saturating_sub(1);
        }
    }
}

pub struct DocList<'a> {
    entries: &'a [&'a DocumentEntry],
    total: usize,
    placeholder: &'a str,
}

impl<'a> DocList<'a> {
    /// `entries` is the filtered listing, `total` the unfiltered count.
    pub fn new(entries: &'a [&'a DocumentEntry], total: usize) -> Self {
        Self {
            entries,
            total,
            placeholder: "No documents",
        }
    }

    /// Text shown when the listing is empty
    pub fn placeholder(mut self, text: &'a str) -> Self {
        self.placeholder = text;
        self
    }

    pub fn render(&self, area: Rect, buf: &mut Buffer, state: &DocListState) {
        let border = if state.focused {
            theme::border_focused()
        } else {
            theme::border_default()
        };
        let title = if self.entries.len() == self.total {
            format!(" Documents ({}) ", self.total)
        } else {
            format!(" Documents ({}/{}) ", self.entries.len(), self.total)
        };
        let block = Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_style(Style::default().fg(border))
            .style(Style::default().bg(theme::bg_base()));
        let inner = block.inner(area);
        block.render(area, buf);

        let show_search = state.searching || !state.search.is_empty();
        let [search_area, list_area] = if show_search {
            Layout::vertical([Constraint::Length(1), Constraint::Min(0)]).areas(inner)
        } else {
            Layout::vertical([Constraint::Length(0), Constraint::Min(0)]).areas(inner)
        };

        if show_search {
            let [icon, field] =
                Layout::horizontal([Constraint::Length(2), Constraint::Min(1)]).areas(search_area);
            Paragraph::new("/ ")
                .style(Style::default().fg(theme::accent_primary()))
                .render(icon, buf);
            if state.searching {
                state.search.render(
                    field,
                    buf,
                    Style::default().fg(theme::text_bright()),
                    Some(("search", Style::default().fg(theme::text_muted()))),
                );
            } else {
                Paragraph::new(state.search.value())
                    .style(Style::default().fg(theme::text_secondary()))
                    .render(field, buf);
            }
        }

        if self.entries.is_empty() {
            Paragraph::new(Line::from(Span::styled(
                format!(" {}", self.placeholder),
                Style::default().fg(theme::text_muted()),
            )))
            .render(list_area, buf);
            return;
        }

        let items: Vec<ListItem> = self
            .entries
            .iter()
            .map(|entry| {
                ListItem::new(Line::from(vec![
                    Span::styled("▪ ", Style::default().fg(theme::accent_secondary())),
                    Span::styled(
                        entry.name.clone(),
                        Style::default().fg(theme::text_primary()),
                    ),
                ]))
            })
            .collect();

        let list = List::new(items).highlight_style(
            Style::default()
                .bg(theme::bg_highlight())
                .fg(theme::text_bright())
                .add_modifier(Modifier::BOLD),
        );
        let mut list_state = ListState::default().with_selected(Some(state.selected));
        StatefulWidget::render(list, list_area, buf, &mut list_state);
    }
}
