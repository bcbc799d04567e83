//! Document editor: file name, body and a live preview

use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Padding, Paragraph, Widget, Wrap},
};

use super::markdown::MarkdownRenderer;
use super::text_area::TextAreaState;
use super::text_input::TextInputState;
use super::theme;
use crate::view::EditorDraft;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EditorField {
    Name,
    #[default]
    Body,
}

/// Editing buffers for the draft shown by the editor screen
#[derive(Debug, Clone, Default)]
pub struct EditorState {
    pub name: TextInputState,
    pub body: TextAreaState,
    pub focus: EditorField,
    pub preview: bool,
    /// Title shown in the border
    title: String,
}

impl EditorState {
    pub fn from_draft(draft: &EditorDraft) -> Self {
        let title = match &draft.original {
            Some(doc) => format!("Edit {}", doc.name()),
            None => "New document".to_string(),
        };
        Self {
            name: TextInputState::with_value(&draft.file_name),
            body: TextAreaState::from_text(&draft.body),
            // new documents start on the name
            focus: if draft.is_new() {
                EditorField::Name
            } else {
                EditorField::Body
            },
            preview: true,
            title,
        }
    }

    /// Copy the buffers into `draft`.
    pub fn write_to(&self, draft: &mut EditorDraft) {
        draft.file_name = self.name.value().to_string();
        draft.body = self.body.text();
    }

    pub fn toggle_focus(&mut self) {
        self.focus = match self.focus {
            EditorField::Name => EditorField::Body,
            EditorField::Body => EditorField::Name,
        };
    }

    pub fn toggle_preview(&mut self) {
        self.preview = !self.preview;
    }
}

pub struct EditorView {
    dirty: bool,
}

impl EditorView {
    pub fn new(dirty: bool) -> Self {
        Self { dirty }
    }

    pub fn render(&self, area: Rect, buf: &mut Buffer, state: &mut EditorState) {
        let marker = if self.dirty { " ●" } else { "" };
        let block = Block::default()
            .title(Line::from(vec![
                Span::raw(" "),
                Span::styled(
                    state.title.clone(),
                    Style::default()
                        .fg(theme::text_bright())
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled(marker, Style::default().fg(theme::accent_warning())),
                Span::raw(" "),
            ]))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme::border_focused()))
            .style(Style::default().bg(theme::bg_base()));
        let inner = block.inner(area);
        block.render(area, buf);

        let [name_row, _, content] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Min(0),
        ])
        .areas(inner);

        let [label_area, name_area] =
            Layout::horizontal([Constraint::Length(7), Constraint::Min(1)]).areas(name_row);
        let label_color = if state.focus == EditorField::Name {
            theme::accent_primary()
        } else {
            theme::text_muted()
        };
        Paragraph::new(" Name ")
            .style(Style::default().fg(label_color))
            .render(label_area, buf);

        let text_style = Style::default().fg(theme::text_primary());
        let placeholder = ("example.md", Style::default().fg(theme::text_muted()));
        if state.focus == EditorField::Name {
            state.name.render(name_area, buf, text_style, Some(placeholder));
        } else if state.name.is_empty() {
            Paragraph::new(placeholder.0)
                .style(placeholder.1)
                .render(name_area, buf);
        } else {
            Paragraph::new(state.name.value())
                .style(text_style)
                .render(name_area, buf);
        }

        let (edit_area, preview_area) = if state.preview && content.width >= 40 {
            let [left, right] =
                Layout::horizontal([Constraint::Percentage(50), Constraint::Percentage(50)])
                    .areas(content);
            (left, Some(right))
        } else {
            (content, None)
        };

        let body_border = if state.focus == EditorField::Body {
            theme::border_focused()
        } else {
            theme::border_default()
        };
        let body_block = Block::default()
            .title(" Markdown ")
            .borders(Borders::TOP)
            .border_style(Style::default().fg(body_border));
        let body_inner = body_block.inner(edit_area);
        body_block.render(edit_area, buf);

        if state.focus == EditorField::Body {
            state.body.render(body_inner, buf, text_style);
        } else {
            let mut unfocused = state.body.clone();
            unfocused.render(body_inner, buf, text_style);
        }

        if let Some(preview_area) = preview_area {
            let preview_block = Block::default()
                .title(" Preview ")
                .borders(Borders::TOP | Borders::LEFT)
                .border_style(Style::default().fg(theme::border_default()))
                .padding(Padding::horizontal(1));
            let preview_inner = preview_block.inner(preview_area);
            preview_block.render(preview_area, buf);

            let text = MarkdownRenderer::new()
                .with_rule_width(preview_inner.width as usize)
                .render(&state.body.text());
            Paragraph::new(text)
                .style(text_style)
                .wrap(Wrap { trim: false })
                .render(preview_inner, buf);
        }
    }
}
