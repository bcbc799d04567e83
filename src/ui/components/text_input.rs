//! Single-line text input with cursor management

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    widgets::{Paragraph, Widget},
};
use unicode_width::UnicodeWidthStr;

/// Single-line input. `cursor` is a byte offset on a char boundary.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextInputState {
    input: String,
    cursor: usize,
    /// Render every character as `•`
    masked: bool,
}

impl TextInputState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_value(value: &str) -> Self {
        Self {
            input: value.to_string(),
            cursor: value.len(),
            masked: false,
        }
    }

    /// Input whose contents are hidden on screen (tokens)
    pub fn masked() -> Self {
        Self {
            masked: true,
            ..Self::default()
        }
    }

    pub fn set(&mut self, value: &str) {
        self.input = value.to_string();
        self.cursor = self.input.len();
    }

    pub fn clear(&mut self) {
        self.input.clear();
        self.cursor = 0;
    }

    pub fn value(&self) -> &str {
        &self.input
    }

    pub fn is_empty(&self) -> bool {
        self.input.is_empty()
    }

    pub fn insert_char(&mut self, c: char) {
        self.input.insert(self.cursor, c);
        self.cursor += c.len_utf8();
    }

    pub fn insert_str(&mut self, s: &str) {
        let s: String = s.chars().filter(|c| !c.is_control()).collect();
        self.input.insert_str(self.cursor, &s);
        self.cursor += s.len();
    }

    fn prev_boundary(&self) -> usize {
        self.input[..self.cursor]
            .char_indices()
            .next_back()
            .map_or(0, |(i, _)| i)
    }

    fn next_boundary(&self) -> usize {
        self.input[self.cursor..]
            .chars()
            .next()
            .map_or(self.cursor, |c| self.cursor + c.len_utf8())
    }

    /// Backspace
    pub fn delete_char(&mut self) {
        if self.cursor > 0 {
            let start = self.prev_boundary();
            self.input.drain(start..self.cursor);
            self.cursor = start;
        }
    }

    /// Delete
    pub fn delete_forward(&mut self) {
        if self.cursor < self.input.len() {
            let end = self.next_boundary();
            self.input.drain(self.cursor..end);
        }
    }

    pub fn move_left(&mut self) {
        self.cursor = self.prev_boundary();
    }

    pub fn move_right(&mut self) {
        self.cursor = self.next_boundary();
    }

    pub fn move_start(&mut self) {
        self.cursor = 0;
    }

    pub fn move_end(&mut self) {
        self.cursor = self.input.len();
    }

    /// Ctrl+U
    pub fn delete_to_start(&mut self) {
        self.input.drain(..self.cursor);
        self.cursor = 0;
    }

    /// Ctrl+W
    pub fn delete_word(&mut self) {
        let before = &self.input[..self.cursor];
        let trimmed = before.trim_end_matches(' ');
        let start = trimmed.rfind(' ').map_or(0, |i| i + 1);
        self.input.drain(start..self.cursor);
        self.cursor = start;
    }

    fn display(&self) -> String {
        if self.masked {
            "•".repeat(self.input.chars().count())
        } else {
            self.input.clone()
        }
    }

    /// Render the text, or `placeholder` when empty, with a block cursor.
    pub fn render(
        &self,
        area: Rect,
        buf: &mut Buffer,
        style: Style,
        placeholder: Option<(&str, Style)>,
    ) {
        match placeholder {
            Some((text, placeholder_style)) if self.input.is_empty() => {
                Paragraph::new(text).style(placeholder_style).render(area, buf);
            }
            _ => {
                let shown = self.display();
                let cursor_col = if self.masked {
                    self.input[..self.cursor].chars().count()
                } else {
                    self.input[..self.cursor].width()
                } as u16;
                // keep the cursor in view on long input
                let skip = cursor_col.saturating_sub(area.width.saturating_sub(1));
                Paragraph::new(shown)
                    .style(style)
                    .scroll((0, skip))
                    .render(area, buf);
            }
        }

        if area.width > 0 && area.height > 0 {
            let col = if self.masked {
                self.input[..self.cursor].chars().count()
            } else {
                self.input[..self.cursor].width()
            } as u16;
            let x = area.x + col.min(area.width.saturating_sub(1));
            buf[(x, area.y)].set_style(Style::default().add_modifier(Modifier::REVERSED));
        }
    }
}

impl std::fmt::Display for TextInputState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.input)
    }
}
