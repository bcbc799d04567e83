//! Multi-line text buffer for the document editor

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Text},
    widgets::{Paragraph, Widget},
};
use unicode_width::UnicodeWidthStr;

/// Editable lines with a cursor. `col` is a byte offset into the cursor
/// line and always sits on a char boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextAreaState {
    lines: Vec<String>,
    row: usize,
    col: usize,
    scroll: usize,
}

impl Default for TextAreaState {
    fn default() -> Self {
        Self {
            lines: vec![String::new()],
            row: 0,
            col: 0,
            scroll: 0,
        }
    }
}

impl TextAreaState {
    pub fn from_text(text: &str) -> Self {
        let mut lines: Vec<String> = text.split('\n').map(str::to_string).collect();
        if lines.is_empty() {
            lines.push(String::new());
        }
        Self {
            lines,
            ..Self::default()
        }
    }

    pub fn text(&self) -> String {
        self.lines.join("\n")
    }

    pub fn cursor(&self) -> (usize, usize) {
        (self.row, self.col)
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    fn line(&self) -> &str {
        &self.lines[self.row]
    }

    fn line_mut(&mut self) -> &mut String {
        &mut self.lines[self.row]
    }

    pub fn insert_char(&mut self, c: char) {
        if c == '\n' {
            self.insert_newline();
            return;
        }
        let col = self.col;
        self.line_mut().insert(col, c);
        self.col += c.len_utf8();
    }

    /// Insert pasted text, splitting on newlines.
    pub fn insert_str(&mut self, s: &str) {
        for c in s.chars().filter(|c| *c == '\n' || !c.is_control()) {
            self.insert_char(c);
        }
    }

    pub fn insert_newline(&mut self) {
        let col = self.col;
        let rest = self.line_mut().split_off(col);
        self.lines.insert(self.row + 1, rest);
        self.row += 1;
        self.col = 0;
    }

    pub fn backspace(&mut self) {
        if self.col > 0 {
            let start = self.line()[..self.col]
                .char_indices()
                .next_back()
                .map_or(0, |(i, _)| i);
            let end = self.col;
            self.line_mut().drain(start..end);
            self.col = start;
        } else if self.row > 0 {
            let current = self.lines.remove(self.row);
            self.row -= 1;
            self.col = self.line().len();
            self.line_mut().push_str(&current);
        }
    }

    pub fn delete(&mut self) {
        if self.col < self.line().len() {
            let end = self.line()[self.col..]
                .chars()
                .next()
                .map_or(self.col, |c| self.col + c.len_utf8());
            let start = self.col;
            self.line_mut().drain(start..end);
        } else if self.row + 1 < self.lines.len() {
            let next = self.lines.remove(self.row + 1);
            self.line_mut().push_str(&next);
        }
    }

    pub fn move_left(&mut self) {
        if self.col > 0 {
            self.col = self.line()[..self.col]
                .char_indices()
                .next_back()
                .map_or(0, |(i, _)| i);
        } else if self.row > 0 {
            self.row -= 1;
            self.col = self.line().len();
        }
    }

    pub fn move_right(&mut self) {
        if let Some(c) = self.line()[self.col..].chars().next() {
            self.col += c.len_utf8();
        } else if self.row + 1 < self.lines.len() {
            self.row += 1;
            self.col = 0;
        }
    }

    pub fn move_up(&mut self) {
        if self.row > 0 {
            let width = self.cursor_width();
            self.row -= 1;
            self.col = byte_at_width(self.line(), width);
        }
    }

    pub fn move_down(&mut self) {
        if self.row + 1 < self.lines.len() {
            let width = self.cursor_width();
            self.row += 1;
            self.col = byte_at_width(self.line(), width);
        }
    }

    pub fn page_up(&mut self, rows: usize) {
        for _ in 0..rows {
            self.move_up();
        }
    }

    pub fn page_down(&mut self, rows: usize) {
        for _ in 0..rows {
            self.move_down();
        }
    }

    pub fn move_home(&mut self) {
        self.col = 0;
    }

    pub fn move_end(&mut self) {
        self.col = self.line().len();
    }

    fn cursor_width(&self) -> usize {
        self.line()[..self.col].width()
    }

    /// Render the buffer, scrolled so the cursor stays visible.
    pub fn render(&mut self, area: Rect, buf: &mut Buffer, style: Style) {
        if area.height == 0 || area.width == 0 {
            return;
        }
        let visible = area.height as usize;
        if self.row < self.scroll {
            self.scroll = self.row;
        } else if self.row >= self.scroll + visible {
            self.scroll = self.row + 1 - visible;
        }

        let cursor_x = self.cursor_width() as u16;
        let h_scroll = cursor_x.saturating_sub(area.width.saturating_sub(1));

        let text = Text::from(
            self.lines
                .iter()
                .skip(self.scroll)
                .take(visible)
                .map(|l| Line::from(l.clone()))
                .collect::<Vec<_>>(),
        );
        Paragraph::new(text)
            .style(style)
            .scroll((0, h_scroll))
            .render(area, buf);

        let x = area.x + (cursor_x - h_scroll).min(area.width.saturating_sub(1));
        let y = area.y + (self.row - self.scroll) as u16;
        buf[(x, y)].set_style(Style::default().add_modifier(Modifier::REVERSED));
    }
}

/// Byte offset of the last char boundary whose display width is at most `width`.
fn byte_at_width(line: &str, width: usize) -> usize {
    let mut acc = 0;
    for (i, c) in line.char_indices() {
        let w = unicode_width::UnicodeWidthChar::width(c).unwrap_or(0);
        if acc + w > width {
            return i;
        }
        acc += w;
    }
    line.len()
}
