use ratatui::{
    style::{Color, Style},
    text::Span,
};

const FRAMES: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// Braille spinner shown while a remote call is outstanding
#[derive(Debug, Clone, Default)]
pub struct Spinner {
    tick: usize,
}

impl Spinner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tick(&mut self) {
        self.tick = (self.tick + 1) % FRAMES.len();
    }

    pub fn frame(&self) -> &'static str {
        FRAMES[self.tick % FRAMES.len()]
    }

    /// Current frame followed by `label`
    pub fn with_label(&self, label: &str, color: Color) -> Vec<Span<'static>> {
        vec![
            Span::styled(self.frame(), Style::default().fg(color)),
            Span::raw(" "),
            Span::styled(label.to_string(), Style::default().fg(color)),
        ]
    }
}
