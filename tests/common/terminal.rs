//! Rendering helpers built on Ratatui's TestBackend.

#![allow(dead_code)]

use mdocs::App;
use ratatui::{backend::TestBackend, buffer::Buffer, Terminal};

/// Draw `app` once into an off-screen terminal of the given size.
pub fn render_app(app: &mut App, width: u16, height: u16) -> Buffer {
    let backend = TestBackend::new(width, height);
    let mut terminal = Terminal::new(backend).expect("Failed to create test terminal");
    terminal
        .draw(|f| app.draw(f))
        .expect("Failed to draw application");
    terminal.backend().buffer().clone()
}

/// Buffer contents as text, one line per row, trailing spaces removed.
pub fn buffer_text(buffer: &Buffer) -> String {
    let area = buffer.area;
    let mut lines = Vec::with_capacity(area.height as usize);

    for y in area.y..area.y + area.height {
        let mut line = String::new();
        for x in area.x..area.x + area.width {
            if let Some(cell) = buffer.cell((x, y)) {
                line.push_str(cell.symbol());
            }
        }
        lines.push(line.trim_end().to_string());
    }

    lines.join("\n")
}

/// Assert that `text` appears somewhere on screen.
pub fn assert_on_screen(buffer: &Buffer, text: &str) {
    let screen = buffer_text(buffer);
    assert!(
        screen.contains(text),
        "Screen does not contain {text:?}.\nScreen:\n{screen}"
    );
}

/// Assert that `text` appears nowhere on screen.
pub fn assert_not_on_screen(buffer: &Buffer, text: &str) {
    let screen = buffer_text(buffer);
    assert!(
        !screen.contains(text),
        "Screen unexpectedly contains {text:?}.\nScreen:\n{screen}"
    );
}
