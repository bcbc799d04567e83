use pulldown_cmark::{Alignment, CodeBlockKind, Event, HeadingLevel, Options, Parser, Tag, TagEnd};
use ratatui::{
    style::{Modifier, Style},
    text::{Line, Span, Text},
};
use unicode_width::UnicodeWidthStr;

use super::highlight;
use super::theme;

/// Markdown to styled terminal text.
///
/// Soft line breaks are kept as line breaks, so text wrapped in the source
/// is shown the way it was typed.
pub struct MarkdownRenderer {
    rule_width: usize,
}

/// Accumulates rendered lines
struct LineBuilder {
    lines: Vec<Line<'static>>,
    spans: Vec<Span<'static>>,
    styles: Vec<Style>,
    quote_depth: usize,
}

impl LineBuilder {
    fn new(base: Style) -> Self {
        Self {
            lines: Vec::new(),
            spans: Vec::new(),
            styles: vec![base],
            quote_depth: 0,
        }
    }

    fn style(&self) -> Style {
        self.styles.last().copied().unwrap_or_default()
    }

    fn push_style(&mut self, style: Style) {
        self.styles.push(style);
    }

    /// Current style with `modifier` added
    fn push_modifier(&mut self, modifier: Modifier) {
        let style = self.style().add_modifier(modifier);
        self.styles.push(style);
    }

    fn pop_style(&mut self) {
        if self.styles.len() > 1 {
            self.styles.pop();
        }
    }

    fn push(&mut self, span: Span<'static>) {
        if self.spans.is_empty() && self.quote_depth > 0 {
            self.spans.push(Span::styled(
                "│ ".repeat(self.quote_depth),
                Style::default().fg(theme::text_muted()),
            ));
        }
        self.spans.push(span);
    }

    fn push_text(&mut self, text: &str) {
        let style = self.style();
        self.push(Span::styled(text.to_string(), style));
    }

    fn flush(&mut self) {
        if !self.spans.is_empty() {
            self.lines.push(Line::from(std::mem::take(&mut self.spans)));
        }
    }

    fn push_line(&mut self, line: Line<'static>) {
        self.flush();
        self.lines.push(line);
    }

    /// Separate blocks with one empty line.
    fn blank(&mut self) {
        self.flush();
        if self.lines.last().is_some_and(|line| line.width() > 0) {
            self.lines.push(Line::default());
        }
    }

    fn finish(mut self) -> Text<'static> {
        self.flush();
        while self.lines.last().is_some_and(|line| line.width() == 0) {
            self.lines.pop();
        }
        Text::from(self.lines)
    }
}

#[derive(Default)]
struct TableState {
    rows: Vec<Vec<String>>,
    row: Vec<String>,
    cell: String,
    alignments: Vec<Alignment>,
}

struct CodeState {
    hint: Option<String>,
    content: String,
}

impl MarkdownRenderer {
    pub fn new() -> Self {
        Self { rule_width: 40 }
    }

    pub fn with_rule_width(mut self, width: usize) -> Self {
        self.rule_width = width.max(3);
        self
    }

    pub fn render(&self, markdown: &str) -> Text<'static> {
        let mut options = Options::empty();
        options.insert(Options::ENABLE_TABLES);
        options.insert(Options::ENABLE_STRIKETHROUGH);
        options.insert(Options::ENABLE_TASKLISTS);

        let mut out = LineBuilder::new(Style::default().fg(theme::text_primary()));
        let mut table: Option<TableState> = None;
        let mut code: Option<CodeState> = None;
        // None = bullet list, Some(n) = next number of an ordered list
        let mut lists: Vec<Option<u64>> = Vec::new();
        let mut links: Vec<String> = Vec::new();

        for event in Parser::new_ext(markdown, options) {
            match event {
                Event::Start(tag) => match tag {
                    Tag::Heading { level, .. } => {
                        out.flush();
                        out.push_style(heading_style(level));
                    }
                    Tag::BlockQuote(_) => {
                        out.flush();
                        out.quote_depth += 1;
                        out.push_style(
                            Style::default()
                                .fg(theme::text_secondary())
                                .add_modifier(Modifier::ITALIC),
                        );
                    }
                    Tag::CodeBlock(kind) => {
                        out.flush();
                        let hint = match kind {
                            CodeBlockKind::Fenced(info) => info
                                .split_whitespace()
                                .next()
                                .map(|lang| lang.to_string()),
                            CodeBlockKind::Indented => None,
                        };
                        code = Some(CodeState {
                            hint,
                            content: String::new(),
                        });
                    }
                    Tag::List(start) => {
                        out.flush();
                        lists.push(start);
                    }
                    Tag::Item => {
                        out.flush();
                        let indent = "  ".repeat(lists.len().saturating_sub(1));
                        let bullet = match lists.last_mut() {
                            Some(Some(n)) => {
                                let bullet = format!("{indent}{n}. ");
                                *n += 1;
                                bullet
                            }
                            _ => format!("{indent}• "),
                        };
                        out.push(Span::styled(
                            bullet,
                            Style::default().fg(theme::accent_primary()),
                        ));
                    }
                    Tag::Emphasis => out.push_modifier(Modifier::ITALIC),
                    Tag::Strong => out.push_modifier(Modifier::BOLD),
                    Tag::Strikethrough => out.push_modifier(Modifier::CROSSED_OUT),
                    Tag::Link { dest_url, .. } => {
                        links.push(dest_url.to_string());
                        out.push_style(
                            Style::default()
                                .fg(theme::accent_primary())
                                .add_modifier(Modifier::UNDERLINED),
                        );
                    }
                    Tag::Image { .. } => {
                        out.push(Span::styled(
                            "[image: ",
                            Style::default().fg(theme::text_muted()),
                        ));
                    }
                    Tag::Table(alignments) => {
                        out.flush();
                        table = Some(TableState {
                            alignments,
                            ..TableState::default()
                        });
                    }
                    Tag::TableHead | Tag::TableRow => {
                        if let Some(t) = table.as_mut() {
                            t.row.clear();
                        }
                    }
                    Tag::TableCell => {
                        if let Some(t) = table.as_mut() {
                            t.cell.clear();
                        }
                    }
                    _ => {}
                },
                Event::End(tag_end) => match tag_end {
                    TagEnd::Paragraph => {
                        if lists.is_empty() {
                            out.blank();
                        } else {
                            out.flush();
                        }
                    }
                    TagEnd::Heading(_) => {
                        out.pop_style();
                        out.blank();
                    }
                    TagEnd::BlockQuote(_) => {
                        out.pop_style();
                        out.flush();
                        out.quote_depth = out.quote_depth.saturating_sub(1);
                        if out.quote_depth == 0 {
                            out.blank();
                        }
                    }
                    TagEnd::CodeBlock => {
                        if let Some(block) = code.take() {
                            self.render_code_block(&block, &mut out);
                        }
                        out.blank();
                    }
                    TagEnd::List(_) => {
                        out.flush();
                        lists.pop();
                        if lists.is_empty() {
                            out.blank();
                        }
                    }
                    TagEnd::Item => out.flush(),
                    TagEnd::Emphasis | TagEnd::Strong | TagEnd::Strikethrough => out.pop_style(),
                    TagEnd::Link => {
                        out.pop_style();
                        if let Some(url) = links.pop().filter(|u| !u.is_empty() && !u.starts_with('#')) {
                            out.push(Span::styled(
                                format!(" ({url})"),
                                Style::default().fg(theme::text_muted()),
                            ));
                        }
                    }
                    TagEnd::Image => {
                        out.push(Span::styled("]", Style::default().fg(theme::text_muted())));
                    }
                    TagEnd::Table => {
                        if let Some(t) = table.take() {
                            self.render_table(&t.rows, &t.alignments, &mut out);
                        }
                        out.blank();
                    }
                    TagEnd::TableHead | TagEnd::TableRow => {
                        if let Some(t) = table.as_mut() {
                            if !t.row.is_empty() {
                                let row = std::mem::take(&mut t.row);
                                t.rows.push(row);
                            }
                        }
                    }
                    TagEnd::TableCell => {
                        if let Some(t) = table.as_mut() {
                            let cell = std::mem::take(&mut t.cell);
                            t.row.push(cell);
                        }
                    }
                    _ => {}
                },
                Event::Text(text) => {
                    if let Some(block) = code.as_mut() {
                        block.content.push_str(&text);
                    } else if let Some(t) = table.as_mut() {
                        t.cell.push_str(&text);
                    } else {
                        out.push_text(&text);
                    }
                }
                Event::Code(inline) => {
                    if let Some(t) = table.as_mut() {
                        t.cell.push('`');
                        t.cell.push_str(&inline);
                        t.cell.push('`');
                    } else {
                        out.push(Span::styled(
                            inline.to_string(),
                            Style::default()
                                .fg(theme::accent_warning())
                                .bg(theme::inline_code_bg()),
                        ));
                    }
                }
                Event::SoftBreak | Event::HardBreak => {
                    if let Some(t) = table.as_mut() {
                        t.cell.push(' ');
                    } else {
                        out.flush();
                    }
                }
                Event::Rule => {
                    out.push_line(Line::from(Span::styled(
                        "─".repeat(self.rule_width),
                        Style::default().fg(theme::border_default()),
                    )));
                    out.blank();
                }
                Event::TaskListMarker(checked) => {
                    let (marker, color) = if checked {
                        ("☑ ", theme::accent_success())
                    } else {
                        ("☐ ", theme::text_secondary())
                    };
                    out.push(Span::styled(marker, Style::default().fg(color)));
                }
                Event::Html(html) | Event::InlineHtml(html) => {
                    let style = Style::default().fg(theme::text_muted());
                    for (i, part) in html.split('\n').enumerate() {
                        if i > 0 {
                            out.flush();
                        }
                        if !part.is_empty() {
                            out.push(Span::styled(part.to_string(), style));
                        }
                    }
                }
                _ => {}
            }
        }

        out.finish()
    }

    fn render_code_block(&self, block: &CodeState, out: &mut LineBuilder) {
        let base = Style::default().bg(theme::code_bg());
        let fence = Style::default().fg(theme::text_muted());
        let label = highlight::resolve(&block.content, block.hint.as_deref())
            .map(|lang| lang.name())
            .unwrap_or_default();

        out.push_line(Line::from(Span::styled(format!("```{label}"), fence)));
        for line in highlight::highlight(&block.content, block.hint.as_deref(), base) {
            let mut spans = vec![Span::styled(" ", base)];
            spans.extend(line.spans);
            spans.push(Span::styled(" ", base));
            out.push_line(Line::from(spans));
        }
        out.push_line(Line::from(Span::styled("```", fence)));
    }

    fn render_table(&self, rows: &[Vec<String>], alignments: &[Alignment], out: &mut LineBuilder) {
        if rows.is_empty() {
            return;
        }

        let num_cols = rows.iter().map(|r| r.len()).max().unwrap_or(0);
        let mut col_widths: Vec<usize> = vec![3; num_cols];
        for row in rows {
            for (i, cell) in row.iter().enumerate() {
                col_widths[i] = col_widths[i].max(cell.width());
            }
        }

        let border_style = Style::default().fg(theme::border_default());
        let header_style = Style::default()
            .fg(theme::accent_primary())
            .add_modifier(Modifier::BOLD);
        let cell_style = Style::default().fg(theme::text_primary());

        out.push_line(Line::from(Span::styled(
            table_border(&col_widths, '┌', '┬', '┐'),
            border_style,
        )));

        for (row_idx, row) in rows.iter().enumerate() {
            let style = if row_idx == 0 { header_style } else { cell_style };
            let mut spans = vec![Span::styled("│", border_style)];
            for (col_idx, width) in col_widths.iter().enumerate() {
                let cell = row.get(col_idx).map(String::as_str).unwrap_or("");
                let alignment = alignments.get(col_idx).copied().unwrap_or(Alignment::None);
                spans.push(Span::styled(
                    format!(" {} ", align_text(cell, *width, alignment)),
                    style,
                ));
                spans.push(Span::styled("│", border_style));
            }
            out.push_line(Line::from(spans));

            if row_idx == 0 && rows.len() > 1 {
                out.push_line(Line::from(Span::styled(
                    table_border(&col_widths, '├', '┼', '┤'),
                    border_style,
                )));
            }
        }

        out.push_line(Line::from(Span::styled(
            table_border(&col_widths, '└', '┴', '┘'),
            border_style,
        )));
    }
}

impl Default for MarkdownRenderer {
    fn default() -> Self {
        Self::new()
    }
}

fn heading_style(level: HeadingLevel) -> Style {
    let bold = Style::default().add_modifier(Modifier::BOLD);
    match level {
        HeadingLevel::H1 => bold
            .fg(theme::accent_primary())
            .add_modifier(Modifier::UNDERLINED),
        HeadingLevel::H2 => bold.fg(theme::accent_secondary()),
        HeadingLevel::H3 => bold.fg(theme::accent_primary()),
        HeadingLevel::H4 => bold.fg(theme::text_bright()),
        HeadingLevel::H5 | HeadingLevel::H6 => Style::default().fg(theme::text_secondary()),
    }
}

fn table_border(widths: &[usize], left: char, mid: char, right: char) -> String {
    let inner: Vec<String> = widths.iter().map(|w| "─".repeat(w + 2)).collect();
    format!("{left}{}{right}", inner.join(&mid.to_string()))
}

fn align_text(text: &str, width: usize, alignment: Alignment) -> String {
    let text_width = text.width();
    if text_width >= width {
        return text.to_string();
    }
    let padding = width - text_width;
    match alignment {
        Alignment::Left | Alignment::None => format!("{text}{}", " ".repeat(padding)),
        Alignment::Right => format!("{}{text}", " ".repeat(padding)),
        Alignment::Center => {
            let left = padding / 2;
            format!("{}{text}{}", " ".repeat(left), " ".repeat(padding - left))
        }
    }
}
