//! Screen shown when no document is open

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget, Wrap},
};

use super::theme;
use crate::github::RepoTarget;

pub struct Welcome<'a> {
    login: Option<&'a str>,
    target: &'a RepoTarget,
}

impl<'a> Welcome<'a> {
    pub fn new(login: Option<&'a str>, target: &'a RepoTarget) -> Self {
        Self { login, target }
    }

    fn next_step(&self) -> Vec<Line<'static>> {
        let key = |k: &'static str| {
            Span::styled(
                k,
                Style::default()
                    .fg(theme::accent_primary())
                    .add_modifier(Modifier::BOLD),
            )
        };
        let text = |t: &'static str| Span::styled(t, Style::default().fg(theme::text_secondary()));

        if self.login.is_none() {
            vec![Line::from(vec![
                text("Press "),
                key("l"),
                text(" to log in with a personal access token."),
            ])]
        } else if !self.target.is_configured() {
            vec![Line::from(vec![
                text("Press "),
                key("c"),
                text(" to choose the repository that holds your documents."),
            ])]
        } else {
            vec![
                Line::from(vec![
                    text("Select a document and press "),
                    key("Enter"),
                    text(" to read it."),
                ]),
                Line::from(vec![
                    key("n"),
                    text(" new  "),
                    key("u"),
                    text(" upload  "),
                    key("/"),
                    text(" search  "),
                    key("?"),
                    text(" help"),
                ]),
            ]
        }
    }
}

impl Widget for Welcome<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme::border_default()))
            .style(Style::default().bg(theme::bg_base()));
        let inner = block.inner(area);
        block.render(area, buf);

        let mut lines = vec![
            Line::from(Span::styled(
                "mdocs",
                Style::default()
                    .fg(theme::accent_primary())
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(
                "Markdown documents in a GitHub repository",
                Style::default().fg(theme::text_muted()),
            )),
            Line::default(),
        ];
        match self.login {
            Some(login) => lines.push(Line::from(vec![
                Span::styled("Signed in as ", Style::default().fg(theme::text_secondary())),
                Span::styled(
                    login.to_string(),
                    Style::default().fg(theme::accent_success()),
                ),
            ])),
            None => lines.push(Line::from(Span::styled(
                "Not signed in",
                Style::default().fg(theme::accent_warning()),
            ))),
        }
        if self.target.is_configured() {
            lines.push(Line::from(Span::styled(
                self.target.to_string(),
                Style::default().fg(theme::text_secondary()),
            )));
        }
        lines.push(Line::default());
        lines.extend(self.next_step());

        let height = lines.len() as u16;
        let [_, content, _] = Layout::vertical([
            Constraint::Fill(1),
            Constraint::Length(height),
            Constraint::Fill(1),
        ])
        .areas(inner);

        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .render(content, buf);
    }
}
