use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};
use unicode_width::UnicodeWidthStr;

use super::spinner::Spinner;
use super::theme;
use crate::config::ThemeMode;
use crate::github::RepoTarget;
use crate::store::{Notice, NoticeLevel};

/// Bottom line: account, repository, busy spinner or last notice, theme
pub struct StatusBar<'a> {
    login: Option<&'a str>,
    target: &'a RepoTarget,
    busy: Option<&'a str>,
    spinner: &'a Spinner,
    notice: Option<&'a Notice>,
    theme: ThemeMode,
}

impl<'a> StatusBar<'a> {
    pub fn new(target: &'a RepoTarget, spinner: &'a Spinner) -> Self {
        Self {
            login: None,
            target,
            busy: None,
            spinner,
            notice: None,
            theme: ThemeMode::default(),
        }
    }

    pub fn login(mut self, login: Option<&'a str>) -> Self {
        self.login = login;
        self
    }

    pub fn busy(mut self, busy: Option<&'a str>) -> Self {
        self.busy = busy;
        self
    }

    pub fn notice(mut self, notice: Option<&'a Notice>) -> Self {
        self.notice = notice;
        self
    }

    pub fn theme(mut self, theme: ThemeMode) -> Self {
        self.theme = theme;
        self
    }
}

impl Widget for StatusBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let muted = Style::default().fg(theme::text_muted());
        let mut left = vec![Span::raw(" ")];

        match self.login {
            Some(login) => left.push(Span::styled(
                format!("@{login}"),
                Style::default().fg(theme::accent_success()),
            )),
            None => left.push(Span::styled(
                "logged out",
                Style::default().fg(theme::accent_warning()),
            )),
        }
        left.push(Span::styled(" │ ", muted));
        if self.target.is_configured() {
            left.push(Span::styled(
                self.target.to_string(),
                Style::default().fg(theme::text_secondary()),
            ));
        } else {
            left.push(Span::styled("no repository", muted));
        }
        left.push(Span::styled(" │ ", muted));

        if let Some(label) = self.busy {
            left.extend(self.spinner.with_label(label, theme::accent_primary()));
        } else if let Some(notice) = self.notice {
            let color = match notice.level {
                NoticeLevel::Info => theme::text_secondary(),
                NoticeLevel::Error => theme::accent_error(),
            };
            left.push(Span::styled(notice.text.clone(), Style::default().fg(color)));
        }

        let right = format!("{} │ ? help ", self.theme.as_str());
        let used: usize = left.iter().map(|s| s.content.width()).sum();
        let pad = (area.width as usize).saturating_sub(used + right.width());
        left.push(Span::raw(" ".repeat(pad)));
        left.push(Span::styled(right, muted));

        Paragraph::new(Line::from(left))
            .style(Style::default().bg(theme::bg_surface()))
            .render(area, buf);
    }
}
