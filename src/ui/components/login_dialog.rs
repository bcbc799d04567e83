//! Login dialog: personal access token, or the browser OAuth handshake

use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    symbols::border,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget, Wrap},
};

use super::dialog::{DialogFrame, InstructionBar, StatusLine};
use super::text_input::TextInputState;
use super::theme;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoginMode {
    #[default]
    Token,
    /// Authorize URL shown, waiting for the pasted callback URL
    OAuth,
}

#[derive(Debug, Clone)]
pub struct LoginDialogState {
    pub visible: bool,
    pub mode: LoginMode,
    pub token: TextInputState,
    pub callback: TextInputState,
    pub authorize_url: Option<String>,
    pub error: Option<String>,
}

impl Default for LoginDialogState {
    fn default() -> Self {
        Self {
            visible: false,
            mode: LoginMode::Token,
            token: TextInputState::masked(),
            callback: TextInputState::new(),
            authorize_url: None,
            error: None,
        }
    }
}

impl LoginDialogState {
    pub fn show(&mut self) {
        *self = Self {
            visible: true,
            ..Self::default()
        };
    }

    pub fn hide(&mut self) {
        self.visible = false;
        self.token.clear();
        self.callback.clear();
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Switch to the OAuth step with `url` to open in a browser.
    pub fn show_authorize_url(&mut self, url: String) {
        self.mode = LoginMode::OAuth;
        self.authorize_url = Some(url);
        self.callback.clear();
        self.error = None;
    }

    pub fn set_error(&mut self, error: impl Into<String>) {
        self.error = Some(error.into());
    }

    /// Field receiving keys
    pub fn input_mut(&mut self) -> &mut TextInputState {
        match self.mode {
            LoginMode::Token => &mut self.token,
            LoginMode::OAuth => &mut self.callback,
        }
    }
}

pub struct LoginDialog;

impl LoginDialog {
    pub fn new() -> Self {
        Self
    }

    pub fn render(&self, area: Rect, buf: &mut Buffer, state: &LoginDialogState) {
        if !state.visible {
            return;
        }

        let height = match state.mode {
            LoginMode::Token => 11,
            LoginMode::OAuth => 15,
        };
        let frame = DialogFrame::new("Log In", 68, height);
        let inner = frame.render(area, buf);

        let label_style = Style::default().fg(theme::text_primary());
        let input_block = Block::default()
            .borders(Borders::ALL)
            .border_set(border::ROUNDED)
            .border_style(Style::default().fg(if state.error.is_some() {
                theme::accent_error()
            } else {
                theme::border_focused()
            }));
        let text_style = Style::default().fg(theme::text_bright());
        let placeholder_style = Style::default().fg(theme::text_muted());

        match state.mode {
            LoginMode::Token => {
                let chunks = Layout::vertical([
                    Constraint::Length(1),
                    Constraint::Length(1),
                    Constraint::Length(3),
                    Constraint::Length(1),
                    Constraint::Length(1),
                    Constraint::Length(1),
                ])
                .split(inner);

                Paragraph::new("GitHub personal access token (repo scope):")
                    .style(label_style)
                    .render(chunks[0], buf);

                let field = input_block.inner(chunks[2]);
                input_block.render(chunks[2], buf);
                state
                    .token
                    .render(field, buf, text_style, Some(("ghp_...", placeholder_style)));

                StatusLine::new()
                    .error(state.error.as_deref())
                    .hint("The token is stored in the data directory")
                    .render(chunks[3], buf);

                InstructionBar::new(vec![
                    ("Enter", "log in"),
                    ("Ctrl+O", "browser login"),
                    ("Esc", "cancel"),
                ])
                .render(chunks[5], buf);
            }
            LoginMode::OAuth => {
                let chunks = Layout::vertical([
                    Constraint::Length(1),
                    Constraint::Length(4),
                    Constraint::Length(1),
                    Constraint::Length(3),
                    Constraint::Length(1),
                    Constraint::Length(1),
                    Constraint::Length(1),
                ])
                .split(inner);

                Paragraph::new("Open this address in a browser and approve access:")
                    .style(label_style)
                    .render(chunks[0], buf);
                Paragraph::new(Line::from(Span::styled(
                    state.authorize_url.clone().unwrap_or_default(),
                    Style::default()
                        .fg(theme::accent_primary())
                        .add_modifier(Modifier::UNDERLINED),
                )))
                .wrap(Wrap { trim: false })
                .render(chunks[1], buf);
                Paragraph::new("Then paste the address you were redirected to:")
                    .style(label_style)
                    .render(chunks[2], buf);

                let field = input_block.inner(chunks[3]);
                input_block.render(chunks[3], buf);
                state.callback.render(
                    field,
                    buf,
                    text_style,
                    Some(("https://...?code=...&state=...", placeholder_style)),
                );

                StatusLine::new()
                    .error(state.error.as_deref())
                    .hint("The login link expires after five minutes")
                    .render(chunks[4], buf);

                InstructionBar::new(vec![("Enter", "verify"), ("Esc", "cancel")])
                    .render(chunks[6], buf);
            }
        }
    }
}

impl Default for LoginDialog {
    fn default() -> Self {
        Self::new()
    }
}
