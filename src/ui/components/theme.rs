//! Runtime-switchable colors for the TUI.
//!
//! Render code reads colors through the accessor functions; switching modes
//! replaces the palette behind a global lock and takes effect on the next
//! frame.

use std::sync::OnceLock;

use parking_lot::RwLock;
use ratatui::style::Color;

use crate::config::ThemeMode;

/// Semantic colors
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Theme {
    pub mode: ThemeMode,

    pub bg_base: Color,
    pub bg_surface: Color,
    pub bg_highlight: Color,
    pub code_bg: Color,
    pub inline_code_bg: Color,

    pub text_bright: Color,
    pub text_primary: Color,
    pub text_secondary: Color,
    pub text_muted: Color,

    pub accent_primary: Color,
    pub accent_secondary: Color,
    pub accent_success: Color,
    pub accent_warning: Color,
    pub accent_error: Color,

    pub border_default: Color,
    pub border_focused: Color,

    pub syntax_keyword: Color,
    pub syntax_string: Color,
    pub syntax_number: Color,
    pub syntax_comment: Color,
    pub syntax_plain: Color,
}

impl Theme {
    pub fn dark() -> Self {
        Self {
            mode: ThemeMode::Dark,

            bg_base: Color::Rgb(22, 22, 30),
            bg_surface: Color::Rgb(30, 30, 40),
            bg_highlight: Color::Rgb(50, 55, 70),
            code_bg: Color::Rgb(30, 30, 30),
            inline_code_bg: Color::Rgb(40, 40, 40),

            text_bright: Color::Rgb(250, 250, 255),
            text_primary: Color::Rgb(220, 220, 230),
            text_secondary: Color::Rgb(160, 160, 180),
            text_muted: Color::Rgb(100, 100, 120),

            accent_primary: Color::Rgb(130, 170, 255),
            accent_secondary: Color::Rgb(180, 140, 255),
            accent_success: Color::Rgb(130, 200, 140),
            accent_warning: Color::Rgb(230, 180, 100),
            accent_error: Color::Rgb(230, 120, 120),

            border_default: Color::Rgb(50, 50, 65),
            border_focused: Color::Rgb(130, 170, 255),

            syntax_keyword: Color::Rgb(198, 120, 221),
            syntax_string: Color::Rgb(152, 195, 121),
            syntax_number: Color::Rgb(209, 154, 102),
            syntax_comment: Color::Rgb(110, 115, 130),
            syntax_plain: Color::Rgb(200, 205, 215),
        }
    }

    pub fn light() -> Self {
        Self {
            mode: ThemeMode::Light,

            bg_base: Color::Rgb(250, 250, 252),
            bg_surface: Color::Rgb(240, 240, 245),
            bg_highlight: Color::Rgb(210, 215, 225),
            code_bg: Color::Rgb(235, 235, 240),
            inline_code_bg: Color::Rgb(225, 225, 232),

            text_bright: Color::Rgb(15, 15, 20),
            text_primary: Color::Rgb(35, 35, 45),
            text_secondary: Color::Rgb(90, 90, 105),
            text_muted: Color::Rgb(140, 140, 155),

            accent_primary: Color::Rgb(60, 120, 220),
            accent_secondary: Color::Rgb(130, 80, 200),
            accent_success: Color::Rgb(40, 160, 60),
            accent_warning: Color::Rgb(200, 140, 30),
            accent_error: Color::Rgb(200, 60, 60),

            border_default: Color::Rgb(200, 200, 210),
            border_focused: Color::Rgb(60, 120, 220),

            syntax_keyword: Color::Rgb(166, 38, 164),
            syntax_string: Color::Rgb(80, 161, 79),
            syntax_number: Color::Rgb(152, 104, 1),
            syntax_comment: Color::Rgb(160, 161, 167),
            syntax_plain: Color::Rgb(56, 58, 66),
        }
    }

    pub fn for_mode(mode: ThemeMode) -> Self {
        match mode {
            ThemeMode::Dark => Self::dark(),
            ThemeMode::Light => Self::light(),
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::dark()
    }
}

static THEME: OnceLock<RwLock<Theme>> = OnceLock::new();

fn theme_lock() -> &'static RwLock<Theme> {
    THEME.get_or_init(|| RwLock::new(Theme::default()))
}

#[inline]
pub fn current_theme() -> parking_lot::RwLockReadGuard<'static, Theme> {
    theme_lock().read()
}

pub fn set_theme(theme: Theme) {
    *theme_lock().write() = theme;
}

/// Switch the palette to `mode`.
pub fn apply_mode(mode: ThemeMode) {
    if current_theme().mode != mode {
        set_theme(Theme::for_mode(mode));
        tracing::debug!(mode = %mode, "Theme applied");
    }
}

pub fn current_mode() -> ThemeMode {
    current_theme().mode
}

#[inline]
pub fn bg_base() -> Color {
    current_theme().bg_base
}
#[inline]
pub fn bg_surface() -> Color {
    current_theme().bg_surface
}
#[inline]
pub fn bg_highlight() -> Color {
    current_theme().bg_highlight
}
#[inline]
pub fn code_bg() -> Color {
    current_theme().code_bg
}
#[inline]
pub fn inline_code_bg() -> Color {
    current_theme().inline_code_bg
}

#[inline]
pub fn text_bright() -> Color {
    current_theme().text_bright
}
#[inline]
pub fn text_primary() -> Color {
    current_theme().text_primary
}
#[inline]
pub fn text_secondary() -> Color {
    current_theme().text_secondary
}
#[inline]
pub fn text_muted() -> Color {
    current_theme().text_muted
}

#[inline]
pub fn accent_primary() -> Color {
    current_theme().accent_primary
}
#[inline]
pub fn accent_secondary() -> Color {
    current_theme().accent_secondary
}
#[inline]
pub fn accent_success() -> Color {
    current_theme().accent_success
}
#[inline]
pub fn accent_warning() -> Color {
    current_theme().accent_warning
}
#[inline]
pub fn accent_error() -> Color {
    current_theme().accent_error
}

#[inline]
pub fn border_default() -> Color {
    current_theme().border_default
}
#[inline]
pub fn border_focused() -> Color {
    current_theme().border_focused
}
