//! Terminal state guard for guaranteed cleanup.
//!
//! Restores the terminal when the application exits, whether normally, via
//! early return, or panic.

use crossterm::{
    event::DisableBracketedPaste,
    execute,
    terminal::{disable_raw_mode, LeaveAlternateScreen},
};
use std::io::{self, Write};

/// Guard that restores terminal state when dropped.
///
/// Create it right after entering raw mode and the alternate screen.
pub struct TerminalGuard {
    active: bool,
}

impl TerminalGuard {
    pub fn new() -> Self {
        Self { active: true }
    }

    /// Clean up now and report errors. Drop becomes a no-op afterwards.
    pub fn cleanup(&mut self) -> anyhow::Result<()> {
        if !self.active {
            return Ok(());
        }
        self.active = false;
        restore_terminal()
    }
}

impl Default for TerminalGuard {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        if self.active {
            if let Err(e) = restore_terminal() {
                tracing::debug!(error = %e, "Terminal cleanup failed in Drop");
            }
        }
    }
}

fn restore_terminal() -> anyhow::Result<()> {
    let mut stdout = io::stdout();
    disable_raw_mode()?;
    execute!(stdout, LeaveAlternateScreen, DisableBracketedPaste)?;
    stdout.flush()?;
    Ok(())
}

/// Restore the terminal before the panic message is printed, so the message
/// lands on the normal screen. Call before any terminal setup.
pub fn install_panic_hook() {
    let previous = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        if let Err(e) = restore_terminal() {
            tracing::debug!(error = %e, "Terminal cleanup failed in panic hook");
        }
        previous(info);
    }));
}
