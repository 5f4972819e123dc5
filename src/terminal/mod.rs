//! Terminal lifecycle for the formula editor.
//!
//! [`TerminalManager`] puts the terminal in raw, alternate-screen mode with
//! mouse capture and bracketed paste, and restores it when dropped.
//!
//! ```no_run
//! use formula::terminal::{setup_panic_hook, TerminalManager};
//!
//! fn main() -> color_eyre::Result<()> {
//!     setup_panic_hook();
//!     let mut manager = TerminalManager::new()?;
//!     manager.terminal().draw(|_frame| {})?;
//!     Ok(())
//! }
//! ```

mod enhancements;
mod panic;
mod setup;

pub use enhancements::{pop_keyboard_enhancements, push_keyboard_enhancements};
pub use panic::setup_panic_hook;
pub use setup::{emergency_restore, enter_tui_mode, leave_tui_mode};

use color_eyre::Result;
use crossterm::terminal::enable_raw_mode;
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io::{self, Stdout};

/// Restores the terminal once, on drop or on [`TerminalManager::restore`].
struct TerminalGuard {
    enhanced: bool,
    restored: bool,
}

impl TerminalGuard {
    fn restore<W: io::Write>(&mut self, writer: &mut W) {
        if self.restored {
            return;
        }
        self.restored = true;

        if self.enhanced {
            pop_keyboard_enhancements(writer);
        }
        leave_tui_mode(writer);
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        self.restore(&mut io::stdout());
    }
}

/// Owns the ratatui terminal while the editor runs.
pub struct TerminalManager {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    guard: TerminalGuard,
}

impl TerminalManager {
    /// Enter raw mode and the alternate screen.
    ///
    /// Keyboard enhancements are requested so modified keys such as
    /// Alt+Enter and Super+V reach the inputs; terminals without the
    /// Kitty protocol ignore the request.
    pub fn new() -> Result<Self> {
        enable_raw_mode()?;

        let mut stdout = io::stdout();
        enter_tui_mode(&mut stdout)?;
        let enhanced = push_keyboard_enhancements(&mut stdout);
        tracing::debug!(enhanced, "Entered TUI mode");

        let mut terminal = Terminal::new(CrosstermBackend::new(stdout))?;
        terminal.clear()?;

        Ok(Self {
            terminal,
            guard: TerminalGuard {
                enhanced,
                restored: false,
            },
        })
    }

    pub fn terminal(&mut self) -> &mut Terminal<CrosstermBackend<Stdout>> {
        &mut self.terminal
    }

    /// Restore the terminal before the manager is dropped, so output
    /// written afterwards lands on the normal screen.
    pub fn restore(&mut self) -> Result<()> {
        self.guard.restore(self.terminal.backend_mut());
        self.terminal.show_cursor()?;
        Ok(())
    }
}
