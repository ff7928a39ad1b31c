#![forbid(unsafe_code)]

//! Terminal setup and teardown for the interactive preview.
//!
//! Generator panics are caught by the engine, so no panic hook is installed:
//! a caught panic must not tear the screen down under a running preview.

use std::io::{self, Write};

use tracing::info;

/// Raw mode plus alternate screen, restored on drop.
#[derive(Debug)]
pub struct TerminalSession {
    alternate_screen_enabled: bool,
}

impl TerminalSession {
    /// Enter raw mode, switch to the alternate screen and hide the cursor.
    pub fn enter() -> io::Result<Self> {
        crossterm::terminal::enable_raw_mode()?;
        info!("terminal raw mode enabled");
        let mut session = Self {
            alternate_screen_enabled: false,
        };

        let mut stdout = io::stdout();
        crossterm::execute!(
            stdout,
            crossterm::terminal::EnterAlternateScreen,
            crossterm::terminal::Clear(crossterm::terminal::ClearType::All),
            crossterm::cursor::Hide
        )?;
        session.alternate_screen_enabled = true;
        Ok(session)
    }

    fn cleanup(&mut self) {
        let mut stdout = io::stdout();

        // Always show cursor before leaving
        let _ = crossterm::execute!(stdout, crossterm::style::ResetColor, crossterm::cursor::Show);

        if self.alternate_screen_enabled {
            let _ = crossterm::execute!(stdout, crossterm::terminal::LeaveAlternateScreen);
            self.alternate_screen_enabled = false;
        }

        // Exit raw mode last
        let _ = crossterm::terminal::disable_raw_mode();
        info!("terminal restored");

        let _ = stdout.flush();
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        self.cleanup();
    }
}
