use std::io::{IsTerminal, Write};
use std::sync::{Arc, Mutex};

use clap::ValueEnum;
use conbridge_link::{ColorRole, Screen};
use crossterm::cursor::MoveTo;
use crossterm::queue;
use crossterm::style::{Color, Print, ResetColor, SetForegroundColor};
use crossterm::terminal::{Clear, ClearType};

#[derive(Copy, Clone, Debug, ValueEnum)]
pub enum ColorMode {
    Auto,
    Always,
    Never,
}

/// The transcript: incoming text rendered to stdout, color-coded by role.
pub struct TerminalScreen {
    colors: bool,
    is_tty: bool,
}

impl TerminalScreen {
    pub fn stdout(mode: ColorMode) -> Self {
        let is_tty = std::io::stdout().is_terminal();
        let colors = match mode {
            ColorMode::Auto => is_tty,
            ColorMode::Always => true,
            ColorMode::Never => false,
        };
        Self { colors, is_tty }
    }

    fn role_color(role: ColorRole) -> Option<Color> {
        match role {
            ColorRole::Default => None,
            ColorRole::Error => Some(Color::Red),
            ColorRole::Warning => Some(Color::DarkYellow),
        }
    }
}

impl Screen for TerminalScreen {
    fn append(&mut self, text: &str, role: ColorRole) {
        let mut out = std::io::stdout();
        // Display failures are not actionable mid-session; drop them.
        match Self::role_color(role).filter(|_| self.colors) {
            Some(color) => {
                let _ = queue!(out, SetForegroundColor(color), Print(text), ResetColor)
                    .and_then(|()| out.flush());
            }
            None => {
                let _ = out.write_all(text.as_bytes());
                let _ = out.flush();
            }
        }
    }

    fn clear(&mut self) {
        if !self.is_tty {
            return;
        }
        let mut out = std::io::stdout();
        let _ = queue!(out, Clear(ClearType::All), MoveTo(0, 0)).and_then(|()| out.flush());
    }
}

/// Cloneable handle so the dispatcher and the input echo share one
/// transcript. Appends never overlap mid-write: the lock spans the whole
/// colored sequence.
#[derive(Clone)]
pub struct SharedScreen {
    inner: Arc<Mutex<TerminalScreen>>,
}

impl SharedScreen {
    pub fn new(screen: TerminalScreen) -> Self {
        Self {
            inner: Arc::new(Mutex::new(screen)),
        }
    }
}

impl Screen for SharedScreen {
    fn append(&mut self, text: &str, role: ColorRole) {
        if let Ok(mut screen) = self.inner.lock() {
            screen.append(text, role);
        }
    }

    fn clear(&mut self) {
        if let Ok(mut screen) = self.inner.lock() {
            screen.clear();
        }
    }
}
