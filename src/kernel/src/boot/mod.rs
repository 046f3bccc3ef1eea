//! Boot logging with colored status indicators.
//!
//! Each line goes to the terminal as `[ OK ] message` and to the `log`
//! facade at a matching level.

pub mod banner;

use crate::console::{Color, Terminal};
use kestrel_hal::FrameBuffer;

/// Boot status indicators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// Success - `[ OK ]` in green
    Ok,
    /// Failure - `[FAIL]` in red
    Fail,
    /// Warning - `[WARN]` in yellow
    Warn,
    /// Informational - `[INFO]` in cyan
    Info,
}

impl Status {
    fn label(self) -> (&'static str, Color) {
        match self {
            Status::Ok => ("[ OK ]", Color::LightGreen),
            Status::Fail => ("[FAIL]", Color::LightRed),
            Status::Warn => ("[WARN]", Color::Yellow),
            Status::Info => ("[INFO]", Color::LightCyan),
        }
    }

    fn level(self) -> log::Level {
        match self {
            Status::Ok | Status::Info => log::Level::Info,
            Status::Warn => log::Level::Warn,
            Status::Fail => log::Level::Error,
        }
    }
}

/// Log a boot stage with status.
///
/// Format: `[ OK ] Message text`
pub fn log<F: FrameBuffer>(terminal: &mut Terminal<F>, status: Status, message: &str) {
    log::log!(target: "boot", status.level(), "{}", message);
    print_status(terminal, status);
    terminal.put_char(b' ');
    terminal.put_str(message);
    terminal.newline();
}

/// Log an indented detail line (for sub-items).
///
/// Format: `       Detail text` (aligned with message after status)
pub fn log_detail<F: FrameBuffer>(terminal: &mut Terminal<F>, message: &str) {
    terminal.put_str("       ");
    terminal.put_str(message);
    terminal.newline();
}

fn print_status<F: FrameBuffer>(terminal: &mut Terminal<F>, status: Status) {
    let (text, color) = status.label();
    let saved = terminal.colors();
    terminal.set_colors(color, saved.background());
    terminal.put_str(text);
    terminal.set_colors(saved.foreground(), saved.background());
}
