//! Boot banner and branding.

use crate::console::{Color, Terminal};
use crate::shell::VERSION;
use kestrel_hal::FrameBuffer;

const ART: &[&str] = &[
    r" _  __          _            _ ",
    r"| |/ /___  ___| |_ _ __ ___| |",
    r"| ' // _ \/ __| __| '__/ _ \ |",
    r"| . \  __/\__ \ |_| | |  __/ |",
    r"|_|\_\___||___/\__|_|  \___|_|",
];

/// Print the Kestrel boot banner.
pub fn print_banner<F: FrameBuffer>(terminal: &mut Terminal<F>) {
    let saved = terminal.colors();
    terminal.set_colors(Color::Cyan, saved.background());
    for line in ART {
        terminal.put_char(b' ');
        terminal.put_str(line);
        terminal.newline();
    }
    terminal.newline();
    terminal.set_colors(saved.foreground(), saved.background());
    terminal.put_str(" Kestrel v");
    terminal.put_str(VERSION);
    terminal.newline();
    terminal.newline();
}
