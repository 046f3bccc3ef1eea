//! Built-in shell commands.

/// Shell command types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command<'a> {
    /// Display help information.
    Help,
    /// Clear the screen.
    Clear,
    /// Echo text.
    Echo(&'a str),
    /// Live pointer view until ESC.
    Mouse,
    /// Toggle the bordered window.
    Box,
    /// Show the kernel version.
    Version,
    /// Unknown command.
    Unknown(&'a str),
}

/// One line of `help` output per command.
pub const HELP: &[(&str, &str)] = &[
    ("help", "show this list"),
    ("clear", "clear the screen"),
    ("echo <text>", "print text"),
    ("mouse", "show the pointer, ESC returns"),
    ("box", "toggle the bordered window"),
    ("version", "show the kernel version"),
];

impl<'a> Command<'a> {
    /// Parses a command line. Blank lines yield `None`.
    pub fn parse(line: &'a str) -> Option<Command<'a>> {
        let line = line.trim();
        if line.is_empty() {
            return None;
        }
        let (name, rest) = match line.split_once(char::is_whitespace) {
            Some((name, rest)) => (name, rest.trim_start()),
            None => (line, ""),
        };

        let command = match name {
            "help" | "?" => Command::Help,
            "clear" | "cls" => Command::Clear,
            "echo" => Command::Echo(rest),
            "mouse" => Command::Mouse,
            "box" => Command::Box,
            "version" | "ver" => Command::Version,
            other => Command::Unknown(other),
        };
        Some(command)
    }
}
