//! Command shell running in the polling context.
//!
//! The shell owns the terminal for the lifetime of the session. Input comes
//! from a [`CharSource`]; the `mouse` view polls the published
//! [`MouseSnapshot`] and redraws whenever a new packet has been decoded.

pub mod commands;

pub use commands::Command;

use crate::config;
use crate::console::{Arg, Cell, CharSource, Color, ColorCode, LineOutcome, Terminal, Viewport};
use crate::drivers::keyboard::ESCAPE_SENTINEL;
use crate::drivers::MouseDriver;
use kestrel_common::MouseSnapshot;
use kestrel_hal::FrameBuffer;

/// Maximum input line length.
const MAX_LINE_LENGTH: usize = 128;

/// Glyph drawn at the pointer position (CP437 full block).
const POINTER_GLYPH: u8 = 0xDB;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Interactive shell.
pub struct Shell<'a, F: FrameBuffer, K: CharSource> {
    terminal: &'a mut Terminal<F>,
    keys: K,
    mouse: &'a MouseDriver,
    /// Called while the mouse view waits for the next packet.
    idle: fn(),
}

impl<'a, F: FrameBuffer, K: CharSource> Shell<'a, F, K> {
    pub fn new(terminal: &'a mut Terminal<F>, keys: K, mouse: &'a MouseDriver) -> Self {
        Self {
            terminal,
            keys,
            mouse,
            idle: core::hint::spin_loop,
        }
    }

    /// Replaces the wait hook of the mouse view.
    pub fn with_idle(mut self, idle: fn()) -> Self {
        self.idle = idle;
        self
    }

    pub fn terminal(&self) -> &Terminal<F> {
        &*self.terminal
    }

    /// Display the shell prompt.
    pub fn prompt(&mut self) {
        let saved = self.terminal.colors();
        self.terminal.set_colors(Color::LightGreen, saved.background());
        self.terminal.put_str(config::PROMPT);
        self.terminal.set_colors(saved.foreground(), saved.background());
    }

    /// Runs forever.
    pub fn run(&mut self) -> ! {
        loop {
            self.run_once();
        }
    }

    /// Prompts, reads one line and executes it.
    ///
    /// Returns false when the line was blank or abandoned with ESC.
    pub fn run_once(&mut self) -> bool {
        self.prompt();
        let mut line = [0u8; MAX_LINE_LENGTH];
        let outcome = self.terminal.read_line(&mut self.keys, &mut line);
        if outcome == LineOutcome::Aborted {
            self.terminal.newline();
            return false;
        }
        match Command::parse(outcome.text(&line)) {
            Some(command) => {
                self.execute(command);
                true
            }
            None => false,
        }
    }

    /// Executes a parsed command.
    pub fn execute(&mut self, command: Command<'_>) {
        log::debug!("shell: {:?}", command);
        match command {
            Command::Help => self.help(),
            Command::Clear => self.clear(),
            Command::Echo(text) => self.terminal.printf("%s\n", &[Arg::from(text)]),
            Command::Mouse => self.mouse_view(),
            Command::Box => self.toggle_box(),
            Command::Version => self.terminal.printf("Kestrel v%s\n", &[Arg::from(VERSION)]),
            Command::Unknown(name) => {
                let saved = self.terminal.colors();
                self.terminal.set_colors(Color::LightRed, saved.background());
                self.terminal.printf("unknown command: %s\n", &[Arg::from(name)]);
                self.terminal.set_colors(saved.foreground(), saved.background());
            }
        }
    }

    fn help(&mut self) {
        for (usage, summary) in commands::HELP {
            self.terminal.printf("  %s", &[Arg::from(*usage)]);
            let (x, _) = self.terminal.cursor();
            for _ in x..16 {
                self.terminal.put_char(b' ');
            }
            self.terminal.printf("%s\n", &[Arg::from(*summary)]);
        }
    }

    fn clear(&mut self) {
        let colors = self.terminal.colors();
        self.terminal.clear(colors.foreground(), colors.background());
    }

    fn toggle_box(&mut self) {
        let colors = self.terminal.colors();
        if self.terminal.viewport() == Viewport::BOXED {
            self.terminal.set_viewport(Viewport::FULL);
            self.clear();
        } else {
            // wipe the whole screen first so the border lands on a blank area
            self.terminal.set_viewport(Viewport::FULL);
            self.clear();
            self.terminal.set_viewport(Viewport::BOXED);
            self.terminal.draw_frame(ColorCode::new(Color::LightCyan, colors.background()));
        }
    }

    /// Shows the pointer until ESC is pressed.
    fn mouse_view(&mut self) {
        if !self.mouse.is_streaming() {
            self.terminal.put_str("mouse not available\n");
            return;
        }

        let mut last = self.mouse.snapshot();
        self.render_mouse(last);
        loop {
            if self.keys.try_char() == Some(ESCAPE_SENTINEL) {
                self.keys.clear_exit_request();
                break;
            }
            let snapshot = self.mouse.snapshot();
            if snapshot.sequence != last.sequence {
                self.render_mouse(snapshot);
                last = snapshot;
            }
            (self.idle)();
        }
        self.clear();
    }

    fn render_mouse(&mut self, snapshot: MouseSnapshot) {
        self.clear();
        let button = |pressed: bool, name: &'static str| if pressed { name } else { "-" };
        self.terminal.printf(
            "pointer x=%2d y=%2d buttons [%s%s%s]  ESC exits",
            &[
                Arg::Int(i32::from(snapshot.x)),
                Arg::Int(i32::from(snapshot.y)),
                Arg::from(button(snapshot.status.left_button(), "L")),
                Arg::from(button(snapshot.status.middle_button(), "M")),
                Arg::from(button(snapshot.status.right_button(), "R")),
            ],
        );
        let viewport = self.terminal.viewport();
        let x = usize::from(snapshot.x).min(viewport.width - 1);
        let y = usize::from(snapshot.y).min(viewport.height - 1);
        let colors = self.terminal.colors();
        self.terminal.put_cell(x, y, Cell::new(POINTER_GLYPH, colors));
    }
}
