//! End-to-end input tests on the host: scancodes and mouse bytes enter
//! through the drivers' interrupt paths and come out on a text grid.

use std::collections::VecDeque;

use kestrel_hal::{InterruptController, PortIo};
use kestrel_kernel::config::{irq, ps2, MouseConfig, Smoothing};
use kestrel_kernel::console::{CharSource, LineOutcome, TextGrid, Terminal, Viewport};
use kestrel_kernel::drivers::keyboard::ESCAPE_SENTINEL;
use kestrel_kernel::drivers::{KeyboardDriver, MouseDriver};
use kestrel_kernel::shell::Shell;

type Grid = TextGrid<80, 24>;

/// 8042 stand-in holding the bytes of one interrupt.
#[derive(Default)]
struct Wire {
    output: VecDeque<u8>,
    aux: bool,
}

impl PortIo for Wire {
    fn read_u8(&mut self, port: u16) -> u8 {
        match port {
            ps2::COMMAND_PORT if self.output.is_empty() => 0,
            ps2::COMMAND_PORT if self.aux => ps2::STATUS_OUTPUT_FULL | ps2::STATUS_AUX_DATA,
            ps2::COMMAND_PORT => ps2::STATUS_OUTPUT_FULL,
            ps2::DATA_PORT => self.output.pop_front().unwrap_or(0),
            _ => 0,
        }
    }

    fn write_u8(&mut self, _port: u16, _value: u8) {}

    fn read_u16(&mut self, _port: u16) -> u16 {
        0
    }

    fn write_u16(&mut self, _port: u16, _value: u16) {}
}

#[derive(Default)]
struct CountingPic {
    acknowledged: Vec<u8>,
}

impl InterruptController for CountingPic {
    fn enable(&mut self) {}

    fn disable(&mut self) {}

    fn end_of_interrupt(&mut self, irq: u8) {
        self.acknowledged.push(irq);
    }
}

/// Raises one keyboard interrupt per scancode until a character comes out.
struct TypedKeys<'a> {
    keyboard: &'a KeyboardDriver,
    scancodes: VecDeque<u8>,
    pic: CountingPic,
}

impl<'a> TypedKeys<'a> {
    fn new(keyboard: &'a KeyboardDriver, scancodes: &[u8]) -> Self {
        Self {
            keyboard,
            scancodes: scancodes.iter().copied().collect(),
            pic: CountingPic::default(),
        }
    }
}

impl CharSource for TypedKeys<'_> {
    fn read_char(&mut self) -> u8 {
        while let Some(code) = self.scancodes.pop_front() {
            let mut wire = Wire::default();
            wire.output.push_back(code);
            self.keyboard.handle_interrupt(&mut wire, &mut self.pic);
            if let Some(ch) = self.keyboard.try_read() {
                return ch;
            }
        }
        ESCAPE_SENTINEL
    }

    fn clear_exit_request(&mut self) {
        self.keyboard.clear_exit_request();
    }
}

fn row(term: &Terminal<Grid>, y: usize) -> String {
    term.frame_buffer().row(y).iter().map(|&b| b as char).collect()
}

// e c h o space shift-down h shift-up i enter
const ECHO_HI: &[u8] = &[0x12, 0x2E, 0x23, 0x18, 0x39, 0x2A, 0x23, 0xAA, 0x17, 0x1C];

#[test]
fn test_typed_command_runs_in_shell() {
    let keyboard = KeyboardDriver::new();
    let mouse = MouseDriver::default();
    let mut term = Terminal::new(Grid::new(), Viewport::FULL);
    let mut keys = TypedKeys::new(&keyboard, ECHO_HI);

    assert!(Shell::new(&mut term, &mut keys, &mouse).run_once());
    assert!(row(&term, 0).starts_with("kestrel> echo Hi "));
    assert!(row(&term, 1).starts_with("Hi "));
    assert_eq!(keys.pic.acknowledged.len(), ECHO_HI.len());
    assert!(keys.pic.acknowledged.iter().all(|&line| line == irq::KEYBOARD));
}

#[test]
fn test_escape_scancode_abandons_line_and_clears_request() {
    let keyboard = KeyboardDriver::new();
    let mut term = Terminal::new(Grid::new(), Viewport::FULL);
    let mut keys = TypedKeys::new(&keyboard, &[0x1E, 0x30, 0x01]);
    let mut line = [0u8; 16];

    let outcome = term.read_line(&mut keys, &mut line);
    assert_eq!(outcome, LineOutcome::Aborted);
    assert_eq!(term.cursor(), (0, 0));
    assert!(row(&term, 0).trim_end().is_empty());
    assert!(!keyboard.exit_requested());
}

#[test]
fn test_backspace_edits_typed_line() {
    let keyboard = KeyboardDriver::new();
    let mut term = Terminal::new(Grid::new(), Viewport::FULL);
    // a b backspace c enter
    let mut keys = TypedKeys::new(&keyboard, &[0x1E, 0x30, 0x0E, 0x2E, 0x1C]);
    let mut line = [0u8; 16];

    let outcome = term.read_line(&mut keys, &mut line);
    assert_eq!(outcome.text(&line), "ac");
    assert!(row(&term, 0).starts_with("ac "));
}

#[test]
fn test_mouse_interrupts_move_pointer() {
    let mouse = MouseDriver::new(MouseConfig {
        smoothing: Smoothing::new(1, 1),
        start: (40, 12),
        ..MouseConfig::DEFAULT
    });
    let mut pic = CountingPic::default();

    for byte in [0x09, 2, 3] {
        let mut wire = Wire {
            aux: true,
            ..Wire::default()
        };
        wire.output.push_back(byte);
        mouse.handle_interrupt(&mut wire, &mut pic);
    }

    let snapshot = mouse.snapshot();
    assert_eq!((snapshot.x, snapshot.y), (42, 9));
    assert!(snapshot.status.left_button());
    assert_eq!(pic.acknowledged, [irq::MOUSE; 3]);
}

#[test]
fn test_mouse_interrupt_without_data_only_acknowledges() {
    let mouse = MouseDriver::default();
    let before = mouse.snapshot();
    let mut pic = CountingPic::default();

    mouse.handle_interrupt(&mut Wire::default(), &mut pic);

    assert_eq!(mouse.snapshot(), before);
    assert_eq!(pic.acknowledged, [irq::MOUSE]);
}
