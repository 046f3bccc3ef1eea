//! PS/2 keyboard driver.
//!
//! ```text
//! IRQ1 ──▶ handle_interrupt ──▶ ScancodeDecoder ──▶ CharacterMailbox ──▶ blocking_read
//!                                                                   └──▶ KeyStream
//! ```
//!
//! The interrupt side drains the controller, decodes the first scancode of
//! the batch and posts at most one character. The polling side consumes the
//! mailbox. ESC bypasses decoding: it raises the exit request and posts
//! [`ESCAPE_SENTINEL`].

pub mod mailbox;
pub mod scancode;

pub use mailbox::{CharacterMailbox, KeyStream};
pub use scancode::{KeyAction, ModifierState, ScancodeDecoder, ESCAPE_SENTINEL};

use crate::config::{irq, ps2};
use crate::console::CharSource;
use crate::drivers::ps2::Controller;
use kestrel_hal::{InterruptController, IrqHandler, IrqRegistry, PortIo};
use core::sync::atomic::{AtomicU8, Ordering};
use spin::Mutex;

/// Keyboard driver state shared between IRQ1 and the polling loop.
pub struct KeyboardDriver {
    /// Touched only from the interrupt handler.
    decoder: Mutex<ScancodeDecoder>,
    /// Copy of the decoder's modifiers for the polling side.
    modifiers: AtomicU8,
    mailbox: CharacterMailbox,
}

impl Default for KeyboardDriver {
    fn default() -> Self {
        Self::new()
    }
}

impl KeyboardDriver {
    /// Creates a driver with no modifiers active and an empty mailbox.
    pub const fn new() -> Self {
        Self {
            decoder: Mutex::new(ScancodeDecoder::new()),
            modifiers: AtomicU8::new(0),
            mailbox: CharacterMailbox::new(),
        }
    }

    /// Installs `handler` for the keyboard line.
    ///
    /// `handler` is expected to call [`KeyboardDriver::handle_interrupt`].
    pub fn initialize(&self, registry: &mut impl IrqRegistry, handler: IrqHandler) {
        registry.register_handler(irq::KEYBOARD, handler);
        log::info!("keyboard: handler registered on IRQ{}", irq::KEYBOARD);
    }

    /// Services one keyboard interrupt.
    pub fn handle_interrupt(&self, io: &mut impl PortIo, pic: &mut impl InterruptController) {
        self.drain(io);
        pic.end_of_interrupt(irq::KEYBOARD);
    }

    fn drain(&self, io: &mut impl PortIo) {
        let mut controller = Controller::new(io);
        let mut decoder = self.decoder.lock();
        let mut first = true;

        for _ in 0..ps2::MAX_DRAIN {
            let status = controller.status();
            if status & ps2::STATUS_OUTPUT_FULL == 0 || status & ps2::STATUS_AUX_DATA != 0 {
                break;
            }
            let scancode = controller.read_data_now();

            if scancode == scancode::SCANCODE_ESCAPE {
                self.mailbox.request_exit();
                self.mailbox.post(ESCAPE_SENTINEL);
                break;
            }

            if first {
                if let KeyAction::Char(ch) = decoder.decode(scancode) {
                    self.mailbox.post(ch);
                }
                first = false;
            } else {
                decoder.track_modifiers(scancode);
            }
        }

        self.modifiers.store(decoder.modifiers().bits(), Ordering::Release);
    }

    /// Spins until a character is available and consumes it.
    pub fn blocking_read(&self) -> u8 {
        self.mailbox.blocking_read()
    }

    /// Consumes the pending character, if any.
    pub fn try_read(&self) -> Option<u8> {
        self.mailbox.take()
    }

    /// Returns true while ESC has been pressed and not yet honoured.
    pub fn exit_requested(&self) -> bool {
        self.mailbox.exit_requested()
    }

    /// Clears the ESC exit request.
    pub fn clear_exit_request(&self) {
        self.mailbox.clear_exit_request();
    }

    /// Modifier state after the last keyboard interrupt.
    ///
    /// Never takes the decoder lock, so it is safe to call with IRQ1 live.
    pub fn modifiers(&self) -> ModifierState {
        ModifierState::from_bits(self.modifiers.load(Ordering::Acquire))
    }

    /// The underlying mailbox.
    pub fn mailbox(&self) -> &CharacterMailbox {
        &self.mailbox
    }

    /// Asynchronous character stream over the mailbox.
    pub fn stream(&self) -> KeyStream<'_> {
        self.mailbox.stream()
    }
}

impl CharSource for &KeyboardDriver {
    fn read_char(&mut self) -> u8 {
        self.blocking_read()
    }

    fn try_char(&mut self) -> Option<u8> {
        self.try_read()
    }

    fn clear_exit_request(&mut self) {
        KeyboardDriver::clear_exit_request(*self);
    }
}
