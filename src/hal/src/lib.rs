//! Kestrel Hardware Abstraction Layer (HAL) traits.
//!
//! This crate defines the boundary between the device drivers and the
//! platform: port I/O, interrupt registration and acknowledgment, and the
//! text-mode frame buffer. Drivers are written against these traits so the
//! same decode logic runs on bare metal and under host tests.

#![no_std]

/// Byte and word granularity access to hardware I/O ports.
pub trait PortIo {
    /// Reads a byte from `port`.
    fn read_u8(&mut self, port: u16) -> u8;
    /// Writes a byte to `port`.
    fn write_u8(&mut self, port: u16, value: u8);
    /// Reads a word from `port`.
    fn read_u16(&mut self, port: u16) -> u16;
    /// Writes a word to `port`.
    fn write_u16(&mut self, port: u16, value: u16);
}

/// Trait for controlling interrupts.
pub trait InterruptController {
    /// Globally enables interrupts.
    fn enable(&mut self);
    /// Globally disables interrupts.
    fn disable(&mut self);
    /// Signals the end of an interrupt to the controller.
    ///
    /// `irq` is the controller line (0..16), not the CPU vector.
    fn end_of_interrupt(&mut self, irq: u8);
}

/// Handler invoked when an IRQ line fires.
pub type IrqHandler = fn();

/// Registration of per-line interrupt handlers.
pub trait IrqRegistry {
    /// Installs `handler` for `irq`, replacing any previous handler.
    fn register_handler(&mut self, irq: u8, handler: IrqHandler);
}

/// A cell-addressed text frame buffer with a hardware cursor.
///
/// Cells are 16 bits: glyph in the low byte, foreground in bits 8..12 and
/// background in bits 12..16. Implementations must ignore writes outside the
/// grid and return a blank cell for out-of-range reads.
pub trait FrameBuffer {
    /// Number of columns.
    fn width(&self) -> usize;
    /// Number of rows.
    fn height(&self) -> usize;
    /// Reads the raw cell at (`x`, `y`).
    fn read_cell(&self, x: usize, y: usize) -> u16;
    /// Writes the raw cell at (`x`, `y`).
    fn write_cell(&mut self, x: usize, y: usize, cell: u16);
    /// Moves the hardware text cursor to (`x`, `y`).
    fn set_cursor_position(&mut self, x: usize, y: usize);
}
