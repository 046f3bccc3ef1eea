//! VGA text mode frame buffer for x86_64.
//!
//! Cells live at 0xB8000; the hardware cursor is driven through the CRT
//! controller. The global [`CONSOLE`] terminal sits on top of it.

use super::port::X86Ports;
use crate::config::{crtc, display};
use crate::console::{Terminal, Viewport};
use core::ptr;
use kestrel_hal::{FrameBuffer, PortIo};
use spin::Mutex;

/// The memory-mapped text buffer.
pub struct VgaTextBuffer {
    /// SAFETY: valid for `HARDWARE_ROWS * WIDTH` cells for the lifetime of
    /// the kernel. The VGA text buffer is always mapped in text mode.
    cells: *mut u16,
    ports: X86Ports,
}

// SAFETY: the buffer is only reached through the CONSOLE spinlock.
unsafe impl Send for VgaTextBuffer {}

impl VgaTextBuffer {
    fn new() -> Self {
        Self {
            cells: display::BUFFER_ADDR as *mut u16,
            ports: X86Ports,
        }
    }

    fn index(&self, x: usize, y: usize) -> Option<usize> {
        (x < display::WIDTH && y < display::HEIGHT).then_some(y * display::WIDTH + x)
    }

    fn write_crtc(&mut self, register: u8, value: u8) {
        // index in the low byte, data in the high byte
        self.ports
            .write_u16(crtc::INDEX_PORT, u16::from(value) << 8 | u16::from(register));
    }
}

impl FrameBuffer for VgaTextBuffer {
    fn width(&self) -> usize {
        display::WIDTH
    }

    fn height(&self) -> usize {
        display::HEIGHT
    }

    fn read_cell(&self, x: usize, y: usize) -> u16 {
        match self.index(x, y) {
            // SAFETY: `index` bounds the offset to the mapped buffer.
            Some(i) => unsafe { ptr::read_volatile(self.cells.add(i)) },
            None => 0x0720,
        }
    }

    fn write_cell(&mut self, x: usize, y: usize, cell: u16) {
        if let Some(i) = self.index(x, y) {
            // SAFETY: `index` bounds the offset to the mapped buffer.
            unsafe { ptr::write_volatile(self.cells.add(i), cell) }
        }
    }

    fn set_cursor_position(&mut self, x: usize, y: usize) {
        let last = display::HARDWARE_ROWS * display::WIDTH - 1;
        let position = (y * display::WIDTH + x).min(last) as u16;
        self.write_crtc(crtc::CURSOR_LOCATION_LOW, position as u8);
        self.write_crtc(crtc::CURSOR_LOCATION_HIGH, (position >> 8) as u8);
    }
}

/// Global terminal on the VGA buffer.
pub static CONSOLE: spin::Once<Mutex<Terminal<VgaTextBuffer>>> = spin::Once::new();

/// Initializes the global console. Idempotent.
pub fn init() -> &'static Mutex<Terminal<VgaTextBuffer>> {
    CONSOLE.call_once(|| Mutex::new(Terminal::new(VgaTextBuffer::new(), Viewport::FULL)))
}
