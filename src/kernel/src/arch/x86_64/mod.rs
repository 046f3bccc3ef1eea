//! x86_64 platform glue: port I/O, 8259 PIC, IDT, COM1 and the VGA text
//! buffer, each exposed through the `kestrel_hal` traits.

pub mod interrupts;
pub mod pic;
pub mod port;
pub mod serial;
pub mod vga;

pub use pic::PicController;
pub use port::X86Ports;

/// Halts the CPU until the next interrupt.
///
/// Used in idle loops to reduce power consumption.
#[inline]
pub fn hlt() {
    x86_64::instructions::hlt();
}

/// Halts the CPU in an infinite loop.
///
/// Used after unrecoverable errors (panics).
pub fn halt_loop() -> ! {
    loop {
        hlt();
    }
}
