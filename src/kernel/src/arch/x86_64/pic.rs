//! Support for the primary and secondary 8259 Programmable Interrupt Controllers (PICs).

use crate::config::irq;
use kestrel_hal::InterruptController;
use pic8259::ChainedPics;
use spin::Mutex;

/// The offset of the first PIC (master).
///
/// IRQs 0..7 are mapped to interrupts 32..39.
pub const PIC_1_OFFSET: u8 = 32;

/// The offset of the second PIC (slave).
///
/// IRQs 8..15 are mapped to interrupts 40..47.
pub const PIC_2_OFFSET: u8 = PIC_1_OFFSET + 8;

/// Line the secondary controller is chained on.
const CASCADE_LINE: u8 = 2;

/// The global instance of the chained PICs.
pub static PICS: Mutex<ChainedPics> =
    Mutex::new(unsafe { ChainedPics::new(PIC_1_OFFSET, PIC_2_OFFSET) });

/// Remaps both controllers and unmasks the input lines.
///
/// Interrupts must be disabled.
pub fn init() {
    let primary = !(1u8 << irq::KEYBOARD | 1 << CASCADE_LINE);
    let secondary = !(1u8 << (irq::MOUSE - 8));
    let mut pics = PICS.lock();
    // SAFETY: the offsets do not overlap CPU exceptions and every unmasked
    // vector has an IDT entry.
    unsafe {
        pics.initialize();
        pics.write_masks(primary, secondary);
    }
}

/// [`InterruptController`] over the chained PICs.
#[derive(Debug, Default, Clone, Copy)]
pub struct PicController;

impl InterruptController for PicController {
    fn enable(&mut self) {
        x86_64::instructions::interrupts::enable();
    }

    fn disable(&mut self) {
        x86_64::instructions::interrupts::disable();
    }

    fn end_of_interrupt(&mut self, irq: u8) {
        // SAFETY: `irq` is the line being serviced.
        unsafe {
            PICS.lock().notify_end_of_interrupt(PIC_1_OFFSET + irq);
        }
    }
}
