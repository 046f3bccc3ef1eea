//! Interrupt Descriptor Table (IDT), exception handlers and the IRQ
//! dispatch table.
//!
//! Every PIC vector enters [`dispatch`], which calls the handler registered
//! for the line. Registered handlers acknowledge the interrupt themselves;
//! lines without a handler are acknowledged here.

use super::pic::{PicController, PIC_1_OFFSET};
use crate::serial_println;
use kestrel_hal::{InterruptController, IrqHandler, IrqRegistry};
use lazy_static::lazy_static;
use spin::Mutex;
use x86_64::structures::idt::{InterruptDescriptorTable, InterruptStackFrame, PageFaultErrorCode};

/// Lines served by the chained PICs.
const IRQ_LINES: usize = 16;

static HANDLERS: Mutex<[Option<IrqHandler>; IRQ_LINES]> = Mutex::new([None; IRQ_LINES]);

macro_rules! irq_entries {
    ($($line:literal => $name:ident),* $(,)?) => {
        $(
            extern "x86-interrupt" fn $name(_stack_frame: InterruptStackFrame) {
                dispatch($line);
            }
        )*

        const IRQ_ENTRIES: [extern "x86-interrupt" fn(InterruptStackFrame); IRQ_LINES] =
            [$($name),*];
    };
}

irq_entries! {
    0 => irq0, 1 => irq1, 2 => irq2, 3 => irq3,
    4 => irq4, 5 => irq5, 6 => irq6, 7 => irq7,
    8 => irq8, 9 => irq9, 10 => irq10, 11 => irq11,
    12 => irq12, 13 => irq13, 14 => irq14, 15 => irq15,
}

lazy_static! {
    /// The Interrupt Descriptor Table (IDT).
    static ref IDT: InterruptDescriptorTable = {
        let mut idt = InterruptDescriptorTable::new();
        idt.breakpoint.set_handler_fn(breakpoint_handler);
        idt.double_fault.set_handler_fn(double_fault_handler);
        idt.page_fault.set_handler_fn(page_fault_handler);
        idt.general_protection_fault.set_handler_fn(general_protection_fault_handler);
        idt.divide_error.set_handler_fn(divide_error_handler);

        for (line, entry) in IRQ_ENTRIES.iter().enumerate() {
            idt[usize::from(PIC_1_OFFSET) + line].set_handler_fn(*entry);
        }

        idt
    };
}

/// Loads the IDT and programs the PICs. Interrupts stay disabled.
pub fn init_idt() {
    IDT.load();
    super::pic::init();
}

fn dispatch(irq: u8) {
    let handler = HANDLERS.lock()[usize::from(irq)];
    match handler {
        Some(handler) => handler(),
        None => PicController.end_of_interrupt(irq),
    }
}

/// [`IrqRegistry`] backed by the dispatch table.
#[derive(Debug, Default, Clone, Copy)]
pub struct IrqTable;

impl IrqRegistry for IrqTable {
    fn register_handler(&mut self, irq: u8, handler: IrqHandler) {
        let slot = usize::from(irq);
        if slot >= IRQ_LINES {
            log::warn!("irq: line {} out of range", irq);
            return;
        }
        x86_64::instructions::interrupts::without_interrupts(|| {
            HANDLERS.lock()[slot] = Some(handler);
        });
    }
}

/// Handler for the breakpoint exception (INT3).
extern "x86-interrupt" fn breakpoint_handler(stack_frame: InterruptStackFrame) {
    serial_println!("EXCEPTION: BREAKPOINT\n{:#?}", stack_frame);
}

/// Handler for the double fault exception.
extern "x86-interrupt" fn double_fault_handler(
    stack_frame: InterruptStackFrame,
    _error_code: u64,
) -> ! {
    panic!("EXCEPTION: DOUBLE FAULT\n{:#?}", stack_frame);
}

/// Handler for the page fault exception.
extern "x86-interrupt" fn page_fault_handler(
    stack_frame: InterruptStackFrame,
    error_code: PageFaultErrorCode,
) {
    use x86_64::registers::control::Cr2;

    serial_println!("EXCEPTION: PAGE FAULT");
    serial_println!("Accessed Address: {:?}", Cr2::read());
    serial_println!("Error Code: {:?}", error_code);
    serial_println!("{:#?}", stack_frame);
    super::halt_loop();
}

/// Handler for the general protection fault exception.
extern "x86-interrupt" fn general_protection_fault_handler(
    stack_frame: InterruptStackFrame,
    error_code: u64,
) {
    serial_println!("EXCEPTION: GENERAL PROTECTION FAULT");
    serial_println!("Error Code: {:#x}", error_code);
    serial_println!("{:#?}", stack_frame);
    super::halt_loop();
}

/// Handler for the divide error exception.
extern "x86-interrupt" fn divide_error_handler(stack_frame: InterruptStackFrame) {
    serial_println!("EXCEPTION: DIVIDE ERROR\n{:#?}", stack_frame);
    super::halt_loop();
}
