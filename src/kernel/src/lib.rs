//! Kestrel kernel
//!
//! Interrupt-driven PS/2 keyboard and mouse input feeding a VGA text
//! terminal and a small command shell.
//!
//! # Architecture
//!
//! - `arch`: x86_64 glue (port I/O, PIC, IDT, serial, VGA buffer)
//! - `drivers`: 8042 controller access, keyboard and mouse drivers
//! - `console`: text grid, terminal, printf and line editing
//! - `shell`: commands run from the polling context
//!
//! Everything outside `arch` is written against the `kestrel_hal` traits and
//! is tested on the host.
//!
//! # Safety
//!
//! All unsafe code lives in `arch` and is documented with the invariant it
//! relies on.

#![cfg_attr(not(test), no_std)]
#![cfg_attr(target_os = "none", feature(abi_x86_interrupt))]

pub mod arch;
pub mod boot;
pub mod config;
pub mod console;
pub mod drivers;
pub mod logger;
pub mod shell;


/// Brings up the serial port, the kernel logger and the VGA console.
///
/// Called first thing in the boot process. Returns the console so the
/// caller can print the banner.
#[cfg(all(target_arch = "x86_64", target_os = "none"))]
pub fn init() -> &'static spin::Mutex<console::Terminal<arch::x86_64::vga::VgaTextBuffer>> {
    arch::x86_64::serial::init();
    if logger::init(arch::x86_64::serial::_print).is_err() {
        serial_println!("logger already installed");
    }
    arch::x86_64::vga::init()
}
