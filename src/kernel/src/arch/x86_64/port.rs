//! Raw port I/O.

use kestrel_hal::PortIo;
use x86_64::instructions::port::Port;

/// Direct access to the CPU I/O port space.
#[derive(Debug, Default, Clone, Copy)]
pub struct X86Ports;

impl PortIo for X86Ports {
    fn read_u8(&mut self, port: u16) -> u8 {
        // SAFETY: ring 0 owns the whole port space; callers only pass device
        // ports whose reads have no side effects beyond the device protocol.
        unsafe { Port::<u8>::new(port).read() }
    }

    fn write_u8(&mut self, port: u16, value: u8) {
        // SAFETY: see `read_u8`.
        unsafe { Port::<u8>::new(port).write(value) }
    }

    fn read_u16(&mut self, port: u16) -> u16 {
        // SAFETY: see `read_u8`.
        unsafe { Port::<u16>::new(port).read() }
    }

    fn write_u16(&mut self, port: u16, value: u16) {
        // SAFETY: see `read_u8`.
        unsafe { Port::<u16>::new(port).write(value) }
    }
}
