//! PS/2 mouse packet framing.
//!
//! Standard PS/2 mice send 3-byte packets:
//! - Byte 0: status (buttons, always-1 marker, sign bits, overflow bits)
//! - Byte 1: X movement
//! - Byte 2: Y movement (positive = up)

use kestrel_common::MouseStatus;

/// One complete, decoded packet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MousePacket {
    pub status: MouseStatus,
    /// Relative X movement, positive = right.
    pub dx: i16,
    /// Relative Y movement in device space, positive = up.
    pub dy: i16,
}

impl MousePacket {
    /// Decodes the three raw bytes of a frame.
    pub fn from_bytes(bytes: [u8; 3]) -> Self {
        let status = MouseStatus::from_byte(bytes[0]);
        Self {
            status,
            dx: delta(
                bytes[1],
                status.contains(MouseStatus::X_SIGN),
                status.contains(MouseStatus::X_OVERFLOW),
            ),
            dy: delta(
                bytes[2],
                status.contains(MouseStatus::Y_SIGN),
                status.contains(MouseStatus::Y_OVERFLOW),
            ),
        }
    }
}

/// Rebuilds a 9-bit two's complement delta, saturating on overflow.
fn delta(raw: u8, negative: bool, overflow: bool) -> i16 {
    match (overflow, negative) {
        (true, true) => -256,
        (true, false) => 255,
        (false, true) => i16::from(raw) - 256,
        (false, false) => i16::from(raw),
    }
}

/// Three-phase packet assembler.
///
/// Phase 0 only accepts a byte with the always-1 marker set; anything else is
/// dropped so the stream resynchronizes on the next status byte.
#[derive(Debug, Clone, Default)]
pub struct PacketAssembler {
    phase: u8,
    bytes: [u8; 3],
}

impl PacketAssembler {
    pub const fn new() -> Self {
        Self {
            phase: 0,
            bytes: [0; 3],
        }
    }

    /// Current phase, 0 to 2.
    pub fn phase(&self) -> u8 {
        self.phase
    }

    /// Drops any partial frame.
    pub fn reset(&mut self) {
        self.phase = 0;
    }

    /// Feeds one byte. Returns a packet when the third byte completes it.
    pub fn push(&mut self, byte: u8) -> Option<MousePacket> {
        match self.phase {
            0 => {
                if byte & MouseStatus::ALWAYS_ONE.bits() == 0 {
                    return None;
                }
                self.bytes[0] = byte;
                self.phase = 1;
                None
            }
            1 => {
                self.bytes[1] = byte;
                self.phase = 2;
                None
            }
            _ => {
                self.bytes[2] = byte;
                self.phase = 0;
                Some(MousePacket::from_bytes(self.bytes))
            }
        }
    }
}
