//! Mouse records published by the input drivers.

use bitflags::bitflags;

bitflags! {
    /// Bits of the first byte of a standard PS/2 mouse packet.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct MouseStatus: u8 {
        const LEFT_BUTTON   = 1 << 0;
        const RIGHT_BUTTON  = 1 << 1;
        const MIDDLE_BUTTON = 1 << 2;
        /// Always set in a well-formed first byte; used to resynchronize.
        const ALWAYS_ONE    = 1 << 3;
        const X_SIGN        = 1 << 4;
        const Y_SIGN        = 1 << 5;
        const X_OVERFLOW    = 1 << 6;
        const Y_OVERFLOW    = 1 << 7;
    }
}

impl MouseStatus {
    /// Decodes a raw status byte, keeping every bit.
    pub const fn from_byte(byte: u8) -> Self {
        Self::from_bits_retain(byte)
    }

    /// Returns true if the left button is held.
    pub fn left_button(&self) -> bool {
        self.contains(Self::LEFT_BUTTON)
    }

    /// Returns true if the right button is held.
    pub fn right_button(&self) -> bool {
        self.contains(Self::RIGHT_BUTTON)
    }

    /// Returns true if the middle button is held.
    pub fn middle_button(&self) -> bool {
        self.contains(Self::MIDDLE_BUTTON)
    }
}

/// Position and button state of the pointer after one decoded packet.
///
/// The record fits in 64 bits so the driver can publish it with a single
/// atomic store and consumers never observe a half-updated pointer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MouseSnapshot {
    /// Column of the pointer.
    pub x: u16,
    /// Row of the pointer.
    pub y: u16,
    /// Status bits of the packet that produced this record.
    pub status: MouseStatus,
    /// Number of packets decoded so far, wrapping.
    pub sequence: u16,
}

impl MouseSnapshot {
    /// Packs the record into its atomic representation.
    pub const fn pack(self) -> u64 {
        (self.x as u64)
            | (self.y as u64) << 16
            | (self.status.bits() as u64) << 32
            | (self.sequence as u64) << 40
    }

    /// Rebuilds a record from [`MouseSnapshot::pack`] output.
    pub const fn unpack(raw: u64) -> Self {
        Self {
            x: raw as u16,
            y: (raw >> 16) as u16,
            status: MouseStatus::from_bits_retain((raw >> 32) as u8),
            sequence: (raw >> 40) as u16,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_bits() {
        let status = MouseStatus::from_byte(0b0000_1101);
        assert!(status.left_button());
        assert!(!status.right_button());
        assert!(status.middle_button());
        assert!(status.contains(MouseStatus::ALWAYS_ONE));
    }

    #[test]
    fn test_snapshot_keeps_every_field() {
        let snapshot = MouseSnapshot {
            x: 79,
            y: 23,
            status: MouseStatus::from_byte(0xFF),
            sequence: 0xBEEF,
        };
        assert_eq!(MouseSnapshot::unpack(snapshot.pack()), snapshot);
    }
}
