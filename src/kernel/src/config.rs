//! Kernel configuration: hardware constants and driver tunables.

use kestrel_common::DeviceError;
use log::LevelFilter;

/// Maximum level forwarded by the kernel logger.
pub const LOG_LEVEL: LevelFilter = LevelFilter::Info;

/// Shell prompt.
pub const PROMPT: &str = "kestrel> ";

/// Text display geometry.
pub mod display {
    /// VGA text buffer physical address.
    pub const BUFFER_ADDR: usize = 0xB8000;

    /// Rows present in the hardware buffer.
    pub const HARDWARE_ROWS: usize = 25;

    /// Columns of the text grid.
    pub const WIDTH: usize = 80;

    /// Rows of the text grid. The last hardware row is left unused.
    pub const HEIGHT: usize = 24;
}

/// Bordered sub-window used by the boxed terminal.
pub mod window {
    pub const WIDTH: usize = 70;
    pub const HEIGHT: usize = 20;
    pub const ORIGIN_X: usize = 5;
    pub const ORIGIN_Y: usize = 2;

    pub const BORDER_HORIZONTAL: u8 = b'-';
    pub const BORDER_VERTICAL: u8 = b'|';
    pub const BORDER_CORNER: u8 = b'+';
}

/// VGA CRT controller registers driving the hardware cursor.
pub mod crtc {
    pub const INDEX_PORT: u16 = 0x3D4;
    pub const DATA_PORT: u16 = 0x3D5;
    pub const CURSOR_LOCATION_HIGH: u8 = 0x0E;
    pub const CURSOR_LOCATION_LOW: u8 = 0x0F;
}

/// 8042 PS/2 controller.
pub mod ps2 {
    /// Data port shared by keyboard and auxiliary device.
    pub const DATA_PORT: u16 = 0x60;
    /// Status register on read, command register on write.
    pub const COMMAND_PORT: u16 = 0x64;

    /// Status bit: output buffer full (a byte is waiting on the data port).
    pub const STATUS_OUTPUT_FULL: u8 = 0x01;
    /// Status bit: input buffer full (controller still busy with our write).
    pub const STATUS_INPUT_FULL: u8 = 0x02;
    /// Status bit: the waiting byte came from the auxiliary device.
    pub const STATUS_AUX_DATA: u8 = 0x20;

    pub const CMD_READ_CONFIG: u8 = 0x20;
    pub const CMD_WRITE_CONFIG: u8 = 0x60;
    pub const CMD_DISABLE_AUX: u8 = 0xA7;
    pub const CMD_ENABLE_AUX: u8 = 0xA8;
    /// Routes the next data byte to the auxiliary device.
    pub const CMD_WRITE_AUX: u8 = 0xD4;

    /// Configuration byte: IRQ12 enable.
    pub const CONFIG_AUX_IRQ: u8 = 0x02;
    /// Configuration byte: auxiliary clock disable.
    pub const CONFIG_AUX_CLOCK_DISABLED: u8 = 0x20;

    pub const DEV_SET_DEFAULTS: u8 = 0xF6;
    pub const DEV_SET_SAMPLE_RATE: u8 = 0xF3;
    pub const DEV_ENABLE_STREAMING: u8 = 0xF4;
    /// Acknowledge byte sent by devices for every command.
    pub const ACK: u8 = 0xFA;

    /// Status polls before a handshake wait gives up.
    pub const WAIT_SPINS: u32 = 100_000;
    /// Stale bytes discarded at most while flushing the output buffer.
    pub const MAX_FLUSH: usize = 16;
    /// Scancodes drained at most by one keyboard interrupt.
    pub const MAX_DRAIN: usize = 16;
}

/// Controller lines used by the input drivers.
pub mod irq {
    pub const KEYBOARD: u8 = 1;
    pub const MOUSE: u8 = 12;
}

/// Sample rates accepted by the PS/2 `set sample rate` command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum SampleRate {
    Hz10 = 10,
    Hz20 = 20,
    Hz40 = 40,
    Hz60 = 60,
    Hz80 = 80,
    Hz100 = 100,
    Hz200 = 200,
}

impl SampleRate {
    /// Returns the wire value of the rate.
    pub const fn as_u8(self) -> u8 {
        self as u8
    }
}

impl TryFrom<u8> for SampleRate {
    type Error = DeviceError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            10 => Ok(SampleRate::Hz10),
            20 => Ok(SampleRate::Hz20),
            40 => Ok(SampleRate::Hz40),
            60 => Ok(SampleRate::Hz60),
            80 => Ok(SampleRate::Hz80),
            100 => Ok(SampleRate::Hz100),
            200 => Ok(SampleRate::Hz200),
            other => Err(DeviceError::UnsupportedSampleRate(other)),
        }
    }
}

/// Exponential smoothing factor expressed as a ratio.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Smoothing {
    pub numerator: i32,
    pub denominator: i32,
}

impl Smoothing {
    /// alpha = 0.3
    pub const DEFAULT: Smoothing = Smoothing::new(3, 10);

    /// Creates a factor of `numerator / denominator`, forced into (0, 1].
    pub const fn new(numerator: i32, denominator: i32) -> Self {
        let denominator = if denominator > 0 { denominator } else { 1 };
        let numerator = if numerator <= 0 {
            1
        } else if numerator > denominator {
            denominator
        } else {
            numerator
        };
        Self {
            numerator,
            denominator,
        }
    }
}

/// Mouse driver settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MouseConfig {
    pub sample_rate: SampleRate,
    pub smoothing: Smoothing,
    /// Pointer position before the first packet.
    pub start: (u16, u16),
    /// Exclusive upper bounds of the pointer position.
    pub bounds: (u16, u16),
}

impl MouseConfig {
    pub const DEFAULT: MouseConfig = MouseConfig {
        sample_rate: SampleRate::Hz40,
        smoothing: Smoothing::DEFAULT,
        start: (window::ORIGIN_X as u16, window::ORIGIN_Y as u16),
        bounds: (display::WIDTH as u16, display::HEIGHT as u16),
    };
}

impl Default for MouseConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}
