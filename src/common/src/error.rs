//! System-wide error types for Kestrel.

use core::fmt;

/// PS/2 controller and device error types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DeviceError {
    /// The controller never became ready within the retry budget.
    ControllerTimeout,
    /// A device command was answered with something other than ACK.
    MissingAck {
        /// The command byte that was sent.
        command: u8,
        /// The byte received instead of the acknowledge.
        response: u8,
    },
    /// The requested mouse sample rate is not one the protocol accepts.
    UnsupportedSampleRate(u8),
}

impl fmt::Display for DeviceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeviceError::ControllerTimeout => write!(f, "PS/2 controller timeout"),
            DeviceError::MissingAck { command, response } => write!(
                f,
                "device did not acknowledge command {:#04x} (got {:#04x})",
                command, response
            ),
            DeviceError::UnsupportedSampleRate(rate) => {
                write!(f, "unsupported mouse sample rate {}", rate)
            }
        }
    }
}
