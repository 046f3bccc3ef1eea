//! 8042 PS/2 controller access.
//!
//! Thin wrapper over a [`PortIo`] implementation that knows the status bits
//! and the bounded wait loops used during device handshakes.

use crate::config::ps2::*;
use kestrel_common::DeviceError;
use kestrel_hal::PortIo;

/// Borrowed view of the PS/2 controller.
pub struct Controller<'a, P: PortIo> {
    io: &'a mut P,
}

impl<'a, P: PortIo> Controller<'a, P> {
    /// Wraps the port backend.
    pub fn new(io: &'a mut P) -> Self {
        Self { io }
    }

    /// Reads the status register.
    pub fn status(&mut self) -> u8 {
        self.io.read_u8(COMMAND_PORT)
    }

    /// Returns true if a byte is waiting on the data port.
    pub fn has_output(&mut self) -> bool {
        self.status() & STATUS_OUTPUT_FULL != 0
    }

    /// Reads the data port without waiting.
    pub fn read_data_now(&mut self) -> u8 {
        self.io.read_u8(DATA_PORT)
    }

    /// Spins until the controller accepts a new byte.
    pub fn wait_writable(&mut self) -> Result<(), DeviceError> {
        for _ in 0..WAIT_SPINS {
            if self.status() & STATUS_INPUT_FULL == 0 {
                return Ok(());
            }
            core::hint::spin_loop();
        }
        Err(DeviceError::ControllerTimeout)
    }

    /// Spins until a byte is waiting on the data port.
    pub fn wait_readable(&mut self) -> Result<(), DeviceError> {
        for _ in 0..WAIT_SPINS {
            if self.status() & STATUS_OUTPUT_FULL != 0 {
                return Ok(());
            }
            core::hint::spin_loop();
        }
        Err(DeviceError::ControllerTimeout)
    }

    /// Sends a command byte to the controller itself.
    pub fn send_command(&mut self, command: u8) -> Result<(), DeviceError> {
        self.wait_writable()?;
        self.io.write_u8(COMMAND_PORT, command);
        Ok(())
    }

    /// Writes a byte to the data port.
    pub fn send_data(&mut self, data: u8) -> Result<(), DeviceError> {
        self.wait_writable()?;
        self.io.write_u8(DATA_PORT, data);
        Ok(())
    }

    /// Reads a byte from the data port once one is available.
    pub fn read_data(&mut self) -> Result<u8, DeviceError> {
        self.wait_readable()?;
        Ok(self.io.read_u8(DATA_PORT))
    }

    /// Discards stale output bytes. Returns how many were dropped.
    pub fn flush_output(&mut self) -> usize {
        let mut dropped = 0;
        while dropped < MAX_FLUSH && self.has_output() {
            self.read_data_now();
            dropped += 1;
        }
        dropped
    }

    /// Sends one byte to the auxiliary device and checks its acknowledge.
    pub fn write_aux(&mut self, byte: u8) -> Result<(), DeviceError> {
        self.send_command(CMD_WRITE_AUX)?;
        self.send_data(byte)?;
        let response = self.read_data()?;
        if response != ACK {
            return Err(DeviceError::MissingAck {
                command: byte,
                response,
            });
        }
        Ok(())
    }

    /// Reads the controller configuration byte.
    pub fn read_config(&mut self) -> Result<u8, DeviceError> {
        self.send_command(CMD_READ_CONFIG)?;
        self.read_data()
    }

    /// Writes the controller configuration byte.
    pub fn write_config(&mut self, config: u8) -> Result<(), DeviceError> {
        self.send_command(CMD_WRITE_CONFIG)?;
        self.send_data(config)
    }
}

#[cfg(test)]
pub(crate) mod testing {
    //! Scripted controller used by driver tests.

    use super::*;
    use kestrel_hal::{InterruptController, IrqHandler, IrqRegistry};
    use std::collections::VecDeque;
    use std::vec::Vec;

    /// Fake 8042: bytes queued in `output` appear on the data port, and each
    /// byte sent to the auxiliary device pops one scripted reply.
    #[derive(Default)]
    pub struct ScriptedPorts {
        pub output: VecDeque<u8>,
        pub aux_output: bool,
        pub aux_replies: VecDeque<u8>,
        pub writes: Vec<(u16, u8)>,
        pub word_writes: Vec<(u16, u16)>,
        pub config: u8,
        pub stuck_busy: bool,
        pending_aux: bool,
        pending_config: bool,
    }

    impl ScriptedPorts {
        pub fn with_output(bytes: &[u8]) -> Self {
            Self {
                output: bytes.iter().copied().collect(),
                ..Self::default()
            }
        }

        /// A controller whose input buffer never drains.
        pub fn busy() -> Self {
            Self {
                stuck_busy: true,
                ..Self::default()
            }
        }

        pub fn with_config(config: u8) -> Self {
            Self {
                config,
                ..Self::default()
            }
        }

        pub fn aux_bytes_sent(&self) -> Vec<u8> {
            let mut sent = Vec::new();
            let mut routed = false;
            for &(port, value) in &self.writes {
                match port {
                    COMMAND_PORT => routed = value == CMD_WRITE_AUX,
                    DATA_PORT if routed => {
                        sent.push(value);
                        routed = false;
                    }
                    _ => {}
                }
            }
            sent
        }

        pub fn commands_sent(&self) -> Vec<u8> {
            self.writes
                .iter()
                .filter(|(port, _)| *port == COMMAND_PORT)
                .map(|&(_, value)| value)
                .collect()
        }
    }

    impl PortIo for ScriptedPorts {
        fn read_u8(&mut self, port: u16) -> u8 {
            match port {
                COMMAND_PORT => {
                    let mut status = 0;
                    if !self.output.is_empty() {
                        status |= STATUS_OUTPUT_FULL;
                        if self.aux_output {
                            status |= STATUS_AUX_DATA;
                        }
                    }
                    if self.stuck_busy {
                        status |= STATUS_INPUT_FULL;
                    }
                    status
                }
                DATA_PORT => self.output.pop_front().unwrap_or(0),
                _ => 0,
            }
        }

        fn write_u8(&mut self, port: u16, value: u8) {
            self.writes.push((port, value));
            match port {
                COMMAND_PORT => match value {
                    CMD_WRITE_AUX => self.pending_aux = true,
                    CMD_READ_CONFIG => self.output.push_back(self.config),
                    CMD_WRITE_CONFIG => self.pending_config = true,
                    _ => {}
                },
                DATA_PORT if self.pending_aux => {
                    self.pending_aux = false;
                    if let Some(reply) = self.aux_replies.pop_front() {
                        self.output.push_back(reply);
                    }
                }
                DATA_PORT if self.pending_config => {
                    self.pending_config = false;
                    self.config = value;
                }
                _ => {}
            }
        }

        fn read_u16(&mut self, _port: u16) -> u16 {
            0
        }

        fn write_u16(&mut self, port: u16, value: u16) {
            self.word_writes.push((port, value));
        }
    }

    /// Interrupt controller that records acknowledgments.
    #[derive(Default)]
    pub struct RecordingPic {
        pub acknowledged: Vec<u8>,
        pub enabled: bool,
    }

    impl InterruptController for RecordingPic {
        fn enable(&mut self) {
            self.enabled = true;
        }

        fn disable(&mut self) {
            self.enabled = false;
        }

        fn end_of_interrupt(&mut self, irq: u8) {
            self.acknowledged.push(irq);
        }
    }

    /// Registry that remembers which lines received a handler.
    #[derive(Default)]
    pub struct RecordingRegistry {
        pub lines: Vec<u8>,
    }

    impl IrqRegistry for RecordingRegistry {
        fn register_handler(&mut self, irq: u8, _handler: IrqHandler) {
            self.lines.push(irq);
        }
    }

    pub fn noop_handler() {}
}

#[cfg(test)]
mod tests {
    use super::testing::ScriptedPorts;
    use super::*;

    #[test]
    fn test_write_aux_requires_ack() {
        let mut ports = ScriptedPorts::default();
        ports.aux_replies.push_back(0xFE);
        let result = Controller::new(&mut ports).write_aux(DEV_SET_DEFAULTS);
        assert_eq!(
            result,
            Err(DeviceError::MissingAck {
                command: DEV_SET_DEFAULTS,
                response: 0xFE
            })
        );
        assert_eq!(ports.aux_bytes_sent(), [DEV_SET_DEFAULTS]);
    }

    #[test]
    fn test_wait_gives_up_on_busy_controller() {
        let mut ports = ScriptedPorts::busy();
        assert_eq!(
            Controller::new(&mut ports).send_command(CMD_ENABLE_AUX),
            Err(DeviceError::ControllerTimeout)
        );
        assert!(ports.writes.is_empty());
    }

    #[test]
    fn test_flush_is_bounded() {
        let mut ports = ScriptedPorts::with_output(&[0xAA; 40]);
        assert_eq!(Controller::new(&mut ports).flush_output(), MAX_FLUSH);
        assert_eq!(ports.output.len(), 40 - MAX_FLUSH);
    }

    #[test]
    fn test_config_round_trip_through_controller() {
        let mut ports = ScriptedPorts::with_config(0x21);
        let mut controller = Controller::new(&mut ports);
        let config = controller.read_config().expect("config readable");
        controller.write_config(config | CONFIG_AUX_IRQ).expect("config writable");
        assert_eq!(ports.config, 0x23);
    }
}
