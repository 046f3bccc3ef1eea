//! PS/2 mouse driver.
//!
//! [`MouseDriver::initialize`] performs the auxiliary-device handshake.
//! [`MouseDriver::handle_interrupt`] assembles packets and publishes the
//! smoothed pointer as one packed [`MouseSnapshot`]. Nothing is drawn from
//! interrupt context: consumers poll [`MouseDriver::snapshot`].

pub mod motion;
pub mod packet;

pub use motion::{MotionTracker, Smoother};
pub use packet::{MousePacket, PacketAssembler};

use crate::config::{irq, ps2, MouseConfig};
use crate::drivers::ps2::Controller;
use core::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use kestrel_common::{DeviceError, MouseSnapshot, MouseStatus};
use kestrel_hal::{InterruptController, IrqHandler, IrqRegistry, PortIo};
use spin::Mutex;

/// State owned by the interrupt handler.
struct Decoder {
    assembler: PacketAssembler,
    tracker: MotionTracker,
    sequence: u16,
}

/// Mouse driver state shared between IRQ12 and the polling loop.
pub struct MouseDriver {
    config: MouseConfig,
    decoder: Mutex<Decoder>,
    published: AtomicU64,
    streaming: AtomicBool,
}

impl Default for MouseDriver {
    fn default() -> Self {
        Self::new(MouseConfig::DEFAULT)
    }
}

impl MouseDriver {
    /// Creates an idle driver positioned at `config.start`.
    pub const fn new(config: MouseConfig) -> Self {
        let tracker = MotionTracker::new(config.start, config.bounds, config.smoothing);
        let initial = MouseSnapshot {
            x: clamp_start(config.start.0, config.bounds.0),
            y: clamp_start(config.start.1, config.bounds.1),
            status: MouseStatus::empty(),
            sequence: 0,
        };
        Self {
            config,
            decoder: Mutex::new(Decoder {
                assembler: PacketAssembler::new(),
                tracker,
                sequence: 0,
            }),
            published: AtomicU64::new(initial.pack()),
            streaming: AtomicBool::new(false),
        }
    }

    /// Driver settings.
    pub fn config(&self) -> &MouseConfig {
        &self.config
    }

    /// Brings the auxiliary device up and installs `handler` on IRQ12.
    ///
    /// Set-defaults and enable-streaming must be acknowledged; a failure
    /// there leaves the device disabled and no handler installed. Sample
    /// rate and controller configuration failures are logged and skipped.
    pub fn initialize(
        &self,
        io: &mut impl PortIo,
        registry: &mut impl IrqRegistry,
        handler: IrqHandler,
    ) -> Result<(), DeviceError> {
        let mut controller = Controller::new(io);

        controller.send_command(ps2::CMD_DISABLE_AUX)?;
        controller.wait_writable()?;
        let stale = controller.flush_output();
        if stale > 0 {
            log::debug!("mouse: discarded {} stale bytes", stale);
        }
        controller.send_command(ps2::CMD_ENABLE_AUX)?;

        if let Err(err) = controller.write_aux(ps2::DEV_SET_DEFAULTS) {
            log::error!("mouse: set defaults failed: {}", err);
            return Err(err);
        }

        let rate = self.config.sample_rate.as_u8();
        if let Err(err) = controller
            .write_aux(ps2::DEV_SET_SAMPLE_RATE)
            .and_then(|()| controller.write_aux(rate))
        {
            log::warn!("mouse: sample rate {} not applied: {}", rate, err);
        }

        if let Err(err) = enable_aux_irq(&mut controller) {
            log::warn!("mouse: controller configuration not updated: {}", err);
        }

        if let Err(err) = controller.write_aux(ps2::DEV_ENABLE_STREAMING) {
            log::error!("mouse: enable streaming failed: {}", err);
            return Err(err);
        }

        // drop any frame started before the handshake
        self.decoder.lock().assembler.reset();
        registry.register_handler(irq::MOUSE, handler);
        self.streaming.store(true, Ordering::Release);
        log::info!("mouse: streaming at {} Hz on IRQ{}", rate, irq::MOUSE);
        Ok(())
    }

    /// Services one mouse interrupt.
    pub fn handle_interrupt(&self, io: &mut impl PortIo, pic: &mut impl InterruptController) {
        let mut controller = Controller::new(io);
        if controller.has_output() {
            let byte = controller.read_data_now();
            self.feed(byte);
        }
        pic.end_of_interrupt(irq::MOUSE);
    }

    /// Feeds one raw byte. Returns the published record when it completes a
    /// packet.
    pub fn feed(&self, byte: u8) -> Option<MouseSnapshot> {
        let mut decoder = self.decoder.lock();
        let packet = decoder.assembler.push(byte)?;
        let (x, y) = decoder.tracker.apply(packet.dx, packet.dy);
        decoder.sequence = decoder.sequence.wrapping_add(1);
        let snapshot = MouseSnapshot {
            x,
            y,
            status: packet.status,
            sequence: decoder.sequence,
        };
        self.published.store(snapshot.pack(), Ordering::Release);
        Some(snapshot)
    }

    /// Latest published record.
    pub fn snapshot(&self) -> MouseSnapshot {
        MouseSnapshot::unpack(self.published.load(Ordering::Acquire))
    }

    /// Latest pointer position in cells.
    pub fn position(&self) -> (u16, u16) {
        let snapshot = self.snapshot();
        (snapshot.x, snapshot.y)
    }

    /// Status bits of the latest packet.
    pub fn status(&self) -> MouseStatus {
        self.snapshot().status
    }

    /// Returns true once the device acknowledged enable-streaming.
    pub fn is_streaming(&self) -> bool {
        self.streaming.load(Ordering::Acquire)
    }
}

fn enable_aux_irq<P: PortIo>(controller: &mut Controller<'_, P>) -> Result<(), DeviceError> {
    let config = controller.read_config()?;
    let updated = (config | ps2::CONFIG_AUX_IRQ) & !ps2::CONFIG_AUX_CLOCK_DISABLED;
    controller.write_config(updated)
}

const fn clamp_start(value: u16, extent: u16) -> u16 {
    if extent == 0 {
        0
    } else if value >= extent {
        extent - 1
    } else {
        value
    }
}
