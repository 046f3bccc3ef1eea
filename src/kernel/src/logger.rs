//! `log` backend.
//!
//! Records are formatted as `[LEVEL] target: message` and handed to a sink
//! installed at boot, which is the serial port on bare metal. Records logged
//! before a sink is installed are dropped.

use core::fmt;
use log::{LevelFilter, Log, Metadata, Record, SetLoggerError};

/// Receives one formatted record, newline included.
pub type Sink = fn(fmt::Arguments<'_>);

/// Logger forwarding to a [`Sink`].
pub struct KernelLogger {
    level: LevelFilter,
    sink: spin::Once<Sink>,
}

impl KernelLogger {
    pub const fn new(level: LevelFilter) -> Self {
        Self {
            level,
            sink: spin::Once::new(),
        }
    }

    /// Installs the sink. Only the first call has an effect.
    pub fn attach(&self, sink: Sink) {
        self.sink.call_once(|| sink);
    }

    pub fn level(&self) -> LevelFilter {
        self.level
    }
}

impl Log for KernelLogger {
    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record<'_>) {
        if !self.enabled(record.metadata()) {
            return;
        }
        if let Some(sink) = self.sink.get() {
            sink(format_args!(
                "[{:<5}] {}: {}\n",
                record.level(),
                record.target(),
                record.args()
            ));
        }
    }

    fn flush(&self) {}
}

static LOGGER: KernelLogger = KernelLogger::new(crate::config::LOG_LEVEL);

/// Registers the kernel logger with `log` and routes records to `sink`.
pub fn init(sink: Sink) -> Result<(), SetLoggerError> {
    LOGGER.attach(sink);
    log::set_logger(&LOGGER)?;
    log::set_max_level(LOGGER.level());
    Ok(())
}
