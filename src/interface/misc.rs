// Misc plumbing for the interface layer: shared-map re-exports and the
// stderr logger behind the `log` facade.

pub use dashmap::DashMap as RustHashMap;
pub use parking_lot::Mutex;
pub use std::sync::atomic::{AtomicU64 as RustAtomicU64, Ordering as RustAtomicOrdering};

use log::{LevelFilter, Log, Metadata, Record};

struct StderrLogger;

impl Log for StderrLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            eprintln!("[{}] {}: {}", record.level(), record.target(), record.args());
        }
    }

    fn flush(&self) {}
}

static LOGGER: StderrLogger = StderrLogger;

/// Install the stderr logger. Level comes from `RELPOSIX_LOG` (`error`,
/// `warn`, `info`, `debug`, `trace`); unset means silent. Safe to call more
/// than once, later calls are no-ops.
pub fn init_logging() {
    let level = match std::env::var("RELPOSIX_LOG").as_deref() {
        Ok("error") => LevelFilter::Error,
        Ok("warn") => LevelFilter::Warn,
        Ok("info") => LevelFilter::Info,
        Ok("debug") => LevelFilter::Debug,
        Ok("trace") => LevelFilter::Trace,
        _ => LevelFilter::Off,
    };
    if log::set_logger(&LOGGER).is_ok() {
        log::set_max_level(level);
    }
}
