/// Nova3D Engine - process-wide services
///
/// Devices and techniques are plain values owned by the application. Only
/// the logger is global, so any module can reach it through the
/// `engine_*` macros.

use std::sync::{OnceLock, RwLock};
use std::time::SystemTime;
use crate::log::{Logger, LogEntry, LogSeverity, DefaultLogger};

/// Installed logger, `DefaultLogger` until replaced
static LOGGER: OnceLock<RwLock<Box<dyn Logger>>> = OnceLock::new();

fn logger() -> &'static RwLock<Box<dyn Logger>> {
    LOGGER.get_or_init(|| RwLock::new(Box::new(DefaultLogger)))
}

fn install(logger_impl: Box<dyn Logger>) {
    if let Ok(mut lock) = logger().write() {
        *lock = logger_impl;
    }
}

fn dispatch(severity: LogSeverity, source: &str, message: String, location: Option<(&'static str, u32)>) {
    // A poisoned lock drops the entry rather than panicking inside a log call
    if let Ok(lock) = logger().read() {
        lock.log(&LogEntry {
            severity,
            timestamp: SystemTime::now(),
            source: source.to_string(),
            message,
            file: location.map(|(file, _)| file),
            line: location.map(|(_, line)| line),
        });
    }
}

/// Engine-wide services
///
/// # Example
///
/// ```no_run
/// use nova_3d_engine::nova3d::{Engine, log::{Logger, LogEntry}};
///
/// struct Silent;
/// impl Logger for Silent {
///     fn log(&self, _entry: &LogEntry) {}
/// }
///
/// Engine::set_logger(Silent);
/// ```
pub struct Engine;

impl Engine {
    /// Route all engine logging to `logger_impl`
    pub fn set_logger<L: Logger + 'static>(logger_impl: L) {
        install(Box::new(logger_impl));
    }

    /// Go back to the colored console logger
    pub fn reset_logger() {
        install(Box::new(DefaultLogger));
    }

    /// Emit an entry without a call site (`engine_info!` and friends)
    pub fn log(severity: LogSeverity, source: &str, message: String) {
        dispatch(severity, source, message, None);
    }

    /// Emit an entry carrying `file:line` (`engine_error!`, `engine_err!`, `engine_bail!`)
    pub fn log_detailed(
        severity: LogSeverity,
        source: &str,
        message: String,
        file: &'static str,
        line: u32,
    ) {
        dispatch(severity, source, message, Some((file, line)));
    }
}

#[cfg(test)]
#[path = "engine_tests.rs"]
mod tests;
