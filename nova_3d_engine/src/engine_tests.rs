//! Unit tests for the Engine logging API and the engine_* macros
//!
//! LOGGER is a global OnceLock shared across all tests. Tests that swap the
//! logger are marked #[serial]; captured entries are filtered by source since
//! unrelated tests may log concurrently.

use crate::nova3d::{Engine, Error, Result};
use crate::nova3d::log::{Logger, LogEntry, LogSeverity};
use std::sync::{Arc, Mutex};
use serial_test::serial;

// ============================================================================
// TEST HELPERS
// ============================================================================

const SOURCE: &str = "nova3d::engine_tests";

/// Test logger that captures log entries for verification
struct TestLogger {
    entries: Arc<Mutex<Vec<LogEntry>>>,
}

impl TestLogger {
    fn new() -> (Self, Arc<Mutex<Vec<LogEntry>>>) {
        let entries = Arc::new(Mutex::new(Vec::new()));
        (Self { entries: entries.clone() }, entries)
    }
}

impl Logger for TestLogger {
    fn log(&self, entry: &LogEntry) {
        if entry.source == SOURCE {
            self.entries.lock().unwrap().push(entry.clone());
        }
    }
}

fn captured(entries: &Arc<Mutex<Vec<LogEntry>>>) -> Vec<LogEntry> {
    entries.lock().unwrap().clone()
}

// ============================================================================
// LOGGING API TESTS
// ============================================================================

#[test]
#[serial]
fn test_default_logger_logs_without_panic() {
    Engine::reset_logger();

    Engine::log(LogSeverity::Info, SOURCE, "Test message".to_string());
    Engine::log(LogSeverity::Error, SOURCE, "Error message".to_string());
    Engine::log(LogSeverity::Warn, SOURCE, "Warning message".to_string());
}

#[test]
#[serial]
fn test_set_custom_logger() {
    let (logger, entries) = TestLogger::new();
    Engine::set_logger(logger);

    Engine::log(LogSeverity::Info, SOURCE, "Message 1".to_string());
    Engine::log(LogSeverity::Warn, SOURCE, "Message 2".to_string());

    let entries = captured(&entries);
    Engine::reset_logger();

    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].severity, LogSeverity::Info);
    assert_eq!(entries[0].message, "Message 1");
    assert_eq!(entries[1].severity, LogSeverity::Warn);
    assert_eq!(entries[1].message, "Message 2");
}

#[test]
#[serial]
fn test_reset_logger_to_default() {
    let (logger, entries) = TestLogger::new();
    Engine::set_logger(logger);
    Engine::reset_logger();

    Engine::log(LogSeverity::Info, SOURCE, "After reset".to_string());

    assert!(captured(&entries).is_empty());
}

#[test]
#[serial]
fn test_log_detailed_with_file_line() {
    let (logger, entries) = TestLogger::new();
    Engine::set_logger(logger);

    Engine::log_detailed(
        LogSeverity::Error,
        SOURCE,
        "Detailed error".to_string(),
        "forward.rs",
        42,
    );

    let entries = captured(&entries);
    Engine::reset_logger();

    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].file, Some("forward.rs"));
    assert_eq!(entries[0].line, Some(42));
}

#[test]
#[serial]
fn test_simple_log_has_no_location() {
    let (logger, entries) = TestLogger::new();
    Engine::set_logger(logger);

    Engine::log(LogSeverity::Debug, SOURCE, "Simple".to_string());

    let entries = captured(&entries);
    Engine::reset_logger();

    assert_eq!(entries.len(), 1);
    assert!(entries[0].file.is_none());
    assert!(entries[0].line.is_none());
}

// ============================================================================
// MACRO TESTS
// ============================================================================

#[test]
#[serial]
fn test_severity_macros() {
    let (logger, entries) = TestLogger::new();
    Engine::set_logger(logger);

    crate::engine_trace!(SOURCE, "trace {}", 1);
    crate::engine_debug!(SOURCE, "debug {}", 2);
    crate::engine_info!(SOURCE, "info {}", 3);
    crate::engine_warn!(SOURCE, "warn {}", 4);
    crate::engine_error!(SOURCE, "error {}", 5);

    let entries = captured(&entries);
    Engine::reset_logger();

    let severities: Vec<_> = entries.iter().map(|e| e.severity).collect();
    assert_eq!(
        severities,
        vec![
            LogSeverity::Trace,
            LogSeverity::Debug,
            LogSeverity::Info,
            LogSeverity::Warn,
            LogSeverity::Error,
        ]
    );
    assert_eq!(entries[4].message, "error 5");
    assert!(entries[4].file.is_some());
    assert!(entries[3].file.is_none());
}

#[test]
#[serial]
fn test_engine_err_logs_and_builds_backend_error() {
    let (logger, entries) = TestLogger::new();
    Engine::set_logger(logger);

    let error = crate::engine_err!(SOURCE, "Failed to create buffer: {}", "ERROR_OUT_OF_DEVICE_MEMORY");

    let entries = captured(&entries);
    Engine::reset_logger();

    match error {
        Error::BackendError(msg) => assert_eq!(msg, "Failed to create buffer: ERROR_OUT_OF_DEVICE_MEMORY"),
        other => panic!("Expected BackendError, got {:?}", other),
    }
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].severity, LogSeverity::Error);
    assert!(entries[0].line.is_some());
}

fn bail_when(fail: bool) -> Result<u32> {
    if fail {
        crate::engine_bail!(SOURCE, "bailing out");
    }
    Ok(7)
}

fn bail_warn_when(fail: bool) -> Result<u32> {
    if fail {
        crate::engine_bail_warn!(SOURCE, "soft failure");
    }
    Ok(9)
}

#[test]
#[serial]
fn test_engine_bail_returns_early() {
    let (logger, entries) = TestLogger::new();
    Engine::set_logger(logger);

    assert_eq!(bail_when(false).unwrap(), 7);
    let result = bail_when(true);

    let entries = captured(&entries);
    Engine::reset_logger();

    assert!(matches!(result, Err(Error::BackendError(ref msg)) if msg == "bailing out"));
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].severity, LogSeverity::Error);
}

#[test]
#[serial]
fn test_engine_bail_warn_logs_at_warn() {
    let (logger, entries) = TestLogger::new();
    Engine::set_logger(logger);

    assert_eq!(bail_warn_when(false).unwrap(), 9);
    let result = bail_warn_when(true);
    let error = crate::engine_warn_err!(SOURCE, "direct {}", "warn");

    let entries = captured(&entries);
    Engine::reset_logger();

    assert!(matches!(result, Err(Error::BackendError(ref msg)) if msg == "soft failure"));
    assert!(matches!(error, Error::BackendError(ref msg) if msg == "direct warn"));
    assert_eq!(entries.len(), 2);
    assert!(entries.iter().all(|e| e.severity == LogSeverity::Warn));
    assert!(entries.iter().all(|e| e.file.is_none()));
}

#[test]
#[serial]
fn test_concurrent_logging() {
    let (logger, entries) = TestLogger::new();
    Engine::set_logger(logger);

    let handles: Vec<_> = (0..4)
        .map(|i| {
            std::thread::spawn(move || {
                for j in 0..10 {
                    Engine::log(LogSeverity::Info, SOURCE, format!("thread {} msg {}", i, j));
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    let entries = captured(&entries);
    Engine::reset_logger();

    assert_eq!(entries.len(), 40);
}
