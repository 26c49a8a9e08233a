//! Unit tests for log.rs
//!
//! Tests LogSeverity ordering and labels, LogEntry, and DefaultLogger formatting.

use crate::log::{Logger, LogEntry, LogSeverity, DefaultLogger};
use std::sync::{Arc, Mutex};
use std::time::SystemTime;

fn entry(severity: LogSeverity, message: &str) -> LogEntry {
    LogEntry {
        severity,
        timestamp: SystemTime::now(),
        source: "lumen::TextureCache".to_string(),
        message: message.to_string(),
        file: None,
        line: None,
    }
}

// ============================================================================
// LOG SEVERITY TESTS
// ============================================================================

#[test]
fn test_log_severity_ordering() {
    assert!(LogSeverity::Trace < LogSeverity::Debug);
    assert!(LogSeverity::Debug < LogSeverity::Info);
    assert!(LogSeverity::Info < LogSeverity::Warn);
    assert!(LogSeverity::Warn < LogSeverity::Error);
}

#[test]
fn test_log_severity_labels_are_fixed_width() {
    let severities = [
        LogSeverity::Trace,
        LogSeverity::Debug,
        LogSeverity::Info,
        LogSeverity::Warn,
        LogSeverity::Error,
    ];
    for severity in severities {
        assert_eq!(severity.label().len(), 5);
    }
    assert_eq!(LogSeverity::Warn.label().trim(), "WARN");
}

// ============================================================================
// LOG ENTRY TESTS
// ============================================================================

#[test]
fn test_log_entry_with_file_line() {
    let entry = LogEntry {
        severity: LogSeverity::Error,
        timestamp: SystemTime::now(),
        source: "lumen::gl".to_string(),
        message: "glCreateTexture failed".to_string(),
        file: Some("gl_graphics_device.rs"),
        line: Some(42),
    };

    let copy = entry.clone();
    assert_eq!(copy.severity, LogSeverity::Error);
    assert_eq!(copy.file, Some("gl_graphics_device.rs"));
    assert_eq!(copy.line, Some(42));
}

// ============================================================================
// DEFAULT LOGGER TESTS
// ============================================================================

#[test]
fn test_default_logger_format_contains_source_and_message() {
    let text = DefaultLogger::format(&entry(LogSeverity::Debug, "Loaded 'bricks.png' (64x64)"));
    assert!(text.contains("lumen::TextureCache"));
    assert!(text.contains("Loaded 'bricks.png' (64x64)"));
    assert!(text.contains("DEBUG"));
}

#[test]
fn test_default_logger_format_appends_file_line() {
    let mut e = entry(LogSeverity::Error, "upload failed");
    e.file = Some("gpu_texture.rs");
    e.line = Some(7);

    let text = DefaultLogger::format(&e);
    assert!(text.ends_with("(gpu_texture.rs:7)"));
}

#[test]
fn test_default_logger_format_without_line_has_no_suffix() {
    let mut e = entry(LogSeverity::Error, "upload failed");
    e.file = Some("gpu_texture.rs");

    let text = DefaultLogger::format(&e);
    assert!(text.ends_with("upload failed"));
}

#[test]
fn test_default_logger_all_severities() {
    let logger = DefaultLogger;
    logger.log(&entry(LogSeverity::Trace, "trace"));
    logger.log(&entry(LogSeverity::Debug, "debug"));
    logger.log(&entry(LogSeverity::Info, "info"));
    logger.log(&entry(LogSeverity::Warn, "warn"));
    logger.log(&entry(LogSeverity::Error, "error"));
}

// ============================================================================
// CUSTOM LOGGER TESTS
// ============================================================================

struct CollectingLogger {
    messages: Arc<Mutex<Vec<String>>>,
}

impl Logger for CollectingLogger {
    fn log(&self, entry: &LogEntry) {
        self.messages.lock().unwrap().push(entry.message.clone());
    }
}

#[test]
fn test_custom_logger_implementation() {
    let messages = Arc::new(Mutex::new(Vec::new()));
    let logger = CollectingLogger { messages: messages.clone() };

    logger.log(&entry(LogSeverity::Info, "first"));
    logger.log(&entry(LogSeverity::Warn, "second"));

    assert_eq!(*messages.lock().unwrap(), vec!["first", "second"]);
}

#[test]
fn test_logger_trait_is_send_sync() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<DefaultLogger>();
    assert_send_sync::<CollectingLogger>();
}
