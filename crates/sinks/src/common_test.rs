//! Common sink type tests

use std::time::Duration;

use super::*;

// ============================================================================
// SinkError tests
// ============================================================================

#[test]
fn test_error_display() {
    let err = SinkError::init("bad path");
    assert!(err.to_string().contains("bad path"));

    let err = SinkError::write("disk full");
    assert!(err.to_string().contains("disk full"));

    let err = SinkError::ChannelClosed;
    assert!(err.to_string().contains("channel closed"));
}

#[test]
fn test_error_from_io() {
    let io = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "pipe");
    let err = SinkError::from(io);
    assert!(matches!(err, SinkError::Io(_)));
}

// ============================================================================
// RateLimitedLogger tests
// ============================================================================

#[test]
fn test_rate_limited_logger_first_error_logs() {
    let logger = RateLimitedLogger::new(Duration::from_secs(10));
    assert!(logger.error("test", "write failed", &"disk full"));
}

#[test]
fn test_rate_limited_logger_suppresses_within_interval() {
    let logger = RateLimitedLogger::new(Duration::from_secs(10));

    assert!(logger.error("test", "write failed", &"disk full"));
    assert!(!logger.error("test", "write failed", &"disk full"));
    assert!(!logger.error("test", "write failed", &"disk full"));

    assert_eq!(logger.total_errors(), 3);
}

#[test]
fn test_rate_limited_logger_logs_after_interval() {
    let logger = RateLimitedLogger::new(Duration::from_millis(0));

    assert!(logger.error("test", "write failed", &"disk full"));
    assert!(logger.error("test", "write failed", &"disk full"));
}

#[test]
fn test_rate_limited_logger_default_interval() {
    let logger = RateLimitedLogger::default_interval();
    assert_eq!(logger.total_errors(), 0);
}
