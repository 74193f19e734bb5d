//! Log record
//!
//! One reassembled log line plus its origin. Records are immutable once
//! constructed and shared between sinks as `Arc<LogRecord>`.

use std::sync::Arc;

use crate::{ContainerIdentity, LogLevel};

/// A single framed log record
///
/// Produced by the line framer, consumed by every sink. The message holds
/// one logical line with trailing whitespace trimmed; embedded newlines may
/// occur (the framer collapses multi-line chunks into one record) and are
/// re-split at render time by the formatter.
#[derive(Debug, Clone)]
pub struct LogRecord {
    /// Severity level (framed output is always info)
    level: LogLevel,

    /// The reassembled line, trailing whitespace trimmed
    message: String,

    /// Origin of the stream this record came from
    identity: Arc<ContainerIdentity>,

    /// True when the record came from the error stream (stderr)
    is_error_output: bool,
}

impl LogRecord {
    /// Create a new record
    pub fn new(
        level: LogLevel,
        message: impl Into<String>,
        identity: Arc<ContainerIdentity>,
        is_error_output: bool,
    ) -> Self {
        Self {
            level,
            message: message.into(),
            identity,
            is_error_output,
        }
    }

    /// Get the severity level
    #[inline]
    pub fn level(&self) -> LogLevel {
        self.level
    }

    /// Get the message text
    #[inline]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Get the origin identity
    #[inline]
    pub fn identity(&self) -> &Arc<ContainerIdentity> {
        &self.identity
    }

    /// Whether this record came from the error stream
    #[inline]
    pub fn is_error_output(&self) -> bool {
        self.is_error_output
    }
}
