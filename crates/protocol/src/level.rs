//! Log level for records and wire entries

use std::fmt;

use serde::{Deserialize, Serialize};

/// Severity level attached to a log record
///
/// Records produced by the line framer always carry [`LogLevel::Info`];
/// the remaining levels appear on synthetic wire entries (heartbeats,
/// overflow warnings) and in the configuration surface.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Keep-alive chatter, below debug
    Silly,
    /// Debugging information
    Debug,
    /// Normal operation (default)
    #[default]
    Info,
    /// Warnings, including the overflow loss warning
    Warn,
    /// Errors
    Error,
}

impl LogLevel {
    /// Get the lowercase wire/filter representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Silly => "silly",
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
