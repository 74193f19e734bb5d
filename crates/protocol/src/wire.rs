//! Remote wire format
//!
//! Entries written to the remote channel are newline-delimited JSON:
//!
//! ```text
//! {"level":"info","message":"started","containerNames":["api"],"isErrorOutput":false}
//! {"level":"silly","message":"keepalive"}
//! {"level":"warn","message":"Not able to keep up with server log streaming, having to drop packets...."}
//! ```
//!
//! The byte length of the encoded frame (including the trailing newline) is
//! the unit of accounting for the bounded remote sink.

use bytes::Bytes;
use serde::{Deserialize, Serialize};

use crate::{LogLevel, LogRecord};

/// Fixed message for the single loss warning emitted on overflow
pub const OVERFLOW_WARNING_MESSAGE: &str =
    "Not able to keep up with server log streaming, having to drop packets....";

/// Fixed message for the periodic keep-alive entry
pub const HEARTBEAT_MESSAGE: &str = "keepalive";

/// One newline-delimited JSON entry on the remote channel
///
/// Synthetic entries (heartbeat, overflow warning) carry only `level` and
/// `message`; the container fields are omitted from their serialized form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteLogEntry {
    /// Severity level
    pub level: LogLevel,

    /// Message text
    pub message: String,

    /// Names of the containers this entry belongs to (empty for synthetic
    /// entries, omitted on the wire when empty)
    #[serde(
        rename = "containerNames",
        default,
        skip_serializing_if = "Vec::is_empty"
    )]
    pub container_names: Vec<String>,

    /// Whether the entry came from an error stream (absent for synthetic
    /// entries)
    #[serde(
        rename = "isErrorOutput",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub is_error_output: Option<bool>,
}

impl RemoteLogEntry {
    /// Build a wire entry from a framed record
    pub fn from_record(record: &LogRecord) -> Self {
        Self {
            level: record.level(),
            message: record.message().to_owned(),
            container_names: vec![record.identity().short_name().to_owned()],
            is_error_output: Some(record.is_error_output()),
        }
    }

    /// The periodic keep-alive entry
    pub fn heartbeat() -> Self {
        Self {
            level: LogLevel::Silly,
            message: HEARTBEAT_MESSAGE.to_owned(),
            container_names: Vec::new(),
            is_error_output: None,
        }
    }

    /// The fixed warning entry enqueued once per loss episode
    pub fn overflow_warning() -> Self {
        Self {
            level: LogLevel::Warn,
            message: OVERFLOW_WARNING_MESSAGE.to_owned(),
            container_names: Vec::new(),
            is_error_output: None,
        }
    }

    /// Encode as one NDJSON frame, trailing newline included
    ///
    /// The returned frame's length is the serialized size used for queue
    /// accounting in the bounded remote sink.
    pub fn to_ndjson(&self) -> Result<Bytes, serde_json::Error> {
        let mut frame = serde_json::to_vec(self)?;
        frame.push(b'\n');
        Ok(Bytes::from(frame))
    }
}

#[cfg(test)]
#[path = "wire_test.rs"]
mod wire_test;
