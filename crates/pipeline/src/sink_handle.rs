//! Sink handle for router-to-sink communication
//!
//! `SinkHandle` wraps a channel sender and a sink name, letting the router
//! deliver records to sinks without knowing their concrete types.

use std::sync::Arc;

use logmux_protocol::LogRecord;
use tokio::sync::mpsc;

/// Handle to a sink for delivering records
///
/// Each sink creates a channel at session setup; the sending half is
/// wrapped in a handle and registered with the router. Records are wrapped
/// in `Arc` so fan-out to multiple sinks never copies the payload.
pub struct SinkHandle {
    /// Human-readable name for logging
    name: String,

    /// Channel sender for records
    sender: mpsc::Sender<Arc<LogRecord>>,
}

impl SinkHandle {
    /// Create a new sink handle
    #[inline]
    pub fn new(name: impl Into<String>, sender: mpsc::Sender<Arc<LogRecord>>) -> Self {
        Self {
            name: name.into(),
            sender,
        }
    }

    /// Get the sink's name
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Try to send a record without blocking
    ///
    /// Returns the record back if the channel is full or closed.
    #[inline]
    pub fn try_send(&self, record: Arc<LogRecord>) -> Result<(), Arc<LogRecord>> {
        self.sender.try_send(record).map_err(|e| match e {
            mpsc::error::TrySendError::Full(r) => r,
            mpsc::error::TrySendError::Closed(r) => r,
        })
    }

    /// Check if the sink channel is closed
    #[inline]
    pub fn is_closed(&self) -> bool {
        self.sender.is_closed()
    }

    /// Get the current spare capacity of the channel
    #[inline]
    pub fn capacity(&self) -> usize {
        self.sender.capacity()
    }

    /// Get the maximum capacity of the channel
    #[inline]
    pub fn max_capacity(&self) -> usize {
        self.sender.max_capacity()
    }
}

impl std::fmt::Debug for SinkHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SinkHandle")
            .field("name", &self.name)
            .field("closed", &self.is_closed())
            .finish()
    }
}
