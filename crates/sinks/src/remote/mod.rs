//! Remote Sink - byte-bounded NDJSON channel
//!
//! Streams records as newline-delimited JSON to a consumer-provided writer
//! (typically a network-backed stream). The sink is the only backpressure
//! boundary in the pipeline: the outbound queue is bounded by a byte
//! budget, and once the budget would be exceeded records are dropped
//! rather than blocking the producing workload.
//!
//! # Loss signaling
//!
//! The producer side runs a two-state machine:
//!
//! ```text
//!            offer fits                    offer overflows
//! [Draining] ----------> [Draining]   [Draining] --------> [Warned]
//!                                       (drop record, enqueue one warning)
//! [Warned]   --offer fits--> [Draining]
//! [Warned]   --offer overflows--> [Warned]  (drop silently)
//! ```
//!
//! Every `offer` reserves room for the record *plus* one warning frame, so
//! the warning itself always fits when a loss episode starts. The consumer
//! task releases queued bytes as frames are written, which re-opens the
//! budget and re-arms the warning for the next episode.

use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;

use bytes::Bytes;
use logmux_protocol::{LogRecord, RemoteLogEntry};
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tokio::sync::mpsc;

use crate::common::SinkError;

/// Default byte budget for the outbound queue (25 MiB)
pub const DEFAULT_CAPACITY_BYTES: usize = 25 * 1024 * 1024;

/// Configuration for the remote sink
#[derive(Debug, Clone)]
pub struct RemoteSinkConfig {
    /// Maximum bytes of serialized frames queued but not yet written
    pub capacity_bytes: usize,
}

impl Default for RemoteSinkConfig {
    fn default() -> Self {
        Self {
            capacity_bytes: DEFAULT_CAPACITY_BYTES,
        }
    }
}

impl RemoteSinkConfig {
    /// Set the byte budget
    #[must_use]
    pub fn with_capacity_bytes(mut self, capacity_bytes: usize) -> Self {
        self.capacity_bytes = capacity_bytes;
        self
    }
}

/// Metrics for the remote sink
#[derive(Debug, Default)]
pub struct RemoteSinkMetrics {
    /// Records offered by producers
    pub records_offered: AtomicU64,

    /// Records accepted into the queue
    pub records_enqueued: AtomicU64,

    /// Records dropped on overflow
    pub records_dropped: AtomicU64,

    /// Loss warnings enqueued (one per loss episode)
    pub warnings_emitted: AtomicU64,

    /// Frame bytes written to the remote writer
    pub bytes_written: AtomicU64,

    /// Write failures on the remote writer
    pub write_errors: AtomicU64,
}

impl RemoteSinkMetrics {
    /// Create new metrics instance
    pub const fn new() -> Self {
        Self {
            records_offered: AtomicU64::new(0),
            records_enqueued: AtomicU64::new(0),
            records_dropped: AtomicU64::new(0),
            warnings_emitted: AtomicU64::new(0),
            bytes_written: AtomicU64::new(0),
            write_errors: AtomicU64::new(0),
        }
    }

    /// Get a snapshot of the counters
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            records_offered: self.records_offered.load(Ordering::Relaxed),
            records_enqueued: self.records_enqueued.load(Ordering::Relaxed),
            records_dropped: self.records_dropped.load(Ordering::Relaxed),
            warnings_emitted: self.warnings_emitted.load(Ordering::Relaxed),
            bytes_written: self.bytes_written.load(Ordering::Relaxed),
            write_errors: self.write_errors.load(Ordering::Relaxed),
        }
    }
}

/// Point-in-time snapshot of remote sink metrics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub records_offered: u64,
    pub records_enqueued: u64,
    pub records_dropped: u64,
    pub warnings_emitted: u64,
    pub bytes_written: u64,
    pub write_errors: u64,
}

/// State shared between the producer handle and the consumer task
#[derive(Debug)]
struct Shared {
    /// Bytes queued but not yet written by the consumer
    queued_bytes: AtomicUsize,

    /// True while a loss warning is queued for the current episode
    warned: AtomicBool,

    /// Pre-encoded warning frame; its length is the reserved warning slot
    warning_frame: Bytes,

    /// Byte budget
    capacity_bytes: usize,
}

impl Shared {
    /// Reserve `size` bytes while keeping `headroom` bytes free, lock-free
    fn try_reserve(&self, size: usize, headroom: usize) -> bool {
        self.queued_bytes
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |current| {
                if current + size + headroom < self.capacity_bytes {
                    Some(current + size)
                } else {
                    None
                }
            })
            .is_ok()
    }

    /// Release bytes written by the consumer
    fn release(&self, size: usize) {
        self.queued_bytes.fetch_sub(size, Ordering::AcqRel);
    }
}

/// Producer-side handle for the remote sink
///
/// `offer` never blocks and never raises; it reports enqueue-or-drop as a
/// plain bool. On overflow the record is dropped and a single warning
/// frame is queued per loss episode. Cheap to clone; the heartbeat ticker
/// holds its own clone.
#[derive(Debug, Clone)]
pub struct RemoteSinkHandle {
    sender: mpsc::UnboundedSender<Bytes>,
    shared: Arc<Shared>,
    metrics: Arc<RemoteSinkMetrics>,
}

impl RemoteSinkHandle {
    /// Offer a record to the remote queue
    ///
    /// Returns true if the record was enqueued, false if it was dropped.
    /// Never blocks either way.
    pub fn offer(&self, record: &LogRecord) -> bool {
        self.offer_entry(&RemoteLogEntry::from_record(record))
    }

    /// Offer a wire entry to the remote queue
    ///
    /// Returns true if the entry was enqueued, false if it was dropped.
    pub fn offer_entry(&self, entry: &RemoteLogEntry) -> bool {
        self.metrics.records_offered.fetch_add(1, Ordering::Relaxed);

        let frame = match entry.to_ndjson() {
            Ok(frame) => frame,
            Err(e) => {
                tracing::warn!(error = %e, "failed to encode remote log entry, skipping");
                return false;
            }
        };

        let warning_size = self.shared.warning_frame.len();
        if self.shared.try_reserve(frame.len(), warning_size) {
            let size = frame.len();
            if self.sender.send(frame).is_err() {
                // Consumer gone; give the reservation back
                self.shared.release(size);
                return false;
            }
            self.metrics.records_enqueued.fetch_add(1, Ordering::Relaxed);
            // A successful enqueue ends the loss episode
            self.shared.warned.store(false, Ordering::Release);
            return true;
        }

        // Overflow: drop the record, signal loss at most once per episode
        self.metrics.records_dropped.fetch_add(1, Ordering::Relaxed);

        if self.shared.warned.swap(true, Ordering::AcqRel) {
            return false;
        }
        if self.shared.try_reserve(warning_size, 0) {
            if self.sender.send(self.shared.warning_frame.clone()).is_err() {
                self.shared.release(warning_size);
                return false;
            }
            self.metrics.warnings_emitted.fetch_add(1, Ordering::Relaxed);
        } else {
            // Not even the warning fits; re-arm so a later drop can signal
            self.shared.warned.store(false, Ordering::Release);
        }
        false
    }

    /// Bytes currently queued but not yet written
    pub fn queued_bytes(&self) -> usize {
        self.shared.queued_bytes.load(Ordering::Acquire)
    }

    /// Whether the sink is in a loss episode
    pub fn is_warned(&self) -> bool {
        self.shared.warned.load(Ordering::Acquire)
    }

    /// Get a shared handle to the metrics
    pub fn metrics(&self) -> Arc<RemoteSinkMetrics> {
        Arc::clone(&self.metrics)
    }
}

/// Consumer task writing queued frames to the remote writer
pub struct RemoteSink<W> {
    /// Frame queue; boundedness comes from the byte budget, not the channel
    receiver: mpsc::UnboundedReceiver<Bytes>,

    /// Destination writer (network-backed in production)
    writer: W,

    /// Shared accounting with the producer handle
    shared: Arc<Shared>,

    /// Sink name for logging
    name: String,

    /// Metrics (Arc for sharing with the handle)
    metrics: Arc<RemoteSinkMetrics>,
}

impl<W: AsyncWrite + Unpin> RemoteSink<W> {
    /// Create a handle/sink pair with the default config
    pub fn channel(writer: W) -> (RemoteSinkHandle, Self) {
        Self::channel_with_config(writer, RemoteSinkConfig::default())
    }

    /// Create a handle/sink pair with a custom config
    pub fn channel_with_config(writer: W, config: RemoteSinkConfig) -> (RemoteSinkHandle, Self) {
        let warning_frame = RemoteLogEntry::overflow_warning()
            .to_ndjson()
            .unwrap_or_else(|_| Bytes::from_static(b"{\"level\":\"warn\"}\n"));

        let shared = Arc::new(Shared {
            queued_bytes: AtomicUsize::new(0),
            warned: AtomicBool::new(false),
            warning_frame,
            capacity_bytes: config.capacity_bytes,
        });
        let metrics = Arc::new(RemoteSinkMetrics::new());
        let (sender, receiver) = mpsc::unbounded_channel();

        let handle = RemoteSinkHandle {
            sender,
            shared: Arc::clone(&shared),
            metrics: Arc::clone(&metrics),
        };
        let sink = Self {
            receiver,
            writer,
            shared,
            name: "remote".to_owned(),
            metrics,
        };
        (handle, sink)
    }

    /// Get a shared handle to the metrics
    pub fn metrics(&self) -> Arc<RemoteSinkMetrics> {
        Arc::clone(&self.metrics)
    }

    /// Run the sink, writing frames until every handle is dropped
    pub async fn run(mut self) -> MetricsSnapshot {
        tracing::debug!(
            sink = %self.name,
            capacity_bytes = self.shared.capacity_bytes,
            "remote sink starting"
        );

        let mut degraded = false;

        while let Some(frame) = self.receiver.recv().await {
            let size = frame.len();
            if !degraded {
                if let Err(e) = self.write_frame(&frame).await {
                    // Degrade: report once, keep draining so the producer
                    // side accounting stays live
                    self.metrics.write_errors.fetch_add(1, Ordering::Relaxed);
                    tracing::error!(
                        sink = %self.name,
                        error = %e,
                        "remote write failed, discarding further frames"
                    );
                    degraded = true;
                }
            }
            self.shared.release(size);
        }

        let snapshot = self.metrics.snapshot();
        tracing::debug!(
            sink = %self.name,
            enqueued = snapshot.records_enqueued,
            dropped = snapshot.records_dropped,
            warnings = snapshot.warnings_emitted,
            bytes = snapshot.bytes_written,
            "remote sink shutting down"
        );

        snapshot
    }

    async fn write_frame(&mut self, frame: &Bytes) -> Result<(), SinkError> {
        self.writer.write_all(frame).await?;
        self.writer.flush().await?;
        self.metrics
            .bytes_written
            .fetch_add(frame.len() as u64, Ordering::Relaxed);
        Ok(())
    }
}
