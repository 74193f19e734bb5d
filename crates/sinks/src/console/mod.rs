//! Console Sink - labeled, optionally colored lines on stdout
//!
//! The human-facing view of the multiplexed streams. Each record is
//! rendered by [`RecordFormatter`] with the identity's stable color and
//! printed to stdout.
//!
//! # Example Output
//!
//! ```text
//! api                  | starting server on :8080
//! worker               | job 42 queued
//! api                  | listening
//! ```

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use logmux_protocol::LogRecord;
use tokio::sync::mpsc;

use crate::format::RecordFormatter;

/// Configuration for the console sink
#[derive(Debug, Clone)]
pub struct ConsoleConfig {
    /// Enable colored output
    pub color: bool,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self { color: true }
    }
}

impl ConsoleConfig {
    /// Create config with colors disabled (for piped output)
    pub fn no_color() -> Self {
        Self { color: false }
    }
}

/// Metrics for the console sink
#[derive(Debug, Default)]
pub struct ConsoleSinkMetrics {
    records_received: AtomicU64,
    lines_written: AtomicU64,
}

impl ConsoleSinkMetrics {
    /// Create new metrics instance
    #[inline]
    pub const fn new() -> Self {
        Self {
            records_received: AtomicU64::new(0),
            lines_written: AtomicU64::new(0),
        }
    }

    #[inline]
    fn record(&self, line_count: u64) {
        self.records_received.fetch_add(1, Ordering::Relaxed);
        self.lines_written.fetch_add(line_count, Ordering::Relaxed);
    }

    /// Get a snapshot of the counters
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            records_received: self.records_received.load(Ordering::Relaxed),
            lines_written: self.lines_written.load(Ordering::Relaxed),
        }
    }
}

/// Point-in-time snapshot of console sink metrics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub records_received: u64,
    pub lines_written: u64,
}

/// Console sink task
pub struct ConsoleSink {
    /// Channel receiver for records
    receiver: mpsc::Receiver<Arc<LogRecord>>,

    /// Configuration
    config: ConsoleConfig,

    /// Formatter owning the color table
    formatter: RecordFormatter,

    /// Sink name for logging
    name: String,

    /// Metrics (Arc for sharing after `run()` consumes the sink)
    metrics: Arc<ConsoleSinkMetrics>,
}

impl ConsoleSink {
    /// Create a new console sink with default config
    pub fn new(receiver: mpsc::Receiver<Arc<LogRecord>>) -> Self {
        Self::with_config(receiver, ConsoleConfig::default())
    }

    /// Create a new console sink with custom config
    pub fn with_config(receiver: mpsc::Receiver<Arc<LogRecord>>, config: ConsoleConfig) -> Self {
        Self {
            receiver,
            config,
            formatter: RecordFormatter::new(),
            name: "console".to_owned(),
            metrics: Arc::new(ConsoleSinkMetrics::new()),
        }
    }

    /// Get a shared handle to the metrics
    pub fn metrics(&self) -> Arc<ConsoleSinkMetrics> {
        Arc::clone(&self.metrics)
    }

    /// Get the sink name
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Run the sink, printing records until the channel closes
    pub async fn run(mut self) -> MetricsSnapshot {
        tracing::debug!(sink = %self.name, color = self.config.color, "console sink starting");

        while let Some(record) = self.receiver.recv().await {
            let text = self.formatter.format(&record, self.config.color);
            self.metrics.record(text.lines().count() as u64);
            println!("{text}");
        }

        let snapshot = self.metrics.snapshot();
        tracing::debug!(
            sink = %self.name,
            records = snapshot.records_received,
            lines = snapshot.lines_written,
            "console sink shutting down"
        );

        snapshot
    }
}
