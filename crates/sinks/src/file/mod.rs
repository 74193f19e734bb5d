//! File Sinks - durable local log storage
//!
//! Two variants, selected by the session's file-logging mode:
//!
//! - [`FileSink`]: one shared file; records from every container are
//!   interleaved and carry the same label prefix as the console.
//! - [`ContainerFileSink`]: one file per container identity, created
//!   lazily on first sight; lines are written raw without a label since
//!   the file name already identifies the container.
//!
//! Write failures degrade the sink: the error is logged (rate-limited) and
//! the sink keeps draining its channel so the router and sibling sinks are
//! unaffected.

use std::collections::HashMap;
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use logmux_protocol::{ContainerIdentity, LogRecord};
use tokio::sync::mpsc;

use crate::common::RateLimitedLogger;
use crate::format::RecordFormatter;

/// Width of the zero-padded sequence number in per-container file names
const FILE_INDEX_WIDTH: usize = 3;

/// Metrics shared by both file sink variants
#[derive(Debug, Default)]
pub struct FileSinkMetrics {
    records_received: AtomicU64,
    records_written: AtomicU64,
    bytes_written: AtomicU64,
    write_errors: AtomicU64,
}

impl FileSinkMetrics {
    /// Create new metrics instance
    #[inline]
    pub const fn new() -> Self {
        Self {
            records_received: AtomicU64::new(0),
            records_written: AtomicU64::new(0),
            bytes_written: AtomicU64::new(0),
            write_errors: AtomicU64::new(0),
        }
    }

    #[inline]
    fn record_received(&self) {
        self.records_received.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    fn record_written(&self, bytes: u64) {
        self.records_written.fetch_add(1, Ordering::Relaxed);
        self.bytes_written.fetch_add(bytes, Ordering::Relaxed);
    }

    #[inline]
    fn record_error(&self) {
        self.write_errors.fetch_add(1, Ordering::Relaxed);
    }

    /// Get a snapshot of the counters
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            records_received: self.records_received.load(Ordering::Relaxed),
            records_written: self.records_written.load(Ordering::Relaxed),
            bytes_written: self.bytes_written.load(Ordering::Relaxed),
            write_errors: self.write_errors.load(Ordering::Relaxed),
        }
    }
}

/// Point-in-time snapshot of file sink metrics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub records_received: u64,
    pub records_written: u64,
    pub bytes_written: u64,
    pub write_errors: u64,
}

// =============================================================================
// Shared file sink
// =============================================================================

/// Sink writing every record to one shared file, labeled and interleaved
pub struct FileSink {
    /// Channel receiver for records
    receiver: mpsc::Receiver<Arc<LogRecord>>,

    /// Output file path
    path: PathBuf,

    /// Formatter for the label prefix (colors never enabled here)
    formatter: RecordFormatter,

    /// Sink name for logging
    name: String,

    /// Metrics (Arc for sharing after `run()` consumes the sink)
    metrics: Arc<FileSinkMetrics>,

    /// Rate-limited error logging for degraded operation
    error_log: RateLimitedLogger,
}

impl FileSink {
    /// Create a new shared-file sink
    pub fn new(receiver: mpsc::Receiver<Arc<LogRecord>>, path: impl Into<PathBuf>) -> Self {
        Self {
            receiver,
            path: path.into(),
            formatter: RecordFormatter::new(),
            name: "file".to_owned(),
            metrics: Arc::new(FileSinkMetrics::new()),
            error_log: RateLimitedLogger::default_interval(),
        }
    }

    /// Get a shared handle to the metrics
    pub fn metrics(&self) -> Arc<FileSinkMetrics> {
        Arc::clone(&self.metrics)
    }

    /// Run the sink, appending records until the channel closes
    pub async fn run(mut self) -> MetricsSnapshot {
        tracing::debug!(sink = %self.name, path = %self.path.display(), "file sink starting");

        let mut writer = match open_append(&self.path) {
            Ok(w) => Some(w),
            Err(e) => {
                self.error_log.error(&self.name, "failed to open log file", &e);
                None
            }
        };

        while let Some(record) = self.receiver.recv().await {
            self.metrics.record_received();
            let Some(w) = writer.as_mut() else {
                self.metrics.record_error();
                continue;
            };

            let text = self.formatter.format(&record, false);
            if let Err(e) = writeln!(w, "{text}").and_then(|_| w.flush()) {
                self.metrics.record_error();
                self.error_log.error(&self.name, "log file write failed", &e);
                // Degrade: stop writing, keep draining
                writer = None;
                continue;
            }
            self.metrics.record_written(text.len() as u64 + 1);
        }

        let snapshot = self.metrics.snapshot();
        tracing::debug!(
            sink = %self.name,
            records = snapshot.records_written,
            bytes = snapshot.bytes_written,
            errors = snapshot.write_errors,
            "file sink shutting down"
        );

        snapshot
    }
}

// =============================================================================
// Per-container file sink
// =============================================================================

/// One container's output file and its (possibly degraded) writer
struct ContainerFile {
    /// Path allocated on first sight; stable for the sink's lifetime
    path: PathBuf,

    /// Open writer; None while degraded, reopened on the next record
    writer: Option<BufWriter<File>>,
}

/// Sink writing each container's records to its own file
///
/// Files are created lazily on the first record for an identity and named
/// with a monotonically increasing zero-padded sequence number plus the
/// identity's qualified name, e.g. `001_deploy-api-0.log`. The id-to-file
/// association persists for the sink's lifetime: a failed writer is
/// reopened on the same path, never renumbered.
pub struct ContainerFileSink {
    /// Channel receiver for records
    receiver: mpsc::Receiver<Arc<LogRecord>>,

    /// Directory holding the per-container files
    dir: PathBuf,

    /// Per-container files keyed by identity id
    files: HashMap<String, ContainerFile>,

    /// Next file sequence number
    next_index: u32,

    /// Sink name for logging
    name: String,

    /// Metrics (Arc for sharing after `run()` consumes the sink)
    metrics: Arc<FileSinkMetrics>,

    /// Rate-limited error logging for degraded operation
    error_log: RateLimitedLogger,
}

impl ContainerFileSink {
    /// Create a new per-container file sink
    pub fn new(receiver: mpsc::Receiver<Arc<LogRecord>>, dir: impl Into<PathBuf>) -> Self {
        Self {
            receiver,
            dir: dir.into(),
            files: HashMap::new(),
            next_index: 1,
            name: "container-files".to_owned(),
            metrics: Arc::new(FileSinkMetrics::new()),
            error_log: RateLimitedLogger::default_interval(),
        }
    }

    /// Get a shared handle to the metrics
    pub fn metrics(&self) -> Arc<FileSinkMetrics> {
        Arc::clone(&self.metrics)
    }

    /// File name for the next identity to appear
    fn next_file_name(&self, identity: &ContainerIdentity) -> String {
        format!(
            "{:0width$}_{}.log",
            self.next_index,
            identity.qualified_name(),
            width = FILE_INDEX_WIDTH
        )
    }

    /// Run the sink, appending records until the channel closes
    pub async fn run(mut self) -> MetricsSnapshot {
        tracing::debug!(sink = %self.name, dir = %self.dir.display(), "container file sink starting");

        while let Some(record) = self.receiver.recv().await {
            self.metrics.record_received();
            self.write_record(&record);
        }

        let snapshot = self.metrics.snapshot();
        tracing::debug!(
            sink = %self.name,
            files = self.files.len(),
            records = snapshot.records_written,
            errors = snapshot.write_errors,
            "container file sink shutting down"
        );

        snapshot
    }

    fn write_record(&mut self, record: &LogRecord) {
        let id = record.identity().id();

        if !self.files.contains_key(id) {
            let file_name = self.next_file_name(record.identity());
            tracing::debug!(
                sink = %self.name,
                container = %record.identity(),
                file = %file_name,
                "allocated container log file"
            );
            self.files.insert(
                id.to_owned(),
                ContainerFile {
                    path: self.dir.join(file_name),
                    writer: None,
                },
            );
            self.next_index += 1;
        }

        let Some(entry) = self.files.get_mut(id) else {
            return;
        };

        if entry.writer.is_none() {
            match open_append(&entry.path) {
                Ok(w) => entry.writer = Some(w),
                Err(e) => {
                    self.metrics.record_error();
                    self.error_log
                        .error(&self.name, "failed to open container log file", &e);
                    return;
                }
            }
        }
        let Some(w) = entry.writer.as_mut() else {
            return;
        };

        // Unlabeled: the file name already identifies the container
        if let Err(e) = writeln!(w, "{}", record.message()).and_then(|_| w.flush()) {
            self.metrics.record_error();
            self.error_log.error(&self.name, "container log write failed", &e);
            // Degrade the writer only; the path stays bound to this identity
            entry.writer = None;
            return;
        }
        self.metrics.record_written(record.message().len() as u64 + 1);
    }
}

/// Open a file for appending, creating parent directories as needed
fn open_append(path: &Path) -> std::io::Result<BufWriter<File>> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    let file = OpenOptions::new().create(true).append(true).open(path)?;
    Ok(BufWriter::new(file))
}

#[cfg(test)]
#[path = "file_test.rs"]
mod file_test;
