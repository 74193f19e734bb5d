//! Fan-out Router - one framed record to every registered sink
//!
//! The router takes records emitted by the framers and delivers each one to
//! every registered sink plus the optional remote channel. Sinks are
//! isolated from each other: a full or closed channel costs that sink the
//! record and nothing else.

use std::sync::Arc;

use logmux_protocol::LogRecord;
use logmux_sinks::remote::RemoteSinkHandle;
use tokio::sync::mpsc;

use crate::metrics::{DropTracker, RouterMetrics};
use crate::sink_handle::SinkHandle;

/// Fan-out router connecting framers to sinks
///
/// # Design
///
/// - Wraps each record in `Arc` once for zero-copy fan-out
/// - Local sinks use `try_send`; a full channel drops the record for that
///   sink only (drops are aggregated into one log line per second)
/// - The remote channel applies its own byte budget; an offer rejected on
///   overflow counts as a failed send here, while the loss warning stays
///   the sink's responsibility
/// - `route` is synchronous; the producing workload never awaits sink I/O
pub struct FanoutRouter {
    /// Registered local sink handles
    sinks: Vec<SinkHandle>,

    /// Optional remote channel
    remote: Option<RemoteSinkHandle>,

    /// Router metrics (Arc for sharing with a metrics handle)
    metrics: Arc<RouterMetrics>,

    /// Rate-limited logging for local sink drops
    drop_tracker: DropTracker,
}

impl FanoutRouter {
    /// Create an empty router
    pub fn new() -> Self {
        Self {
            sinks: Vec::new(),
            remote: None,
            metrics: Arc::new(RouterMetrics::new()),
            drop_tracker: DropTracker::new(),
        }
    }

    /// Register a local sink
    pub fn register_sink(&mut self, handle: SinkHandle) {
        tracing::debug!(sink = %handle.name(), "registered sink with router");
        self.sinks.push(handle);
    }

    /// Attach the remote channel
    pub fn set_remote(&mut self, remote: RemoteSinkHandle) {
        tracing::debug!("remote channel attached to router");
        self.remote = Some(remote);
    }

    /// Get the number of registered local sinks
    pub fn sink_count(&self) -> usize {
        self.sinks.len()
    }

    /// Check if a remote channel is attached
    #[inline]
    pub fn has_remote(&self) -> bool {
        self.remote.is_some()
    }

    /// Get a shared handle to the metrics
    pub fn metrics(&self) -> Arc<RouterMetrics> {
        Arc::clone(&self.metrics)
    }

    /// Route one record to every sink
    ///
    /// Returns the number of destinations that accepted the record.
    pub fn route(&self, record: LogRecord) -> usize {
        self.metrics.record_received();

        let record = Arc::new(record);
        let mut success_count = 0;

        for handle in &self.sinks {
            if handle.is_closed() {
                tracing::warn!(sink = %handle.name(), "sink channel closed, skipping");
                self.metrics.record_sink_send_failed();
                continue;
            }

            match handle.try_send(Arc::clone(&record)) {
                Ok(()) => {
                    self.metrics.record_sink_send_success();
                    success_count += 1;
                }
                Err(_) => {
                    self.metrics.record_backpressure();
                    self.metrics.record_sink_send_failed();
                    self.drop_tracker.record_drop();

                    tracing::debug!(
                        sink = %handle.name(),
                        capacity = handle.capacity(),
                        "sink channel full, record dropped for this sink"
                    );
                }
            }
        }

        // Remote overflow accounting lives in the sink; the router only
        // mirrors whether this record made it into the queue
        if let Some(remote) = &self.remote {
            if remote.offer(&record) {
                self.metrics.record_sink_send_success();
                success_count += 1;
            } else {
                self.metrics.record_sink_send_failed();
            }
        }

        if success_count > 0 {
            self.metrics.record_routed();
        } else {
            self.metrics.record_dropped();
            tracing::warn!(
                container = %record.identity(),
                sinks = self.sinks.len(),
                "record dropped: no sink accepted it"
            );
        }

        success_count
    }

    /// Run the router, draining records from a channel
    ///
    /// Consumes the router and runs until the input channel closes. Useful
    /// when framing happens on a different task than routing; sessions that
    /// frame and route on the same task call [`route`](Self::route)
    /// directly.
    pub async fn run(self, mut receiver: mpsc::Receiver<LogRecord>) {
        tracing::debug!(
            sinks = self.sink_count(),
            remote = self.has_remote(),
            "router starting"
        );

        while let Some(record) = receiver.recv().await {
            self.route(record);
        }

        let snapshot = self.metrics.snapshot();
        tracing::debug!(
            records_received = snapshot.records_received,
            records_routed = snapshot.records_routed,
            records_dropped = snapshot.records_dropped,
            sink_sends_failed = snapshot.sink_sends_failed,
            backpressure_events = snapshot.backpressure_events,
            "router shutting down"
        );
    }
}

impl Default for FanoutRouter {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for FanoutRouter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FanoutRouter")
            .field("sinks", &self.sinks.len())
            .field("remote", &self.remote.is_some())
            .finish()
    }
}

#[cfg(test)]
#[path = "router_test.rs"]
mod router_test;
