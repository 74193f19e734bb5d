//! Router metrics
//!
//! Atomic counters for the fan-out hot path. All operations use relaxed
//! ordering; values are eventually consistent, not real-time.

use std::sync::atomic::{AtomicU64, Ordering};

/// Metrics for the fan-out router
///
/// Safe to share across tasks; reads may be slightly stale.
#[derive(Debug, Default)]
pub struct RouterMetrics {
    /// Records received from framers
    records_received: AtomicU64,

    /// Records delivered to at least one sink
    records_routed: AtomicU64,

    /// Records delivered to no sink at all
    records_dropped: AtomicU64,

    /// Individual sink sends that succeeded
    sink_sends_success: AtomicU64,

    /// Individual sink sends that failed (backpressure or closed)
    sink_sends_failed: AtomicU64,

    /// Times a sink channel was full
    backpressure_events: AtomicU64,
}

impl RouterMetrics {
    /// Create new metrics instance with all counters at zero
    #[inline]
    pub const fn new() -> Self {
        Self {
            records_received: AtomicU64::new(0),
            records_routed: AtomicU64::new(0),
            records_dropped: AtomicU64::new(0),
            sink_sends_success: AtomicU64::new(0),
            sink_sends_failed: AtomicU64::new(0),
            backpressure_events: AtomicU64::new(0),
        }
    }

    /// Record a record entering the router
    #[inline]
    pub fn record_received(&self) {
        self.records_received.fetch_add(1, Ordering::Relaxed);
    }

    /// Record delivery to at least one sink
    #[inline]
    pub fn record_routed(&self) {
        self.records_routed.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a record no sink accepted
    #[inline]
    pub fn record_dropped(&self) {
        self.records_dropped.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a successful send to a sink
    #[inline]
    pub fn record_sink_send_success(&self) {
        self.sink_sends_success.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a failed send to a sink
    #[inline]
    pub fn record_sink_send_failed(&self) {
        self.sink_sends_failed.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a backpressure event (sink channel full)
    #[inline]
    pub fn record_backpressure(&self) {
        self.backpressure_events.fetch_add(1, Ordering::Relaxed);
    }

    /// Get a snapshot of all counters
    #[inline]
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            records_received: self.records_received.load(Ordering::Relaxed),
            records_routed: self.records_routed.load(Ordering::Relaxed),
            records_dropped: self.records_dropped.load(Ordering::Relaxed),
            sink_sends_success: self.sink_sends_success.load(Ordering::Relaxed),
            sink_sends_failed: self.sink_sends_failed.load(Ordering::Relaxed),
            backpressure_events: self.backpressure_events.load(Ordering::Relaxed),
        }
    }
}

/// Point-in-time snapshot of router metrics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MetricsSnapshot {
    /// Records received from framers
    pub records_received: u64,
    /// Records delivered to at least one sink
    pub records_routed: u64,
    /// Records delivered to no sink
    pub records_dropped: u64,
    /// Successful sink sends
    pub sink_sends_success: u64,
    /// Failed sink sends
    pub sink_sends_failed: u64,
    /// Backpressure events
    pub backpressure_events: u64,
}

impl MetricsSnapshot {
    /// Sink send success rate (0.0 - 1.0), None before any sends
    #[inline]
    pub fn sink_success_rate(&self) -> Option<f64> {
        let total = self.sink_sends_success + self.sink_sends_failed;
        if total == 0 {
            None
        } else {
            Some(self.sink_sends_success as f64 / total as f64)
        }
    }
}

// ============================================================================
// Drop Tracker - rate-limited backpressure logging
// ============================================================================

/// Log interval in milliseconds
const LOG_INTERVAL_MS: u64 = 1000;
/// Drops per interval that escalate the log to ERROR level
const CRITICAL_DROP_THRESHOLD: u64 = 100;

/// Aggregates local sink drop events and logs a summary once per second
///
/// Per-event logging would flood the console the moment a sink falls
/// behind, which is exactly when console output matters most.
pub struct DropTracker {
    /// Drops in the current interval
    interval_drops: AtomicU64,
    /// Last log time (epoch milliseconds)
    last_log_ms: AtomicU64,
}

impl DropTracker {
    /// Create a new tracker
    pub fn new() -> Self {
        Self {
            interval_drops: AtomicU64::new(0),
            last_log_ms: AtomicU64::new(Self::now_ms()),
        }
    }

    /// Record a drop event; returns true if a summary log was emitted
    pub fn record_drop(&self) -> bool {
        self.interval_drops.fetch_add(1, Ordering::Relaxed);
        self.maybe_log()
    }

    fn maybe_log(&self) -> bool {
        let now = Self::now_ms();
        let last = self.last_log_ms.load(Ordering::Relaxed);

        if now.saturating_sub(last) < LOG_INTERVAL_MS {
            return false;
        }

        // Claim the log slot so concurrent callers emit once
        if self
            .last_log_ms
            .compare_exchange(last, now, Ordering::SeqCst, Ordering::Relaxed)
            .is_err()
        {
            return false;
        }

        let drops = self.interval_drops.swap(0, Ordering::Relaxed);
        if drops == 0 {
            return false;
        }

        if drops > CRITICAL_DROP_THRESHOLD {
            tracing::error!(
                dropped_records = drops,
                threshold = CRITICAL_DROP_THRESHOLD,
                "high backpressure: local sinks cannot keep up"
            );
        } else {
            tracing::warn!(
                dropped_records = drops,
                "backpressure: records dropped in last second"
            );
        }

        true
    }

    #[inline]
    fn now_ms() -> u64 {
        use std::time::{SystemTime, UNIX_EPOCH};
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0)
    }

    /// Get the current drop count (for testing)
    #[cfg(test)]
    pub fn current_drops(&self) -> u64 {
        self.interval_drops.load(Ordering::Relaxed)
    }
}

impl Default for DropTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for DropTracker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DropTracker")
            .field(
                "interval_drops",
                &self.interval_drops.load(Ordering::Relaxed),
            )
            .finish()
    }
}
