//! Heartbeat Ticker - periodic keep-alive on the remote channel
//!
//! Long-running workloads can go minutes without output; the remote
//! consumer treats a silent channel as a dead one. The ticker writes a
//! `silly`-level keep-alive entry immediately on start and then once per
//! interval, independent of record traffic, until the owning session stops
//! it.

use std::time::Duration;

use logmux_protocol::RemoteLogEntry;
use logmux_sinks::remote::RemoteSinkHandle;
use tokio::task::JoinHandle;

/// Interval between keep-alive entries
pub const HEARTBEAT_INTERVAL: Duration = Duration::from_secs(60);

/// Cancellable recurring keep-alive task
///
/// Owned by the session; dropping the ticker aborts the timer task so a
/// torn-down session never leaks its timer.
#[derive(Debug)]
pub struct HeartbeatTicker {
    task: JoinHandle<()>,
}

impl HeartbeatTicker {
    /// Start ticking into the given remote channel
    ///
    /// The first keep-alive is offered immediately, before any interval
    /// elapses.
    pub fn start(remote: RemoteSinkHandle) -> Self {
        Self::with_interval(remote, HEARTBEAT_INTERVAL)
    }

    /// Start with a custom interval
    pub fn with_interval(remote: RemoteSinkHandle, interval: Duration) -> Self {
        let task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            loop {
                // First tick completes immediately
                ticker.tick().await;
                remote.offer_entry(&RemoteLogEntry::heartbeat());
            }
        });

        tracing::debug!(interval_secs = interval.as_secs(), "heartbeat started");
        Self { task }
    }

    /// Stop the ticker
    pub fn stop(self) {
        self.task.abort();
        tracing::debug!("heartbeat stopped");
    }
}

impl Drop for HeartbeatTicker {
    fn drop(&mut self) {
        self.task.abort();
    }
}

#[cfg(test)]
#[path = "heartbeat_test.rs"]
mod heartbeat_test;
