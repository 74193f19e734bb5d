//! Logmux - Pipeline
//!
//! Line framing, fan-out routing and session lifecycle for the log
//! multiplexer.
//!
//! # Architecture
//!
//! ```text
//! [Streams]                  [Session]                       [Sinks]
//!   api/out ──┐                                          ┌──→ Console
//!   api/err ──┼──→ LineFramer ──→ FanoutRouter ──Arc──→──┼──→ File(s)
//!   worker ───┘        │                                 └──→ Remote (bounded)
//!                  (redaction)                                  ↑
//!                                           HeartbeatTicker ───┘
//! ```
//!
//! # Key Design
//!
//! - **Push ingress**: the workload calls `feed`/`close`; nothing here
//!   blocks or fails back into it
//! - **Arc fan-out**: each record is wrapped once and shared by every sink
//! - **Per-sink isolation**: local sinks get bounded channels with
//!   `try_send`; the remote channel applies its own byte budget and is the
//!   only component that signals loss
//! - **Explicit lifecycle**: the session owns the framers, the sink tasks
//!   and the heartbeat, and tears all of them down on `shutdown`

mod error;
mod framer;
mod heartbeat;
mod metrics;
mod router;
mod session;
mod sink_handle;

pub use error::{PipelineError, Result};
pub use framer::{LineFramer, Redactor};
pub use heartbeat::{HeartbeatTicker, HEARTBEAT_INTERVAL};
pub use metrics::{DropTracker, MetricsSnapshot, RouterMetrics};
pub use router::FanoutRouter;
pub use session::{LogSession, LogSessionBuilder, RemoteWriter, SINK_CHANNEL_SIZE};
pub use sink_handle::SinkHandle;

// Re-export key types from dependencies for convenience
pub use logmux_config::{ColorMode, FileLogMode, LogConfig};
pub use logmux_protocol::{ContainerIdentity, LogLevel, LogRecord};
