//! Logmux - Sinks
//!
//! Output sinks for the log multiplexing pipeline. Each sink receives
//! `Arc<LogRecord>` instances via a tokio channel and writes to its
//! destination independently, so a stalled destination never blocks the
//! producing workload or sibling sinks.
//!
//! ```text
//! [Router] --Arc<LogRecord>--> [Sink Channel] --> [Sink Task] --> [Destination]
//! ```
//!
//! # Available Sinks
//!
//! | Sink | Destination | Bounded |
//! |------|-------------|---------|
//! | `console` | stdout, labeled + colored | queue only |
//! | `file` | one shared file, labeled | queue only |
//! | `container file` | one file per identity, raw | queue only |
//! | `remote` | NDJSON to a provided writer | 25 MiB byte budget, drops + warns |
//!
//! Only the remote sink signals loss in-band; console and file sinks are
//! treated as reliable local destinations.

// =============================================================================
// Sink implementations (each in its own submodule)
// =============================================================================

/// Console sink - labeled, optionally colored lines on stdout
pub mod console;

/// File sinks - shared file and per-container files
pub mod file;

/// Remote sink - byte-bounded NDJSON channel with single loss warning
pub mod remote;

// =============================================================================
// Shared utilities
// =============================================================================

/// Record formatting: identity labels, multi-line expansion, colors
pub mod format;

/// Stable identity-to-color assignment
pub mod color;

/// Common types shared by all sinks (errors, rate-limited logging)
mod common;

// =============================================================================
// Public re-exports
// =============================================================================

pub use common::{RateLimitedLogger, SinkError};

pub use color::{error_style, ColorAssigner, ContainerColor, PALETTE};
pub use console::{ConsoleConfig, ConsoleSink};
pub use file::{ContainerFileSink, FileSink};
pub use format::{RecordFormatter, MAX_NAME_LENGTH};
pub use remote::{
    RemoteSink, RemoteSinkConfig, RemoteSinkHandle, RemoteSinkMetrics, DEFAULT_CAPACITY_BYTES,
};
