//! Logmux - Protocol
//!
//! The core data model that flows through the log multiplexing pipeline.
//!
//! # Architecture
//!
//! ```text
//! raw bytes --> LineFramer --> LogRecord --> FanoutRouter --> sinks
//!                                                  |
//!                                                  +--> RemoteLogEntry (NDJSON)
//! ```
//!
//! - [`LogRecord`] is the unit of fan-out: one reassembled log line plus the
//!   identity of the container that produced it.
//! - [`ContainerIdentity`] identifies a container instance. Equality and
//!   hashing key on the stable `id`, never on the display name.
//! - [`RemoteLogEntry`] is the newline-delimited JSON shape written to the
//!   remote channel, including the fixed overflow warning and heartbeat
//!   entries.

mod identity;
mod level;
mod record;
mod wire;

pub use identity::ContainerIdentity;
pub use level::LogLevel;
pub use record::LogRecord;
pub use wire::{RemoteLogEntry, HEARTBEAT_MESSAGE, OVERFLOW_WARNING_MESSAGE};
