//! Logmux - Config
//!
//! Configuration consumed by the session builder when it resolves the sink
//! set. Deserializable from TOML:
//!
//! ```toml
//! [logs]
//! level = "info"
//! file = "container"
//! path = "logs"
//! color = "auto"
//! ```
//!
//! The surrounding engine owns flag parsing and logger initialization; this
//! crate only defines the shapes it hands to the log multiplexer.

mod logging;

pub use logging::{ColorMode, FileLogMode, LogConfig};
