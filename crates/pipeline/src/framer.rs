//! Line Framer - stateful byte-to-record reassembly
//!
//! Container runtimes deliver output as arbitrary byte chunks that do not
//! respect line boundaries. Each stream (one per container output channel)
//! owns a [`LineFramer`] that buffers the unterminated tail of the last
//! chunk and emits a [`LogRecord`] once a line terminator arrives.
//!
//! Framing is deliberately coarse: a feed whose combined content holds a
//! terminator emits *one* record covering the entire content, embedded
//! newlines included. The formatter re-splits on newline at render time, so
//! display output is identical either way while ingestion stays one
//! allocation per feed.
//!
//! A framer is single-producer state; it is owned by the session and never
//! shared across tasks.

use std::sync::Arc;

use logmux_protocol::{ContainerIdentity, LogLevel, LogRecord};

/// Redaction hook applied to each chunk before reassembly
///
/// Injected by the session owner to scrub secrets (tokens, passwords) from
/// workload output before it reaches any sink. Must be pure; it is invoked
/// on the ingestion path.
pub type Redactor = Arc<dyn Fn(&str) -> String + Send + Sync>;

/// Reassembles line-delimited records from chunked byte input
pub struct LineFramer {
    /// Fixed identity of the stream feeding this framer
    identity: Arc<ContainerIdentity>,

    /// Whether this stream is the error output channel
    is_error_output: bool,

    /// Optional per-chunk redaction hook
    redactor: Option<Redactor>,

    /// Unterminated tail of the last chunk; never contains a newline
    pending: String,
}

impl LineFramer {
    /// Create a framer for one stream
    pub fn new(identity: Arc<ContainerIdentity>, is_error_output: bool) -> Self {
        Self {
            identity,
            is_error_output,
            redactor: None,
            pending: String::new(),
        }
    }

    /// Create a framer with a redaction hook
    pub fn with_redactor(
        identity: Arc<ContainerIdentity>,
        is_error_output: bool,
        redactor: Redactor,
    ) -> Self {
        Self {
            identity,
            is_error_output,
            redactor: Some(redactor),
            pending: String::new(),
        }
    }

    /// The identity of the stream feeding this framer
    #[inline]
    pub fn identity(&self) -> &Arc<ContainerIdentity> {
        &self.identity
    }

    /// Whether unterminated content is currently buffered
    #[inline]
    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }

    /// Feed one chunk of raw bytes
    ///
    /// Undecodable bytes are replaced rather than rejected; framing never
    /// fails on malformed input. Returns a record when the combined buffered
    /// content contains at least one line terminator, with trailing
    /// whitespace trimmed.
    pub fn feed(&mut self, chunk: &[u8]) -> Option<LogRecord> {
        let text = String::from_utf8_lossy(chunk);
        let text = match &self.redactor {
            Some(redact) => redact(&text),
            None => text.into_owned(),
        };

        self.pending.push_str(&text);
        if !self.pending.contains('\n') {
            return None;
        }

        let message = self.pending.trim_end().to_owned();
        self.pending.clear();
        Some(self.record(message))
    }

    /// Flush the stream, emitting any buffered unterminated content
    pub fn close(mut self) -> Option<LogRecord> {
        if self.pending.is_empty() {
            return None;
        }
        let message = self.pending.trim_end().to_owned();
        self.pending.clear();
        Some(self.record(message))
    }

    fn record(&self, message: String) -> LogRecord {
        LogRecord::new(
            LogLevel::Info,
            message,
            Arc::clone(&self.identity),
            self.is_error_output,
        )
    }
}

impl std::fmt::Debug for LineFramer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LineFramer")
            .field("identity", &self.identity)
            .field("is_error_output", &self.is_error_output)
            .field("pending_bytes", &self.pending.len())
            .field("redacted", &self.redactor.is_some())
            .finish()
    }
}

#[cfg(test)]
#[path = "framer_test.rs"]
mod framer_test;
