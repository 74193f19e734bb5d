//! Log Session - ingress surface and sink lifecycle
//!
//! A [`LogSession`] owns everything needed to multiplex the output of a set
//! of containers: one [`LineFramer`] per stream, the [`FanoutRouter`], the
//! spawned sink tasks and the heartbeat. The producing workload pushes raw
//! chunks via [`feed`](LogSession::feed) and signals end-of-stream via
//! [`close`](LogSession::close); everything downstream is asynchronous and
//! never blocks the caller.
//!
//! # Example
//!
//! ```ignore
//! let mut session = LogSessionBuilder::new(config)
//!     .terminal_color(std::io::stdout().is_terminal())
//!     .remote(Box::new(remote_stream))
//!     .build()?;
//!
//! session.feed(&identity, b"starting server\n", false);
//! session.close(&identity);
//! session.shutdown().await;
//! ```

use std::collections::HashMap;
use std::sync::Arc;

use logmux_config::{FileLogMode, LogConfig};
use logmux_protocol::ContainerIdentity;
use logmux_sinks::console::{ConsoleConfig, ConsoleSink};
use logmux_sinks::file::{ContainerFileSink, FileSink};
use logmux_sinks::remote::{RemoteSink, RemoteSinkConfig};
use tokio::io::AsyncWrite;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::error::{PipelineError, Result};
use crate::framer::{LineFramer, Redactor};
use crate::heartbeat::HeartbeatTicker;
use crate::router::FanoutRouter;
use crate::sink_handle::SinkHandle;

/// Buffer size for local sink channels
///
/// Local sinks are assumed reliable; the buffer only has to absorb
/// scheduling jitter, not sustained imbalance.
pub const SINK_CHANNEL_SIZE: usize = 1000;

/// Writer type accepted for the remote channel
pub type RemoteWriter = Box<dyn AsyncWrite + Send + Unpin>;

/// Builder for a [`LogSession`]
pub struct LogSessionBuilder {
    config: LogConfig,
    terminal_supports_color: bool,
    redactor: Option<Redactor>,
    remote: Option<(RemoteWriter, RemoteSinkConfig)>,
}

impl LogSessionBuilder {
    /// Start building a session from its configuration
    pub fn new(config: LogConfig) -> Self {
        Self {
            config,
            terminal_supports_color: false,
            redactor: None,
            remote: None,
        }
    }

    /// Set the detected color capability of the console stream
    ///
    /// Combined with the configured color mode to decide whether console
    /// output is colored. Detection itself belongs to the binary.
    #[must_use]
    pub fn terminal_color(mut self, supported: bool) -> Self {
        self.terminal_supports_color = supported;
        self
    }

    /// Install a redaction hook applied to every chunk before framing
    #[must_use]
    pub fn redactor(mut self, redactor: Redactor) -> Self {
        self.redactor = Some(redactor);
        self
    }

    /// Attach a remote channel writing to the given stream
    #[must_use]
    pub fn remote(self, writer: RemoteWriter) -> Self {
        self.remote_with_config(writer, RemoteSinkConfig::default())
    }

    /// Attach a remote channel with a custom byte budget
    #[must_use]
    pub fn remote_with_config(mut self, writer: RemoteWriter, config: RemoteSinkConfig) -> Self {
        self.remote = Some((writer, config));
        self
    }

    /// Build the session, spawning its sink tasks
    ///
    /// Fails only on configuration or filesystem setup problems; once this
    /// returns, nothing the session does can fail outward.
    pub fn build(self) -> Result<LogSession> {
        let mut router = FanoutRouter::new();
        let mut tasks: Vec<JoinHandle<()>> = Vec::new();

        // Console sink, always present
        let color = self.config.color.color_enabled(self.terminal_supports_color);
        let (console_tx, console_rx) = mpsc::channel(SINK_CHANNEL_SIZE);
        let console_config = if color {
            ConsoleConfig::default()
        } else {
            ConsoleConfig::no_color()
        };
        let console = ConsoleSink::with_config(console_rx, console_config);
        router.register_sink(SinkHandle::new("console", console_tx));
        tasks.push(tokio::spawn(async move {
            console.run().await;
        }));

        // File sink, per configured mode
        match self.config.file {
            FileLogMode::Off => {}
            FileLogMode::File => {
                let path = &self.config.path;
                if path.as_os_str().is_empty() {
                    return Err(PipelineError::config(
                        "file logging enabled but no path configured",
                    ));
                }
                let (file_tx, file_rx) = mpsc::channel(SINK_CHANNEL_SIZE);
                let sink = FileSink::new(file_rx, path.clone());
                router.register_sink(SinkHandle::new("file", file_tx));
                tasks.push(tokio::spawn(async move {
                    sink.run().await;
                }));
            }
            FileLogMode::Container => {
                let dir = &self.config.path;
                if dir.as_os_str().is_empty() {
                    return Err(PipelineError::config(
                        "container file logging enabled but no directory configured",
                    ));
                }
                std::fs::create_dir_all(dir)?;
                let (file_tx, file_rx) = mpsc::channel(SINK_CHANNEL_SIZE);
                let sink = ContainerFileSink::new(file_rx, dir.clone());
                router.register_sink(SinkHandle::new("container-files", file_tx));
                tasks.push(tokio::spawn(async move {
                    sink.run().await;
                }));
            }
        }

        // Remote channel with its heartbeat
        let mut heartbeat = None;
        if let Some((writer, remote_config)) = self.remote {
            let (handle, sink) = RemoteSink::channel_with_config(writer, remote_config);
            router.set_remote(handle.clone());
            heartbeat = Some(HeartbeatTicker::start(handle));
            tasks.push(tokio::spawn(async move {
                sink.run().await;
            }));
        }

        tracing::debug!(
            sinks = router.sink_count(),
            remote = router.has_remote(),
            color,
            file_mode = ?self.config.file,
            "log session started"
        );

        Ok(LogSession {
            router,
            framers: HashMap::new(),
            redactor: self.redactor,
            heartbeat,
            tasks,
        })
    }
}

/// One framer per stream: a container identity plus its output channel
type StreamKey = (String, bool);

/// A running multiplexing session
///
/// Push-based: the caller feeds chunks and closes streams; the session
/// frames, routes and lets the sink tasks do the writing. Dropping the
/// session without [`shutdown`](Self::shutdown) aborts the heartbeat but
/// leaves buffered tails unflushed.
pub struct LogSession {
    /// Fan-out router; `feed` calls into it synchronously
    router: FanoutRouter,

    /// Per-stream framer state, created on first feed
    framers: HashMap<StreamKey, LineFramer>,

    /// Redaction hook handed to every new framer
    redactor: Option<Redactor>,

    /// Keep-alive ticker, present when a remote channel is attached
    heartbeat: Option<HeartbeatTicker>,

    /// Spawned sink tasks, awaited on shutdown
    tasks: Vec<JoinHandle<()>>,
}

impl LogSession {
    /// Feed one chunk of raw output for a container stream
    ///
    /// `is_error_output` selects the stream: a container's regular and
    /// error channels frame independently.
    pub fn feed(&mut self, identity: &Arc<ContainerIdentity>, chunk: &[u8], is_error_output: bool) {
        let key = (identity.id().to_owned(), is_error_output);
        let framer = self.framers.entry(key).or_insert_with(|| {
            match &self.redactor {
                Some(redactor) => LineFramer::with_redactor(
                    Arc::clone(identity),
                    is_error_output,
                    Arc::clone(redactor),
                ),
                None => LineFramer::new(Arc::clone(identity), is_error_output),
            }
        });

        if let Some(record) = framer.feed(chunk) {
            self.router.route(record);
        }
    }

    /// Close both streams of a container, flushing buffered tails
    pub fn close(&mut self, identity: &ContainerIdentity) {
        for is_error_output in [false, true] {
            let key = (identity.id().to_owned(), is_error_output);
            if let Some(framer) = self.framers.remove(&key) {
                if let Some(record) = framer.close() {
                    self.router.route(record);
                }
            }
        }
    }

    /// Number of streams with live framer state
    pub fn open_streams(&self) -> usize {
        self.framers.len()
    }

    /// Get a shared handle to the router metrics
    pub fn metrics(&self) -> Arc<crate::metrics::RouterMetrics> {
        self.router.metrics()
    }

    /// Shut the session down, flushing all remaining streams
    ///
    /// Closes every framer, stops the heartbeat, closes the sink channels
    /// and waits for the sink tasks to drain.
    pub async fn shutdown(mut self) {
        let framers = std::mem::take(&mut self.framers);
        for (_, framer) in framers {
            if let Some(record) = framer.close() {
                self.router.route(record);
            }
        }

        if let Some(heartbeat) = self.heartbeat.take() {
            heartbeat.stop();
        }

        let snapshot = self.router.metrics().snapshot();
        tracing::debug!(
            records_received = snapshot.records_received,
            records_routed = snapshot.records_routed,
            records_dropped = snapshot.records_dropped,
            "log session shutting down"
        );

        // Dropping the router drops every sink sender; tasks drain and exit
        drop(self.router);
        for task in self.tasks {
            if let Err(e) = task.await {
                tracing::warn!(error = %e, "sink task ended abnormally");
            }
        }
    }
}

impl std::fmt::Debug for LogSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LogSession")
            .field("open_streams", &self.framers.len())
            .field("sinks", &self.router.sink_count())
            .field("remote", &self.router.has_remote())
            .finish()
    }
}

#[cfg(test)]
#[path = "session_test.rs"]
mod session_test;
