//! Log intake and asynchronous dispatch
//!
//! The router is the single entry point callers log through. It mirrors every
//! event to the console subscriber, filters DEBUG off the persistence path,
//! and hands accepted records to one background worker over an unbounded
//! channel so the calling thread never blocks on file I/O. There is no queue
//! bound and no cancellation: a dispatched record either reaches the sink or
//! is silently dropped when the sink fails.

use std::sync::atomic::{AtomicBool, Ordering};

use anyhow::Result;
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use super::policy::RollingPolicy;
use super::record::{LogLevel, LogRecord};
use super::sink::{RecordSink, RollingFileSink};
use crate::config::LogConfig;
use crate::storage::StorageEnvironment;

/// Information about the current log file
#[derive(Debug, Clone)]
pub struct LogFileInfo {
    /// Full path to the active log file
    pub path: std::path::PathBuf,
}

/// Routes intake calls to a background sink worker
pub struct LogRouter {
    tx: mpsc::UnboundedSender<LogRecord>,
}

impl LogRouter {
    /// Spawn the dispatch worker for a sink
    ///
    /// All writes are serialized on the spawned task, which is the sole owner
    /// of the sink. Must be called from within a Tokio runtime.
    pub fn spawn<S>(mut sink: S) -> Self
    where
        S: RecordSink + Send + 'static,
    {
        let (tx, mut rx) = mpsc::unbounded_channel::<LogRecord>();
        tokio::spawn(async move {
            while let Some(record) = rx.recv().await {
                sink.write(&record);
            }
        });
        Self { tx }
    }

    /// Submit a log event
    ///
    /// Never blocks and never fails. DEBUG events are surfaced on the console
    /// only; INFO and above are also dispatched to the log file.
    pub fn log_event(&self, level: LogLevel, tag: &str, message: &str) {
        self.dispatch(level, format!("{tag}: {message}"));
    }

    /// Submit a log event carrying an error
    ///
    /// The error chain is appended to the message; it is not rendered as a
    /// separate cell.
    pub fn log_event_with_error(
        &self,
        level: LogLevel,
        tag: &str,
        message: &str,
        error: &anyhow::Error,
    ) {
        self.dispatch(level, format!("{tag}: {message}: {error:#}"));
    }

    fn dispatch(&self, level: LogLevel, message: String) {
        // Console side channel sees everything, including DEBUG
        match level {
            LogLevel::Debug => debug!("{message}"),
            LogLevel::Info => info!("{message}"),
            LogLevel::Warn => warn!("{message}"),
            LogLevel::Error => error!("{message}"),
        }

        // Debug records are never persisted to the support file
        if level == LogLevel::Debug {
            return;
        }

        // A closed channel means the worker is gone; the caller still must
        // not observe a failure
        let _ = self.tx.send(LogRecord::new(level, message));
    }
}

/// Set when the process-wide file logging pipeline has been configured
static FILE_LOGGING_CONFIGURED: AtomicBool = AtomicBool::new(false);

/// Configure the process-wide file logging pipeline
///
/// Resolves the log directory, spawns the rolling file sink worker, and
/// returns the router plus the restart-stable path of the active log file.
/// Only the first call per process succeeds; later calls fail without
/// touching storage. Must be called from within a Tokio runtime.
pub fn init_file_logging(
    environment: &StorageEnvironment,
    config: &LogConfig,
) -> Result<(LogRouter, LogFileInfo)> {
    if FILE_LOGGING_CONFIGURED
        .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
        .is_err()
    {
        anyhow::bail!("file logging is already configured for this process");
    }

    let dir = environment.resolve_log_dir()?;
    let sink = RollingFileSink::new(
        dir,
        config.device_name.clone(),
        RollingPolicy::from_config(config),
    );
    let info = LogFileInfo {
        path: sink.latest_path(),
    };
    let router = LogRouter::spawn(sink);
    Ok((router, info))
}
