//! Rolling HTML file sink
//!
//! Owns the open log file and its rotation bookkeeping. Every write first
//! consults the rolling policy, rotating the file when a trigger fires, then
//! appends one rendered row. All failures are reported to a diagnostics side
//! channel and swallowed; the next write retries open and rotation from
//! scratch. Logging must never break the caller.

use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::PathBuf;

use chrono::{DateTime, Local};
use thiserror::Error;

use super::html::HtmlFormatter;
use super::policy::{RollingPolicy, RotationState};
use super::record::LogRecord;
use crate::storage;

/// Errors on the sink's write path
///
/// Consumed inside the sink and reported through [`Diagnostics`]; nothing
/// here ever reaches the intake API.
#[derive(Debug, Error)]
pub enum SinkError {
    /// The log directory or file could not be created or opened
    #[error("log storage unavailable: {0}")]
    Storage(#[source] io::Error),
    /// Archiving the active file failed; the sink keeps writing to it
    #[error("log rotation failed: {0}")]
    Rotation(#[source] io::Error),
    /// Appending a rendered row failed
    #[error("log write failed: {0}")]
    Write(#[source] io::Error),
}

/// Best-effort side channel for swallowed sink errors
///
/// Implementations must never write to the log file being protected.
pub trait Diagnostics: Send {
    /// Report a swallowed error
    fn report(&self, error: &SinkError);
}

/// Default diagnostics forwarding to the console tracing subscriber
#[derive(Debug, Default)]
pub struct TracingDiagnostics;

impl Diagnostics for TracingDiagnostics {
    fn report(&self, error: &SinkError) {
        tracing::debug!(error = %error, "support log write dropped");
    }
}

/// Destination for accepted log records
///
/// The dispatch worker is generic over this seam so tests can substitute
/// recording or artificially slow sinks.
pub trait RecordSink {
    /// Persist one record; must not panic
    fn write(&mut self, record: &LogRecord);
}

/// The currently open log file and its rotation state
struct ActiveFile {
    file: File,
    state: RotationState,
}

/// Appends HTML-rendered records to a rolling log file
pub struct RollingFileSink {
    dir: PathBuf,
    device: String,
    policy: RollingPolicy,
    formatter: HtmlFormatter,
    diagnostics: Box<dyn Diagnostics>,
    active: Option<ActiveFile>,
    /// Index the next archive will be named with
    next_rotation_index: u32,
}

impl RollingFileSink {
    /// Create a sink writing under `dir` with console diagnostics
    pub fn new(dir: PathBuf, device: impl Into<String>, policy: RollingPolicy) -> Self {
        Self::with_diagnostics(dir, device, policy, Box::new(TracingDiagnostics))
    }

    /// Create a sink with an injected diagnostics channel
    pub fn with_diagnostics(
        dir: PathBuf,
        device: impl Into<String>,
        policy: RollingPolicy,
        diagnostics: Box<dyn Diagnostics>,
    ) -> Self {
        Self {
            dir,
            device: device.into(),
            policy,
            formatter: HtmlFormatter::new(),
            diagnostics,
            active: None,
            next_rotation_index: 0,
        }
    }

    /// Path of the active log file
    pub fn latest_path(&self) -> PathBuf {
        self.dir.join(storage::latest_file_name(&self.device))
    }

    fn try_write(&mut self, record: &LogRecord) -> Result<(), SinkError> {
        let now = record.timestamp;

        let needs_rotation = match &self.active {
            Some(active) => self.policy.should_rotate(&active.state, now),
            None => false,
        };
        if needs_rotation {
            if let Err(error) = self.rotate() {
                // Keep appending to the oversized file rather than losing
                // data; rotation is retried on the next write.
                self.diagnostics.report(&error);
            }
        }

        if self.active.is_none() {
            self.open_latest(now)?;
        }

        let row = self.formatter.render_row(record);
        let active = match self.active.as_mut() {
            Some(active) => active,
            None => {
                return Err(SinkError::Storage(io::Error::new(
                    io::ErrorKind::NotFound,
                    "no active log file",
                )))
            }
        };
        active
            .file
            .write_all(row.as_bytes())
            .map_err(SinkError::Write)?;
        active.file.flush().map_err(SinkError::Write)?;
        active.state.bytes_written += row.len() as u64;
        Ok(())
    }

    /// Archive the active file and leave the sink ready to open a fresh one
    fn rotate(&mut self) -> Result<(), SinkError> {
        let (period, index) = match &self.active {
            Some(active) => (active.state.period, active.state.rotation_index),
            None => return Ok(()),
        };

        self.policy
            .make_room_for_archive(&self.dir, &self.device)
            .map_err(SinkError::Rotation)?;

        let archive = self
            .dir
            .join(storage::archive_file_name(&self.device, period, index));
        fs::rename(self.latest_path(), &archive).map_err(SinkError::Rotation)?;

        // The open handle now refers to the archived file; drop it so the
        // next open creates a fresh latest file with its own header.
        self.active = None;
        self.next_rotation_index = index.wrapping_add(1);
        Ok(())
    }

    /// Open the latest file, emitting the document header only when the file
    /// is newly created
    ///
    /// A pre-existing non-empty file (process restart) is appended to as-is:
    /// no second header, size seeded from disk, and the rotation day taken
    /// from the file's modification time so a stale file still day-rotates on
    /// the next write.
    fn open_latest(&mut self, now: DateTime<Local>) -> Result<(), SinkError> {
        fs::create_dir_all(&self.dir).map_err(SinkError::Storage)?;
        let path = self.latest_path();
        let existing = fs::metadata(&path).ok();
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(SinkError::Storage)?;

        let mut state = RotationState::new(now.date_naive(), self.next_rotation_index);
        match existing {
            Some(meta) if meta.len() > 0 => {
                state.bytes_written = meta.len();
                if let Ok(modified) = meta.modified() {
                    state.period = DateTime::<Local>::from(modified).date_naive();
                }
            }
            _ => {
                let header = self.formatter.document_header();
                file.write_all(header.as_bytes())
                    .map_err(SinkError::Storage)?;
                state.bytes_written = header.len() as u64;
            }
        }

        self.active = Some(ActiveFile { file, state });
        Ok(())
    }
}

impl RecordSink for RollingFileSink {
    fn write(&mut self, record: &LogRecord) {
        if let Err(error) = self.try_write(record) {
            self.diagnostics.report(&error);
            // Drop the handle so the next write reopens from scratch
            self.active = None;
        }
    }
}
