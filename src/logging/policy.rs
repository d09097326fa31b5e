//! Rolling policy for log files
//!
//! Decides when the active file must be rotated (size or calendar-day
//! trigger) and bounds how many archived files survive.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use chrono::{DateTime, Local, NaiveDate};

use crate::config::LogConfig;
use crate::storage;

/// Bookkeeping for the currently open log file
///
/// Owned by the sink and mutated only on its serialized write path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RotationState {
    /// Bytes written to the file since it was created or last rotated
    pub bytes_written: u64,
    /// Calendar day the file belongs to
    pub period: NaiveDate,
    /// Index used to name the archive this file becomes on rotation
    pub rotation_index: u32,
}

impl RotationState {
    /// State for a freshly created file
    pub fn new(period: NaiveDate, rotation_index: u32) -> Self {
        Self {
            bytes_written: 0,
            period,
            rotation_index,
        }
    }
}

/// Size- and day-based rotation policy with bounded retention
#[derive(Debug, Clone)]
pub struct RollingPolicy {
    max_file_size_bytes: u64,
    max_archived_files: usize,
}

impl RollingPolicy {
    /// Create a policy with explicit bounds
    pub fn new(max_file_size_bytes: u64, max_archived_files: usize) -> Self {
        Self {
            max_file_size_bytes,
            max_archived_files,
        }
    }

    /// Create a policy from the logging configuration
    pub fn from_config(config: &LogConfig) -> Self {
        Self::new(config.max_file_size_bytes, config.max_archived_files)
    }

    /// Check whether the active file must be rotated before the next write
    ///
    /// The size check runs before the write, so the file rotates once it has
    /// reached the threshold rather than after exceeding it. The day check
    /// fires when the write's calendar day differs from the file's.
    pub fn should_rotate(&self, state: &RotationState, now: DateTime<Local>) -> bool {
        state.bytes_written >= self.max_file_size_bytes || state.period != now.date_naive()
    }

    /// Delete the oldest archives so one more can be added without exceeding
    /// the retention bound
    ///
    /// Returns the number of files deleted. Only archives matching this
    /// device's naming scheme are touched; the active file never matches.
    pub fn make_room_for_archive(&self, dir: &Path, device: &str) -> io::Result<usize> {
        if !dir.exists() {
            return Ok(0);
        }

        let mut archives: Vec<(PathBuf, SystemTime)> = Vec::new();
        for entry in fs::read_dir(dir)? {
            let entry = entry?;
            let path = entry.path();
            match path.file_name().and_then(|n| n.to_str()) {
                Some(name) if storage::is_archive_file(name, device) => {}
                _ => continue,
            }
            let modified = entry
                .metadata()
                .and_then(|m| m.modified())
                .unwrap_or(SystemTime::UNIX_EPOCH);
            archives.push((path, modified));
        }

        let keep = self.max_archived_files.saturating_sub(1);
        if archives.len() <= keep {
            return Ok(0);
        }

        // Oldest first; everything beyond the kept tail goes
        archives.sort_by_key(|(_, modified)| *modified);
        let excess = archives.len() - keep;

        let mut deleted = 0;
        for (path, _) in archives.into_iter().take(excess) {
            fs::remove_file(&path)?;
            deleted += 1;
        }
        Ok(deleted)
    }
}
