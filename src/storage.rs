//! Log storage resolution
//!
//! Resolves the directory that holds log files, preferring shared storage with
//! a per-user fallback, and exposes the restart-stable path of the active log
//! file so consumers can always find the most recent log.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::NaiveDate;

use crate::config::{self, LogConfig};

/// Subdirectory for log files under the resolved storage root
const LOGS_SUBDIR: &str = "logs";

/// App subdirectory under the shared data directory
const APP_DIR_NAME: &str = "support-log";

/// File name of the active log file for a device
///
/// Stable across restarts and rotations; the retrieval API hands this path to
/// consumers, so the scheme is a compatibility contract.
pub fn latest_file_name(device: &str) -> String {
    format!("logs-{device}-latest.html")
}

/// File name of an archived log file for a device, period, and rotation index
pub fn archive_file_name(device: &str, period: NaiveDate, index: u32) -> String {
    format!("logs-{}.{}.{}.html", device, period.format("%Y-%m-%d"), index)
}

/// Check whether a file name is an archive produced for the given device
///
/// The active file uses a `-latest` suffix rather than a dated one, so it
/// never matches.
pub fn is_archive_file(name: &str, device: &str) -> bool {
    name.starts_with(&format!("logs-{device}.")) && name.ends_with(".html")
}

/// Storage roots considered when resolving the log directory
#[derive(Debug, Clone)]
pub struct StorageEnvironment {
    /// Shared storage root, when one is available
    primary: Option<PathBuf>,
    /// Per-user root used when shared storage is unavailable
    fallback: PathBuf,
}

impl StorageEnvironment {
    /// Detect storage roots from the configuration and platform directories
    pub fn detect(config: &LogConfig) -> Self {
        let primary = config
            .shared_storage_dir
            .clone()
            .or_else(|| dirs::data_local_dir().map(|d| d.join(APP_DIR_NAME)));
        Self {
            primary,
            fallback: config::config_dir(),
        }
    }

    /// Create an environment with explicit roots (for testing and embedders)
    pub fn with_roots(primary: Option<PathBuf>, fallback: PathBuf) -> Self {
        Self { primary, fallback }
    }

    /// Resolve the log directory, creating it if absent
    ///
    /// The primary root wins when its logs directory can actually be created;
    /// otherwise the fallback is used. Resolution is idempotent: an unchanged
    /// environment always yields the same path, and an existing directory is
    /// left untouched.
    pub fn resolve_log_dir(&self) -> Result<PathBuf> {
        if let Some(primary) = &self.primary {
            let dir = primary.join(LOGS_SUBDIR);
            if fs::create_dir_all(&dir).is_ok() {
                return Ok(dir);
            }
            tracing::warn!(
                "Shared storage at {} unavailable, falling back to user storage",
                primary.display()
            );
        }
        let dir = self.fallback.join(LOGS_SUBDIR);
        fs::create_dir_all(&dir).context("Failed to create logs directory")?;
        Ok(dir)
    }

    /// Path of the active log file, or None if no storage can be resolved
    pub fn latest_log_path(&self, device: &str) -> Option<PathBuf> {
        self.resolve_log_dir()
            .ok()
            .map(|dir| dir.join(latest_file_name(device)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::io::Write;
    use tempfile::TempDir;

    #[test]
    fn test_latest_file_name() {
        assert_eq!(latest_file_name("pixel-4a"), "logs-pixel-4a-latest.html");
    }

    #[test]
    fn test_archive_file_name() {
        let period = NaiveDate::from_ymd_opt(2026, 8, 6).unwrap();
        assert_eq!(
            archive_file_name("pixel-4a", period, 0),
            "logs-pixel-4a.2026-08-06.0.html"
        );
    }

    #[test]
    fn test_is_archive_file() {
        assert!(is_archive_file("logs-pixel-4a.2026-08-06.0.html", "pixel-4a"));
        assert!(!is_archive_file("logs-pixel-4a-latest.html", "pixel-4a"));
        assert!(!is_archive_file("logs-other.2026-08-06.0.html", "pixel-4a"));
        assert!(!is_archive_file("notes.txt", "pixel-4a"));
    }

    #[test]
    fn test_resolve_prefers_primary() {
        let primary = TempDir::new().unwrap();
        let fallback = TempDir::new().unwrap();
        let env = StorageEnvironment::with_roots(
            Some(primary.path().to_path_buf()),
            fallback.path().to_path_buf(),
        );

        let dir = env.resolve_log_dir().unwrap();
        assert_eq!(dir, primary.path().join("logs"));
        assert!(dir.is_dir());
    }

    #[test]
    fn test_resolve_falls_back_when_primary_unavailable() {
        let fallback = TempDir::new().unwrap();
        // A root below a regular file can never be created
        let blocker = fallback.path().join("blocker");
        File::create(&blocker).unwrap();

        let env = StorageEnvironment::with_roots(
            Some(blocker.join("shared")),
            fallback.path().to_path_buf(),
        );

        let dir = env.resolve_log_dir().unwrap();
        assert_eq!(dir, fallback.path().join("logs"));
        assert!(dir.is_dir());
    }

    #[test]
    fn test_resolve_is_idempotent() {
        let root = TempDir::new().unwrap();
        let env =
            StorageEnvironment::with_roots(Some(root.path().to_path_buf()), root.path().into());

        let first = env.resolve_log_dir().unwrap();

        // An existing file must survive re-resolution untouched
        let marker = first.join("marker.html");
        File::create(&marker).unwrap().write_all(b"x").unwrap();

        let second = env.resolve_log_dir().unwrap();
        assert_eq!(first, second);
        assert!(marker.exists());
    }

    #[test]
    fn test_latest_log_path() {
        let root = TempDir::new().unwrap();
        let env = StorageEnvironment::with_roots(None, root.path().to_path_buf());

        let path = env.latest_log_path("pixel-4a").unwrap();
        assert!(path.ends_with("logs/logs-pixel-4a-latest.html"));
    }
}
