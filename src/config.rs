//! Configuration for the support log

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Size threshold that triggers rotation of the active log file
pub const DEFAULT_MAX_FILE_SIZE_BYTES: u64 = 5 * 1024 * 1024;

/// Number of archived log files that survive rotation
///
/// Existing consumers locate archives by name, so treat this and the size
/// threshold as compatibility constants.
pub const DEFAULT_MAX_ARCHIVED_FILES: usize = 1;

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogConfig {
    /// Device name embedded in log file names (default: $HOSTNAME or "device")
    #[serde(default = "default_device_name")]
    pub device_name: String,

    /// Rotate the active file once it has reached this many bytes (default: 5 MiB)
    #[serde(default = "default_max_file_size_bytes")]
    pub max_file_size_bytes: u64,

    /// How many archived files are kept after rotation (default: 1)
    #[serde(default = "default_max_archived_files")]
    pub max_archived_files: usize,

    /// Shared storage root override; auto-detected when unset
    #[serde(default)]
    pub shared_storage_dir: Option<PathBuf>,
}

fn default_device_name() -> String {
    std::env::var("HOSTNAME")
        .ok()
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| "device".to_string())
}

fn default_max_file_size_bytes() -> u64 {
    DEFAULT_MAX_FILE_SIZE_BYTES
}

fn default_max_archived_files() -> usize {
    DEFAULT_MAX_ARCHIVED_FILES
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            device_name: default_device_name(),
            max_file_size_bytes: default_max_file_size_bytes(),
            max_archived_files: default_max_archived_files(),
            shared_storage_dir: None,
        }
    }
}

impl LogConfig {
    /// Load configuration from file, or return default if not found
    pub fn load() -> Result<Self> {
        let path = config_file_path();
        if path.exists() {
            let content = std::fs::read_to_string(&path).context("Failed to read config file")?;
            toml::from_str(&content).context("Failed to parse config file")
        } else {
            Ok(Self::default())
        }
    }

    /// Save configuration to file
    pub fn save(&self) -> Result<()> {
        let path = config_file_path();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).context("Failed to create config directory")?;
        }
        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(&path, content).context("Failed to write config file")?;
        Ok(())
    }
}

/// Get the base configuration directory (~/.support-log)
/// Falls back to ./.support-log if home directory cannot be determined
pub fn config_dir() -> PathBuf {
    try_config_dir().unwrap_or_else(|| {
        tracing::warn!("Could not determine home directory, using current directory for config");
        PathBuf::from(".support-log")
    })
}

/// Try to get the base configuration directory, returning None if home dir is unavailable
pub fn try_config_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".support-log"))
}

/// Get the path to the config file
pub fn config_file_path() -> PathBuf {
    config_dir().join("config.toml")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = LogConfig::default();
        assert_eq!(config.max_file_size_bytes, 5 * 1024 * 1024);
        assert_eq!(config.max_archived_files, 1);
        assert!(!config.device_name.is_empty());
        assert!(config.shared_storage_dir.is_none());
    }

    #[test]
    fn test_config_serialization() {
        let config = LogConfig::default();
        let toml_str = toml::to_string(&config).unwrap();
        let parsed: LogConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(config.device_name, parsed.device_name);
        assert_eq!(config.max_file_size_bytes, parsed.max_file_size_bytes);
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let parsed: LogConfig = toml::from_str("device_name = \"pixel-4a\"").unwrap();
        assert_eq!(parsed.device_name, "pixel-4a");
        assert_eq!(parsed.max_file_size_bytes, DEFAULT_MAX_FILE_SIZE_BYTES);
        assert_eq!(parsed.max_archived_files, DEFAULT_MAX_ARCHIVED_FILES);
    }

    #[test]
    fn test_config_dir_does_not_panic() {
        let dir = config_dir();
        assert!(dir.ends_with(".support-log"));
    }
}
