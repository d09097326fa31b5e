//! Log record types shared across the logging pipeline

use chrono::{DateTime, Local};

/// Log level for intake and rendering
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    /// Get the display name for this level
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Debug => "DEBUG",
            LogLevel::Info => "INFO",
            LogLevel::Warn => "WARN",
            LogLevel::Error => "ERROR",
        }
    }

    /// CSS class used for rows of this level
    pub fn css_class(&self) -> &'static str {
        match self {
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }

    /// Check if this level is a warning or error (rendered highlighted)
    pub fn is_alert(&self) -> bool {
        matches!(self, LogLevel::Warn | LogLevel::Error)
    }
}

/// A single log record
///
/// Constructed once at intake and consumed once by the sink; the tag is
/// already folded into `message` by the router.
#[derive(Debug, Clone)]
pub struct LogRecord {
    /// When the record was accepted
    pub timestamp: DateTime<Local>,
    /// Log level
    pub level: LogLevel,
    /// Pre-formatted message ("tag: message")
    pub message: String,
}

impl LogRecord {
    /// Create a new record stamped with the current time
    pub fn new(level: LogLevel, message: impl Into<String>) -> Self {
        Self {
            timestamp: Local::now(),
            level,
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_as_str() {
        assert_eq!(LogLevel::Debug.as_str(), "DEBUG");
        assert_eq!(LogLevel::Error.as_str(), "ERROR");
    }

    #[test]
    fn test_level_is_alert() {
        assert!(!LogLevel::Debug.is_alert());
        assert!(!LogLevel::Info.is_alert());
        assert!(LogLevel::Warn.is_alert());
        assert!(LogLevel::Error.is_alert());
    }

    #[test]
    fn test_record_new() {
        let record = LogRecord::new(LogLevel::Info, "Net: connected");
        assert_eq!(record.level, LogLevel::Info);
        assert_eq!(record.message, "Net: connected");
    }
}
