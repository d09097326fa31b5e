use anyhow::Result;
use tokio::io::{AsyncBufReadExt, BufReader};

use support_log::config::LogConfig;
use support_log::logging::{self, LogLevel};
use support_log::storage::StorageEnvironment;

#[tokio::main]
async fn main() -> Result<()> {
    // Console subscriber; the file pipeline is configured separately below
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "support_log=debug".into()),
        )
        .init();

    let config = LogConfig::load()?;
    let environment = StorageEnvironment::detect(&config);
    let (router, log_file) = logging::init_file_logging(&environment, &config)?;

    tracing::info!("Logging to: {}", log_file.path.display());
    router.log_event(LogLevel::Info, "Sys", "support-log started");

    // Forward stdin lines as events: "warn: text" and "error: text" pick the
    // level, anything else is logged as info
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let event = line.trim();
        if event.is_empty() {
            continue;
        }
        let (level, message) = match event.split_once(": ") {
            Some(("warn", rest)) => (LogLevel::Warn, rest),
            Some(("error", rest)) => (LogLevel::Error, rest),
            _ => (LogLevel::Info, event),
        };
        router.log_event(level, "event", message);
    }

    Ok(())
}
