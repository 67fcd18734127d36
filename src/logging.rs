use std::fs::{self, File};

use anyhow::{Context, Result};
use tracing::Level;
use tracing_appender::non_blocking::{self, WorkerGuard};
use tracing_subscriber::{fmt, EnvFilter};

use crate::config::LoggingConfig;

/// Where log lines go when no file is configured
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFallback {
    Stderr,
    /// Used by the TUI, which owns the terminal
    Silent,
}

/// Install the global subscriber.
///
/// `RUST_LOG` wins over the configured level. When logging to a file the
/// returned guard must be held until exit or buffered lines are lost.
pub fn init_logging(logging: &LoggingConfig, fallback: LogFallback) -> Result<Option<WorkerGuard>> {
    let level = logging.level().unwrap_or(Level::INFO);
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.as_str()));

    match (&logging.file, fallback) {
        (Some(path), _) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent)
                    .with_context(|| format!("creating log directory at {}", parent.display()))?;
            }
            let file = File::create(path)
                .with_context(|| format!("creating log file at {}", path.display()))?;

            let (writer, guard) = non_blocking::NonBlockingBuilder::default()
                .lossy(false)
                .finish(file);

            let subscriber = fmt::Subscriber::builder()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_writer(writer)
                .finish();

            // Ignore error if a global subscriber is already set (e.g., when running in tests)
            let _ = tracing::subscriber::set_global_default(subscriber);
            Ok(Some(guard))
        }
        (None, LogFallback::Stderr) => {
            let subscriber = fmt::Subscriber::builder()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .finish();

            let _ = tracing::subscriber::set_global_default(subscriber);
            Ok(None)
        }
        (None, LogFallback::Silent) => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_silent_without_file_installs_nothing() {
        let cfg = LoggingConfig::default();
        let guard = init_logging(&cfg, LogFallback::Silent).unwrap();
        assert!(guard.is_none());
    }

    #[test]
    fn test_file_logging_creates_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("logs").join("demo.log");
        let cfg = LoggingConfig {
            level: "debug".to_string(),
            file: Some(path.clone()),
        };

        let guard = init_logging(&cfg, LogFallback::Stderr).unwrap();
        assert!(guard.is_some());
        assert!(path.exists());
    }
}
