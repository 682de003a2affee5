//! Tracing subscriber setup from `monitor_props`

use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

use crate::config::{LogLevel, MonitorProps};

pub const LOG_FILE_NAME: &str = "minimon.log";

#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("log directory does not exist: {}", .0.display())]
    MissingLogDir(PathBuf),
    #[error("could not install log subscriber: {0}")]
    Install(String),
}

/// Where log lines go
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogTarget {
    Stdout,
    Stderr,
    File(PathBuf),
}

/// Pick the log destination. `console` always goes to stdout; otherwise a
/// non-empty `log_dir` selects `<log_dir>/minimon.log`.
pub fn resolve_target(props: &MonitorProps, level: LogLevel) -> Result<LogTarget, LoggingError> {
    if level == LogLevel::Console {
        return Ok(LogTarget::Stdout);
    }

    let dir = props.log_dir.trim();
    if dir.is_empty() {
        return Ok(LogTarget::Stderr);
    }

    let dir = Path::new(dir);
    if !dir.is_dir() {
        return Err(LoggingError::MissingLogDir(dir.to_path_buf()));
    }

    Ok(LogTarget::File(dir.join(LOG_FILE_NAME)))
}

/// Install the global subscriber. `RUST_LOG` takes precedence over `level`.
///
/// The returned guard flushes the file writer on drop and must be held for
/// the life of the process.
pub fn init(props: &MonitorProps, level: LogLevel) -> Result<Option<WorkerGuard>, LoggingError> {
    let target = resolve_target(props, level)?;
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.as_filter()));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false);

    match target {
        LogTarget::Stdout => builder
            .with_writer(std::io::stdout)
            .try_init()
            .map(|_| None)
            .map_err(|err| LoggingError::Install(err.to_string())),
        LogTarget::Stderr => builder
            .with_writer(std::io::stderr)
            .try_init()
            .map(|_| None)
            .map_err(|err| LoggingError::Install(err.to_string())),
        LogTarget::File(path) => {
            let dir = path.parent().unwrap_or_else(|| Path::new("."));
            let appender = tracing_appender::rolling::never(dir, LOG_FILE_NAME);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            builder
                .with_writer(writer)
                .with_ansi(false)
                .try_init()
                .map(|_| Some(guard))
                .map_err(|err| LoggingError::Install(err.to_string()))
        }
    }
}
