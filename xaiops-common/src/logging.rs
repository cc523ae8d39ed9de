//! Tracing subscriber setup shared by both binaries

use std::path::{Path, PathBuf};

use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

use crate::config::LoggingConfig;
use crate::{Error, Result};

/// Install the global subscriber
///
/// `RUST_LOG` takes precedence over `config.level`. When `config.directory` is
/// set, output is also appended to `{directory}/{component}.log` through a
/// background writer; the returned guard flushes it on drop and must be held
/// until the process exits.
pub fn init_logging(component: &str, config: &LoggingConfig) -> Result<Option<WorkerGuard>> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.level))
        .map_err(|e| Error::Config(format!("Invalid log level {:?}: {}", config.level, e)))?;

    let (file_layer, guard) = match &config.directory {
        Some(dir) => {
            let appender = RollingFileAppender::builder()
                .rotation(Rotation::NEVER)
                .filename_prefix(component)
                .filename_suffix("log")
                .build(dir)
                .map_err(|e| {
                    Error::Config(format!(
                        "Open log file {} failed: {}",
                        log_file_path(dir, component).display(),
                        e
                    ))
                })?;
            let (writer, guard) = tracing_appender::non_blocking(appender);
            (
                Some(fmt::layer().with_ansi(false).with_writer(writer)),
                Some(guard),
            )
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer())
        .with(file_layer)
        .try_init()
        .map_err(|e| Error::Internal(format!("Tracing already initialized: {}", e)))?;

    Ok(guard)
}

pub fn log_file_path(dir: &Path, component: &str) -> PathBuf {
    dir.join(format!("{}.log", component))
}
