//! Tracing subscriber setup

use crate::config::LogFormat;
use anyhow::Result;
use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const DEFAULT_FILTER: &str = "cmdrelay=info";
const LOG_FILE_PREFIX: &str = "cmdrelay.log";

/// Install the global subscriber.
///
/// With a log directory, records are also written as JSON to a daily-rotated
/// file. The returned guard flushes that file on drop and must be held
/// until exit.
pub fn init_logging(format: LogFormat, log_dir: Option<&Path>) -> Result<Option<WorkerGuard>> {
    let env_filter =
        EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(DEFAULT_FILTER))?;

    let (file_layer, guard) = match log_dir {
        Some(dir) => {
            std::fs::create_dir_all(dir)?;
            let appender = tracing_appender::rolling::daily(dir, LOG_FILE_PREFIX);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer().json().with_ansi(false).with_writer(writer);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    match format {
        LogFormat::Json => {
            // Production: JSON structured logging
            tracing_subscriber::registry()
                .with(env_filter)
                .with(file_layer)
                .with(fmt::layer().json())
                .try_init()?;
        }
        LogFormat::Pretty => {
            // Development: Pretty formatting with colors
            tracing_subscriber::registry()
                .with(env_filter)
                .with(file_layer)
                .with(fmt::layer().pretty())
                .try_init()?;
        }
    }

    Ok(guard)
}
