//! Logging bootstrap for Shelfie.
//!
//! Events always go to stderr. When an output file is configured they are
//! appended there too, without ANSI colouring.

use std::fs::OpenOptions;
use std::path::{Path, PathBuf};

use anyhow::Context;
use shelfie_kernel::settings::{LogFormat, TelemetrySettings};
use tracing::Level;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

/// Options controlling the global subscriber.
#[derive(Debug, Clone)]
pub struct LoggerOptions {
    pub level: Level,
    pub output_file: Option<PathBuf>,
    pub format: LogFormat,
}

impl Default for LoggerOptions {
    fn default() -> Self {
        Self {
            level: Level::INFO,
            output_file: None,
            format: LogFormat::Pretty,
        }
    }
}

impl LoggerOptions {
    /// Build options from the `--debug` / `--log-file` flags, falling back to
    /// the configured log file when no flag is given.
    pub fn from_flags(
        debug: bool,
        log_file: Option<PathBuf>,
        telemetry: &TelemetrySettings,
    ) -> Self {
        Self {
            level: if debug { Level::DEBUG } else { Level::INFO },
            output_file: log_file.or_else(|| telemetry.log_file.as_ref().map(PathBuf::from)),
            format: telemetry.log_format,
        }
    }

    fn filter(&self) -> EnvFilter {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(self.level.as_str().to_ascii_lowercase()))
    }
}

/// Install the global tracing subscriber.
pub fn init(options: &LoggerOptions) -> anyhow::Result<()> {
    let file_layer = match &options.output_file {
        Some(path) => Some(file_layer(path, options.format)?),
        None => None,
    };

    let stderr_layer = match options.format {
        LogFormat::Pretty => tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .boxed(),
        LogFormat::Json => tracing_subscriber::fmt::layer()
            .json()
            .with_writer(std::io::stderr)
            .boxed(),
    };

    tracing_subscriber::registry()
        .with(options.filter())
        .with(stderr_layer)
        .with(file_layer)
        .try_init()
        .context("failed to install tracing subscriber")?;

    tracing::debug!(
        target: "shelfie-telemetry",
        level = %options.level,
        file = ?options.output_file,
        "logger initialized"
    );

    Ok(())
}

fn file_layer<S>(
    path: &Path,
    format: LogFormat,
) -> anyhow::Result<Box<dyn Layer<S> + Send + Sync + 'static>>
where
    S: tracing::Subscriber + for<'span> tracing_subscriber::registry::LookupSpan<'span>,
{
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("failed to open log file {}", path.display()))?;

    let layer = match format {
        LogFormat::Pretty => tracing_subscriber::fmt::layer()
            .with_writer(file)
            .with_ansi(false)
            .boxed(),
        LogFormat::Json => tracing_subscriber::fmt::layer()
            .json()
            .with_writer(file)
            .with_ansi(false)
            .boxed(),
    };

    Ok(layer)
}
