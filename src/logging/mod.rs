// Logging module - tracing subscriber setup
//
// Console output is human-readable; the optional file layer writes JSON
// lines through a non-blocking rolling appender for later parsing.
//
// Filter precedence: RUST_LOG env var > config file level > "info"

use tracing::level_filters::LevelFilter;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::{LogFile, LogRotation, LoggingConfig};

/// Where console logs go
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Console {
    /// Server mode
    Stdout,
    /// One-shot commands whose stdout is the result
    Stderr,
}

/// Filter used when RUST_LOG is unset
pub fn default_filter(level: LevelFilter) -> String {
    format!("passage_lens={},axum=info", level)
}

/// Install the global subscriber.
///
/// The returned guard flushes the file writer on drop, so it must live until
/// the process exits.
pub fn init(config: &LoggingConfig, console: Console) -> Option<WorkerGuard> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| default_filter(config.level).into());

    let writer = match console {
        Console::Stdout => BoxMakeWriter::new(std::io::stdout),
        Console::Stderr => BoxMakeWriter::new(std::io::stderr),
    };
    let console_layer = tracing_subscriber::fmt::layer().with_writer(writer);

    let file = &config.file;
    let (file_layer, guard) = if file.enabled {
        match std::fs::create_dir_all(&file.dir) {
            Ok(()) => {
                let (non_blocking, guard) = tracing_appender::non_blocking(file_appender(file));
                let layer = tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(non_blocking)
                    .with_ansi(false);
                (Some(layer), Some(guard))
            }
            Err(e) => {
                // Fall back to console-only logging
                eprintln!(
                    "Warning: Could not create log directory {:?}: {}",
                    file.dir, e
                );
                (None, None)
            }
        }
    } else {
        (None, None)
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(console_layer)
        .with(file_layer)
        .init();

    guard
}

impl From<LogRotation> for Rotation {
    fn from(rotation: LogRotation) -> Self {
        match rotation {
            LogRotation::Hourly => Rotation::HOURLY,
            LogRotation::Daily => Rotation::DAILY,
            LogRotation::Never => Rotation::NEVER,
        }
    }
}

/// Rolling appender for the configured rotation
fn file_appender(file: &LogFile) -> RollingFileAppender {
    RollingFileAppender::new(file.rotation.into(), &file.dir, &file.prefix)
}
