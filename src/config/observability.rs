//! Logging settings
//!
//! `[logging]` keeps a flat layout in the file (`level`, `file_*` keys) but
//! resolves into a typed level plus a `LogFile` describing the JSON output.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::PathBuf;
use tracing::level_filters::LevelFilter;

/// How often the JSON log file starts a new segment
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogRotation {
    Hourly,
    #[default]
    Daily,
    /// One file, appended to forever
    Never,
}

impl LogRotation {
    /// Unknown values fall back to daily
    pub fn parse(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "hourly" => Self::Hourly,
            "never" => Self::Never,
            _ => Self::Daily,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Hourly => "hourly",
            Self::Daily => "daily",
            Self::Never => "never",
        }
    }
}

/// JSON log file output
#[derive(Debug, Clone)]
pub struct LogFile {
    /// Off unless `file_enabled = true`
    pub enabled: bool,
    pub dir: PathBuf,
    pub rotation: LogRotation,
    /// File name stem; rotated files get a date suffix ("passage-lens.2024-01-15")
    pub prefix: String,
}

impl Default for LogFile {
    fn default() -> Self {
        Self {
            enabled: false,
            dir: PathBuf::from("./logs"),
            rotation: LogRotation::Daily,
            prefix: "passage-lens".to_string(),
        }
    }
}

/// Resolved `[logging]` section
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Level for the passage_lens target when RUST_LOG is unset
    pub level: LevelFilter,
    pub file: LogFile,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: LevelFilter::INFO,
            file: LogFile::default(),
        }
    }
}

/// `[logging]` as written in the config file
#[derive(Debug, Deserialize, Default)]
pub struct FileLogging {
    pub level: Option<String>,
    pub file_enabled: Option<bool>,
    pub file_dir: Option<String>,
    pub file_rotation: Option<String>,
    pub file_prefix: Option<String>,
}

impl LoggingConfig {
    /// Resolve the file section; an unrecognized level is an error
    pub fn from_file(file: Option<FileLogging>) -> Result<Self> {
        let file = file.unwrap_or_default();
        let defaults = LogFile::default();

        let level = match file.level {
            Some(raw) => raw
                .parse::<LevelFilter>()
                .with_context(|| format!("Invalid log level: {}", raw))?,
            None => LevelFilter::INFO,
        };

        Ok(Self {
            level,
            file: LogFile {
                enabled: file.file_enabled.unwrap_or(defaults.enabled),
                dir: file.file_dir.map(PathBuf::from).unwrap_or(defaults.dir),
                rotation: file
                    .file_rotation
                    .map(|s| LogRotation::parse(&s))
                    .unwrap_or(defaults.rotation),
                prefix: file.file_prefix.unwrap_or(defaults.prefix),
            },
        })
    }
}
