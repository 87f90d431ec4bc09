//! Configuration for the analysis server
//!
//! Configuration is loaded in order of precedence:
//! 1. Environment variables (highest priority)
//! 2. Config file (~/.config/passage-lens/config.toml)
//! 3. Built-in defaults (lowest priority)

use anyhow::{Context, Result};
use serde::Deserialize;
use std::net::SocketAddr;
use std::path::PathBuf;

// ─────────────────────────────────────────────────────────────────────────────
// Submodules
// ─────────────────────────────────────────────────────────────────────────────

mod analysis;
mod observability;
mod serialization;

#[cfg(test)]
mod tests;

// ─────────────────────────────────────────────────────────────────────────────
// Re-exports (maintain public API)
// ─────────────────────────────────────────────────────────────────────────────

pub use analysis::{
    BooksConfig, FileBooksConfig, FileLanguageConfig, FileSummaryConfig, LanguageConfig,
    StopwordSource, SummaryConfig,
};
pub use observability::{FileLogging, LogFile, LogRotation, LoggingConfig};

// ─────────────────────────────────────────────────────────────────────────────
// Constants
// ─────────────────────────────────────────────────────────────────────────────

/// Version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default listen address
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8501";

/// Default directory for downloaded language data
pub const DEFAULT_DATA_DIR: &str = "./lang_data";

/// Default location of the secrets store
pub const DEFAULT_SECRETS_PATH: &str = "./.secrets/secrets.toml";

/// Default cap on request bodies (256 KiB)
pub const DEFAULT_MAX_PASSAGE_BYTES: usize = 256 * 1024;

// ─────────────────────────────────────────────────────────────────────────────
// Application Configuration
// ─────────────────────────────────────────────────────────────────────────────

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Address to bind the web server to
    pub bind_addr: SocketAddr,

    /// Largest request body the web server accepts; bigger posts get 413
    pub max_passage_bytes: usize,

    /// Directory holding the tokenizer, lexicon and stopword packages
    pub data_dir: PathBuf,

    /// TOML file holding `[general] api_key`
    pub secrets_path: PathBuf,

    /// Book search API settings
    pub books: BooksConfig,

    /// Extractive summary settings
    pub summary: SummaryConfig,

    /// Language data sources
    pub language: LanguageConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 8501)),
            max_passage_bytes: DEFAULT_MAX_PASSAGE_BYTES,
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            secrets_path: PathBuf::from(DEFAULT_SECRETS_PATH),
            books: BooksConfig::default(),
            summary: SummaryConfig::default(),
            language: LanguageConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// File Configuration (deserialization layer)
// ─────────────────────────────────────────────────────────────────────────────

/// Config file structure
#[derive(Debug, Deserialize, Default)]
pub(crate) struct FileConfig {
    pub bind_addr: Option<String>,
    pub max_passage_bytes: Option<usize>,
    pub data_dir: Option<String>,
    pub secrets_path: Option<String>,

    /// Optional [books] section
    pub books: Option<FileBooksConfig>,

    /// Optional [summary] section
    pub summary: Option<FileSummaryConfig>,

    /// Optional [language] section
    pub language: Option<FileLanguageConfig>,

    /// Optional [logging] section
    pub logging: Option<FileLogging>,
}

// ─────────────────────────────────────────────────────────────────────────────
// Configuration Loading
// ─────────────────────────────────────────────────────────────────────────────

impl Config {
    /// Get the config file path: ~/.config/passage-lens/config.toml
    /// Uses Unix-style ~/.config on all platforms for consistency
    pub fn config_path() -> Option<PathBuf> {
        dirs::home_dir().map(|p| p.join(".config").join("passage-lens").join("config.toml"))
    }

    /// Create config file with defaults if it doesn't exist
    /// Called during startup to help users discover configuration options
    pub fn ensure_config_exists() {
        let Some(path) = Self::config_path() else {
            return;
        };

        if path.exists() {
            return;
        }

        if let Some(parent) = path.parent() {
            if std::fs::create_dir_all(parent).is_err() {
                return; // Config is optional
            }
        }

        let _ = std::fs::write(&path, Self::default().to_toml());
    }

    /// Load file config if it exists
    ///
    /// A config file that exists but cannot be parsed terminates the process
    /// with an actionable message rather than silently using defaults.
    fn load_file_config() -> FileConfig {
        let Some(path) = Self::config_path() else {
            return FileConfig::default();
        };

        match std::fs::read_to_string(&path) {
            Ok(contents) => match toml::from_str(&contents) {
                Ok(config) => config,
                Err(e) => {
                    eprintln!("\n╔══════════════════════════════════════════════════════════════╗");
                    eprintln!("║  CONFIG ERROR - Failed to parse configuration file          ║");
                    eprintln!("╚══════════════════════════════════════════════════════════════╝\n");
                    eprintln!("  File: {}\n", path.display());
                    eprintln!("  Error: {}\n", e);
                    eprintln!("  Tip: Check for:\n");
                    eprintln!("    - Missing quotes around string values");
                    eprintln!("    - Invalid boolean values (use true/false)");
                    eprintln!("    - Typos in section names\n");
                    eprintln!("  To reset, run `passage-lens config --reset`.\n");
                    std::process::exit(1);
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => FileConfig::default(),
            Err(e) => {
                eprintln!("\n╔══════════════════════════════════════════════════════════════╗");
                eprintln!("║  CONFIG ERROR - Cannot read configuration file              ║");
                eprintln!("╚══════════════════════════════════════════════════════════════╝\n");
                eprintln!("  File: {}\n", path.display());
                eprintln!("  Error: {}\n", e);
                std::process::exit(1);
            }
        }
    }

    /// Load configuration: env vars -> file -> defaults
    pub fn from_env() -> Result<Self> {
        Self::resolve(Self::load_file_config(), |key| std::env::var(key).ok())
    }

    /// Merge a parsed config file with environment overrides.
    ///
    /// `env` is a lookup function so tests can supply overrides without
    /// touching the process environment.
    pub(crate) fn resolve<F>(file: FileConfig, env: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        // Bind address: env > file > default
        let bind_raw = env("PASSAGE_LENS_BIND")
            .or(file.bind_addr)
            .unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr = bind_raw
            .parse()
            .with_context(|| format!("Invalid bind address: {}", bind_raw))?;

        let max_passage_bytes = file
            .max_passage_bytes
            .unwrap_or(DEFAULT_MAX_PASSAGE_BYTES);

        let data_dir = env("PASSAGE_LENS_DATA_DIR")
            .or(file.data_dir)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR));

        let secrets_path = env("PASSAGE_LENS_SECRETS")
            .or(file.secrets_path)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_SECRETS_PATH));

        let mut books = BooksConfig::from_file(file.books);
        if let Some(url) = env("PASSAGE_LENS_BOOKS_API_URL") {
            books.api_url = url;
        }

        let summary = SummaryConfig::from_file(file.summary);
        let language = LanguageConfig::from_file(file.language);
        let logging = LoggingConfig::from_file(file.logging)?;

        Ok(Self {
            bind_addr,
            max_passage_bytes,
            data_dir,
            secrets_path,
            books,
            summary,
            language,
            logging,
        })
    }
}
