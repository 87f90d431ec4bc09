//! Secrets store for the book search API key
//!
//! The key lives in a TOML file kept out of version control:
//!
//! ```toml
//! [general]
//! api_key = "..."
//! ```
//!
//! The key is never logged. `fingerprint()` gives a short hash operators can
//! compare instead.

use serde::Deserialize;
use sha2::{Digest, Sha256};
use std::fmt;
use std::path::{Path, PathBuf};

/// Errors loading the secrets store
#[derive(Debug)]
pub enum SecretsError {
    /// File missing or unreadable
    Read { path: PathBuf, message: String },
    /// File is not valid TOML
    Parse { path: PathBuf, message: String },
    /// `[general] api_key` absent or blank
    MissingApiKey { path: PathBuf },
}

impl fmt::Display for SecretsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Read { path, message } => {
                write!(f, "Cannot read secrets file {}: {}", path.display(), message)
            }
            Self::Parse { path, message } => {
                write!(f, "Invalid secrets file {}: {}", path.display(), message)
            }
            Self::MissingApiKey { path } => write!(
                f,
                "No [general] api_key in secrets file {}",
                path.display()
            ),
        }
    }
}

impl std::error::Error for SecretsError {}

#[derive(Debug, Deserialize, Default)]
struct SecretsFile {
    general: Option<GeneralSection>,
}

#[derive(Debug, Deserialize, Default)]
struct GeneralSection {
    api_key: Option<String>,
}

/// Loaded secrets
#[derive(Clone)]
pub struct Secrets {
    api_key: String,
}

// Keep the key out of `{:?}` output
impl fmt::Debug for Secrets {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Secrets")
            .field("api_key", &format_args!("<{}>", self.fingerprint()))
            .finish()
    }
}

impl Secrets {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
        }
    }

    /// Read and validate the secrets file
    pub fn load(path: &Path) -> Result<Self, SecretsError> {
        let contents = std::fs::read_to_string(path).map_err(|e| SecretsError::Read {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        Self::parse(&contents, path)
    }

    /// Parse secrets from TOML text; `origin` is only used in error messages
    pub fn parse(contents: &str, origin: &Path) -> Result<Self, SecretsError> {
        let file: SecretsFile = toml::from_str(contents).map_err(|e| SecretsError::Parse {
            path: origin.to_path_buf(),
            message: e.to_string(),
        })?;

        file.general
            .and_then(|general| general.api_key)
            .map(|key| key.trim().to_string())
            .filter(|key| !key.is_empty())
            .map(Self::new)
            .ok_or_else(|| SecretsError::MissingApiKey {
                path: origin.to_path_buf(),
            })
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    /// First 16 hex chars of the key's SHA-256
    pub fn fingerprint(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.api_key.as_bytes());
        let hash = hasher.finalize();
        format!("{:x}", hash)[..16].to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn origin() -> &'static Path {
        Path::new("secrets.toml")
    }

    #[test]
    fn test_parse_general_api_key() {
        let secrets = Secrets::parse("[general]\napi_key = \"abc123\"\n", origin()).unwrap();
        assert_eq!(secrets.api_key(), "abc123");
    }

    #[test]
    fn test_missing_section_or_key_is_error() {
        for contents in ["", "[other]\napi_key = \"x\"\n", "[general]\n", "[general]\napi_key = \"  \"\n"] {
            let err = Secrets::parse(contents, origin()).unwrap_err();
            assert!(
                matches!(err, SecretsError::MissingApiKey { .. }),
                "unexpected error for {contents:?}: {err}"
            );
        }
    }

    #[test]
    fn test_invalid_toml_is_parse_error() {
        let err = Secrets::parse("[general\napi_key = ", origin()).unwrap_err();
        assert!(matches!(err, SecretsError::Parse { .. }));
    }

    #[test]
    fn test_missing_file_is_read_error() {
        let err = Secrets::load(Path::new("/nonexistent/passage-lens/secrets.toml")).unwrap_err();
        assert!(matches!(err, SecretsError::Read { .. }));
        assert!(err.to_string().contains("/nonexistent/passage-lens/secrets.toml"));
    }

    #[test]
    fn test_fingerprint_is_stable_and_hides_key() {
        let secrets = Secrets::new("my-secret-key");
        let fp = secrets.fingerprint();
        assert_eq!(fp.len(), 16);
        assert!(fp.chars().all(|c| c.is_ascii_hexdigit()));
        assert_eq!(fp, Secrets::new("my-secret-key").fingerprint());
        assert_ne!(fp, Secrets::new("other-key").fingerprint());

        let debug = format!("{:?}", secrets);
        assert!(!debug.contains("my-secret-key"));
    }
}
