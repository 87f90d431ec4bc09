//! Config serialization to TOML
//!
//! Single source of truth for config file format.

use super::Config;

impl Config {
    /// Serialize config to TOML string (single source of truth for format)
    pub fn to_toml(&self) -> String {
        format!(
            r#"# passage-lens configuration

# Web UI bind address
bind_addr = "{bind}"

# Largest passage (request body, in bytes) the web UI accepts
max_passage_bytes = {max_passage_bytes}

# Directory for downloaded language data (tokenizer, lexicon, stopwords)
data_dir = "{data_dir}"

# Secrets store holding the book search API key:
#   [general]
#   api_key = "..."
secrets_path = "{secrets_path}"

# ─────────────────────────────────────────────────────────────────────────────
# BOOK SEARCH
# ─────────────────────────────────────────────────────────────────────────────
# One GET per analysis with `q` (the passage) and `key` query parameters.
# Non-200 responses are shown inline; there is no retry.
[books]
api_url = "{books_api_url}"
max_results = {books_max_results}
timeout_secs = {books_timeout_secs}

# Extractive (LSA) summary
# Only the first max_sentences sentences of a passage are ranked.
[summary]
sentences = {summary_sentences}
max_sentences = {summary_max_sentences}

# ─────────────────────────────────────────────────────────────────────────────
# LANGUAGE DATA
# ─────────────────────────────────────────────────────────────────────────────
# Fetched into data_dir on first run when missing.
# stopwords: "nltk" (179 words, downloaded from stopwords_url)
#            or "iso" (stopwords-iso list, no download)
[language]
stopwords = "{stopwords}"
stopwords_url = "{stopwords_url}"
lexicon_url = "{lexicon_url}"

# Logging configuration (RUST_LOG env var overrides)
# level: off, error, warn, info, debug, trace
[logging]
level = "{log_level}"
# JSON file logging (in addition to stdout)
file_enabled = {log_file_enabled}
file_dir = "{log_file_dir}"
file_rotation = "{log_file_rotation}"  # hourly, daily, never
file_prefix = "{log_file_prefix}"
"#,
            bind = self.bind_addr,
            max_passage_bytes = self.max_passage_bytes,
            data_dir = self.data_dir.display(),
            secrets_path = self.secrets_path.display(),
            books_api_url = self.books.api_url,
            books_max_results = self.books.max_results,
            books_timeout_secs = self.books.timeout_secs,
            summary_sentences = self.summary.sentences,
            summary_max_sentences = self.summary.max_sentences,
            stopwords = self.language.stopwords.as_str(),
            stopwords_url = self.language.stopwords_url,
            lexicon_url = self.language.lexicon_url,
            log_level = self.logging.level,
            log_file_enabled = self.logging.file.enabled,
            log_file_dir = self.logging.file.dir.display(),
            log_file_rotation = self.logging.file.rotation.as_str(),
            log_file_prefix = self.logging.file.prefix,
        )
    }

    /// Save current configuration to file
    pub fn save(&self) -> Result<(), std::io::Error> {
        let Some(path) = Self::config_path() else {
            return Err(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "Could not determine config path",
            ));
        };

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(&path, self.to_toml())
    }
}
