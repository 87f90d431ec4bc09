//! Analysis configuration: book search, summary length, language data sources

use serde::Deserialize;

use crate::summarize::DEFAULT_SENTENCE_LIMIT;

/// Google Books volumes endpoint
pub const DEFAULT_BOOKS_API_URL: &str = "https://www.googleapis.com/books/v1/volumes";

/// Raw VADER lexicon (tab-separated token, mean, std-dev, ratings)
pub const DEFAULT_LEXICON_URL: &str =
    "https://raw.githubusercontent.com/cjhutto/vaderSentiment/master/vaderSentiment/vader_lexicon.txt";

/// NLTK stopwords corpus archive; the English list is `stopwords/english`
pub const DEFAULT_STOPWORDS_URL: &str =
    "https://raw.githubusercontent.com/nltk/nltk_data/gh-pages/packages/corpora/stopwords.zip";

/// Hard ceiling on book matches shown, whatever the config says
pub const MAX_BOOK_RESULTS: usize = 3;

// ─────────────────────────────────────────────────────────────────────────────
// Book Search
// ─────────────────────────────────────────────────────────────────────────────

/// Book search API settings
#[derive(Debug, Clone)]
pub struct BooksConfig {
    /// Search endpoint; receives `q` and `key` query parameters
    pub api_url: String,
    /// Matches shown, regardless of how many the API returns (at most
    /// `MAX_BOOK_RESULTS`)
    pub max_results: usize,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for BooksConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_BOOKS_API_URL.to_string(),
            max_results: MAX_BOOK_RESULTS,
            timeout_secs: 30,
        }
    }
}

/// Book search settings as loaded from config file
#[derive(Debug, Deserialize, Default)]
pub struct FileBooksConfig {
    pub api_url: Option<String>,
    pub max_results: Option<usize>,
    pub timeout_secs: Option<u64>,
}

impl BooksConfig {
    /// Create from file config with defaults
    pub fn from_file(file: Option<FileBooksConfig>) -> Self {
        let file = file.unwrap_or_default();
        let defaults = Self::default();

        Self {
            api_url: file.api_url.unwrap_or(defaults.api_url),
            max_results: file
                .max_results
                .map_or(defaults.max_results, |n| n.min(MAX_BOOK_RESULTS)),
            timeout_secs: file.timeout_secs.unwrap_or(defaults.timeout_secs),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Summary
// ─────────────────────────────────────────────────────────────────────────────

/// Extractive summary settings
#[derive(Debug, Clone)]
pub struct SummaryConfig {
    /// Number of sentences to extract
    pub sentences: usize,
    /// Only the leading `max_sentences` sentences are ranked; the SVD grows
    /// with the cube of this number
    pub max_sentences: usize,
}

impl Default for SummaryConfig {
    fn default() -> Self {
        Self {
            sentences: 3,
            max_sentences: DEFAULT_SENTENCE_LIMIT,
        }
    }
}

/// Summary settings as loaded from config file
#[derive(Debug, Deserialize, Default)]
pub struct FileSummaryConfig {
    pub sentences: Option<usize>,
    pub max_sentences: Option<usize>,
}

impl SummaryConfig {
    /// Create from file config with defaults
    pub fn from_file(file: Option<FileSummaryConfig>) -> Self {
        let file = file.unwrap_or_default();
        let defaults = Self::default();

        Self {
            sentences: file.sentences.unwrap_or(defaults.sentences),
            max_sentences: file.max_sentences.unwrap_or(defaults.max_sentences).max(1),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Language Data
// ─────────────────────────────────────────────────────────────────────────────

/// Where the stopword package comes from on first run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StopwordSource {
    /// The 179-word NLTK English list, downloaded from `stopwords_url`
    #[default]
    Nltk,
    /// The larger stopwords-iso English list from the `stop-words` crate
    Iso,
}

impl StopwordSource {
    /// Parse source string from config
    pub fn parse(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "iso" => Self::Iso,
            _ => Self::Nltk,
        }
    }

    /// Convert to string for TOML serialization
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Nltk => "nltk",
            Self::Iso => "iso",
        }
    }
}

/// Language data sources
#[derive(Debug, Clone)]
pub struct LanguageConfig {
    /// Source of `corpora/stopwords/english`
    pub stopwords: StopwordSource,
    /// Download URL for the NLTK stopwords archive
    pub stopwords_url: String,
    /// Download URL for the sentiment lexicon
    pub lexicon_url: String,
}

impl Default for LanguageConfig {
    fn default() -> Self {
        Self {
            stopwords: StopwordSource::default(),
            stopwords_url: DEFAULT_STOPWORDS_URL.to_string(),
            lexicon_url: DEFAULT_LEXICON_URL.to_string(),
        }
    }
}

/// Language settings as loaded from config file
#[derive(Debug, Deserialize, Default)]
pub struct FileLanguageConfig {
    pub stopwords: Option<String>,
    pub stopwords_url: Option<String>,
    pub lexicon_url: Option<String>,
}

impl LanguageConfig {
    /// Create from file config with defaults
    pub fn from_file(file: Option<FileLanguageConfig>) -> Self {
        let file = file.unwrap_or_default();
        let defaults = Self::default();

        Self {
            stopwords: file
                .stopwords
                .map(|s| StopwordSource::parse(&s))
                .unwrap_or(defaults.stopwords),
            stopwords_url: file.stopwords_url.unwrap_or(defaults.stopwords_url),
            lexicon_url: file.lexicon_url.unwrap_or(defaults.lexicon_url),
        }
    }
}
