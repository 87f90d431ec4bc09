//! Language data packages under the data directory
//!
//! Three packages are needed before any passage can be analyzed:
//!
//! | package   | path                              | origin                                  |
//! |-----------|-----------------------------------|-----------------------------------------|
//! | tokenizer | `tokenizers/abbreviations.txt`    | seeded from built-in list               |
//! | lexicon   | `sentiment/vader_lexicon.txt`     | downloaded from `lexicon_url`           |
//! | stopwords | `corpora/stopwords/english`       | `english` member of `stopwords_url` zip |
//!
//! With `stopwords = "iso"` the stopword package is seeded from the
//! stopwords-iso list instead and nothing is downloaded for it.
//!
//! `ensure_all` fills in whatever is missing; `load` reads everything into
//! memory once at startup.

use std::fmt;
use std::io::{Cursor, Read};
use std::path::{Path, PathBuf};

use crate::config::{Config, StopwordSource};
use crate::nlp::stopwords::iso_words;
use crate::nlp::tokenize::DEFAULT_ABBREVIATIONS;
use crate::nlp::{StopwordSet, Tokenizer};
use crate::sentiment::{Lexicon, SentimentAnalyzer};

/// One language-data package
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Package {
    Tokenizer,
    Lexicon,
    Stopwords,
}

impl Package {
    pub const ALL: [Package; 3] = [Package::Tokenizer, Package::Lexicon, Package::Stopwords];

    pub fn name(&self) -> &'static str {
        match self {
            Package::Tokenizer => "tokenizer",
            Package::Lexicon => "lexicon",
            Package::Stopwords => "stopwords",
        }
    }

    /// Location relative to the data directory
    pub fn relative_path(&self) -> &'static str {
        match self {
            Package::Tokenizer => "tokenizers/abbreviations.txt",
            Package::Lexicon => "sentiment/vader_lexicon.txt",
            Package::Stopwords => "corpora/stopwords/english",
        }
    }

    pub fn path_in(&self, data_dir: &Path) -> PathBuf {
        data_dir.join(self.relative_path())
    }
}

/// Errors fetching or loading language data
#[derive(Debug)]
pub enum ResourceError {
    /// Filesystem error
    Io { path: PathBuf, message: String },
    /// Request could not be completed
    Network { url: String, message: String },
    /// Server answered with a non-2xx status
    Status { url: String, status: u16 },
    /// Downloaded archive is unreadable or lacks the expected member
    Archive { url: String, message: String },
    /// Package still absent when loading
    Missing { package: &'static str, path: PathBuf },
    /// Tokenizer patterns failed to compile
    Tokenizer(String),
}

impl fmt::Display for ResourceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, message } => write!(f, "I/O error on {}: {}", path.display(), message),
            Self::Network { url, message } => write!(f, "Download of {} failed: {}", url, message),
            Self::Status { url, status } => {
                write!(f, "Download of {} returned HTTP {}", url, status)
            }
            Self::Archive { url, message } => write!(f, "Archive from {}: {}", url, message),
            Self::Missing { package, path } => write!(
                f,
                "Language data '{}' not found at {} (run `passage-lens fetch-data`)",
                package,
                path.display()
            ),
            Self::Tokenizer(msg) => write!(f, "Tokenizer setup failed: {}", msg),
        }
    }
}

impl std::error::Error for ResourceError {}

/// Everything the analysis pipeline reads from the data directory
#[derive(Debug)]
pub struct LanguageData {
    pub tokenizer: Tokenizer,
    pub analyzer: SentimentAnalyzer,
    pub stopwords: StopwordSet,
}

/// Fetch or seed every missing package. Returns the packages that were created.
pub async fn ensure_all(
    config: &Config,
    client: &reqwest::Client,
) -> Result<Vec<Package>, ResourceError> {
    let mut created = Vec::new();

    for package in Package::ALL {
        let path = package.path_in(&config.data_dir);
        if path.exists() {
            tracing::debug!("Language data '{}' present at {}", package.name(), path.display());
            continue;
        }

        let (contents, origin) = match package {
            Package::Tokenizer => (lines(DEFAULT_ABBREVIATIONS.iter().copied()), "built-in list"),
            Package::Stopwords => match config.language.stopwords {
                StopwordSource::Nltk => {
                    let url = &config.language.stopwords_url;
                    let archive = download_bytes(client, url).await?;
                    (extract_member(url, archive, STOPWORDS_MEMBER)?, url.as_str())
                }
                StopwordSource::Iso => (lines(iso_words()), "stopwords-iso"),
            },
            Package::Lexicon => (
                download_text(client, &config.language.lexicon_url).await?,
                config.language.lexicon_url.as_str(),
            ),
        };

        write_atomic(&path, &contents)?;
        tracing::info!(
            "Language data '{}' written to {} (from {})",
            package.name(),
            path.display(),
            origin
        );
        created.push(package);
    }

    Ok(created)
}

/// Read all packages into memory
pub fn load(config: &Config) -> Result<LanguageData, ResourceError> {
    let abbreviations = read_package(&config.data_dir, Package::Tokenizer)?;
    let lexicon = read_package(&config.data_dir, Package::Lexicon)?;
    let stopwords = read_package(&config.data_dir, Package::Stopwords)?;

    let tokenizer = Tokenizer::new(
        abbreviations
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.starts_with('#')),
    )
    .map_err(|e| ResourceError::Tokenizer(e.to_string()))?;

    let lexicon = Lexicon::parse(&lexicon);
    if lexicon.is_empty() {
        tracing::warn!(
            "Sentiment lexicon at {} has no entries; every passage will score neutral",
            Package::Lexicon.path_in(&config.data_dir).display()
        );
    }
    let analyzer = SentimentAnalyzer::new(lexicon);
    let stopwords = StopwordSet::parse(&stopwords);

    tracing::debug!(
        abbreviations = tokenizer.abbreviation_count(),
        lexicon = analyzer.lexicon_len(),
        stopwords = stopwords.len(),
        "Language data loaded"
    );

    Ok(LanguageData {
        tokenizer,
        analyzer,
        stopwords,
    })
}

fn read_package(data_dir: &Path, package: Package) -> Result<String, ResourceError> {
    let path = package.path_in(data_dir);
    std::fs::read_to_string(&path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            ResourceError::Missing {
                package: package.name(),
                path,
            }
        } else {
            ResourceError::Io {
                path,
                message: e.to_string(),
            }
        }
    })
}

/// Path of the English list inside the NLTK stopwords archive
const STOPWORDS_MEMBER: &str = "stopwords/english";

fn network_error(url: &str) -> impl Fn(reqwest::Error) -> ResourceError + '_ {
    move |e| ResourceError::Network {
        url: url.to_string(),
        message: e.to_string(),
    }
}

async fn get_ok(client: &reqwest::Client, url: &str) -> Result<reqwest::Response, ResourceError> {
    let response = client.get(url).send().await.map_err(network_error(url))?;
    let status = response.status();
    if !status.is_success() {
        return Err(ResourceError::Status {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }
    Ok(response)
}

async fn download_text(client: &reqwest::Client, url: &str) -> Result<String, ResourceError> {
    get_ok(client, url)
        .await?
        .text()
        .await
        .map_err(network_error(url))
}

async fn download_bytes(client: &reqwest::Client, url: &str) -> Result<Vec<u8>, ResourceError> {
    let bytes = get_ok(client, url)
        .await?
        .bytes()
        .await
        .map_err(network_error(url))?;
    Ok(bytes.to_vec())
}

/// Read one text member out of a zip archive held in memory
fn extract_member(url: &str, archive: Vec<u8>, member: &str) -> Result<String, ResourceError> {
    let archive_error = |message: String| ResourceError::Archive {
        url: url.to_string(),
        message,
    };

    let mut archive = zip::ZipArchive::new(Cursor::new(archive))
        .map_err(|e| archive_error(e.to_string()))?;
    let mut file = archive
        .by_name(member)
        .map_err(|e| archive_error(format!("{}: {}", member, e)))?;

    let mut contents = String::new();
    file.read_to_string(&mut contents)
        .map_err(|e| archive_error(format!("{}: {}", member, e)))?;
    Ok(contents)
}

fn lines<I, S>(words: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    words.into_iter().fold(String::new(), |mut acc, word| {
        acc.push_str(word.as_ref());
        acc.push('\n');
        acc
    })
}

/// Write via a sibling temp file so an interrupted fetch never leaves a
/// truncated package behind
fn write_atomic(path: &Path, contents: &str) -> Result<(), ResourceError> {
    let io = |path: &Path| {
        let path = path.to_path_buf();
        move |e: std::io::Error| ResourceError::Io {
            path,
            message: e.to_string(),
        }
    };

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(io(parent))?;
    }

    let partial = path.with_extension("part");
    std::fs::write(&partial, contents).map_err(io(&partial))?;
    std::fs::rename(&partial, path).map_err(io(path))
}
