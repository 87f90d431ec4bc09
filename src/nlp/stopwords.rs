//! Stopword filtering
//!
//! The stopword package on disk is a plain list, one word per line. By
//! default it is the `english` file from the NLTK stopwords archive,
//! downloaded on first run; the stopwords-iso list bundled with the
//! `stop-words` crate is the offline alternative.

use rustc_hash::FxHashSet;
use stop_words::{get, LANGUAGE};

/// The NLTK English list as it appears in the downloaded package
#[cfg(test)]
pub(crate) const NLTK_ENGLISH: &[&str] = &[
    "i", "me", "my", "myself", "we", "our", "ours", "ourselves", "you", "you're", "you've",
    "you'll", "you'd", "your", "yours", "yourself", "yourselves", "he", "him", "his", "himself",
    "she", "she's", "her", "hers", "herself", "it", "it's", "its", "itself", "they", "them",
    "their", "theirs", "themselves", "what", "which", "who", "whom", "this", "that", "that'll",
    "these", "those", "am", "is", "are", "was", "were", "be", "been", "being", "have", "has",
    "had", "having", "do", "does", "did", "doing", "a", "an", "the", "and", "but", "if", "or",
    "because", "as", "until", "while", "of", "at", "by", "for", "with", "about", "against",
    "between", "into", "through", "during", "before", "after", "above", "below", "to", "from",
    "up", "down", "in", "out", "on", "off", "over", "under", "again", "further", "then", "once",
    "here", "there", "when", "where", "why", "how", "all", "any", "both", "each", "few", "more",
    "most", "other", "some", "such", "no", "nor", "not", "only", "own", "same", "so", "than",
    "too", "very", "s", "t", "can", "will", "just", "don", "don't", "should", "should've", "now",
    "d", "ll", "m", "o", "re", "ve", "y", "ain", "aren", "aren't", "couldn", "couldn't", "didn",
    "didn't", "doesn", "doesn't", "hadn", "hadn't", "hasn", "hasn't", "haven", "haven't", "isn",
    "isn't", "ma", "mightn", "mightn't", "mustn", "mustn't", "needn", "needn't", "shan",
    "shan't", "shouldn", "shouldn't", "wasn", "wasn't", "weren", "weren't", "won", "won't",
    "wouldn", "wouldn't",
];

/// English stopwords-iso list, written to disk when `stopwords = "iso"`
pub fn iso_words() -> Vec<String> {
    get(LANGUAGE::English).iter().map(|s| s.to_string()).collect()
}

/// A case-insensitive set of stopwords
#[derive(Debug, Clone, Default)]
pub struct StopwordSet {
    /// Set of stopwords (lowercase)
    words: FxHashSet<String>,
}

impl StopwordSet {
    /// Create a stopword set from a list of words
    pub fn from_list<S: AsRef<str>>(words: &[S]) -> Self {
        Self {
            words: words
                .iter()
                .map(|w| w.as_ref().trim().to_lowercase())
                .filter(|w| !w.is_empty())
                .collect(),
        }
    }

    /// Parse the on-disk format: one word per line, blank lines ignored
    pub fn parse(contents: &str) -> Self {
        let lines: Vec<&str> = contents.lines().collect();
        Self::from_list(&lines)
    }

    /// Check if a word is a stopword
    pub fn is_stopword(&self, word: &str) -> bool {
        self.words.contains(&word.to_lowercase())
    }

    /// Get the number of stopwords in the set
    pub fn len(&self) -> usize {
        self.words.len()
    }

    /// Check if the set is empty
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}
