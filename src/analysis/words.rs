//! Word counts over Treebank tokens
//!
//! A token counts as a word unless it is a substring of the ASCII
//! punctuation string. Quote tokens such as `` `` `` and ellipses are
//! therefore counted, matching the reference tokenizer's behavior.

use serde::Serialize;

use crate::nlp::tokenize::is_punctuation;
use crate::nlp::{StopwordSet, Tokenizer};

/// Both counts for one passage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct WordCounts {
    pub total: usize,
    pub without_stopwords: usize,
}

/// Number of non-punctuation tokens
pub fn count_words(tokenizer: &Tokenizer, passage: &str) -> usize {
    tokenizer
        .words(passage)
        .iter()
        .filter(|token| !is_punctuation(token))
        .count()
}

/// Number of non-punctuation tokens whose lowercase form is not a stopword
pub fn count_words_without_stopwords(
    tokenizer: &Tokenizer,
    stopwords: &StopwordSet,
    passage: &str,
) -> usize {
    tokenizer
        .words(passage)
        .iter()
        .filter(|token| !is_punctuation(token) && !stopwords.is_stopword(token))
        .count()
}

/// Both counts for a passage
pub fn word_counts(tokenizer: &Tokenizer, stopwords: &StopwordSet, passage: &str) -> WordCounts {
    WordCounts {
        total: count_words(tokenizer, passage),
        without_stopwords: count_words_without_stopwords(tokenizer, stopwords, passage),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nlp::stopwords::NLTK_ENGLISH;
    use crate::nlp::tokenize::DEFAULT_ABBREVIATIONS;

    fn fixtures() -> (Tokenizer, StopwordSet) {
        (
            Tokenizer::new(DEFAULT_ABBREVIATIONS.iter().copied()).unwrap(),
            StopwordSet::from_list(NLTK_ENGLISH),
        )
    }

    #[test]
    fn test_counts_exclude_punctuation() {
        let (tokenizer, stopwords) = fixtures();
        let text = "The quick brown fox jumps over the lazy dog.";

        assert_eq!(count_words(&tokenizer, text), 9);
        assert_eq!(count_words_without_stopwords(&tokenizer, &stopwords, text), 6);
    }

    #[test]
    fn test_contraction_halves_are_separate_words() {
        let (tokenizer, stopwords) = fixtures();
        let text = "I don't know.";

        // I / do / n't / know
        assert_eq!(count_words(&tokenizer, text), 4);
        // "n't" is not itself on the stopword list
        assert_eq!(count_words_without_stopwords(&tokenizer, &stopwords, text), 2);
    }

    #[test]
    fn test_ellipsis_counts_as_word() {
        let (tokenizer, stopwords) = fixtures();
        let text = "Wait... what?";

        assert_eq!(count_words(&tokenizer, text), 3);
        assert_eq!(count_words_without_stopwords(&tokenizer, &stopwords, text), 2);
    }

    #[test]
    fn test_pronoun_before_period_is_a_stopword() {
        let (tokenizer, stopwords) = fixtures();
        let text = "So did I. We left.";

        assert_eq!(count_words(&tokenizer, text), 5);
        // so / did / i / we are stopwords; "I." must not survive as one token
        assert_eq!(count_words_without_stopwords(&tokenizer, &stopwords, text), 1);
    }

    #[test]
    fn test_empty_passage_has_no_words() {
        let (tokenizer, stopwords) = fixtures();
        assert_eq!(
            word_counts(&tokenizer, &stopwords, ""),
            WordCounts {
                total: 0,
                without_stopwords: 0
            }
        );
    }

    #[test]
    fn test_total_never_below_content_count() {
        let (tokenizer, stopwords) = fixtures();
        let passages = [
            "It was the best of times, it was the worst of times.",
            "Call me Ishmael. Some years ago, never mind how long precisely...",
            "\"Hello,\" she said -- and then (quietly) left!",
            "THE THE THE",
            "Mr. Smith went to Washington on Jan. 5th.",
        ];

        for passage in passages {
            let counts = word_counts(&tokenizer, &stopwords, passage);
            assert!(counts.total >= counts.without_stopwords, "{passage}");
        }
    }
}
