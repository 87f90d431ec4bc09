//! Extractive summarization by Latent Semantic Analysis
//!
//! Sentences become columns of a term-frequency matrix (rows are distinct
//! lowercase words). Each sentence is ranked by the
//! length of its vector in the latent topic space spanned by the strongest
//! singular values, and the best sentences are returned verbatim in the
//! order they appear in the passage.
//!
//! The decomposition is cubic in the sentence count, so only the first
//! `sentence_limit` sentences of a passage are ranked.

mod svd;

use rustc_hash::FxHashMap;

use crate::nlp::tokenize::is_word;
use crate::nlp::Tokenizer;

/// Lower bound on latent dimensions kept for ranking
const MIN_DIMENSIONS: usize = 3;
/// Fraction of singular values kept (before applying `MIN_DIMENSIONS`)
const REDUCTION_RATIO: f64 = 1.0;
/// Floor for non-zero term weights after normalization
const TF_SMOOTHING: f64 = 0.4;

/// Sentences ranked when no limit is set
pub const DEFAULT_SENTENCE_LIMIT: usize = 200;

/// LSA sentence extractor
#[derive(Debug, Clone, Copy)]
pub struct LsaSummarizer<'a> {
    tokenizer: &'a Tokenizer,
    sentence_limit: usize,
}

impl<'a> LsaSummarizer<'a> {
    pub fn new(tokenizer: &'a Tokenizer) -> Self {
        Self {
            tokenizer,
            sentence_limit: DEFAULT_SENTENCE_LIMIT,
        }
    }

    /// Rank at most `limit` leading sentences (at least one)
    pub fn with_sentence_limit(mut self, limit: usize) -> Self {
        self.sentence_limit = limit.max(1);
        self
    }

    /// Pick up to `count` sentences of `text`.
    ///
    /// Returns an empty list when the passage has no indexable words.
    pub fn summarize<'t>(&self, text: &'t str, count: usize) -> Vec<&'t str> {
        if count == 0 {
            return Vec::new();
        }

        let mut sentences = self.tokenizer.sentences(text);
        if sentences.len() > self.sentence_limit {
            tracing::warn!(
                sentences = sentences.len(),
                limit = self.sentence_limit,
                "Passage too long to summarize whole; ranking leading sentences only"
            );
            sentences.truncate(self.sentence_limit);
        }

        let Some(ranks) = self.rank(&sentences) else {
            return Vec::new();
        };

        best_in_document_order(&ranks, count)
            .into_iter()
            .map(|index| sentences[index])
            .collect()
    }

    /// Rank each sentence; `None` when there is nothing to index
    fn rank(&self, sentences: &[&str]) -> Option<Vec<f64>> {
        let sentence_terms: Vec<Vec<String>> = sentences
            .iter()
            .map(|sentence| self.terms(sentence))
            .collect();

        let dictionary = build_dictionary(&sentence_terms);
        if dictionary.is_empty() {
            return None;
        }

        let matrix = term_frequency_matrix(&dictionary, &sentence_terms);
        Some(sentence_ranks(&matrix))
    }

    /// Lowercase word tokens of a sentence
    fn terms(&self, sentence: &str) -> Vec<String> {
        self.tokenizer
            .sentence_words(sentence)
            .into_iter()
            .filter(|token| is_word(token))
            .map(|token| token.to_lowercase())
            .collect()
    }
}

/// Map each distinct term to a row index, in first-seen order
fn build_dictionary(sentence_terms: &[Vec<String>]) -> FxHashMap<&str, usize> {
    let mut dictionary = FxHashMap::default();
    for term in sentence_terms.iter().flatten() {
        let next = dictionary.len();
        dictionary.entry(term.as_str()).or_insert(next);
    }
    dictionary
}

/// Term × sentence counts, then per-column smoothing: every cell of a column
/// with a non-zero maximum becomes `TF_SMOOTHING + (1 - TF_SMOOTHING) * count / max`.
fn term_frequency_matrix(
    dictionary: &FxHashMap<&str, usize>,
    sentence_terms: &[Vec<String>],
) -> Vec<Vec<f64>> {
    let mut matrix = vec![vec![0.0; sentence_terms.len()]; dictionary.len()];

    for (col, terms) in sentence_terms.iter().enumerate() {
        for term in terms {
            if let Some(&row) = dictionary.get(term.as_str()) {
                matrix[row][col] += 1.0;
            }
        }
    }

    for col in 0..sentence_terms.len() {
        let max = matrix.iter().map(|row| row[col]).fold(0.0, f64::max);
        if max > 0.0 {
            for row in matrix.iter_mut() {
                row[col] = TF_SMOOTHING + (1.0 - TF_SMOOTHING) * row[col] / max;
            }
        }
    }

    matrix
}

/// Length of each sentence's vector in the reduced topic space
fn sentence_ranks(matrix: &[Vec<f64>]) -> Vec<f64> {
    let decomposition = svd::right_svd(matrix);
    let columns = matrix.first().map_or(0, Vec::len);

    let dimensions = MIN_DIMENSIONS
        .max((decomposition.sigma.len() as f64 * REDUCTION_RATIO) as usize)
        .min(decomposition.sigma.len());

    (0..columns)
        .map(|j| {
            (0..dimensions)
                .map(|k| {
                    let s = decomposition.sigma[k];
                    let v = decomposition.v[k][j];
                    s * s * v * v
                })
                .sum::<f64>()
                .sqrt()
        })
        .collect()
}

/// Indices of the `count` highest ranks (earlier sentence wins a tie),
/// returned in ascending order
fn best_in_document_order(ranks: &[f64], count: usize) -> Vec<usize> {
    let mut order: Vec<usize> = (0..ranks.len()).collect();
    order.sort_by(|&a, &b| ranks[b].total_cmp(&ranks[a]));
    order.truncate(count);
    order.sort_unstable();
    order
}
