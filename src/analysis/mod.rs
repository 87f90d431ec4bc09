//! Passage analysis flow
//!
//! A passage yields four results, reported in a fixed order: word counts,
//! emotion, book search, summary. The three local analyses are CPU-bound
//! (the summary's SVD is cubic in sentence count) and run together on the
//! blocking pool while the book search is in flight. A blank passage stops
//! before any of them (and before any outbound request).

pub mod emotion;
pub mod render;
pub mod words;

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::books::{BookSearch, BookSearchClient, BookSearchError};
use crate::resources::LanguageData;
use crate::sentiment::PolarityScores;
use crate::summarize::LsaSummarizer;
use crate::util::log_preview;

use emotion::Emotion;
use words::WordCounts;

pub const EMPTY_PASSAGE_WARNING: &str = "Please enter a passage to analyze.";

/// Everything computed for a non-empty passage
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisReport {
    pub words: WordCounts,
    pub emotion: Emotion,
    pub polarity: PolarityScores,
    pub books: BookSearch,
    /// Extracted sentences, in document order
    pub summary: Vec<String>,
    pub analyzed_at: DateTime<Utc>,
}

impl AnalysisReport {
    /// Summary sentences joined with single spaces
    pub fn summary_text(&self) -> String {
        self.summary.join(" ")
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum AnalysisOutcome {
    EmptyPassage { warning: &'static str },
    Report(AnalysisReport),
}

impl AnalysisOutcome {
    pub fn empty() -> Self {
        AnalysisOutcome::EmptyPassage {
            warning: EMPTY_PASSAGE_WARNING,
        }
    }
}

/// Why a passage produced no report
#[derive(Debug)]
pub enum AnalysisError {
    /// The book search could not complete
    Search(BookSearchError),
    /// The local analysis task panicked or was cancelled
    Worker(String),
}

impl fmt::Display for AnalysisError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Search(err) => write!(f, "{}", err),
            Self::Worker(msg) => write!(f, "Analysis worker failed: {}", msg),
        }
    }
}

impl std::error::Error for AnalysisError {}

impl From<BookSearchError> for AnalysisError {
    fn from(err: BookSearchError) -> Self {
        AnalysisError::Search(err)
    }
}

/// Summary length settings handed to the analyzer
#[derive(Debug, Clone, Copy)]
pub struct SummaryLength {
    /// Sentences extracted
    pub sentences: usize,
    /// Leading sentences ranked
    pub limit: usize,
}

/// Results that need only the passage and the language data
struct LocalAnalysis {
    words: WordCounts,
    polarity: PolarityScores,
    emotion: Emotion,
    summary: Vec<String>,
}

fn analyze_locally(language: &LanguageData, passage: &str, length: SummaryLength) -> LocalAnalysis {
    let words = words::word_counts(&language.tokenizer, &language.stopwords, passage);

    let polarity = language.analyzer.polarity_scores(passage);
    let emotion = emotion::classify(&polarity);
    tracing::debug!(
        compound = polarity.compound,
        pos = polarity.pos,
        neg = polarity.neg,
        "Emotion: {}",
        emotion
    );

    let summary = LsaSummarizer::new(&language.tokenizer)
        .with_sentence_limit(length.limit)
        .summarize(passage, length.sentences)
        .into_iter()
        .map(str::to_string)
        .collect();

    LocalAnalysis {
        words,
        polarity,
        emotion,
        summary,
    }
}

/// Runs the analysis flow with shared language data
#[derive(Debug, Clone)]
pub struct Analyzer {
    language: Arc<LanguageData>,
    books: BookSearchClient,
    summary: SummaryLength,
}

impl Analyzer {
    pub fn new(language: Arc<LanguageData>, books: BookSearchClient, summary: SummaryLength) -> Self {
        Self {
            language,
            books,
            summary,
        }
    }

    /// Analyze a passage.
    ///
    /// Fails when the book search cannot complete (network failure or a
    /// malformed 200 body); a non-200 status is part of the report.
    pub async fn analyze(&self, passage: &str) -> Result<AnalysisOutcome, AnalysisError> {
        if passage.trim().is_empty() {
            tracing::debug!("Empty passage, skipping analysis");
            return Ok(AnalysisOutcome::empty());
        }

        tracing::info!(
            bytes = passage.len(),
            preview = %log_preview(passage, 48),
            "Analyzing passage"
        );

        let language = Arc::clone(&self.language);
        let owned = passage.to_string();
        let length = self.summary;
        let local = tokio::task::spawn_blocking(move || analyze_locally(&language, &owned, length));

        let (local, books) = tokio::join!(local, self.books.search(passage));
        let books = books?;
        let local = local.map_err(|e| AnalysisError::Worker(e.to_string()))?;

        Ok(AnalysisOutcome::Report(AnalysisReport {
            words: local.words,
            emotion: local.emotion,
            polarity: local.polarity,
            books,
            summary: local.summary,
            analyzed_at: Utc::now(),
        }))
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::config::BooksConfig;
    use crate::nlp::stopwords::NLTK_ENGLISH;
    use crate::nlp::tokenize::DEFAULT_ABBREVIATIONS;
    use crate::nlp::{StopwordSet, Tokenizer};
    use crate::sentiment::{Lexicon, SentimentAnalyzer};
    use axum::{routing::get, Json, Router};
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::net::TcpListener;

    const LEXICON: &str = "good\t1.9\t0.9434\t[2]\n\
                           happy\t2.7\t0.78102\t[3]\n\
                           sad\t-2.1\t0.7\t[-2]\n\
                           terrible\t-2.1\t0.83066\t[-2]\n";

    pub(crate) fn language_data() -> Arc<LanguageData> {
        Arc::new(LanguageData {
            tokenizer: Tokenizer::new(DEFAULT_ABBREVIATIONS.iter().copied()).unwrap(),
            analyzer: SentimentAnalyzer::new(Lexicon::parse(LEXICON)),
            stopwords: StopwordSet::from_list(NLTK_ENGLISH),
        })
    }

    /// Stub volumes endpoint returning four books and counting hits
    pub(crate) async fn stub_books(hits: Arc<AtomicUsize>) -> String {
        let app = Router::new().route(
            "/volumes",
            get(move || {
                let hits = hits.clone();
                async move {
                    hits.fetch_add(1, Ordering::SeqCst);
                    Json(json!({
                        "items": [
                            { "volumeInfo": { "title": "One", "authors": ["A"] } },
                            { "volumeInfo": { "title": "Two" } },
                            { "volumeInfo": { "authors": ["C", "D"] } },
                            { "volumeInfo": { "title": "Four" } }
                        ]
                    }))
                }
            }),
        );

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}/volumes", addr)
    }

    pub(crate) fn analyzer_for(api_url: String) -> Analyzer {
        let config = BooksConfig {
            api_url,
            ..BooksConfig::default()
        };
        let books = BookSearchClient::new(reqwest::Client::new(), &config, "test-key");
        Analyzer::new(
            language_data(),
            books,
            SummaryLength {
                sentences: 3,
                limit: 200,
            },
        )
    }

    #[tokio::test]
    async fn test_blank_passage_skips_everything() {
        let hits = Arc::new(AtomicUsize::new(0));
        let analyzer = analyzer_for(stub_books(hits.clone()).await);

        for passage in ["", "   ", "\n\t \n"] {
            let outcome = analyzer.analyze(passage).await.unwrap();
            assert!(matches!(
                outcome,
                AnalysisOutcome::EmptyPassage {
                    warning: EMPTY_PASSAGE_WARNING
                }
            ));
        }
        assert_eq!(hits.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_full_report() {
        let hits = Arc::new(AtomicUsize::new(0));
        let analyzer = analyzer_for(stub_books(hits.clone()).await);

        let passage = "The day was good. Everyone felt happy and good. \
                       The dog slept in the sun. Birds sang over the river. \
                       Nobody wanted the day to end.";
        let outcome = analyzer.analyze(passage).await.unwrap();
        let report = match outcome {
            AnalysisOutcome::Report(report) => report,
            other => panic!("expected report, got {:?}", other),
        };

        assert_eq!(hits.load(Ordering::SeqCst), 1);
        assert!(report.words.total >= report.words.without_stopwords);
        assert_eq!(report.emotion, Emotion::Joy);

        match &report.books {
            BookSearch::Found { matches } => {
                assert_eq!(matches.len(), 3);
                assert_eq!(matches[2].title, crate::books::NO_TITLE);
            }
            other => panic!("expected matches, got {:?}", other),
        }

        assert_eq!(report.summary.len(), 3);
        for sentence in &report.summary {
            assert!(passage.contains(sentence.as_str()));
        }
    }

    #[tokio::test]
    async fn test_negative_passage_is_sadness() {
        let hits = Arc::new(AtomicUsize::new(0));
        let analyzer = analyzer_for(stub_books(hits).await);

        let outcome = analyzer.analyze("It was a sad and terrible day.").await.unwrap();
        match outcome {
            AnalysisOutcome::Report(report) => assert_eq!(report.emotion, Emotion::Sadness),
            other => panic!("expected report, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_search_failure_fails_analysis() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let analyzer = analyzer_for(format!("http://{}/volumes", addr));
        let err = analyzer.analyze("Some text.").await.unwrap_err();
        assert!(matches!(err, AnalysisError::Search(BookSearchError::Network(_))));
    }

    #[tokio::test]
    async fn test_long_passage_summary_comes_from_leading_sentences() {
        let hits = Arc::new(AtomicUsize::new(0));
        let config = BooksConfig {
            api_url: stub_books(hits).await,
            ..BooksConfig::default()
        };
        let books = BookSearchClient::new(reqwest::Client::new(), &config, "test-key");
        let analyzer = Analyzer::new(
            language_data(),
            books,
            SummaryLength {
                sentences: 3,
                limit: 10,
            },
        );

        let passage = (0..2_000)
            .map(|i| format!("Line {} was good and happy.", i))
            .collect::<Vec<_>>()
            .join(" ");
        let report = match analyzer.analyze(&passage).await.unwrap() {
            AnalysisOutcome::Report(report) => report,
            other => panic!("expected report, got {:?}", other),
        };

        // Counts and emotion still cover the whole passage
        assert_eq!(report.words.total, 2_000 * 6);
        assert_eq!(report.emotion, Emotion::Joy);
        assert_eq!(report.summary.len(), 3);
        let cutoff = passage.find("Line 10 ").unwrap();
        for sentence in &report.summary {
            assert!(passage.find(sentence.as_str()).unwrap() < cutoff, "{sentence}");
        }
    }

    #[test]
    fn test_outcome_json_shape() {
        let value = serde_json::to_value(AnalysisOutcome::empty()).unwrap();
        assert_eq!(
            value,
            json!({ "status": "empty_passage", "warning": "Please enter a passage to analyze." })
        );
    }
}
