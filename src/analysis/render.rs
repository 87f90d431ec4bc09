//! Plain-text rendering of an analysis outcome
//!
//! The same lines back the terminal output of `passage-lens analyze` and the
//! result panel of the web page (which escapes them for HTML).

use crate::books::BookSearch;

use super::{AnalysisOutcome, AnalysisReport, EMPTY_PASSAGE_WARNING};

pub const RESULTS_HEADER: &str = "=== Text Analysis Results ===";
pub const BOOKS_HEADER: &str = "Possible books the passage might be from:";
pub const SUMMARY_HEADER: &str = "Summary:";

/// One rendered section: a heading line followed by body lines
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    pub heading: Option<String>,
    pub lines: Vec<String>,
}

impl Section {
    fn new(heading: Option<&str>, lines: Vec<String>) -> Self {
        Self {
            heading: heading.map(str::to_string),
            lines,
        }
    }
}

/// Split a report into its four labeled sections, in display order
pub fn sections(report: &AnalysisReport) -> Vec<Section> {
    let counts = Section::new(
        Some(RESULTS_HEADER),
        vec![
            format!("Total number of words: {}", report.words.total),
            format!(
                "Total number of words (without stopwords): {}",
                report.words.without_stopwords
            ),
        ],
    );

    let emotion = Section::new(None, vec![format!("Predominant emotion: {}", report.emotion)]);

    let book_lines = match &report.books {
        BookSearch::Found { matches } => matches
            .iter()
            .flat_map(|book| {
                [
                    format!("- Title: {}", book.title),
                    format!("  Authors: {}", book.authors_line()),
                ]
            })
            .collect(),
        BookSearch::Failed { status } => vec![format!("Error: {}", status)],
    };
    let books = Section::new(Some(BOOKS_HEADER), book_lines);

    let summary = Section::new(Some(SUMMARY_HEADER), vec![report.summary_text()]);

    vec![counts, emotion, books, summary]
}

/// Render an outcome as terminal text
pub fn render_text(outcome: &AnalysisOutcome) -> String {
    let report = match outcome {
        AnalysisOutcome::EmptyPassage { .. } => return format!("{}\n", EMPTY_PASSAGE_WARNING),
        AnalysisOutcome::Report(report) => report,
    };

    let mut out = String::new();
    for section in sections(report) {
        if let Some(heading) = &section.heading {
            out.push_str(heading);
            out.push('\n');
        }
        for line in &section.lines {
            out.push_str(line);
            out.push('\n');
        }
    }
    out
}
