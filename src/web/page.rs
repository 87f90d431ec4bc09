//! Server-rendered HTML for the single analysis page

use std::fmt::Write;

use crate::analysis::render::sections;
use crate::analysis::AnalysisOutcome;

const TITLE: &str = "Text Analysis Application";

const STYLE: &str = "\
body { font-family: sans-serif; max-width: 760px; margin: 2rem auto; padding: 0 1rem; color: #262730; }
textarea { width: 100%; height: 200px; font: inherit; padding: .5rem; box-sizing: border-box; }
button { margin-top: .75rem; padding: .4rem 1.2rem; font: inherit; cursor: pointer; }
section { margin-top: 1.25rem; }
section p { margin: .2rem 0; white-space: pre-wrap; }
.warning { background: #fffbe6; border-left: 4px solid #f5c518; padding: .6rem 1rem; }
";

/// Escape text for HTML element content and attribute values
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

/// The full page: input form, plus results when a passage was submitted
pub fn render(passage: &str, outcome: Option<&AnalysisOutcome>) -> String {
    let mut html = String::new();

    let _ = write!(
        html,
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <title>{TITLE}</title>\n<style>\n{STYLE}</style>\n</head>\n<body>\n\
         <h1>{TITLE}</h1>\n\
         <form method=\"post\" action=\"/analyze\">\n\
         <label for=\"passage\">Enter your passage here:</label>\n\
         <textarea id=\"passage\" name=\"passage\">{}</textarea>\n\
         <button type=\"submit\">Analyze</button>\n\
         </form>\n",
        escape(passage)
    );

    match outcome {
        None => {}
        Some(AnalysisOutcome::EmptyPassage { warning }) => {
            let _ = writeln!(html, "<div class=\"warning\">{}</div>", escape(warning));
        }
        Some(AnalysisOutcome::Report(report)) => {
            for section in sections(report) {
                html.push_str("<section>\n");
                if let Some(heading) = &section.heading {
                    let _ = writeln!(html, "<h3>{}</h3>", escape(heading));
                }
                for line in &section.lines {
                    let _ = writeln!(html, "<p>{}</p>", escape(line));
                }
                html.push_str("</section>\n");
            }
        }
    }

    html.push_str("</body>\n</html>\n");
    html
}
