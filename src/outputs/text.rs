//! Plain-text rendering of a run for the terminal.

use crate::models::{PipelineResult, SentimentLabel};
use std::fmt::Write;

const SEPARATOR: &str = "-------------------------";

/// Render the report, the label distribution and one block per article.
pub fn render(result: &PipelineResult) -> String {
    let mut out = String::new();
    out.push_str(&result.report_text);
    out.push('\n');

    let _ = writeln!(out, "Sentiment Distribution:");
    for label in [
        SentimentLabel::Positive,
        SentimentLabel::Negative,
        SentimentLabel::Neutral,
    ] {
        let _ = writeln!(out, "{label}: {}", result.sentiment_tally.get(label));
    }
    out.push('\n');

    for article in &result.articles {
        let _ = writeln!(out, "Title: {}", article.title);
        let _ = writeln!(out, "Summary: {}", article.summary);
        let _ = writeln!(out, "Publication Date: {}", article.publication_date);
        let _ = writeln!(
            out,
            "Sentiment: {} (compound {:.4})",
            article.sentiment_label, article.sentiment_scores.compound
        );
        if let Some(relevance) = article.relevance {
            let _ = writeln!(out, "Relevance Score: {relevance}");
        }
        let _ = writeln!(out, "URL: {}", article.url);
        let _ = writeln!(out, "{SEPARATOR}");
    }

    if !result.skipped.is_empty() {
        let _ = writeln!(out, "Skipped {} URL(s):", result.skipped.len());
        for skipped in &result.skipped {
            let _ = writeln!(out, "  {} ({})", skipped.url, skipped.reason);
        }
    }

    match (&result.audio_file_path, &result.synthesis_error) {
        (Some(path), _) => {
            let _ = writeln!(out, "Audio: {path}");
        }
        (None, Some(err)) => {
            let _ = writeln!(out, "Audio unavailable: {err}");
        }
        (None, None) => {}
    }
    out
}
