//! Data models shared by the pipeline stages.
//!
//! - [`ArticleFields`]: best-effort metadata pulled out of a fetched page
//! - [`Article`]: a surviving article with its sentiment attached
//! - [`SentimentTally`]: label counts over the surviving articles
//! - [`PipelineResult`]: everything one run hands back to its caller
//!
//! Serialized field names are camelCase to match the response shape consumed
//! by the HTTP API and the JSON output files.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Placeholder title used when a page has no `<title>` element.
pub const NO_TITLE: &str = "No Title Found";

/// Metadata extracted from one fetched document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArticleFields {
    pub title: String,
    pub summary: String,
    pub publication_date: String,
}

/// Discrete sentiment label derived from a compound score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SentimentLabel {
    Positive,
    Negative,
    Neutral,
}

impl SentimentLabel {
    /// Lower bound (inclusive) of the positive band.
    pub const POSITIVE_THRESHOLD: f64 = 0.05;
    /// Upper bound (inclusive) of the negative band.
    pub const NEGATIVE_THRESHOLD: f64 = -0.05;

    /// Map a compound score onto a label, with a neutral dead-zone around zero.
    pub fn from_compound(compound: f64) -> Self {
        if compound >= Self::POSITIVE_THRESHOLD {
            SentimentLabel::Positive
        } else if compound <= Self::NEGATIVE_THRESHOLD {
            SentimentLabel::Negative
        } else {
            SentimentLabel::Neutral
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SentimentLabel::Positive => "Positive",
            SentimentLabel::Negative => "Negative",
            SentimentLabel::Neutral => "Neutral",
        }
    }
}

impl fmt::Display for SentimentLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-dimension polarity scores for a piece of text.
///
/// `neg`, `neu` and `pos` are proportions summing to roughly 1.0;
/// `compound` is the normalized overall polarity in `[-1, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SentimentScores {
    pub neg: f64,
    pub neu: f64,
    pub pos: f64,
    pub compound: f64,
}

/// A scraped article that survived the content gate and has been classified.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    pub title: String,
    pub summary: String,
    pub publication_date: String,
    pub url: String,
    pub sentiment_label: SentimentLabel,
    pub sentiment_scores: SentimentScores,
    /// Token-set similarity to the query term, only set when ranking ran.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub relevance: Option<u8>,
}

/// Label counts over the articles of a single run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SentimentTally {
    #[serde(rename = "Positive")]
    pub positive: usize,
    #[serde(rename = "Negative")]
    pub negative: usize,
    #[serde(rename = "Neutral")]
    pub neutral: usize,
}

impl SentimentTally {
    pub fn increment(&mut self, label: SentimentLabel) {
        match label {
            SentimentLabel::Positive => self.positive += 1,
            SentimentLabel::Negative => self.negative += 1,
            SentimentLabel::Neutral => self.neutral += 1,
        }
    }

    pub fn get(&self, label: SentimentLabel) -> usize {
        match label {
            SentimentLabel::Positive => self.positive,
            SentimentLabel::Negative => self.negative,
            SentimentLabel::Neutral => self.neutral,
        }
    }

    pub fn total(&self) -> usize {
        self.positive + self.negative + self.neutral
    }
}

/// A source URL that produced no article, with the reason it was dropped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedUrl {
    pub url: String,
    pub reason: String,
}

/// Output of one pipeline run.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PipelineResult {
    pub articles: Vec<Article>,
    pub sentiment_tally: SentimentTally,
    pub report_text: String,
    /// `None` only when synthesis failed and the run was allowed to degrade.
    pub audio_file_path: Option<String>,
    pub skipped: Vec<SkippedUrl>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub synthesis_error: Option<String>,
    /// RFC 3339 timestamp of when the run finished.
    pub generated_at: String,
}
