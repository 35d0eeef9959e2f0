//! Lexicon and rule based sentiment scoring.
//!
//! Scoring uses VADER: every word in its ~7,500 entry lexicon carries a
//! valence in `[-4, 4]`, adjusted by nearby intensity modifiers, negations,
//! capitalisation, contrastive "but" and punctuation. The summed valence is
//! squashed into a compound score in `[-1, 1]` (`s / sqrt(s² + 15)`).
//!
//! Scoring is a pure function of the input text. Nothing is fetched over the
//! network and no state is carried between calls.

use crate::models::{SentimentLabel, SentimentScores};
use vader_sentiment::SentimentIntensityAnalyzer;

fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}

/// Score `text` on every sentiment dimension.
///
/// # Arguments
///
/// * `text` - Free text, typically an article summary
///
/// # Returns
///
/// `neg`, `neu` and `pos` proportions rounded to 3 decimals, and `compound`
/// rounded to 4 decimals. Text with no word tokens scores all zeros.
pub fn polarity_scores(text: &str) -> SentimentScores {
    if text.split_whitespace().next().is_none() {
        return SentimentScores::default();
    }
    let analyzer = SentimentIntensityAnalyzer::new();
    let raw = analyzer.polarity_scores(text);
    let get = |key: &str| raw.get(key).copied().unwrap_or(0.0);

    SentimentScores {
        neg: round_to(get("neg"), 3),
        neu: round_to(get("neu"), 3),
        pos: round_to(get("pos"), 3),
        compound: round_to(get("compound"), 4),
    }
}

/// Score `text` and map its compound score onto a [`SentimentLabel`].
///
/// Compound `>= 0.05` is positive, `<= -0.05` negative, anything between
/// is neutral.
pub fn classify(text: &str) -> (SentimentLabel, SentimentScores) {
    let scores = polarity_scores(text);
    (SentimentLabel::from_compound(scores.compound), scores)
}
