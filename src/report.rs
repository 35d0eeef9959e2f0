//! Sentiment tally and the comparative report text.
//!
//! The report is narrated as audio, so its template is fixed and reads as
//! plain sentences-per-line:
//!
//! ```text
//! Comparative Analysis:
//! Total Articles: 3
//! Positive: 1, Negative: 1, Neutral: 1
//! ```

use crate::models::{Article, SentimentTally};
use tracing::info;

/// Count labels over `articles` and render the report.
///
/// # Arguments
///
/// * `articles` - The classified articles of one run, possibly empty
///
/// # Returns
///
/// The label tally (its total always equals `articles.len()`) and the
/// report text from [`render_report`].
pub fn aggregate(articles: &[Article]) -> (SentimentTally, String) {
    let mut tally = SentimentTally::default();
    for article in articles {
        tally.increment(article.sentiment_label);
    }
    let report = render_report(articles.len(), &tally);
    info!(
        total = articles.len(),
        positive = tally.positive,
        negative = tally.negative,
        neutral = tally.neutral,
        "Comparative report generated"
    );
    (tally, report)
}

/// Fixed three-line report for `total` articles.
pub fn render_report(total: usize, tally: &SentimentTally) -> String {
    format!(
        "Comparative Analysis:\nTotal Articles: {total}\nPositive: {}, Negative: {}, Neutral: {}\n",
        tally.positive, tally.negative, tally.neutral
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{SentimentLabel, SentimentScores};

    fn article(label: SentimentLabel) -> Article {
        Article {
            title: "t".into(),
            summary: "s".into(),
            publication_date: String::new(),
            url: "u".into(),
            sentiment_label: label,
            sentiment_scores: SentimentScores::default(),
            relevance: None,
        }
    }

    #[test]
    fn empty_input_reports_zero() {
        let (tally, report) = aggregate(&[]);
        assert_eq!(tally, SentimentTally::default());
        assert_eq!(
            report,
            "Comparative Analysis:\nTotal Articles: 0\nPositive: 0, Negative: 0, Neutral: 0\n"
        );
    }

    #[test]
    fn counts_match_article_labels() {
        let articles = vec![
            article(SentimentLabel::Positive),
            article(SentimentLabel::Negative),
            article(SentimentLabel::Negative),
            article(SentimentLabel::Neutral),
        ];
        let (tally, report) = aggregate(&articles);
        assert_eq!(tally.total(), articles.len());
        assert_eq!(tally.negative, 2);
        assert!(report.contains("Total Articles: 4"));
        assert!(report.contains("Positive: 1, Negative: 2, Neutral: 1"));
    }

    #[test]
    fn label_order_is_fixed() {
        let tally = SentimentTally {
            positive: 7,
            negative: 8,
            neutral: 9,
        };
        let report = render_report(24, &tally);
        let p = report.find("Positive").unwrap();
        let n = report.find("Negative").unwrap();
        let u = report.find("Neutral").unwrap();
        assert!(p < n && n < u);
    }
}
