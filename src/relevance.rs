//! Query relevance ranking.
//!
//! Articles are scored with a token-set similarity between the query term and
//! the article's title plus summary, then reordered best-first. Token sets
//! tolerate word reordering and extra words on either side, which suits
//! matching a short company name against a headline.
//!
//! Pairwise similarity: `strsim::normalized_levenshtein`, scaled to `0..=100`.

use crate::models::Article;
use std::collections::BTreeSet;
use strsim::normalized_levenshtein;
use tracing::{debug, instrument};

fn token_set(s: &str) -> BTreeSet<String> {
    s.split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(str::to_lowercase)
        .collect()
}

fn ratio(a: &str, b: &str) -> u8 {
    if a.is_empty() || b.is_empty() {
        return 0;
    }
    (normalized_levenshtein(a, b) * 100.0).round().clamp(0.0, 100.0) as u8
}

fn join<'a>(words: impl Iterator<Item = &'a String>) -> String {
    words.map(String::as_str).collect::<Vec<_>>().join(" ")
}

/// Case-insensitive token-set similarity of two strings, in `0..=100`.
///
/// The shared tokens are compared against each side's shared-plus-remaining
/// tokens, and the best of the three pairings is returned. A string that
/// has no word tokens scores 0 against anything.
///
/// Pairings are scored with normalized Levenshtein (`1 - edits / longer
/// length`), not the `2 * matches / total length` ratio common in fuzzy
/// matching libraries. Single-word queries rank the same either way; for
/// multi-word queries scores run lower. `"Tesla Motors"` against
/// `"Tesla launches EV news"` scores 42, where a match-count ratio gives 59.
pub fn token_set_ratio(a: &str, b: &str) -> u8 {
    let left = token_set(a);
    let right = token_set(b);
    if left.is_empty() || right.is_empty() {
        return 0;
    }

    let shared = join(left.intersection(&right));
    let only_left = join(left.difference(&right));
    let only_right = join(right.difference(&left));

    let combined_left = format!("{shared} {only_left}").trim().to_string();
    let combined_right = format!("{shared} {only_right}").trim().to_string();

    ratio(&shared, &combined_left)
        .max(ratio(&shared, &combined_right))
        .max(ratio(&combined_left, &combined_right))
}

/// Relevance of one article to `query`.
pub fn score(article: &Article, query: &str) -> u8 {
    token_set_ratio(query, &format!("{} {}", article.title, article.summary))
}

/// Attach a relevance score to every article and sort best-first.
///
/// The sort is stable, so equally relevant articles keep their fetch order.
#[instrument(level = "info", skip(articles), fields(count = articles.len()))]
pub fn rank(mut articles: Vec<Article>, query: &str) -> Vec<Article> {
    for article in &mut articles {
        let relevance = score(article, query);
        debug!(url = %article.url, relevance, "Scored article");
        article.relevance = Some(relevance);
    }
    articles.sort_by(|a, b| b.relevance.cmp(&a.relevance));
    articles
}
