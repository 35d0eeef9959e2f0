//! Best-effort metadata extraction from article markup.
//!
//! Each field is resolved through an ordered list of strategies. The first
//! strategy that yields non-blank text wins and later ones are never
//! consulted. Extraction cannot fail: missing fields degrade to the
//! [`NO_TITLE`] placeholder or an empty string.

use crate::models::{ArticleFields, NO_TITLE};
use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};
use tracing::{debug, instrument};

fn selector(css: &str) -> Selector {
    Selector::parse(css).unwrap_or_else(|e| panic!("static selector {css:?} is invalid: {e}"))
}

static TITLE: Lazy<Selector> = Lazy::new(|| selector("title"));
static META_DESCRIPTION: Lazy<Selector> = Lazy::new(|| selector(r#"meta[name="description"]"#));
static PARAGRAPH: Lazy<Selector> = Lazy::new(|| selector("p"));
static TIME: Lazy<Selector> = Lazy::new(|| selector("time"));

/// Publication date meta tags, highest priority first.
static DATE_META: Lazy<Vec<(&'static str, Selector)>> = Lazy::new(|| {
    [
        r#"meta[property="article:published_time"]"#,
        r#"meta[name="pubdate"]"#,
        r#"meta[property="og:updated_time"]"#,
    ]
    .into_iter()
    .map(|css| (css, selector(css)))
    .collect()
});

/// Parse `raw` and pull out title, summary and publication date.
#[instrument(level = "debug", skip_all, fields(bytes = raw.len()))]
pub fn extract(raw: &str) -> ArticleFields {
    let document = Html::parse_document(raw);
    let fields = ArticleFields {
        title: extract_title(&document),
        summary: extract_summary(&document),
        publication_date: extract_publication_date(&document),
    };
    debug!(
        title = %fields.title,
        summary_chars = fields.summary.chars().count(),
        date = %fields.publication_date,
        "Extracted article fields"
    );
    fields
}

fn extract_title(document: &Html) -> String {
    document
        .select(&TITLE)
        .next()
        .map(element_text)
        .filter(|t| !t.is_empty())
        .unwrap_or_else(|| NO_TITLE.to_string())
}

fn extract_summary(document: &Html) -> String {
    first_content(document, &META_DESCRIPTION)
        .or_else(|| {
            document
                .select(&PARAGRAPH)
                .next()
                .map(element_text)
                .filter(|t| !t.is_empty())
        })
        .unwrap_or_default()
}

fn extract_publication_date(document: &Html) -> String {
    for (css, sel) in DATE_META.iter() {
        if let Some(date) = first_content(document, sel) {
            debug!(source = css, %date, "Publication date from meta tag");
            return date;
        }
    }

    if let Some(time) = document.select(&TIME).next() {
        let machine = time.value().attr("datetime").map(str::trim).unwrap_or("");
        let date = if machine.is_empty() {
            element_text(time)
        } else {
            machine.to_string()
        };
        debug!(%date, "Publication date from <time> element");
        return date;
    }
    String::new()
}

/// Trimmed, non-empty `content` attribute of the first element matching `sel`.
fn first_content(document: &Html, sel: &Selector) -> Option<String> {
    document
        .select(sel)
        .next()
        .and_then(|el| el.value().attr("content"))
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .map(str::to_string)
}

fn element_text(el: ElementRef<'_>) -> String {
    el.text().collect::<String>().trim().to_string()
}
