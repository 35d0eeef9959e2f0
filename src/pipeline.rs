//! Pipeline orchestration.
//!
//! One run walks the configured URLs and produces a [`PipelineResult`]:
//!
//! 1. **Fetch + extract** every URL as an independent task (bounded fan-out)
//! 2. **Gate** articles whose summary is missing or too short
//! 3. **Classify** each surviving summary
//! 4. **Merge** outcomes back into URL order, then optionally **rank** by a
//!    query term
//! 5. **Aggregate** the tally and report text
//! 6. **Synthesize** the narration once over the report
//!
//! Per-URL failures only shrink the output. The only run-level failure is
//! synthesis, and only under [`SynthesisFailurePolicy::Abort`].

use crate::api::{GoogleSpeechClient, SpeechService};
use crate::config::{AppConfig, SynthesisFailurePolicy};
use crate::error::{FetchError, PipelineError};
use crate::models::{Article, PipelineResult, SkippedUrl};
use crate::relevance;
use crate::report;
use crate::retry::{RetryPolicy, Retrying};
use crate::scrapers::extract::extract;
use crate::scrapers::fetch::{Fetch, HttpFetcher};
use crate::sentiment::classify;
use crate::speech::{SynthesisMode, synthesize};
use chrono::Utc;
use futures::stream::{self, StreamExt};
use std::error::Error;
use std::fmt;
use std::time::Instant;
use tracing::{debug, error, info, instrument, warn};

/// The pipeline wired to real HTTP transports.
pub type HttpPipeline = Pipeline<Retrying<HttpFetcher>, GoogleSpeechClient>;

/// Per-run knobs, resolved from [`AppConfig`].
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineSettings {
    pub min_summary_chars: usize,
    pub concurrency: usize,
    pub language: String,
    pub mode: SynthesisMode,
    pub audio_path: String,
    pub on_synthesis_failure: SynthesisFailurePolicy,
}

impl PipelineSettings {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            min_summary_chars: config.pipeline.min_summary_chars,
            concurrency: config.fetch.concurrency.max(1),
            language: config.speech.language.clone(),
            mode: SynthesisMode::from_translate_flag(config.speech.translate),
            audio_path: config.speech.output_path.clone(),
            on_synthesis_failure: config.speech.on_failure,
        }
    }
}

/// Why a URL produced no article.
#[derive(Debug, Clone, PartialEq)]
pub enum SkipReason {
    Fetch(FetchError),
    InsufficientContent { chars: usize, required: usize },
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::Fetch(e) => write!(f, "fetch failed: {e}"),
            SkipReason::InsufficientContent { chars, required } => write!(
                f,
                "summary too short ({chars} characters, need at least {required})"
            ),
        }
    }
}

/// Result of processing a single URL.
#[derive(Debug, Clone, PartialEq)]
pub enum UrlOutcome {
    Article(Article),
    Skipped(SkipReason),
}

/// Orchestrates fetch, extraction, scoring, aggregation and narration.
pub struct Pipeline<F, S> {
    fetcher: F,
    speech: S,
    settings: PipelineSettings,
}

impl<F, S> fmt::Debug for Pipeline<F, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pipeline")
            .field("settings", &self.settings)
            .finish()
    }
}

impl HttpPipeline {
    /// Build the production pipeline from configuration.
    pub fn from_config(config: &AppConfig) -> Result<Self, Box<dyn Error + Send + Sync>> {
        let fetcher = Retrying::new(
            HttpFetcher::from_config(&config.fetch)?,
            RetryPolicy::from_config(&config.fetch),
        );
        let speech = GoogleSpeechClient::from_config(&config.speech)?;
        Ok(Pipeline::new(fetcher, speech, PipelineSettings::from_config(config)))
    }
}

impl<F, S> Pipeline<F, S>
where
    F: Fetch + Sync,
    S: SpeechService + Sync,
{
    pub fn new(fetcher: F, speech: S, settings: PipelineSettings) -> Self {
        Self {
            fetcher,
            speech,
            settings,
        }
    }

    pub fn settings(&self) -> &PipelineSettings {
        &self.settings
    }

    /// Fetch, extract, gate and classify one URL.
    ///
    /// # Returns
    ///
    /// [`UrlOutcome::Article`] when the summary has at least
    /// `min_summary_chars` characters, otherwise [`UrlOutcome::Skipped`] with
    /// the reason. Never fails.
    #[instrument(level = "info", skip(self))]
    pub async fn process_url(&self, url: &str) -> UrlOutcome {
        let raw = match self.fetcher.fetch(url).await {
            Ok(raw) => raw,
            Err(e) => {
                error!(error = %e, "Error fetching URL; skipping");
                return UrlOutcome::Skipped(SkipReason::Fetch(e));
            }
        };

        let fields = extract(&raw);
        let chars = fields.summary.chars().count();
        if chars < self.settings.min_summary_chars {
            warn!(chars, required = self.settings.min_summary_chars, "Article summary too short or missing; skipping");
            return UrlOutcome::Skipped(SkipReason::InsufficientContent {
                chars,
                required: self.settings.min_summary_chars,
            });
        }

        let (label, scores) = classify(&fields.summary);
        debug!(%label, compound = scores.compound, "Classified summary");
        UrlOutcome::Article(Article {
            title: fields.title,
            summary: fields.summary,
            publication_date: fields.publication_date,
            url: url.to_string(),
            sentiment_label: label,
            sentiment_scores: scores,
            relevance: None,
        })
    }

    /// Run the whole pipeline over `urls`, ranking by `query` when given.
    ///
    /// URLs are processed concurrently (up to `settings.concurrency` at a
    /// time), but articles come back in input order unless a query reorders
    /// them. Fetch failures and short summaries are recorded in
    /// [`PipelineResult::skipped`] and never fail the run.
    ///
    /// # Arguments
    ///
    /// * `urls` - Article URLs, processed independently
    /// * `query` - Optional relevance term; blank or whitespace-only skips ranking
    ///
    /// # Returns
    ///
    /// The classified articles, their tally, the report text and the path of
    /// the narration audio (`None` when synthesis degraded).
    ///
    /// # Errors
    ///
    /// [`PipelineError::Synthesis`] when narration fails and the policy is
    /// [`SynthesisFailurePolicy::Abort`].
    #[instrument(level = "info", skip(self, urls), fields(urls = urls.len()))]
    pub async fn run(
        &self,
        urls: &[String],
        query: Option<&str>,
    ) -> Result<PipelineResult, PipelineError> {
        let t0 = Instant::now();
        info!(concurrency = self.settings.concurrency, "Pipeline run starting");

        let mut outcomes: Vec<(usize, String, UrlOutcome)> =
            stream::iter(urls.iter().cloned().enumerate())
                .map(|(idx, url)| async move {
                    let outcome = self.process_url(&url).await;
                    (idx, url, outcome)
                })
                .buffer_unordered(self.settings.concurrency.max(1))
                .collect()
                .await;
        // Completion order is arbitrary; restore input order.
        outcomes.sort_by_key(|(idx, _, _)| *idx);

        let mut articles = Vec::new();
        let mut skipped = Vec::new();
        for (_, url, outcome) in outcomes {
            match outcome {
                UrlOutcome::Article(article) => articles.push(article),
                UrlOutcome::Skipped(reason) => skipped.push(SkippedUrl {
                    url,
                    reason: reason.to_string(),
                }),
            }
        }
        info!(
            kept = articles.len(),
            skipped = skipped.len(),
            "Finished scraping and classification"
        );

        let articles = match query.map(str::trim).filter(|q| !q.is_empty()) {
            Some(q) => relevance::rank(articles, q),
            None => articles,
        };

        let (sentiment_tally, report_text) = report::aggregate(&articles);
        debug_assert_eq!(sentiment_tally.total(), articles.len());

        let synthesis = synthesize(
            &self.speech,
            &report_text,
            &self.settings.language,
            self.settings.mode,
            &self.settings.audio_path,
        )
        .await;
        let (audio_file_path, synthesis_error) = match synthesis {
            Ok(path) => (Some(path), None),
            Err(e) => match self.settings.on_synthesis_failure {
                SynthesisFailurePolicy::Abort => {
                    error!(error = %e, "Speech synthesis failed; aborting run");
                    return Err(e.into());
                }
                SynthesisFailurePolicy::Degrade => {
                    warn!(error = %e, "Speech synthesis failed; returning report without audio");
                    (None, Some(e.to_string()))
                }
            },
        };

        info!(
            articles = articles.len(),
            skipped = skipped.len(),
            elapsed_ms = t0.elapsed().as_millis() as u64,
            "Pipeline run complete"
        );
        Ok(PipelineResult {
            articles,
            sentiment_tally,
            report_text,
            audio_file_path,
            skipped,
            synthesis_error,
            generated_at: Utc::now().to_rfc3339(),
        })
    }
}
