//! Runtime configuration.
//!
//! Values come from three layers, later ones winning:
//! 1. Built-in defaults (see the `Default` impls below)
//! 2. An optional YAML file passed with `--config`
//! 3. CLI flags and environment variables (applied in `main`)
//!
//! # Example
//!
//! ```yaml
//! urls:
//!   - https://example.com/news/one
//!   - https://example.com/news/two
//! fetch:
//!   timeout_secs: 5
//!   concurrency: 2
//! speech:
//!   language: fr
//!   on_failure: degrade
//! ```

use crate::error::ConfigError;
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info, instrument};

/// Browser-like identification sent with every article request.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/90.0.4430.93 Safari/537.36";

pub const DEFAULT_TRANSLATE_URL: &str = "https://translate.googleapis.com/translate_a/single";
pub const DEFAULT_TTS_URL: &str = "https://translate.google.com/translate_tts";

const DEFAULT_URLS: &[&str] = &[
    "https://indianexpress.com/article/india/it-ministry-grok-using-hindi-slang-abuses-x-9895705/",
    "https://indianexpress.com/article/world/trump-musk-french-scientist-denied-us-entry-9896678/",
    "https://indianexpress.com/article/sports/ipl/ipl-18-franchises-fan-promos-reels-movie-bgm-videos-csk-rcb-mi-kkr-9895794/",
    "https://indianexpress.com/article/sports/ipl/thanks-to-ipl-new-zealand-cleared-the-final-frontier-9893966/",
    "https://indianexpress.com/article/sports/chess/vidit-gujrathi-wins-freestyle-chess-where-preparations-seldom-matter-9893401/",
    "https://www.thehindu.com/news/national/indian-student-at-georgetown-university-detained-over-hamas-links-amid-trumps-crackdown-on-pro-palestinian-protests/article69351904.ece",
    "https://www.timesnownews.com/chennai/chennai-water-cut-temporary-disruption-from-march-21-26-check-list-of-affected-areas-article-119252341",
    "https://timesofindia.indiatimes.com/sports/formula-one/news/f1-pandit-eddie-jordan-who-managed-adrian-neweys-move-to-aston-martin-dies-of-cancer/articleshow/119251176.cms",
    "https://www.dtnext.in/news/business/cognizant-to-establish-14-acre-immersive-learning-center-at-siruseri-campus-chennai-827024",
    "https://www.dtnext.in/news/chennai/four-flights-cancelled-at-chennai-airport-due-to-passenger-shortage-826702",
];

/// Top-level configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Ordered source URLs. Order is the tie-breaker for relevance ranking.
    pub urls: Vec<String>,
    pub fetch: FetchConfig,
    pub pipeline: PipelineConfig,
    pub speech: SpeechConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            urls: DEFAULT_URLS.iter().map(|u| u.to_string()).collect(),
            fetch: FetchConfig::default(),
            pipeline: PipelineConfig::default(),
            speech: SpeechConfig::default(),
        }
    }
}

/// HTTP transport settings for article retrieval.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    pub timeout_secs: u64,
    /// Total attempts per URL, including the first one.
    pub max_attempts: u32,
    pub backoff_base_ms: u64,
    pub max_backoff_ms: u64,
    pub user_agent: String,
    /// Upper bound on in-flight fetches within one run.
    pub concurrency: usize,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 10,
            max_attempts: 3,
            backoff_base_ms: 1_000,
            max_backoff_ms: 30_000,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            concurrency: 4,
        }
    }
}

impl FetchConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Minimum summary length, in characters, for an article to be kept.
    pub min_summary_chars: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            min_summary_chars: 20,
        }
    }
}

/// What a run does when translation or speech synthesis fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SynthesisFailurePolicy {
    /// Fail the whole run.
    #[default]
    Abort,
    /// Return the report without audio.
    Degrade,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpeechConfig {
    /// Target voice language (ISO 639-1 code).
    pub language: String,
    /// Machine-translate the report into `language` before synthesis.
    pub translate: bool,
    /// Audio artifact path, overwritten on every successful run.
    pub output_path: String,
    pub translate_url: String,
    pub tts_url: String,
    pub timeout_secs: u64,
    pub on_failure: SynthesisFailurePolicy,
}

impl Default for SpeechConfig {
    fn default() -> Self {
        Self {
            language: "hi".to_string(),
            translate: true,
            output_path: "sentiment_report_hi.mp3".to_string(),
            translate_url: DEFAULT_TRANSLATE_URL.to_string(),
            tts_url: DEFAULT_TTS_URL.to_string(),
            timeout_secs: 30,
            on_failure: SynthesisFailurePolicy::Abort,
        }
    }
}

impl AppConfig {
    /// Load configuration from `path`, or fall back to defaults when `None`.
    ///
    /// The result is validated; see [`AppConfig::validate`].
    #[instrument(level = "info")]
    pub async fn load(path: Option<&str>) -> Result<Self, ConfigError> {
        let config = match path {
            Some(path) => {
                let raw = tokio::fs::read_to_string(Path::new(path)).await?;
                let parsed = Self::from_yaml(&raw)?;
                info!(path, urls = parsed.urls.len(), "Loaded configuration file");
                parsed
            }
            None => {
                debug!("No config file given; using defaults");
                Self::default()
            }
        };
        config.validate()
    }

    pub fn from_yaml(raw: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(raw)?)
    }

    /// Check invariants and drop duplicate URLs, keeping first occurrences.
    pub fn validate(mut self) -> Result<Self, ConfigError> {
        for raw in &self.urls {
            let parsed = url::Url::parse(raw)
                .map_err(|e| ConfigError::Invalid(format!("bad url {raw:?}: {e}")))?;
            if !matches!(parsed.scheme(), "http" | "https") {
                return Err(ConfigError::Invalid(format!(
                    "url {raw:?} must use http or https"
                )));
            }
        }
        let before = self.urls.len();
        self.urls = self.urls.into_iter().unique().collect();
        if self.urls.len() != before {
            debug!(removed = before - self.urls.len(), "Dropped duplicate URLs");
        }

        if self.fetch.max_attempts == 0 {
            return Err(ConfigError::Invalid("fetch.max_attempts must be at least 1".into()));
        }
        if self.fetch.concurrency == 0 {
            return Err(ConfigError::Invalid("fetch.concurrency must be at least 1".into()));
        }
        if self.fetch.timeout_secs == 0 {
            return Err(ConfigError::Invalid("fetch.timeout_secs must be at least 1".into()));
        }
        if self.pipeline.min_summary_chars == 0 {
            return Err(ConfigError::Invalid(
                "pipeline.min_summary_chars must be at least 1".into(),
            ));
        }
        if self.speech.language.trim().is_empty() {
            return Err(ConfigError::Invalid("speech.language must not be empty".into()));
        }
        if self.speech.output_path.trim().is_empty() {
            return Err(ConfigError::Invalid("speech.output_path must not be empty".into()));
        }
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = AppConfig::default().validate().unwrap();
        assert_eq!(config.urls.len(), 10);
        assert_eq!(config.fetch.max_attempts, 3);
        assert_eq!(config.fetch.timeout(), Duration::from_secs(10));
        assert_eq!(config.pipeline.min_summary_chars, 20);
        assert_eq!(config.speech.language, "hi");
        assert_eq!(config.speech.on_failure, SynthesisFailurePolicy::Abort);
    }

    #[test]
    fn test_partial_yaml_keeps_other_defaults() {
        let yaml = r#"
urls:
  - https://example.com/a
fetch:
  concurrency: 2
speech:
  on_failure: degrade
"#;
        let config = AppConfig::from_yaml(yaml).unwrap().validate().unwrap();
        assert_eq!(config.urls, vec!["https://example.com/a".to_string()]);
        assert_eq!(config.fetch.concurrency, 2);
        assert_eq!(config.fetch.timeout_secs, 10);
        assert_eq!(config.fetch.user_agent, DEFAULT_USER_AGENT);
        assert_eq!(config.speech.on_failure, SynthesisFailurePolicy::Degrade);
        assert!(config.speech.translate);
    }

    #[test]
    fn test_duplicate_urls_are_dropped_in_order() {
        let config = AppConfig {
            urls: vec![
                "https://example.com/b".into(),
                "https://example.com/a".into(),
                "https://example.com/b".into(),
            ],
            ..AppConfig::default()
        };
        let config = config.validate().unwrap();
        assert_eq!(
            config.urls,
            vec!["https://example.com/b".to_string(), "https://example.com/a".to_string()]
        );
    }

    #[test]
    fn test_rejects_malformed_url() {
        let config = AppConfig {
            urls: vec!["not a url".into()],
            ..AppConfig::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_rejects_non_http_scheme() {
        let config = AppConfig {
            urls: vec!["ftp://example.com/file".into()],
            ..AppConfig::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_rejects_zero_attempts() {
        let mut config = AppConfig::default();
        config.fetch.max_attempts = 0;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_rejects_bad_yaml() {
        assert!(matches!(
            AppConfig::from_yaml("urls: [unterminated"),
            Err(ConfigError::Yaml(_))
        ));
    }

    #[tokio::test]
    async fn test_load_without_path_uses_defaults() {
        let config = AppConfig::load(None).await.unwrap();
        assert_eq!(config, AppConfig::default());
    }

    #[tokio::test]
    async fn test_load_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        tokio::fs::write(&path, "pipeline:\n  min_summary_chars: 40\n")
            .await
            .unwrap();

        let config = AppConfig::load(path.to_str()).await.unwrap();
        assert_eq!(config.pipeline.min_summary_chars, 40);
        assert_eq!(config.urls.len(), 10);
    }

    #[tokio::test]
    async fn test_load_missing_file_is_io_error() {
        let result = AppConfig::load(Some("/definitely/not/here.yaml")).await;
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }
}
