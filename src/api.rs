//! Client for the external translation and text-to-speech services.
//!
//! Neither translation nor speech synthesis happens locally; both are
//! delegated over HTTP. The module uses a trait-based design so the pipeline
//! can be exercised without network access:
//! - [`SpeechService`]: translate text and render it as audio bytes
//! - [`GoogleSpeechClient`]: implementation backed by the public Google
//!   Translate endpoints (base URLs are configurable)
//!
//! # Limits
//!
//! The TTS endpoint only accepts short inputs, so text is split into chunks
//! of at most [`TTS_CHUNK_CHARS`] characters on whitespace. Chunks are
//! requested in order and their MP3 frames are concatenated.

use crate::config::{DEFAULT_USER_AGENT, SpeechConfig};
use crate::error::SynthesisError;
use crate::utils::truncate_for_log;
use serde_json::Value;
use std::future::Future;
use std::time::{Duration, Instant};
use tracing::{debug, info, instrument, warn};
use urlencoding::encode;

/// Maximum characters sent to the TTS endpoint in a single request.
pub const TTS_CHUNK_CHARS: usize = 100;

/// Translation and speech rendering as external services.
pub trait SpeechService {
    /// Translate `text` from an auto-detected language into `target`.
    fn translate(
        &self,
        text: &str,
        target: &str,
    ) -> impl Future<Output = Result<String, SynthesisError>> + Send;

    /// Render `text` as MP3 audio spoken in `language`.
    fn speak(
        &self,
        text: &str,
        language: &str,
    ) -> impl Future<Output = Result<Vec<u8>, SynthesisError>> + Send;
}

/// [`SpeechService`] backed by Google Translate's public endpoints.
#[derive(Debug, Clone)]
pub struct GoogleSpeechClient {
    client: reqwest::Client,
    translate_url: String,
    tts_url: String,
}

impl GoogleSpeechClient {
    pub fn new(
        translate_url: &str,
        tts_url: &str,
        timeout: Duration,
    ) -> Result<Self, SynthesisError> {
        let client = reqwest::Client::builder()
            .user_agent(DEFAULT_USER_AGENT)
            .timeout(timeout)
            .build()
            .map_err(|e| SynthesisError::TtsService(e.to_string()))?;
        Ok(Self {
            client,
            translate_url: translate_url.to_string(),
            tts_url: tts_url.to_string(),
        })
    }

    pub fn from_config(config: &SpeechConfig) -> Result<Self, SynthesisError> {
        Self::new(
            &config.translate_url,
            &config.tts_url,
            Duration::from_secs(config.timeout_secs),
        )
    }
}

impl SpeechService for GoogleSpeechClient {
    #[instrument(level = "info", skip_all, fields(%target, chars = text.chars().count()))]
    async fn translate(&self, text: &str, target: &str) -> Result<String, SynthesisError> {
        let t0 = Instant::now();
        let url = format!(
            "{}?client=gtx&sl=auto&tl={}&dt=t&q={}",
            self.translate_url,
            encode(target),
            encode(text)
        );
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| SynthesisError::Translation(e.to_string()))?;
        let status = response.status();
        if !status.is_success() {
            return Err(SynthesisError::Translation(format!("HTTP status {}", status.as_u16())));
        }
        let body = response
            .text()
            .await
            .map_err(|e| SynthesisError::Translation(e.to_string()))?;
        let translated = parse_translation(&body).ok_or_else(|| {
            warn!(response_preview = %truncate_for_log(&body, 200), "Unexpected translation payload");
            SynthesisError::Translation("unexpected response payload".to_string())
        })?;

        info!(elapsed_ms = t0.elapsed().as_millis() as u64, "Translated report");
        Ok(translated)
    }

    #[instrument(level = "info", skip_all, fields(%language))]
    async fn speak(&self, text: &str, language: &str) -> Result<Vec<u8>, SynthesisError> {
        let chunks = split_for_tts(text, TTS_CHUNK_CHARS);
        if chunks.is_empty() {
            return Err(SynthesisError::TtsService("nothing to speak".to_string()));
        }

        let t0 = Instant::now();
        let total = chunks.len();
        let mut audio = Vec::new();
        for (idx, chunk) in chunks.iter().enumerate() {
            let url = format!(
                "{}?ie=UTF-8&client=tw-ob&tl={}&q={}&total={}&idx={}&textlen={}",
                self.tts_url,
                encode(language),
                encode(chunk),
                total,
                idx,
                chunk.chars().count()
            );
            let response = self
                .client
                .get(&url)
                .send()
                .await
                .map_err(|e| SynthesisError::TtsService(e.to_string()))?;
            let status = response.status();
            if !status.is_success() {
                return Err(SynthesisError::TtsService(format!(
                    "HTTP status {} for chunk {}/{}",
                    status.as_u16(),
                    idx + 1,
                    total
                )));
            }
            let bytes = response
                .bytes()
                .await
                .map_err(|e| SynthesisError::TtsService(e.to_string()))?;
            debug!(idx, bytes = bytes.len(), "Received audio chunk");
            audio.extend_from_slice(&bytes);
        }

        info!(
            chunks = total,
            bytes = audio.len(),
            elapsed_ms = t0.elapsed().as_millis() as u64,
            "Synthesized speech"
        );
        Ok(audio)
    }
}

/// Concatenate the translated segments of a `translate_a/single` response.
///
/// The payload is a nested array whose first element lists
/// `[translated, original, ...]` segments.
fn parse_translation(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    let segments = value.get(0)?.as_array()?;
    let text: String = segments
        .iter()
        .filter_map(|seg| seg.get(0).and_then(Value::as_str))
        .collect();
    (!text.trim().is_empty()).then_some(text)
}

/// Split `text` into whitespace-delimited chunks of at most `max` characters.
///
/// Words longer than `max` are hard-split.
pub fn split_for_tts(text: &str, max: usize) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut current = String::new();
    for word in text.split_whitespace() {
        let mut word: Vec<char> = word.chars().collect();
        while word.len() > max {
            if !current.is_empty() {
                chunks.push(std::mem::take(&mut current));
            }
            chunks.push(word.drain(..max).collect());
        }
        if word.is_empty() {
            continue;
        }
        let word: String = word.into_iter().collect();
        let needed = if current.is_empty() { 0 } else { 1 } + word.chars().count();
        if current.chars().count() + needed > max {
            chunks.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(&word);
    }
    if !current.is_empty() {
        chunks.push(current);
    }
    chunks
}
