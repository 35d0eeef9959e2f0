//! Narration of the comparative report.
//!
//! Two modes are supported:
//! - [`SynthesisMode::Direct`]: speak the text as-is in the target voice
//! - [`SynthesisMode::Translated`]: translate into the target language first
//!
//! The report template is English, so any non-English voice needs the
//! translated mode to be intelligible.

use crate::api::SpeechService;
use crate::error::SynthesisError;
use std::path::Path;
use tokio::fs;
use tracing::{info, instrument};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SynthesisMode {
    Direct,
    Translated,
}

impl SynthesisMode {
    pub fn from_translate_flag(translate: bool) -> Self {
        if translate {
            SynthesisMode::Translated
        } else {
            SynthesisMode::Direct
        }
    }
}

/// Render `text` as speech in `language` and write it to `output_path`.
///
/// Any existing file at `output_path` is replaced, and missing parent
/// directories are created.
///
/// # Arguments
///
/// * `service` - Translation and speech backend
/// * `text` - Text to narrate (the English report)
/// * `language` - Target language code, used for translation and the voice
/// * `mode` - Whether to translate `text` before speaking it
/// * `output_path` - Destination of the MP3 file
///
/// # Returns
///
/// The path written, i.e. `output_path`.
///
/// # Errors
///
/// [`SynthesisError::Translation`] or [`SynthesisError::TtsService`] when
/// the service fails, [`SynthesisError::Io`] when the file cannot be written.
#[instrument(level = "info", skip(service, text), fields(chars = text.chars().count()))]
pub async fn synthesize<S>(
    service: &S,
    text: &str,
    language: &str,
    mode: SynthesisMode,
    output_path: &str,
) -> Result<String, SynthesisError>
where
    S: SpeechService + Sync,
{
    let spoken = match mode {
        SynthesisMode::Direct => text.to_string(),
        SynthesisMode::Translated => service.translate(text, language).await?,
    };
    let audio = service.speak(&spoken, language).await?;

    if let Some(parent) = Path::new(output_path).parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).await?;
        }
    }
    fs::write(output_path, &audio).await?;
    info!(path = %output_path, bytes = audio.len(), "Wrote narration audio");
    Ok(output_path.to_string())
}
