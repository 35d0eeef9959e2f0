//! JSON output of a pipeline run.
//!
//! Files are organized by date, one file per run:
//! ```text
//! json_output_dir/
//! └── 2025-05-06/
//!     ├── 081502.json
//!     └── 201530.json
//! ```

use crate::models::PipelineResult;
use crate::utils::output_stamp;
use chrono::Local;
use std::error::Error;
use tokio::fs;
use tracing::{error, info, instrument};

/// Serialize `result` into `{json_output_dir}/{date}/{HHMMSS}.json`.
///
/// Returns the path of the written file.
#[instrument(level = "info", skip_all, fields(json_output_dir = %json_output_dir))]
pub async fn write_result(
    result: &PipelineResult,
    json_output_dir: &str,
) -> Result<String, Box<dyn Error>> {
    let json = serde_json::to_string_pretty(result)?;
    let (date, stem) = output_stamp(Local::now());

    let full_json_dir = format!("{}/{}", json_output_dir.trim_end_matches('/'), date);
    if let Err(e) = fs::create_dir_all(&full_json_dir).await {
        error!(%full_json_dir, error = %e, "Failed to create JSON dir");
        return Err(e.into());
    }

    let output_json_filename = format!("{full_json_dir}/{stem}.json");
    fs::write(&output_json_filename, json).await?;
    info!(path = %output_json_filename, "Wrote run result JSON");
    Ok(output_json_filename)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SentimentTally;

    #[tokio::test]
    async fn test_write_result_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let result = PipelineResult {
            articles: vec![],
            sentiment_tally: SentimentTally::default(),
            report_text: "Comparative Analysis:\nTotal Articles: 0\n".into(),
            audio_file_path: Some("sentiment_report_hi.mp3".into()),
            skipped: vec![],
            synthesis_error: None,
            generated_at: "2025-05-06T20:15:30+00:00".into(),
        };

        let path = write_result(&result, dir.path().to_str().unwrap()).await.unwrap();
        assert!(path.ends_with(".json"));

        let raw = tokio::fs::read_to_string(&path).await.unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(value["audioFilePath"], "sentiment_report_hi.mp3");
        assert_eq!(value["sentimentTally"]["Neutral"], 0);
        assert!(value.get("synthesisError").is_none());
    }
}
