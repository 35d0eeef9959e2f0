//! HTTP API over the pipeline.
//!
//! Routes:
//! - `GET /health`
//! - `POST /api/process-news` with `{"company_name": "..."}`
//! - `GET /api/tts` serving the last narration

use crate::api::SpeechService;
use crate::models::PipelineResult;
use crate::pipeline::Pipeline;
use crate::scrapers::fetch::Fetch;
use axum::{
    Json, Router,
    extract::State,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::error::Error;
use std::io;
use std::path::Path;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing::{error, info, instrument, warn};

/// Shared handler state: the pipeline and the URL list it runs over.
pub struct AppState<F, S> {
    pub pipeline: Arc<Pipeline<F, S>>,
    pub urls: Arc<Vec<String>>,
}

impl<F, S> Clone for AppState<F, S> {
    fn clone(&self) -> Self {
        Self {
            pipeline: Arc::clone(&self.pipeline),
            urls: Arc::clone(&self.urls),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct NewsRequest {
    pub company_name: String,
}

#[derive(Debug, Serialize)]
pub struct NewsResponse {
    pub company: String,
    #[serde(flatten)]
    pub result: PipelineResult,
}

fn detail(status: StatusCode, message: impl Into<String>) -> Response {
    (status, Json(json!({ "detail": message.into() }))).into_response()
}

pub fn router<F, S>(state: AppState<F, S>) -> Router
where
    F: Fetch + Send + Sync + 'static,
    S: SpeechService + Send + Sync + 'static,
{
    Router::new()
        .route("/health", get(health))
        .route("/api/process-news", post(process_news::<F, S>))
        .route("/api/tts", get(tts_audio::<F, S>))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok", "message": "Service is healthy." }))
}

#[instrument(level = "info", skip_all)]
async fn process_news<F, S>(
    State(state): State<AppState<F, S>>,
    Json(request): Json<NewsRequest>,
) -> Response
where
    F: Fetch + Send + Sync + 'static,
    S: SpeechService + Send + Sync + 'static,
{
    let pipeline = Arc::clone(&state.pipeline);
    let urls = Arc::clone(&state.urls);
    let company = request.company_name.clone();
    info!(%company, "Processing news request");

    // The run is long; keep it off the connection task.
    let handle = tokio::spawn(async move { pipeline.run(&urls, Some(&company)).await });

    match handle.await {
        Ok(Ok(result)) => {
            info!(articles = result.articles.len(), "Processed news request");
            Json(NewsResponse {
                company: request.company_name,
                result,
            })
            .into_response()
        }
        Ok(Err(e)) => {
            error!(error = %e, "Pipeline run failed");
            detail(
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Error processing news: {e}"),
            )
        }
        Err(e) => {
            error!(error = %e, "Pipeline task panicked or was cancelled");
            detail(
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Error processing news: {e}"),
            )
        }
    }
}

async fn tts_audio<F, S>(State(state): State<AppState<F, S>>) -> Response
where
    F: Fetch + Send + Sync + 'static,
    S: SpeechService + Send + Sync + 'static,
{
    let audio_path = &state.pipeline.settings().audio_path;
    let bytes = match tokio::fs::read(audio_path).await {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            warn!(path = %audio_path, "Narration requested before any was produced");
            return detail(StatusCode::NOT_FOUND, "TTS audio file not found");
        }
        Err(e) => {
            error!(path = %audio_path, error = %e, "Failed to read narration");
            return detail(StatusCode::INTERNAL_SERVER_ERROR, e.to_string());
        }
    };

    let filename = Path::new(audio_path)
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("sentiment_report.mp3");
    (
        [
            (header::CONTENT_TYPE, "audio/mpeg".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{filename}\""),
            ),
        ],
        bytes,
    )
        .into_response()
}

/// Bind `addr` and serve until SIGINT/SIGTERM.
pub async fn serve<F, S>(state: AppState<F, S>, addr: &str) -> Result<(), Box<dyn Error>>
where
    F: Fetch + Send + Sync + 'static,
    S: SpeechService + Send + Sync + 'static,
{
    let app = router(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(addr = %listener.local_addr()?, "HTTP API listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "Failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    info!("Received shutdown signal, starting graceful shutdown");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SynthesisFailurePolicy;
    use crate::error::FetchError;
    use crate::pipeline::PipelineSettings;
    use crate::speech::SynthesisMode;
    use crate::speech::tests::FakeSpeech;
    use axum::body::{Body, to_bytes};
    use axum::http::Request;
    use tower::ServiceExt;

    /// Serves the same article for every URL.
    struct OneArticle;

    impl Fetch for OneArticle {
        async fn fetch(&self, url: &str) -> Result<String, FetchError> {
            if url.ends_with("/down") {
                return Err(FetchError::Timeout);
            }
            Ok(r#"<html><head><title>Tesla opens a new factory</title>
                <meta name="description" content="Tesla reports great progress on its new factory">
                </head></html>"#
                .to_string())
        }
    }

    fn state(audio_path: &str, speech: FakeSpeech) -> AppState<OneArticle, FakeSpeech> {
        let settings = PipelineSettings {
            min_summary_chars: 20,
            concurrency: 2,
            language: "hi".into(),
            mode: SynthesisMode::Translated,
            audio_path: audio_path.into(),
            on_synthesis_failure: SynthesisFailurePolicy::Abort,
        };
        AppState {
            pipeline: Arc::new(Pipeline::new(OneArticle, speech, settings)),
            urls: Arc::new(vec![
                "https://news.example/a".to_string(),
                "https://news.example/down".to_string(),
            ]),
        }
    }

    async fn json_body(response: Response) -> serde_json::Value {
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    fn process_request(company: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/api/process-news")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json!({ "company_name": company }).to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn health_reports_ok() {
        let dir = tempfile::tempdir().unwrap();
        let audio = dir.path().join("r.mp3");
        let app = router(state(audio.to_str().unwrap(), FakeSpeech::default()));

        let response = app
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["status"], "ok");
        assert_eq!(body["message"], "Service is healthy.");
    }

    #[tokio::test]
    async fn process_news_returns_company_and_result() {
        let dir = tempfile::tempdir().unwrap();
        let audio = dir.path().join("r.mp3");
        let app = router(state(audio.to_str().unwrap(), FakeSpeech::default()));

        let response = app.oneshot(process_request("Tesla")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["company"], "Tesla");
        assert_eq!(body["articles"].as_array().unwrap().len(), 1);
        assert!(body["articles"][0]["relevance"].is_u64());
        assert_eq!(body["sentimentTally"]["Positive"], 1);
        assert_eq!(body["skipped"][0]["url"], "https://news.example/down");
        assert!(body["reportText"].as_str().unwrap().contains("Total Articles: 1"));
        assert!(audio.exists());
    }

    #[tokio::test]
    async fn process_news_failure_is_500_with_detail() {
        let dir = tempfile::tempdir().unwrap();
        let audio = dir.path().join("r.mp3");
        let speech = FakeSpeech {
            fail_speak: true,
            ..FakeSpeech::default()
        };
        let app = router(state(audio.to_str().unwrap(), speech));

        let response = app.oneshot(process_request("Tesla")).await.unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = json_body(response).await;
        assert!(
            body["detail"]
                .as_str()
                .unwrap()
                .starts_with("Error processing news:")
        );
    }

    #[tokio::test]
    async fn tts_is_404_before_any_run() {
        let dir = tempfile::tempdir().unwrap();
        let audio = dir.path().join("missing.mp3");
        let app = router(state(audio.to_str().unwrap(), FakeSpeech::default()));

        let response = app
            .oneshot(Request::builder().uri("/api/tts").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body = json_body(response).await;
        assert_eq!(body["detail"], "TTS audio file not found");
    }

    #[tokio::test]
    async fn tts_serves_audio_as_attachment() {
        let dir = tempfile::tempdir().unwrap();
        let audio = dir.path().join("report_hi.mp3");
        std::fs::write(&audio, b"ID3fake").unwrap();
        let app = router(state(audio.to_str().unwrap(), FakeSpeech::default()));

        let response = app
            .oneshot(Request::builder().uri("/api/tts").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "audio/mpeg");
        assert_eq!(
            response.headers()[header::CONTENT_DISPOSITION],
            "attachment; filename=\"report_hi.mp3\""
        );
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&body[..], b"ID3fake");
    }
}
