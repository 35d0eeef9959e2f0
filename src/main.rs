//! # News Sentiment Voice
//!
//! Scrapes a fixed list of news article URLs, classifies the sentiment of
//! each article's summary, and narrates a comparative report as speech.
//!
//! ## Usage
//!
//! ```sh
//! news_sentiment_voice run --query Tesla -j ./json
//! news_sentiment_voice serve --bind 0.0.0.0:8000
//! ```
//!
//! ## Architecture
//!
//! The application follows a pipeline architecture:
//! 1. **Fetching**: Download every URL (bounded concurrency, retry on transient failures)
//! 2. **Extraction**: Pull title, summary and publication date from the HTML
//! 3. **Scoring**: Classify each summary; optionally rank by a query term
//! 4. **Aggregation**: Tally labels and render the report text
//! 5. **Narration**: Translate the report and write it as MP3 audio

use clap::Parser;
use std::error::Error;
use std::sync::Arc;
use tracing::{debug, error, info, instrument};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod api;
mod cli;
mod config;
mod error;
mod models;
mod outputs;
mod pipeline;
mod relevance;
mod report;
mod retry;
mod scrapers;
mod sentiment;
mod server;
mod speech;
mod utils;

use cli::{Cli, Command};
use config::AppConfig;
use outputs::{json, text};
use pipeline::HttpPipeline;
use utils::ensure_writable_dir;

fn build_pipeline(config: &AppConfig) -> Result<HttpPipeline, Box<dyn Error>> {
    HttpPipeline::from_config(config).map_err(|e| e as Box<dyn Error>)
}

#[tokio::main]
#[instrument]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    info!("news_sentiment_voice starting up");

    let args = Cli::parse();
    debug!(config = ?args.config, command = ?args.command, "Parsed CLI arguments");

    let mut config = AppConfig::load(args.config.as_deref()).await?;

    match args.command {
        Command::Run {
            query,
            language,
            audio_path,
            no_translate,
            json_output_dir,
        } => {
            if let Some(language) = language {
                config.speech.language = language;
            }
            if let Some(audio_path) = audio_path {
                config.speech.output_path = audio_path;
            }
            if no_translate {
                config.speech.translate = false;
            }
            let config = config.validate()?;

            // Early check: fail before any network work if JSON can't be written
            if let Some(dir) = &json_output_dir {
                if let Err(e) = ensure_writable_dir(dir).await {
                    error!(
                        path = %dir,
                        error = %e,
                        "JSON output directory is not writable (fix perms or choose a different path)"
                    );
                    return Err(e);
                }
            }

            let pipeline = build_pipeline(&config)?;
            info!(urls = config.urls.len(), query = ?query, "Running pipeline");
            let result = pipeline.run(&config.urls, query.as_deref()).await?;

            println!("{}", text::render(&result));

            if let Some(dir) = &json_output_dir {
                if let Err(e) = json::write_result(&result, dir).await {
                    error!(error = %e, "Failed to write JSON output");
                }
            }

            info!(
                articles = result.articles.len(),
                skipped = result.skipped.len(),
                elapsed_secs = start_time.elapsed().as_secs_f64(),
                "news_sentiment_voice run finished"
            );
        }
        Command::Serve { bind } => {
            let config = config.validate()?;
            let pipeline = build_pipeline(&config)?;
            let state = server::AppState {
                pipeline: Arc::new(pipeline),
                urls: Arc::new(config.urls),
            };
            server::serve(state, &bind).await?;
            info!(
                uptime_secs = start_time.elapsed().as_secs_f64(),
                "news_sentiment_voice server stopped"
            );
        }
    }

    Ok(())
}
