//! Command-line interface definitions.
//!
//! Every option can also come from the environment. Flags given here take
//! precedence over the YAML config file.

use clap::{Parser, Subcommand};

/// Command-line arguments for News Sentiment Voice.
///
/// # Examples
///
/// ```sh
/// # One run over the default URL list, Hindi narration
/// news_sentiment_voice run
///
/// # Rank by a company name and keep a JSON copy of the result
/// news_sentiment_voice -c config.yaml run --query Tesla -j ./json
///
/// # Start the HTTP API
/// news_sentiment_voice serve --bind 127.0.0.1:8000
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Optional path to config.yaml file
    #[arg(short, long, global = true, env = "NSV_CONFIG")]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, PartialEq)]
pub enum Command {
    /// Run the pipeline once and print the report
    Run {
        /// Rank articles by relevance to this term
        #[arg(short, long)]
        query: Option<String>,

        /// Narration language code (e.g. hi, en)
        #[arg(short, long, env = "NSV_LANGUAGE")]
        language: Option<String>,

        /// Where to write the narration audio
        #[arg(short, long, env = "NSV_AUDIO_PATH")]
        audio_path: Option<String>,

        /// Speak the English report as-is instead of translating it
        #[arg(long)]
        no_translate: bool,

        /// Also write the full result as JSON under this directory
        #[arg(short, long, env = "NSV_JSON_OUTPUT_DIR")]
        json_output_dir: Option<String>,
    },
    /// Serve the HTTP API
    Serve {
        /// Address to bind
        #[arg(short, long, env = "NSV_BIND", default_value = "0.0.0.0:8000")]
        bind: String,
    },
}
