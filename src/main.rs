//! # Daily Insight
//!
//! Publishes one illustrated industry-insight post to WordPress per run:
//! latest headlines from a news search API, an article written by an
//! OpenAI-compatible model, and a cover photo from Pixabay.
//!
//! ## Usage
//!
//! ```sh
//! NEWS_API_KEY=... OPENAI_API_KEY=... PIXABAY_API_KEY=... \
//! WORDPRESS_BASE_URL=https://blog.example.com \
//! WORDPRESS_USERNAME=editor WORDPRESS_APPLICATION_PASSWORD=... \
//! daily_insight
//! ```
//!
//! ## Architecture
//!
//! A single linear pipeline (see [`pipeline`]):
//! 1. **News**: search each topic with each key until something comes back
//! 2. **Generation**: one chat completion, parsed into title, body and keywords
//! 3. **Image**: search keywords in turn, pick a random hit
//! 4. **Publish**: upload the cover, create the post
//!
//! Every step falls back to a safe default. Only configuration errors make
//! the process exit non-zero.

use clap::Parser;
use reqwest::Client;
use std::error::Error;
use tracing::{debug, error, info, instrument};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod api;
mod cli;
mod config;
mod generator;
mod images;
mod models;
mod news;
mod pipeline;
mod publish;
mod utils;

use cli::Cli;
use config::Config;

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
    info!("daily_insight starting up");

    let args = Cli::parse();
    let config = match Config::from_cli(args) {
        Ok(config) => config,
        Err(e) => {
            error!(error = %e, "Invalid configuration; aborting before any request");
            return Err(e.into());
        }
    };
    debug!(
        topics = ?config.news.topics,
        news_keys = config.news.api_keys.len(),
        model = %config.llm.model,
        cms = %config.cms.base_url,
        "Loaded configuration"
    );

    let client = Client::builder()
        .timeout(config.request_timeout)
        .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
        .build()?;

    let report = pipeline::run(&config, &client).await;

    let elapsed = start_time.elapsed();
    match report.post_id {
        Some(post_id) => info!(
            post_id,
            title = %report.title,
            news = report.news_count,
            placeholder = report.used_placeholder,
            media_id = report.media_id,
            image = %report.image.url,
            secs = elapsed.as_secs(),
            millis = elapsed.subsec_millis(),
            "Run complete"
        ),
        None => error!(
            title = %report.title,
            news = report.news_count,
            placeholder = report.used_placeholder,
            secs = elapsed.as_secs(),
            millis = elapsed.subsec_millis(),
            "Run complete, but the post was not created"
        ),
    }

    Ok(())
}
