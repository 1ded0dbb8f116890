//! Validated runtime configuration.
//!
//! [`Config`] is built once in `main` from the parsed [`Cli`] and then borrowed
//! by every pipeline step. Building it performs no network I/O; any problem is
//! a [`ConfigError`] and ends the process before the first request.

use crate::cli::Cli;
use std::time::Duration;
use thiserror::Error;
use url::Url;

/// A configuration problem detected at startup.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("missing required setting {0}")]
    Missing(&'static str),

    #[error("{name} is not a valid http(s) URL: {value}")]
    InvalidUrl { name: &'static str, value: String },

    #[error("{0} must be at least 1")]
    NotPositive(&'static str),
}

#[derive(Debug, Clone)]
pub struct NewsConfig {
    pub base_url: String,
    pub api_keys: Vec<String>,
    pub topics: Vec<String>,
    pub page_size: u32,
    pub language: String,
    pub rate_limit_pause: Duration,
}

#[derive(Debug, Clone)]
pub struct LlmConfig {
    pub base_url: String,
    pub api_key: String,
    pub model: String,
    pub temperature: f32,
}

#[derive(Debug, Clone)]
pub struct ImageConfig {
    pub base_url: String,
    pub api_key: String,
    pub default_url: String,
    pub default_credit: String,
}

#[derive(Debug, Clone)]
pub struct CmsConfig {
    pub base_url: String,
    pub username: String,
    pub app_password: String,
    pub category_id: u64,
    pub default_media_id: u64,
    pub post_status: String,
}

/// Everything one run needs, grouped per external service.
#[derive(Debug, Clone)]
pub struct Config {
    pub news: NewsConfig,
    pub llm: LlmConfig,
    pub images: ImageConfig,
    pub cms: CmsConfig,
    pub request_timeout: Duration,
}

impl Config {
    /// Validate CLI/environment input into a [`Config`].
    ///
    /// Blank values count as missing. Base URLs are stored without a trailing
    /// slash so endpoint paths can be appended directly.
    pub fn from_cli(cli: Cli) -> Result<Self, ConfigError> {
        let api_keys = non_blank_list(cli.news_api_key);
        if api_keys.is_empty() {
            return Err(ConfigError::Missing("NEWS_API_KEY"));
        }
        let topics = non_blank_list(cli.news_topics);
        if topics.is_empty() {
            return Err(ConfigError::Missing("NEWS_TOPICS"));
        }
        if cli.news_page_size == 0 {
            return Err(ConfigError::NotPositive("NEWS_PAGE_SIZE"));
        }

        let wordpress_base_url = required(cli.wordpress_base_url, "WORDPRESS_BASE_URL")?;

        Ok(Config {
            news: NewsConfig {
                base_url: base_url(&cli.news_api_base_url, "NEWS_API_BASE_URL")?,
                api_keys,
                topics,
                page_size: cli.news_page_size,
                language: cli.news_language.trim().to_string(),
                rate_limit_pause: Duration::from_secs(cli.news_rate_limit_pause_secs),
            },
            llm: LlmConfig {
                base_url: base_url(&cli.openai_base_url, "OPENAI_BASE_URL")?,
                api_key: required(cli.openai_api_key, "OPENAI_API_KEY")?,
                model: cli.openai_model,
                temperature: cli.openai_temperature,
            },
            images: ImageConfig {
                base_url: base_url(&cli.pixabay_base_url, "PIXABAY_BASE_URL")?,
                api_key: required(cli.pixabay_api_key, "PIXABAY_API_KEY")?,
                default_url: cli.default_image_url,
                default_credit: cli.default_image_credit,
            },
            cms: CmsConfig {
                base_url: base_url(&wordpress_base_url, "WORDPRESS_BASE_URL")?,
                username: required(cli.wordpress_username, "WORDPRESS_USERNAME")?,
                app_password: required(
                    cli.wordpress_application_password,
                    "WORDPRESS_APPLICATION_PASSWORD",
                )?,
                category_id: cli.wordpress_category_id,
                default_media_id: cli.wordpress_default_media_id,
                post_status: cli.wordpress_post_status,
            },
            request_timeout: Duration::from_secs(cli.request_timeout_secs),
        })
    }
}

fn required(value: Option<String>, name: &'static str) -> Result<String, ConfigError> {
    match value.map(|v| v.trim().to_string()) {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(ConfigError::Missing(name)),
    }
}

fn non_blank_list(values: Vec<String>) -> Vec<String> {
    values
        .into_iter()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .collect()
}

fn base_url(value: &str, name: &'static str) -> Result<String, ConfigError> {
    let invalid = || ConfigError::InvalidUrl {
        name,
        value: value.to_string(),
    };
    let parsed = Url::parse(value.trim()).map_err(|_| invalid())?;
    if !matches!(parsed.scheme(), "http" | "https") || parsed.host_str().is_none() {
        return Err(invalid());
    }
    Ok(value.trim().trim_end_matches('/').to_string())
}
