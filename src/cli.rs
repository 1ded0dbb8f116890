//! Command-line interface definitions for Daily Insight.
//!
//! Every option can be given as a flag or through the environment, which is how
//! the scheduled job normally supplies credentials. Required values are
//! `Option`s here so that [`crate::config::Config::from_cli`] can report the
//! missing environment variable by name.

use clap::Parser;

/// Command-line arguments for one publishing run.
///
/// # Examples
///
/// ```sh
/// # Everything from the environment
/// daily_insight
///
/// # Rotate between two NewsAPI keys and file posts as drafts
/// daily_insight --news-api-key KEY_A,KEY_B --wordpress-post-status draft
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// NewsAPI key(s), comma-separated; later keys are used when earlier ones are rate limited
    #[arg(long, env = "NEWS_API_KEY", value_delimiter = ',')]
    pub news_api_key: Vec<String>,

    /// Base URL of the news search API
    #[arg(long, env = "NEWS_API_BASE_URL", default_value = "https://newsapi.org")]
    pub news_api_base_url: String,

    /// Topics to search for, in order, comma-separated
    #[arg(
        long,
        env = "NEWS_TOPICS",
        value_delimiter = ',',
        default_value = "textile industry,fabric market,garment manufacturing"
    )]
    pub news_topics: Vec<String>,

    /// Articles requested per news search
    #[arg(long, env = "NEWS_PAGE_SIZE", default_value_t = 3)]
    pub news_page_size: u32,

    /// Language filter for news search
    #[arg(long, env = "NEWS_LANGUAGE", default_value = "en")]
    pub news_language: String,

    /// Seconds to wait after a 429 before trying the next news key
    #[arg(long, env = "NEWS_RATE_LIMIT_PAUSE_SECS", default_value_t = 2)]
    pub news_rate_limit_pause_secs: u64,

    /// Bearer token for the text-generation API
    #[arg(long, env = "OPENAI_API_KEY")]
    pub openai_api_key: Option<String>,

    /// Base URL of the OpenAI-compatible API (without `/chat/completions`)
    #[arg(long, env = "OPENAI_BASE_URL", default_value = "https://api.openai.com/v1")]
    pub openai_base_url: String,

    /// Chat model used to write the article
    #[arg(long, env = "OPENAI_MODEL", default_value = "gpt-4o-mini")]
    pub openai_model: String,

    /// Sampling temperature for the article
    #[arg(long, env = "OPENAI_TEMPERATURE", default_value_t = 0.7)]
    pub openai_temperature: f32,

    /// Pixabay API key
    #[arg(long, env = "PIXABAY_API_KEY")]
    pub pixabay_api_key: Option<String>,

    /// Base URL of the image search API
    #[arg(long, env = "PIXABAY_BASE_URL", default_value = "https://pixabay.com")]
    pub pixabay_base_url: String,

    /// Cover image used when no search hit is found
    #[arg(
        long,
        env = "DEFAULT_IMAGE_URL",
        default_value = "https://cdn.pixabay.com/photo/2016/11/29/05/45/fabric-1867372_1280.jpg"
    )]
    pub default_image_url: String,

    /// Credit shown with the default cover image
    #[arg(long, env = "DEFAULT_IMAGE_CREDIT", default_value = "Pixabay")]
    pub default_image_credit: String,

    /// WordPress site root, e.g. `https://blog.example.com`
    #[arg(long, env = "WORDPRESS_BASE_URL")]
    pub wordpress_base_url: Option<String>,

    /// WordPress user that owns the application password
    #[arg(long, env = "WORDPRESS_USERNAME")]
    pub wordpress_username: Option<String>,

    /// WordPress application password
    #[arg(long, env = "WORDPRESS_APPLICATION_PASSWORD")]
    pub wordpress_application_password: Option<String>,

    /// Category id every post is filed under
    #[arg(long, env = "WORDPRESS_CATEGORY_ID", default_value_t = 2)]
    pub wordpress_category_id: u64,

    /// Featured media id used when the cover upload fails
    #[arg(long, env = "WORDPRESS_DEFAULT_MEDIA_ID", default_value_t = 0)]
    pub wordpress_default_media_id: u64,

    /// Post status (`publish`, `draft`, ...)
    #[arg(long, env = "WORDPRESS_POST_STATUS", default_value = "publish")]
    pub wordpress_post_status: String,

    /// Per-request timeout for every outbound call, in seconds
    #[arg(long, env = "REQUEST_TIMEOUT_SECS", default_value_t = 30)]
    pub request_timeout_secs: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parsing_with_flags() {
        let cli = Cli::parse_from([
            "daily_insight",
            "--news-api-key",
            "a,b",
            "--openai-api-key",
            "sk-test",
            "--pixabay-api-key",
            "px",
            "--wordpress-base-url",
            "https://blog.example.com",
            "--wordpress-username",
            "editor",
            "--wordpress-application-password",
            "abcd efgh",
        ]);

        assert_eq!(cli.news_api_key, vec!["a", "b"]);
        assert_eq!(cli.openai_api_key.as_deref(), Some("sk-test"));
        assert_eq!(
            cli.wordpress_base_url.as_deref(),
            Some("https://blog.example.com")
        );
        assert_eq!(cli.wordpress_category_id, 2);
        assert_eq!(cli.news_page_size, 3);
    }

    #[test]
    fn test_cli_topics_are_split_on_commas() {
        let cli = Cli::parse_from([
            "daily_insight",
            "--news-topics",
            "denim,yarn prices",
            "--wordpress-post-status",
            "draft",
        ]);

        assert_eq!(cli.news_topics, vec!["denim", "yarn prices"]);
        assert_eq!(cli.wordpress_post_status, "draft");
    }
}
