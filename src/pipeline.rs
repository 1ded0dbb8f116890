//! The five-step publishing run.
//!
//! 1. **News**: fetch the latest headlines
//! 2. **Generation**: turn them into an article (or use the placeholder)
//! 3. **Keywords**: take the model's, or extract them from the headlines
//! 4. **Image**: search for a cover (or use the default)
//! 5. **Publish**: upload the cover and create the post
//!
//! Every step has a fallback, so [`run`] always returns a report.

use crate::api::ChatCompletionClient;
use crate::config::Config;
use crate::generator::generate_article;
use crate::images::{ImageFinder, MAX_KEYWORDS, extract_keywords};
use crate::models::{GeneratedArticle, NewsItem, RunReport};
use crate::news::NewsFetcher;
use crate::publish::Publisher;
use crate::utils::dated_title;
use chrono::Local;
use itertools::Itertools;
use reqwest::Client;
use tracing::{info, instrument, warn};

/// Execute one run against the services in `config`.
#[instrument(level = "info", skip_all)]
pub async fn run(config: &Config, client: &Client) -> RunReport {
    let news = NewsFetcher::new(client, &config.news).fetch().await;

    let article = if news.is_empty() {
        warn!("No news available; skipping generation and using placeholder article");
        GeneratedArticle::placeholder()
    } else {
        let asker = ChatCompletionClient::new(client, &config.llm);
        generate_article(&asker, &news).await
    };

    let keywords = choose_keywords(&article, &news);
    info!(?keywords, "Image keywords");
    let image = ImageFinder::new(client, &config.images)
        .find(&keywords)
        .await;

    let title = article
        .title
        .clone()
        .unwrap_or_else(|| dated_title(Local::now().date_naive()));

    let outcome = Publisher::new(client, &config.cms)
        .publish(&title, &article.body, &image)
        .await;

    RunReport {
        title,
        news_count: news.len(),
        used_placeholder: article.is_placeholder(),
        image,
        media_id: outcome.media_id,
        post_id: outcome.post_id,
    }
}

/// Model keywords win; otherwise extract them from the headline text.
pub fn choose_keywords(article: &GeneratedArticle, news: &[NewsItem]) -> Vec<String> {
    if !article.keywords.is_empty() {
        return article.keywords.clone();
    }
    let text = news.iter().map(NewsItem::as_line).join(" ");
    extract_keywords(&text, MAX_KEYWORDS)
}
