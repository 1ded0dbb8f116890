//! News search against a NewsAPI-style `/v2/everything` endpoint.
//!
//! Topics are tried in order and, for each topic, every configured key in
//! order. The first response with at least one usable article wins. Nothing
//! here fails outward: a run with no news simply gets an empty list.

use crate::config::NewsConfig;
use crate::models::NewsItem;
use crate::utils::truncate_for_log;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::error::Error;
use tracing::{debug, info, instrument, warn};

/// Title NewsAPI substitutes for articles that were taken down.
const REMOVED_MARKER: &str = "[Removed]";

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    articles: Vec<RawArticle>,
}

#[derive(Debug, Deserialize)]
struct RawArticle {
    title: Option<String>,
    description: Option<String>,
}

/// Result of a single topic/key request.
enum Attempt {
    Found(Vec<NewsItem>),
    Empty,
    RateLimited,
}

/// Fetches the latest headlines for the configured topics.
#[derive(Debug)]
pub struct NewsFetcher<'a> {
    client: &'a Client,
    config: &'a NewsConfig,
}

impl<'a> NewsFetcher<'a> {
    pub fn new(client: &'a Client, config: &'a NewsConfig) -> Self {
        Self { client, config }
    }

    /// Return the first non-empty batch of news items, or an empty list.
    ///
    /// A 429 pauses for the configured interval and moves on to the next key.
    /// Any other failure is logged and the next topic/key pair is tried.
    #[instrument(level = "info", skip_all, fields(topics = self.config.topics.len(), keys = self.config.api_keys.len()))]
    pub async fn fetch(&self) -> Vec<NewsItem> {
        for topic in &self.config.topics {
            for (key_index, key) in self.config.api_keys.iter().enumerate() {
                match self.search(topic, key).await {
                    Ok(Attempt::Found(items)) => {
                        info!(%topic, key_index, count = items.len(), "Fetched news");
                        return items;
                    }
                    Ok(Attempt::Empty) => {
                        debug!(%topic, key_index, "No articles for topic");
                    }
                    Ok(Attempt::RateLimited) => {
                        warn!(
                            %topic,
                            key_index,
                            pause_ms = self.config.rate_limit_pause.as_millis(),
                            "News API rate limited; trying next key"
                        );
                        tokio::time::sleep(self.config.rate_limit_pause).await;
                    }
                    Err(e) => {
                        warn!(%topic, key_index, error = %e, "News request failed");
                    }
                }
            }
        }

        warn!("No news found for any topic/key combination");
        Vec::new()
    }

    async fn search(&self, topic: &str, key: &str) -> Result<Attempt, Box<dyn Error>> {
        let page_size = self.config.page_size.to_string();
        let mut query = vec![
            ("q", topic),
            ("sortBy", "publishedAt"),
            ("pageSize", page_size.as_str()),
            ("apiKey", key),
        ];
        if !self.config.language.is_empty() {
            query.push(("language", self.config.language.as_str()));
        }

        let resp = self
            .client
            .get(format!("{}/v2/everything", self.config.base_url))
            .query(&query)
            .send()
            .await?;

        let status = resp.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            return Ok(Attempt::RateLimited);
        }
        let body = resp.text().await?;
        if !status.is_success() {
            return Err(format!(
                "news search returned {status}: {}",
                truncate_for_log(&body, 200)
            )
            .into());
        }

        let parsed: SearchResponse = serde_json::from_str(&body)?;
        let items = usable_items(parsed.articles);
        if items.is_empty() {
            Ok(Attempt::Empty)
        } else {
            Ok(Attempt::Found(items))
        }
    }
}

fn usable_items(articles: Vec<RawArticle>) -> Vec<NewsItem> {
    articles
        .into_iter()
        .filter_map(|a| {
            let title = a.title?.trim().to_string();
            if title.is_empty() || title == REMOVED_MARKER {
                return None;
            }
            Some(NewsItem {
                title,
                description: a.description,
            })
        })
        .collect()
}
