//! Cover image search against a Pixabay-style `/api/` endpoint.
//!
//! Keywords come from the model when it supplied some, otherwise from
//! [`extract_keywords`] over the news text. Each keyword is searched in turn;
//! the first one with hits wins and one hit is picked at random. When nothing
//! is found the configured default image is returned.

use crate::config::ImageConfig;
use crate::models::ImageResult;
use itertools::Itertools;
use once_cell::sync::Lazy;
use rand::seq::IndexedRandom;
use regex::Regex;
use reqwest::Client;
use serde::Deserialize;
use std::collections::HashSet;
use std::error::Error;
use tracing::{debug, info, instrument, warn};

/// Upper bound on keywords searched per run.
pub const MAX_KEYWORDS: usize = 3;

static LONG_WORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b\w{5,}\b").expect("word regex"));

/// Words too generic to find a meaningful photo.
static STOPWORDS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "technology",
        "market",
        "latest",
        "update",
        "industry",
        "report",
        "global",
    ]
    .into_iter()
    .collect()
});

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    hits: Vec<Hit>,
}

#[derive(Debug, Clone, Deserialize)]
struct Hit {
    #[serde(rename = "largeImageURL")]
    large_image_url: String,
    #[serde(default)]
    user: String,
}

/// Pull up to `max` search keywords out of free text.
///
/// Words of five or more characters are lowercased, stopwords dropped and
/// duplicates removed, keeping the order of first appearance.
pub fn extract_keywords(text: &str, max: usize) -> Vec<String> {
    LONG_WORD
        .find_iter(text)
        .map(|m| m.as_str().to_lowercase())
        .filter(|w| !STOPWORDS.contains(w.as_str()))
        .unique()
        .take(max)
        .collect()
}

/// Searches for a cover image, falling back to the configured default.
#[derive(Debug)]
pub struct ImageFinder<'a> {
    client: &'a Client,
    config: &'a ImageConfig,
}

impl<'a> ImageFinder<'a> {
    pub fn new(client: &'a Client, config: &'a ImageConfig) -> Self {
        Self { client, config }
    }

    /// The image used when no search produced a hit.
    pub fn fallback(&self) -> ImageResult {
        ImageResult {
            url: self.config.default_url.clone(),
            credit: self.config.default_credit.clone(),
        }
    }

    /// Search `keywords` in order and return the first hit, or the fallback.
    #[instrument(level = "info", skip_all, fields(keywords = ?keywords))]
    pub async fn find(&self, keywords: &[String]) -> ImageResult {
        for keyword in keywords.iter().take(MAX_KEYWORDS) {
            match self.search(keyword).await {
                Ok(hits) => {
                    let Some(hit) = hits.choose(&mut rand::rng()) else {
                        debug!(%keyword, "No image hits");
                        continue;
                    };
                    info!(%keyword, candidates = hits.len(), url = %hit.large_image_url, "Selected cover image");
                    return ImageResult {
                        url: hit.large_image_url.clone(),
                        credit: hit.user.clone(),
                    };
                }
                Err(e) => {
                    warn!(%keyword, error = %e, "Image search failed");
                }
            }
        }

        let fallback = self.fallback();
        warn!(url = %fallback.url, "No image found; using default cover");
        fallback
    }

    async fn search(&self, keyword: &str) -> Result<Vec<Hit>, Box<dyn Error>> {
        let resp = self
            .client
            .get(format!("{}/api/", self.config.base_url))
            .query(&[
                ("key", self.config.api_key.as_str()),
                ("q", keyword),
                ("image_type", "photo"),
                ("orientation", "horizontal"),
                ("safesearch", "true"),
                ("per_page", "10"),
            ])
            .send()
            .await?
            .error_for_status()?;

        let parsed: SearchResponse = resp.json().await?;
        Ok(parsed
            .hits
            .into_iter()
            .filter(|h| !h.large_image_url.trim().is_empty())
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::tests::config_for;
    use mockito::Matcher;

    fn kw(words: &[&str]) -> Vec<String> {
        words.iter().map(|w| w.to_string()).collect()
    }

    #[test]
    fn test_extract_keywords_basic() {
        let text = "Fabric prices: thread makers warn textile buyers. Fabric again.";
        assert_eq!(
            extract_keywords(text, 3),
            vec!["fabric", "prices", "thread"]
        );
    }

    #[test]
    fn test_extract_keywords_drops_stopwords_and_short_words() {
        let text = "Global market report: the latest industry update on yarn and Denim";
        assert_eq!(extract_keywords(text, 3), vec!["denim"]);
    }

    #[test]
    fn test_extract_keywords_dedupes_case_insensitively() {
        let text = "Cotton COTTON cotton linen";
        assert_eq!(extract_keywords(text, 5), vec!["cotton", "linen"]);
    }

    #[test]
    fn test_extract_keywords_empty_text() {
        assert!(extract_keywords("", 3).is_empty());
        assert!(extract_keywords("a bb ccc dddd", 3).is_empty());
    }

    #[tokio::test]
    async fn test_find_returns_first_keyword_with_hits() {
        let mut server = mockito::Server::new_async().await;
        let config = config_for(&server.url());
        let miss = server
            .mock("GET", "/api/")
            .match_query(Matcher::UrlEncoded("q".into(), "velvet".into()))
            .with_status(200)
            .with_body(r#"{"total":0,"totalHits":0,"hits":[]}"#)
            .create_async()
            .await;
        let hit = server
            .mock("GET", "/api/")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("q".into(), "fabric".into()),
                Matcher::UrlEncoded("key".into(), "px-test".into()),
                Matcher::UrlEncoded("image_type".into(), "photo".into()),
            ]))
            .with_status(200)
            .with_body(
                r#"{"hits":[{"largeImageURL":"https://cdn.example.com/fabric.jpg","user":"weaver42"}]}"#,
            )
            .create_async()
            .await;

        let http = Client::new();
        let image = ImageFinder::new(&http, &config.images)
            .find(&kw(&["velvet", "fabric", "thread"]))
            .await;

        assert_eq!(image.url, "https://cdn.example.com/fabric.jpg");
        assert_eq!(image.credit, "weaver42");
        miss.assert_async().await;
        hit.assert_async().await;
    }

    #[tokio::test]
    async fn test_find_picks_among_hits() {
        let mut server = mockito::Server::new_async().await;
        let config = config_for(&server.url());
        server
            .mock("GET", "/api/")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(
                r#"{"hits":[
                    {"largeImageURL":"https://cdn.example.com/a.jpg","user":"ann"},
                    {"largeImageURL":"https://cdn.example.com/b.jpg","user":"bob"}
                ]}"#,
            )
            .create_async()
            .await;

        let http = Client::new();
        let image = ImageFinder::new(&http, &config.images)
            .find(&kw(&["silk"]))
            .await;

        assert!(
            (image.url.ends_with("a.jpg") && image.credit == "ann")
                || (image.url.ends_with("b.jpg") && image.credit == "bob")
        );
    }

    #[tokio::test]
    async fn test_no_hits_returns_exact_default() {
        let mut server = mockito::Server::new_async().await;
        let config = config_for(&server.url());
        let mock = server
            .mock("GET", "/api/")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(r#"{"hits":[]}"#)
            .expect(3)
            .create_async()
            .await;

        let http = Client::new();
        let finder = ImageFinder::new(&http, &config.images);
        let image = finder.find(&kw(&["one11", "two22", "three", "four4"])).await;

        assert_eq!(image, finder.fallback());
        assert_eq!(image.credit, "Default Credit");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_errors_and_empty_keywords_return_default() {
        let mut server = mockito::Server::new_async().await;
        let config = config_for(&server.url());
        server
            .mock("GET", "/api/")
            .match_query(Matcher::Any)
            .with_status(400)
            .with_body("[ERROR 400] Invalid or missing API key")
            .create_async()
            .await;

        let http = Client::new();
        let finder = ImageFinder::new(&http, &config.images);
        assert_eq!(finder.find(&kw(&["fabric"])).await, finder.fallback());
        assert_eq!(finder.find(&[]).await, finder.fallback());
    }
}
