//! Data models passed between the pipeline steps.
//!
//! - [`NewsItem`]: one headline returned by the news search
//! - [`GeneratedArticle`]: the model's article plus anything parsed out of it
//! - [`ImageResult`]: the cover image and who to credit for it
//! - [`PublishRequest`]: the exact JSON body sent to the WordPress posts endpoint
//! - [`MediaUpload`]: what WordPress returns for an uploaded cover
//! - [`RunReport`]: what one run did, for the final log line
//!
//! Nothing here outlives a single run.

use serde::{Deserialize, Serialize};

/// A headline and optional description from the news search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewsItem {
    pub title: String,
    pub description: Option<String>,
}

impl NewsItem {
    /// Render as the `"title: description"` line fed to the model.
    ///
    /// A missing or blank description yields just the title.
    pub fn as_line(&self) -> String {
        match self.description.as_deref().map(str::trim) {
            Some(desc) if !desc.is_empty() => format!("{}: {}", self.title.trim(), desc),
            _ => self.title.trim().to_string(),
        }
    }
}

/// Text produced by the generation step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedArticle {
    /// Article prose with any `Title:`/`Keywords:` lines removed.
    pub body: String,
    /// Headline from a leading `Title:` line, if the model wrote one.
    pub title: Option<String>,
    /// Lowercased cover-image keywords from a trailing `Keywords:` line.
    pub keywords: Vec<String>,
}

/// Substituted whenever no article could be generated.
pub const PLACEHOLDER_BODY: &str = "Today's industry briefing is still being prepared. \
Our analysts are reviewing the latest developments across the textile and apparel supply chain, \
and a full market insight will be published here shortly.";

impl GeneratedArticle {
    pub fn placeholder() -> Self {
        Self {
            body: PLACEHOLDER_BODY.to_string(),
            title: None,
            keywords: Vec::new(),
        }
    }

    pub fn is_placeholder(&self) -> bool {
        self.body == PLACEHOLDER_BODY
    }
}

/// The chosen cover image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageResult {
    pub url: String,
    /// Uploader name shown under the image.
    pub credit: String,
}

/// Body of `POST /wp-json/wp/v2/posts`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PublishRequest {
    pub title: String,
    pub content: String,
    pub status: String,
    pub categories: Vec<u64>,
    pub excerpt: String,
    pub featured_media: u64,
}

/// Response of `POST /wp-json/wp/v2/media`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct MediaUpload {
    pub id: u64,
    pub source_url: String,
}

/// Outcome of one pipeline run.
#[derive(Debug, Clone)]
pub struct RunReport {
    pub title: String,
    pub news_count: usize,
    pub used_placeholder: bool,
    pub image: ImageResult,
    pub media_id: u64,
    /// `None` when the post could not be created.
    pub post_id: Option<u64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_news_item_line_with_description() {
        let item = NewsItem {
            title: "Cotton prices rise".to_string(),
            description: Some(" Mills brace for higher costs ".to_string()),
        };
        assert_eq!(item.as_line(), "Cotton prices rise: Mills brace for higher costs");
    }

    #[test]
    fn test_news_item_line_without_description() {
        let item = NewsItem {
            title: "Cotton prices rise".to_string(),
            description: None,
        };
        assert_eq!(item.as_line(), "Cotton prices rise");

        let blank = NewsItem {
            title: "Cotton prices rise".to_string(),
            description: Some("  ".to_string()),
        };
        assert_eq!(blank.as_line(), "Cotton prices rise");
    }

    #[test]
    fn test_placeholder_detection() {
        assert!(GeneratedArticle::placeholder().is_placeholder());
        let real = GeneratedArticle {
            body: "Real prose".to_string(),
            title: None,
            keywords: vec![],
        };
        assert!(!real.is_placeholder());
    }

    #[test]
    fn test_publish_request_serialization() {
        let req = PublishRequest {
            title: "T".to_string(),
            content: "<div>x</div>".to_string(),
            status: "publish".to_string(),
            categories: vec![2],
            excerpt: "x…".to_string(),
            featured_media: 9,
        };
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["categories"], serde_json::json!([2]));
        assert_eq!(json["featured_media"], 9);
        assert_eq!(json["status"], "publish");
    }
}
