//! Publishing to WordPress through its REST API.
//!
//! Two requests per run, both with basic auth (username + application
//! password):
//!
//! | Step | Endpoint | Fallback |
//! |------|----------|----------|
//! | Cover upload | `POST /wp-json/wp/v2/media` | configured default media id, original image URL |
//! | Post creation | `POST /wp-json/wp/v2/posts` | logged, no post id |
//!
//! Neither step returns an error to the caller.

use crate::config::CmsConfig;
use crate::models::{ImageResult, MediaUpload, PublishRequest};
use crate::utils::{escape_html, excerpt, truncate_for_log};
use reqwest::Client;
use reqwest::header::{CONTENT_DISPOSITION, CONTENT_TYPE};
use serde::Deserialize;
use std::error::Error;
use tracing::{error, info, instrument, warn};

/// File name WordPress stores the cover under.
pub const COVER_FILENAME: &str = "cover.jpg";
const COVER_CONTENT_TYPE: &str = "image/jpeg";

#[derive(Debug, Deserialize)]
struct CreatedPost {
    id: u64,
}

/// What [`Publisher::publish`] did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishOutcome {
    pub media_id: u64,
    pub post_id: Option<u64>,
}

/// Uploads the cover and creates the post.
#[derive(Debug)]
pub struct Publisher<'a> {
    client: &'a Client,
    config: &'a CmsConfig,
}

impl<'a> Publisher<'a> {
    pub fn new(client: &'a Client, config: &'a CmsConfig) -> Self {
        Self { client, config }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/wp-json/wp/v2/{}", self.config.base_url, path)
    }

    /// Upload the cover, then create the post. Failures are logged, not returned.
    #[instrument(level = "info", skip_all, fields(%title))]
    pub async fn publish(&self, title: &str, body: &str, image: &ImageResult) -> PublishOutcome {
        let (media_id, hosted_url) = match self.upload_cover(&image.url).await {
            Ok(media) => {
                info!(media_id = media.id, url = %media.source_url, "Uploaded cover image");
                (media.id, media.source_url)
            }
            Err(e) => {
                warn!(
                    error = %e,
                    default_media_id = self.config.default_media_id,
                    "Cover upload failed; using default media"
                );
                (self.config.default_media_id, image.url.clone())
            }
        };

        let request = build_post(
            title,
            render_content(&hosted_url, &image.credit, body),
            body,
            self.config,
            media_id,
        );

        let post_id = match self.create_post(&request).await {
            Ok(id) => {
                info!(post_id = id, "Post published");
                Some(id)
            }
            Err(e) => {
                error!(error = %e, "Publishing post failed");
                None
            }
        };

        PublishOutcome { media_id, post_id }
    }

    async fn upload_cover(&self, image_url: &str) -> Result<MediaUpload, Box<dyn Error>> {
        let bytes = self
            .client
            .get(image_url)
            .send()
            .await?
            .error_for_status()?
            .bytes()
            .await?;
        info!(bytes = bytes.len(), "Downloaded cover image");

        let resp = self
            .client
            .post(self.endpoint("media"))
            .basic_auth(&self.config.username, Some(&self.config.app_password))
            .header(
                CONTENT_DISPOSITION,
                format!("attachment; filename=\"{COVER_FILENAME}\""),
            )
            .header(CONTENT_TYPE, COVER_CONTENT_TYPE)
            .body(bytes)
            .send()
            .await?;

        let status = resp.status();
        let text = resp.text().await?;
        if !status.is_success() {
            return Err(format!("media upload returned {status}: {}", truncate_for_log(&text, 300)).into());
        }
        Ok(serde_json::from_str(&text)?)
    }

    async fn create_post(&self, request: &PublishRequest) -> Result<u64, Box<dyn Error>> {
        let resp = self
            .client
            .post(self.endpoint("posts"))
            .basic_auth(&self.config.username, Some(&self.config.app_password))
            .json(request)
            .send()
            .await?;

        let status = resp.status();
        let text = resp.text().await?;
        if !status.is_success() {
            return Err(format!("post creation returned {status}: {}", truncate_for_log(&text, 300)).into());
        }
        let created: CreatedPost = serde_json::from_str(&text)?;
        Ok(created.id)
    }
}

/// HTML for the post: cover, credit line, then the article.
///
/// The body is split into paragraphs on blank lines; each paragraph is
/// escaped and wrapped in `<p>`, with single newlines kept as `<br/>`.
pub fn render_content(image_url: &str, credit: &str, body: &str) -> String {
    let paragraphs: String = body
        .split("\n\n")
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(|p| {
            let lines: Vec<String> = p.lines().map(|l| escape_html(l.trim())).collect();
            format!("<p>{}</p>", lines.join("<br/>"))
        })
        .collect();

    format!(
        "<img src=\"{}\" alt=\"Cover\"/><p><em>Image by {} on Pixabay</em></p><div>{}</div>",
        escape_html(image_url),
        escape_html(credit),
        paragraphs
    )
}

/// Assemble the posts payload.
pub fn build_post(
    title: &str,
    content: String,
    body: &str,
    config: &CmsConfig,
    featured_media: u64,
) -> PublishRequest {
    PublishRequest {
        title: title.to_string(),
        content,
        status: config.post_status.clone(),
        categories: vec![config.category_id],
        excerpt: excerpt(body),
        featured_media,
    }
}
