//! Article generation from the collected news.
//!
//! The model is asked once with a fixed instruction. Its free-text reply is
//! split by [`parse_generated`] into a headline, the article body and the
//! cover-image keywords. Any failure yields the placeholder article instead.

use crate::api::AskAsync;
use crate::models::{GeneratedArticle, NewsItem};
use crate::utils::truncate_for_log;
use itertools::Itertools;
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{error, info, instrument, warn};

static TITLE_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^\s*(?:#+\s*)?(?:\*\*)?\s*title\s*(?:\*\*)?\s*[:：]\s*(?:\*\*)?\s*(.*?)\s*$")
        .expect("title regex")
});

static KEYWORDS_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^\s*(?:\*\*)?\s*keywords?\s*(?:\*\*)?\s*[:：]\s*(?:\*\*)?\s*(.*?)\s*$")
        .expect("keywords regex")
});

/// Build the single instruction sent to the model.
pub fn build_prompt(news: &[NewsItem]) -> String {
    let lines = news.iter().map(NewsItem::as_line).join("\n");
    format!(
        "Based on the following industry news highlights, write an original market insight \
article of about 500 words for the customers of a textile and fabric supplier.\n\
Structure it as a short introduction, an analysis of the key trends, and a closing outlook \
that connects the trends to the strengths of our products.\n\
Write plain paragraphs separated by blank lines, without markdown.\n\
The first line must be \"Title: <a concise headline>\".\n\
The last line must be \"Keywords: <three single English words for a cover photo, comma-separated>\".\n\n\
News highlights:\n{lines}"
    )
}

/// Ask the model for an article about `news`.
///
/// Transport errors, error statuses, missing content and replies that leave no
/// body after parsing all produce [`GeneratedArticle::placeholder`].
#[instrument(level = "info", skip_all, fields(news = news.len()))]
pub async fn generate_article<A>(asker: &A, news: &[NewsItem]) -> GeneratedArticle
where
    A: AskAsync<Response = String>,
{
    let prompt = build_prompt(news);
    match asker.ask(&prompt).await {
        Ok(raw) => {
            let article = parse_generated(&raw);
            if article.body.is_empty() {
                warn!(
                    response_preview = %truncate_for_log(&raw, 300),
                    "Model reply had no article body; using placeholder"
                );
                return GeneratedArticle::placeholder();
            }
            info!(
                chars = article.body.chars().count(),
                has_title = article.title.is_some(),
                keywords = ?article.keywords,
                "Generated article"
            );
            article
        }
        Err(e) => {
            error!(error = %e, "Article generation failed; using placeholder");
            GeneratedArticle::placeholder()
        }
    }
}

/// Split a model reply into title, body and keywords.
///
/// Only the first non-empty line is considered for `Title:` and only the last
/// non-empty line for `Keywords:`. When either marker is absent the field is
/// left empty and the line stays in the body; nothing is inferred from the
/// prose itself.
pub fn parse_generated(raw: &str) -> GeneratedArticle {
    let mut lines: Vec<&str> = raw.lines().collect();

    let mut title = None;
    if let Some(first) = lines.iter().position(|l| !l.trim().is_empty()) {
        if let Some(caps) = TITLE_LINE.captures(lines[first]) {
            let cleaned = clean_title(&caps[1]);
            if !cleaned.is_empty() {
                title = Some(cleaned);
            }
            lines.remove(first);
        }
    }

    let mut keywords = Vec::new();
    if let Some(last) = lines.iter().rposition(|l| !l.trim().is_empty()) {
        if let Some(caps) = KEYWORDS_LINE.captures(lines[last]) {
            keywords = split_keywords(&caps[1]);
            lines.remove(last);
        }
    }

    GeneratedArticle {
        body: lines.join("\n").trim().to_string(),
        title,
        keywords,
    }
}

fn clean_title(s: &str) -> String {
    s.trim()
        .trim_matches(|c: char| matches!(c, '*' | '"' | '\'' | '“' | '”' | '#'))
        .trim()
        .to_string()
}

fn split_keywords(s: &str) -> Vec<String> {
    s.split([',', '，', ';'])
        .map(|k| {
            k.trim()
                .trim_matches(|c: char| matches!(c, '*' | '"' | '\'' | '.'))
                .trim()
                .to_lowercase()
        })
        .filter(|k| !k.is_empty())
        .unique()
        .collect()
}
