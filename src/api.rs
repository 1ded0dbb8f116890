//! Text-generation API access.
//!
//! - [`AskAsync`]: the seam the article generator talks to
//! - [`ChatCompletionClient`]: an OpenAI-compatible `/chat/completions` client
//!
//! A run asks exactly once. There is no retry here; the caller decides what
//! to do when the call fails.

use crate::config::LlmConfig;
use crate::utils::truncate_for_log;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::time::Instant;
use tracing::{info, instrument, warn};

/// Persona given to the model as the system message.
pub const SYSTEM_PROMPT: &str = "You are a senior market analyst for a textile and apparel supplier.";

/// Trait for async LLM interaction.
///
/// Implementors send a prompt to a model and return its reply. The generator
/// only depends on this trait, so tests can substitute canned replies.
pub trait AskAsync {
    /// The type of response returned by the LLM.
    type Response;

    /// Send `text` as the user message and return the reply.
    async fn ask(&self, text: &str) -> Result<Self::Response, Box<dyn Error>>;
}

/// Client for an OpenAI-compatible chat-completions endpoint.
#[derive(Debug)]
pub struct ChatCompletionClient<'a> {
    /// Shared HTTP client (carries the per-request timeout).
    pub client: &'a Client,
    /// Endpoint, key, model and temperature.
    pub config: &'a LlmConfig,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ReplyMessage,
}

#[derive(Debug, Deserialize)]
struct ReplyMessage {
    content: Option<String>,
}

impl<'a> ChatCompletionClient<'a> {
    pub fn new(client: &'a Client, config: &'a LlmConfig) -> Self {
        Self { client, config }
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.config.base_url)
    }
}

impl<'a> AskAsync for ChatCompletionClient<'a> {
    type Response = String;

    #[instrument(level = "info", skip_all, fields(model = %self.config.model))]
    async fn ask(&self, text: &str) -> Result<Self::Response, Box<dyn Error>> {
        let t0 = Instant::now();
        let body = ChatRequest {
            model: &self.config.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: SYSTEM_PROMPT,
                },
                ChatMessage {
                    role: "user",
                    content: text,
                },
            ],
            temperature: self.config.temperature,
        };

        let resp = self
            .client
            .post(self.endpoint())
            .bearer_auth(&self.config.api_key)
            .json(&body)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            warn!(
                %status,
                elapsed_ms = t0.elapsed().as_millis(),
                body = %truncate_for_log(&body, 300),
                "Chat completion returned an error status"
            );
            return Err(format!("chat completion failed with status {status}").into());
        }

        let parsed: ChatResponse = resp.json().await?;
        let content = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or("chat completion response has no message content")?;

        info!(
            elapsed_ms = t0.elapsed().as_millis(),
            chars = content.chars().count(),
            "Chat completion succeeded"
        );
        Ok(content)
    }
}
