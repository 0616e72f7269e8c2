//! Document summarization.
//!
//! `SummarizationService::summarize` never fails: with no client configured, on a
//! provider error or on timeout it returns `fallback_summary` of the input.

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use pdfingest_core::Config;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

const API_VERSION: &str = "2023-06-01";
const MAX_TOKENS: u32 = 1024;

/// Longest input sent to the provider, in characters.
pub const MAX_INPUT_CHARS: usize = 30_000;
/// Window the fallback summary is cut from, in characters.
pub const FALLBACK_WINDOW_CHARS: usize = 500;
/// A sentence boundary at or before this index is ignored by the fallback.
const FALLBACK_MIN_SENTENCE_INDEX: usize = 100;

const SYSTEM_PROMPT: &str = "You are a helpful assistant that summarizes documents in 2-3 sentences.";

/// A provider that turns document text into a short summary.
#[async_trait]
pub trait SummaryClient: Send + Sync {
    async fn summarize(&self, text: &str) -> Result<String>;
}

// Messages API request/response
#[derive(Debug, Serialize)]
struct MessagesRequest {
    model: String,
    max_tokens: u32,
    system: String,
    messages: Vec<MessageParam>,
}

#[derive(Debug, Serialize)]
struct MessageParam {
    role: String,
    content: Vec<ContentBlock>,
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ContentBlock {
    Text { text: String },
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    content: Vec<ContentBlockResponse>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ContentBlockResponse {
    Text {
        text: String,
    },
    #[serde(other)]
    Other,
}

/// Anthropic Messages API client.
#[derive(Clone)]
pub struct AnthropicSummaryClient {
    api_key: String,
    api_base: String,
    model: String,
    client: reqwest::Client,
}

impl AnthropicSummaryClient {
    pub fn new(api_key: String, api_base: String, model: String) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(120))
            .build()
            .context("Failed to create HTTP client")?;
        Ok(Self {
            api_key,
            api_base,
            model,
            client,
        })
    }

    fn messages_url(&self) -> String {
        format!("{}/messages", self.api_base.trim_end_matches('/'))
    }
}

fn build_prompt(text: &str) -> String {
    format!(
        "Provide a concise summary of this document:\n\n{}\n\nSummary:",
        text
    )
}

#[async_trait]
impl SummaryClient for AnthropicSummaryClient {
    async fn summarize(&self, text: &str) -> Result<String> {
        let body = MessagesRequest {
            model: self.model.clone(),
            max_tokens: MAX_TOKENS,
            system: SYSTEM_PROMPT.to_string(),
            messages: vec![MessageParam {
                role: "user".to_string(),
                content: vec![ContentBlock::Text {
                    text: build_prompt(text),
                }],
            }],
        };

        let response = self
            .client
            .post(self.messages_url())
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", API_VERSION)
            .header("content-type", "application/json")
            .json(&body)
            .send()
            .await
            .context("Failed to send Messages API request")?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(anyhow!(
                "Anthropic Messages API failed with status {}: {}",
                status,
                error_text
            ));
        }

        let parsed: MessagesResponse = response
            .json()
            .await
            .context("Failed to parse Messages API response")?;

        let summary = parsed
            .content
            .into_iter()
            .find_map(|b| match b {
                ContentBlockResponse::Text { text } => Some(text),
                ContentBlockResponse::Other => None,
            })
            .map(|t| t.trim().to_string())
            .unwrap_or_default();

        if summary.is_empty() {
            return Err(anyhow!("Messages API returned no text"));
        }

        Ok(summary)
    }
}

/// Summarization with a bounded timeout and a deterministic fallback.
#[derive(Clone)]
pub struct SummarizationService {
    client: Option<Arc<dyn SummaryClient>>,
    timeout: Duration,
}

impl SummarizationService {
    pub fn new(client: Option<Arc<dyn SummaryClient>>, timeout: Duration) -> Self {
        Self { client, timeout }
    }

    /// Build from configuration. Without `ANTHROPIC_API_KEY` only fallback summaries
    /// are produced.
    pub fn from_config(config: &Config) -> Result<Self> {
        let client: Option<Arc<dyn SummaryClient>> = match config.anthropic_api_key() {
            Some(key) => Some(Arc::new(AnthropicSummaryClient::new(
                key.to_string(),
                config.anthropic_api_base().to_string(),
                config.summary_model().to_string(),
            )?)),
            None => None,
        };

        if client.is_some() {
            tracing::info!(model = %config.summary_model(), "AI summarization enabled");
        } else {
            tracing::info!("ANTHROPIC_API_KEY not set; using fallback summaries");
        }

        Ok(Self::new(
            client,
            Duration::from_secs(config.summary_timeout_seconds()),
        ))
    }

    pub async fn summarize(&self, text: &str) -> String {
        let Some(client) = &self.client else {
            return fallback_summary(text);
        };

        let input = truncate_for_prompt(text);
        let start = std::time::Instant::now();

        match tokio::time::timeout(self.timeout, client.summarize(&input)).await {
            Ok(Ok(summary)) => {
                tracing::debug!(
                    summary_length = summary.len(),
                    duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                    "AI summary generated"
                );
                summary
            }
            Ok(Err(e)) => {
                tracing::warn!(error = %e, "AI summarization failed, using fallback");
                fallback_summary(text)
            }
            Err(_) => {
                tracing::warn!(
                    timeout_secs = self.timeout.as_secs(),
                    "AI summarization timed out, using fallback"
                );
                fallback_summary(text)
            }
        }
    }
}

fn truncate_for_prompt(text: &str) -> String {
    match text.char_indices().nth(MAX_INPUT_CHARS) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.to_string(),
    }
}

/// Extractive summary: a prefix of `text` of at most 500 characters, cut after the
/// last full stop when that stop lies past character 100, with trailing whitespace
/// removed.
pub fn fallback_summary(text: &str) -> String {
    let window_end = match text.char_indices().nth(FALLBACK_WINDOW_CHARS) {
        Some((idx, _)) => idx,
        None => return text.trim_end().to_string(),
    };

    let mut window = &text[..window_end];
    if let Some(byte_idx) = window.rfind('.') {
        let char_idx = window[..byte_idx].chars().count();
        if char_idx > FALLBACK_MIN_SENTENCE_INDEX {
            window = &window[..=byte_idx];
        }
    }

    window.trim_end().to_string()
}
