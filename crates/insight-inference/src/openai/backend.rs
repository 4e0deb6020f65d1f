//! OpenAI-compatible task extractor implementation.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, info, warn};

use insight_core::defaults::{
    GEN_MAX_TOKENS, GEN_MODEL, GEN_TEMPERATURE, GEN_TIMEOUT_SECS, OPENAI_URL,
};
use insight_core::{Error, RawTask, Result, TaskExtractor};

use super::error::{to_insight_error, OpenAIErrorCode};
use super::types::*;
use crate::parse::parse_task_list;
use crate::prompt::extraction_prompt;

/// Message used when the live provider is selected without credentials.
pub const MISSING_KEY_MESSAGE: &str = "OPENAI_API_KEY or LLM_API_KEY required for openai provider";

/// Configuration for the OpenAI-compatible extractor.
#[derive(Debug, Clone)]
pub struct OpenAIConfig {
    /// Base URL for the API endpoint.
    pub base_url: String,
    /// API key for authentication. Required.
    pub api_key: Option<String>,
    /// Model to use for generation.
    pub model: String,
    /// Request timeout in seconds.
    pub timeout_seconds: u64,
    pub temperature: f32,
    pub max_tokens: u32,
}

impl Default for OpenAIConfig {
    fn default() -> Self {
        Self {
            base_url: OPENAI_URL.to_string(),
            api_key: None,
            model: GEN_MODEL.to_string(),
            timeout_seconds: GEN_TIMEOUT_SECS,
            temperature: GEN_TEMPERATURE,
            max_tokens: GEN_MAX_TOKENS,
        }
    }
}

impl OpenAIConfig {
    /// Create config from environment variables (with defaults).
    ///
    /// | Variable | Default | Description |
    /// |----------|---------|-------------|
    /// | `OPENAI_API_KEY` / `LLM_API_KEY` | (none) | API key, first one set wins |
    /// | `OPENAI_MODEL` | `gpt-4o-mini` | Generation model |
    /// | `OPENAI_BASE_URL` | `https://api.openai.com/v1` | API endpoint |
    /// | `OPENAI_TIMEOUT` | `120` | Request timeout (seconds) |
    pub fn from_env() -> Self {
        let api_key = ["OPENAI_API_KEY", "LLM_API_KEY"]
            .iter()
            .filter_map(|name| std::env::var(name).ok())
            .find(|key| !key.trim().is_empty());

        Self {
            base_url: std::env::var("OPENAI_BASE_URL").unwrap_or_else(|_| OPENAI_URL.to_string()),
            api_key,
            model: std::env::var("OPENAI_MODEL").unwrap_or_else(|_| GEN_MODEL.to_string()),
            timeout_seconds: std::env::var("OPENAI_TIMEOUT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(GEN_TIMEOUT_SECS),
            ..Self::default()
        }
    }
}

/// Task extractor backed by an OpenAI-compatible chat completions endpoint.
pub struct OpenAIExtractor {
    client: Client,
    config: OpenAIConfig,
    api_key: String,
}

impl std::fmt::Debug for OpenAIExtractor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAIExtractor")
            .field("base_url", &self.config.base_url)
            .field("model", &self.config.model)
            .finish()
    }
}

impl OpenAIExtractor {
    /// Create a new extractor. Fails with a configuration error when no API
    /// key is set.
    pub fn new(config: OpenAIConfig) -> Result<Self> {
        let api_key = config
            .api_key
            .clone()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| Error::Config(MISSING_KEY_MESSAGE.to_string()))?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| Error::Inference(format!("Failed to create HTTP client: {}", e)))?;

        info!(
            subsystem = "inference",
            component = "openai",
            op = "init",
            base_url = %config.base_url,
            model = %config.model,
            timeout_secs = config.timeout_seconds,
            "Initializing OpenAI extractor"
        );

        Ok(Self {
            client,
            config,
            api_key,
        })
    }

    /// Get the current configuration.
    pub fn config(&self) -> &OpenAIConfig {
        &self.config
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url.trim_end_matches('/'), path)
    }

    async fn error_from_response(response: reqwest::Response) -> Error {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        let (error_type, message) = match serde_json::from_str::<OpenAIErrorResponse>(&body) {
            Ok(parsed) => (parsed.error.error_type, parsed.error.message),
            Err(_) => (String::new(), format!("OpenAI returned {}", status)),
        };
        to_insight_error(
            OpenAIErrorCode::from_response(status.as_u16(), &error_type),
            &message,
        )
    }
}

#[async_trait]
impl TaskExtractor for OpenAIExtractor {
    async fn extract_tasks(&self, content: &str) -> Result<Vec<RawTask>> {
        let start = Instant::now();
        let request = ChatCompletionRequest {
            model: self.config.model.clone(),
            messages: vec![ChatMessage::user(extraction_prompt(content))],
            temperature: Some(self.config.temperature),
            max_tokens: Some(self.config.max_tokens),
        };

        debug!(
            subsystem = "inference",
            component = "openai",
            op = "extract_tasks",
            model = %self.config.model,
            prompt_len = content.len(),
            "Requesting task extraction"
        );

        let response = self
            .client
            .post(self.endpoint("/chat/completions"))
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| Error::Inference(format!("Request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(Self::error_from_response(response).await);
        }

        let body = response
            .text()
            .await
            .map_err(|e| Error::Inference(format!("Failed to read response: {}", e)))?;

        let completion = match serde_json::from_str::<ChatCompletionResponse>(&body) {
            Ok(completion) => completion,
            Err(e) => {
                warn!(
                    subsystem = "inference",
                    component = "openai",
                    op = "extract_tasks",
                    error = %e,
                    response_len = body.len(),
                    "Unrecognized completion body, treating as empty reply"
                );
                ChatCompletionResponse::default()
            }
        };

        let reply = completion.reply_text();
        let tasks = parse_task_list(reply);

        info!(
            subsystem = "inference",
            component = "openai",
            op = "extract_tasks",
            model = %self.config.model,
            response_len = reply.len(),
            task_count = tasks.len(),
            duration_ms = start.elapsed().as_millis() as u64,
            "Task extraction complete"
        );
        Ok(tasks)
    }

    fn name(&self) -> &str {
        "openai"
    }
}
