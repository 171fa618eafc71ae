//! Mistral chat completions client.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{tone_adjustment_prompt, LazyRewriter, RewriteOptions, Rewriter, UpstreamError};
use crate::config::MistralConfig;

const CHAT_COMPLETIONS_PATH: &str = "/v1/chat/completions";

/// Rewriter backed by the Mistral HTTP API.
#[derive(Debug, Clone)]
pub struct MistralClient {
    http: reqwest::Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl MistralClient {
    /// Builds a client. Fails when no API key is configured.
    pub fn new(
        api_key: impl Into<String>,
        model: impl Into<String>,
        base_url: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, UpstreamError> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(UpstreamError::NotInitialized(
                "MISTRAL_API_KEY is not set".to_string(),
            ));
        }

        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| UpstreamError::NotInitialized(e.to_string()))?;

        Ok(Self {
            http,
            api_key,
            model: model.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn from_config(config: &MistralConfig) -> Result<Self, UpstreamError> {
        Self::new(
            config.api_key.clone().unwrap_or_default(),
            config.model.clone(),
            config.base_url.clone(),
            config.timeout,
        )
    }

    /// Wraps construction from `config` in a [`LazyRewriter`].
    pub fn lazy(config: &MistralConfig) -> LazyRewriter {
        let config = config.clone();
        LazyRewriter::new(
            "mistral",
            Box::new(move || Self::from_config(&config).map(|c| Arc::new(c) as Arc<dyn Rewriter>)),
        )
    }

    fn chat_completions_url(&self) -> String {
        format!("{}{}", self.base_url, CHAT_COMPLETIONS_PATH)
    }
}

#[async_trait]
impl Rewriter for MistralClient {
    async fn rewrite(
        &self,
        text: &str,
        tone_description: &str,
        options: &RewriteOptions,
    ) -> Result<String, UpstreamError> {
        let prompt = tone_adjustment_prompt(text, tone_description);
        let body = ChatRequest {
            model: &self.model,
            messages: vec![ChatMessage {
                role: "user",
                content: &prompt,
            }],
            temperature: options.temperature,
            max_tokens: options.max_tokens,
        };

        debug!(
            chars = text.chars().count(),
            tone = tone_description,
            "Sending request to Mistral AI"
        );

        let response = self
            .http
            .post(self.chat_completions_url())
            .bearer_auth(&self.api_key)
            .timeout(options.timeout)
            .json(&body)
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(UpstreamError::RateLimited);
        }
        if status.is_server_error() {
            return Err(UpstreamError::Server(status.as_u16()));
        }
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            return Err(UpstreamError::Other(format!("HTTP {}: {}", status, error_body)));
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|e| UpstreamError::Other(format!("Failed to parse response: {}", e)))?;

        let adjusted = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .map(|content| content.trim().to_string())
            .filter(|content| !content.is_empty())
            .ok_or_else(|| UpstreamError::Other("No content in response".to_string()))?;

        debug!(chars = adjusted.chars().count(), "Received response from Mistral AI");
        Ok(adjusted)
    }

    fn name(&self) -> &'static str {
        "mistral"
    }
}

fn map_transport_error(e: reqwest::Error) -> UpstreamError {
    if e.is_timeout() {
        UpstreamError::Timeout
    } else {
        UpstreamError::Other(format!("Request failed: {}", e))
    }
}

// == Wire Types ==

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}
