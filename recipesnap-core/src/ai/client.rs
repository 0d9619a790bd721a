//! AI client implementation against an OpenAI-compatible chat API (OpenRouter by default).

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;

use super::cache::{AiCache, CacheKey};
use super::config::AiConfig;
use super::types::{ChatMessage, ChatRequest, ChatResponse, Usage};
use crate::error::InferenceError;

/// Trait for AI clients.
#[async_trait]
pub trait AiClient: Send + Sync {
    /// Complete a chat request.
    ///
    /// `prompt_name` and `prompt_version` organize the cache; bumping the
    /// version of a prompt template invalidates its cached answers.
    async fn complete(
        &self,
        prompt_name: &str,
        prompt_version: &str,
        request: ChatRequest,
    ) -> Result<ChatResponse, InferenceError>;
}

/// AI client with caching and rate limiting.
pub struct CachingAiClient {
    http: reqwest::Client,
    cache: Option<AiCache>,
    config: AiConfig,
    last_request: Arc<Mutex<Option<Instant>>>,
}

#[derive(Debug, Serialize)]
struct CompletionBody<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<ResponseFormat>,
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    format_type: &'static str,
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    choices: Vec<Choice>,
    #[serde(default)]
    usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
}

#[derive(Debug, Deserialize)]
struct ApiErrorResponse {
    error: ApiErrorBody,
}

impl CachingAiClient {
    /// Create a new client from environment configuration.
    pub fn from_env() -> Result<Self, InferenceError> {
        let config = AiConfig::from_env()?;
        Self::new(config)
    }

    /// Create a new client with the given configuration.
    pub fn new(config: AiConfig) -> Result<Self, InferenceError> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| InferenceError::Transport(e.to_string()))?;

        let cache = config.cache_dir.clone().map(AiCache::new);

        Ok(Self {
            http,
            cache,
            config,
            last_request: Arc::new(Mutex::new(None)),
        })
    }

    pub fn config(&self) -> &AiConfig {
        &self.config
    }

    /// Apply rate limiting between requests.
    async fn rate_limit(&self) {
        let mut last = self.last_request.lock().await;

        if let Some(last_time) = *last {
            let elapsed = last_time.elapsed();
            let min_interval = Duration::from_millis(self.config.rate_limit_ms);

            if elapsed < min_interval {
                tokio::time::sleep(min_interval - elapsed).await;
            }
        }

        *last = Some(Instant::now());
    }

    async fn send(&self, request: &ChatRequest) -> Result<ChatResponse, InferenceError> {
        let body = CompletionBody {
            model: &self.config.model,
            messages: &request.messages,
            max_tokens: request.max_tokens,
            temperature: request.temperature,
            response_format: request.json_response.then_some(ResponseFormat {
                format_type: "json_object",
            }),
        };

        let response = self
            .http
            .post(self.config.completions_url())
            .bearer_auth(&self.config.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| InferenceError::Transport(e.to_string()))?;

        let status = response.status().as_u16();
        let text = response
            .text()
            .await
            .map_err(|e| InferenceError::Transport(e.to_string()))?;

        if !(200..300).contains(&status) {
            let message = serde_json::from_str::<ApiErrorResponse>(&text)
                .map(|e| e.error.message)
                .unwrap_or(text);
            return Err(InferenceError::Api { status, message });
        }

        let parsed: CompletionResponse = serde_json::from_str(&text)
            .map_err(|e| InferenceError::schema("chat completion", e.to_string()))?;

        let content = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| InferenceError::schema("chat completion", "no message content"))?;

        Ok(ChatResponse {
            content,
            usage: parsed.usage.unwrap_or_default(),
            cached: false,
        })
    }
}

#[async_trait]
impl AiClient for CachingAiClient {
    async fn complete(
        &self,
        prompt_name: &str,
        prompt_version: &str,
        request: ChatRequest,
    ) -> Result<ChatResponse, InferenceError> {
        let cache_key = CacheKey::new(
            prompt_name,
            prompt_version,
            &self.config.model,
            &request.messages,
        );

        if let Some(cached) = self.cache.as_ref().and_then(|c| c.get(&cache_key)) {
            tracing::debug!(prompt_name, "AI response found in cache");
            return Ok(cached.into());
        }

        if self.config.offline {
            return Err(InferenceError::OfflineNotCached);
        }

        self.rate_limit().await;

        tracing::debug!(
            prompt_name,
            model = %self.config.model,
            "Calling AI API"
        );

        let chat_response = self.send(&request).await?;

        if let Some(cache) = &self.cache {
            if let Err(e) = cache.put(&cache_key, &chat_response, &self.config.model) {
                tracing::warn!(error = %e, "Failed to cache AI response");
            }
        }

        Ok(chat_response)
    }
}
