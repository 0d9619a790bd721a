//! AI configuration from environment variables.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

pub use crate::error::ConfigError;

/// Default OpenRouter base URL.
pub const DEFAULT_BASE_URL: &str = "https://openrouter.ai/api/v1";

/// Default model. Must accept image input for ingredient extraction.
pub const DEFAULT_MODEL: &str = "openai/gpt-4o-mini";

/// Default rate limit between requests in milliseconds.
pub const DEFAULT_RATE_LIMIT_MS: u64 = 500;

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// AI client configuration.
#[derive(Debug, Clone)]
pub struct AiConfig {
    /// API key for OpenRouter.
    pub api_key: String,
    /// Model name (e.g., "openai/gpt-4o-mini").
    pub model: String,
    /// Base URL for the API.
    pub base_url: String,
    /// Directory for caching responses. None disables the cache.
    pub cache_dir: Option<PathBuf>,
    /// If true, only use cache, error if not cached.
    pub offline: bool,
    /// Milliseconds to wait between requests.
    pub rate_limit_ms: u64,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl AiConfig {
    /// Configuration with defaults for everything but the key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            cache_dir: Some(Self::default_cache_dir()),
            offline: false,
            rate_limit_ms: DEFAULT_RATE_LIMIT_MS,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    /// Load configuration from environment variables.
    ///
    /// Required:
    /// - `OPENROUTER_API_KEY`: API key for OpenRouter
    ///
    /// Optional:
    /// - `RECIPESNAP_AI_MODEL`: Model name (default: "openai/gpt-4o-mini")
    /// - `RECIPESNAP_AI_BASE_URL`: API base URL (default: "https://openrouter.ai/api/v1")
    /// - `RECIPESNAP_AI_CACHE_DIR`: Cache directory (default: "~/.recipesnap/ai-cache")
    /// - `RECIPESNAP_AI_CACHE`: "false" or "0" disables the cache
    /// - `RECIPESNAP_AI_OFFLINE`: Use cache only (default: false)
    /// - `RECIPESNAP_AI_RATE_LIMIT_MS`: Rate limit in ms (default: 500)
    /// - `RECIPESNAP_AI_TIMEOUT_SECS`: Request timeout in seconds (default: 60)
    pub fn from_env() -> Result<Self, ConfigError> {
        let api_key = env::var("OPENROUTER_API_KEY")
            .map_err(|_| ConfigError::MissingEnvVar("OPENROUTER_API_KEY".to_string()))?;

        let model = env::var("RECIPESNAP_AI_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string());

        let base_url =
            env::var("RECIPESNAP_AI_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());

        let cache_dir = Self::cache_dir_from_env();

        let offline = env::var("RECIPESNAP_AI_OFFLINE")
            .map(|v| v == "true" || v == "1")
            .unwrap_or(false);

        let rate_limit_ms = env::var("RECIPESNAP_AI_RATE_LIMIT_MS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_RATE_LIMIT_MS);

        let timeout = env::var("RECIPESNAP_AI_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .map(Duration::from_secs)
            .unwrap_or(Duration::from_secs(DEFAULT_TIMEOUT_SECS));

        Ok(Self {
            api_key,
            model,
            base_url,
            cache_dir,
            offline,
            rate_limit_ms,
            timeout,
        })
    }

    /// Cache directory from `RECIPESNAP_AI_CACHE` and `RECIPESNAP_AI_CACHE_DIR`.
    ///
    /// Needs no API key. `None` when the cache is turned off.
    pub fn cache_dir_from_env() -> Option<PathBuf> {
        resolve_cache_dir(
            env::var("RECIPESNAP_AI_CACHE").ok().as_deref(),
            env::var("RECIPESNAP_AI_CACHE_DIR").ok().as_deref(),
        )
    }

    /// Get the default cache directory: ~/.recipesnap/ai-cache
    pub fn default_cache_dir() -> PathBuf {
        dirs::home_dir()
            .map(|h| h.join(".recipesnap").join("ai-cache"))
            .unwrap_or_else(|| PathBuf::from("data/ai-cache"))
    }

    /// Full URL of the chat completions endpoint.
    pub fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.base_url.trim_end_matches('/'))
    }
}

fn resolve_cache_dir(enabled: Option<&str>, dir: Option<&str>) -> Option<PathBuf> {
    if matches!(enabled, Some("false" | "0")) {
        return None;
    }
    Some(dir.map_or_else(AiConfig::default_cache_dir, PathBuf::from))
}
