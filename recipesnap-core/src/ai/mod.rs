//! AI client module for LLM integration via OpenRouter.
//!
//! This module provides:
//! - `AiClient` trait for abstracting AI providers
//! - `CachingAiClient` implementation with disk-based caching
//! - `FakeAiClient` with scripted answers for tests
//! - Configuration via environment variables
//! - Prompt templates and the three model operations the pipeline needs
//!
//! # Configuration
//!
//! Set these environment variables:
//!
//! - `OPENROUTER_API_KEY` (required): Your OpenRouter API key
//! - `RECIPESNAP_AI_MODEL` (optional): Model name, e.g., "openai/gpt-4o-mini"
//! - `RECIPESNAP_AI_BASE_URL` (optional): API base URL
//! - `RECIPESNAP_AI_CACHE_DIR` (optional): Cache directory path
//! - `RECIPESNAP_AI_CACHE` (optional): Set to "false" to disable the cache
//! - `RECIPESNAP_AI_OFFLINE` (optional): Set to "true" to use cache only
//! - `RECIPESNAP_AI_RATE_LIMIT_MS` (optional): Delay between requests in ms
//! - `RECIPESNAP_AI_TIMEOUT_SECS` (optional): Request timeout in seconds
//!
//! # Example
//!
//! ```ignore
//! use recipesnap_core::ai::{extract_ingredients, CachingAiClient};
//!
//! let client = CachingAiClient::from_env()?;
//! let result = extract_ingredients(&client, &photo).await?;
//! println!("Ingredients: {:?}", result.ingredients);
//! ```

mod cache;
mod client;
mod config;
mod expand_recipe;
mod extract_ingredients;
mod fake;
pub mod prompts;
mod propose_recipes;
mod types;

pub use cache::{AiCache, CacheKey, CacheStats, CachedAiResponse};
pub use client::{AiClient, CachingAiClient};
pub use config::{AiConfig, ConfigError};
pub use expand_recipe::{expand_recipe, ExpandRecipeResult};
pub use extract_ingredients::{extract_ingredients, ExtractIngredientsResult};
pub use fake::{FakeAiClient, RecordedRequest};
pub use propose_recipes::{propose_recipes, ProposeRecipesResult};
pub use types::{
    ChatMessage, ChatRequest, ChatResponse, ContentPart, ImageUrl, MessageContent, Role, Usage,
};
