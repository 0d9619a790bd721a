use thiserror::Error;

use crate::pipeline::Stage;

/// Bad caller input, caught before any model call is attempted.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Photo is required. Please provide a valid image.")]
    MissingImage,

    #[error("At least one ingredient is required.")]
    EmptyIngredients,

    #[error("Ingredient name cannot be empty.")]
    EmptyIngredient,

    #[error("Recipe name is required.")]
    EmptyRecipeName,
}

impl ValidationError {
    /// Name of the input field the message belongs to.
    pub fn field(&self) -> &'static str {
        match self {
            ValidationError::MissingImage => "image",
            ValidationError::EmptyIngredients => "ingredients",
            ValidationError::EmptyIngredient => "ingredient",
            ValidationError::EmptyRecipeName => "recipe_name",
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),
}

/// The model or its transport failed, or the model answered with a payload
/// that does not match the expected schema.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InferenceError {
    #[error("Request failed: {0}")]
    Transport(String),

    #[error("API returned error: {status} - {message}")]
    Api { status: u16, message: String },

    #[error("Response not in cache and offline mode is enabled")]
    OfflineNotCached,

    #[error("Malformed model output for {operation}: {message}")]
    Schema {
        operation: &'static str,
        message: String,
    },

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

impl InferenceError {
    pub(crate) fn schema(operation: &'static str, message: impl Into<String>) -> Self {
        InferenceError::Schema {
            operation,
            message: message.into(),
        }
    }
}

/// Errors returned by an [`crate::gateway::InferenceGateway`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GatewayError {
    #[error("Invalid input: {0}")]
    InvalidInput(#[from] ValidationError),

    #[error(transparent)]
    Inference(#[from] InferenceError),
}

/// A response arrived for an input that is no longer current.
///
/// Never shown to the user; the response is dropped.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Discarded stale {stage:?} result (request #{seq})")]
pub struct StaleResult {
    pub stage: Stage,
    pub seq: u64,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PipelineError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Stale(#[from] StaleResult),

    #[error("{action} is not available in the {stage:?} stage")]
    InvalidTransition { stage: Stage, action: &'static str },
}

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Failed to access recipe store: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid recipe store contents: {0}")]
    Serialization(#[from] serde_json::Error),
}
