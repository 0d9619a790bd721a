//! Photo to recipe pipeline.
//!
//! A user photographs their ingredients, the model lists what it sees, the
//! user edits that list, the model proposes recipe ideas, and a chosen idea
//! is expanded into a full beginner-friendly recipe.

pub mod ai;
pub mod error;
pub mod fallback;
pub mod gateway;
pub mod ingredients;
pub mod pipeline;
pub mod resolver;
pub mod slug;
pub mod store;
pub mod types;
pub mod validate;

pub use error::{
    ConfigError, GatewayError, InferenceError, PipelineError, StaleResult, StoreError,
    ValidationError,
};
pub use fallback::fallback_recipe;
pub use gateway::{AiGateway, InferenceGateway};
pub use ingredients::{AddOutcome, IngredientSet};
pub use pipeline::{
    execute, transition, Command, Event, Notice, NoticeLevel, PipelineState, Session, Stage,
    Ticket,
};
pub use resolver::{resolve_recipe, ResolvedRecipe};
pub use slug::slugify;
pub use store::{JsonFileRecipeStore, MemoryRecipeStore, RecipeStore, SavedContent, SavedRecipe};
pub use types::{ImageId, ImageInput, RecipeDetail, RecipeIdea, RecipeIngredient};
pub use validate::{
    normalize_ingredients, normalize_required_ingredients, split_ingredient_list, validate_image,
    validate_recipe_name,
};
