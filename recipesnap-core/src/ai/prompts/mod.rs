//! AI prompt templates.

pub mod expand_recipe;
pub mod extract_ingredients;
pub mod propose_recipes;

pub use expand_recipe::{
    render_expand_recipe_system_prompt, render_expand_recipe_user_prompt,
    EXPAND_RECIPE_PROMPT_NAME, EXPAND_RECIPE_PROMPT_VERSION, PLACEHOLDER_IMAGE_URL,
};
pub use extract_ingredients::{
    render_extract_ingredients_prompt, EXTRACT_INGREDIENTS_PROMPT_NAME,
    EXTRACT_INGREDIENTS_PROMPT_VERSION,
};
pub use propose_recipes::{
    render_propose_recipes_prompt, PROPOSE_RECIPES_PROMPT_NAME, PROPOSE_RECIPES_PROMPT_VERSION,
};
