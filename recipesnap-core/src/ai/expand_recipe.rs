//! Full recipe details for a recipe name.

use serde::Deserialize;

use crate::ai::prompts::expand_recipe::{
    render_expand_recipe_system_prompt, render_expand_recipe_user_prompt,
    EXPAND_RECIPE_PROMPT_NAME, EXPAND_RECIPE_PROMPT_VERSION,
};
use crate::ai::{AiClient, ChatMessage, ChatRequest, Usage};
use crate::error::InferenceError;
use crate::slug::slugify;
use crate::types::{RecipeDetail, RecipeIngredient};

/// Response format from the AI. Accepts the camelCase spellings some models prefer.
#[derive(Debug, Deserialize)]
struct ExpandRecipeResponse {
    #[serde(default)]
    id: Option<String>,
    name: String,
    description: String,
    ingredients: Vec<RecipeIngredient>,
    instructions: Vec<String>,
    #[serde(alias = "prepTime")]
    prep_time: String,
    #[serde(alias = "cookTime")]
    cook_time: String,
    servings: String,
    #[serde(default, alias = "imageUrl")]
    image_url: Option<String>,
}

#[derive(Debug)]
pub struct ExpandRecipeResult {
    /// `id` is whatever the model sent (or the slug when it sent none).
    pub detail: RecipeDetail,
    pub cached: bool,
    pub usage: Usage,
}

/// Ask the model to write out `recipe_name` in full.
pub async fn expand_recipe(
    ai_client: &dyn AiClient,
    recipe_name: &str,
    ingredients: Option<&[String]>,
) -> Result<ExpandRecipeResult, InferenceError> {
    let request = ChatRequest {
        messages: vec![
            ChatMessage::system(render_expand_recipe_system_prompt()),
            ChatMessage::user(render_expand_recipe_user_prompt(recipe_name, ingredients)),
        ],
        json_response: true,
        max_tokens: Some(4096),
        temperature: Some(0.5),
    };

    let response = ai_client
        .complete(
            EXPAND_RECIPE_PROMPT_NAME,
            EXPAND_RECIPE_PROMPT_VERSION,
            request,
        )
        .await?;

    let parsed: ExpandRecipeResponse = serde_json::from_str(&response.content)
        .map_err(|e| InferenceError::schema(EXPAND_RECIPE_PROMPT_NAME, e.to_string()))?;

    if parsed.instructions.iter().all(|step| step.trim().is_empty()) {
        return Err(InferenceError::schema(
            EXPAND_RECIPE_PROMPT_NAME,
            "recipe has no instructions",
        ));
    }

    let name = match parsed.name.trim() {
        "" => recipe_name.trim().to_string(),
        name => name.to_string(),
    };

    let detail = RecipeDetail {
        id: parsed
            .id
            .filter(|id| !id.trim().is_empty())
            .unwrap_or_else(|| slugify(&name)),
        name,
        description: parsed.description,
        ingredients: parsed.ingredients,
        instructions: parsed
            .instructions
            .into_iter()
            .map(|step| step.trim().to_string())
            .filter(|step| !step.is_empty())
            .collect(),
        prep_time: parsed.prep_time,
        cook_time: parsed.cook_time,
        servings: parsed.servings,
        image_url: parsed.image_url.filter(|url| !url.trim().is_empty()),
        source_image: None,
    };

    Ok(ExpandRecipeResult {
        detail,
        cached: response.cached,
        usage: response.usage,
    })
}
