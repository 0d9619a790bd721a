//! Prompt for suggesting recipe ideas from an ingredient list.

/// Prompt name for cache keys.
pub const PROPOSE_RECIPES_PROMPT_NAME: &str = "propose_recipes";

pub const PROPOSE_RECIPES_PROMPT_VERSION: &str = "v1";

/// Render the recipe suggestion prompt for the given ingredients.
pub fn render_propose_recipes_prompt(ingredients: &[String]) -> String {
    let ingredient_lines = ingredients
        .iter()
        .map(|i| format!("- {}", i))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        r#"You are a recipe suggestion assistant. Your user understands basic English and is new to cooking.

Given the ingredients below, suggest 3 to 5 recipes.

Rules:
- Recipe names must be simple and descriptive, easy for a beginner to understand (e.g. "Easy Chicken Stir-fry", "Simple Tomato Soup", "Basic Potato Curry").
- Each description is one short sentence in basic English.
- Prefer recipes that make good use of the available ingredients.
- If nothing sensible can be made, return an empty list.

Ingredients available:
{ingredient_lines}

Respond with JSON only, no other text: {{"recipes": [{{"name": "Recipe Name", "description": "One sentence."}}]}}"#,
        ingredient_lines = ingredient_lines
    )
}
