//! Prompt for writing out a full beginner recipe.

/// Prompt name for cache keys.
pub const EXPAND_RECIPE_PROMPT_NAME: &str = "expand_recipe";

pub const EXPAND_RECIPE_PROMPT_VERSION: &str = "v1";

/// Placeholder dish picture the model is asked to use.
pub const PLACEHOLDER_IMAGE_URL: &str = "https://placehold.co/600x400.png";

pub fn render_expand_recipe_system_prompt() -> String {
    r#"You are a friendly cooking assistant for absolute beginners who understand only very basic English. Every recipe you write must be extremely easy to follow.

Always respond with a single JSON object and nothing else."#
        .to_string()
}

/// Render the request for one recipe, optionally grounded in the ingredients at hand.
pub fn render_expand_recipe_user_prompt(
    recipe_name: &str,
    ingredients: Option<&[String]>,
) -> String {
    let context = match ingredients {
        Some(list) if !list.is_empty() => {
            let lines = list
                .iter()
                .map(|i| format!("- {}", i))
                .collect::<Vec<_>>()
                .join("\n");
            format!(
                "\nMain ingredients available (for context; add other common ingredients if the recipe needs them):\n{}\n",
                lines
            )
        }
        _ => String::new(),
    };

    format!(
        r#"Recipe name: {recipe_name}
{context}
Write the full recipe as JSON with this exact structure:
{{
  "name": "{recipe_name}",
  "description": "1-2 simple sentences about the dish",
  "ingredients": [{{"name": "onion", "quantity": "1", "unit": "small onion"}}],
  "instructions": ["Cut the onion into small pieces.", "Put a pan on the stove. Turn the heat to medium."],
  "prep_time": "About 10 minutes",
  "cook_time": "Around 20 minutes",
  "servings": "For 2 people",
  "image_url": "{placeholder}"
}}

Rules:
- Ingredient names, quantities and units use common household terms ("2", "spoons"; "1/2", "cup"; "A little bit of", "salt").
- Instructions are short sentences, one action each, in the order they happen.
- Say the heat level (low, medium or high) whenever the stove is used.
- Say how long to cook when it matters ("Cook for 5 minutes").
- Use the placeholder image URL exactly as given."#,
        recipe_name = recipe_name,
        context = context,
        placeholder = PLACEHOLDER_IMAGE_URL
    )
}
