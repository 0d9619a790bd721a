//! Prompt for recognizing ingredients in a photo.

/// Prompt name for cache keys.
pub const EXTRACT_INGREDIENTS_PROMPT_NAME: &str = "extract_ingredients";

/// Bump when the wording changes so cached answers are not reused.
pub const EXTRACT_INGREDIENTS_PROMPT_VERSION: &str = "v1";

/// Render the ingredient recognition prompt. The photo travels as a separate message part.
pub fn render_extract_ingredients_prompt() -> String {
    r#"You are an ingredient recognition assistant. Your user understands basic English.

Look at the photo and identify every visible food ingredient.

Rules:
- Use only very common, simple English names. A "Granny Smith apple" is "apple", "boneless, skinless chicken thighs" are "chicken", "capsicum" is "bell pepper".
- List each ingredient once.
- Ignore anything that is not food (plates, packaging, utensils).
- If you cannot see any food, return an empty list.

Respond with JSON only, no other text: {"ingredients": ["ingredient1", "ingredient2"]}"#
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_prompt() {
        let prompt = render_extract_ingredients_prompt();
        assert!(prompt.contains("\"ingredients\""));
        assert!(prompt.contains("empty list"));
    }
}
