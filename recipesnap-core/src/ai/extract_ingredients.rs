//! Ingredient recognition from a photo using vision AI.

use serde::Deserialize;

use crate::ai::prompts::extract_ingredients::{
    render_extract_ingredients_prompt, EXTRACT_INGREDIENTS_PROMPT_NAME,
    EXTRACT_INGREDIENTS_PROMPT_VERSION,
};
use crate::ai::{AiClient, ChatMessage, ChatRequest, Usage};
use crate::error::InferenceError;
use crate::types::ImageInput;

#[derive(Debug, Deserialize)]
struct ExtractIngredientsResponse {
    ingredients: Vec<String>,
}

#[derive(Debug)]
pub struct ExtractIngredientsResult {
    /// Names as the model returned them. Not yet normalized.
    pub ingredients: Vec<String>,
    pub cached: bool,
    pub usage: Usage,
}

/// Ask the model which ingredients are visible in `image`.
///
/// An empty list is a valid answer.
pub async fn extract_ingredients(
    ai_client: &dyn AiClient,
    image: &ImageInput,
) -> Result<ExtractIngredientsResult, InferenceError> {
    let prompt = render_extract_ingredients_prompt();
    let request = ChatRequest {
        messages: vec![ChatMessage::user_with_images(
            prompt,
            std::slice::from_ref(image),
        )],
        json_response: true,
        max_tokens: Some(1024),
        temperature: Some(0.1),
    };

    let response = ai_client
        .complete(
            EXTRACT_INGREDIENTS_PROMPT_NAME,
            EXTRACT_INGREDIENTS_PROMPT_VERSION,
            request,
        )
        .await?;

    let parsed: ExtractIngredientsResponse = serde_json::from_str(&response.content)
        .map_err(|e| InferenceError::schema(EXTRACT_INGREDIENTS_PROMPT_NAME, e.to_string()))?;

    Ok(ExtractIngredientsResult {
        ingredients: parsed.ingredients,
        cached: response.cached,
        usage: response.usage,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::FakeAiClient;

    fn photo() -> ImageInput {
        ImageInput::new(b"fake jpeg".to_vec(), "image/jpeg").unwrap()
    }

    #[tokio::test]
    async fn test_extract_ingredients() {
        let client = FakeAiClient::new().with_response(
            EXTRACT_INGREDIENTS_PROMPT_NAME,
            r#"{"ingredients": ["tomato", "onion"]}"#,
        );

        let result = extract_ingredients(&client, &photo()).await.unwrap();
        assert_eq!(result.ingredients, vec!["tomato", "onion"]);

        let requests = client.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].request.messages[0].content.image_count(), 1);
        assert!(requests[0].request.json_response);
    }

    #[tokio::test]
    async fn test_extract_nothing_found() {
        let client = FakeAiClient::new()
            .with_response(EXTRACT_INGREDIENTS_PROMPT_NAME, r#"{"ingredients": []}"#);

        let result = extract_ingredients(&client, &photo()).await.unwrap();
        assert!(result.ingredients.is_empty());
    }

    #[tokio::test]
    async fn test_extract_rejects_malformed_output() {
        for bad in [
            "not json",
            r#"{"items": ["tomato"]}"#,
            r#"{"ingredients": [1, 2]}"#,
            r#"{"ingredients": "tomato"}"#,
        ] {
            let client = FakeAiClient::new().with_response(EXTRACT_INGREDIENTS_PROMPT_NAME, bad);
            let err = extract_ingredients(&client, &photo()).await.unwrap_err();
            assert!(
                matches!(err, InferenceError::Schema { .. }),
                "expected schema error for {bad}, got {err:?}"
            );
        }
    }
}
