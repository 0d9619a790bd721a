//! Recipe ideas from an ingredient list.

use serde::Deserialize;

use crate::ai::prompts::propose_recipes::{
    render_propose_recipes_prompt, PROPOSE_RECIPES_PROMPT_NAME, PROPOSE_RECIPES_PROMPT_VERSION,
};
use crate::ai::{AiClient, ChatMessage, ChatRequest, Usage};
use crate::error::InferenceError;
use crate::types::RecipeIdea;

#[derive(Debug, Deserialize)]
struct ProposeRecipesResponse {
    recipes: Vec<RecipeIdea>,
}

#[derive(Debug)]
pub struct ProposeRecipesResult {
    pub ideas: Vec<RecipeIdea>,
    pub cached: bool,
    pub usage: Usage,
}

/// Ask the model for recipe ideas. Callers make sure `ingredients` is not empty.
///
/// An empty list of ideas is a valid answer; an idea without a name is not.
pub async fn propose_recipes(
    ai_client: &dyn AiClient,
    ingredients: &[String],
) -> Result<ProposeRecipesResult, InferenceError> {
    let prompt = render_propose_recipes_prompt(ingredients);
    let request = ChatRequest {
        messages: vec![ChatMessage::user(prompt)],
        json_response: true,
        max_tokens: Some(1024),
        temperature: Some(0.7),
    };

    let response = ai_client
        .complete(
            PROPOSE_RECIPES_PROMPT_NAME,
            PROPOSE_RECIPES_PROMPT_VERSION,
            request,
        )
        .await?;

    let parsed: ProposeRecipesResponse = serde_json::from_str(&response.content)
        .map_err(|e| InferenceError::schema(PROPOSE_RECIPES_PROMPT_NAME, e.to_string()))?;

    let mut ideas = Vec::with_capacity(parsed.recipes.len());
    for (index, idea) in parsed.recipes.into_iter().enumerate() {
        let name = idea.name.trim();
        if name.is_empty() {
            return Err(InferenceError::schema(
                PROPOSE_RECIPES_PROMPT_NAME,
                format!("recipe #{} has no name", index + 1),
            ));
        }
        ideas.push(RecipeIdea::new(name, idea.description.trim()));
    }

    Ok(ProposeRecipesResult {
        ideas,
        cached: response.cached,
        usage: response.usage,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::FakeAiClient;

    fn ingredients() -> Vec<String> {
        vec!["tomato".to_string(), "onion".to_string()]
    }

    #[tokio::test]
    async fn test_propose_recipes() {
        let client = FakeAiClient::new().with_response(
            PROPOSE_RECIPES_PROMPT_NAME,
            r#"{"recipes": [{"name": " Tomato Soup ", "description": "A warm soup."}]}"#,
        );

        let result = propose_recipes(&client, &ingredients()).await.unwrap();
        assert_eq!(
            result.ideas,
            vec![RecipeIdea::new("Tomato Soup", "A warm soup.")]
        );
        assert!(client.requests()[0].request.prompt_text().contains("- onion"));
    }

    #[tokio::test]
    async fn test_empty_proposal_is_not_an_error() {
        let client =
            FakeAiClient::new().with_response(PROPOSE_RECIPES_PROMPT_NAME, r#"{"recipes": []}"#);

        let result = propose_recipes(&client, &ingredients()).await.unwrap();
        assert!(result.ideas.is_empty());
    }

    #[tokio::test]
    async fn test_rejects_malformed_output() {
        for bad in [
            r#"{"recipes": ["Tomato Soup"]}"#,
            r#"{"recipes": [{"name": "Tomato Soup"}]}"#,
            r#"{"recipes": [{"name": "  ", "description": "nameless"}]}"#,
            r#"[]"#,
        ] {
            let client = FakeAiClient::new().with_response(PROPOSE_RECIPES_PROMPT_NAME, bad);
            let err = propose_recipes(&client, &ingredients()).await.unwrap_err();
            assert!(
                matches!(err, InferenceError::Schema { .. }),
                "expected schema error for {bad}, got {err:?}"
            );
        }
    }

    #[tokio::test]
    async fn test_transport_failure_propagates() {
        let client = FakeAiClient::new().with_error(
            PROPOSE_RECIPES_PROMPT_NAME,
            InferenceError::Transport("connection reset".to_string()),
        );

        let err = propose_recipes(&client, &ingredients()).await.unwrap_err();
        assert_eq!(
            err,
            InferenceError::Transport("connection reset".to_string())
        );
    }
}
