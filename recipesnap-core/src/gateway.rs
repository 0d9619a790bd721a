//! Typed boundary between the pipeline and the model.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{info_span, Instrument};

use crate::ai::{self, AiClient};
use crate::error::GatewayError;
use crate::types::{ImageInput, RecipeDetail, RecipeIdea};
use crate::validate::{normalize_required_ingredients, validate_image, validate_recipe_name};

/// The three model operations the pipeline depends on.
///
/// Each call is a single request and response. Implementations do not retry.
#[async_trait]
pub trait InferenceGateway: Send + Sync {
    /// Ingredient names visible in `image`. An empty list means nothing was found.
    async fn extract_ingredients(&self, image: &ImageInput) -> Result<Vec<String>, GatewayError>;

    /// Recipe ideas for a non-empty ingredient list. An empty answer is valid.
    async fn propose_recipes(&self, ingredients: &[String])
        -> Result<Vec<RecipeIdea>, GatewayError>;

    /// Full details for `name`. The returned `id` comes from the model and
    /// is not trusted; see [`crate::resolver::resolve_recipe`].
    async fn expand_recipe(
        &self,
        name: &str,
        context_ingredients: Option<&[String]>,
    ) -> Result<RecipeDetail, GatewayError>;
}

/// [`InferenceGateway`] backed by an [`AiClient`].
#[derive(Clone)]
pub struct AiGateway {
    client: Arc<dyn AiClient>,
}

impl AiGateway {
    pub fn new(client: Arc<dyn AiClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl InferenceGateway for AiGateway {
    async fn extract_ingredients(&self, image: &ImageInput) -> Result<Vec<String>, GatewayError> {
        let image = validate_image(Some(image))?;

        let result = ai::extract_ingredients(self.client.as_ref(), image)
            .instrument(info_span!("extract_ingredients", image = %image.id().short()))
            .await?;

        tracing::info!(
            found = result.ingredients.len(),
            cached = result.cached,
            total_tokens = result.usage.total_tokens,
            "Extracted ingredients"
        );
        Ok(result.ingredients)
    }

    async fn propose_recipes(
        &self,
        ingredients: &[String],
    ) -> Result<Vec<RecipeIdea>, GatewayError> {
        let ingredients = normalize_required_ingredients(ingredients)?;

        let result = ai::propose_recipes(self.client.as_ref(), ingredients.as_slice())
            .instrument(info_span!("propose_recipes", ingredients = ingredients.len()))
            .await?;

        tracing::info!(
            ideas = result.ideas.len(),
            cached = result.cached,
            total_tokens = result.usage.total_tokens,
            "Proposed recipes"
        );
        Ok(result.ideas)
    }

    async fn expand_recipe(
        &self,
        name: &str,
        context_ingredients: Option<&[String]>,
    ) -> Result<RecipeDetail, GatewayError> {
        let name = validate_recipe_name(name)?;
        let context = context_ingredients.filter(|list| !list.is_empty());

        let result = ai::expand_recipe(self.client.as_ref(), name, context)
            .instrument(info_span!("expand_recipe", recipe = %name))
            .await?;

        tracing::info!(
            steps = result.detail.instructions.len(),
            cached = result.cached,
            total_tokens = result.usage.total_tokens,
            "Expanded recipe"
        );
        Ok(result.detail)
    }
}
