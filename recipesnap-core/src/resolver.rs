//! Expands a chosen recipe idea into a full recipe.

use crate::error::{GatewayError, ValidationError};
use crate::fallback::fallback_recipe;
use crate::gateway::InferenceGateway;
use crate::pipeline::{Notice, Stage};
use crate::slug::slugify;
use crate::types::{ImageInput, RecipeDetail};
use crate::validate::validate_recipe_name;

/// A recipe ready to show, plus a notice when it is the generic fallback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedRecipe {
    pub detail: RecipeDetail,
    pub notice: Option<Notice>,
}

impl ResolvedRecipe {
    pub fn is_fallback(&self) -> bool {
        self.notice.is_some()
    }
}

/// Ask the gateway for the full recipe called `name`.
///
/// The recipe id is always `slugify(name)`, whatever the model sent. The
/// source photo is attached for display only and is not sent to the model.
/// If the model fails, a generic recipe for `name` is returned with a
/// warning notice instead. Only a blank name is an error.
pub async fn resolve_recipe(
    gateway: &dyn InferenceGateway,
    name: &str,
    context_ingredients: Option<&[String]>,
    source_image: Option<&ImageInput>,
) -> Result<ResolvedRecipe, ValidationError> {
    let name = validate_recipe_name(name)?;

    let (mut detail, notice) = match gateway.expand_recipe(name, context_ingredients).await {
        Ok(detail) => (detail, None),
        Err(GatewayError::InvalidInput(e)) => return Err(e),
        Err(GatewayError::Inference(e)) => {
            tracing::warn!(recipe = %name, error = %e, "Recipe expansion failed, using fallback");
            let notice = Notice::warning(
                Stage::Results,
                format!("AI Error: {e}. Displaying basic info."),
            )
            .tagged(source_image.map(ImageInput::id), None);
            (fallback_recipe(name), Some(notice))
        }
    };

    detail.id = slugify(name);
    detail.source_image = source_image.cloned();
    Ok(ResolvedRecipe { detail, notice })
}
