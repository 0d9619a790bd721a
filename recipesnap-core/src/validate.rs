//! Input checks run before each pipeline stage calls the model.

use crate::error::ValidationError;
use crate::ingredients::IngredientSet;
use crate::types::ImageInput;

/// Require a captured, non-empty photo.
pub fn validate_image(image: Option<&ImageInput>) -> Result<&ImageInput, ValidationError> {
    match image {
        Some(image) if !image.is_empty() => Ok(image),
        _ => Err(ValidationError::MissingImage),
    }
}

/// Trim, drop blanks and remove case-insensitive duplicates, keeping the
/// first spelling of each name.
pub fn normalize_ingredients<I, S>(raw: I) -> IngredientSet
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    IngredientSet::from_raw(raw)
}

/// Same as [`normalize_ingredients`], but an empty result is an error.
///
/// Used when asking for recipe ideas; editing may leave the list empty.
pub fn normalize_required_ingredients<I, S>(raw: I) -> Result<IngredientSet, ValidationError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let set = normalize_ingredients(raw);
    if set.is_empty() {
        return Err(ValidationError::EmptyIngredients);
    }
    Ok(set)
}

/// Require a recipe name with some non-whitespace content. Returns it trimmed.
pub fn validate_recipe_name(name: &str) -> Result<&str, ValidationError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(ValidationError::EmptyRecipeName);
    }
    Ok(name)
}

/// Split a comma-separated ingredient list as typed on a form or command line.
pub fn split_ingredient_list(list: &str) -> Vec<String> {
    list.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
