//! Saved recipes.
//!
//! The pipeline only hands finished records to a [`RecipeStore`]; where they
//! end up is up to the implementation.

mod json_file;
mod memory;

pub use json_file::JsonFileRecipeStore;
pub use memory::MemoryRecipeStore;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::StoreError;
use crate::slug::slugify;
use crate::types::{ImageInput, RecipeDetail, RecipeIdea};

/// What was saved: a full recipe, or just an idea to come back to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SavedContent {
    Detail(RecipeDetail),
    Idea {
        idea: RecipeIdea,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        source_image: Option<ImageInput>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedRecipe {
    pub id: String,
    pub saved_at: DateTime<Utc>,
    pub content: SavedContent,
}

impl SavedRecipe {
    pub fn from_detail(detail: RecipeDetail) -> Self {
        let id = if detail.id.is_empty() {
            slugify(&detail.name)
        } else {
            detail.id.clone()
        };
        Self {
            id,
            saved_at: Utc::now(),
            content: SavedContent::Detail(detail),
        }
    }

    pub fn from_idea(idea: RecipeIdea, source_image: Option<ImageInput>) -> Self {
        Self {
            id: slugify(&idea.name),
            saved_at: Utc::now(),
            content: SavedContent::Idea { idea, source_image },
        }
    }

    pub fn name(&self) -> &str {
        match &self.content {
            SavedContent::Detail(detail) => &detail.name,
            SavedContent::Idea { idea, .. } => &idea.name,
        }
    }

    pub fn description(&self) -> &str {
        match &self.content {
            SavedContent::Detail(detail) => &detail.description,
            SavedContent::Idea { idea, .. } => &idea.description,
        }
    }

    /// The ingredient photo the recipe came from, if one was kept.
    pub fn source_image(&self) -> Option<&ImageInput> {
        match &self.content {
            SavedContent::Detail(detail) => detail.source_image.as_ref(),
            SavedContent::Idea { source_image, .. } => source_image.as_ref(),
        }
    }
}

/// Where saved recipes go. Ids are unique; saving an id twice keeps the first.
pub trait RecipeStore {
    /// Save `recipe`. Returns `false` if its id was already saved.
    fn save(&mut self, recipe: SavedRecipe) -> Result<bool, StoreError>;

    /// Remove the recipe with `id`. Returns whether it was there.
    fn remove(&mut self, id: &str) -> Result<bool, StoreError>;

    fn contains(&self, id: &str) -> bool;

    /// Saved recipes, oldest first.
    fn list(&self) -> &[SavedRecipe];
}
