use crate::error::StoreError;
use crate::store::{RecipeStore, SavedRecipe};

/// Saved recipes that live as long as the session.
#[derive(Debug, Clone, Default)]
pub struct MemoryRecipeStore {
    recipes: Vec<SavedRecipe>,
}

impl MemoryRecipeStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl RecipeStore for MemoryRecipeStore {
    fn save(&mut self, recipe: SavedRecipe) -> Result<bool, StoreError> {
        if self.contains(&recipe.id) {
            return Ok(false);
        }
        self.recipes.push(recipe);
        Ok(true)
    }

    fn remove(&mut self, id: &str) -> Result<bool, StoreError> {
        let before = self.recipes.len();
        self.recipes.retain(|r| r.id != id);
        Ok(self.recipes.len() != before)
    }

    fn contains(&self, id: &str) -> bool {
        self.recipes.iter().any(|r| r.id == id)
    }

    fn list(&self) -> &[SavedRecipe] {
        &self.recipes
    }
}
