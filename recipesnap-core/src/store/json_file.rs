use std::fs;
use std::path::{Path, PathBuf};

use crate::error::StoreError;
use crate::store::{RecipeStore, SavedRecipe};

/// Saved recipes kept in one JSON file.
///
/// The whole file is rewritten after every change.
#[derive(Debug)]
pub struct JsonFileRecipeStore {
    path: PathBuf,
    recipes: Vec<SavedRecipe>,
}

impl JsonFileRecipeStore {
    /// Open the store at `path`. A missing file is an empty store.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let recipes = match fs::read_to_string(&path) {
            Ok(contents) if contents.trim().is_empty() => Vec::new(),
            Ok(contents) => serde_json::from_str(&contents)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Vec::new(),
            Err(e) => return Err(e.into()),
        };
        tracing::debug!(path = %path.display(), count = recipes.len(), "Opened recipe store");
        Ok(Self { path, recipes })
    }

    /// Default location: `~/.recipesnap/saved-recipes.json`.
    pub fn default_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".recipesnap")
            .join("saved-recipes.json")
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write(&self) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(&self.recipes)?;
        fs::write(&self.path, json)?;
        Ok(())
    }
}

impl RecipeStore for JsonFileRecipeStore {
    fn save(&mut self, recipe: SavedRecipe) -> Result<bool, StoreError> {
        if self.contains(&recipe.id) {
            return Ok(false);
        }
        self.recipes.push(recipe);
        if let Err(e) = self.write() {
            self.recipes.pop();
            return Err(e);
        }
        Ok(true)
    }

    fn remove(&mut self, id: &str) -> Result<bool, StoreError> {
        let Some(index) = self.recipes.iter().position(|r| r.id == id) else {
            return Ok(false);
        };
        let removed = self.recipes.remove(index);
        if let Err(e) = self.write() {
            self.recipes.insert(index, removed);
            return Err(e);
        }
        Ok(true)
    }

    fn contains(&self, id: &str) -> bool {
        self.recipes.iter().any(|r| r.id == id)
    }

    fn list(&self) -> &[SavedRecipe] {
        &self.recipes
    }
}
