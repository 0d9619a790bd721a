//! The user-editable ingredient list.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Result of [`IngredientSet::add`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddOutcome {
    Added(String),
    /// Already present; carries the entry as it is displayed.
    Duplicate(String),
}

/// Ordered ingredient names, unique ignoring case and surrounding whitespace.
///
/// The first-seen spelling of a name is the one kept. Every change bumps the
/// revision, which is how recipe ideas know which snapshot they came from.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngredientSet {
    items: Vec<String>,
    #[serde(default)]
    revision: u64,
}

impl IngredientSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a set from raw names: trims, drops blanks, removes duplicates.
    pub fn from_raw<I, S>(raw: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut set = Self::new();
        set.extend_normalized(raw);
        set
    }

    /// Add a name unless an equal one (ignoring case) is already there.
    pub fn add(&mut self, name: &str) -> Result<AddOutcome, ValidationError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ValidationError::EmptyIngredient);
        }
        if let Some(existing) = self.find(name) {
            return Ok(AddOutcome::Duplicate(self.items[existing].clone()));
        }
        self.items.push(name.to_string());
        self.revision += 1;
        Ok(AddOutcome::Added(name.to_string()))
    }

    /// Remove the entry equal to `name` ignoring case. Returns whether one was removed.
    pub fn remove(&mut self, name: &str) -> bool {
        match self.find(name.trim()) {
            Some(index) => {
                self.items.remove(index);
                self.revision += 1;
                true
            }
            None => false,
        }
    }

    /// Swap the whole list for freshly extracted names.
    pub fn replace<I, S>(&mut self, raw: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.items.clear();
        self.extend_normalized(raw);
        self.revision += 1;
    }

    pub fn contains(&self, name: &str) -> bool {
        self.find(name.trim()).is_some()
    }

    pub fn as_slice(&self) -> &[String] {
        &self.items
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.items.iter().map(String::as_str)
    }

    pub fn to_vec(&self) -> Vec<String> {
        self.items.clone()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    fn find(&self, trimmed: &str) -> Option<usize> {
        let key = trimmed.to_lowercase();
        self.items.iter().position(|item| item.to_lowercase() == key)
    }

    fn extend_normalized<I, S>(&mut self, raw: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for name in raw {
            let name = name.as_ref().trim();
            if !name.is_empty() && self.find(name).is_none() {
                self.items.push(name.to_string());
            }
        }
    }
}
