use serde::{Deserialize, Serialize};

use crate::ingredients::IngredientSet;
use crate::pipeline::Notice;
use crate::types::{ImageId, ImageInput, RecipeIdea};

/// Where the user is in the photo to recipe flow.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    /// Taking or choosing a photo.
    #[default]
    Capture,
    /// Editing the ingredient list.
    Refine,
    /// Browsing recipe ideas.
    Results,
}

/// Identifies one outstanding gateway call and the input it was made for.
///
/// A completion is applied only if its ticket is the latest one issued for
/// its stage and the input it names is still current.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket {
    /// The stage the call was made from.
    pub stage: Stage,
    pub seq: u64,
    /// Photo the input belongs to. `None` for an ingredient list typed in
    /// without a photo.
    pub image: Option<ImageId>,
    /// Ingredient list revision, for recipe idea requests.
    pub revision: Option<u64>,
}

/// Ingredient list plus the photo it was derived from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct TaggedIngredients {
    pub(crate) image: Option<ImageId>,
    pub(crate) set: IngredientSet,
}

/// Recipe ideas plus the ingredient snapshot they were proposed for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct TaggedIdeas {
    pub(crate) image: Option<ImageId>,
    pub(crate) revision: u64,
    pub(crate) ideas: Vec<RecipeIdea>,
}

/// All state of one user's pipeline.
///
/// Mutated only through [`PipelineState::handle`]. Derived data is kept with
/// the identity of the input it came from and is only exposed while that
/// input is still current.
#[derive(Debug, Clone, Default)]
pub struct PipelineState {
    pub(crate) stage: Stage,
    pub(crate) image: Option<ImageInput>,
    pub(crate) ingredients: Option<TaggedIngredients>,
    pub(crate) ideas: Option<TaggedIdeas>,
    pub(crate) notice: Option<Notice>,
    pub(crate) pending_extraction: Option<Ticket>,
    pub(crate) pending_ideas: Option<Ticket>,
    pub(crate) next_seq: u64,
}

impl PipelineState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    /// The current photo.
    pub fn image(&self) -> Option<&ImageInput> {
        self.image.as_ref()
    }

    pub(crate) fn image_id(&self) -> Option<ImageId> {
        self.image.as_ref().map(ImageInput::id)
    }

    /// The ingredient list, if one exists for the current photo.
    pub fn visible_ingredients(&self) -> Option<&IngredientSet> {
        self.ingredients
            .as_ref()
            .filter(|tagged| tagged.image == self.image_id())
            .map(|tagged| &tagged.set)
    }

    /// Recipe ideas, if they were proposed for the current ingredient list.
    pub fn visible_ideas(&self) -> Option<&[RecipeIdea]> {
        let set = self.visible_ingredients()?;
        self.ideas
            .as_ref()
            .filter(|tagged| tagged.image == self.image_id() && tagged.revision == set.revision())
            .map(|tagged| tagged.ideas.as_slice())
    }

    /// The notice to show, unless it was raised for an input that has since changed.
    pub fn visible_notice(&self) -> Option<&Notice> {
        let notice = self.notice.as_ref()?;
        if notice.image() != self.image_id() {
            return None;
        }
        let current_revision = self.visible_ingredients().map(IngredientSet::revision);
        match notice.revision() {
            Some(revision) if current_revision != Some(revision) => None,
            _ => Some(notice),
        }
    }

    /// Ingredient names to give the model as context for a recipe.
    pub fn ingredient_context(&self) -> Option<Vec<String>> {
        self.visible_ingredients()
            .filter(|set| !set.is_empty())
            .map(IngredientSet::to_vec)
    }

    pub fn is_analyzing(&self) -> bool {
        self.pending_extraction.is_some()
    }

    pub fn is_generating_ideas(&self) -> bool {
        self.pending_ideas.is_some()
    }

    /// The furthest stage the current data supports, capped at the stored stage.
    pub(crate) fn effective_stage(&self) -> Stage {
        match self.stage {
            Stage::Results if self.visible_ideas().is_some() => Stage::Results,
            Stage::Results | Stage::Refine if self.visible_ingredients().is_some() => Stage::Refine,
            _ => Stage::Capture,
        }
    }
}
