use std::sync::Arc;

use crate::error::{PipelineError, StoreError, ValidationError};
use crate::gateway::InferenceGateway;
use crate::pipeline::{execute, Command, Event, Notice, PipelineState, Stage};
use crate::resolver::{resolve_recipe, ResolvedRecipe};
use crate::store::{RecipeStore, SavedRecipe};
use crate::types::{ImageInput, RecipeDetail, RecipeIdea};

/// One user's pipeline together with the gateway it calls.
///
/// The async methods make their gateway call and apply the answer before
/// returning. Callers that need to keep handling events while a call is in
/// flight use [`Session::begin`] and [`Session::complete`] instead.
pub struct Session {
    state: PipelineState,
    gateway: Arc<dyn InferenceGateway>,
}

impl Session {
    pub fn new(gateway: Arc<dyn InferenceGateway>) -> Self {
        Self {
            state: PipelineState::new(),
            gateway,
        }
    }

    pub fn state(&self) -> &PipelineState {
        &self.state
    }

    pub fn stage(&self) -> Stage {
        self.state.stage()
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.state.visible_notice()
    }

    pub fn gateway(&self) -> Arc<dyn InferenceGateway> {
        Arc::clone(&self.gateway)
    }

    /// Apply an event without running the command it produces.
    pub fn begin(&mut self, event: Event) -> Result<Option<Command>, PipelineError> {
        self.state.handle(event)
    }

    /// Apply a completion event.
    ///
    /// Returns `false` if the answer was for an input that is no longer
    /// current; such answers are dropped.
    pub fn complete(&mut self, event: Event) -> Result<bool, PipelineError> {
        match self.state.handle(event) {
            Ok(_) => Ok(true),
            Err(PipelineError::Stale(stale)) => {
                tracing::debug!(stage = ?stale.stage, seq = stale.seq, "{}", stale);
                Ok(false)
            }
            Err(e) => Err(e),
        }
    }

    async fn dispatch(&mut self, event: Event) -> Result<(), PipelineError> {
        if let Some(command) = self.state.handle(event)? {
            let completion = execute(self.gateway.as_ref(), command).await;
            self.complete(completion)?;
        }
        Ok(())
    }

    pub fn capture(&mut self, image: ImageInput) {
        self.ignore_outcome(Event::ImageCaptured(image));
    }

    /// Start over without a photo.
    pub fn clear(&mut self) {
        self.ignore_outcome(Event::ImageCleared);
    }

    /// Identify the ingredients in the current photo.
    ///
    /// A failed call is not an `Err`: the session stays in Capture and the
    /// failure is reported through [`Session::notice`].
    pub async fn analyze(&mut self) -> Result<(), PipelineError> {
        self.dispatch(Event::AnalyzeRequested).await
    }

    pub fn start_manual(&mut self) {
        self.ignore_outcome(Event::ManualEntryRequested);
    }

    pub fn add_ingredient(&mut self, name: &str) -> Result<(), PipelineError> {
        self.state
            .handle(Event::IngredientAdded(name.to_string()))
            .map(|_| ())
    }

    pub fn remove_ingredient(&mut self, name: &str) -> Result<(), PipelineError> {
        self.state
            .handle(Event::IngredientRemoved(name.to_string()))
            .map(|_| ())
    }

    /// Ask for recipe ideas for the current ingredient list.
    pub async fn request_ideas(&mut self) -> Result<(), PipelineError> {
        self.dispatch(Event::IdeasRequested).await
    }

    /// Go back from the recipe ideas to editing the ingredient list.
    pub fn refine(&mut self) {
        self.navigate(Stage::Refine);
    }

    /// Move to `stage`, or the closest earlier stage the current data supports.
    pub fn navigate(&mut self, stage: Stage) -> Stage {
        self.ignore_outcome(Event::Navigate(stage));
        self.state.stage()
    }

    pub fn dismiss_notice(&mut self) {
        self.ignore_outcome(Event::NoticeDismissed);
    }

    /// Full recipe for `name`, grounded in the current ingredients and photo.
    pub async fn open_recipe(&self, name: &str) -> Result<ResolvedRecipe, ValidationError> {
        let context = self.state.ingredient_context();
        resolve_recipe(
            self.gateway.as_ref(),
            name,
            context.as_deref(),
            self.state.image(),
        )
        .await
    }

    /// Save a resolved recipe. Returns `false` if it was already saved.
    pub fn save_recipe(
        &self,
        store: &mut dyn RecipeStore,
        detail: &RecipeDetail,
    ) -> Result<bool, StoreError> {
        store.save(SavedRecipe::from_detail(detail.clone()))
    }

    /// Save an idea with the current photo. Returns `false` if it was already saved.
    pub fn save_idea(
        &self,
        store: &mut dyn RecipeStore,
        idea: &RecipeIdea,
    ) -> Result<bool, StoreError> {
        store.save(SavedRecipe::from_idea(
            idea.clone(),
            self.state.image().cloned(),
        ))
    }

    /// For events that never produce a command or an error.
    fn ignore_outcome(&mut self, event: Event) {
        if let Err(e) = self.state.handle(event) {
            tracing::debug!(error = %e, "Event had no effect");
        }
    }
}
