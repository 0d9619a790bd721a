//! Stage transitions.

use crate::error::{GatewayError, PipelineError, StaleResult, ValidationError};
use crate::ingredients::{AddOutcome, IngredientSet};
use crate::pipeline::state::{TaggedIdeas, TaggedIngredients};
use crate::pipeline::{Command, Event, Notice, PipelineState, Stage, Ticket};
use crate::types::{ImageId, ImageInput, RecipeIdea};
use crate::validate::{normalize_required_ingredients, validate_image};

pub const ANALYSIS_COMPLETE: &str = "Ingredients analyzed successfully! Please review them.";
pub const NO_INGREDIENTS_FOUND: &str =
    "No ingredients could be identified from the image. Try a different photo or add ingredients manually.";
pub const IDEAS_GENERATED: &str = "Recipe ideas generated successfully!";
pub const NO_IDEAS_FOUND: &str =
    "No recipe ideas found for the provided ingredients. Try adjusting your list.";

/// By-value form of [`PipelineState::handle`].
pub fn transition(
    mut state: PipelineState,
    event: Event,
) -> (PipelineState, Result<Option<Command>, PipelineError>) {
    let outcome = state.handle(event);
    (state, outcome)
}

impl PipelineState {
    /// Apply one event.
    ///
    /// Returns the gateway call to make next, if any. Completions for inputs
    /// that are no longer current are rejected with [`PipelineError::Stale`]
    /// and leave the state untouched.
    pub fn handle(&mut self, event: Event) -> Result<Option<Command>, PipelineError> {
        let outcome = match event {
            Event::ImageCaptured(image) => {
                self.capture(image);
                Ok(None)
            }
            Event::ImageCleared => {
                self.clear();
                Ok(None)
            }
            Event::AnalyzeRequested => self.request_extraction().map(Some),
            Event::ExtractionFinished { ticket, result } => {
                self.finish_extraction(ticket, result).map(|()| None)
            }
            Event::ManualEntryRequested => {
                self.start_manual_entry();
                Ok(None)
            }
            Event::IngredientAdded(name) => self.add_ingredient(&name).map(|()| None),
            Event::IngredientRemoved(name) => self.remove_ingredient(&name).map(|()| None),
            Event::IdeasRequested => self.request_ideas().map(Some),
            Event::IdeasFinished { ticket, result } => {
                self.finish_ideas(ticket, result).map(|()| None)
            }
            Event::Navigate(stage) => {
                self.stage = stage;
                Ok(None)
            }
            Event::NoticeDismissed => {
                self.notice = None;
                Ok(None)
            }
        };
        self.stage = self.effective_stage();
        outcome
    }

    fn capture(&mut self, image: ImageInput) {
        self.image = Some(image);
        self.stage = Stage::Capture;
        self.ingredients = None;
        self.ideas = None;
        self.notice = None;
        self.pending_extraction = None;
        self.pending_ideas = None;
    }

    fn clear(&mut self) {
        *self = PipelineState {
            next_seq: self.next_seq,
            ..PipelineState::default()
        };
    }

    fn request_extraction(&mut self) -> Result<Command, PipelineError> {
        self.require_stage(Stage::Capture, "Analyzing a photo")?;
        let image = match validate_image(self.image.as_ref()).cloned() {
            Ok(image) => image,
            Err(e) => return Err(self.reject(Stage::Capture, e)),
        };

        let ticket = self.issue_ticket(Stage::Capture, Some(image.id()), None);
        self.pending_extraction = Some(ticket);
        tracing::debug!(
            seq = ticket.seq,
            image = %image.id().short(),
            "Requesting ingredient extraction"
        );
        Ok(Command::ExtractIngredients { ticket, image })
    }

    fn finish_extraction(
        &mut self,
        ticket: Ticket,
        result: Result<Vec<String>, GatewayError>,
    ) -> Result<(), PipelineError> {
        if self.pending_extraction != Some(ticket) || ticket.image != self.image_id() {
            return Err(stale(ticket));
        }
        self.pending_extraction = None;

        match result {
            Ok(names) => {
                match self.ingredients.as_mut() {
                    Some(tagged) if tagged.image == ticket.image => tagged.set.replace(names),
                    _ => {
                        self.ingredients = Some(TaggedIngredients {
                            image: ticket.image,
                            set: IngredientSet::from_raw(names),
                        })
                    }
                }
                self.ideas = None;
                self.pending_ideas = None;
                self.stage = Stage::Refine;

                let found = self.visible_ingredients().map_or(0, IngredientSet::len);
                let notice = if found == 0 {
                    Notice::warning(Stage::Refine, NO_INGREDIENTS_FOUND)
                } else {
                    Notice::info(Stage::Refine, ANALYSIS_COMPLETE)
                };
                self.notice = Some(notice.tagged(ticket.image, None));
            }
            Err(e) => {
                tracing::warn!(error = %e, seq = ticket.seq, "Ingredient extraction failed");
                self.notice = Some(
                    Notice::error(Stage::Capture, format!("Error: {e}")).tagged(ticket.image, None),
                );
            }
        }
        Ok(())
    }

    fn start_manual_entry(&mut self) {
        if self.visible_ingredients().is_none() {
            self.ingredients = Some(TaggedIngredients {
                image: self.image_id(),
                set: IngredientSet::new(),
            });
            self.ideas = None;
        }
        self.stage = Stage::Refine;
    }

    fn add_ingredient(&mut self, name: &str) -> Result<(), PipelineError> {
        self.require_stage(Stage::Refine, "Adding an ingredient")?;
        let image = self.image_id();
        let outcome = match self.ingredients_mut()?.add(name) {
            Ok(outcome) => outcome,
            Err(e) => return Err(self.reject(Stage::Refine, e)),
        };

        if let AddOutcome::Duplicate(existing) = outcome {
            self.notice = Some(
                Notice::info(Stage::Refine, format!("{existing} is already in the list."))
                    .for_field("ingredient")
                    .tagged(image, None),
            );
        }
        Ok(())
    }

    fn remove_ingredient(&mut self, name: &str) -> Result<(), PipelineError> {
        self.require_stage(Stage::Refine, "Removing an ingredient")?;
        self.ingredients_mut()?.remove(name);
        Ok(())
    }

    fn request_ideas(&mut self) -> Result<Command, PipelineError> {
        self.require_stage(Stage::Refine, "Asking for recipe ideas")?;
        let image = self.image_id();
        let Some(set) = self.visible_ingredients() else {
            return Err(self.reject(Stage::Refine, ValidationError::EmptyIngredients));
        };
        let revision = set.revision();
        let ingredients = match normalize_required_ingredients(set.iter()) {
            Ok(set) => set.to_vec(),
            Err(e) => return Err(self.reject(Stage::Refine, e)),
        };

        let ticket = self.issue_ticket(Stage::Refine, image, Some(revision));
        self.pending_ideas = Some(ticket);
        tracing::debug!(seq = ticket.seq, revision, "Requesting recipe ideas");
        Ok(Command::ProposeRecipes {
            ticket,
            ingredients,
        })
    }

    fn finish_ideas(
        &mut self,
        ticket: Ticket,
        result: Result<Vec<RecipeIdea>, GatewayError>,
    ) -> Result<(), PipelineError> {
        let current_revision = self.visible_ingredients().map(IngredientSet::revision);
        if self.pending_ideas != Some(ticket)
            || ticket.image != self.image_id()
            || ticket.revision.is_none()
            || ticket.revision != current_revision
        {
            return Err(stale(ticket));
        }
        self.pending_ideas = None;

        match result {
            Ok(ideas) => {
                let notice = if ideas.is_empty() {
                    Notice::warning(Stage::Results, NO_IDEAS_FOUND)
                } else {
                    Notice::info(Stage::Results, IDEAS_GENERATED)
                };
                self.ideas = Some(TaggedIdeas {
                    image: ticket.image,
                    revision: ticket.revision.unwrap_or_default(),
                    ideas,
                });
                if self.stage == Stage::Refine {
                    self.stage = Stage::Results;
                }
                self.notice = Some(notice.tagged(ticket.image, ticket.revision));
            }
            Err(e) => {
                tracing::warn!(error = %e, seq = ticket.seq, "Recipe idea generation failed");
                self.notice = Some(
                    Notice::error(Stage::Refine, format!("Error: {e}"))
                        .tagged(ticket.image, ticket.revision),
                );
            }
        }
        Ok(())
    }

    fn require_stage(&self, stage: Stage, action: &'static str) -> Result<(), PipelineError> {
        if self.stage == stage {
            Ok(())
        } else {
            Err(PipelineError::InvalidTransition {
                stage: self.stage,
                action,
            })
        }
    }

    fn ingredients_mut(&mut self) -> Result<&mut IngredientSet, PipelineError> {
        let current = self.image_id();
        match self.ingredients.as_mut() {
            Some(tagged) if tagged.image == current => Ok(&mut tagged.set),
            _ => Err(PipelineError::InvalidTransition {
                stage: self.stage,
                action: "Editing ingredients",
            }),
        }
    }

    /// Show a validation failure next to its field and hand it back.
    fn reject(&mut self, stage: Stage, error: ValidationError) -> PipelineError {
        let revision = self.visible_ingredients().map(IngredientSet::revision);
        self.notice = Some(Notice::invalid_input(stage, &error).tagged(self.image_id(), revision));
        PipelineError::Validation(error)
    }

    fn issue_ticket(
        &mut self,
        stage: Stage,
        image: Option<ImageId>,
        revision: Option<u64>,
    ) -> Ticket {
        self.next_seq += 1;
        Ticket {
            stage,
            seq: self.next_seq,
            image,
            revision,
        }
    }
}

fn stale(ticket: Ticket) -> PipelineError {
    PipelineError::Stale(StaleResult {
        stage: ticket.stage,
        seq: ticket.seq,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::InferenceError;

    fn photo(bytes: &[u8]) -> ImageInput {
        ImageInput::new(bytes.to_vec(), "image/jpeg").unwrap()
    }

    fn ticket_of(command: Option<Command>) -> Ticket {
        command.expect("expected a command").ticket()
    }

    fn names(state: &PipelineState) -> Vec<String> {
        state.visible_ingredients().unwrap().to_vec()
    }

    fn refine_with(items: &[&str]) -> PipelineState {
        let mut state = PipelineState::new();
        state.handle(Event::ImageCaptured(photo(b"a"))).unwrap();
        let ticket = ticket_of(state.handle(Event::AnalyzeRequested).unwrap());
        state
            .handle(Event::ExtractionFinished {
                ticket,
                result: Ok(items.iter().map(|s| s.to_string()).collect()),
            })
            .unwrap();
        state
    }

    #[test]
    fn test_initial_state() {
        let state = PipelineState::new();
        assert_eq!(state.stage(), Stage::Capture);
        assert!(state.image().is_none());
        assert!(state.visible_ingredients().is_none());
        assert!(state.visible_ideas().is_none());
        assert!(state.visible_notice().is_none());
    }

    #[test]
    fn test_analyze_without_photo_is_validation_error() {
        let mut state = PipelineState::new();
        let err = state.handle(Event::AnalyzeRequested).unwrap_err();
        assert_eq!(err, PipelineError::Validation(ValidationError::MissingImage));
        assert_eq!(state.visible_notice().unwrap().field, Some("image"));
        assert!(!state.is_analyzing());
    }

    #[test]
    fn test_extraction_moves_to_refine() {
        let state = refine_with(&["tomato", "onion", " Tomato "]);
        assert_eq!(state.stage(), Stage::Refine);
        assert_eq!(names(&state), vec!["tomato", "onion"]);
        assert_eq!(state.visible_notice().unwrap().message, ANALYSIS_COMPLETE);
    }

    #[test]
    fn test_empty_extraction_still_moves_to_refine() {
        let state = refine_with(&[]);
        assert_eq!(state.stage(), Stage::Refine);
        assert!(state.visible_ingredients().unwrap().is_empty());
        assert_eq!(state.visible_notice().unwrap().message, NO_INGREDIENTS_FOUND);
    }

    #[test]
    fn test_extraction_failure_stays_in_capture() {
        let mut state = PipelineState::new();
        state.handle(Event::ImageCaptured(photo(b"a"))).unwrap();
        let ticket = ticket_of(state.handle(Event::AnalyzeRequested).unwrap());
        state
            .handle(Event::ExtractionFinished {
                ticket,
                result: Err(InferenceError::Transport("timeout".to_string()).into()),
            })
            .unwrap();

        assert_eq!(state.stage(), Stage::Capture);
        assert!(state.visible_ingredients().is_none());
        let notice = state.visible_notice().unwrap();
        assert!(notice.is_error());
        assert!(notice.message.contains("timeout"));
        assert!(!state.is_analyzing());
    }

    #[test]
    fn test_new_photo_discards_pending_extraction() {
        let mut state = PipelineState::new();
        state.handle(Event::ImageCaptured(photo(b"a"))).unwrap();
        let ticket = ticket_of(state.handle(Event::AnalyzeRequested).unwrap());
        state.handle(Event::ImageCaptured(photo(b"b"))).unwrap();

        let err = state
            .handle(Event::ExtractionFinished {
                ticket,
                result: Ok(vec!["tomato".to_string()]),
            })
            .unwrap_err();
        assert!(matches!(err, PipelineError::Stale(_)));
        assert_eq!(state.stage(), Stage::Capture);
        assert!(state.visible_ingredients().is_none());
    }

    #[test]
    fn test_only_latest_extraction_applies() {
        let mut state = PipelineState::new();
        state.handle(Event::ImageCaptured(photo(b"a"))).unwrap();
        let first = ticket_of(state.handle(Event::AnalyzeRequested).unwrap());
        let second = ticket_of(state.handle(Event::AnalyzeRequested).unwrap());

        let err = state
            .handle(Event::ExtractionFinished {
                ticket: first,
                result: Ok(vec!["old".to_string()]),
            })
            .unwrap_err();
        assert!(matches!(err, PipelineError::Stale(StaleResult { seq, .. }) if seq == first.seq));

        state
            .handle(Event::ExtractionFinished {
                ticket: second,
                result: Ok(vec!["new".to_string()]),
            })
            .unwrap();
        assert_eq!(names(&state), vec!["new"]);
    }

    #[test]
    fn test_recapturing_same_photo_starts_over() {
        let mut state = refine_with(&["tomato"]);
        state
            .handle(Event::IngredientAdded("rice".to_string()))
            .unwrap();
        let ticket = ticket_of(state.handle(Event::IdeasRequested).unwrap());

        state.handle(Event::ImageCaptured(photo(b"a"))).unwrap();
        assert_eq!(state.stage(), Stage::Capture);
        assert!(state.visible_ingredients().is_none());
        assert!(state.visible_ideas().is_none());
        assert!(state.visible_notice().is_none());
        assert!(!state.is_generating_ideas());

        state.handle(Event::Navigate(Stage::Refine)).unwrap();
        assert_eq!(state.stage(), Stage::Capture);

        let err = state
            .handle(Event::IdeasFinished {
                ticket,
                result: Ok(vec![RecipeIdea::new("Tomato Rice", "Easy.")]),
            })
            .unwrap_err();
        assert!(matches!(err, PipelineError::Stale(_)));
        assert!(state.visible_ideas().is_none());
    }

    #[test]
    fn test_idea_answer_after_leaving_refine_does_not_move_stage() {
        let mut state = refine_with(&["tomato"]);
        let ticket = ticket_of(state.handle(Event::IdeasRequested).unwrap());
        state.handle(Event::Navigate(Stage::Capture)).unwrap();

        state
            .handle(Event::IdeasFinished {
                ticket,
                result: Ok(vec![RecipeIdea::new("Tomato Soup", "Warm.")]),
            })
            .unwrap();
        assert_eq!(state.stage(), Stage::Capture);
        assert_eq!(state.visible_ideas().unwrap().len(), 1);
        assert_eq!(state.visible_notice().unwrap().message, IDEAS_GENERATED);

        state.handle(Event::Navigate(Stage::Results)).unwrap();
        assert_eq!(state.stage(), Stage::Results);
    }

    #[test]
    fn test_duplicate_add_leaves_set_unchanged() {
        let mut state = refine_with(&["tomato", "onion"]);
        let revision = state.visible_ingredients().unwrap().revision();

        state
            .handle(Event::IngredientAdded("Tomato".to_string()))
            .unwrap();
        assert_eq!(names(&state), vec!["tomato", "onion"]);
        assert_eq!(state.visible_ingredients().unwrap().revision(), revision);

        let notice = state.visible_notice().unwrap();
        assert_eq!(notice.message, "tomato is already in the list.");
        assert_eq!(notice.field, Some("ingredient"));
    }

    #[test]
    fn test_blank_ingredient_is_rejected() {
        let mut state = refine_with(&["tomato"]);
        let err = state
            .handle(Event::IngredientAdded("   ".to_string()))
            .unwrap_err();
        assert_eq!(
            err,
            PipelineError::Validation(ValidationError::EmptyIngredient)
        );
        assert_eq!(names(&state), vec!["tomato"]);
    }

    #[test]
    fn test_edits_only_in_refine() {
        let mut state = PipelineState::new();
        let err = state
            .handle(Event::IngredientAdded("tomato".to_string()))
            .unwrap_err();
        assert!(matches!(
            err,
            PipelineError::InvalidTransition {
                stage: Stage::Capture,
                ..
            }
        ));
    }

    #[test]
    fn test_ideas_require_ingredients() {
        let mut state = refine_with(&["tomato"]);
        state
            .handle(Event::IngredientRemoved("TOMATO".to_string()))
            .unwrap();
        assert!(state.visible_ingredients().unwrap().is_empty());

        let err = state.handle(Event::IdeasRequested).unwrap_err();
        assert_eq!(
            err,
            PipelineError::Validation(ValidationError::EmptyIngredients)
        );
        assert_eq!(state.stage(), Stage::Refine);
        assert_eq!(state.visible_notice().unwrap().field, Some("ingredients"));
    }

    #[test]
    fn test_ideas_move_to_results() {
        let mut state = refine_with(&["tomato", "onion"]);
        let command = state.handle(Event::IdeasRequested).unwrap().unwrap();
        let Command::ProposeRecipes {
            ticket,
            ingredients,
        } = command
        else {
            panic!("expected ProposeRecipes");
        };
        assert_eq!(ingredients, vec!["tomato", "onion"]);

        state
            .handle(Event::IdeasFinished {
                ticket,
                result: Ok(vec![RecipeIdea::new("Tomato Soup", "Warm.")]),
            })
            .unwrap();
        assert_eq!(state.stage(), Stage::Results);
        assert_eq!(state.visible_ideas().unwrap().len(), 1);
        assert_eq!(state.visible_notice().unwrap().message, IDEAS_GENERATED);
    }

    #[test]
    fn test_edit_during_idea_request_discards_answer() {
        let mut state = refine_with(&["tomato"]);
        let ticket = ticket_of(state.handle(Event::IdeasRequested).unwrap());
        state
            .handle(Event::IngredientAdded("rice".to_string()))
            .unwrap();

        let err = state
            .handle(Event::IdeasFinished {
                ticket,
                result: Ok(vec![RecipeIdea::new("Tomato Soup", "Warm.")]),
            })
            .unwrap_err();
        assert!(matches!(
            err,
            PipelineError::Stale(StaleResult {
                stage: Stage::Refine,
                ..
            })
        ));
        assert_eq!(state.stage(), Stage::Refine);
        assert!(state.visible_ideas().is_none());
    }

    #[test]
    fn test_idea_failure_stays_in_refine() {
        let mut state = refine_with(&["tomato"]);
        let ticket = ticket_of(state.handle(Event::IdeasRequested).unwrap());
        state
            .handle(Event::IdeasFinished {
                ticket,
                result: Err(InferenceError::schema("propose_recipes", "bad json").into()),
            })
            .unwrap();

        assert_eq!(state.stage(), Stage::Refine);
        assert!(state.visible_notice().unwrap().is_error());

        // The error belongs to the list it was raised for.
        state
            .handle(Event::IngredientAdded("rice".to_string()))
            .unwrap();
        assert!(state.visible_notice().is_none());
    }

    #[test]
    fn test_navigate_falls_back_to_supported_stage() {
        let mut state = PipelineState::new();
        state.handle(Event::Navigate(Stage::Results)).unwrap();
        assert_eq!(state.stage(), Stage::Capture);

        let mut state = refine_with(&["tomato"]);
        state.handle(Event::Navigate(Stage::Results)).unwrap();
        assert_eq!(state.stage(), Stage::Refine);
    }

    #[test]
    fn test_manual_entry_without_photo() {
        let mut state = PipelineState::new();
        state.handle(Event::ManualEntryRequested).unwrap();
        assert_eq!(state.stage(), Stage::Refine);

        state
            .handle(Event::IngredientAdded("egg".to_string()))
            .unwrap();
        assert_eq!(names(&state), vec!["egg"]);

        // Taking a photo replaces the typed list.
        state.handle(Event::ImageCaptured(photo(b"a"))).unwrap();
        assert!(state.visible_ingredients().is_none());
    }

    #[test]
    fn test_clear_resets_everything() {
        let mut state = refine_with(&["tomato"]);
        state.handle(Event::ImageCleared).unwrap();
        assert_eq!(state.stage(), Stage::Capture);
        assert!(state.image().is_none());
        assert!(state.visible_ingredients().is_none());
        assert!(state.visible_notice().is_none());
    }

    #[test]
    fn test_dismiss_notice() {
        let mut state = refine_with(&["tomato"]);
        assert!(state.visible_notice().is_some());
        state.handle(Event::NoticeDismissed).unwrap();
        assert!(state.visible_notice().is_none());
    }

    #[test]
    fn test_transition_by_value() {
        let (state, outcome) =
            transition(PipelineState::new(), Event::ImageCaptured(photo(b"a")));
        assert!(outcome.unwrap().is_none());
        let (state, outcome) = transition(state, Event::AnalyzeRequested);
        assert!(matches!(
            outcome.unwrap(),
            Some(Command::ExtractIngredients { .. })
        ));
        assert!(state.is_analyzing());
    }
}
