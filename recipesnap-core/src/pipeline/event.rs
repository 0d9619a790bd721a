use crate::error::GatewayError;
use crate::pipeline::{Stage, Ticket};
use crate::types::{ImageInput, RecipeIdea};

/// Everything that can happen to a pipeline.
#[derive(Debug, Clone)]
pub enum Event {
    /// A photo was taken or uploaded. Replaces any earlier photo.
    ImageCaptured(ImageInput),
    /// Start over with no photo.
    ImageCleared,
    AnalyzeRequested,
    ExtractionFinished {
        ticket: Ticket,
        result: Result<Vec<String>, GatewayError>,
    },
    /// Skip analysis and type the ingredients in.
    ManualEntryRequested,
    IngredientAdded(String),
    IngredientRemoved(String),
    IdeasRequested,
    IdeasFinished {
        ticket: Ticket,
        result: Result<Vec<RecipeIdea>, GatewayError>,
    },
    /// Go to another stage. Lands on the closest stage the current data supports.
    Navigate(Stage),
    NoticeDismissed,
}

/// A gateway call the pipeline wants made.
///
/// Run it with [`crate::pipeline::execute`] and feed the resulting event back.
#[derive(Debug, Clone)]
pub enum Command {
    ExtractIngredients {
        ticket: Ticket,
        image: ImageInput,
    },
    ProposeRecipes {
        ticket: Ticket,
        ingredients: Vec<String>,
    },
}

impl Command {
    pub fn ticket(&self) -> Ticket {
        match self {
            Command::ExtractIngredients { ticket, .. } | Command::ProposeRecipes { ticket, .. } => {
                *ticket
            }
        }
    }
}
