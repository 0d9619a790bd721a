//! The photo to recipe state machine.
//!
//! [`PipelineState`] holds everything one user has done so far and changes
//! only through [`PipelineState::handle`], a synchronous function of the
//! current state and an [`Event`]. Gateway calls are returned as
//! [`Command`]s instead of being made in place. [`execute`] runs one
//! against an [`InferenceGateway`] and produces the completion event, and
//! [`Session`] wires the two together for callers that simply await each
//! step.
//!
//! Responses can arrive after the user has moved on (a new photo, an edited
//! ingredient list). Every command carries a [`Ticket`] naming the input it
//! was made for, and completions whose input is no longer current are
//! rejected as stale instead of being applied.

mod event;
mod machine;
mod notice;
mod session;
mod state;

pub use event::{Command, Event};
pub use machine::{
    transition, ANALYSIS_COMPLETE, IDEAS_GENERATED, NO_IDEAS_FOUND, NO_INGREDIENTS_FOUND,
};
pub use notice::{Notice, NoticeLevel};
pub use session::Session;
pub use state::{PipelineState, Stage, Ticket};

use tracing::{info_span, Instrument};

use crate::gateway::InferenceGateway;

/// Make the gateway call a command describes.
pub async fn execute(gateway: &dyn InferenceGateway, command: Command) -> Event {
    match command {
        Command::ExtractIngredients { ticket, image } => {
            let result = gateway
                .extract_ingredients(&image)
                .instrument(info_span!("pipeline_command", stage = ?ticket.stage, seq = ticket.seq))
                .await;
            Event::ExtractionFinished { ticket, result }
        }
        Command::ProposeRecipes {
            ticket,
            ingredients,
        } => {
            let result = gateway
                .propose_recipes(&ingredients)
                .instrument(info_span!("pipeline_command", stage = ?ticket.stage, seq = ticket.seq))
                .await;
            Event::IdeasFinished { ticket, result }
        }
    }
}
