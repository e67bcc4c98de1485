//! Error types for the turn reducer.

use crate::action::Action;
use crate::error::{ErrorSeverity, GameError};
use crate::state::EntityId;
use crate::strategy::MoveFnError;

/// Errors surfaced while stepping a snapshot.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum StepError {
    #[error("entity {0} is not on the grid")]
    UnknownEntity(EntityId),

    #[error("snapshot has no agent to act")]
    NoAgent,

    #[error("{action} by {entity} failed to resolve movement: {source}")]
    Movement {
        action: Action,
        entity: EntityId,
        #[source]
        source: MoveFnError,
    },
}

impl GameError for StepError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::UnknownEntity(_) | Self::NoAgent => ErrorSeverity::Validation,
            Self::Movement { source, .. } => source.severity(),
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::UnknownEntity(_) => "STEP_UNKNOWN_ENTITY",
            Self::NoAgent => "STEP_NO_AGENT",
            Self::Movement { source, .. } => source.error_code(),
        }
    }
}
