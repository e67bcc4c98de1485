//! Built-in movement functions.
//!
//! Each function returns the ordered tiles one sub-move will try to visit.
//! The sub-move chain pushes, moves and resolves interactions per tile and
//! stops at the first tile the mover fails to enter.

use crate::action::Direction;
use crate::config::GridConfig;
use crate::error::{ErrorSeverity, GameError};
use crate::query::{BlockingRules, is_blocked_at, wrap_position};
use crate::state::{EntityId, Position, State};

use super::rng::{PcgRng, compute_seed};

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum MoveFnError {
    #[error("{movement} movement requires non-zero grid width and height")]
    MissingDimensions { movement: &'static str },

    #[error("entity {0} has no position to move from")]
    MissingPosition(EntityId),
}

impl GameError for MoveFnError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::MissingDimensions { .. } => ErrorSeverity::Fatal,
            Self::MissingPosition(_) => ErrorSeverity::Internal,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::MissingDimensions { .. } => "MOVE_MISSING_DIMENSIONS",
            Self::MissingPosition(_) => "MOVE_MISSING_POSITION",
        }
    }
}

fn origin(state: &State, entity: EntityId) -> Result<Position, MoveFnError> {
    state
        .position
        .get(entity)
        .copied()
        .ok_or(MoveFnError::MissingPosition(entity))
}

/// One step in the requested direction.
pub fn cardinal(
    state: &State,
    entity: EntityId,
    direction: Direction,
) -> Result<Vec<Position>, MoveFnError> {
    Ok(vec![direction.step(origin(state, entity)?)])
}

/// One step, wrapping around the grid edges.
pub fn wrap(
    state: &State,
    entity: EntityId,
    direction: Direction,
) -> Result<Vec<Position>, MoveFnError> {
    let next = direction.step(origin(state, entity)?);
    let wrapped = wrap_position(state, next)
        .ok_or(MoveFnError::MissingDimensions { movement: "wrap" })?;
    Ok(vec![wrapped])
}

/// One step with left and right swapped.
pub fn mirror(
    state: &State,
    entity: EntityId,
    direction: Direction,
) -> Result<Vec<Position>, MoveFnError> {
    let mirrored = match direction {
        Direction::Left | Direction::Right => direction.opposite(),
        Direction::Up | Direction::Down => direction,
    };
    cardinal(state, entity, mirrored)
}

/// Slides until the next tile leaves the grid or holds a solid blocker.
pub fn slippery(
    state: &State,
    entity: EntityId,
    direction: Direction,
) -> Result<Vec<Position>, MoveFnError> {
    let start = origin(state, entity)?;
    let mut path = Vec::new();
    let mut next = direction.step(start);
    while state.in_bounds(next) && !is_blocked_at(state, next, BlockingRules::SOLID) {
        path.push(next);
        next = direction.step(next);
    }
    if path.is_empty() {
        path.push(direction.step(start));
    }
    Ok(path)
}

/// One step, then possibly a random drift derived from seed and turn.
pub fn windy(
    state: &State,
    entity: EntityId,
    direction: Direction,
) -> Result<Vec<Position>, MoveFnError> {
    let next = direction.step(origin(state, entity)?);
    let mut path = vec![next];

    let seed = compute_seed(
        state.seed.unwrap_or(GridConfig::DEFAULT_SEED),
        state.turn,
        entity.0,
        GridConfig::RNG_CONTEXT_WIND,
    );
    let mut rng = PcgRng::from_seed(seed);
    if rng.chance(GridConfig::WIND_DRIFT_PERCENT)
        && let Some(drift) = rng.pick(&Direction::ALL)
    {
        let drifted = drift.step(next);
        if state.in_bounds(drifted) {
            path.push(drifted);
        }
    }
    Ok(path)
}

/// One step, then falls downward until something stops the fall.
pub fn gravity(
    state: &State,
    entity: EntityId,
    direction: Direction,
) -> Result<Vec<Position>, MoveFnError> {
    let first = direction.step(origin(state, entity)?);
    let mut path = vec![first];
    if !state.in_bounds(first) || is_blocked_at(state, first, BlockingRules::OCCUPANCY) {
        return Ok(path);
    }

    let mut current = first;
    loop {
        let below = Direction::Down.step(current);
        if !state.in_bounds(below) || is_blocked_at(state, below, BlockingRules::OCCUPANCY) {
            break;
        }
        path.push(below);
        current = below;
    }
    Ok(path)
}
