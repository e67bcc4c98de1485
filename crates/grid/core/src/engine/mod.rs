//! Turn reducer.
//!
//! [`step`] is the single entry point that advances a snapshot by one
//! action. It never mutates its input and runs the systems in a fixed
//! order:
//!
//! 1. position baseline, autonomous movers, chasers, effect timers, trails
//! 2. the action itself: push → move → portal → damage → tile reward, with
//!    win/lose checks, repeated per speed unit and per visited tile
//! 3. tile cost, win/lose, turn counter, status cleanup, entity cleanup

mod errors;
mod submove;

pub use errors::StepError;

use crate::action::Action;
use crate::state::{EntityId, State};
use crate::systems::{
    garbage_collection_system, lose_system, moving_system, pathfinding_system, position_system,
    status_gc_system, status_tick_system, tile_cost_system, trail_system, turn_system, win_system,
};

/// Advances `state` by one action of `agent`.
///
/// A terminal snapshot is returned unchanged. Every other successful call
/// advances `turn` by exactly one, with a single exception: stepping an
/// agent that is already dead on a non-terminal snapshot only sets `lose`
/// and leaves `turn` as it was, since no action was performed.
///
/// An agent that is not on the grid, or a movement strategy that cannot
/// resolve, is an error.
pub fn step(state: &State, action: Action, agent: EntityId) -> Result<State, StepError> {
    if state.is_terminal() {
        tracing::debug!(%agent, %action, turn = state.turn, "step on terminal snapshot ignored");
        return Ok(state.clone());
    }
    if !state.position.contains(agent) {
        return Err(StepError::UnknownEntity(agent));
    }
    if state.dead.contains(agent) {
        tracing::debug!(%agent, turn = state.turn, "dead agent cannot act");
        let mut lost = state.clone();
        lost.lose = true;
        return Ok(lost);
    }

    let mut next = state.clone();
    next.trail.clear();
    next.damage_hits.clear();

    let next = position_system(next);
    let next = moving_system(next);
    let next = pathfinding_system(next);
    let next = status_tick_system(next);
    let next = trail_system(next);

    let next = submove::resolve_action(next, action, agent)?;

    let next = tile_cost_system(next, agent);
    let next = win_system(next, agent);
    let next = lose_system(next, agent);
    let next = turn_system(next);
    let next = status_gc_system(next);
    Ok(garbage_collection_system(next))
}

/// Steps with the lowest-id agent of the snapshot.
pub fn step_first_agent(state: &State, action: Action) -> Result<State, StepError> {
    match state.first_agent() {
        Some(agent) => step(state, action, agent),
        None if state.is_terminal() => Ok(state.clone()),
        None => Err(StepError::NoAgent),
    }
}
