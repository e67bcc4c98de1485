//! The per-action interaction chain.

use crate::action::{Action, Direction};
use crate::state::{EntityId, State};
use crate::systems::{
    collectible_system, damage_system, lose_system, movement_system, portal_system,
    position_system, push_system, record_current, status::take_speed_multiplier,
    tile_reward_system, unlock_system, win_system,
};

use super::StepError;

/// Resolves `action` for `agent`, running interactions after every sub-move.
pub(super) fn resolve_action(
    mut state: State,
    action: Action,
    agent: EntityId,
) -> Result<State, StepError> {
    let Some(direction) = action.direction() else {
        state = match action {
            Action::UseKey => unlock_system(state, agent),
            Action::PickUp => collectible_system(state, agent),
            _ => state,
        };
        return Ok(after_submove(state, agent));
    };
    resolve_moves(state, action, direction, agent)
}

fn resolve_moves(
    mut state: State,
    action: Action,
    direction: Direction,
    agent: EntityId,
) -> Result<State, StepError> {
    let repeats = take_speed_multiplier(&mut state, agent);

    for round in 0..repeats {
        let path = state
            .mechanics
            .movement
            .resolve(&state, agent, direction)
            .map_err(|source| StepError::Movement {
                action,
                entity: agent,
                source,
            })?;

        // A strategy may leave the agent in place; interactions still run.
        if path.is_empty() {
            tracing::trace!(%agent, round, "movement resolved to no tiles");
            return Ok(after_submove(state, agent));
        }

        for next in path {
            let before = state.position.get(agent).copied();
            state = push_system(state, agent, next);
            state = movement_system(state, agent, next);
            let moved = state.position.get(agent).copied() != before;
            tracing::trace!(%agent, round, %next, moved, "sub-move");

            state = after_submove(state, agent);
            if !moved || state.is_terminal() {
                return Ok(state);
            }
        }
    }
    Ok(state)
}

/// Interactions that follow every sub-move, in fixed order.
fn after_submove(mut state: State, agent: EntityId) -> State {
    record_current(&mut state, agent);
    let state = portal_system(state);
    let state = damage_system(state);
    let state = tile_reward_system(state, agent);
    let state = position_system(state);
    let state = win_system(state, agent);
    lose_system(state, agent)
}
