//! Win, lose and turn bookkeeping.

use crate::state::{EntityId, State};

/// Sets `win` when the bound objective is met by a living agent.
pub fn win_system(mut state: State, agent: EntityId) -> State {
    if state.is_terminal() || state.dead.contains(agent) {
        return state;
    }
    if state.mechanics.objective.is_met(&state, agent) {
        tracing::debug!(%agent, turn = state.turn, "objective met");
        state.win = true;
    }
    state
}

/// Sets `lose` when the agent is dead or out of health.
pub fn lose_system(mut state: State, agent: EntityId) -> State {
    if state.is_terminal() {
        return state;
    }
    let depleted = state
        .health
        .get(agent)
        .is_some_and(|health| health.is_depleted());
    if state.dead.contains(agent) || depleted {
        tracing::debug!(%agent, turn = state.turn, "agent lost");
        state.lose = true;
    }
    state
}

/// Advances the turn counter; running out of turns without a win loses.
pub fn turn_system(mut state: State) -> State {
    state.turn += 1;
    if let Some(limit) = state.turn_limit
        && state.turn >= limit
        && !state.win
        && !state.lose
    {
        tracing::debug!(turn = state.turn, limit, "turn limit reached");
        state.lose = true;
    }
    state
}
