//! Score adjustments from the tile under the agent.

use crate::query::entities_at;
use crate::state::{EntityId, RewardRepeat, State};

/// Adds the rewards of non-collectible tiles under `agent`.
///
/// One-shot rewards lose their rewardable component once paid.
pub fn tile_reward_system(mut state: State, agent: EntityId) -> State {
    if state.is_terminal() {
        return state;
    }
    let Some(at) = state.position.get(agent).copied() else {
        return state;
    };

    let mut paid_once = Vec::new();
    let mut total = 0i64;
    for id in entities_at(&state, at) {
        if id == agent || state.collectible.contains(id) {
            continue;
        }
        if let Some(reward) = state.rewardable.get(id) {
            total += reward.amount;
            if reward.repeat == RewardRepeat::Once {
                paid_once.push(id);
            }
        }
    }
    for id in paid_once {
        state.rewardable.remove(id);
    }
    state.score += total;
    state
}

/// Subtracts the costs of non-collectible tiles under `agent`.
pub fn tile_cost_system(mut state: State, agent: EntityId) -> State {
    if state.is_terminal() {
        return state;
    }
    let Some(at) = state.position.get(agent).copied() else {
        return state;
    };
    let total: i64 = entities_at(&state, at)
        .into_iter()
        .filter(|id| *id != agent && !state.collectible.contains(*id))
        .filter_map(|id| state.cost.get(id).map(|cost| cost.amount))
        .sum();
    state.score -= total;
    state
}
