use crate::query::entities_at;
use crate::state::{EntityId, State, Status};

/// Picks up every collectible on the tile of `agent`.
///
/// Requires an inventory. Effects join the agent's status, everything else
/// joins the inventory, and rewardable items pay out immediately. Picked up
/// entities leave the grid and stop being collectible.
pub fn collectible_system(mut state: State, agent: EntityId) -> State {
    if !state.inventory.contains(agent) {
        return state;
    }
    let Some(at) = state.position.get(agent).copied() else {
        return state;
    };
    let items: Vec<EntityId> = entities_at(&state, at)
        .into_iter()
        .filter(|id| *id != agent && state.collectible.contains(*id))
        .collect();
    if items.is_empty() {
        return state;
    }

    for item in items {
        if let Some(reward) = state.rewardable.get(item) {
            state.score += reward.amount;
        }
        if state.effect_kind(item).is_some() {
            if let Some(status) = state.status.get_mut(agent) {
                status.effect_ids.insert(item);
            } else {
                state.status.insert(
                    agent,
                    Status {
                        effect_ids: [item].into(),
                    },
                );
            }
        } else if let Some(inventory) = state.inventory.get_mut(agent) {
            inventory.items.insert(item);
        }
        state.collectible.remove(item);
        state.position.remove(item);
    }
    state
}
