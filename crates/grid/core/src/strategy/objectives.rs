//! Built-in win conditions.

use crate::query::entities_at;
use crate::state::{EntityId, State};

/// The agent stands on an exit tile.
pub fn exit(state: &State, agent: EntityId) -> bool {
    state.position.get(agent).is_some_and(|at| {
        entities_at(state, *at)
            .into_iter()
            .any(|id| state.exit.contains(id))
    })
}

/// Every required item has been picked up.
pub fn collect(state: &State, _agent: EntityId) -> bool {
    state.required.ids().all(|id| !state.collectible.contains(id))
}

/// Every required item has been picked up and the agent is on an exit.
pub fn collect_exit(state: &State, agent: EntityId) -> bool {
    collect(state, agent) && exit(state, agent)
}

/// No locked door remains.
pub fn unlock(state: &State, _agent: EntityId) -> bool {
    state.locked.is_empty()
}

/// Every pushable body rests on an exit tile.
pub fn push(state: &State, _agent: EntityId) -> bool {
    state.pushable.ids().all(|id| {
        state.position.get(id).is_some_and(|at| {
            entities_at(state, *at)
                .into_iter()
                .any(|other| state.exit.contains(other))
        })
    })
}
