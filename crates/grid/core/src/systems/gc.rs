use std::collections::BTreeSet;

use crate::state::{EntityId, State};

/// Removes every entity that is neither on the grid nor held by one.
///
/// Reachability starts from positioned entities and follows status effects
/// and inventory items transitively; all other ids are dropped from every
/// store.
pub fn garbage_collection_system(mut state: State) -> State {
    let mut alive: BTreeSet<EntityId> = state.position.ids().collect();
    let mut frontier: Vec<EntityId> = alive.iter().copied().collect();

    while let Some(holder) = frontier.pop() {
        let held = state
            .status
            .get(holder)
            .into_iter()
            .flat_map(|status| status.effect_ids.iter().copied())
            .chain(
                state
                    .inventory
                    .get(holder)
                    .into_iter()
                    .flat_map(|inventory| inventory.items.iter().copied()),
            );
        for id in held {
            if alive.insert(id) {
                frontier.push(id);
            }
        }
    }

    state.retain_entities(|id| alive.contains(&id));
    state
}
