use crate::query::entities_at;
use crate::state::{EntityId, State};

/// Opens locked doors on or next to `agent` with keys from its inventory.
///
/// Doors are tried in ascending id order and each one consumes the
/// lowest-id matching key. An opened door stops blocking; the spent key
/// leaves the inventory and is swept at the end of the turn.
pub fn unlock_system(mut state: State, agent: EntityId) -> State {
    let Some(at) = state.position.get(agent).copied() else {
        return state;
    };
    if state.inventory.get(agent).is_none_or(|inventory| inventory.items.is_empty()) {
        return state;
    }

    let mut doors: Vec<EntityId> = std::iter::once(at)
        .chain(at.neighbours())
        .flat_map(|tile| entities_at(&state, tile))
        .filter(|id| state.locked.contains(*id))
        .collect();
    doors.sort();
    doors.dedup();

    for door in doors {
        let Some(lock) = state.locked.get(door) else {
            continue;
        };
        let key = state.inventory.get(agent).and_then(|inventory| {
            inventory.items.iter().copied().find(|item| {
                state
                    .key
                    .get(*item)
                    .is_some_and(|key| lock.accepts(key))
            })
        });
        let Some(key) = key else {
            continue;
        };

        state.locked.remove(door);
        state.blocking.remove(door);
        if let Some(inventory) = state.inventory.get_mut(agent) {
            inventory.items.remove(&key);
        }
        state.key.remove(key);
        tracing::trace!(%agent, %door, %key, "door unlocked");
    }
    state
}
