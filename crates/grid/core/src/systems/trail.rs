use crate::state::{EntityId, State};

/// Records the tile every entity has moved onto since the position baseline.
///
/// Tiles passed on the way (multi-step movers) are recorded by the movers
/// themselves; recording is idempotent.
pub fn trail_system(mut state: State) -> State {
    let moved: Vec<_> = state
        .position
        .iter()
        .filter(|(id, at)| state.prev_position.get(*id) != Some(*at))
        .map(|(id, at)| (id, *at))
        .collect();
    for (id, at) in moved {
        state.trail.record(at, id);
    }
    state
}

/// Records `entity` entering its current tile.
pub(crate) fn record_current(state: &mut State, entity: EntityId) {
    if let Some(at) = state.position.get(entity).copied() {
        state.trail.record(at, entity);
    }
}
