use crate::query::{BlockingRules, is_blocked_at};
use crate::state::{EntityId, Position, State};

/// Relocates collidable bodies that just stepped onto a portal.
///
/// Arrivals are collected from the incoming snapshot before any teleport
/// happens, so a body lands on the paired portal without being sent on
/// again in the same pass. Bodies that stood still on a portal stay put,
/// and an occupied exit tile refuses the teleport.
pub fn portal_system(mut state: State) -> State {
    let mut teleports: Vec<(EntityId, Position)> = Vec::new();
    for (portal_id, portal) in state.portal.iter() {
        let (Some(entry), Some(exit)) = (
            state.position.get(portal_id).copied(),
            state.position.get(portal.pair).copied(),
        ) else {
            continue;
        };
        for (id, at) in state.position.iter() {
            let arrived = *at == entry
                && state.collidable.contains(id)
                && state.prev_position.get(id).is_some_and(|prev| *prev != entry);
            if arrived && teleports.iter().all(|(seen, _)| *seen != id) {
                teleports.push((id, exit));
            }
        }
    }

    for (id, exit) in teleports {
        if is_blocked_at(&state, exit, BlockingRules::OCCUPANCY) {
            continue;
        }
        state.position.insert(id, exit);
    }
    state
}
