//! Autonomous patrol movement.

use crate::query::{BlockingRules, is_blocked_at};
use crate::state::{EntityId, Moving, Position, State};

/// Advances every patrolling entity along its axis, in ascending id order.
///
/// A blocked step reverses the heading when the patrol bounces and the
/// reversed step is tried once; otherwise the mover waits for this turn.
pub fn moving_system(mut state: State) -> State {
    let movers: Vec<(EntityId, Moving)> = state
        .moving
        .iter()
        .map(|(id, moving)| (id, *moving))
        .collect();

    for (id, mut moving) in movers {
        let Some(mut at) = state.position.get(id).copied() else {
            continue;
        };
        for _ in 0..moving.speed {
            if let Some(next) = open_step(&state, at, &moving) {
                at = next;
            } else if moving.bounce {
                moving = moving.reversed();
                match open_step(&state, at, &moving) {
                    Some(next) => at = next,
                    None => break,
                }
            } else {
                break;
            }
            state.position.insert(id, at);
            state.trail.record(at, id);
        }
        if state.moving.get(id) != Some(&moving) {
            state.moving.insert(id, moving);
        }
    }
    state
}

fn open_step(state: &State, from: Position, moving: &Moving) -> Option<Position> {
    let (dx, dy) = moving.delta();
    let next = from.offset(dx, dy);
    (state.in_bounds(next) && !is_blocked_at(state, next, BlockingRules::MOVEMENT)).then_some(next)
}
