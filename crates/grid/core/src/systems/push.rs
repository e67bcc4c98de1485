//! Pushing bodies ahead of a mover.

use crate::query::{BlockingRules, entities_at, is_blocked_at, push_destination};
use crate::state::{EntityId, Position, State};

use super::status::{has_active_phasing, is_phasing_effect, use_effect};
use super::trail::record_current;

/// Shoves every pushable on `next` one tile further, moving `mover` along.
///
/// Leaves the snapshot untouched when there is nothing to push, when the
/// mover phases through, or when the far tile is unavailable. A pushed body
/// with active phasing ignores an occupied far tile and spends one use.
pub fn push_system(mut state: State, mover: EntityId, next: Position) -> State {
    let Some(current) = state.position.get(mover).copied() else {
        return state;
    };
    let pushed: Vec<EntityId> = entities_at(&state, next)
        .into_iter()
        .filter(|id| *id != mover && state.pushable.contains(*id))
        .collect();
    if pushed.is_empty() || has_active_phasing(&state, mover) {
        return state;
    }

    let Some(destination) = push_destination(&state, current, next) else {
        return state;
    };
    if is_blocked_at(&state, destination, BlockingRules::OCCUPANCY) {
        if !pushed.iter().all(|id| has_active_phasing(&state, *id)) {
            return state;
        }
        for id in &pushed {
            use_effect(&mut state, *id, is_phasing_effect);
        }
    }

    for id in pushed {
        state.position.insert(id, destination);
        record_current(&mut state, id);
    }
    state.position.insert(mover, next);
    record_current(&mut state, mover);
    state
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{Blocking, Phasing, Pushable, Status, UsageLimit};
    use crate::strategy::{Mechanics, Registry};

    const AGENT: EntityId = EntityId(0);
    const CRATE: EntityId = EntityId(1);

    fn lane(width: u32) -> State {
        let mut state = State::new(width, 1, Mechanics::default());
        state.position.insert(AGENT, Position::new(0, 0));
        state.position.insert(CRATE, Position::new(1, 0));
        state.pushable.insert(CRATE, Pushable);
        state
    }

    fn give_phasing(state: &mut State, holder: EntityId, effect: u32, uses: u32) {
        let effect = EntityId(effect);
        state.phasing.insert(effect, Phasing);
        state.usage_limit.insert(effect, UsageLimit { amount: uses });
        state.status.insert(
            holder,
            Status {
                effect_ids: [effect].into(),
            },
        );
    }

    #[test]
    fn pushes_box_and_follows() {
        let state = push_system(lane(3), AGENT, Position::new(1, 0));
        assert_eq!(state.position.get(AGENT), Some(&Position::new(1, 0)));
        assert_eq!(state.position.get(CRATE), Some(&Position::new(2, 0)));
        assert_eq!(
            state.trail.at(Position::new(2, 0)).collect::<Vec<_>>(),
            vec![CRATE]
        );
    }

    #[test]
    fn wall_behind_box_blocks_both() {
        let mut state = lane(3);
        state.position.insert(EntityId(2), Position::new(2, 0));
        state.blocking.insert(EntityId(2), Blocking);
        let before = state.clone();
        assert_eq!(push_system(state, AGENT, Position::new(1, 0)), before);
    }

    #[test]
    fn box_chains_do_not_move() {
        let mut state = lane(4);
        state.position.insert(EntityId(2), Position::new(2, 0));
        state.pushable.insert(EntityId(2), Pushable);
        let before = state.clone();
        assert_eq!(push_system(state, AGENT, Position::new(1, 0)), before);
    }

    #[test]
    fn grid_edge_blocks_push_unless_wrapping() {
        let state = lane(2);
        let before = state.clone();
        assert_eq!(push_system(state, AGENT, Position::new(1, 0)), before);

        let mut state = lane(2);
        state.mechanics = Registry::builtin().bind("wrap", "default").unwrap();
        state.position.insert(AGENT, Position::new(0, 0));
        let state = push_system(state, AGENT, Position::new(1, 0));
        assert_eq!(state.position.get(CRATE), Some(&Position::new(0, 0)));
        assert_eq!(state.position.get(AGENT), Some(&Position::new(1, 0)));
    }

    #[test]
    fn phasing_mover_does_not_push() {
        let mut state = lane(3);
        give_phasing(&mut state, AGENT, 9, 1);
        let state = push_system(state, AGENT, Position::new(1, 0));
        assert_eq!(state.position.get(CRATE), Some(&Position::new(1, 0)));
        assert_eq!(state.position.get(AGENT), Some(&Position::new(0, 0)));
    }

    #[test]
    fn phasing_box_ignores_occupied_far_tile() {
        let mut state = lane(3);
        state.position.insert(EntityId(2), Position::new(2, 0));
        state.blocking.insert(EntityId(2), Blocking);
        give_phasing(&mut state, CRATE, 9, 1);

        let state = push_system(state, AGENT, Position::new(1, 0));
        assert_eq!(state.position.get(CRATE), Some(&Position::new(2, 0)));
        assert_eq!(state.usage_limit.get(EntityId(9)), Some(&UsageLimit { amount: 0 }));
    }
}
