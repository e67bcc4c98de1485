use crate::query::{BlockingRules, is_blocked_at};
use crate::state::{EntityId, Position, State};

use super::status::{is_phasing_effect, use_effect};
use super::trail::record_current;

/// Moves `mover` onto `next` when the tile is in bounds and free.
///
/// An active phasing effect lets the mover enter a blocked tile and spends
/// one use. A mover already on `next` (after a push) is left as is.
pub fn movement_system(mut state: State, mover: EntityId, next: Position) -> State {
    let Some(current) = state.position.get(mover).copied() else {
        return state;
    };
    if current == next || !state.in_bounds(next) {
        return state;
    }
    if is_blocked_at(&state, next, BlockingRules::MOVEMENT)
        && use_effect(&mut state, mover, is_phasing_effect).is_none()
    {
        return state;
    }
    state.position.insert(mover, next);
    record_current(&mut state, mover);
    state
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{Blocking, Collidable, Phasing, Status, UsageLimit};
    use crate::strategy::Mechanics;

    const AGENT: EntityId = EntityId(0);

    fn corridor() -> State {
        let mut state = State::new(3, 1, Mechanics::default());
        state.position.insert(AGENT, Position::new(0, 0));
        state.position.insert(EntityId(1), Position::new(1, 0));
        state.blocking.insert(EntityId(1), Blocking);
        state
    }

    #[test]
    fn walls_stop_movement() {
        let state = corridor();
        let before = state.clone();
        assert_eq!(movement_system(state, AGENT, Position::new(1, 0)), before);
    }

    #[test]
    fn out_of_bounds_is_ignored() {
        let state = corridor();
        let before = state.clone();
        assert_eq!(movement_system(state, AGENT, Position::new(-1, 0)), before);
    }

    #[test]
    fn collidable_bodies_do_not_block() {
        let mut state = corridor();
        state.blocking.remove(EntityId(1));
        state.collidable.insert(EntityId(1), Collidable);
        let state = movement_system(state, AGENT, Position::new(1, 0));
        assert_eq!(state.position.get(AGENT), Some(&Position::new(1, 0)));
    }

    #[test]
    fn phasing_walks_through_walls_once() {
        let mut state = corridor();
        state.phasing.insert(EntityId(5), Phasing);
        state.usage_limit.insert(EntityId(5), UsageLimit { amount: 1 });
        state.status.insert(
            AGENT,
            Status {
                effect_ids: [EntityId(5)].into(),
            },
        );

        let state = movement_system(state, AGENT, Position::new(1, 0));
        assert_eq!(state.position.get(AGENT), Some(&Position::new(1, 0)));
        assert_eq!(state.usage_limit.get(EntityId(5)), Some(&UsageLimit { amount: 0 }));

        let mut state = state;
        state.position.insert(AGENT, Position::new(0, 0));
        let state = movement_system(state, AGENT, Position::new(1, 0));
        assert_eq!(state.position.get(AGENT), Some(&Position::new(0, 0)));
    }
}
