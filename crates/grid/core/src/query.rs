//! Read-only spatial queries shared by the systems.

use bitflags::bitflags;

use crate::state::{EntityId, Position, State};
use crate::strategy::Topology;

bitflags! {
    /// Which bodies count as obstacles in addition to blocking entities.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct BlockingRules: u8 {
        const PUSHABLE = 1 << 0;
        const COLLIDABLE = 1 << 1;
    }
}

impl BlockingRules {
    /// Rules for walking into a tile: walls and boxes stop movement.
    pub const MOVEMENT: Self = Self::PUSHABLE;

    /// Rules for landing on a tile: any body occupies it.
    pub const OCCUPANCY: Self = Self::PUSHABLE.union(Self::COLLIDABLE);

    /// Rules for sliding: only solid blocking entities stop a slide.
    pub const SOLID: Self = Self::empty();
}

/// Entities positioned on `position`, in ascending id order.
pub fn entities_at(state: &State, position: Position) -> Vec<EntityId> {
    state
        .position
        .iter()
        .filter(|(_, at)| **at == position)
        .map(|(id, _)| id)
        .collect()
}

/// True when an entity on `position` obstructs it under `rules`.
pub fn is_blocked_at(state: &State, position: Position, rules: BlockingRules) -> bool {
    entities_at(state, position).into_iter().any(|id| {
        state.blocking.contains(id)
            || (rules.contains(BlockingRules::PUSHABLE) && state.pushable.contains(id))
            || (rules.contains(BlockingRules::COLLIDABLE) && state.collidable.contains(id))
    })
}

/// Reduces `position` modulo the grid dimensions.
///
/// Returns `None` for a grid without area.
pub fn wrap_position(state: &State, position: Position) -> Option<Position> {
    if state.width == 0 || state.height == 0 {
        return None;
    }
    let width = state.width as i64;
    let height = state.height as i64;
    let x = (position.x as i64).rem_euclid(width);
    let y = (position.y as i64).rem_euclid(height);
    Some(Position::new(x as i32, y as i32))
}

/// Tile a pushed body lands on when shoved from `from` into `to`.
///
/// Follows the bound topology: wraps on a toroidal grid, `None` when the
/// far tile lies outside a bounded one.
pub fn push_destination(state: &State, from: Position, to: Position) -> Option<Position> {
    let far = to.offset(to.x - from.x, to.y - from.y);
    match state.mechanics.topology() {
        Topology::Toroidal => wrap_position(state, far),
        Topology::Bounded => state.in_bounds(far).then_some(far),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{Blocking, Collidable, Pushable};
    use crate::strategy::{Mechanics, Registry};

    fn world() -> State {
        let mut state = State::new(3, 3, Mechanics::default());
        state.position.insert(EntityId(1), Position::new(1, 0));
        state.blocking.insert(EntityId(1), Blocking);
        state.position.insert(EntityId(2), Position::new(1, 1));
        state.pushable.insert(EntityId(2), Pushable);
        state.position.insert(EntityId(3), Position::new(1, 2));
        state.collidable.insert(EntityId(3), Collidable);
        state
    }

    #[test]
    fn blocking_depends_on_rules() {
        let state = world();
        assert!(is_blocked_at(&state, Position::new(1, 0), BlockingRules::SOLID));
        assert!(!is_blocked_at(&state, Position::new(1, 1), BlockingRules::SOLID));
        assert!(is_blocked_at(&state, Position::new(1, 1), BlockingRules::MOVEMENT));
        assert!(!is_blocked_at(&state, Position::new(1, 2), BlockingRules::MOVEMENT));
        assert!(is_blocked_at(&state, Position::new(1, 2), BlockingRules::OCCUPANCY));
        assert!(!is_blocked_at(&state, Position::new(0, 0), BlockingRules::OCCUPANCY));
    }

    #[test]
    fn wrap_handles_negative_coordinates() {
        let state = world();
        assert_eq!(wrap_position(&state, Position::new(-1, 3)), Some(Position::new(2, 0)));

        let flat = State::new(0, 3, Mechanics::default());
        assert_eq!(wrap_position(&flat, Position::new(1, 1)), None);
    }

    #[test]
    fn push_destination_follows_topology() {
        let bounded = world();
        let from = Position::new(0, 1);
        let edge = Position::new(2, 1);
        assert_eq!(push_destination(&bounded, Position::new(1, 1), edge), None);
        assert_eq!(
            push_destination(&bounded, from, Position::new(1, 1)),
            Some(Position::new(2, 1))
        );

        let mut toroidal = world();
        toroidal.mechanics = Registry::builtin().bind("wrap", "default").unwrap();
        assert_eq!(
            push_destination(&toroidal, Position::new(1, 1), edge),
            Some(Position::new(0, 1))
        );
    }
}
