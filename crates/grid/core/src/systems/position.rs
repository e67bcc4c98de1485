use crate::state::State;

/// Captures current positions as the baseline for crossing and swap checks.
///
/// Shares the position store instead of copying it.
pub fn position_system(mut state: State) -> State {
    state.prev_position = state.position.clone();
    state
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{EntityId, Position};
    use crate::strategy::Mechanics;

    #[test]
    fn baseline_tracks_later_moves_independently() {
        let mut state = State::new(3, 3, Mechanics::default());
        state.position.insert(EntityId(0), Position::new(0, 0));
        let mut state = position_system(state);
        assert!(state.prev_position.shares_storage_with(&state.position));

        state.position.insert(EntityId(0), Position::new(1, 0));
        assert_eq!(state.prev_position.get(EntityId(0)), Some(&Position::new(0, 0)));
    }
}
