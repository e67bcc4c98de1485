//! Pipeline-wide guarantees: determinism, turn accounting, terminal
//! handling and snapshot immutability.

use grid_core::state::{Moving, MovingAxis, Pathfinding, PathfindingKind};
use grid_core::{
    Action, EffectLimit, EntityId, EntitySpec, Position, Registry, State, StateBuilder, StepError,
    step, step_first_agent,
};
use strum::IntoEnumIterator;

/// A busy level exercising movers, chasers, effects, items and wind.
fn busy_level(seed: u64) -> (State, EntityId) {
    let mut builder = StateBuilder::new(7, 7).movement("windy").seed(seed);
    let agent = builder.spawn(Position::new(3, 3), EntitySpec::agent(20));
    let shield = builder.spawn_unplaced(EntitySpec::immunity_effect(Some(EffectLimit::Time(4))));
    builder.apply_effect(agent, shield);
    builder.spawn(Position::new(0, 0), EntitySpec::coin(3));
    builder.spawn(Position::new(5, 5), EntitySpec::key("a"));
    builder.spawn(Position::new(6, 6), EntitySpec::door("a"));
    builder.spawn(Position::new(2, 2), EntitySpec::boulder());
    builder.spawn(
        Position::new(0, 6),
        EntitySpec::monster(1).with_moving(Moving::new(MovingAxis::Horizontal, true)),
    );
    builder.spawn(
        Position::new(6, 0),
        EntitySpec::monster(1).with_pathfinding(Pathfinding {
            target: agent,
            kind: PathfindingKind::StraightLine,
        }),
    );
    for x in 0..7 {
        builder.spawn(Position::new(x, 4), EntitySpec::floor(1));
    }
    (builder.build(&Registry::builtin()).expect("valid level"), agent)
}

fn script() -> Vec<Action> {
    Action::iter().cycle().take(40).collect()
}

#[test]
fn identical_inputs_give_identical_outputs() {
    let (initial, agent) = busy_level(17);
    let mut left = initial.clone();
    let mut right = initial;
    for action in script() {
        left = step(&left, action, agent).expect("left step");
        right = step(&right, action, agent).expect("right step");
        assert_eq!(left, right);
    }
}

#[test]
fn fresh_builds_replay_identically() {
    let (a, agent) = busy_level(1);
    let (b, _) = busy_level(1);
    let run = |mut state: State| {
        for action in script() {
            state = step(&state, action, agent).expect("step");
        }
        state
    };
    assert_eq!(run(a), run(b));
}

#[test]
fn turn_increments_by_one_until_terminal() {
    let (mut state, agent) = busy_level(5);
    for action in script() {
        let next = step(&state, action, agent).expect("step");
        if state.is_terminal() {
            assert_eq!(next, state);
        } else {
            assert_eq!(next.turn, state.turn + 1);
        }
        assert!(!(next.win && next.lose));
        state = next;
    }
}

#[test]
fn terminal_snapshots_are_fixed_points() {
    let (mut state, agent) = busy_level(9);
    state.win = true;
    for action in Action::iter() {
        assert_eq!(step(&state, action, agent).expect("no-op"), state);
    }
    state.win = false;
    state.lose = true;
    assert_eq!(step(&state, Action::Up, agent).expect("no-op"), state);
}

#[test]
fn input_snapshot_is_never_modified() {
    let (state, agent) = busy_level(3);
    let copy = state.clone();
    let _ = step(&state, Action::Left, agent).expect("step");
    let _ = step(&state, Action::PickUp, agent).expect("step");
    assert_eq!(state, copy);
    assert!(state.position.shares_storage_with(&copy.position));
}

#[test]
fn untouched_stores_keep_sharing_storage() {
    let (state, agent) = busy_level(3);
    let next = step(&state, Action::Wait, agent).expect("step");
    assert!(next.locked.shares_storage_with(&state.locked));
    assert!(next.exit.shares_storage_with(&state.exit));
}

#[test]
fn wrap_moves_across_every_edge() {
    let mut builder = StateBuilder::new(4, 3).movement("wrap");
    let agent = builder.spawn(Position::new(3, 0), EntitySpec::agent(5));
    let state = builder.build(&Registry::builtin()).expect("valid level");

    let state = step(&state, Action::Right, agent).expect("wrap right");
    assert_eq!(state.position.get(agent), Some(&Position::new(0, 0)));
    let state = step(&state, Action::Left, agent).expect("wrap left");
    assert_eq!(state.position.get(agent), Some(&Position::new(3, 0)));
    let state = step(&state, Action::Up, agent).expect("wrap up");
    assert_eq!(state.position.get(agent), Some(&Position::new(3, 2)));
    let state = step(&state, Action::Down, agent).expect("wrap down");
    assert_eq!(state.position.get(agent), Some(&Position::new(3, 0)));
}

#[test]
fn wrap_without_area_is_reported() {
    let mut state = {
        let mut builder = StateBuilder::new(2, 2).movement("wrap");
        builder.spawn(Position::new(0, 0), EntitySpec::agent(5));
        builder.build(&Registry::builtin()).expect("valid level")
    };
    state.width = 0;
    let err = step_first_agent(&state, Action::Right).expect_err("no dimensions");
    assert!(matches!(err, StepError::Movement { .. }));
}

#[test]
fn time_limited_effect_expires_after_one_step() {
    let mut builder = StateBuilder::new(3, 3);
    let agent = builder.spawn(Position::new(1, 1), EntitySpec::agent(5));
    let ghost = builder.spawn_unplaced(EntitySpec::phasing_effect(Some(EffectLimit::Time(1))));
    builder.apply_effect(agent, ghost);
    let state = builder.build(&Registry::builtin()).expect("valid level");

    let state = step(&state, Action::Wait, agent).expect("wait");
    assert!(!state.status.get(agent).unwrap().effect_ids.contains(&ghost));
    assert!(!state.phasing.contains(ghost));
    assert!(!state.time_limit.contains(ghost));
}

#[test]
fn pickup_on_empty_tile_changes_nothing_but_the_turn() {
    let mut builder = StateBuilder::new(3, 3);
    let agent = builder.spawn(Position::new(1, 1), EntitySpec::agent(5));
    builder.spawn(Position::new(2, 2), EntitySpec::coin(4));
    let state = builder.build(&Registry::builtin()).expect("valid level");

    let next = step(&state, Action::PickUp, agent).expect("pick up nothing");
    assert_eq!(next.score, state.score);
    assert_eq!(next.inventory.get(agent), state.inventory.get(agent));
    assert_eq!(next.turn, 1);
}

#[test]
fn unknown_agent_is_rejected() {
    let (state, _) = busy_level(2);
    assert_eq!(
        step(&state, Action::Wait, EntityId(999)),
        Err(StepError::UnknownEntity(EntityId(999)))
    );
}

#[test]
fn dead_agent_loses_without_advancing() {
    let (mut state, agent) = busy_level(2);
    state.dead.insert(agent, grid_core::state::Dead);
    let next = step(&state, Action::Up, agent).expect("dead step");
    assert!(next.lose);
    assert_eq!(next.turn, state.turn);
}
