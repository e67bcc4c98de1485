//! Effect selection, timers and status cleanup.

use std::collections::BTreeSet;

use crate::state::{EntityId, State};

/// True when `effect` has budget left (or carries no limit).
pub fn is_effect_active(state: &State, effect: EntityId) -> bool {
    let timed_out = state
        .time_limit
        .get(effect)
        .is_some_and(|limit| limit.amount == 0);
    let used_up = state
        .usage_limit
        .get(effect)
        .is_some_and(|limit| limit.amount == 0);
    !timed_out && !used_up
}

/// Picks the effect on `holder` that `matches` would apply.
///
/// Only active effects qualify. Effects without a usage limit win over
/// usage-limited ones so that free protection is spent first; ties go to
/// the lowest id.
pub fn select_effect(
    state: &State,
    holder: EntityId,
    matches: impl Fn(&State, EntityId) -> bool,
) -> Option<EntityId> {
    let status = state.status.get(holder)?;
    let mut candidates = status
        .effect_ids
        .iter()
        .copied()
        .filter(|effect| matches(state, *effect) && is_effect_active(state, *effect));

    let first = candidates.next()?;
    if !state.usage_limit.contains(first) {
        return Some(first);
    }
    Some(
        candidates
            .find(|effect| !state.usage_limit.contains(*effect))
            .unwrap_or(first),
    )
}

/// Spends one use of `effect` when it is usage-limited.
pub fn consume_use(state: &mut State, effect: EntityId) {
    if let Some(limit) = state.usage_limit.get_mut(effect) {
        limit.amount = limit.amount.saturating_sub(1);
    }
}

/// Selects an effect and spends one use of it.
pub fn use_effect(
    state: &mut State,
    holder: EntityId,
    matches: impl Fn(&State, EntityId) -> bool,
) -> Option<EntityId> {
    let effect = select_effect(state, holder, matches)?;
    consume_use(state, effect);
    Some(effect)
}

/// True when `effect` lets its holder pass blockers.
pub fn is_phasing_effect(state: &State, effect: EntityId) -> bool {
    state.phasing.contains(effect)
}

/// True when `effect` can absorb a damage hit (immunity or phasing).
pub fn is_protective_effect(state: &State, effect: EntityId) -> bool {
    state.immunity.contains(effect) || state.phasing.contains(effect)
}

/// True when `holder` has a phasing effect with budget left. Checking does
/// not spend a use.
pub fn has_active_phasing(state: &State, holder: EntityId) -> bool {
    select_effect(state, holder, is_phasing_effect).is_some()
}

/// Number of sub-moves for one action, spending a speed use if present.
pub fn take_speed_multiplier(state: &mut State, holder: EntityId) -> u32 {
    let Some(effect) = use_effect(state, holder, |state, effect| state.speed.contains(effect))
    else {
        return 1;
    };
    state
        .speed
        .get(effect)
        .map_or(1, |speed| speed.multiplier.max(1))
}

/// Counts down every time-limited effect held in a status.
pub fn status_tick_system(mut state: State) -> State {
    let held: BTreeSet<EntityId> = state
        .status
        .iter()
        .flat_map(|(_, status)| status.effect_ids.iter().copied())
        .filter(|effect| state.time_limit.contains(*effect))
        .collect();

    for effect in held {
        if let Some(limit) = state.time_limit.get_mut(effect) {
            limit.amount = limit.amount.saturating_sub(1);
        }
    }
    state
}

/// Drops expired or non-effect ids from every status.
pub fn status_gc_system(mut state: State) -> State {
    let holders: Vec<EntityId> = state
        .status
        .iter()
        .filter(|(_, status)| {
            status
                .effect_ids
                .iter()
                .any(|effect| !is_live_effect(&state, *effect))
        })
        .map(|(holder, _)| holder)
        .collect();

    for holder in holders {
        let live: BTreeSet<EntityId> = match state.status.get(holder) {
            Some(status) => status
                .effect_ids
                .iter()
                .copied()
                .filter(|effect| is_live_effect(&state, *effect))
                .collect(),
            None => continue,
        };
        if let Some(status) = state.status.get_mut(holder) {
            status.effect_ids = live;
        }
    }
    state
}

fn is_live_effect(state: &State, effect: EntityId) -> bool {
    state.effect_kind(effect).is_some() && is_effect_active(state, effect)
}
