//! Contact damage between bodies.
//!
//! A damager hurts a target when, during the current turn, they overlap,
//! swap tiles, share a trail tile, or the target crosses into the damager's
//! starting tile along the damager's path. Stepping onto a tile the damager
//! has just left, with no other contact, is harmless. Each target/damager
//! pair resolves at most once per turn.

use std::collections::BTreeSet;

use crate::state::{Dead, EntityId, Position, State};

use super::status::{is_protective_effect, use_effect};

struct Track {
    now: Position,
    prev: Option<Position>,
    trail: BTreeSet<Position>,
}

impl Track {
    fn of(state: &State, id: EntityId) -> Option<Self> {
        Some(Self {
            now: state.position.get(id).copied()?,
            prev: state.prev_position.get(id).copied(),
            trail: state.trail.tiles_of(id),
        })
    }
}

fn in_contact(target: &Track, damager: &Track) -> bool {
    let overlap = target.now == damager.now;
    let (Some(target_prev), Some(damager_prev)) = (target.prev, damager.prev) else {
        return overlap;
    };
    let swap = target_prev == damager.now && target.now == damager_prev;
    let trails_meet = !target.trail.is_disjoint(&damager.trail);

    let vacated_origin = target.now == damager_prev
        && !swap
        && !damager.trail.contains(&target_prev)
        && !target.trail.contains(&damager.now);
    if !overlap && !trails_meet && vacated_origin {
        return false;
    }

    let endpoint_cross = target.now == damager_prev
        && (damager.trail.contains(&target_prev) || target.trail.contains(&damager_prev));
    overlap || swap || trails_meet || endpoint_cross
}

/// Applies contact damage to every living entity with health.
///
/// Targets and damagers are visited in ascending id order. Immunity or
/// phasing absorbs a hit and spends one use. Lethal contact, or health
/// reaching zero, marks the target dead.
pub fn damage_system(mut state: State) -> State {
    let damagers: BTreeSet<EntityId> = state
        .damage
        .ids()
        .chain(state.lethal_damage.ids())
        .collect();
    let targets: Vec<EntityId> = state.health.ids().collect();

    for target in targets {
        if state.dead.contains(target) {
            continue;
        }
        let Some(target_track) = Track::of(&state, target) else {
            continue;
        };

        for damager in damagers.iter().copied() {
            if damager == target || state.damage_hits.contains(target, damager) {
                continue;
            }
            let Some(damager_track) = Track::of(&state, damager) else {
                continue;
            };
            if !in_contact(&target_track, &damager_track) {
                continue;
            }
            if use_effect(&mut state, target, is_protective_effect).is_some() {
                continue;
            }

            state.damage_hits.record(target, damager);
            if apply_hit(&mut state, target, damager) {
                break;
            }
        }
    }
    state
}

/// Returns true when the hit killed the target.
fn apply_hit(state: &mut State, target: EntityId, damager: EntityId) -> bool {
    let lethal = state.lethal_damage.contains(damager);
    let amount = state.damage.get(damager).map_or(0, |damage| damage.amount);

    let depleted = match state.health.get_mut(target) {
        Some(health) => {
            health.current = if lethal {
                0
            } else {
                health.current.saturating_sub(amount)
            };
            health.is_depleted()
        }
        None => lethal,
    };
    if depleted {
        state.dead.insert(target, Dead);
        tracing::debug!(%target, %damager, lethal, "entity died from contact damage");
    }
    depleted
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{Damage, Health, Immunity, LethalDamage, Status, UsageLimit};
    use crate::strategy::Mechanics;

    const AGENT: EntityId = EntityId(0);
    const MONSTER: EntityId = EntityId(1);

    fn world(agent: (Position, Position), monster: (Position, Position)) -> State {
        let mut state = State::new(5, 5, Mechanics::default());
        state.health.insert(AGENT, Health::full(5));
        state.damage.insert(MONSTER, Damage { amount: 2 });
        for (id, (prev, now)) in [(AGENT, agent), (MONSTER, monster)] {
            state.prev_position.insert(id, prev);
            state.position.insert(id, now);
            if prev != now {
                state.trail.record(now, id);
            }
        }
        state
    }

    fn health(state: &State) -> u32 {
        state.health.get(AGENT).map_or(0, |health| health.current)
    }

    #[test]
    fn overlap_hurts() {
        let p = Position::new(2, 2);
        let state = damage_system(world((Position::new(1, 2), p), (p, p)));
        assert_eq!(health(&state), 3);
        assert!(state.damage_hits.contains(AGENT, MONSTER));
    }

    #[test]
    fn swapping_tiles_hurts() {
        let (a, b) = (Position::new(1, 1), Position::new(2, 1));
        let state = damage_system(world((a, b), (b, a)));
        assert_eq!(health(&state), 3);
    }

    #[test]
    fn stepping_into_vacated_origin_is_harmless() {
        let (a, b, c) = (Position::new(1, 1), Position::new(2, 1), Position::new(3, 1));
        let state = damage_system(world((a, b), (b, c)));
        assert_eq!(health(&state), 5);
        assert!(state.damage_hits.is_empty());
    }

    #[test]
    fn shared_trail_tile_hurts() {
        let mut state = world(
            (Position::new(0, 0), Position::new(2, 0)),
            (Position::new(1, 2), Position::new(1, 1)),
        );
        state.trail.record(Position::new(1, 0), AGENT);
        state.trail.record(Position::new(1, 0), MONSTER);
        let state = damage_system(state);
        assert_eq!(health(&state), 3);
    }

    #[test]
    fn each_pair_hits_once_per_turn() {
        let p = Position::new(2, 2);
        let state = damage_system(world((p, p), (p, p)));
        let state = damage_system(state);
        assert_eq!(health(&state), 3);
    }

    #[test]
    fn lethal_contact_kills_regardless_of_health() {
        let p = Position::new(2, 2);
        let mut state = world((Position::new(2, 1), p), (p, p));
        state.damage.remove(MONSTER);
        state.lethal_damage.insert(MONSTER, LethalDamage);
        let state = damage_system(state);
        assert_eq!(health(&state), 0);
        assert!(state.dead.contains(AGENT));
    }

    #[test]
    fn immunity_absorbs_and_spends_a_use() {
        let p = Position::new(2, 2);
        let mut state = world((Position::new(2, 1), p), (p, p));
        state.immunity.insert(EntityId(9), Immunity);
        state.usage_limit.insert(EntityId(9), UsageLimit { amount: 1 });
        state.status.insert(
            AGENT,
            Status {
                effect_ids: [EntityId(9)].into(),
            },
        );
        let state = damage_system(state);
        assert_eq!(health(&state), 5);
        assert_eq!(state.usage_limit.get(EntityId(9)), Some(&UsageLimit { amount: 0 }));
    }

    #[test]
    fn missing_history_only_counts_overlap() {
        let mut state = State::new(3, 3, Mechanics::default());
        state.health.insert(AGENT, Health::full(5));
        state.damage.insert(MONSTER, Damage { amount: 1 });
        state.position.insert(AGENT, Position::new(1, 1));
        state.position.insert(MONSTER, Position::new(1, 1));
        let state = damage_system(state);
        assert_eq!(health(&state), 4);
    }
}
