//! Chasers that step toward a target entity each turn.

use std::collections::{BTreeMap, BTreeSet, VecDeque};

use crate::action::Direction;
use crate::config::GridConfig;
use crate::query::{BlockingRules, is_blocked_at};
use crate::state::{EntityId, Pathfinding, PathfindingKind, Position, State};

use super::status::has_active_phasing;

/// Moves every chaser one tile toward its target, in ascending id order.
///
/// A phasing target cannot be tracked, and a chaser never enters a blocked
/// or out-of-bounds tile.
pub fn pathfinding_system(mut state: State) -> State {
    let chasers: Vec<(EntityId, Pathfinding)> = state
        .pathfinding
        .iter()
        .map(|(id, pathfinding)| (id, *pathfinding))
        .collect();

    for (id, pathfinding) in chasers {
        let (Some(from), Some(goal)) = (
            state.position.get(id).copied(),
            state.position.get(pathfinding.target).copied(),
        ) else {
            continue;
        };
        if from == goal || has_active_phasing(&state, pathfinding.target) {
            continue;
        }

        let next = match pathfinding.kind {
            PathfindingKind::Path => shortest_path_step(&state, from, goal),
            PathfindingKind::StraightLine => Some(straight_line_step(from, goal)),
        };
        let Some(next) = next else { continue };
        if state.in_bounds(next) && !is_blocked_at(&state, next, BlockingRules::MOVEMENT) {
            state.position.insert(id, next);
            state.trail.record(next, id);
        }
    }
    state
}

/// First tile of a shortest path from `from` to `goal`.
///
/// Breadth-first search expanding neighbours in UP, DOWN, LEFT, RIGHT order;
/// the first path to reach the goal wins ties.
pub fn shortest_path_step(state: &State, from: Position, goal: Position) -> Option<Position> {
    let obstacles: BTreeSet<Position> = state
        .position
        .iter()
        .filter(|(id, _)| state.blocking.contains(*id) || state.pushable.contains(*id))
        .map(|(_, at)| *at)
        .collect();

    let mut parents: BTreeMap<Position, Position> = BTreeMap::new();
    let mut queue = VecDeque::from([from]);
    let mut explored = 0usize;

    while let Some(current) = queue.pop_front() {
        if current == goal {
            return first_step(&parents, from, goal);
        }
        explored += 1;
        if explored > GridConfig::MAX_PATH_SEARCH_NODES {
            break;
        }
        for direction in Direction::ALL {
            let next = direction.step(current);
            if next == from
                || parents.contains_key(&next)
                || !state.in_bounds(next)
                || (next != goal && obstacles.contains(&next))
            {
                continue;
            }
            parents.insert(next, current);
            queue.push_back(next);
        }
    }
    None
}

fn first_step(
    parents: &BTreeMap<Position, Position>,
    from: Position,
    goal: Position,
) -> Option<Position> {
    let mut step = goal;
    while let Some(parent) = parents.get(&step).copied() {
        if parent == from {
            return Some(step);
        }
        step = parent;
    }
    None
}

/// Adjacent tile whose direction best matches the vector toward `goal`.
pub fn straight_line_step(from: Position, goal: Position) -> Position {
    let (gx, gy) = (goal.x - from.x, goal.y - from.y);
    let mut best = Direction::ALL[0];
    let mut best_score = i64::MIN;
    for direction in Direction::ALL {
        let (dx, dy) = direction.delta();
        let score = dx as i64 * gx as i64 + dy as i64 * gy as i64;
        if score > best_score {
            best = direction;
            best_score = score;
        }
    }
    best.step(from)
}
