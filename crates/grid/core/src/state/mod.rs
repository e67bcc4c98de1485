//! World snapshot and component stores.
//!
//! [`State`] is a value: systems take one by value and return its
//! successor. Stores are copy-on-write, so a clone kept by the caller is
//! never affected by the systems that run on another clone.

mod builder;
mod common;
mod components;
mod store;

use std::fmt;

pub use builder::{BuildError, EntitySpec, StateBuilder};
pub use common::{EntityId, Position};
pub use components::{
    Agent, Appearance, Blocking, Collectible, Collidable, Cost, Damage, Dead, EffectKind,
    EffectLimit, Exit, Health, Immunity, Inventory, Key, LethalDamage, Locked, Moving, MovingAxis,
    Pathfinding, PathfindingKind, Phasing, Portal, Pushable, Required, RewardRepeat, Rewardable,
    Speed, Status, TimeLimit, UsageLimit,
};
pub use store::{HitLog, Store, Trail};

use crate::strategy::Mechanics;

/// Outcome classification of a snapshot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::AsRefStr)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case")]
pub enum Phase {
    Ongoing,
    Win,
    Lose,
}

macro_rules! world_state {
    ($($(#[$meta:meta])* $field:ident: $component:ty),* $(,)?) => {
        /// One immutable instant of the simulated world.
        #[derive(Clone, Debug, PartialEq, Eq)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize))]
        pub struct State {
            pub width: u32,
            pub height: u32,
            pub mechanics: Mechanics,

            $($(#[$meta])* pub $field: Store<$component>,)*

            /// Tiles entered during the current turn.
            pub trail: Trail,
            /// Damage pairs already resolved during the current turn.
            pub damage_hits: HitLog,

            pub turn: u64,
            pub score: i64,
            pub turn_limit: Option<u64>,
            pub win: bool,
            pub lose: bool,
            pub message: Option<String>,
            pub seed: Option<u64>,
        }

        impl State {
            /// Creates an empty world of the given size.
            pub fn new(width: u32, height: u32, mechanics: Mechanics) -> Self {
                Self {
                    width,
                    height,
                    mechanics,
                    $($field: Store::new(),)*
                    trail: Trail::default(),
                    damage_hits: HitLog::default(),
                    turn: 0,
                    score: 0,
                    turn_limit: None,
                    win: false,
                    lose: false,
                    message: None,
                    seed: None,
                }
            }

            /// Drops every component of entities rejected by `alive`.
            pub(crate) fn retain_entities(&mut self, alive: impl Fn(EntityId) -> bool) {
                $(self.$field.retain(|id, _| alive(id));)*
            }

            fn store_sizes(&self) -> Vec<(&'static str, usize)> {
                vec![$((stringify!($field), self.$field.len()),)*]
            }
        }
    };
}

world_state! {
    // effects
    immunity: Immunity,
    phasing: Phasing,
    speed: Speed,
    time_limit: TimeLimit,
    usage_limit: UsageLimit,
    // properties
    agent: Agent,
    appearance: Appearance,
    blocking: Blocking,
    collectible: Collectible,
    collidable: Collidable,
    cost: Cost,
    damage: Damage,
    dead: Dead,
    exit: Exit,
    health: Health,
    inventory: Inventory,
    key: Key,
    lethal_damage: LethalDamage,
    locked: Locked,
    moving: Moving,
    pathfinding: Pathfinding,
    portal: Portal,
    position: Position,
    pushable: Pushable,
    required: Required,
    rewardable: Rewardable,
    status: Status,
    /// Positions captured before the current sub-move.
    prev_position: Position,
}

impl State {
    pub fn phase(&self) -> Phase {
        if self.win {
            Phase::Win
        } else if self.lose {
            Phase::Lose
        } else {
            Phase::Ongoing
        }
    }

    /// True once the episode has been won or lost.
    pub fn is_terminal(&self) -> bool {
        self.win || self.lose
    }

    /// Lowest-id entity carrying the agent marker.
    pub fn first_agent(&self) -> Option<EntityId> {
        self.agent.ids().next()
    }

    pub fn in_bounds(&self, position: Position) -> bool {
        position.x >= 0
            && position.y >= 0
            && (position.x as i64) < self.width as i64
            && (position.y as i64) < self.height as i64
    }

    /// Returns the effect kind carried by `effect`, if any.
    pub fn effect_kind(&self, effect: EntityId) -> Option<EffectKind> {
        if self.immunity.contains(effect) {
            Some(EffectKind::Immunity)
        } else if self.phasing.contains(effect) {
            Some(EffectKind::Phasing)
        } else if self.speed.contains(effect) {
            Some(EffectKind::Speed)
        } else {
            None
        }
    }

    /// Returns the budget attached to `effect`, if it is limited.
    pub fn effect_limit(&self, effect: EntityId) -> Option<EffectLimit> {
        if let Some(limit) = self.time_limit.get(effect) {
            Some(EffectLimit::Time(limit.amount))
        } else {
            self.usage_limit
                .get(effect)
                .map(|limit| EffectLimit::Usage(limit.amount))
        }
    }

    /// Compact summary of scalars and non-empty stores.
    pub fn describe(&self) -> Description {
        Description {
            turn: self.turn,
            score: self.score,
            phase: self.phase(),
            movement: self.mechanics.movement_name().to_owned(),
            objective: self.mechanics.objective_name().to_owned(),
            stores: self
                .store_sizes()
                .into_iter()
                .filter(|(_, len)| *len > 0)
                .collect(),
        }
    }
}

/// Result of [`State::describe`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Description {
    pub turn: u64,
    pub score: i64,
    pub phase: Phase,
    pub movement: String,
    pub objective: String,
    /// `(store name, entry count)` for every non-empty store.
    pub stores: Vec<(&'static str, usize)>,
}

impl Description {
    pub fn store_len(&self, name: &str) -> usize {
        self.stores
            .iter()
            .find(|(store, _)| *store == name)
            .map_or(0, |(_, len)| *len)
    }
}

impl fmt::Display for Description {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "turn={} score={} phase={} move={} objective={}",
            self.turn, self.score, self.phase, self.movement, self.objective
        )?;
        for (name, len) in &self.stores {
            write!(f, " {name}={len}")?;
        }
        Ok(())
    }
}
