//! Component value types.
//!
//! Marker components are unit structs; an entity has the capability exactly
//! when its id is present in the matching store.

use std::collections::BTreeSet;

use super::EntityId;

macro_rules! marker {
    ($($(#[$meta:meta])* $name:ident),* $(,)?) => {
        $(
            $(#[$meta])*
            #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
            #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
            pub struct $name;
        )*
    };
}

marker!(
    /// Controlled by an external decision maker.
    Agent,
    /// Stops movement into its tile.
    Blocking,
    /// Participates in portal and damage interactions as a body.
    Collidable,
    /// Can be picked up with `PICK_UP`.
    Collectible,
    /// Lethal contact or depleted health.
    Dead,
    /// Goal tile for exit-style objectives.
    Exit,
    /// Collecting this item is part of the objective.
    Required,
    /// Can be shoved one tile by a mover.
    Pushable,
    /// Usage of this effect shields from damage.
    Immunity,
    /// Lets the holder pass blocking tiles and ignore damage.
    Phasing,
    /// Any contact kills the entity touched.
    LethalDamage,
);

/// Visual hint consumed by renderers and observations.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Appearance {
    pub name: String,
    pub priority: i32,
}

impl Appearance {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            priority: 0,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Health {
    pub current: u32,
    pub max: u32,
}

impl Health {
    pub const fn full(max: u32) -> Self {
        Self { current: max, max }
    }

    pub const fn is_depleted(&self) -> bool {
        self.current == 0
    }
}

/// Damage dealt on contact.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Damage {
    pub amount: u32,
}

/// Score subtracted each turn the agent ends on this tile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Cost {
    pub amount: i64,
}

/// Whether a reward keeps paying on every visit.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, strum::Display, strum::EnumString,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum RewardRepeat {
    #[default]
    Always,
    Once,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Rewardable {
    pub amount: i64,
    pub repeat: RewardRepeat,
}

impl Rewardable {
    pub const fn new(amount: i64) -> Self {
        Self {
            amount,
            repeat: RewardRepeat::Always,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Key {
    pub key_id: String,
}

/// Door state. An empty `key_id` accepts any key.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Locked {
    pub key_id: String,
}

impl Locked {
    pub fn accepts(&self, key: &Key) -> bool {
        self.key_id.is_empty() || self.key_id == key.key_id
    }
}

/// Items carried by an entity, in ascending id order.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Inventory {
    pub items: BTreeSet<EntityId>,
}

/// Effects currently applied to an entity.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Status {
    pub effect_ids: BTreeSet<EntityId>,
}

/// Paired teleport endpoint.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Portal {
    pub pair: EntityId,
}

/// Multiplies the number of sub-moves per action.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Speed {
    pub multiplier: u32,
}

/// Remaining turns before an effect expires.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TimeLimit {
    pub amount: u32,
}

/// Remaining activations before an effect expires.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UsageLimit {
    pub amount: u32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::EnumString)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum MovingAxis {
    Horizontal,
    Vertical,
}

/// Autonomous patrol along one axis.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Moving {
    pub axis: MovingAxis,
    /// `true` moves toward increasing coordinates.
    pub forward: bool,
    pub bounce: bool,
    pub speed: u32,
}

impl Moving {
    pub const fn new(axis: MovingAxis, forward: bool) -> Self {
        Self {
            axis,
            forward,
            bounce: true,
            speed: 1,
        }
    }

    /// Unit step for the current heading.
    pub const fn delta(&self) -> (i32, i32) {
        let sign = if self.forward { 1 } else { -1 };
        match self.axis {
            MovingAxis::Horizontal => (sign, 0),
            MovingAxis::Vertical => (0, sign),
        }
    }

    pub const fn reversed(self) -> Self {
        Self {
            forward: !self.forward,
            ..self
        }
    }
}

#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, strum::Display, strum::EnumString,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum PathfindingKind {
    /// Shortest path by breadth-first search.
    #[default]
    Path,
    /// Greedy step along the dominant direction.
    StraightLine,
}

/// Chases `target` every turn.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Pathfinding {
    pub target: EntityId,
    pub kind: PathfindingKind,
}

/// Effect families an entity in a status set may carry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::AsRefStr)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum EffectKind {
    Immunity,
    Phasing,
    Speed,
}

/// How an effect's budget is tracked.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EffectLimit {
    Time(u32),
    Usage(u32),
}
