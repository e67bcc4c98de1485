//! Named movement and objective strategies.
//!
//! A [`Registry`] is an ordinary value owned by the caller. Binding a pair of
//! names produces [`Mechanics`], which the snapshot carries so that systems
//! never look names up during a turn.

mod moves;
mod objectives;
pub mod rng;

use std::collections::BTreeMap;
use std::fmt;

pub use moves::{MoveFnError, cardinal, gravity, mirror, slippery, windy, wrap};
pub use objectives::{collect, collect_exit, exit, push, unlock};

use crate::action::Direction;
use crate::error::{ErrorSeverity, GameError};
use crate::state::{EntityId, Position, State};

/// Resolves a requested direction into the tiles visited by one sub-move.
pub type MoveFn = fn(&State, EntityId, Direction) -> Result<Vec<Position>, MoveFnError>;

/// Decides whether `agent` has won in the given snapshot.
pub type ObjectiveFn = fn(&State, EntityId) -> bool;

/// How out-of-bounds coordinates are treated by a movement strategy.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Topology {
    /// Tiles outside the grid do not exist.
    #[default]
    Bounded,
    /// Coordinates wrap modulo the grid dimensions.
    Toroidal,
}

#[derive(Clone, Copy)]
struct MovementEntry {
    func: MoveFn,
    topology: Topology,
}

/// Movement strategy bound by name.
#[derive(Clone)]
pub struct Movement {
    name: String,
    func: MoveFn,
    topology: Topology,
}

impl Movement {
    /// Registry key this strategy was bound under.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn topology(&self) -> Topology {
        self.topology
    }

    /// Tiles the entity visits, in order, when moving in `direction`.
    pub fn resolve(
        &self,
        state: &State,
        entity: EntityId,
        direction: Direction,
    ) -> Result<Vec<Position>, MoveFnError> {
        (self.func)(state, entity, direction)
    }
}

/// Objective strategy bound by name.
#[derive(Clone)]
pub struct Objective {
    name: String,
    func: ObjectiveFn,
}

impl Objective {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Evaluates the win condition for `agent`.
    pub fn is_met(&self, state: &State, agent: EntityId) -> bool {
        (self.func)(state, agent)
    }
}

/// Active mechanics of a snapshot.
///
/// Equality compares names and topology only; two snapshots bound from the
/// same registry names are considered to run the same mechanics.
#[derive(Clone)]
pub struct Mechanics {
    /// Resolves the tiles visited by a move action.
    pub movement: Movement,
    /// Decides whether the acting agent has won.
    pub objective: Objective,
}

impl Mechanics {
    pub fn movement_name(&self) -> &str {
        self.movement.name()
    }

    pub fn objective_name(&self) -> &str {
        self.objective.name()
    }

    /// Edge behavior of the bound movement; pushes follow it too.
    pub fn topology(&self) -> Topology {
        self.movement.topology()
    }
}

impl Default for Mechanics {
    fn default() -> Self {
        Self {
            movement: Movement {
                name: "default".to_owned(),
                func: cardinal,
                topology: Topology::Bounded,
            },
            objective: Objective {
                name: "default".to_owned(),
                func: collect_exit,
            },
        }
    }
}

impl PartialEq for Mechanics {
    fn eq(&self, other: &Self) -> bool {
        self.movement.name == other.movement.name
            && self.movement.topology == other.movement.topology
            && self.objective.name == other.objective.name
    }
}

impl Eq for Mechanics {}

impl fmt::Debug for Mechanics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Mechanics")
            .field("movement", &self.movement.name)
            .field("topology", &self.movement.topology)
            .field("objective", &self.objective.name)
            .finish()
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for Mechanics {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeStruct;

        let mut out = serializer.serialize_struct("Mechanics", 2)?;
        out.serialize_field("move_fn", self.movement_name())?;
        out.serialize_field("objective_fn", self.objective_name())?;
        out.end()
    }
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    #[error("unknown movement function '{0}'")]
    UnknownMovement(String),

    #[error("unknown objective function '{0}'")]
    UnknownObjective(String),
}

impl GameError for RegistryError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Fatal
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::UnknownMovement(_) => "REGISTRY_UNKNOWN_MOVEMENT",
            Self::UnknownObjective(_) => "REGISTRY_UNKNOWN_OBJECTIVE",
        }
    }
}

/// Name-keyed tables of movement and objective functions.
#[derive(Clone)]
pub struct Registry {
    movements: BTreeMap<String, MovementEntry>,
    objectives: BTreeMap<String, ObjectiveFn>,
}

impl Registry {
    /// Creates a registry with no strategies at all.
    pub fn empty() -> Self {
        Self {
            movements: BTreeMap::new(),
            objectives: BTreeMap::new(),
        }
    }

    /// Creates a registry holding every built-in strategy.
    pub fn builtin() -> Self {
        let mut registry = Self::empty();
        registry
            .register_movement("default", cardinal, Topology::Bounded)
            .register_movement("cardinal", cardinal, Topology::Bounded)
            .register_movement("wrap", wrap, Topology::Toroidal)
            .register_movement("mirror", mirror, Topology::Bounded)
            .register_movement("slippery", slippery, Topology::Bounded)
            .register_movement("windy", windy, Topology::Bounded)
            .register_movement("gravity", gravity, Topology::Bounded);
        registry
            .register_objective("default", collect_exit)
            .register_objective("exit", exit)
            .register_objective("collect", collect)
            .register_objective("collect_exit", collect_exit)
            .register_objective("unlock", unlock)
            .register_objective("push", push);
        registry
    }

    /// Adds or replaces a movement strategy.
    pub fn register_movement(
        &mut self,
        name: impl Into<String>,
        func: MoveFn,
        topology: Topology,
    ) -> &mut Self {
        self.movements
            .insert(name.into(), MovementEntry { func, topology });
        self
    }

    /// Adds or replaces an objective strategy.
    pub fn register_objective(&mut self, name: impl Into<String>, func: ObjectiveFn) -> &mut Self {
        self.objectives.insert(name.into(), func);
        self
    }

    /// Looks up a movement strategy; unknown names are an error, never a
    /// fallback to the default.
    pub fn movement(&self, name: &str) -> Result<Movement, RegistryError> {
        let entry = self
            .movements
            .get(name)
            .ok_or_else(|| RegistryError::UnknownMovement(name.to_owned()))?;
        Ok(Movement {
            name: name.to_owned(),
            func: entry.func,
            topology: entry.topology,
        })
    }

    /// Looks up an objective strategy by name.
    pub fn objective(&self, name: &str) -> Result<Objective, RegistryError> {
        let func = self
            .objectives
            .get(name)
            .ok_or_else(|| RegistryError::UnknownObjective(name.to_owned()))?;
        Ok(Objective {
            name: name.to_owned(),
            func: *func,
        })
    }

    /// Resolves both names at once.
    pub fn bind(&self, movement: &str, objective: &str) -> Result<Mechanics, RegistryError> {
        Ok(Mechanics {
            movement: self.movement(movement)?,
            objective: self.objective(objective)?,
        })
    }

    /// Registered movement names in sorted order.
    pub fn movement_names(&self) -> impl Iterator<Item = &str> {
        self.movements.keys().map(String::as_str)
    }

    pub fn objective_names(&self) -> impl Iterator<Item = &str> {
        self.objectives.keys().map(String::as_str)
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::builtin()
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("movements", &self.movements.keys().collect::<Vec<_>>())
            .field("objectives", &self.objectives.keys().collect::<Vec<_>>())
            .finish()
    }
}
