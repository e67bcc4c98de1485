//! Scenario documents for level setup.
//!
//! A scenario names the grid size, the movement and objective strategies and
//! lists the entities to spawn. Entity ids follow list order, so links
//! (inventory items, applied effects, portal pairs) refer to entities by
//! their index in `entities`:
//!
//! ```ron
//! (
//!     width: 3,
//!     height: 1,
//!     objective_fn: "exit",
//!     entities: [
//!         (position: Some((x: 0, y: 0)), spec: (agent: true, collidable: true)),
//!         (position: Some((x: 2, y: 0)), spec: (exit: true)),
//!     ],
//! )
//! ```

use std::path::Path;

use grid_core::{EntityId, EntitySpec, Position, Registry, State, StateBuilder};
use serde::{Deserialize, Serialize};

use crate::error::{Result, RuntimeError};

/// One entity to spawn. Entities without a position are effects or items
/// that only exist inside a status or an inventory.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Placement {
    #[serde(default)]
    pub position: Option<Position>,
    #[serde(default)]
    pub spec: EntitySpec,
}

/// Relation between two spawned entities.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Link {
    Give { holder: EntityId, item: EntityId },
    Effect { holder: EntityId, effect: EntityId },
    Portals(EntityId, EntityId),
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scenario {
    pub width: u32,
    pub height: u32,
    #[serde(default = "default_strategy")]
    pub move_fn: String,
    #[serde(default = "default_strategy")]
    pub objective_fn: String,
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(default)]
    pub turn_limit: Option<u64>,
    #[serde(default)]
    pub message: Option<String>,
    pub entities: Vec<Placement>,
    #[serde(default)]
    pub links: Vec<Link>,
}

fn default_strategy() -> String {
    "default".to_owned()
}

impl Scenario {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            move_fn: default_strategy(),
            objective_fn: default_strategy(),
            seed: None,
            turn_limit: None,
            message: None,
            entities: Vec::new(),
            links: Vec::new(),
        }
    }

    /// Appends an entity and returns the id it will receive.
    pub fn place(&mut self, position: Option<Position>, spec: EntitySpec) -> EntityId {
        self.entities.push(Placement { position, spec });
        EntityId(self.entities.len() as u32 - 1)
    }

    pub fn from_ron_str(source: &str) -> Result<Self> {
        ron::from_str(source)
            .map_err(|e| RuntimeError::InvalidConfig(format!("failed to parse scenario: {}", e)))
    }

    pub fn load_from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|source| RuntimeError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_ron_str(&contents)
    }

    pub fn to_ron_string(&self) -> Result<String> {
        ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
            .map_err(|source| RuntimeError::Ron {
                what: "scenario",
                source,
            })
    }

    /// Builds the initial snapshot, resolving strategy names in `registry`.
    pub fn build(&self, registry: &Registry) -> Result<State> {
        tracing::info!(
            width = self.width,
            height = self.height,
            move_fn = %self.move_fn,
            objective_fn = %self.objective_fn,
            entities = self.entities.len(),
            "building state from scenario"
        );

        let mut builder = StateBuilder::new(self.width, self.height)
            .movement(self.move_fn.as_str())
            .objective(self.objective_fn.as_str());
        if let Some(seed) = self.seed {
            builder = builder.seed(seed);
        }
        if let Some(turns) = self.turn_limit {
            builder = builder.turn_limit(turns);
        }
        if let Some(message) = &self.message {
            builder = builder.message(message.as_str());
        }

        for placement in &self.entities {
            match placement.position {
                Some(position) => builder.spawn(position, placement.spec.clone()),
                None => builder.spawn_unplaced(placement.spec.clone()),
            };
        }

        for link in &self.links {
            self.check_link(link)?;
            match *link {
                Link::Give { holder, item } => builder.give(holder, item),
                Link::Effect { holder, effect } => builder.apply_effect(holder, effect),
                Link::Portals(a, b) => builder.pair_portals(a, b),
            };
        }

        Ok(builder.build(registry)?)
    }

    fn check_link(&self, link: &Link) -> Result<()> {
        let (a, b) = match *link {
            Link::Give { holder, item } => (holder, item),
            Link::Effect { holder, effect } => (holder, effect),
            Link::Portals(a, b) => (a, b),
        };
        let count = self.entities.len();
        match [a, b].into_iter().find(|id| id.0 as usize >= count) {
            Some(missing) => Err(RuntimeError::InvalidConfig(format!(
                "link {:?} references {} but the scenario lists {} entities",
                link, missing, count
            ))),
            None => Ok(()),
        }
    }
}
