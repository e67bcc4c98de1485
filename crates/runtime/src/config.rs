//! Session configuration.
//!
//! Loaded from RON; every field has a default so an empty document `()` is
//! a valid configuration.
use std::path::Path;

use grid_core::EntityId;
use serde::{Deserialize, Serialize};

use crate::error::{Result, RuntimeError};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SessionConfig {
    /// Entity driven by [`Session::act`](crate::Session::act). `None` picks
    /// the lowest agent id of the initial snapshot.
    pub agent: Option<EntityId>,

    /// Keep every snapshot produced by the session.
    pub record_history: bool,

    /// Fingerprint the snapshot after each step.
    pub fingerprint_every_step: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            agent: None,
            record_history: false,
            fingerprint_every_step: true,
        }
    }
}

impl SessionConfig {
    pub fn with_agent(mut self, agent: EntityId) -> Self {
        self.agent = Some(agent);
        self
    }

    pub fn from_ron_str(source: &str) -> Result<Self> {
        ron::from_str(source)
            .map_err(|e| RuntimeError::InvalidConfig(format!("session config: {}", e)))
    }

    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|source| RuntimeError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_ron_str(&contents)
    }
}
