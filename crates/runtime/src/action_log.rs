//! Append-only record of the actions a session executed.
//!
//! Entries are stored in execution order. Persisted logs are a bincode
//! encoding of [`ActionLog`]; loading one and replaying it against the same
//! initial snapshot reproduces the run exactly.
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use grid_core::{Action, EntityId};
use serde::{Deserialize, Serialize};

use crate::error::{Result, RuntimeError};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionLogEntry {
    /// Turn counter of the snapshot the action was applied to.
    pub turn: u64,
    pub action: Action,
    /// Score delta produced by the action.
    pub reward: i64,
    /// Fingerprint of the resulting snapshot, when the session records them.
    pub fingerprint: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionLog {
    /// Entity that performed every action; `None` means the lowest agent id.
    agent: Option<EntityId>,
    entries: Vec<ActionLogEntry>,
}

impl ActionLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Empty log for actions performed by `agent`.
    pub fn for_agent(agent: EntityId) -> Self {
        Self {
            agent: Some(agent),
            entries: Vec::new(),
        }
    }

    /// Entity the logged actions were applied to.
    pub fn agent(&self) -> Option<EntityId> {
        self.agent
    }

    pub fn push(&mut self, entry: ActionLogEntry) {
        self.entries.push(entry);
    }

    pub fn entries(&self) -> &[ActionLogEntry] {
        &self.entries
    }

    pub fn actions(&self) -> Vec<Action> {
        self.entries.iter().map(|entry| entry.action).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drops all entries; the acting agent is kept.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Sum of all rewards, equal to the final score minus the initial one.
    pub fn total_reward(&self) -> i64 {
        self.entries.iter().map(|entry| entry.reward).sum()
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let file = File::create(path).map_err(|source| io_error(path, source))?;
        bincode::serialize_into(BufWriter::new(file), self).map_err(|source| {
            RuntimeError::Bincode {
                what: "action log",
                source,
            }
        })
    }

    pub fn load(path: &Path) -> Result<Self> {
        let file = File::open(path).map_err(|source| io_error(path, source))?;
        bincode::deserialize_from(BufReader::new(file)).map_err(|source| RuntimeError::Bincode {
            what: "action log",
            source,
        })
    }
}

fn io_error(path: &Path, source: std::io::Error) -> RuntimeError {
    RuntimeError::Io {
        path: path.display().to_string(),
        source,
    }
}
