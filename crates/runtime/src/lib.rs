//! Session runtime for the grid simulation kernel.
//!
//! This crate drives [`grid_core::step`] on behalf of one agent and handles
//! everything around it that touches the outside world: scenario files,
//! session configuration, action logs and observations.
//!
//! Modules are organized by responsibility:
//! - [`session`] owns the episode loop and replay
//! - [`scenario`] turns RON level documents into initial snapshots
//! - [`observation`] exposes the agent-centric view handed to policies
//! - [`action_log`] and [`fingerprint`] make runs reproducible and checkable
pub mod action_log;
pub mod config;
pub mod error;
pub mod fingerprint;
pub mod observation;
pub mod scenario;
pub mod session;

pub use action_log::{ActionLog, ActionLogEntry};
pub use config::SessionConfig;
pub use error::{Result, RuntimeError};
pub use fingerprint::{fingerprint, short_fingerprint};
pub use observation::{
    AgentView, ConfigView, EffectView, EntityView, ItemKind, ItemView, Observation, StatusView,
};
pub use scenario::{Link, Placement, Scenario};
pub use session::{ActOutcome, Session};
