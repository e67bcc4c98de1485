//! Deterministic tile-grid simulation kernel.
//!
//! `grid-core` holds the entity/component data model, the pure systems that
//! make up one turn, and the named movement and objective strategies that
//! parameterize them. All state transitions flow through [`engine::step`],
//! which derives a new [`State`] from the previous one, an [`Action`] and
//! the acting entity without touching its input.
pub mod action;
pub mod config;
pub mod engine;
pub mod error;
pub mod query;
pub mod state;
pub mod strategy;
pub mod systems;

pub use action::{Action, ActionParseError, Direction};
pub use config::GridConfig;
pub use engine::{StepError, step, step_first_agent};
pub use error::{ErrorSeverity, GameError};
pub use state::{
    BuildError, Description, EffectKind, EffectLimit, EntityId, EntitySpec, Phase, Position,
    State, StateBuilder, Store,
};
pub use strategy::{
    Mechanics, MoveFn, MoveFnError, ObjectiveFn, Registry, RegistryError, Topology,
};
