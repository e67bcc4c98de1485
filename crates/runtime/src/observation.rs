//! Structured, serializable view of a snapshot from one agent's seat.
//!
//! Observations carry what a decision maker needs between turns: the
//! agent's health, active effects and inventory, the episode status and the
//! static configuration of the level. They serialize to JSON for consumers
//! outside the process.
use grid_core::{EffectKind, EffectLimit, EntityId, Phase, Position, State};
use serde::{Deserialize, Serialize};

use crate::error::{Result, RuntimeError};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Observation {
    pub agent: AgentView,
    pub status: StatusView,
    pub config: ConfigView,
    /// Every entity on the grid, in ascending id order.
    pub entities: Vec<EntityView>,
    pub message: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityView {
    pub id: EntityId,
    pub position: Position,
    pub appearance: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentView {
    pub id: EntityId,
    /// `None` when the agent has no health component.
    pub health: Option<u32>,
    pub max_health: Option<u32>,
    pub effects: Vec<EffectView>,
    pub inventory: Vec<ItemView>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EffectView {
    pub id: EntityId,
    pub kind: Option<EffectKind>,
    pub limit: Option<EffectLimit>,
    /// Step multiplier, speed effects only.
    pub multiplier: Option<u32>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemKind {
    Key,
    Core,
    Coin,
    Item,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemView {
    pub id: EntityId,
    pub kind: ItemKind,
    pub key_id: Option<String>,
    pub appearance: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusView {
    pub score: i64,
    pub phase: Phase,
    pub turn: u64,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigView {
    pub move_fn: String,
    pub objective_fn: String,
    pub seed: Option<u64>,
    pub width: u32,
    pub height: u32,
    pub turn_limit: Option<u64>,
}

impl Observation {
    /// Builds the observation of `agent` in `state`.
    ///
    /// Works for agents that were removed from the grid too; their effects
    /// and inventory are read from whatever stores still hold them.
    pub fn capture(state: &State, agent: EntityId) -> Self {
        let health = state.health.get(agent);
        let effects = state
            .status
            .get(agent)
            .map(|status| {
                status
                    .effect_ids
                    .iter()
                    .map(|&effect| effect_view(state, effect))
                    .collect()
            })
            .unwrap_or_default();
        let inventory = state
            .inventory
            .get(agent)
            .map(|inventory| {
                inventory
                    .items
                    .iter()
                    .map(|&item| item_view(state, item))
                    .collect()
            })
            .unwrap_or_default();

        Self {
            agent: AgentView {
                id: agent,
                health: health.map(|h| h.current),
                max_health: health.map(|h| h.max),
                effects,
                inventory,
            },
            status: StatusView {
                score: state.score,
                phase: state.phase(),
                turn: state.turn,
            },
            config: ConfigView {
                move_fn: state.mechanics.movement_name().to_owned(),
                objective_fn: state.mechanics.objective_name().to_owned(),
                seed: state.seed,
                width: state.width,
                height: state.height,
                turn_limit: state.turn_limit,
            },
            entities: state
                .position
                .iter()
                .map(|(id, &position)| EntityView {
                    id,
                    position,
                    appearance: state.appearance.get(id).map(|a| a.name.clone()),
                })
                .collect(),
            message: state.message.clone(),
        }
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self).map_err(|source| RuntimeError::Json {
            what: "observation",
            source,
        })
    }
}

fn effect_view(state: &State, effect: EntityId) -> EffectView {
    let kind = state.effect_kind(effect);
    EffectView {
        id: effect,
        kind,
        limit: state.effect_limit(effect),
        multiplier: match kind {
            Some(EffectKind::Speed) => state.speed.get(effect).map(|speed| speed.multiplier),
            _ => None,
        },
    }
}

fn item_view(state: &State, item: EntityId) -> ItemView {
    let key = state.key.get(item);
    let kind = if key.is_some() {
        ItemKind::Key
    } else if state.required.contains(item) {
        ItemKind::Core
    } else if state.rewardable.contains(item) {
        ItemKind::Coin
    } else {
        ItemKind::Item
    };
    ItemView {
        id: item,
        kind,
        key_id: key.map(|key| key.key_id.clone()),
        appearance: state
            .appearance
            .get(item)
            .map(|appearance| appearance.name.clone()),
    }
}

#[cfg(test)]
mod tests {
    use grid_core::{Action, EffectLimit, EntitySpec, Position, Registry, StateBuilder, step};

    use super::*;

    #[test]
    fn inventory_items_are_classified() {
        let mut builder = StateBuilder::new(3, 1).seed(9).turn_limit(20);
        let agent = builder.spawn(Position::new(0, 0), EntitySpec::agent(4));
        let key = builder.spawn_unplaced(EntitySpec::key("red"));
        let core = builder.spawn_unplaced(EntitySpec::core(1));
        let coin = builder.spawn_unplaced(EntitySpec::coin(2));
        builder.give(agent, key).give(agent, core).give(agent, coin);
        let state = builder.build(&Registry::builtin()).expect("level should build");

        let observation = Observation::capture(&state, agent);
        let kinds: Vec<_> = observation.agent.inventory.iter().map(|i| i.kind).collect();
        assert_eq!(kinds, vec![ItemKind::Key, ItemKind::Core, ItemKind::Coin]);
        assert_eq!(
            observation.agent.inventory[0].key_id.as_deref(),
            Some("red")
        );
        assert_eq!(observation.config.seed, Some(9));
        assert_eq!(observation.config.turn_limit, Some(20));
        assert_eq!(observation.config.move_fn, "default");
        assert_eq!(observation.agent.health, Some(4));
    }

    #[test]
    fn effects_report_kind_and_limit() {
        let mut builder = StateBuilder::new(3, 1);
        let agent = builder.spawn(Position::new(0, 0), EntitySpec::agent(4));
        let speed = builder.spawn_unplaced(EntitySpec::speed_effect(2, Some(EffectLimit::Time(3))));
        builder.apply_effect(agent, speed);
        let state = builder.build(&Registry::builtin()).expect("level should build");

        let effects = Observation::capture(&state, agent).agent.effects;
        assert_eq!(
            effects,
            vec![EffectView {
                id: speed,
                kind: Some(EffectKind::Speed),
                limit: Some(EffectLimit::Time(3)),
                multiplier: Some(2),
            }]
        );
    }

    #[test]
    fn json_carries_phase_and_score() {
        let mut builder = StateBuilder::new(2, 1).objective("exit");
        let agent = builder.spawn(Position::new(0, 0), EntitySpec::agent(4));
        builder.spawn(Position::new(1, 0), EntitySpec::exit());
        let state = builder.build(&Registry::builtin()).expect("level should build");
        let next = step(&state, Action::Right, agent).expect("step should succeed");

        let json = Observation::capture(&next, agent)
            .to_json()
            .expect("observation should encode");
        let value: serde_json::Value = serde_json::from_str(&json).expect("valid json");
        assert_eq!(value["status"]["phase"], "win");
        assert_eq!(value["status"]["turn"], 1);
        assert_eq!(value["message"], serde_json::Value::Null);
        assert_eq!(value["entities"][0]["position"]["x"], 1);
        assert_eq!(value["entities"][0]["appearance"], "human");
    }
}
