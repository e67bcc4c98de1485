//! Validated construction of initial snapshots.
//!
//! Producers describe entities with [`EntitySpec`] values; [`StateBuilder`]
//! allocates ids in insertion order, resolves strategy names against a
//! [`Registry`] and rejects structurally invalid worlds before the first
//! turn is ever taken.

use std::collections::BTreeSet;

use crate::error::{ErrorSeverity, GameError};
use crate::strategy::{Registry, RegistryError};

use super::{
    Agent, Appearance, Blocking, Collectible, Collidable, Cost, Damage, EffectLimit, EntityId,
    Exit, Health, Immunity, Inventory, Key, LethalDamage, Locked, Moving, Pathfinding, Phasing,
    Portal, Position, Pushable, Required, Rewardable, Speed, State, Status, TimeLimit, UsageLimit,
};

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum BuildError {
    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error("entity {entity} placed at {position} outside a {width}x{height} grid")]
    OutOfBounds {
        entity: EntityId,
        position: Position,
        width: u32,
        height: u32,
    },

    #[error("entity {entity} references {target}, which does not exist")]
    DanglingReference { entity: EntityId, target: EntityId },

    #[error("entity {entity} is not an effect but is listed in a status")]
    NotAnEffect { entity: EntityId },
}

impl GameError for BuildError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::Registry(inner) => inner.severity(),
            Self::OutOfBounds { .. } | Self::DanglingReference { .. } | Self::NotAnEffect { .. } => {
                ErrorSeverity::Validation
            }
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::Registry(inner) => inner.error_code(),
            Self::OutOfBounds { .. } => "BUILD_OUT_OF_BOUNDS",
            Self::DanglingReference { .. } => "BUILD_DANGLING_REFERENCE",
            Self::NotAnEffect { .. } => "BUILD_NOT_AN_EFFECT",
        }
    }
}

/// Components of one entity before it is placed in a snapshot.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct EntitySpec {
    pub agent: bool,
    pub appearance: Option<Appearance>,
    pub blocking: bool,
    pub collectible: bool,
    pub collidable: bool,
    pub cost: Option<Cost>,
    pub damage: Option<Damage>,
    pub exit: bool,
    pub health: Option<Health>,
    pub inventory: Option<Inventory>,
    pub key: Option<Key>,
    pub lethal_damage: bool,
    pub locked: Option<Locked>,
    pub moving: Option<Moving>,
    pub pathfinding: Option<Pathfinding>,
    pub portal: Option<Portal>,
    pub pushable: bool,
    pub required: bool,
    pub rewardable: Option<Rewardable>,
    pub status: Option<Status>,
    pub immunity: bool,
    pub phasing: bool,
    pub speed: Option<Speed>,
    pub limit: Option<EffectLimit>,
}

impl EntitySpec {
    pub fn new() -> Self {
        Self::default()
    }

    /// Player-controlled body with empty inventory and status.
    pub fn agent(health: u32) -> Self {
        Self {
            agent: true,
            collidable: true,
            health: Some(Health::full(health)),
            inventory: Some(Inventory::default()),
            status: Some(Status::default()),
            appearance: Some(Appearance::new("human")),
            ..Self::default()
        }
    }

    pub fn wall() -> Self {
        Self {
            blocking: true,
            appearance: Some(Appearance::new("wall")),
            ..Self::default()
        }
    }

    /// Floor tile charging `cost` per turn spent on it.
    pub fn floor(cost: i64) -> Self {
        Self {
            cost: Some(Cost { amount: cost }),
            appearance: Some(Appearance::new("floor")),
            ..Self::default()
        }
    }

    pub fn exit() -> Self {
        Self {
            exit: true,
            appearance: Some(Appearance::new("exit")),
            ..Self::default()
        }
    }

    pub fn coin(amount: i64) -> Self {
        Self {
            collectible: true,
            rewardable: Some(Rewardable::new(amount)),
            appearance: Some(Appearance::new("coin")),
            ..Self::default()
        }
    }

    /// Collectible that the collect objectives wait for.
    pub fn core(amount: i64) -> Self {
        Self {
            required: true,
            appearance: Some(Appearance::new("core")),
            ..Self::coin(amount)
        }
    }

    pub fn key(key_id: impl Into<String>) -> Self {
        Self {
            collectible: true,
            key: Some(Key {
                key_id: key_id.into(),
            }),
            appearance: Some(Appearance::new("key")),
            ..Self::default()
        }
    }

    pub fn door(key_id: impl Into<String>) -> Self {
        Self {
            blocking: true,
            locked: Some(Locked {
                key_id: key_id.into(),
            }),
            appearance: Some(Appearance::new("door")),
            ..Self::default()
        }
    }

    pub fn boulder() -> Self {
        Self {
            pushable: true,
            collidable: true,
            appearance: Some(Appearance::new("box")),
            ..Self::default()
        }
    }

    pub fn monster(damage: u32) -> Self {
        Self {
            collidable: true,
            damage: Some(Damage { amount: damage }),
            appearance: Some(Appearance::new("monster")),
            ..Self::default()
        }
    }

    pub fn lava() -> Self {
        Self {
            lethal_damage: true,
            appearance: Some(Appearance::new("lava")),
            ..Self::default()
        }
    }

    /// Portal endpoint; pair it with [`StateBuilder::pair_portals`].
    pub fn portal() -> Self {
        Self {
            appearance: Some(Appearance::new("portal")),
            ..Self::default()
        }
    }

    pub fn immunity_effect(limit: Option<EffectLimit>) -> Self {
        Self {
            immunity: true,
            limit,
            appearance: Some(Appearance::new("shield")),
            ..Self::default()
        }
    }

    pub fn phasing_effect(limit: Option<EffectLimit>) -> Self {
        Self {
            phasing: true,
            limit,
            appearance: Some(Appearance::new("ghost")),
            ..Self::default()
        }
    }

    pub fn speed_effect(multiplier: u32, limit: Option<EffectLimit>) -> Self {
        Self {
            speed: Some(Speed { multiplier }),
            limit,
            appearance: Some(Appearance::new("boots")),
            ..Self::default()
        }
    }

    /// Turns an effect spec into a pickup lying on the grid.
    pub fn collectible(mut self) -> Self {
        self.collectible = true;
        self
    }

    pub fn with_moving(mut self, moving: Moving) -> Self {
        self.moving = Some(moving);
        self
    }

    pub fn with_pathfinding(mut self, pathfinding: Pathfinding) -> Self {
        self.pathfinding = Some(pathfinding);
        self
    }

    pub fn with_health(mut self, health: u32) -> Self {
        self.health = Some(Health::full(health));
        self
    }

    pub fn with_rewardable(mut self, rewardable: Rewardable) -> Self {
        self.rewardable = Some(rewardable);
        self
    }

    pub fn is_effect(&self) -> bool {
        self.immunity || self.phasing || self.speed.is_some()
    }
}

struct Placement {
    id: EntityId,
    position: Option<Position>,
    spec: EntitySpec,
}

/// Assembles and validates an initial [`State`].
pub struct StateBuilder {
    width: u32,
    height: u32,
    movement: String,
    objective: String,
    seed: Option<u64>,
    turn_limit: Option<u64>,
    message: Option<String>,
    next_id: EntityId,
    placements: Vec<Placement>,
}

impl StateBuilder {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            movement: "default".to_owned(),
            objective: "default".to_owned(),
            seed: None,
            turn_limit: None,
            message: None,
            next_id: EntityId(0),
            placements: Vec::new(),
        }
    }

    pub fn movement(mut self, name: impl Into<String>) -> Self {
        self.movement = name.into();
        self
    }

    pub fn objective(mut self, name: impl Into<String>) -> Self {
        self.objective = name.into();
        self
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn turn_limit(mut self, turns: u64) -> Self {
        self.turn_limit = Some(turns);
        self
    }

    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Places an entity on the grid and returns its id.
    pub fn spawn(&mut self, position: Position, spec: EntitySpec) -> EntityId {
        self.push(Some(position), spec)
    }

    /// Adds an entity that lives off-grid (a carried item or an effect).
    pub fn spawn_unplaced(&mut self, spec: EntitySpec) -> EntityId {
        self.push(None, spec)
    }

    fn push(&mut self, position: Option<Position>, spec: EntitySpec) -> EntityId {
        let id = self.next_id;
        self.next_id = id.next();
        self.placements.push(Placement { id, position, spec });
        id
    }

    fn spec_mut(&mut self, id: EntityId) -> Option<&mut EntitySpec> {
        self.placements
            .iter_mut()
            .find(|placement| placement.id == id)
            .map(|placement| &mut placement.spec)
    }

    /// Puts `item` in the inventory of `holder`, creating the inventory.
    pub fn give(&mut self, holder: EntityId, item: EntityId) -> &mut Self {
        if let Some(spec) = self.spec_mut(holder) {
            spec.inventory.get_or_insert_with(Inventory::default).items.insert(item);
        }
        self
    }

    /// Applies `effect` to `holder`, creating the status.
    pub fn apply_effect(&mut self, holder: EntityId, effect: EntityId) -> &mut Self {
        if let Some(spec) = self.spec_mut(holder) {
            spec.status
                .get_or_insert_with(Status::default)
                .effect_ids
                .insert(effect);
        }
        self
    }

    /// Links two portal endpoints in both directions.
    pub fn pair_portals(&mut self, a: EntityId, b: EntityId) -> &mut Self {
        if let Some(spec) = self.spec_mut(a) {
            spec.portal = Some(Portal { pair: b });
        }
        if let Some(spec) = self.spec_mut(b) {
            spec.portal = Some(Portal { pair: a });
        }
        self
    }

    /// Validates the world and produces the initial snapshot.
    pub fn build(self, registry: &Registry) -> Result<State, BuildError> {
        let mechanics = registry.bind(&self.movement, &self.objective)?;
        let mut state = State::new(self.width, self.height, mechanics);
        state.seed = self.seed;
        state.turn_limit = self.turn_limit;
        state.message = self.message;

        for placement in &self.placements {
            if let Some(position) = placement.position {
                if !state.in_bounds(position) {
                    return Err(BuildError::OutOfBounds {
                        entity: placement.id,
                        position,
                        width: self.width,
                        height: self.height,
                    });
                }
                state.position.insert(placement.id, position);
            }
            insert_components(&mut state, placement.id, &placement.spec);
        }

        let known: BTreeSet<EntityId> = self.placements.iter().map(|p| p.id).collect();
        for placement in &self.placements {
            validate_references(&state, &known, placement)?;
        }
        Ok(state)
    }
}

fn insert_components(state: &mut State, id: EntityId, spec: &EntitySpec) {
    macro_rules! flag {
        ($($field:ident => $marker:expr),* $(,)?) => {
            $(if spec.$field { state.$field.insert(id, $marker); })*
        };
    }
    macro_rules! value {
        ($($field:ident),* $(,)?) => {
            $(if let Some(value) = &spec.$field { state.$field.insert(id, value.clone()); })*
        };
    }

    flag!(
        agent => Agent,
        blocking => Blocking,
        collectible => Collectible,
        collidable => Collidable,
        exit => Exit,
        lethal_damage => LethalDamage,
        pushable => Pushable,
        required => Required,
        immunity => Immunity,
        phasing => Phasing,
    );
    value!(
        appearance,
        cost,
        damage,
        health,
        inventory,
        key,
        locked,
        moving,
        pathfinding,
        portal,
        rewardable,
        status,
        speed,
    );

    match spec.limit {
        Some(EffectLimit::Time(amount)) => {
            state.time_limit.insert(id, TimeLimit { amount });
        }
        Some(EffectLimit::Usage(amount)) => {
            state.usage_limit.insert(id, UsageLimit { amount });
        }
        None => {}
    }
}

fn validate_references(
    state: &State,
    known: &BTreeSet<EntityId>,
    placement: &Placement,
) -> Result<(), BuildError> {
    let entity = placement.id;
    let spec = &placement.spec;
    let exists = |target: EntityId| known.contains(&target);
    let dangling = |target: EntityId| BuildError::DanglingReference { entity, target };

    if let Some(portal) = &spec.portal
        && !state.portal.contains(portal.pair)
    {
        return Err(dangling(portal.pair));
    }
    if let Some(pathfinding) = &spec.pathfinding
        && !state.position.contains(pathfinding.target)
    {
        return Err(dangling(pathfinding.target));
    }
    if let Some(inventory) = &spec.inventory
        && let Some(item) = inventory.items.iter().copied().find(|item| !exists(*item))
    {
        return Err(dangling(item));
    }
    if let Some(status) = &spec.status {
        for effect in status.effect_ids.iter().copied() {
            if !exists(effect) {
                return Err(dangling(effect));
            }
            if state.effect_kind(effect).is_none() {
                return Err(BuildError::NotAnEffect { entity: effect });
            }
        }
    }
    Ok(())
}
