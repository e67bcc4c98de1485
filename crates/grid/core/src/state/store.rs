//! Copy-on-write component storage.
//!
//! Every component kind lives in its own [`Store`]. Cloning a store is a
//! reference-count bump; the first write through a clone copies the map once,
//! after which further writes in the same system land in place. A snapshot
//! handed to a system therefore never observes the writes made while
//! building its successor.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use super::{EntityId, Position};

/// Mapping from entity to one component value, iterated in entity order.
#[derive(Debug)]
pub struct Store<T> {
    inner: Arc<BTreeMap<EntityId, T>>,
}

impl<T> Store<T> {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(BTreeMap::new()),
        }
    }

    /// Component of `id`, if the entity has one of this kind.
    pub fn get(&self, id: EntityId) -> Option<&T> {
        self.inner.get(&id)
    }

    /// Capability check: true when `id` carries this component.
    pub fn contains(&self, id: EntityId) -> bool {
        self.inner.contains_key(&id)
    }

    /// Number of entities carrying this component.
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Iterates `(entity, component)` pairs in ascending entity order.
    pub fn iter(&self) -> impl Iterator<Item = (EntityId, &T)> + '_ {
        self.inner.iter().map(|(id, value)| (*id, value))
    }

    /// Iterates entity ids in ascending order.
    pub fn ids(&self) -> impl Iterator<Item = EntityId> + '_ {
        self.inner.keys().copied()
    }

    /// Returns true when both stores share the same backing map.
    pub fn shares_storage_with(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl<T: Clone> Store<T> {
    /// Sets the component of `id`, returning the value it replaced.
    pub fn insert(&mut self, id: EntityId, value: T) -> Option<T> {
        Arc::make_mut(&mut self.inner).insert(id, value)
    }

    /// Removes the component of `id`. A miss leaves the storage shared.
    pub fn remove(&mut self, id: EntityId) -> Option<T> {
        if !self.contains(id) {
            return None;
        }
        Arc::make_mut(&mut self.inner).remove(&id)
    }

    /// Mutable access to the component of `id`, copying shared storage
    /// only when the entity is present.
    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut T> {
        if !self.contains(id) {
            return None;
        }
        Arc::make_mut(&mut self.inner).get_mut(&id)
    }

    /// Keeps only the entries accepted by `keep`.
    ///
    /// The backing map is only copied when at least one entry is dropped.
    pub fn retain(&mut self, mut keep: impl FnMut(EntityId, &T) -> bool) {
        if self.iter().all(|(id, value)| keep(id, value)) {
            return;
        }
        Arc::make_mut(&mut self.inner).retain(|id, value| keep(*id, value));
    }
}

impl<T> Clone for Store<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T> Default for Store<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: PartialEq> PartialEq for Store<T> {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner) || self.inner == other.inner
    }
}

impl<T: Eq> Eq for Store<T> {}

impl<T> FromIterator<(EntityId, T)> for Store<T> {
    fn from_iter<I: IntoIterator<Item = (EntityId, T)>>(iter: I) -> Self {
        Self {
            inner: Arc::new(iter.into_iter().collect()),
        }
    }
}

#[cfg(feature = "serde")]
impl<T: serde::Serialize> serde::Serialize for Store<T> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.inner.as_ref().serialize(serializer)
    }
}

#[cfg(feature = "serde")]
impl<'de, T: serde::Deserialize<'de>> serde::Deserialize<'de> for Store<T> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let map = BTreeMap::<EntityId, T>::deserialize(deserializer)?;
        Ok(Self {
            inner: Arc::new(map),
        })
    }
}

/// Tiles entered during the current turn, keyed by tile.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Trail(BTreeMap<Position, BTreeSet<EntityId>>);

impl Trail {
    pub fn record(&mut self, position: Position, entity: EntityId) {
        self.0.entry(position).or_default().insert(entity);
    }

    /// Entities that entered `position` this turn.
    pub fn at(&self, position: Position) -> impl Iterator<Item = EntityId> + '_ {
        self.0.get(&position).into_iter().flatten().copied()
    }

    /// Tiles entered by `entity` this turn.
    pub fn tiles_of(&self, entity: EntityId) -> BTreeSet<Position> {
        self.0
            .iter()
            .filter(|(_, entities)| entities.contains(&entity))
            .map(|(position, _)| *position)
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }
}

/// `(target, damager)` pairs already resolved during the current turn.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HitLog(BTreeSet<(EntityId, EntityId)>);

impl HitLog {
    /// Records a hit, returning false when the pair was already recorded.
    pub fn record(&mut self, target: EntityId, damager: EntityId) -> bool {
        self.0.insert((target, damager))
    }

    pub fn contains(&self, target: EntityId, damager: EntityId) -> bool {
        self.0.contains(&(target, damager))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }
}
