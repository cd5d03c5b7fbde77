use dashmap::{mapref::entry::Entry, DashMap};
use log::trace;

use crate::{
    model::{
        entity::{Entity, EntityKind, EntityStatusUpdate},
        tile::Tile,
    },
    types::{EntityId, EntityIndex},
    world::error::RegistryError,
};

/// Occupants of the current room, keyed by their room-local index.
///
/// Entities are mutated in place under the map's entry lock; every lookup
/// hands out a cloned snapshot, so readers on other threads see an entity
/// either before or after an update, never halfway through one.
#[derive(Default)]
pub struct EntityRegistry {
    entities: DashMap<EntityIndex, Entity>,
}

impl EntityRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn contains(&self, index: EntityIndex) -> bool {
        self.entities.contains_key(&index)
    }

    pub fn add(&self, entity: Entity) -> Result<(), RegistryError> {
        match self.entities.entry(entity.index) {
            Entry::Occupied(existing) => {
                trace!(
                    "Rejected {:?} {}: index {} is held by {}",
                    entity.kind(),
                    entity.name,
                    entity.index,
                    existing.get().name
                );
                Err(RegistryError::DuplicateIndex {
                    index: entity.index,
                })
            }
            Entry::Vacant(slot) => {
                trace!("Registered {} at index {}", entity.name, entity.index);
                slot.insert(entity);
                Ok(())
            }
        }
    }

    pub fn remove(&self, index: EntityIndex) -> Option<Entity> {
        self.entities.remove(&index).map(|(_, entity)| entity)
    }

    /// Applies a status update and returns the updated snapshot
    pub fn update(
        &self,
        index: EntityIndex,
        update: &EntityStatusUpdate,
    ) -> Result<Entity, RegistryError> {
        self.with_entity_mut(index, |entity| {
            entity.apply_status(update);
            entity.clone()
        })
    }

    /// Runs `f` against the live entity while holding its entry lock
    pub fn with_entity_mut<R>(
        &self,
        index: EntityIndex,
        f: impl FnOnce(&mut Entity) -> R,
    ) -> Result<R, RegistryError> {
        match self.entities.get_mut(&index) {
            Some(mut entity) => Ok(f(entity.value_mut())),
            None => Err(RegistryError::IndexNotFound { index }),
        }
    }

    pub fn get(&self, index: EntityIndex) -> Option<Entity> {
        self.entities.get(&index).map(|entity| entity.value().clone())
    }

    pub fn get_by_id(&self, id: EntityId) -> Option<Entity> {
        self.find_first(|entity| entity.id == id)
    }

    pub fn get_user_by_id(&self, id: EntityId) -> Option<Entity> {
        self.find_first(|entity| entity.id == id && entity.is_user())
    }

    /// Case-insensitive name match. Names are not unique; the lowest index
    /// wins.
    pub fn get_by_name(&self, name: &str) -> Option<Entity> {
        let name = name.to_lowercase();
        self.find_first(|entity| entity.name.to_lowercase() == name)
    }

    fn find_first(&self, predicate: impl Fn(&Entity) -> bool) -> Option<Entity> {
        self.entities
            .iter()
            .filter(|entry| predicate(entry.value()))
            .min_by_key(|entry| *entry.key())
            .map(|entry| entry.value().clone())
    }

    /// Snapshot of every entity, ordered by index
    pub fn entities(&self) -> Vec<Entity> {
        let mut entities: Vec<Entity> = self
            .entities
            .iter()
            .map(|entry| entry.value().clone())
            .collect();
        entities.sort_by_key(|entity| entity.index);
        entities
    }

    pub fn of_kind(&self, kind: EntityKind) -> Vec<Entity> {
        self.filter(|entity| entity.kind() == kind)
    }

    pub fn users(&self) -> Vec<Entity> {
        self.of_kind(EntityKind::User)
    }

    pub fn pets(&self) -> Vec<Entity> {
        self.of_kind(EntityKind::Pet)
    }

    pub fn bots(&self) -> Vec<Entity> {
        self.filter(Entity::is_bot)
    }

    pub fn entities_at(&self, x: i32, y: i32) -> Vec<Entity> {
        self.filter(|entity| entity.location.matches_xy(x, y))
    }

    pub fn entities_at_tile(&self, tile: &Tile, epsilon: f64) -> Vec<Entity> {
        self.filter(|entity| entity.location.matches(tile, epsilon))
    }

    pub fn filter(&self, predicate: impl Fn(&Entity) -> bool) -> Vec<Entity> {
        let mut entities: Vec<Entity> = self
            .entities
            .iter()
            .filter(|entry| predicate(entry.value()))
            .map(|entry| entry.value().clone())
            .collect();
        entities.sort_by_key(|entity| entity.index);
        entities
    }

    pub fn clear(&self) {
        self.entities.clear();
    }
}
