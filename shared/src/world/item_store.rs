use std::sync::Arc;

use dashmap::{mapref::entry::Entry, DashMap};
use log::trace;

use crate::{types::ItemId, world::error::StoreError};

/// Concurrent keyed collection of copy-on-write items.
///
/// Items are never mutated in place: every change swaps in a new `Arc`, so a
/// reader holding a snapshot never sees a torn record. `try_update` compares
/// by pointer, which makes any replacement since the caller's read visible
/// as a [`StoreError::Conflict`].
pub struct ItemStore<T> {
    items: DashMap<ItemId, Arc<T>>,
}

impl<T> Default for ItemStore<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> ItemStore<T> {
    pub fn new() -> Self {
        Self {
            items: DashMap::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn contains(&self, id: ItemId) -> bool {
        self.items.contains_key(&id)
    }

    pub fn get(&self, id: ItemId) -> Option<Arc<T>> {
        self.items.get(&id).map(|entry| entry.value().clone())
    }

    /// Snapshot of every item, in no particular order
    pub fn values(&self) -> Vec<Arc<T>> {
        self.items.iter().map(|entry| entry.value().clone()).collect()
    }

    pub fn ids(&self) -> Vec<ItemId> {
        self.items.iter().map(|entry| *entry.key()).collect()
    }

    pub fn clear(&self) {
        trace!("Clearing {} item(s)", self.items.len());
        self.items.clear();
    }

    /// Inserts only if the id is absent
    pub fn try_add(&self, id: ItemId, item: Arc<T>) -> Result<(), StoreError> {
        match self.items.entry(id) {
            Entry::Occupied(_) => {
                trace!("Rejected add of item {}: id already present", id);
                Err(StoreError::DuplicateId { id })
            }
            Entry::Vacant(entry) => {
                entry.insert(item);
                Ok(())
            }
        }
    }

    pub fn try_remove(&self, id: ItemId) -> Result<Arc<T>, StoreError> {
        self.items
            .remove(&id)
            .map(|(_, item)| item)
            .ok_or(StoreError::IdNotFound { id })
    }

    /// Replaces the item only if it is still `expected`, returning the
    /// replaced value
    pub fn try_update(
        &self,
        id: ItemId,
        new: Arc<T>,
        expected: &Arc<T>,
    ) -> Result<Arc<T>, StoreError> {
        let Some(mut entry) = self.items.get_mut(&id) else {
            return Err(StoreError::IdNotFound { id });
        };
        if !Arc::ptr_eq(entry.value(), expected) {
            trace!("Rejected update of item {}: replaced since it was read", id);
            return Err(StoreError::Conflict { id });
        }
        Ok(std::mem::replace(entry.value_mut(), new))
    }

    /// Inserts `add()` when absent, otherwise replaces the current value with
    /// `update(current)` under the entry lock. Returns the previous value, if
    /// any, and the stored one.
    pub fn add_or_update(
        &self,
        id: ItemId,
        add: impl FnOnce() -> Arc<T>,
        update: impl FnOnce(&Arc<T>) -> Arc<T>,
    ) -> (Option<Arc<T>>, Arc<T>) {
        match self.items.entry(id) {
            Entry::Occupied(mut entry) => {
                let updated = update(entry.get());
                let previous = entry.insert(updated.clone());
                (Some(previous), updated)
            }
            Entry::Vacant(entry) => {
                let added = add();
                entry.insert(added.clone());
                (None, added)
            }
        }
    }
}

impl<T: Clone> ItemStore<T> {
    /// Copies the current item, applies `change` and swaps the copy in with
    /// [`ItemStore::try_update`]. Returns the previous and the new value.
    pub fn modify(
        &self,
        id: ItemId,
        change: impl FnOnce(&mut T),
    ) -> Result<(Arc<T>, Arc<T>), StoreError> {
        let Some(current) = self.get(id) else {
            return Err(StoreError::IdNotFound { id });
        };
        let mut copy = T::clone(&current);
        change(&mut copy);
        let updated = Arc::new(copy);
        self.try_update(id, updated.clone(), &current)?;
        Ok((current, updated))
    }
}
