use thiserror::Error;

use crate::types::{EntityIndex, ItemId};

/// Errors raised by the entity registry
///
/// Both are referential anomalies: the caller logs them and carries on with
/// the rest of the batch.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// An entity with this index is already present
    #[error("Entity index {index} is already registered")]
    DuplicateIndex { index: EntityIndex },

    /// No entity with this index is present
    #[error("Entity index {index} not found")]
    IndexNotFound { index: EntityIndex },
}

/// Errors raised by an item store
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// An item with this id is already present
    #[error("Item {id} is already present")]
    DuplicateId { id: ItemId },

    /// No item with this id is present
    #[error("Item {id} not found")]
    IdNotFound { id: ItemId },

    /// The stored item changed since the caller read it
    #[error("Item {id} was replaced concurrently, update dropped")]
    Conflict { id: ItemId },
}
