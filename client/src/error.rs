use thiserror::Error;

use roomsync_shared::{
    EntityIndex, Incoming, ItemId, ItemType, RegistryError, RoomId, SerdeErr, StoreError,
};

use crate::room::RoomStatus;

/// How an anomaly is classified, which decides the level it is logged at
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AnomalyKind {
    /// The message could not be decoded
    Decode,
    /// The message arrived in a state that does not expect it
    InapplicableState,
    /// The message references an id or index that is not present
    Referential,
    /// An optimistic update lost against a concurrent replacement
    Conflict,
}

/// Errors raised while applying an inbound message to the current room.
///
/// None of these are fatal: [`RoomManager::handle`](crate::RoomManager::handle)
/// logs them and moves on to the next message.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RoomError {
    /// The payload ended early or held a malformed field
    #[error("Failed to decode message: {0}")]
    Decode(#[from] SerdeErr),

    /// The message does not apply to the current lifecycle state
    #[error("Ignoring {header:?} while {status:?}")]
    InapplicableState { header: Incoming, status: RoomStatus },

    /// No room is being entered or occupied
    #[error("Ignoring {header:?}, there is no current room")]
    NoRoom { header: Incoming },

    /// The message refers to another room than the current one
    #[error("Ignoring {header:?} for room {actual}, current room is {expected}")]
    RoomMismatch {
        header: Incoming,
        expected: RoomId,
        actual: RoomId,
    },

    /// The current room has no metadata to attach the change to
    #[error("Room {room_id} has no metadata yet")]
    NoRoomData { room_id: RoomId },

    /// A heightmap diff arrived before the heightmap itself
    #[error("Room {room_id} has no stacking heightmap yet")]
    NoHeightmap { room_id: RoomId },

    /// The queue status did not carry the expected guard sequence
    #[error("Queue status guard mismatch at {field}")]
    QueueGuardMismatch { field: &'static str },

    /// A room property key the client does not know
    #[error("Unknown room property {key}={value}")]
    UnknownProperty { key: String, value: String },

    /// A chat message arrived under a header that maps to no chat kind
    #[error("Header {header:?} is not a chat header")]
    UnknownChatHeader { header: Incoming },

    /// The manager has no handler for this header
    #[error("No room handler for {header:?}")]
    Unhandled { header: Incoming },

    #[error("{item_type:?} item {id} not found")]
    ItemNotFound { item_type: ItemType, id: ItemId },

    #[error("{item_type:?} item {id} is already present")]
    DuplicateItem { item_type: ItemType, id: ItemId },

    #[error("Entity {index} not found")]
    EntityNotFound { index: EntityIndex },

    #[error("Entity {index} is already present")]
    DuplicateEntity { index: EntityIndex },

    /// The item was replaced between read and write; the update was dropped
    #[error("{item_type:?} item {id} was replaced concurrently, update dropped")]
    ConcurrentUpdate { item_type: ItemType, id: ItemId },
}

impl RoomError {
    pub(crate) fn from_store(item_type: ItemType, error: StoreError) -> Self {
        match error {
            StoreError::DuplicateId { id } => RoomError::DuplicateItem { item_type, id },
            StoreError::IdNotFound { id } => RoomError::ItemNotFound { item_type, id },
            StoreError::Conflict { id } => RoomError::ConcurrentUpdate { item_type, id },
        }
    }

    pub fn kind(&self) -> AnomalyKind {
        match self {
            RoomError::Decode(_) => AnomalyKind::Decode,
            RoomError::InapplicableState { .. }
            | RoomError::NoRoom { .. }
            | RoomError::RoomMismatch { .. }
            | RoomError::NoRoomData { .. }
            | RoomError::NoHeightmap { .. }
            | RoomError::QueueGuardMismatch { .. }
            | RoomError::UnknownProperty { .. }
            | RoomError::Unhandled { .. } => AnomalyKind::InapplicableState,
            RoomError::UnknownChatHeader { .. }
            | RoomError::ItemNotFound { .. }
            | RoomError::DuplicateItem { .. }
            | RoomError::EntityNotFound { .. }
            | RoomError::DuplicateEntity { .. } => AnomalyKind::Referential,
            RoomError::ConcurrentUpdate { .. } => AnomalyKind::Conflict,
        }
    }
}

impl From<RegistryError> for RoomError {
    fn from(error: RegistryError) -> Self {
        match error {
            RegistryError::DuplicateIndex { index } => RoomError::DuplicateEntity { index },
            RegistryError::IndexNotFound { index } => RoomError::EntityNotFound { index },
        }
    }
}
