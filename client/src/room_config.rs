use std::default::Default;

/// Contains Config properties which will be used by the RoomManager
#[derive(Clone, Debug)]
pub struct RoomConfig {
    /// Generic error code the server sends when the local user is kicked
    pub kicked_error_code: i32,
    /// Determines whether room metadata is stored in the lookup cache as it
    /// arrives. With caching off, rooms are built without metadata unless it
    /// arrives again after entry.
    pub cache_room_data: bool,
    /// Chat from an entity hidden locally is not forwarded to the client
    pub block_hidden_entity_chat: bool,
}

impl Default for RoomConfig {
    fn default() -> Self {
        Self {
            kicked_error_code: 4008,
            cache_room_data: true,
            block_hidden_entity_chat: true,
        }
    }
}
