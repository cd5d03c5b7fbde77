pub type RoomId = i64;
pub type ItemId = i64;
pub type EntityId = i64;
pub type UserId = i64;
/// Room-local occupant index, valid only for the current visit
pub type EntityIndex = i32;
