/// Lifecycle of a room visit.
///
/// `Disconnected → Connecting → [RingingDoorbell] → [Queued] → Loading → Active`,
/// and back to `Disconnected` whenever the visit ends.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum RoomStatus {
    #[default]
    Disconnected,
    /// A room context was opened and is waiting for the room to be ready
    Connecting,
    /// Waiting for someone inside to answer the doorbell
    RingingDoorbell,
    /// Waiting in the visitor queue, `position` is 1-based
    Queued { position: i32 },
    /// The room is ready and its contents are being loaded
    Loading,
    /// The local user is inside the room
    Active,
}

impl RoomStatus {
    /// States a forced "left room" transition resets from
    pub fn is_resettable(&self) -> bool {
        matches!(
            self,
            RoomStatus::RingingDoorbell
                | RoomStatus::Queued { .. }
                | RoomStatus::Loading
                | RoomStatus::Active
        )
    }

    pub fn is_queued(&self) -> bool {
        matches!(self, RoomStatus::Queued { .. })
    }

    pub fn queue_position(&self) -> Option<i32> {
        match self {
            RoomStatus::Queued { position } => Some(*position),
            _ => None,
        }
    }
}
