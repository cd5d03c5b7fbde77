use std::sync::Arc;

use dashmap::DashMap;
use parking_lot::RwLock;

use roomsync_shared::{RoomData, RoomId};

use crate::room::{current::Room, status::RoomStatus};

/// Per-visit state published by the [`RoomManager`](crate::RoomManager).
/// Replaced wholesale on reset.
#[derive(Clone, Debug, Default)]
pub(crate) struct SharedState {
    pub(crate) status: RoomStatus,
    /// Room being entered, or occupied once `status` is `Active`
    pub(crate) room: Option<Arc<Room>>,
    pub(crate) rights_level: i32,
    pub(crate) is_owner: bool,
    pub(crate) is_spectating: bool,
}

pub(crate) struct HandleInner {
    pub(crate) state: RwLock<SharedState>,
    pub(crate) room_data: DashMap<RoomId, Arc<RoomData>>,
}

/// Read-only view of the room synchronizer.
///
/// Cheap to clone and safe to query from any thread while the manager keeps
/// applying messages. Every accessor reads one consistent state: the manager
/// swaps state under a single write lock, so a reset is never seen half done.
#[derive(Clone)]
pub struct RoomHandle {
    inner: Arc<HandleInner>,
}

impl RoomHandle {
    pub(crate) fn new() -> Self {
        Self {
            inner: Arc::new(HandleInner {
                state: RwLock::new(SharedState::default()),
                room_data: DashMap::new(),
            }),
        }
    }

    pub(crate) fn inner(&self) -> &HandleInner {
        &self.inner
    }

    pub fn status(&self) -> RoomStatus {
        self.inner.state.read().status
    }

    pub fn is_in_room(&self) -> bool {
        self.status() == RoomStatus::Active
    }

    pub fn is_loading(&self) -> bool {
        self.status() == RoomStatus::Loading
    }

    pub fn is_in_queue(&self) -> bool {
        self.status().is_queued()
    }

    pub fn queue_position(&self) -> Option<i32> {
        self.status().queue_position()
    }

    pub fn is_ringing_doorbell(&self) -> bool {
        self.status() == RoomStatus::RingingDoorbell
    }

    pub fn is_spectating(&self) -> bool {
        self.inner.state.read().is_spectating
    }

    /// Id of the room being entered or occupied
    pub fn room_id(&self) -> Option<RoomId> {
        self.inner.state.read().room.as_ref().map(|room| room.id())
    }

    /// The occupied room. Only published once entry completes.
    pub fn room(&self) -> Option<Arc<Room>> {
        let state = self.inner.state.read();
        match state.status {
            RoomStatus::Active => state.room.clone(),
            _ => None,
        }
    }

    pub fn rights_level(&self) -> i32 {
        self.inner.state.read().rights_level
    }

    pub fn is_owner(&self) -> bool {
        self.inner.state.read().is_owner
    }

    pub fn has_rights(&self) -> bool {
        self.rights_level() > 0
    }

    pub fn can_mute(&self) -> bool {
        self.check_moderation(|data, rights, owner| data.moderation.can_mute(rights, owner))
    }

    pub fn can_kick(&self) -> bool {
        self.check_moderation(|data, rights, owner| data.moderation.can_kick(rights, owner))
    }

    pub fn can_ban(&self) -> bool {
        self.check_moderation(|data, rights, owner| data.moderation.can_ban(rights, owner))
    }

    fn check_moderation(&self, allowed: impl FnOnce(&RoomData, i32, bool) -> bool) -> bool {
        let state = self.inner.state.read();
        if state.status != RoomStatus::Active {
            return false;
        }
        let Some(data) = state.room.as_ref().and_then(|room| room.data()) else {
            return false;
        };
        allowed(&data, state.rights_level, state.is_owner)
    }

    /// Best-effort lookup in the room metadata cache
    pub fn try_get_room_data(&self, room_id: RoomId) -> Option<Arc<RoomData>> {
        self.inner
            .room_data
            .get(&room_id)
            .map(|entry| entry.value().clone())
    }
}
