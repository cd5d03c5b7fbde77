use std::{collections::HashMap, sync::Arc};

use log::{debug, error, trace, warn};

use roomsync_shared::{
    InboundPacket, Incoming, OutgoingPacket, PacketSink, ProtocolVariant, RoomData, RoomId,
};

use crate::{
    error::{AnomalyKind, RoomError},
    room::{
        current::Room,
        events::{Disposition, RoomEvent},
        handle::{RoomHandle, SharedState},
        status::RoomStatus,
    },
    room_config::RoomConfig,
};

pub(crate) type Handler =
    fn(&mut RoomManager, &mut InboundPacket<'_>) -> Result<Disposition, RoomError>;

type Listener = Box<dyn FnMut(&mut RoomEvent) + Send>;

/// Every inbound message the room synchronizer reacts to
const HANDLERS: &[(Incoming, Handler)] = &[
    // Lifecycle
    (Incoming::RoomDataResult, RoomManager::on_room_data),
    (Incoming::OpenConnection, RoomManager::on_open_connection),
    (Incoming::QueueStatus, RoomManager::on_queue_status),
    (Incoming::Spectator, RoomManager::on_spectator),
    (Incoming::RoomReady, RoomManager::on_room_ready),
    (Incoming::RoomProperty, RoomManager::on_room_property),
    (Incoming::RightsGranted, RoomManager::on_rights_granted),
    (Incoming::RightsRevoked, RoomManager::on_rights_revoked),
    (Incoming::EntryTile, RoomManager::on_entry_tile),
    (Incoming::StackingHeightmap, RoomManager::on_stacking_heightmap),
    (Incoming::StackingHeightmapDiff, RoomManager::on_stacking_heightmap_diff),
    (Incoming::FloorPlan, RoomManager::on_floor_plan),
    (Incoming::Visualization, RoomManager::on_visualization),
    (Incoming::ChatSettings, RoomManager::on_chat_settings),
    (Incoming::EntryInfo, RoomManager::on_entry_info),
    (Incoming::CloseConnection, RoomManager::on_close_connection),
    (Incoming::GenericError, RoomManager::on_generic_error),
    (Incoming::Doorbell, RoomManager::on_doorbell),
    (Incoming::DoorbellAccepted, RoomManager::on_doorbell_accepted),
    (Incoming::DoorbellRejected, RoomManager::on_doorbell_rejected),
    // Floor items
    (Incoming::FloorItems, RoomManager::on_floor_items),
    (Incoming::FloorItemAdd, RoomManager::on_floor_item_add),
    (Incoming::FloorItemRemove, RoomManager::on_floor_item_remove),
    (Incoming::FloorItemUpdate, RoomManager::on_floor_item_update),
    (Incoming::RollerMove, RoomManager::on_roller_move),
    (Incoming::ItemDataUpdate, RoomManager::on_item_data_update),
    (Incoming::ItemDataUpdateBatch, RoomManager::on_item_data_update_batch),
    (Incoming::DiceValue, RoomManager::on_dice_value),
    // Wall items
    (Incoming::WallItems, RoomManager::on_wall_items),
    (Incoming::WallItemAdd, RoomManager::on_wall_item_add),
    (Incoming::WallItemRemove, RoomManager::on_wall_item_remove),
    (Incoming::WallItemUpdate, RoomManager::on_wall_item_update),
    // Entities
    (Incoming::EntitiesAdded, RoomManager::on_entities_added),
    (Incoming::EntityRemoved, RoomManager::on_entity_removed),
    (Incoming::EntityStatus, RoomManager::on_entity_status),
    (Incoming::AvatarUpdate, RoomManager::on_avatar_update),
    (Incoming::NameChanged, RoomManager::on_name_changed),
    (Incoming::Idle, RoomManager::on_idle),
    (Incoming::Dance, RoomManager::on_dance),
    (Incoming::Expression, RoomManager::on_expression),
    (Incoming::HandItem, RoomManager::on_hand_item),
    (Incoming::Effect, RoomManager::on_effect),
    (Incoming::Typing, RoomManager::on_typing),
    (Incoming::Whisper, RoomManager::on_chat),
    (Incoming::Talk, RoomManager::on_chat),
    (Incoming::Shout, RoomManager::on_chat),
];

/// Room synchronizer.
///
/// Applies inbound room messages to the current [`Room`], walks the visit
/// through its lifecycle and raises one [`RoomEvent`] per observable change.
/// The manager is the only writer; everyone else reads through a
/// [`RoomHandle`].
pub struct RoomManager {
    pub(super) config: RoomConfig,
    pub(super) variant: ProtocolVariant,
    sink: Arc<dyn PacketSink>,
    handle: RoomHandle,
    handlers: HashMap<Incoming, Handler>,
    listeners: Vec<Listener>,
    anomalies: usize,
}

impl RoomManager {
    pub fn new(config: RoomConfig, variant: ProtocolVariant, sink: Arc<dyn PacketSink>) -> Self {
        Self {
            config,
            variant,
            sink,
            handle: RoomHandle::new(),
            handlers: HANDLERS.iter().copied().collect(),
            listeners: Vec::new(),
            anomalies: 0,
        }
    }

    // Public

    /// Read-only view to hand out to other components and threads
    pub fn room_handle(&self) -> RoomHandle {
        self.handle.clone()
    }

    pub fn config(&self) -> &RoomConfig {
        &self.config
    }

    pub fn variant(&self) -> ProtocolVariant {
        self.variant
    }

    pub fn set_variant(&mut self, variant: ProtocolVariant) {
        self.variant = variant;
    }

    /// Registers a listener. Listeners run synchronously, in registration
    /// order, before the handler returns.
    pub fn on_event(&mut self, listener: impl FnMut(&mut RoomEvent) + Send + 'static) {
        self.listeners.push(Box::new(listener));
    }

    /// Headers this manager understands
    pub fn handled_headers() -> impl Iterator<Item = Incoming> {
        HANDLERS.iter().map(|(header, _)| *header)
    }

    pub fn handles(&self, header: Incoming) -> bool {
        self.handlers.contains_key(&header)
    }

    /// Number of anomalies reported so far
    pub fn anomaly_count(&self) -> usize {
        self.anomalies
    }

    /// Applies one inbound message. Anomalies are logged and the message is
    /// forwarded unchanged.
    pub fn handle(&mut self, packet: &mut InboundPacket<'_>) -> Disposition {
        match self.try_handle(packet) {
            Ok(disposition) => disposition,
            Err(error) => {
                self.report(&error);
                Disposition::Forward
            }
        }
    }

    /// Applies one inbound message, returning the anomaly that stopped it.
    /// Per-entry anomalies inside a batch are logged, not returned.
    pub fn try_handle(&mut self, packet: &mut InboundPacket<'_>) -> Result<Disposition, RoomError> {
        let header = packet.header();
        let Some(handler) = self.handlers.get(&header).copied() else {
            return Err(RoomError::Unhandled { header });
        };
        handler(self, packet)
    }

    // Crate-public

    /// Invokes every listener and hands the event back so the caller can read
    /// what listeners did to it
    pub(super) fn emit(&mut self, mut event: RoomEvent) -> RoomEvent {
        trace!("Room event: {}", event.name());
        for listener in self.listeners.iter_mut() {
            listener(&mut event);
        }
        event
    }

    pub(super) fn report(&mut self, error: &RoomError) {
        self.anomalies += 1;
        match error.kind() {
            AnomalyKind::Decode => warn!("{}", error),
            AnomalyKind::InapplicableState => debug!("{}", error),
            AnomalyKind::Referential | AnomalyKind::Conflict => error!("{}", error),
        }
    }

    pub(super) fn send(&self, packet: OutgoingPacket) {
        trace!("Sending {:?} to {:?}", packet.header, packet.destination());
        self.sink.send(packet);
    }

    pub(super) fn status(&self) -> RoomStatus {
        self.handle.status()
    }

    /// Room being entered or occupied, regardless of status
    pub(super) fn current_room(&self) -> Option<Arc<Room>> {
        self.handle.inner().state.read().room.clone()
    }

    pub(super) fn require_room(&self, header: Incoming) -> Result<Arc<Room>, RoomError> {
        self.current_room().ok_or(RoomError::NoRoom { header })
    }

    /// Current room, if the visit is in exactly `expected`
    pub(super) fn require_status(
        &self,
        header: Incoming,
        expected: RoomStatus,
    ) -> Result<Arc<Room>, RoomError> {
        let state = self.handle.inner().state.read();
        if state.status != expected {
            return Err(RoomError::InapplicableState {
                header,
                status: state.status,
            });
        }
        state.room.clone().ok_or(RoomError::NoRoom { header })
    }

    pub(super) fn require_loading(&self, header: Incoming) -> Result<Arc<Room>, RoomError> {
        self.require_status(header, RoomStatus::Loading)
    }

    pub(super) fn require_active(&self, header: Incoming) -> Result<Arc<Room>, RoomError> {
        self.require_status(header, RoomStatus::Active)
    }

    /// Mutates the published state under one write lock
    pub(super) fn update_state<R>(&self, f: impl FnOnce(&mut SharedState) -> R) -> R {
        f(&mut self.handle.inner().state.write())
    }

    /// Forced "left room": clears every per-visit field in one swap, then
    /// raises `Left` once the lock is released
    pub(super) fn reset(&mut self) {
        let previous = self.update_state(std::mem::take);
        debug!(
            "Left room {:?} (was {:?})",
            previous.room.as_ref().map(|room| room.id()),
            previous.status
        );
        self.emit(RoomEvent::Left);
    }

    pub(super) fn cached_room_data(&self, room_id: RoomId) -> Option<Arc<RoomData>> {
        let data = self.handle.try_get_room_data(room_id);
        if data.is_some() {
            trace!("Found cached data for room {}", room_id);
        }
        data
    }

    pub(super) fn cache_room_data(&self, data: &Arc<RoomData>) {
        if !self.config.cache_room_data {
            return;
        }
        match self.handle.inner().room_data.insert(data.id, data.clone()) {
            Some(_) => trace!("Updated cached data for room {}", data.id),
            None => trace!("Cached data for room {}", data.id),
        }
    }
}
