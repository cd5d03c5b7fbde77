use std::sync::Arc;

use log::trace;

use roomsync_shared::{read_wall_items, InboundPacket, ItemType, Serde, WallItem};

use crate::{
    error::RoomError,
    room::{
        events::{Disposition, RoomEvent},
        manager::RoomManager,
    },
};

impl RoomManager {
    pub(crate) fn on_wall_items(
        &mut self,
        packet: &mut InboundPacket<'_>,
    ) -> Result<Disposition, RoomError> {
        let header = packet.header();
        let items = read_wall_items(packet.reader())?;
        let room = self.require_loading(header)?;

        let mut loaded = Vec::with_capacity(items.len());
        for item in items {
            let item = Arc::new(item);
            match room.furni().wall.try_add(item.id, item.clone()) {
                Ok(()) => loaded.push(item),
                Err(error) => self.report(&RoomError::from_store(ItemType::Wall, error)),
            }
        }

        trace!("Loaded {} wall item(s)", loaded.len());
        if !loaded.is_empty() {
            self.emit(RoomEvent::WallItemsLoaded(loaded));
        }
        Ok(Disposition::Forward)
    }

    pub(crate) fn on_wall_item_add(
        &mut self,
        packet: &mut InboundPacket<'_>,
    ) -> Result<Disposition, RoomError> {
        let header = packet.header();
        let item = Arc::new(WallItem::de_with_owner(packet.reader())?);
        let room = self.require_active(header)?;

        room.furni()
            .wall
            .try_add(item.id, item.clone())
            .map_err(|error| RoomError::from_store(ItemType::Wall, error))?;
        self.emit(RoomEvent::WallItemAdded(item));
        Ok(Disposition::Forward)
    }

    pub(crate) fn on_wall_item_remove(
        &mut self,
        packet: &mut InboundPacket<'_>,
    ) -> Result<Disposition, RoomError> {
        let header = packet.header();
        let id = packet.read_id_string()?;
        let room = self.require_active(header)?;

        let item = room
            .furni()
            .wall
            .try_remove(id)
            .map_err(|error| RoomError::from_store(ItemType::Wall, error))?;
        self.emit(RoomEvent::WallItemRemoved(item));
        Ok(Disposition::Forward)
    }

    /// Merges the server's record with the local fields under the entry lock.
    /// Unknown ids are reported and never inserted.
    pub(crate) fn on_wall_item_update(
        &mut self,
        packet: &mut InboundPacket<'_>,
    ) -> Result<Disposition, RoomError> {
        let header = packet.header();
        let item = WallItem::de(packet.reader())?;
        let room = self.require_active(header)?;

        let id = item.id;
        if !room.furni().wall.contains(id) {
            return Err(RoomError::ItemNotFound {
                item_type: ItemType::Wall,
                id,
            });
        }

        let received = Arc::new(item);
        let (previous, updated) = room.furni().wall.add_or_update(
            id,
            || received.clone(),
            |current| {
                Arc::new(WallItem {
                    owner_name: current.owner_name.clone(),
                    is_hidden: current.is_hidden,
                    ..WallItem::clone(&received)
                })
            },
        );

        if let Some(previous) = previous {
            self.emit(RoomEvent::WallItemUpdated { previous, updated });
        }
        Ok(Disposition::Forward)
    }
}
