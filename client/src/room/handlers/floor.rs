use std::sync::Arc;

use log::trace;

use roomsync_shared::{
    read_floor_items, FloorItem, InboundPacket, ItemData, ItemId, ItemType, RollerUpdate, Serde,
    Tile,
};

use crate::{
    error::RoomError,
    room::{
        current::Room,
        events::{Disposition, RoomEvent},
        manager::RoomManager,
    },
};

impl RoomManager {
    pub(crate) fn on_floor_items(
        &mut self,
        packet: &mut InboundPacket<'_>,
    ) -> Result<Disposition, RoomError> {
        let header = packet.header();
        let items = read_floor_items(packet.reader())?;
        let room = self.require_loading(header)?;

        let mut loaded = Vec::with_capacity(items.len());
        for item in items {
            let item = Arc::new(item);
            match room.furni().floor.try_add(item.id, item.clone()) {
                Ok(()) => loaded.push(item),
                Err(error) => self.report(&RoomError::from_store(ItemType::Floor, error)),
            }
        }

        trace!("Loaded {} floor item(s)", loaded.len());
        if !loaded.is_empty() {
            self.emit(RoomEvent::FloorItemsLoaded(loaded));
        }
        Ok(Disposition::Forward)
    }

    pub(crate) fn on_floor_item_add(
        &mut self,
        packet: &mut InboundPacket<'_>,
    ) -> Result<Disposition, RoomError> {
        let header = packet.header();
        let item = Arc::new(FloorItem::de_with_owner(packet.reader())?);
        let room = self.require_active(header)?;

        room.furni()
            .floor
            .try_add(item.id, item.clone())
            .map_err(|error| RoomError::from_store(ItemType::Floor, error))?;
        self.emit(RoomEvent::FloorItemAdded(item));
        Ok(Disposition::Forward)
    }

    pub(crate) fn on_floor_item_remove(
        &mut self,
        packet: &mut InboundPacket<'_>,
    ) -> Result<Disposition, RoomError> {
        let header = packet.header();
        let id = packet.read_id_string()?;
        let room = self.require_active(header)?;

        let item = room
            .furni()
            .floor
            .try_remove(id)
            .map_err(|error| RoomError::from_store(ItemType::Floor, error))?;
        self.emit(RoomEvent::FloorItemRemoved(item));
        Ok(Disposition::Forward)
    }

    pub(crate) fn on_floor_item_update(
        &mut self,
        packet: &mut InboundPacket<'_>,
    ) -> Result<Disposition, RoomError> {
        let header = packet.header();
        let mut item = FloorItem::de(packet.reader())?;
        let room = self.require_active(header)?;

        let Some(previous) = room.furni().floor.get(item.id) else {
            return Err(RoomError::ItemNotFound {
                item_type: ItemType::Floor,
                id: item.id,
            });
        };

        // Local fields survive the server's replacement
        item.owner_name = previous.owner_name.clone();
        item.is_hidden = previous.is_hidden;

        let updated = Arc::new(item);
        room.furni()
            .floor
            .try_update(updated.id, updated.clone(), &previous)
            .map_err(|error| RoomError::from_store(ItemType::Floor, error))?;
        self.emit(RoomEvent::FloorItemUpdated { previous, updated });
        Ok(Disposition::Forward)
    }

    pub(crate) fn on_roller_move(
        &mut self,
        packet: &mut InboundPacket<'_>,
    ) -> Result<Disposition, RoomError> {
        let header = packet.header();
        let update = RollerUpdate::de(packet.reader())?;
        let room = self.require_active(header)?;

        for object in &update.objects {
            let moved = room.furni().floor.modify(object.id, |item| {
                item.location = Tile::new(update.to_x, update.to_y, object.to_z);
            });
            match moved {
                Ok((previous, item)) => {
                    self.emit(RoomEvent::FloorItemSlide {
                        item,
                        previous_tile: previous.location,
                        roller_id: update.roller_id,
                    });
                }
                Err(error) => self.report(&RoomError::from_store(ItemType::Floor, error)),
            }
        }

        if let Some(carried) = update.movement.entity() {
            let moved = room.entities().with_entity_mut(carried.index, |entity| {
                let previous_tile = entity.location;
                entity.location = Tile::new(update.to_x, update.to_y, carried.to_z);
                (entity.clone(), previous_tile)
            });
            match moved {
                Ok((entity, previous_tile)) => {
                    self.emit(RoomEvent::EntitySlide {
                        entity,
                        previous_tile,
                        roller_id: update.roller_id,
                    });
                }
                Err(error) => self.report(&RoomError::from(error)),
            }
        }
        Ok(Disposition::Forward)
    }

    pub(crate) fn on_item_data_update(
        &mut self,
        packet: &mut InboundPacket<'_>,
    ) -> Result<Disposition, RoomError> {
        let header = packet.header();
        let id = packet.read_id_string()?;
        let data = ItemData::de(packet.reader())?;
        let room = self.require_active(header)?;

        self.apply_item_data(&room, id, data)?;
        Ok(Disposition::Forward)
    }

    pub(crate) fn on_item_data_update_batch(
        &mut self,
        packet: &mut InboundPacket<'_>,
    ) -> Result<Disposition, RoomError> {
        let header = packet.header();
        let reader = packet.reader();
        let count = reader.read_legacy_count()?;
        let mut updates = Vec::with_capacity(count.min(reader.remaining()));
        for _ in 0..count {
            let id = reader.read_legacy_long()?;
            updates.push((id, ItemData::de(reader)?));
        }
        let room = self.require_active(header)?;

        for (id, data) in updates {
            if let Err(error) = self.apply_item_data(&room, id, data) {
                self.report(&error);
            }
        }
        Ok(Disposition::Forward)
    }

    fn apply_item_data(&mut self, room: &Room, id: ItemId, data: ItemData) -> Result<(), RoomError> {
        let (previous, item) = room
            .furni()
            .floor
            .modify(id, |item| item.data = data)
            .map_err(|error| RoomError::from_store(ItemType::Floor, error))?;
        self.emit(RoomEvent::FloorItemDataUpdated {
            item,
            previous_data: previous.data.clone(),
        });
        Ok(())
    }

    pub(crate) fn on_dice_value(
        &mut self,
        packet: &mut InboundPacket<'_>,
    ) -> Result<Disposition, RoomError> {
        let header = packet.header();
        let id = packet.read_legacy_long()?;
        let value = packet.read_i32()?;
        let room = self.require_active(header)?;

        let (previous, item) = room
            .furni()
            .floor
            .modify(id, |item| item.data.set_value(value.to_string()))
            .map_err(|error| RoomError::from_store(ItemType::Floor, error))?;
        self.emit(RoomEvent::DiceUpdated {
            item,
            previous_value: previous.data.state(),
        });
        Ok(Disposition::Forward)
    }
}
