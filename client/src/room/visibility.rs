use std::sync::Arc;

use log::debug;

use roomsync_shared::{
    Entity, EntityIndex, FloorItem, Furni, Incoming, ItemId, ItemType, OutgoingPacket, WallItem,
};

use crate::room::{events::RoomEvent, manager::RoomManager};

// Local-only visibility. The client is told an item or occupant left (or
// came back) through injected packets; the server never hears about it.
impl RoomManager {
    /// Hides an item from the client. Returns false if it is absent or
    /// already hidden.
    pub fn hide_furni(&mut self, item_type: ItemType, id: ItemId) -> bool {
        self.set_furni_hidden(item_type, id, true)
    }

    /// Shows a hidden item again. Returns false if it is absent or not
    /// hidden.
    pub fn show_furni(&mut self, item_type: ItemType, id: ItemId) -> bool {
        self.set_furni_hidden(item_type, id, false)
    }

    pub fn hide_entity(&mut self, index: EntityIndex) -> bool {
        self.set_entity_hidden(index, true)
    }

    pub fn show_entity(&mut self, index: EntityIndex) -> bool {
        self.set_entity_hidden(index, false)
    }

    fn set_furni_hidden(&mut self, item_type: ItemType, id: ItemId, hidden: bool) -> bool {
        let Some(room) = self.current_room() else {
            return false;
        };

        let furni = match item_type {
            ItemType::Floor => {
                let Some(item) = room.furni().floor.get(id) else {
                    return false;
                };
                if item.is_hidden == hidden {
                    return false;
                }
                let toggled = Arc::new(FloorItem {
                    is_hidden: hidden,
                    ..FloorItem::clone(&item)
                });
                let (_, stored) = room.furni().floor.add_or_update(
                    id,
                    || toggled.clone(),
                    |current| {
                        Arc::new(FloorItem {
                            is_hidden: hidden,
                            ..FloorItem::clone(current)
                        })
                    },
                );
                self.send(self.floor_visibility_packet(&stored));
                Furni::Floor(stored)
            }
            ItemType::Wall => {
                let Some(item) = room.furni().wall.get(id) else {
                    return false;
                };
                if item.is_hidden == hidden {
                    return false;
                }
                let toggled = Arc::new(WallItem {
                    is_hidden: hidden,
                    ..WallItem::clone(&item)
                });
                let (_, stored) = room.furni().wall.add_or_update(
                    id,
                    || toggled.clone(),
                    |current| {
                        Arc::new(WallItem {
                            is_hidden: hidden,
                            ..WallItem::clone(current)
                        })
                    },
                );
                self.send(self.wall_visibility_packet(&stored));
                Furni::Wall(stored)
            }
        };

        debug!(
            "{} {:?} item {}",
            if hidden { "Hid" } else { "Showed" },
            item_type,
            id
        );
        self.emit(RoomEvent::FurniVisibilityToggled(furni));
        true
    }

    fn floor_visibility_packet(&self, item: &FloorItem) -> OutgoingPacket {
        if item.is_hidden {
            OutgoingPacket::to_client(Incoming::FloorItemRemove, self.variant, |writer| {
                writer.write_id_string(item.id);
                writer.write_bool(false);
                writer.write_legacy_long(-1);
                writer.write_i32(0);
            })
        } else {
            OutgoingPacket::to_client(Incoming::FloorItemAdd, self.variant, |writer| {
                item.ser_with_owner(writer)
            })
        }
    }

    fn wall_visibility_packet(&self, item: &WallItem) -> OutgoingPacket {
        if item.is_hidden {
            OutgoingPacket::to_client(Incoming::WallItemRemove, self.variant, |writer| {
                writer.write_id_string(item.id);
                writer.write_legacy_long(-1);
            })
        } else {
            OutgoingPacket::to_client(Incoming::WallItemAdd, self.variant, |writer| {
                item.ser_with_owner(writer)
            })
        }
    }

    fn set_entity_hidden(&mut self, index: EntityIndex, hidden: bool) -> bool {
        let Some(room) = self.current_room() else {
            return false;
        };

        let toggled = room.entities().with_entity_mut(index, |entity| {
            if entity.is_hidden == hidden {
                return None;
            }
            entity.is_hidden = hidden;
            Some(entity.clone())
        });
        let Ok(Some(entity)) = toggled else {
            return false;
        };

        self.send(self.entity_visibility_packet(&entity));
        debug!(
            "{} entity {}",
            if hidden { "Hid" } else { "Showed" },
            index
        );
        self.emit(RoomEvent::EntityVisibilityToggled(entity));
        true
    }

    fn entity_visibility_packet(&self, entity: &Entity) -> OutgoingPacket {
        if entity.is_hidden {
            OutgoingPacket::to_client(Incoming::EntityRemoved, self.variant, |writer| {
                writer.write_index_string(entity.index)
            })
        } else {
            OutgoingPacket::to_client(Incoming::EntitiesAdded, self.variant, |writer| {
                Entity::ser_batch(std::slice::from_ref(entity), writer)
            })
        }
    }
}
