use roomsync_shared::{ItemId, ItemType, Outgoing, OutgoingPacket, WallLocation};

use crate::room::manager::RoomManager;

/// Pick-up category codes
const PICKUP_WALL: i32 = 1;
const PICKUP_FLOOR: i32 = 2;

// Outbound furniture commands. None of these touch local state: the change
// shows up once the server echoes it back.
impl RoomManager {
    pub fn place_floor_item(&self, id: ItemId, x: i32, y: i32, direction: i32) {
        self.send(OutgoingPacket::to_server(
            Outgoing::PlaceFloorItem,
            self.variant,
            |writer| {
                writer.write_legacy_long(id);
                writer.write_i32(x);
                writer.write_i32(y);
                writer.write_i32(direction);
            },
        ));
    }

    pub fn place_wall_item(&self, id: ItemId, location: &WallLocation) {
        self.send(OutgoingPacket::to_server(
            Outgoing::PlaceWallItem,
            self.variant,
            |writer| {
                writer.write_legacy_long(id);
                writer.write_i32(location.wx);
                writer.write_i32(location.wy);
                writer.write_i32(location.lx);
                writer.write_i32(location.ly);
            },
        ));
    }

    pub fn move_floor_item(&self, id: ItemId, x: i32, y: i32, direction: i32) {
        self.send(OutgoingPacket::to_server(
            Outgoing::MoveFloorItem,
            self.variant,
            |writer| {
                writer.write_legacy_long(id);
                writer.write_i32(x);
                writer.write_i32(y);
                writer.write_i32(direction);
            },
        ));
    }

    pub fn move_wall_item(&self, id: ItemId, location: &WallLocation) {
        self.send(OutgoingPacket::to_server(
            Outgoing::MoveWallItem,
            self.variant,
            |writer| {
                writer.write_legacy_long(id);
                writer.write_i32(location.wx);
                writer.write_i32(location.wy);
                writer.write_i32(location.lx);
                writer.write_i32(location.ly);
                writer.write_string(&location.orientation.as_char().to_string());
            },
        ));
    }

    pub fn pickup_item(&self, item_type: ItemType, id: ItemId) {
        let category = match item_type {
            ItemType::Floor => PICKUP_FLOOR,
            ItemType::Wall => PICKUP_WALL,
        };
        self.send(OutgoingPacket::to_server(
            Outgoing::PickupItem,
            self.variant,
            |writer| {
                writer.write_i32(category);
                writer.write_legacy_long(id);
            },
        ));
    }

    /// Sets a stack helper's caret height, in tile units
    pub fn set_stack_helper_height(&self, id: ItemId, height: f64) {
        let height = (height * 100.0).round() as i32;
        self.send(OutgoingPacket::to_server(
            Outgoing::SetStackHelperHeight,
            self.variant,
            |writer| {
                writer.write_legacy_long(id);
                writer.write_i32(height);
            },
        ));
    }
}
