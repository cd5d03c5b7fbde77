use std::sync::Arc;

use log::{debug, trace};

use roomsync_shared::{
    ChatSettings, FloorPlan, Heightmap, HeightmapDiff, InboundPacket, Incoming, PacketReader,
    RoomData, RoomId, Serde, Tile,
};

use crate::{
    error::RoomError,
    room::{
        current::Room,
        events::{Disposition, RoomEvent},
        manager::RoomManager,
        status::RoomStatus,
    },
};

const QUEUE_TOKEN: &str = "visitors";

fn check_room_id(header: Incoming, room: &Room, room_id: RoomId) -> Result<(), RoomError> {
    if room.id() != room_id {
        return Err(RoomError::RoomMismatch {
            header,
            expected: room.id(),
            actual: room_id,
        });
    }
    Ok(())
}

fn expect_short(
    reader: &mut PacketReader<'_>,
    expected: i16,
    field: &'static str,
) -> Result<(), RoomError> {
    if reader.read_i16()? != expected {
        return Err(RoomError::QueueGuardMismatch { field });
    }
    Ok(())
}

fn expect_int(
    reader: &mut PacketReader<'_>,
    expected: i32,
    field: &'static str,
) -> Result<(), RoomError> {
    if reader.read_i32()? != expected {
        return Err(RoomError::QueueGuardMismatch { field });
    }
    Ok(())
}

fn expect_token(reader: &mut PacketReader<'_>, field: &'static str) -> Result<(), RoomError> {
    if reader.read_string()? != QUEUE_TOKEN {
        return Err(RoomError::QueueGuardMismatch { field });
    }
    Ok(())
}

impl RoomManager {
    pub(crate) fn on_room_data(
        &mut self,
        packet: &mut InboundPacket<'_>,
    ) -> Result<Disposition, RoomError> {
        let data = Arc::new(RoomData::de(packet.reader())?);
        self.cache_room_data(&data);

        // Pending rooms take it as well as the active one
        if let Some(room) = self.current_room() {
            if room.id() == data.id {
                room.set_data(data.clone());
                self.emit(RoomEvent::RoomDataUpdated(data));
            }
        }
        Ok(Disposition::Forward)
    }

    pub(crate) fn on_open_connection(
        &mut self,
        packet: &mut InboundPacket<'_>,
    ) -> Result<Disposition, RoomError> {
        let room_id = packet.read_legacy_long()?;

        // The server may open a new room without closing the previous one
        if self.status().is_resettable() {
            self.reset();
        }

        let room = Arc::new(Room::new(room_id, "", self.cached_room_data(room_id)));
        self.update_state(|state| {
            *state = Default::default();
            state.status = RoomStatus::Connecting;
            state.room = Some(room);
        });
        debug!("Opened connection to room {}", room_id);
        Ok(Disposition::Forward)
    }

    pub(crate) fn on_queue_status(
        &mut self,
        packet: &mut InboundPacket<'_>,
    ) -> Result<Disposition, RoomError> {
        let header = packet.header();
        let reader = packet.reader();
        let room_id = reader.read_legacy_long()?;
        expect_short(reader, 2, "section count")?;
        expect_token(reader, "first section name")?;
        expect_int(reader, 2, "first section type")?;
        expect_short(reader, 1, "entry count")?;
        expect_token(reader, "entry name")?;
        let position = reader.read_i32()? + 1;

        let room = self.require_room(header)?;
        check_room_id(header, &room, room_id)?;

        let was_queued = self.update_state(|state| {
            let was_queued = state.status.is_queued();
            state.status = RoomStatus::Queued { position };
            was_queued
        });

        if was_queued {
            self.emit(RoomEvent::QueuePositionUpdated { room_id, position });
        } else {
            self.emit(RoomEvent::EnteredQueue { room_id, position });
        }
        Ok(Disposition::Forward)
    }

    pub(crate) fn on_spectator(
        &mut self,
        packet: &mut InboundPacket<'_>,
    ) -> Result<Disposition, RoomError> {
        let header = packet.header();
        let room_id = packet.read_legacy_long()?;
        let room = self.require_loading(header)?;
        check_room_id(header, &room, room_id)?;

        self.update_state(|state| state.is_spectating = true);
        self.emit(RoomEvent::Spectating { room_id });
        Ok(Disposition::Forward)
    }

    pub(crate) fn on_room_ready(
        &mut self,
        packet: &mut InboundPacket<'_>,
    ) -> Result<Disposition, RoomError> {
        let model = packet.read_string()?;
        let room_id = packet.read_legacy_long()?;

        match self.status() {
            RoomStatus::Queued { .. } => {
                self.update_state(|state| state.status = RoomStatus::Connecting);
            }
            RoomStatus::Loading | RoomStatus::Active => self.reset(),
            _ => {}
        }

        let room = match self.current_room() {
            Some(room) if room.id() == room_id => {
                room.update_layout(|layout| layout.model = model);
                room
            }
            _ => Arc::new(Room::new(room_id, &model, self.cached_room_data(room_id))),
        };

        self.update_state(|state| {
            state.status = RoomStatus::Loading;
            state.room = Some(room);
        });
        debug!("Entering room {}", room_id);
        self.emit(RoomEvent::Entering { room_id });
        Ok(Disposition::Forward)
    }

    pub(crate) fn on_room_property(
        &mut self,
        packet: &mut InboundPacket<'_>,
    ) -> Result<Disposition, RoomError> {
        let header = packet.header();
        let key = packet.read_string()?;
        let value = packet.read_string()?;
        let room = self.require_loading(header)?;

        let known = room.update_layout(|layout| {
            let property = match key.as_str() {
                "floor" => &mut layout.properties.floor,
                "wallpaper" => &mut layout.properties.wallpaper,
                "landscape" => &mut layout.properties.landscape,
                _ => return false,
            };
            *property = Some(value.clone());
            true
        });
        if !known {
            return Err(RoomError::UnknownProperty { key, value });
        }
        Ok(Disposition::Forward)
    }

    pub(crate) fn on_rights_granted(
        &mut self,
        packet: &mut InboundPacket<'_>,
    ) -> Result<Disposition, RoomError> {
        let header = packet.header();
        let room_id = packet.read_legacy_long()?;
        let rights_level = packet.read_i32()?;
        self.set_rights(header, room_id, rights_level)
    }

    pub(crate) fn on_rights_revoked(
        &mut self,
        packet: &mut InboundPacket<'_>,
    ) -> Result<Disposition, RoomError> {
        let header = packet.header();
        let room_id = packet.read_legacy_long()?;
        self.set_rights(header, room_id, 0)
    }

    fn set_rights(
        &mut self,
        header: Incoming,
        room_id: RoomId,
        rights_level: i32,
    ) -> Result<Disposition, RoomError> {
        let room = self.require_room(header)?;
        check_room_id(header, &room, room_id)?;

        self.update_state(|state| state.rights_level = rights_level);
        self.emit(RoomEvent::RightsUpdated { rights_level });
        Ok(Disposition::Forward)
    }

    pub(crate) fn on_entry_tile(
        &mut self,
        packet: &mut InboundPacket<'_>,
    ) -> Result<Disposition, RoomError> {
        let header = packet.header();
        let x = packet.read_i32()?;
        let y = packet.read_i32()?;
        let direction = packet.read_i32()?;
        let room = self.require_loading(header)?;

        room.update_layout(|layout| {
            layout.door_tile = Some(Tile::new(x, y, 0.0));
            layout.entry_direction = direction;
        });
        Ok(Disposition::Forward)
    }

    pub(crate) fn on_stacking_heightmap(
        &mut self,
        packet: &mut InboundPacket<'_>,
    ) -> Result<Disposition, RoomError> {
        let header = packet.header();
        let heightmap = Heightmap::de(packet.reader())?;
        let room = self.require_loading(header)?;

        room.update_layout(|layout| layout.heightmap = Some(heightmap));
        Ok(Disposition::Forward)
    }

    pub(crate) fn on_stacking_heightmap_diff(
        &mut self,
        packet: &mut InboundPacket<'_>,
    ) -> Result<Disposition, RoomError> {
        let header = packet.header();
        let diff = HeightmapDiff::de(packet.reader())?;
        let room = self.require_room(header)?;

        let written = room.update_layout(|layout| {
            layout
                .heightmap
                .as_mut()
                .map(|heightmap| heightmap.apply(&diff))
        });
        match written {
            Some(written) => {
                trace!("Applied {}/{} heightmap changes", written, diff.changes.len());
                Ok(Disposition::Forward)
            }
            None => Err(RoomError::NoHeightmap { room_id: room.id() }),
        }
    }

    pub(crate) fn on_floor_plan(
        &mut self,
        packet: &mut InboundPacket<'_>,
    ) -> Result<Disposition, RoomError> {
        let header = packet.header();
        let floor_plan = FloorPlan::de(packet.reader())?;
        let room = self.require_loading(header)?;

        room.update_layout(|layout| layout.floor_plan = Some(floor_plan));
        Ok(Disposition::Forward)
    }

    pub(crate) fn on_visualization(
        &mut self,
        packet: &mut InboundPacket<'_>,
    ) -> Result<Disposition, RoomError> {
        let header = packet.header();
        let hide_walls = packet.read_bool()?;
        let wall_thickness = packet.read_i32()?;
        let floor_thickness = packet.read_i32()?;
        let room = self.require_loading(header)?;

        room.update_layout(|layout| {
            layout.hide_walls = hide_walls;
            layout.wall_thickness = wall_thickness;
            layout.floor_thickness = floor_thickness;
        });
        Ok(Disposition::Forward)
    }

    pub(crate) fn on_chat_settings(
        &mut self,
        packet: &mut InboundPacket<'_>,
    ) -> Result<Disposition, RoomError> {
        let header = packet.header();
        let chat_settings = ChatSettings::de(packet.reader())?;
        let room = self.require_room(header)?;
        let Some(data) = room.data() else {
            return Err(RoomError::NoRoomData { room_id: room.id() });
        };

        let data = Arc::new(RoomData {
            chat_settings,
            ..RoomData::clone(&data)
        });
        room.set_data(data.clone());
        self.cache_room_data(&data);
        self.emit(RoomEvent::RoomDataUpdated(data));
        Ok(Disposition::Forward)
    }

    pub(crate) fn on_entry_info(
        &mut self,
        packet: &mut InboundPacket<'_>,
    ) -> Result<Disposition, RoomError> {
        let header = packet.header();
        let room_id = packet.read_legacy_long()?;
        let is_owner = packet.read_bool()?;
        let room = self.require_loading(header)?;
        check_room_id(header, &room, room_id)?;

        if room.data().is_none() {
            if let Some(data) = self.cached_room_data(room_id) {
                room.set_data(data);
            }
        }

        self.update_state(|state| {
            state.is_owner = is_owner;
            state.status = RoomStatus::Active;
        });
        debug!("Entered room {}", room_id);
        self.emit(RoomEvent::Entered(room));
        Ok(Disposition::Forward)
    }

    pub(crate) fn on_close_connection(
        &mut self,
        packet: &mut InboundPacket<'_>,
    ) -> Result<Disposition, RoomError> {
        let header = packet.header();
        let status = self.status();
        if self.current_room().is_none() {
            return Err(RoomError::NoRoom { header });
        }
        if !status.is_resettable() {
            return Err(RoomError::InapplicableState { header, status });
        }

        self.reset();
        Ok(Disposition::Forward)
    }

    pub(crate) fn on_generic_error(
        &mut self,
        packet: &mut InboundPacket<'_>,
    ) -> Result<Disposition, RoomError> {
        let header = packet.header();
        let code = packet.read_i32()?;
        self.require_active(header)?;

        // The avatar walks out later as an ordinary departure
        if code == self.config.kicked_error_code {
            self.emit(RoomEvent::Kicked);
        }
        Ok(Disposition::Forward)
    }

    pub(crate) fn on_doorbell(
        &mut self,
        packet: &mut InboundPacket<'_>,
    ) -> Result<Disposition, RoomError> {
        let header = packet.header();
        let name = packet.read_string()?;
        // Someone else ringing, only rights holders see these
        if !name.is_empty() {
            return Ok(Disposition::Forward);
        }

        let room = self.require_room(header)?;
        let status = self.status();
        if !matches!(status, RoomStatus::Connecting | RoomStatus::Loading) {
            return Err(RoomError::InapplicableState { header, status });
        }

        self.update_state(|state| state.status = RoomStatus::RingingDoorbell);
        self.emit(RoomEvent::DoorbellRinging { room_id: room.id() });
        Ok(Disposition::Forward)
    }

    pub(crate) fn on_doorbell_accepted(
        &mut self,
        packet: &mut InboundPacket<'_>,
    ) -> Result<Disposition, RoomError> {
        let header = packet.header();
        let name = packet.read_string()?;
        if !name.is_empty() {
            return Ok(Disposition::Forward);
        }

        let room = self.require_status(header, RoomStatus::RingingDoorbell)?;
        self.update_state(|state| state.status = RoomStatus::Connecting);
        self.emit(RoomEvent::DoorbellAnswered { room_id: room.id() });
        Ok(Disposition::Forward)
    }

    pub(crate) fn on_doorbell_rejected(
        &mut self,
        packet: &mut InboundPacket<'_>,
    ) -> Result<Disposition, RoomError> {
        let header = packet.header();
        let name = packet.read_string()?;
        if !name.is_empty() {
            return Ok(Disposition::Forward);
        }

        self.require_status(header, RoomStatus::RingingDoorbell)?;
        self.reset();
        Ok(Disposition::Forward)
    }
}
