//! # Roomsync Client
//! Keeps a live mirror of the room the local user is visiting (furniture,
//! occupants, layout) from the inbound message stream, and tracks trade
//! negotiations with other occupants.
//!
//! The transport stays outside this crate: it resolves wire headers through
//! a [`Protocol`](roomsync_shared::Protocol), hands each decoded
//! [`InboundPacket`](roomsync_shared::InboundPacket) to the managers here and
//! delivers whatever they push into the [`PacketSink`](roomsync_shared::PacketSink).

#![deny(
    trivial_casts,
    trivial_numeric_casts,
    unstable_features,
    unused_import_braces
)]

pub mod shared {
    pub use roomsync_shared::{
        ChatKind, ChatMessage, Entity, EntityDetails, EntityIndex, EntityKind, FloorItem,
        FloorPlan, Furni, Heightmap, InboundPacket, Incoming, ItemData, ItemId, ItemType,
        Outgoing, OutgoingPacket, PacketSink, Protocol, ProtocolVariant, RoomData, RoomId, Tile,
        TradeOffer, UserId, WallItem, WallLocation,
    };
}

mod error;
mod room;
mod room_config;
mod trade;

pub use error::{AnomalyKind, RoomError};
pub use room::{
    ChatEvent, Disposition, Room, RoomEvent, RoomHandle, RoomLayout, RoomManager, RoomProperties,
    RoomStatus,
};
pub use room_config::RoomConfig;
pub use trade::{TradeError, TradeEvent, TradeManager};
