//! # Roomsync Shared
//! Room data model, message headers, entity registry and furniture store
//! shared by the roomsync crates.

#![deny(trivial_numeric_casts, unstable_features, unused_import_braces)]

pub use roomsync_serde::{PacketReader, PacketWriter, ProtocolVariant, Serde, SerdeErr};

mod messages;
mod model;
mod protocol;
mod types;
mod world;

pub use messages::{
    headers::{Incoming, Outgoing},
    packet::{Destination, Header, InboundPacket, OutgoingPacket, PacketSink},
};
pub use model::{
    chat::{ChatKind, ChatMessage},
    entity::{
        BotDetails, Entity, EntityDetails, EntityKind, EntityStatusUpdate, PetDetails, Stance,
        UserDetails,
    },
    floor_plan::{FloorPlan, Heightmap, HeightmapDiff, HeightmapTile},
    furni::{
        read_floor_items, read_wall_items, write_floor_items, write_wall_items, FloorItem, Furni,
        ItemType, WallItem, WallLocation, WallOrientation,
    },
    item_data::{HighScoreEntry, ItemData, ItemDataKind, ItemDataPayload, LimitedEdition},
    roller::{RollerEntityUpdate, RollerMovement, RollerObjectUpdate, RollerUpdate},
    room_data::{
        ChatSettings, ModerationSettings, RoomAccess, RoomData, RoomGroup, RoomPromotion,
    },
    tile::Tile,
    trade::{TradeItem, TradeOffer},
};
pub use protocol::{Protocol, ProtocolError};
pub use types::{EntityId, EntityIndex, ItemId, RoomId, UserId};
pub use world::{
    entity_registry::EntityRegistry,
    error::{RegistryError, StoreError},
    furni_store::FurniStore,
    item_store::ItemStore,
};
