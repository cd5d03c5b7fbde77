use std::sync::Arc;

use roomsync_shared::{
    ChatKind, ChatMessage, Entity, FloorItem, Furni, ItemData, RoomData, RoomId, Tile, WallItem,
};

use crate::room::current::Room;

/// Whether the client should still see the message that was just handled
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Disposition {
    Forward,
    Block,
}

/// Chat line from an occupant. Listeners may block it from reaching the
/// client.
#[derive(Clone, Debug, PartialEq)]
pub struct ChatEvent {
    pub entity: Entity,
    pub kind: ChatKind,
    pub message: ChatMessage,
    blocked: bool,
}

impl ChatEvent {
    pub(crate) fn new(entity: Entity, kind: ChatKind, message: ChatMessage) -> Self {
        Self {
            entity,
            kind,
            message,
            blocked: false,
        }
    }

    pub fn block(&mut self) {
        self.blocked = true;
    }

    pub fn is_blocked(&self) -> bool {
        self.blocked
    }
}

/// One variant per observable change to the room.
///
/// Updates carry the previous value next to the new one where a consumer
/// would otherwise have to track it.
#[derive(Clone, Debug)]
pub enum RoomEvent {
    EnteredQueue {
        room_id: RoomId,
        position: i32,
    },
    QueuePositionUpdated {
        room_id: RoomId,
        position: i32,
    },
    Entering {
        room_id: RoomId,
    },
    Entered(Arc<Room>),
    RoomDataUpdated(Arc<RoomData>),
    Left,
    Kicked,
    RightsUpdated {
        rights_level: i32,
    },
    Spectating {
        room_id: RoomId,
    },
    DoorbellRinging {
        room_id: RoomId,
    },
    DoorbellAnswered {
        room_id: RoomId,
    },

    FloorItemsLoaded(Vec<Arc<FloorItem>>),
    FloorItemAdded(Arc<FloorItem>),
    FloorItemUpdated {
        previous: Arc<FloorItem>,
        updated: Arc<FloorItem>,
    },
    FloorItemDataUpdated {
        item: Arc<FloorItem>,
        previous_data: ItemData,
    },
    DiceUpdated {
        item: Arc<FloorItem>,
        previous_value: i32,
    },
    FloorItemSlide {
        item: Arc<FloorItem>,
        previous_tile: Tile,
        roller_id: i64,
    },
    FloorItemRemoved(Arc<FloorItem>),

    WallItemsLoaded(Vec<Arc<WallItem>>),
    WallItemAdded(Arc<WallItem>),
    WallItemUpdated {
        previous: Arc<WallItem>,
        updated: Arc<WallItem>,
    },
    WallItemRemoved(Arc<WallItem>),

    FurniVisibilityToggled(Furni),

    EntitiesAdded(Vec<Entity>),
    EntitiesUpdated(Vec<Entity>),
    EntityRemoved(Entity),
    EntitySlide {
        entity: Entity,
        previous_tile: Tile,
        roller_id: i64,
    },
    EntityDataUpdated {
        entity: Entity,
        previous_figure: String,
        previous_gender: Option<String>,
        previous_motto: String,
        previous_achievement_score: Option<i32>,
    },
    EntityNameChanged {
        entity: Entity,
        previous_name: String,
    },
    EntityIdle {
        entity: Entity,
        was_idle: bool,
    },
    EntityDance {
        entity: Entity,
        previous_dance: i32,
    },
    EntityHandItem {
        entity: Entity,
        previous_item: i32,
    },
    EntityEffect {
        entity: Entity,
        previous_effect: i32,
    },
    EntityAction {
        entity: Entity,
        action: i32,
    },
    EntityTyping {
        entity: Entity,
        was_typing: bool,
    },
    EntityVisibilityToggled(Entity),

    Chat(ChatEvent),
}

impl RoomEvent {
    pub fn name(&self) -> &'static str {
        match self {
            RoomEvent::EnteredQueue { .. } => "EnteredQueue",
            RoomEvent::QueuePositionUpdated { .. } => "QueuePositionUpdated",
            RoomEvent::Entering { .. } => "Entering",
            RoomEvent::Entered(_) => "Entered",
            RoomEvent::RoomDataUpdated(_) => "RoomDataUpdated",
            RoomEvent::Left => "Left",
            RoomEvent::Kicked => "Kicked",
            RoomEvent::RightsUpdated { .. } => "RightsUpdated",
            RoomEvent::Spectating { .. } => "Spectating",
            RoomEvent::DoorbellRinging { .. } => "DoorbellRinging",
            RoomEvent::DoorbellAnswered { .. } => "DoorbellAnswered",
            RoomEvent::FloorItemsLoaded(_) => "FloorItemsLoaded",
            RoomEvent::FloorItemAdded(_) => "FloorItemAdded",
            RoomEvent::FloorItemUpdated { .. } => "FloorItemUpdated",
            RoomEvent::FloorItemDataUpdated { .. } => "FloorItemDataUpdated",
            RoomEvent::DiceUpdated { .. } => "DiceUpdated",
            RoomEvent::FloorItemSlide { .. } => "FloorItemSlide",
            RoomEvent::FloorItemRemoved(_) => "FloorItemRemoved",
            RoomEvent::WallItemsLoaded(_) => "WallItemsLoaded",
            RoomEvent::WallItemAdded(_) => "WallItemAdded",
            RoomEvent::WallItemUpdated { .. } => "WallItemUpdated",
            RoomEvent::WallItemRemoved(_) => "WallItemRemoved",
            RoomEvent::FurniVisibilityToggled(_) => "FurniVisibilityToggled",
            RoomEvent::EntitiesAdded(_) => "EntitiesAdded",
            RoomEvent::EntitiesUpdated(_) => "EntitiesUpdated",
            RoomEvent::EntityRemoved(_) => "EntityRemoved",
            RoomEvent::EntitySlide { .. } => "EntitySlide",
            RoomEvent::EntityDataUpdated { .. } => "EntityDataUpdated",
            RoomEvent::EntityNameChanged { .. } => "EntityNameChanged",
            RoomEvent::EntityIdle { .. } => "EntityIdle",
            RoomEvent::EntityDance { .. } => "EntityDance",
            RoomEvent::EntityHandItem { .. } => "EntityHandItem",
            RoomEvent::EntityEffect { .. } => "EntityEffect",
            RoomEvent::EntityAction { .. } => "EntityAction",
            RoomEvent::EntityTyping { .. } => "EntityTyping",
            RoomEvent::EntityVisibilityToggled(_) => "EntityVisibilityToggled",
            RoomEvent::Chat(_) => "Chat",
        }
    }
}
