use log::trace;

use roomsync_shared::{
    ChatKind, ChatMessage, Entity, EntityDetails, EntityStatusUpdate, InboundPacket, Incoming,
    Serde,
};

use crate::{
    error::RoomError,
    room::{
        events::{ChatEvent, Disposition, RoomEvent},
        manager::RoomManager,
    },
};

fn chat_kind(header: Incoming) -> Option<ChatKind> {
    match header {
        Incoming::Whisper => Some(ChatKind::Whisper),
        Incoming::Talk => Some(ChatKind::Talk),
        Incoming::Shout => Some(ChatKind::Shout),
        _ => None,
    }
}

impl RoomManager {
    pub(crate) fn on_entities_added(
        &mut self,
        packet: &mut InboundPacket<'_>,
    ) -> Result<Disposition, RoomError> {
        let header = packet.header();
        let entities = Entity::de_batch(packet.reader())?;
        let room = self.require_active(header)?;

        let mut added = Vec::with_capacity(entities.len());
        for entity in entities {
            match room.entities().add(entity.clone()) {
                Ok(()) => added.push(entity),
                Err(error) => self.report(&RoomError::from(error)),
            }
        }

        trace!("Added {} entities", added.len());
        if !added.is_empty() {
            self.emit(RoomEvent::EntitiesAdded(added));
        }
        Ok(Disposition::Forward)
    }

    pub(crate) fn on_entity_removed(
        &mut self,
        packet: &mut InboundPacket<'_>,
    ) -> Result<Disposition, RoomError> {
        let header = packet.header();
        let index = packet.read_index_string()?;
        let room = self.require_active(header)?;

        let entity = room
            .entities()
            .remove(index)
            .ok_or(RoomError::EntityNotFound { index })?;
        self.emit(RoomEvent::EntityRemoved(entity));
        Ok(Disposition::Forward)
    }

    pub(crate) fn on_entity_status(
        &mut self,
        packet: &mut InboundPacket<'_>,
    ) -> Result<Disposition, RoomError> {
        let header = packet.header();
        let updates = EntityStatusUpdate::de_batch(packet.reader())?;
        let room = self.require_active(header)?;

        let mut updated = Vec::with_capacity(updates.len());
        for update in &updates {
            match room.entities().update(update.index, update) {
                Ok(entity) => updated.push(entity),
                Err(error) => self.report(&RoomError::from(error)),
            }
        }

        if !updated.is_empty() {
            self.emit(RoomEvent::EntitiesUpdated(updated));
        }
        Ok(Disposition::Forward)
    }

    pub(crate) fn on_avatar_update(
        &mut self,
        packet: &mut InboundPacket<'_>,
    ) -> Result<Disposition, RoomError> {
        let header = packet.header();
        let index = packet.read_i32()?;
        let figure = packet.read_string()?;
        let gender = packet.read_string()?;
        let motto = packet.read_string()?;
        let achievement_score = packet.read_i32()?;
        let room = self.require_active(header)?;

        let event = room.entities().with_entity_mut(index, |entity| {
            let previous_figure = std::mem::replace(&mut entity.figure, figure);
            let previous_motto = std::mem::replace(&mut entity.motto, motto);
            let (previous_gender, previous_achievement_score) = match &mut entity.details {
                EntityDetails::User(user) => (
                    Some(std::mem::replace(&mut user.gender, gender)),
                    Some(std::mem::replace(
                        &mut user.achievement_score,
                        achievement_score,
                    )),
                ),
                EntityDetails::PrivateBot(bot) => {
                    (Some(std::mem::replace(&mut bot.gender, gender)), None)
                }
                _ => (None, None),
            };
            RoomEvent::EntityDataUpdated {
                entity: entity.clone(),
                previous_figure,
                previous_gender,
                previous_motto,
                previous_achievement_score,
            }
        })?;
        self.emit(event);
        Ok(Disposition::Forward)
    }

    pub(crate) fn on_name_changed(
        &mut self,
        packet: &mut InboundPacket<'_>,
    ) -> Result<Disposition, RoomError> {
        let header = packet.header();
        let _id = packet.read_legacy_long()?;
        let index = packet.read_i32()?;
        let name = packet.read_string()?;
        let room = self.require_active(header)?;

        let event = room.entities().with_entity_mut(index, |entity| {
            let previous_name = std::mem::replace(&mut entity.name, name);
            RoomEvent::EntityNameChanged {
                entity: entity.clone(),
                previous_name,
            }
        })?;
        self.emit(event);
        Ok(Disposition::Forward)
    }

    pub(crate) fn on_idle(
        &mut self,
        packet: &mut InboundPacket<'_>,
    ) -> Result<Disposition, RoomError> {
        let header = packet.header();
        let index = packet.read_i32()?;
        let is_idle = packet.read_bool()?;
        let room = self.require_active(header)?;

        let event = room.entities().with_entity_mut(index, |entity| {
            let was_idle = std::mem::replace(&mut entity.is_idle, is_idle);
            RoomEvent::EntityIdle {
                entity: entity.clone(),
                was_idle,
            }
        })?;
        self.emit(event);
        Ok(Disposition::Forward)
    }

    pub(crate) fn on_dance(
        &mut self,
        packet: &mut InboundPacket<'_>,
    ) -> Result<Disposition, RoomError> {
        let header = packet.header();
        let index = packet.read_i32()?;
        let dance = packet.read_i32()?;
        let room = self.require_active(header)?;

        let event = room.entities().with_entity_mut(index, |entity| {
            let previous_dance = std::mem::replace(&mut entity.dance, dance);
            RoomEvent::EntityDance {
                entity: entity.clone(),
                previous_dance,
            }
        })?;
        self.emit(event);
        Ok(Disposition::Forward)
    }

    /// Wave, blow a kiss, laugh and the like. Nothing is stored.
    pub(crate) fn on_expression(
        &mut self,
        packet: &mut InboundPacket<'_>,
    ) -> Result<Disposition, RoomError> {
        let header = packet.header();
        let index = packet.read_i32()?;
        let action = packet.read_i32()?;
        let room = self.require_active(header)?;

        let entity = room
            .entities()
            .get(index)
            .ok_or(RoomError::EntityNotFound { index })?;
        self.emit(RoomEvent::EntityAction { entity, action });
        Ok(Disposition::Forward)
    }

    pub(crate) fn on_hand_item(
        &mut self,
        packet: &mut InboundPacket<'_>,
    ) -> Result<Disposition, RoomError> {
        let header = packet.header();
        let index = packet.read_i32()?;
        let hand_item = packet.read_i32()?;
        let room = self.require_active(header)?;

        let event = room.entities().with_entity_mut(index, |entity| {
            let previous_item = std::mem::replace(&mut entity.hand_item, hand_item);
            RoomEvent::EntityHandItem {
                entity: entity.clone(),
                previous_item,
            }
        })?;
        self.emit(event);
        Ok(Disposition::Forward)
    }

    pub(crate) fn on_effect(
        &mut self,
        packet: &mut InboundPacket<'_>,
    ) -> Result<Disposition, RoomError> {
        let header = packet.header();
        let index = packet.read_i32()?;
        let effect = packet.read_i32()?;
        let room = self.require_active(header)?;

        let event = room.entities().with_entity_mut(index, |entity| {
            let previous_effect = std::mem::replace(&mut entity.effect, effect);
            RoomEvent::EntityEffect {
                entity: entity.clone(),
                previous_effect,
            }
        })?;
        self.emit(event);
        Ok(Disposition::Forward)
    }

    pub(crate) fn on_typing(
        &mut self,
        packet: &mut InboundPacket<'_>,
    ) -> Result<Disposition, RoomError> {
        let header = packet.header();
        let index = packet.read_i32()?;
        let is_typing = packet.read_i32()? != 0;
        let room = self.require_active(header)?;

        let event = room.entities().with_entity_mut(index, |entity| {
            let was_typing = std::mem::replace(&mut entity.is_typing, is_typing);
            RoomEvent::EntityTyping {
                entity: entity.clone(),
                was_typing,
            }
        })?;
        self.emit(event);
        Ok(Disposition::Forward)
    }

    /// Whisper, talk and shout. Blocked when a listener blocks the event or
    /// the speaker is hidden locally.
    pub(crate) fn on_chat(
        &mut self,
        packet: &mut InboundPacket<'_>,
    ) -> Result<Disposition, RoomError> {
        let header = packet.header();
        let Some(kind) = chat_kind(header) else {
            return Err(RoomError::UnknownChatHeader { header });
        };
        let message = ChatMessage::de(packet.reader())?;
        let room = self.require_active(header)?;

        let index = message.index;
        let entity = room
            .entities()
            .get(index)
            .ok_or(RoomError::EntityNotFound { index })?;
        let is_hidden = entity.is_hidden;

        let event = self.emit(RoomEvent::Chat(ChatEvent::new(entity, kind, message)));
        let blocked = matches!(&event, RoomEvent::Chat(chat) if chat.is_blocked());

        if blocked || (is_hidden && self.config.block_hidden_entity_chat) {
            Ok(Disposition::Block)
        } else {
            Ok(Disposition::Forward)
        }
    }
}
