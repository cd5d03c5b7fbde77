use roomsync_serde::{PacketReader, PacketWriter, Serde, SerdeErr};

use crate::types::{RoomId, UserId};

const FLAG_GROUP: i32 = 2;
const FLAG_PROMOTION: i32 = 4;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum RoomAccess {
    #[default]
    Open,
    Doorbell,
    Password,
    Invisible,
    Other(i32),
}

impl RoomAccess {
    pub fn from_wire(value: i32) -> Self {
        match value {
            0 => RoomAccess::Open,
            1 => RoomAccess::Doorbell,
            2 => RoomAccess::Password,
            3 => RoomAccess::Invisible,
            other => RoomAccess::Other(other),
        }
    }

    pub fn to_wire(self) -> i32 {
        match self {
            RoomAccess::Open => 0,
            RoomAccess::Doorbell => 1,
            RoomAccess::Password => 2,
            RoomAccess::Invisible => 3,
            RoomAccess::Other(other) => other,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RoomGroup {
    pub id: i64,
    pub name: String,
    pub badge: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RoomPromotion {
    pub name: String,
    pub description: String,
    pub minutes_remaining: i32,
}

/// Who may mute, kick and ban.
///
/// Each setting is a flag set: 0 owner only, 1 rights holders, 2 all users,
/// 4 group admins (rights level 3 and up).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ModerationSettings {
    pub who_can_mute: i32,
    pub who_can_kick: i32,
    pub who_can_ban: i32,
}

impl ModerationSettings {
    pub const OWNER_ONLY: i32 = 0;
    pub const RIGHTS_HOLDERS: i32 = 1;
    pub const ALL_USERS: i32 = 2;
    pub const GROUP_ADMINS: i32 = 4;

    fn allows(setting: i32, rights_level: i32, is_owner: bool) -> bool {
        if is_owner {
            return true;
        }
        match setting {
            Self::ALL_USERS => true,
            Self::RIGHTS_HOLDERS => rights_level > 0,
            s if s == Self::RIGHTS_HOLDERS | Self::GROUP_ADMINS => rights_level > 0,
            Self::GROUP_ADMINS => rights_level >= 3,
            _ => false,
        }
    }

    pub fn can_mute(&self, rights_level: i32, is_owner: bool) -> bool {
        Self::allows(self.who_can_mute, rights_level, is_owner)
    }

    pub fn can_kick(&self, rights_level: i32, is_owner: bool) -> bool {
        Self::allows(self.who_can_kick, rights_level, is_owner)
    }

    pub fn can_ban(&self, rights_level: i32, is_owner: bool) -> bool {
        Self::allows(self.who_can_ban, rights_level, is_owner)
    }
}

impl Serde for ModerationSettings {
    fn ser(&self, writer: &mut PacketWriter) {
        writer.write_i32(self.who_can_mute);
        writer.write_i32(self.who_can_kick);
        writer.write_i32(self.who_can_ban);
    }

    fn de(reader: &mut PacketReader) -> Result<Self, SerdeErr> {
        Ok(Self {
            who_can_mute: reader.read_i32()?,
            who_can_kick: reader.read_i32()?,
            who_can_ban: reader.read_i32()?,
        })
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ChatSettings {
    pub flow: i32,
    pub bubble_width: i32,
    pub scroll_speed: i32,
    pub hearing_distance: i32,
    pub flood_protection: i32,
}

impl Default for ChatSettings {
    fn default() -> Self {
        Self {
            flow: 0,
            bubble_width: 1,
            scroll_speed: 1,
            hearing_distance: 14,
            flood_protection: 1,
        }
    }
}

impl Serde for ChatSettings {
    fn ser(&self, writer: &mut PacketWriter) {
        writer.write_i32(self.flow);
        writer.write_i32(self.bubble_width);
        writer.write_i32(self.scroll_speed);
        writer.write_i32(self.hearing_distance);
        writer.write_i32(self.flood_protection);
    }

    fn de(reader: &mut PacketReader) -> Result<Self, SerdeErr> {
        Ok(Self {
            flow: reader.read_i32()?,
            bubble_width: reader.read_i32()?,
            scroll_speed: reader.read_i32()?,
            hearing_distance: reader.read_i32()?,
            flood_protection: reader.read_i32()?,
        })
    }
}

/// Room metadata, fetched independently of room entry and cached by id
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RoomData {
    pub is_entering: bool,
    pub id: RoomId,
    pub name: String,
    pub owner_id: UserId,
    pub owner_name: String,
    pub access: RoomAccess,
    pub users: i32,
    pub max_users: i32,
    pub description: String,
    pub trading: i32,
    pub score: i32,
    pub ranking: i32,
    pub category: i32,
    pub tags: Vec<String>,
    /// Raw flag bits other than the group and promotion bits
    pub flags: i32,
    pub group: Option<RoomGroup>,
    pub promotion: Option<RoomPromotion>,
    pub forward: bool,
    pub staff_pick: bool,
    pub is_group_member: bool,
    pub all_muted: bool,
    pub moderation: ModerationSettings,
    pub can_mute: bool,
    pub chat_settings: ChatSettings,
}

impl Serde for RoomData {
    fn ser(&self, writer: &mut PacketWriter) {
        writer.write_bool(self.is_entering);
        writer.write_legacy_long(self.id);
        writer.write_string(&self.name);
        writer.write_legacy_long(self.owner_id);
        writer.write_string(&self.owner_name);
        writer.write_i32(self.access.to_wire());
        writer.write_i32(self.users);
        writer.write_i32(self.max_users);
        writer.write_string(&self.description);
        writer.write_i32(self.trading);
        writer.write_i32(self.score);
        writer.write_i32(self.ranking);
        writer.write_i32(self.category);
        writer.write_int_count(self.tags.len());
        for tag in &self.tags {
            writer.write_string(tag);
        }

        let mut flags = self.flags & !FLAG_GROUP & !FLAG_PROMOTION;
        if self.group.is_some() {
            flags |= FLAG_GROUP;
        }
        if self.promotion.is_some() {
            flags |= FLAG_PROMOTION;
        }
        writer.write_i32(flags);

        if let Some(group) = &self.group {
            writer.write_legacy_long(group.id);
            writer.write_string(&group.name);
            writer.write_string(&group.badge);
        }
        if let Some(promotion) = &self.promotion {
            writer.write_string(&promotion.name);
            writer.write_string(&promotion.description);
            writer.write_i32(promotion.minutes_remaining);
        }

        writer.write_bool(self.forward);
        writer.write_bool(self.staff_pick);
        writer.write_bool(self.is_group_member);
        writer.write_bool(self.all_muted);
        self.moderation.ser(writer);
        writer.write_bool(self.can_mute);
        self.chat_settings.ser(writer);
    }

    fn de(reader: &mut PacketReader) -> Result<Self, SerdeErr> {
        let is_entering = reader.read_bool()?;
        let id = reader.read_legacy_long()?;
        let name = reader.read_string()?;
        let owner_id = reader.read_legacy_long()?;
        let owner_name = reader.read_string()?;
        let access = RoomAccess::from_wire(reader.read_i32()?);
        let users = reader.read_i32()?;
        let max_users = reader.read_i32()?;
        let description = reader.read_string()?;
        let trading = reader.read_i32()?;
        let score = reader.read_i32()?;
        let ranking = reader.read_i32()?;
        let category = reader.read_i32()?;

        let tag_count = reader.read_int_count()?;
        let mut tags = Vec::with_capacity(tag_count.min(reader.remaining()));
        for _ in 0..tag_count {
            tags.push(reader.read_string()?);
        }

        let flags = reader.read_i32()?;
        let group = if flags & FLAG_GROUP != 0 {
            Some(RoomGroup {
                id: reader.read_legacy_long()?,
                name: reader.read_string()?,
                badge: reader.read_string()?,
            })
        } else {
            None
        };
        let promotion = if flags & FLAG_PROMOTION != 0 {
            Some(RoomPromotion {
                name: reader.read_string()?,
                description: reader.read_string()?,
                minutes_remaining: reader.read_i32()?,
            })
        } else {
            None
        };

        Ok(Self {
            is_entering,
            id,
            name,
            owner_id,
            owner_name,
            access,
            users,
            max_users,
            description,
            trading,
            score,
            ranking,
            category,
            tags,
            flags: flags & !FLAG_GROUP & !FLAG_PROMOTION,
            group,
            promotion,
            forward: reader.read_bool()?,
            staff_pick: reader.read_bool()?,
            is_group_member: reader.read_bool()?,
            all_muted: reader.read_bool()?,
            moderation: ModerationSettings::de(reader)?,
            can_mute: reader.read_bool()?,
            chat_settings: ChatSettings::de(reader)?,
        })
    }
}
