use roomsync_serde::{PacketReader, PacketWriter, Serde, SerdeErr};

use crate::{
    model::tile::Tile,
    types::{EntityId, EntityIndex, UserId},
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EntityKind {
    User,
    Pet,
    PublicBot,
    PrivateBot,
}

impl EntityKind {
    pub fn from_wire(value: i32) -> Option<Self> {
        match value {
            1 => Some(EntityKind::User),
            2 => Some(EntityKind::Pet),
            3 => Some(EntityKind::PublicBot),
            4 => Some(EntityKind::PrivateBot),
            _ => None,
        }
    }

    pub fn to_wire(self) -> i32 {
        match self {
            EntityKind::User => 1,
            EntityKind::Pet => 2,
            EntityKind::PublicBot => 3,
            EntityKind::PrivateBot => 4,
        }
    }

    pub fn is_bot(self) -> bool {
        matches!(self, EntityKind::PublicBot | EntityKind::PrivateBot)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum Stance {
    #[default]
    Stand,
    Sit,
    Lay,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct UserDetails {
    pub gender: String,
    pub group_id: i64,
    pub group_status: i32,
    pub group_name: String,
    pub swim_figure: String,
    pub achievement_score: i32,
    pub is_moderator: bool,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct PetDetails {
    pub breed: i32,
    pub owner_id: UserId,
    pub owner_name: String,
    pub rarity: i32,
    pub has_saddle: bool,
    pub is_riding: bool,
    pub can_breed: bool,
    pub can_harvest: bool,
    pub can_revive: bool,
    pub has_breeding_permission: bool,
    pub level: i32,
    pub posture: String,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct BotDetails {
    pub gender: String,
    pub owner_id: UserId,
    pub owner_name: String,
    pub skills: Vec<i16>,
}

/// Per-kind trailing fields of an [`Entity`]
#[derive(Clone, Debug, PartialEq)]
pub enum EntityDetails {
    User(UserDetails),
    Pet(PetDetails),
    PublicBot,
    PrivateBot(BotDetails),
}

impl EntityDetails {
    pub fn kind(&self) -> EntityKind {
        match self {
            EntityDetails::User(_) => EntityKind::User,
            EntityDetails::Pet(_) => EntityKind::Pet,
            EntityDetails::PublicBot => EntityKind::PublicBot,
            EntityDetails::PrivateBot(_) => EntityKind::PrivateBot,
        }
    }
}

/// Occupant of the current room.
///
/// `index` is only meaningful for the current visit; `id` is global. The
/// status fields (`head_direction` onwards up to `status`) and the toggles
/// below them are never sent as part of the entity record, they are applied
/// later by status and toggle messages.
#[derive(Clone, Debug, PartialEq)]
pub struct Entity {
    pub id: EntityId,
    pub index: EntityIndex,
    pub name: String,
    pub motto: String,
    pub figure: String,
    pub location: Tile,
    pub direction: i32,
    pub details: EntityDetails,

    pub head_direction: i32,
    pub stance: Stance,
    pub moving_to: Option<Tile>,
    pub control_level: i32,
    pub sign: Option<i32>,
    pub status: String,

    pub is_idle: bool,
    pub is_typing: bool,
    pub is_hidden: bool,
    pub dance: i32,
    pub effect: i32,
    pub hand_item: i32,
}

impl Entity {
    pub fn new(id: EntityId, index: EntityIndex, name: &str, details: EntityDetails) -> Self {
        Self {
            id,
            index,
            name: name.to_string(),
            motto: String::new(),
            figure: String::new(),
            location: Tile::default(),
            direction: 0,
            details,
            head_direction: 0,
            stance: Stance::Stand,
            moving_to: None,
            control_level: 0,
            sign: None,
            status: String::new(),
            is_idle: false,
            is_typing: false,
            is_hidden: false,
            dance: 0,
            effect: 0,
            hand_item: 0,
        }
    }

    pub fn kind(&self) -> EntityKind {
        self.details.kind()
    }

    pub fn is_user(&self) -> bool {
        self.kind() == EntityKind::User
    }

    pub fn is_pet(&self) -> bool {
        self.kind() == EntityKind::Pet
    }

    pub fn is_bot(&self) -> bool {
        self.kind().is_bot()
    }

    /// Gender of users and private bots
    pub fn gender(&self) -> Option<&str> {
        match &self.details {
            EntityDetails::User(user) => Some(&user.gender),
            EntityDetails::PrivateBot(bot) => Some(&bot.gender),
            _ => None,
        }
    }

    /// Applies a status update in place
    pub fn apply_status(&mut self, update: &EntityStatusUpdate) {
        self.location = update.location;
        self.head_direction = update.head_direction;
        self.direction = update.direction;
        self.stance = update.stance;
        self.moving_to = update.moving_to;
        self.control_level = update.control_level.unwrap_or(0);
        self.sign = update.sign;
        self.status = update.status.clone();
    }

    /// Reads a batch of entities prefixed by a legacy-short count
    pub fn de_batch(reader: &mut PacketReader) -> Result<Vec<Entity>, SerdeErr> {
        let count = reader.read_legacy_count()?;
        let mut entities = Vec::with_capacity(count.min(reader.remaining()));
        for _ in 0..count {
            entities.push(Entity::de(reader)?);
        }
        Ok(entities)
    }

    pub fn ser_batch(entities: &[Entity], writer: &mut PacketWriter) {
        writer.write_legacy_count(entities.len());
        for entity in entities {
            entity.ser(writer);
        }
    }
}

impl Serde for Entity {
    fn ser(&self, writer: &mut PacketWriter) {
        writer.write_legacy_long(self.id);
        writer.write_string(&self.name);
        writer.write_string(&self.motto);
        writer.write_string(&self.figure);
        writer.write_i32(self.index);
        self.location.ser(writer);
        writer.write_i32(self.direction);
        writer.write_i32(self.kind().to_wire());

        match &self.details {
            EntityDetails::User(user) => {
                writer.write_string(&user.gender);
                writer.write_legacy_long(user.group_id);
                writer.write_i32(user.group_status);
                writer.write_string(&user.group_name);
                writer.write_string(&user.swim_figure);
                writer.write_i32(user.achievement_score);
                writer.write_bool(user.is_moderator);
            }
            EntityDetails::Pet(pet) => {
                writer.write_i32(pet.breed);
                writer.write_legacy_long(pet.owner_id);
                writer.write_string(&pet.owner_name);
                writer.write_i32(pet.rarity);
                writer.write_bool(pet.has_saddle);
                writer.write_bool(pet.is_riding);
                writer.write_bool(pet.can_breed);
                writer.write_bool(pet.can_harvest);
                writer.write_bool(pet.can_revive);
                writer.write_bool(pet.has_breeding_permission);
                writer.write_i32(pet.level);
                writer.write_string(&pet.posture);
            }
            EntityDetails::PublicBot => {}
            EntityDetails::PrivateBot(bot) => {
                writer.write_string(&bot.gender);
                writer.write_legacy_long(bot.owner_id);
                writer.write_string(&bot.owner_name);
                writer.write_short_count(bot.skills.len());
                for skill in &bot.skills {
                    writer.write_i16(*skill);
                }
            }
        }
    }

    fn de(reader: &mut PacketReader) -> Result<Self, SerdeErr> {
        let id = reader.read_legacy_long()?;
        let name = reader.read_string()?;
        let motto = reader.read_string()?;
        let figure = reader.read_string()?;
        let index = reader.read_i32()?;
        let location = Tile::de(reader)?;
        let direction = reader.read_i32()?;

        let kind_value = reader.read_i32()?;
        let Some(kind) = EntityKind::from_wire(kind_value) else {
            return Err(SerdeErr::InvalidFormat {
                field: "entity kind",
                text: kind_value.to_string(),
            });
        };

        let details = match kind {
            EntityKind::User => EntityDetails::User(UserDetails {
                gender: reader.read_string()?,
                group_id: reader.read_legacy_long()?,
                group_status: reader.read_i32()?,
                group_name: reader.read_string()?,
                swim_figure: reader.read_string()?,
                achievement_score: reader.read_i32()?,
                is_moderator: reader.read_bool()?,
            }),
            EntityKind::Pet => EntityDetails::Pet(PetDetails {
                breed: reader.read_i32()?,
                owner_id: reader.read_legacy_long()?,
                owner_name: reader.read_string()?,
                rarity: reader.read_i32()?,
                has_saddle: reader.read_bool()?,
                is_riding: reader.read_bool()?,
                can_breed: reader.read_bool()?,
                can_harvest: reader.read_bool()?,
                can_revive: reader.read_bool()?,
                has_breeding_permission: reader.read_bool()?,
                level: reader.read_i32()?,
                posture: reader.read_string()?,
            }),
            EntityKind::PublicBot => EntityDetails::PublicBot,
            EntityKind::PrivateBot => {
                let gender = reader.read_string()?;
                let owner_id = reader.read_legacy_long()?;
                let owner_name = reader.read_string()?;
                let count = reader.read_short_count()?;
                let mut skills = Vec::with_capacity(count.min(reader.remaining()));
                for _ in 0..count {
                    skills.push(reader.read_i16()?);
                }
                EntityDetails::PrivateBot(BotDetails {
                    gender,
                    owner_id,
                    owner_name,
                    skills,
                })
            }
        };

        let mut entity = Entity::new(id, index, &name, details);
        entity.motto = motto;
        entity.figure = figure;
        entity.location = location;
        entity.direction = direction;
        Ok(entity)
    }
}

/// Partial update carried by the entity status batch.
///
/// The raw `status` text (`/mv 3,4,0.0/sit 0.5/`) is kept alongside the
/// fields parsed from it.
#[derive(Clone, Debug, PartialEq)]
pub struct EntityStatusUpdate {
    pub index: EntityIndex,
    pub location: Tile,
    pub head_direction: i32,
    pub direction: i32,
    pub status: String,

    pub stance: Stance,
    pub stance_height: Option<f64>,
    pub moving_to: Option<Tile>,
    pub control_level: Option<i32>,
    pub sign: Option<i32>,
}

impl EntityStatusUpdate {
    pub fn new(
        index: EntityIndex,
        location: Tile,
        head_direction: i32,
        direction: i32,
        status: &str,
    ) -> Self {
        let mut update = Self {
            index,
            location,
            head_direction,
            direction,
            status: status.to_string(),
            stance: Stance::Stand,
            stance_height: None,
            moving_to: None,
            control_level: None,
            sign: None,
        };
        update.parse_status();
        update
    }

    fn parse_status(&mut self) {
        for fragment in self.status.split('/').filter(|s| !s.is_empty()) {
            let (key, value) = fragment.split_once(' ').unwrap_or((fragment, ""));
            match key {
                "mv" => self.moving_to = parse_tile(value),
                "sit" => {
                    self.stance = Stance::Sit;
                    self.stance_height = value.trim().parse().ok();
                }
                "lay" => {
                    self.stance = Stance::Lay;
                    self.stance_height = value.trim().parse().ok();
                }
                "flatctrl" => self.control_level = value.trim().parse().ok(),
                "sign" => self.sign = value.trim().parse().ok(),
                _ => {}
            }
        }
    }

    pub fn de_batch(reader: &mut PacketReader) -> Result<Vec<EntityStatusUpdate>, SerdeErr> {
        let count = reader.read_legacy_count()?;
        let mut updates = Vec::with_capacity(count.min(reader.remaining()));
        for _ in 0..count {
            updates.push(EntityStatusUpdate::de(reader)?);
        }
        Ok(updates)
    }

    pub fn ser_batch(updates: &[EntityStatusUpdate], writer: &mut PacketWriter) {
        writer.write_legacy_count(updates.len());
        for update in updates {
            update.ser(writer);
        }
    }
}

fn parse_tile(text: &str) -> Option<Tile> {
    let mut parts = text.split(',');
    let x = parts.next()?.trim().parse().ok()?;
    let y = parts.next()?.trim().parse().ok()?;
    let z = parts.next()?.trim().parse().ok()?;
    Some(Tile::new(x, y, z))
}

impl Serde for EntityStatusUpdate {
    fn ser(&self, writer: &mut PacketWriter) {
        writer.write_i32(self.index);
        self.location.ser(writer);
        writer.write_i32(self.head_direction);
        writer.write_i32(self.direction);
        writer.write_string(&self.status);
    }

    fn de(reader: &mut PacketReader) -> Result<Self, SerdeErr> {
        let index = reader.read_i32()?;
        let location = Tile::de(reader)?;
        let head_direction = reader.read_i32()?;
        let direction = reader.read_i32()?;
        let status = reader.read_string()?;
        Ok(Self::new(index, location, head_direction, direction, &status))
    }
}
