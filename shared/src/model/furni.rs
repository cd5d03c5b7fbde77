use std::{collections::HashMap, fmt, sync::Arc};

use roomsync_serde::{PacketReader, PacketWriter, Serde, SerdeErr};

use crate::{
    model::{item_data::ItemData, tile::Tile},
    types::{ItemId, UserId},
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ItemType {
    Floor,
    Wall,
}

/// Floor-placed furniture.
///
/// `owner_name` only arrives with single adds, batch loads resolve it from
/// the owner table. `is_hidden` is local and never leaves the client.
#[derive(Clone, Debug, PartialEq)]
pub struct FloorItem {
    pub id: ItemId,
    pub kind: i32,
    pub location: Tile,
    pub direction: i32,
    pub height: f64,
    pub extra: i32,
    pub data: ItemData,
    pub seconds_to_expiration: i32,
    pub usage: i32,
    pub owner_id: UserId,
    pub owner_name: String,
    pub is_hidden: bool,
}

impl FloorItem {
    pub fn new(id: ItemId, kind: i32, location: Tile) -> Self {
        Self {
            id,
            kind,
            location,
            direction: 0,
            height: 0.0,
            extra: 0,
            data: ItemData::default(),
            seconds_to_expiration: -1,
            usage: 0,
            owner_id: 0,
            owner_name: String::new(),
            is_hidden: false,
        }
    }

    /// Reads an item followed by its owner name, as sent by the single add
    /// message
    pub fn de_with_owner(reader: &mut PacketReader) -> Result<Self, SerdeErr> {
        let mut item = Self::de(reader)?;
        item.owner_name = reader.read_string()?;
        Ok(item)
    }

    pub fn ser_with_owner(&self, writer: &mut PacketWriter) {
        self.ser(writer);
        writer.write_string(&self.owner_name);
    }
}

impl Serde for FloorItem {
    fn ser(&self, writer: &mut PacketWriter) {
        writer.write_legacy_long(self.id);
        writer.write_i32(self.kind);
        writer.write_i32(self.location.x);
        writer.write_i32(self.location.y);
        writer.write_i32(self.direction);
        writer.write_legacy_float(self.location.z);
        writer.write_legacy_float(self.height);
        writer.write_i32(self.extra);
        self.data.ser(writer);
        writer.write_i32(self.seconds_to_expiration);
        writer.write_i32(self.usage);
        writer.write_legacy_long(self.owner_id);
    }

    fn de(reader: &mut PacketReader) -> Result<Self, SerdeErr> {
        let id = reader.read_legacy_long()?;
        let kind = reader.read_i32()?;
        let x = reader.read_i32()?;
        let y = reader.read_i32()?;
        let direction = reader.read_i32()?;
        let z = reader.read_legacy_float()?;
        let height = reader.read_legacy_float()?;
        let extra = reader.read_i32()?;
        let data = ItemData::de(reader)?;
        let seconds_to_expiration = reader.read_i32()?;
        let usage = reader.read_i32()?;
        let owner_id = reader.read_legacy_long()?;

        Ok(Self {
            id,
            kind,
            location: Tile::new(x, y, z),
            direction,
            height,
            extra,
            data,
            seconds_to_expiration,
            usage,
            owner_id,
            owner_name: String::new(),
            is_hidden: false,
        })
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum WallOrientation {
    Left,
    Right,
}

impl WallOrientation {
    pub fn as_char(self) -> char {
        match self {
            WallOrientation::Left => 'l',
            WallOrientation::Right => 'r',
        }
    }
}

/// Wall-relative position, written as `:w=WX,WY l=LX,LY O`
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct WallLocation {
    pub wx: i32,
    pub wy: i32,
    pub lx: i32,
    pub ly: i32,
    pub orientation: WallOrientation,
}

impl WallLocation {
    pub fn new(wx: i32, wy: i32, lx: i32, ly: i32, orientation: WallOrientation) -> Self {
        Self {
            wx,
            wy,
            lx,
            ly,
            orientation,
        }
    }

    pub fn parse(text: &str) -> Option<Self> {
        let rest = text.trim().strip_prefix(":w=")?;
        let mut parts = rest.split_whitespace();

        let (wx, wy) = parse_pair(parts.next()?)?;
        let (lx, ly) = parse_pair(parts.next()?.strip_prefix("l=")?)?;
        let orientation = match parts.next()? {
            "l" => WallOrientation::Left,
            "r" => WallOrientation::Right,
            _ => return None,
        };
        if parts.next().is_some() {
            return None;
        }

        Some(Self::new(wx, wy, lx, ly, orientation))
    }
}

fn parse_pair(text: &str) -> Option<(i32, i32)> {
    let (a, b) = text.split_once(',')?;
    Some((a.parse().ok()?, b.parse().ok()?))
}

impl fmt::Display for WallLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            ":w={},{} l={},{} {}",
            self.wx,
            self.wy,
            self.lx,
            self.ly,
            self.orientation.as_char()
        )
    }
}

/// Wall-placed furniture. Same local-field rules as [`FloorItem`].
#[derive(Clone, Debug, PartialEq)]
pub struct WallItem {
    pub id: ItemId,
    pub kind: i32,
    pub location: WallLocation,
    pub data: String,
    pub seconds_to_expiration: i32,
    pub usage: i32,
    pub owner_id: UserId,
    pub owner_name: String,
    pub is_hidden: bool,
}

impl WallItem {
    pub fn new(id: ItemId, kind: i32, location: WallLocation) -> Self {
        Self {
            id,
            kind,
            location,
            data: String::new(),
            seconds_to_expiration: -1,
            usage: 0,
            owner_id: 0,
            owner_name: String::new(),
            is_hidden: false,
        }
    }

    pub fn de_with_owner(reader: &mut PacketReader) -> Result<Self, SerdeErr> {
        let mut item = Self::de(reader)?;
        item.owner_name = reader.read_string()?;
        Ok(item)
    }

    pub fn ser_with_owner(&self, writer: &mut PacketWriter) {
        self.ser(writer);
        writer.write_string(&self.owner_name);
    }
}

impl Serde for WallItem {
    fn ser(&self, writer: &mut PacketWriter) {
        writer.write_id_string(self.id);
        writer.write_i32(self.kind);
        writer.write_string(&self.location.to_string());
        writer.write_string(&self.data);
        writer.write_i32(self.seconds_to_expiration);
        writer.write_i32(self.usage);
        writer.write_legacy_long(self.owner_id);
    }

    fn de(reader: &mut PacketReader) -> Result<Self, SerdeErr> {
        let id = reader.read_id_string()?;
        let kind = reader.read_i32()?;
        let location_text = reader.read_string()?;
        let Some(location) = WallLocation::parse(&location_text) else {
            return Err(SerdeErr::InvalidFormat {
                field: "wall location",
                text: location_text,
            });
        };

        Ok(Self {
            id,
            kind,
            location,
            data: reader.read_string()?,
            seconds_to_expiration: reader.read_i32()?,
            usage: reader.read_i32()?,
            owner_id: reader.read_legacy_long()?,
            owner_name: String::new(),
            is_hidden: false,
        })
    }
}

fn read_owner_table(reader: &mut PacketReader) -> Result<HashMap<UserId, String>, SerdeErr> {
    let count = reader.read_int_count()?;
    let mut owners = HashMap::with_capacity(count.min(reader.remaining()));
    for _ in 0..count {
        let id = reader.read_legacy_long()?;
        let name = reader.read_string()?;
        owners.insert(id, name);
    }
    Ok(owners)
}

fn write_owner_table<'a>(
    writer: &mut PacketWriter,
    owners: impl Iterator<Item = (UserId, &'a str)>,
) {
    let mut seen: Vec<(UserId, &str)> = Vec::new();
    for (id, name) in owners {
        if !seen.iter().any(|(seen_id, _)| *seen_id == id) {
            seen.push((id, name));
        }
    }
    writer.write_int_count(seen.len());
    for (id, name) in seen {
        writer.write_legacy_long(id);
        writer.write_string(name);
    }
}

/// Reads a batch load: an owner table followed by the items
pub fn read_floor_items(reader: &mut PacketReader) -> Result<Vec<FloorItem>, SerdeErr> {
    let owners = read_owner_table(reader)?;
    let count = reader.read_int_count()?;
    let mut items = Vec::with_capacity(count.min(reader.remaining()));
    for _ in 0..count {
        let mut item = FloorItem::de(reader)?;
        if let Some(name) = owners.get(&item.owner_id) {
            item.owner_name = name.clone();
        }
        items.push(item);
    }
    Ok(items)
}

pub fn write_floor_items(writer: &mut PacketWriter, items: &[FloorItem]) {
    write_owner_table(
        writer,
        items
            .iter()
            .map(|item| (item.owner_id, item.owner_name.as_str())),
    );
    writer.write_int_count(items.len());
    for item in items {
        item.ser(writer);
    }
}

pub fn read_wall_items(reader: &mut PacketReader) -> Result<Vec<WallItem>, SerdeErr> {
    let owners = read_owner_table(reader)?;
    let count = reader.read_int_count()?;
    let mut items = Vec::with_capacity(count.min(reader.remaining()));
    for _ in 0..count {
        let mut item = WallItem::de(reader)?;
        if let Some(name) = owners.get(&item.owner_id) {
            item.owner_name = name.clone();
        }
        items.push(item);
    }
    Ok(items)
}

pub fn write_wall_items(writer: &mut PacketWriter, items: &[WallItem]) {
    write_owner_table(
        writer,
        items
            .iter()
            .map(|item| (item.owner_id, item.owner_name.as_str())),
    );
    writer.write_int_count(items.len());
    for item in items {
        item.ser(writer);
    }
}

/// Either kind of furniture, as held by the store
#[derive(Clone, Debug, PartialEq)]
pub enum Furni {
    Floor(Arc<FloorItem>),
    Wall(Arc<WallItem>),
}

impl Furni {
    pub fn item_type(&self) -> ItemType {
        match self {
            Furni::Floor(_) => ItemType::Floor,
            Furni::Wall(_) => ItemType::Wall,
        }
    }

    pub fn id(&self) -> ItemId {
        match self {
            Furni::Floor(item) => item.id,
            Furni::Wall(item) => item.id,
        }
    }

    pub fn kind(&self) -> i32 {
        match self {
            Furni::Floor(item) => item.kind,
            Furni::Wall(item) => item.kind,
        }
    }

    pub fn owner_id(&self) -> UserId {
        match self {
            Furni::Floor(item) => item.owner_id,
            Furni::Wall(item) => item.owner_id,
        }
    }

    pub fn owner_name(&self) -> &str {
        match self {
            Furni::Floor(item) => &item.owner_name,
            Furni::Wall(item) => &item.owner_name,
        }
    }

    pub fn is_hidden(&self) -> bool {
        match self {
            Furni::Floor(item) => item.is_hidden,
            Furni::Wall(item) => item.is_hidden,
        }
    }
}
