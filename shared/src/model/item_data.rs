use roomsync_serde::{PacketReader, PacketWriter, Serde, SerdeErr};

const KIND_MASK: i32 = 0xFF;
const LIMITED_FLAG: i32 = 0x100;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ItemDataKind {
    Legacy,
    Map,
    StringArray,
    VoteResult,
    Empty,
    IntArray,
    HighScore,
    CrackableFurni,
}

impl ItemDataKind {
    pub fn from_wire(value: i32) -> Option<Self> {
        match value {
            0 => Some(ItemDataKind::Legacy),
            1 => Some(ItemDataKind::Map),
            2 => Some(ItemDataKind::StringArray),
            3 => Some(ItemDataKind::VoteResult),
            4 => Some(ItemDataKind::Empty),
            5 => Some(ItemDataKind::IntArray),
            6 => Some(ItemDataKind::HighScore),
            7 => Some(ItemDataKind::CrackableFurni),
            _ => None,
        }
    }

    pub fn to_wire(self) -> i32 {
        match self {
            ItemDataKind::Legacy => 0,
            ItemDataKind::Map => 1,
            ItemDataKind::StringArray => 2,
            ItemDataKind::VoteResult => 3,
            ItemDataKind::Empty => 4,
            ItemDataKind::IntArray => 5,
            ItemDataKind::HighScore => 6,
            ItemDataKind::CrackableFurni => 7,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LimitedEdition {
    pub serial: i32,
    pub total: i32,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HighScoreEntry {
    pub value: i32,
    pub users: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ItemDataPayload {
    Legacy {
        value: String,
    },
    Map(Vec<(String, String)>),
    StringArray(Vec<String>),
    VoteResult {
        value: String,
        result: i32,
    },
    Empty,
    IntArray(Vec<i32>),
    HighScore {
        value: String,
        score_type: i32,
        clear_type: i32,
        entries: Vec<HighScoreEntry>,
    },
    CrackableFurni {
        value: String,
        hits: i32,
        target: i32,
    },
}

/// Opaque stateful payload attached to a furniture item.
///
/// `flags` holds the format bits above the kind byte, minus the limited
/// edition flag which is derived from `limited`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ItemData {
    pub flags: i32,
    pub payload: ItemDataPayload,
    pub limited: Option<LimitedEdition>,
}

impl Default for ItemData {
    fn default() -> Self {
        Self::legacy("")
    }
}

impl ItemData {
    pub fn new(payload: ItemDataPayload) -> Self {
        Self {
            flags: 0,
            payload,
            limited: None,
        }
    }

    pub fn legacy(value: &str) -> Self {
        Self::new(ItemDataPayload::Legacy {
            value: value.to_string(),
        })
    }

    pub fn kind(&self) -> ItemDataKind {
        match &self.payload {
            ItemDataPayload::Legacy { .. } => ItemDataKind::Legacy,
            ItemDataPayload::Map(_) => ItemDataKind::Map,
            ItemDataPayload::StringArray(_) => ItemDataKind::StringArray,
            ItemDataPayload::VoteResult { .. } => ItemDataKind::VoteResult,
            ItemDataPayload::Empty => ItemDataKind::Empty,
            ItemDataPayload::IntArray(_) => ItemDataKind::IntArray,
            ItemDataPayload::HighScore { .. } => ItemDataKind::HighScore,
            ItemDataPayload::CrackableFurni { .. } => ItemDataKind::CrackableFurni,
        }
    }

    /// Primary text value. Maps expose their `state` entry and string
    /// arrays their first element.
    pub fn value(&self) -> Option<&str> {
        match &self.payload {
            ItemDataPayload::Legacy { value }
            | ItemDataPayload::VoteResult { value, .. }
            | ItemDataPayload::HighScore { value, .. }
            | ItemDataPayload::CrackableFurni { value, .. } => Some(value),
            ItemDataPayload::Map(entries) => entries
                .iter()
                .find(|(key, _)| key == "state")
                .map(|(_, value)| value.as_str()),
            ItemDataPayload::StringArray(values) => values.first().map(String::as_str),
            ItemDataPayload::Empty | ItemDataPayload::IntArray(_) => None,
        }
    }

    /// Value parsed as an integer, or -1 when it is not one
    pub fn state(&self) -> i32 {
        if let ItemDataPayload::IntArray(values) = &self.payload {
            return values.first().copied().unwrap_or(-1);
        }
        self.value()
            .and_then(|value| value.trim().parse().ok())
            .unwrap_or(-1)
    }

    pub fn set_value(&mut self, new_value: String) {
        if self.payload == ItemDataPayload::Empty {
            self.payload = ItemDataPayload::Legacy { value: new_value };
            return;
        }
        match &mut self.payload {
            ItemDataPayload::Legacy { value }
            | ItemDataPayload::VoteResult { value, .. }
            | ItemDataPayload::HighScore { value, .. }
            | ItemDataPayload::CrackableFurni { value, .. } => *value = new_value,
            ItemDataPayload::Map(entries) => {
                match entries.iter_mut().find(|(key, _)| key == "state") {
                    Some((_, value)) => *value = new_value,
                    None => entries.push(("state".to_string(), new_value)),
                }
            }
            ItemDataPayload::StringArray(values) => match values.first_mut() {
                Some(value) => *value = new_value,
                None => values.push(new_value),
            },
            ItemDataPayload::IntArray(values) => {
                if let Ok(parsed) = new_value.trim().parse() {
                    match values.first_mut() {
                        Some(value) => *value = parsed,
                        None => values.push(parsed),
                    }
                }
            }
            ItemDataPayload::Empty => {}
        }
    }
}

impl Serde for ItemData {
    fn ser(&self, writer: &mut PacketWriter) {
        let mut format = (self.flags & !KIND_MASK & !LIMITED_FLAG) | self.kind().to_wire();
        if self.limited.is_some() {
            format |= LIMITED_FLAG;
        }
        writer.write_i32(format);

        match &self.payload {
            ItemDataPayload::Legacy { value } => writer.write_string(value),
            ItemDataPayload::Map(entries) => {
                writer.write_int_count(entries.len());
                for (key, value) in entries {
                    writer.write_string(key);
                    writer.write_string(value);
                }
            }
            ItemDataPayload::StringArray(values) => {
                writer.write_int_count(values.len());
                for value in values {
                    writer.write_string(value);
                }
            }
            ItemDataPayload::VoteResult { value, result } => {
                writer.write_string(value);
                writer.write_i32(*result);
            }
            ItemDataPayload::Empty => {}
            ItemDataPayload::IntArray(values) => {
                writer.write_int_count(values.len());
                for value in values {
                    writer.write_i32(*value);
                }
            }
            ItemDataPayload::HighScore {
                value,
                score_type,
                clear_type,
                entries,
            } => {
                writer.write_string(value);
                writer.write_i32(*score_type);
                writer.write_i32(*clear_type);
                writer.write_int_count(entries.len());
                for entry in entries {
                    writer.write_i32(entry.value);
                    writer.write_int_count(entry.users.len());
                    for user in &entry.users {
                        writer.write_string(user);
                    }
                }
            }
            ItemDataPayload::CrackableFurni {
                value,
                hits,
                target,
            } => {
                writer.write_string(value);
                writer.write_i32(*hits);
                writer.write_i32(*target);
            }
        }

        if let Some(limited) = &self.limited {
            writer.write_i32(limited.serial);
            writer.write_i32(limited.total);
        }
    }

    fn de(reader: &mut PacketReader) -> Result<Self, SerdeErr> {
        let format = reader.read_i32()?;
        let Some(kind) = ItemDataKind::from_wire(format & KIND_MASK) else {
            return Err(SerdeErr::InvalidFormat {
                field: "item data kind",
                text: format.to_string(),
            });
        };

        let payload = match kind {
            ItemDataKind::Legacy => ItemDataPayload::Legacy {
                value: reader.read_string()?,
            },
            ItemDataKind::Map => {
                let count = reader.read_int_count()?;
                let mut entries = Vec::with_capacity(count.min(reader.remaining()));
                for _ in 0..count {
                    entries.push((reader.read_string()?, reader.read_string()?));
                }
                ItemDataPayload::Map(entries)
            }
            ItemDataKind::StringArray => {
                let count = reader.read_int_count()?;
                let mut values = Vec::with_capacity(count.min(reader.remaining()));
                for _ in 0..count {
                    values.push(reader.read_string()?);
                }
                ItemDataPayload::StringArray(values)
            }
            ItemDataKind::VoteResult => ItemDataPayload::VoteResult {
                value: reader.read_string()?,
                result: reader.read_i32()?,
            },
            ItemDataKind::Empty => ItemDataPayload::Empty,
            ItemDataKind::IntArray => {
                let count = reader.read_int_count()?;
                let mut values = Vec::with_capacity(count.min(reader.remaining()));
                for _ in 0..count {
                    values.push(reader.read_i32()?);
                }
                ItemDataPayload::IntArray(values)
            }
            ItemDataKind::HighScore => {
                let value = reader.read_string()?;
                let score_type = reader.read_i32()?;
                let clear_type = reader.read_i32()?;
                let count = reader.read_int_count()?;
                let mut entries = Vec::with_capacity(count.min(reader.remaining()));
                for _ in 0..count {
                    let score = reader.read_i32()?;
                    let user_count = reader.read_int_count()?;
                    let mut users = Vec::with_capacity(user_count.min(reader.remaining()));
                    for _ in 0..user_count {
                        users.push(reader.read_string()?);
                    }
                    entries.push(HighScoreEntry {
                        value: score,
                        users,
                    });
                }
                ItemDataPayload::HighScore {
                    value,
                    score_type,
                    clear_type,
                    entries,
                }
            }
            ItemDataKind::CrackableFurni => ItemDataPayload::CrackableFurni {
                value: reader.read_string()?,
                hits: reader.read_i32()?,
                target: reader.read_i32()?,
            },
        };

        let limited = if format & LIMITED_FLAG != 0 {
            Some(LimitedEdition {
                serial: reader.read_i32()?,
                total: reader.read_i32()?,
            })
        } else {
            None
        };

        Ok(Self {
            flags: format & !KIND_MASK & !LIMITED_FLAG,
            payload,
            limited,
        })
    }
}
