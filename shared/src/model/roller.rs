use roomsync_serde::{PacketReader, PacketWriter, Serde, SerdeErr};

use crate::types::{EntityIndex, ItemId};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RollerObjectUpdate {
    pub id: ItemId,
    pub from_z: f64,
    pub to_z: f64,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RollerEntityUpdate {
    pub index: EntityIndex,
    pub from_z: f64,
    pub to_z: f64,
}

/// Occupant carried along with the items, if any
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum RollerMovement {
    #[default]
    None,
    Moving(RollerEntityUpdate),
    Stationary(RollerEntityUpdate),
}

impl RollerMovement {
    pub fn entity(&self) -> Option<&RollerEntityUpdate> {
        match self {
            RollerMovement::None => None,
            RollerMovement::Moving(update) | RollerMovement::Stationary(update) => Some(update),
        }
    }
}

/// Batch of items (and optionally one occupant) moved by a roller to one
/// destination tile.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RollerUpdate {
    pub from_x: i32,
    pub from_y: i32,
    pub to_x: i32,
    pub to_y: i32,
    pub objects: Vec<RollerObjectUpdate>,
    pub roller_id: ItemId,
    /// Two integers with no known meaning, kept so the message can be
    /// written back unchanged
    pub reserved: [i32; 2],
    pub movement: RollerMovement,
}

impl Serde for RollerUpdate {
    fn ser(&self, writer: &mut PacketWriter) {
        writer.write_i32(self.from_x);
        writer.write_i32(self.from_y);
        writer.write_i32(self.to_x);
        writer.write_i32(self.to_y);
        writer.write_int_count(self.objects.len());
        for object in &self.objects {
            writer.write_legacy_long(object.id);
            writer.write_legacy_float(object.from_z);
            writer.write_legacy_float(object.to_z);
        }
        writer.write_legacy_long(self.roller_id);
        writer.write_i32(self.reserved[0]);
        writer.write_i32(self.reserved[1]);

        let (movement_type, entity) = match &self.movement {
            RollerMovement::None => (0, None),
            RollerMovement::Moving(entity) => (1, Some(entity)),
            RollerMovement::Stationary(entity) => (2, Some(entity)),
        };
        writer.write_i32(movement_type);
        if let Some(entity) = entity {
            writer.write_i32(entity.index);
            writer.write_legacy_float(entity.from_z);
            writer.write_legacy_float(entity.to_z);
        }
    }

    fn de(reader: &mut PacketReader) -> Result<Self, SerdeErr> {
        let from_x = reader.read_i32()?;
        let from_y = reader.read_i32()?;
        let to_x = reader.read_i32()?;
        let to_y = reader.read_i32()?;

        let count = reader.read_int_count()?;
        let mut objects = Vec::with_capacity(count.min(reader.remaining()));
        for _ in 0..count {
            objects.push(RollerObjectUpdate {
                id: reader.read_legacy_long()?,
                from_z: reader.read_legacy_float()?,
                to_z: reader.read_legacy_float()?,
            });
        }

        let roller_id = reader.read_legacy_long()?;
        let reserved = [reader.read_i32()?, reader.read_i32()?];

        let movement_type = reader.read_i32()?;
        let movement = match movement_type {
            0 => RollerMovement::None,
            1 | 2 => {
                let entity = RollerEntityUpdate {
                    index: reader.read_i32()?,
                    from_z: reader.read_legacy_float()?,
                    to_z: reader.read_legacy_float()?,
                };
                if movement_type == 1 {
                    RollerMovement::Moving(entity)
                } else {
                    RollerMovement::Stationary(entity)
                }
            }
            other => {
                return Err(SerdeErr::InvalidFormat {
                    field: "roller movement type",
                    text: other.to_string(),
                })
            }
        };

        Ok(Self {
            from_x,
            from_y,
            to_x,
            to_y,
            objects,
            roller_id,
            reserved,
            movement,
        })
    }
}
