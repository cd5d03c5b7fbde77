use roomsync_serde::{PacketReader, PacketWriter, Serde, SerdeErr};

/// Walkable floor layout. `map` rows are separated by `\r`; `x` marks a void
/// tile and `0-9` / `a-z` give the floor height.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FloorPlan {
    pub legacy_scale: bool,
    pub wall_height: i32,
    pub map: String,
}

impl FloorPlan {
    pub fn new(map: &str) -> Self {
        Self {
            legacy_scale: false,
            wall_height: -1,
            map: map.to_string(),
        }
    }

    fn rows(&self) -> impl Iterator<Item = &str> {
        self.map
            .split(['\r', '\n'])
            .filter(|row| !row.is_empty())
    }

    pub fn width(&self) -> usize {
        self.rows().map(str::len).max().unwrap_or(0)
    }

    pub fn length(&self) -> usize {
        self.rows().count()
    }

    /// Floor height of a tile, `None` for void or out of range tiles
    pub fn height_at(&self, x: usize, y: usize) -> Option<i32> {
        let row = self.rows().nth(y)?;
        let c = row.as_bytes().get(x).copied()? as char;
        match c {
            '0'..='9' => Some(c as i32 - '0' as i32),
            'a'..='z' => Some(c as i32 - 'a' as i32 + 10),
            _ => None,
        }
    }

    pub fn is_walkable(&self, x: usize, y: usize) -> bool {
        self.height_at(x, y).is_some()
    }
}

impl Serde for FloorPlan {
    fn ser(&self, writer: &mut PacketWriter) {
        writer.write_bool(self.legacy_scale);
        writer.write_i32(self.wall_height);
        writer.write_string(&self.map);
    }

    fn de(reader: &mut PacketReader) -> Result<Self, SerdeErr> {
        Ok(Self {
            legacy_scale: reader.read_bool()?,
            wall_height: reader.read_i32()?,
            map: reader.read_string()?,
        })
    }
}

const BLOCKED_FLAG: i16 = 0x4000;
const HEIGHT_MASK: i16 = 0x3FFF;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HeightmapTile {
    pub raw: i16,
}

impl HeightmapTile {
    /// Negative values mark positions without a tile
    pub fn is_tile(&self) -> bool {
        self.raw >= 0
    }

    pub fn is_blocked(&self) -> bool {
        self.raw & BLOCKED_FLAG != 0
    }

    pub fn height(&self) -> f64 {
        (self.raw & HEIGHT_MASK) as f64 / 256.0
    }
}

/// Stacking height grid, stored row by row
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Heightmap {
    pub width: usize,
    pub values: Vec<i16>,
}

impl Heightmap {
    pub fn new(width: usize, values: Vec<i16>) -> Self {
        Self { width, values }
    }

    pub fn length(&self) -> usize {
        if self.width == 0 {
            0
        } else {
            self.values.len() / self.width
        }
    }

    fn offset(&self, x: usize, y: usize) -> Option<usize> {
        if x >= self.width {
            return None;
        }
        let offset = y * self.width + x;
        (offset < self.values.len()).then_some(offset)
    }

    pub fn get(&self, x: usize, y: usize) -> Option<HeightmapTile> {
        self.offset(x, y).map(|offset| HeightmapTile {
            raw: self.values[offset],
        })
    }

    /// Overwrites one value, returning false when out of range
    pub fn set(&mut self, x: usize, y: usize, raw: i16) -> bool {
        match self.offset(x, y) {
            Some(offset) => {
                self.values[offset] = raw;
                true
            }
            None => false,
        }
    }

    /// Applies a diff, returning the number of values written
    pub fn apply(&mut self, diff: &HeightmapDiff) -> usize {
        diff.changes
            .iter()
            .filter(|(x, y, raw)| self.set(*x as usize, *y as usize, *raw))
            .count()
    }
}

impl Serde for Heightmap {
    fn ser(&self, writer: &mut PacketWriter) {
        writer.write_i32(self.width as i32);
        writer.write_int_count(self.values.len());
        for value in &self.values {
            writer.write_i16(*value);
        }
    }

    fn de(reader: &mut PacketReader) -> Result<Self, SerdeErr> {
        let width = reader.read_i32()?;
        if width < 0 {
            return Err(SerdeErr::InvalidLength {
                length: width as i64,
            });
        }
        let count = reader.read_int_count()?;
        let mut values = Vec::with_capacity(count.min(reader.remaining()));
        for _ in 0..count {
            values.push(reader.read_i16()?);
        }
        Ok(Self::new(width as usize, values))
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct HeightmapDiff {
    pub changes: Vec<(u8, u8, i16)>,
}

impl Serde for HeightmapDiff {
    fn ser(&self, writer: &mut PacketWriter) {
        writer.write_u8(self.changes.len() as u8);
        for (x, y, raw) in &self.changes {
            writer.write_u8(*x);
            writer.write_u8(*y);
            writer.write_i16(*raw);
        }
    }

    fn de(reader: &mut PacketReader) -> Result<Self, SerdeErr> {
        let count = reader.read_u8()?;
        let mut changes = Vec::with_capacity(count as usize);
        for _ in 0..count {
            changes.push((reader.read_u8()?, reader.read_u8()?, reader.read_i16()?));
        }
        Ok(Self { changes })
    }
}
