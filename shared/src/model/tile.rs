use roomsync_serde::{PacketReader, PacketWriter, Serde, SerdeErr};

/// Grid coordinate with an elevation.
///
/// Stored equality is exact; query filters compare `z` with
/// [`Tile::Z_EPSILON`] through [`Tile::matches`].
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Tile {
    pub x: i32,
    pub y: i32,
    pub z: f64,
}

impl Tile {
    pub const Z_EPSILON: f64 = 0.01;

    pub fn new(x: i32, y: i32, z: f64) -> Self {
        Self { x, y, z }
    }

    pub fn xy(&self) -> (i32, i32) {
        (self.x, self.y)
    }

    pub fn matches_xy(&self, x: i32, y: i32) -> bool {
        self.x == x && self.y == y
    }

    pub fn matches(&self, other: &Tile, epsilon: f64) -> bool {
        self.matches_xy(other.x, other.y) && (self.z - other.z).abs() < epsilon
    }
}

impl Serde for Tile {
    fn ser(&self, writer: &mut PacketWriter) {
        writer.write_i32(self.x);
        writer.write_i32(self.y);
        writer.write_legacy_float(self.z);
    }

    fn de(reader: &mut PacketReader) -> Result<Self, SerdeErr> {
        Ok(Self {
            x: reader.read_i32()?,
            y: reader.read_i32()?,
            z: reader.read_legacy_float()?,
        })
    }
}
