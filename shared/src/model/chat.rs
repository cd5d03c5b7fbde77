use roomsync_serde::{PacketReader, PacketWriter, Serde, SerdeErr};

use crate::types::EntityIndex;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ChatKind {
    Whisper,
    Talk,
    Shout,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChatMessage {
    pub index: EntityIndex,
    pub message: String,
    pub expression: i32,
    pub bubble_style: i32,
    /// Trailing string and int pair, read and never interpreted
    pub reserved: (String, i32),
}

impl Serde for ChatMessage {
    fn ser(&self, writer: &mut PacketWriter) {
        writer.write_i32(self.index);
        writer.write_string(&self.message);
        writer.write_i32(self.expression);
        writer.write_i32(self.bubble_style);
        writer.write_string(&self.reserved.0);
        writer.write_i32(self.reserved.1);
    }

    fn de(reader: &mut PacketReader) -> Result<Self, SerdeErr> {
        Ok(Self {
            index: reader.read_i32()?,
            message: reader.read_string()?,
            expression: reader.read_i32()?,
            bubble_style: reader.read_i32()?,
            reserved: (reader.read_string()?, reader.read_i32()?),
        })
    }
}
