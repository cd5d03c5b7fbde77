use crate::{error::SerdeErr, packet_reader::PacketReader, packet_writer::PacketWriter};

/// A type that can be written to and read back from a packet
pub trait Serde: Sized {
    /// Writes the value in wire order
    fn ser(&self, writer: &mut PacketWriter);
    /// Reads a value from the current cursor position
    fn de(reader: &mut PacketReader) -> Result<Self, SerdeErr>;
}

macro_rules! impl_serde_primitive {
    ($type:ty, $write:ident, $read:ident) => {
        impl Serde for $type {
            fn ser(&self, writer: &mut PacketWriter) {
                writer.$write(*self);
            }

            fn de(reader: &mut PacketReader) -> Result<Self, SerdeErr> {
                reader.$read()
            }
        }
    };
}

impl_serde_primitive!(u8, write_u8, read_u8);
impl_serde_primitive!(bool, write_bool, read_bool);
impl_serde_primitive!(i16, write_i16, read_i16);
impl_serde_primitive!(i32, write_i32, read_i32);
impl_serde_primitive!(i64, write_i64, read_i64);
impl_serde_primitive!(f32, write_f32, read_f32);

impl Serde for String {
    fn ser(&self, writer: &mut PacketWriter) {
        writer.write_string(self);
    }

    fn de(reader: &mut PacketReader) -> Result<Self, SerdeErr> {
        reader.read_string()
    }
}
