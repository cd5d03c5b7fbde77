use crate::{error::SerdeErr, variant::ProtocolVariant};

/// Cursor over the payload of one inbound packet.
///
/// Every read consumes its field and advances the cursor. Reading past the
/// end fails with [`SerdeErr::Underflow`] and leaves the cursor where it was.
#[derive(Clone, Debug)]
pub struct PacketReader<'b> {
    buffer: &'b [u8],
    position: usize,
    variant: ProtocolVariant,
}

impl<'b> PacketReader<'b> {
    pub fn new(buffer: &'b [u8], variant: ProtocolVariant) -> Self {
        Self {
            buffer,
            position: 0,
            variant,
        }
    }

    pub fn variant(&self) -> ProtocolVariant {
        self.variant
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn remaining(&self) -> usize {
        self.buffer.len() - self.position
    }

    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    fn take(&mut self, needed: usize) -> Result<&'b [u8], SerdeErr> {
        let remaining = self.remaining();
        if needed > remaining {
            return Err(SerdeErr::Underflow { needed, remaining });
        }
        let slice = &self.buffer[self.position..self.position + needed];
        self.position += needed;
        Ok(slice)
    }

    fn take_array<const N: usize>(&mut self) -> Result<[u8; N], SerdeErr> {
        let mut array = [0u8; N];
        array.copy_from_slice(self.take(N)?);
        Ok(array)
    }

    // Fixed width primitives

    pub fn read_u8(&mut self) -> Result<u8, SerdeErr> {
        Ok(self.take_array::<1>()?[0])
    }

    pub fn read_bool(&mut self) -> Result<bool, SerdeErr> {
        Ok(self.read_u8()? != 0)
    }

    pub fn read_i16(&mut self) -> Result<i16, SerdeErr> {
        Ok(i16::from_be_bytes(self.take_array()?))
    }

    pub fn read_i32(&mut self) -> Result<i32, SerdeErr> {
        Ok(i32::from_be_bytes(self.take_array()?))
    }

    pub fn read_i64(&mut self) -> Result<i64, SerdeErr> {
        Ok(i64::from_be_bytes(self.take_array()?))
    }

    pub fn read_f32(&mut self) -> Result<f32, SerdeErr> {
        Ok(f32::from_be_bytes(self.take_array()?))
    }

    /// Reads a string prefixed by its 16-bit byte length. Invalid UTF-8 is
    /// replaced rather than rejected.
    pub fn read_string(&mut self) -> Result<String, SerdeErr> {
        let length = self.read_u16_length()?;
        let bytes = self.take(length)?;
        Ok(String::from_utf8_lossy(bytes).into_owned())
    }

    fn read_u16_length(&mut self) -> Result<usize, SerdeErr> {
        Ok(u16::from_be_bytes(self.take_array()?) as usize)
    }

    // Variant dependent primitives

    /// Identifier sent as an int on `Legacy` and a long on `Modern`.
    pub fn read_legacy_long(&mut self) -> Result<i64, SerdeErr> {
        match self.variant {
            ProtocolVariant::Legacy => Ok(self.read_i32()? as i64),
            ProtocolVariant::Modern => self.read_i64(),
        }
    }

    /// Value sent as an int on `Legacy` and a short on `Modern`.
    pub fn read_legacy_short(&mut self) -> Result<i32, SerdeErr> {
        match self.variant {
            ProtocolVariant::Legacy => self.read_i32(),
            ProtocolVariant::Modern => Ok(self.read_i16()? as i32),
        }
    }

    /// Float sent as decimal text on `Legacy` and an IEEE float on `Modern`.
    pub fn read_legacy_float(&mut self) -> Result<f64, SerdeErr> {
        match self.variant {
            ProtocolVariant::Legacy => {
                let text = self.read_string()?;
                parse_number(&text)
            }
            ProtocolVariant::Modern => Ok(self.read_f32()? as f64),
        }
    }

    /// Identifier sent as decimal text on `Legacy` and a long on `Modern`.
    pub fn read_id_string(&mut self) -> Result<i64, SerdeErr> {
        match self.variant {
            ProtocolVariant::Legacy => {
                let text = self.read_string()?;
                parse_number(&text)
            }
            ProtocolVariant::Modern => self.read_i64(),
        }
    }

    /// Entity index sent as decimal text on `Legacy` and an int on `Modern`.
    pub fn read_index_string(&mut self) -> Result<i32, SerdeErr> {
        match self.variant {
            ProtocolVariant::Legacy => {
                let text = self.read_string()?;
                parse_number(&text)
            }
            ProtocolVariant::Modern => self.read_i32(),
        }
    }

    // Counts

    pub fn read_short_count(&mut self) -> Result<usize, SerdeErr> {
        let count = self.read_i16()?;
        to_count(count as i64)
    }

    pub fn read_int_count(&mut self) -> Result<usize, SerdeErr> {
        let count = self.read_i32()?;
        to_count(count as i64)
    }

    /// Count framed with [`PacketReader::read_legacy_short`].
    pub fn read_legacy_count(&mut self) -> Result<usize, SerdeErr> {
        let count = self.read_legacy_short()?;
        to_count(count as i64)
    }
}

fn to_count(length: i64) -> Result<usize, SerdeErr> {
    if length < 0 {
        return Err(SerdeErr::InvalidLength { length });
    }
    Ok(length as usize)
}

fn parse_number<N: std::str::FromStr>(text: &str) -> Result<N, SerdeErr> {
    text.trim().parse::<N>().map_err(|_| SerdeErr::InvalidNumber {
        text: text.to_string(),
    })
}
