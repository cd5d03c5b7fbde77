use log::warn;

use crate::{error::SerdeErr, variant::ProtocolVariant};

/// Growable writer mirroring every [`PacketReader`](crate::PacketReader) read.
pub struct PacketWriter {
    buffer: Vec<u8>,
    variant: ProtocolVariant,
}

impl PacketWriter {
    pub fn new(variant: ProtocolVariant) -> Self {
        Self {
            buffer: Vec::with_capacity(64),
            variant,
        }
    }

    pub fn variant(&self) -> ProtocolVariant {
        self.variant
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    pub fn to_bytes(self) -> Vec<u8> {
        self.buffer
    }

    // Fixed width primitives

    pub fn write_u8(&mut self, value: u8) {
        self.buffer.push(value);
    }

    pub fn write_bool(&mut self, value: bool) {
        self.write_u8(value as u8);
    }

    pub fn write_i16(&mut self, value: i16) {
        self.buffer.extend_from_slice(&value.to_be_bytes());
    }

    pub fn write_i32(&mut self, value: i32) {
        self.buffer.extend_from_slice(&value.to_be_bytes());
    }

    pub fn write_i64(&mut self, value: i64) {
        self.buffer.extend_from_slice(&value.to_be_bytes());
    }

    pub fn write_f32(&mut self, value: f32) {
        self.buffer.extend_from_slice(&value.to_be_bytes());
    }

    /// Writes a string with a 16-bit byte length prefix, failing if it does
    /// not fit.
    pub fn try_write_string(&mut self, value: &str) -> Result<(), SerdeErr> {
        let length = value.len();
        if length > u16::MAX as usize {
            return Err(SerdeErr::StringTooLong { length });
        }
        self.buffer.extend_from_slice(&(length as u16).to_be_bytes());
        self.buffer.extend_from_slice(value.as_bytes());
        Ok(())
    }

    /// Writes a string with a 16-bit byte length prefix. Oversized strings are
    /// cut at the last char boundary that fits.
    pub fn write_string(&mut self, value: &str) {
        if self.try_write_string(value).is_ok() {
            return;
        }
        warn!(
            "Truncating {} byte string to fit a 16-bit length prefix",
            value.len()
        );
        let mut end = u16::MAX as usize;
        while !value.is_char_boundary(end) {
            end -= 1;
        }
        self.buffer.extend_from_slice(&(end as u16).to_be_bytes());
        self.buffer.extend_from_slice(&value.as_bytes()[..end]);
    }

    // Variant dependent primitives

    pub fn write_legacy_long(&mut self, value: i64) {
        match self.variant {
            ProtocolVariant::Legacy => self.write_i32(value as i32),
            ProtocolVariant::Modern => self.write_i64(value),
        }
    }

    pub fn write_legacy_short(&mut self, value: i32) {
        match self.variant {
            ProtocolVariant::Legacy => self.write_i32(value),
            ProtocolVariant::Modern => self.write_i16(value as i16),
        }
    }

    /// `Legacy` floats are written with the shortest text that parses back to
    /// the same value ("1.0", "0.15").
    pub fn write_legacy_float(&mut self, value: f64) {
        match self.variant {
            ProtocolVariant::Legacy => self.write_string(&format!("{:?}", value)),
            ProtocolVariant::Modern => self.write_f32(value as f32),
        }
    }

    pub fn write_id_string(&mut self, value: i64) {
        match self.variant {
            ProtocolVariant::Legacy => self.write_string(&value.to_string()),
            ProtocolVariant::Modern => self.write_i64(value),
        }
    }

    pub fn write_index_string(&mut self, value: i32) {
        match self.variant {
            ProtocolVariant::Legacy => self.write_string(&value.to_string()),
            ProtocolVariant::Modern => self.write_i32(value),
        }
    }

    // Counts

    pub fn write_short_count(&mut self, count: usize) {
        self.write_i16(count as i16);
    }

    pub fn write_int_count(&mut self, count: usize) {
        self.write_i32(count as i32);
    }

    pub fn write_legacy_count(&mut self, count: usize) {
        self.write_legacy_short(count as i32);
    }
}
