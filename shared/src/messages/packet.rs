use std::ops::{Deref, DerefMut};

use roomsync_serde::{PacketReader, PacketWriter, ProtocolVariant};

use super::headers::{Incoming, Outgoing};

/// Decoded-message cursor handed to a handler, together with the symbolic
/// name the transport resolved it to.
pub struct InboundPacket<'b> {
    header: Incoming,
    reader: PacketReader<'b>,
}

impl<'b> InboundPacket<'b> {
    pub fn new(header: Incoming, payload: &'b [u8], variant: ProtocolVariant) -> Self {
        Self {
            header,
            reader: PacketReader::new(payload, variant),
        }
    }

    pub fn header(&self) -> Incoming {
        self.header
    }

    pub fn reader(&mut self) -> &mut PacketReader<'b> {
        &mut self.reader
    }
}

impl<'b> Deref for InboundPacket<'b> {
    type Target = PacketReader<'b>;

    fn deref(&self) -> &Self::Target {
        &self.reader
    }
}

impl<'b> DerefMut for InboundPacket<'b> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.reader
    }
}

/// Where an outbound packet goes
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Destination {
    /// The remote service
    Server,
    /// Injected into the local client, as if the server had sent it
    Client,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Header {
    Incoming(Incoming),
    Outgoing(Outgoing),
}

impl Header {
    pub fn destination(&self) -> Destination {
        match self {
            Header::Incoming(_) => Destination::Client,
            Header::Outgoing(_) => Destination::Server,
        }
    }
}

/// Encoded packet ready for the transport to resolve its header and write
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OutgoingPacket {
    pub header: Header,
    pub payload: Vec<u8>,
}

impl OutgoingPacket {
    pub fn new(header: Header, payload: Vec<u8>) -> Self {
        Self { header, payload }
    }

    /// Encodes a packet for the server
    pub fn to_server(
        header: Outgoing,
        variant: ProtocolVariant,
        write: impl FnOnce(&mut PacketWriter),
    ) -> Self {
        let mut writer = PacketWriter::new(variant);
        write(&mut writer);
        Self::new(Header::Outgoing(header), writer.to_bytes())
    }

    /// Encodes a packet to be injected into the client
    pub fn to_client(
        header: Incoming,
        variant: ProtocolVariant,
        write: impl FnOnce(&mut PacketWriter),
    ) -> Self {
        let mut writer = PacketWriter::new(variant);
        write(&mut writer);
        Self::new(Header::Incoming(header), writer.to_bytes())
    }

    pub fn destination(&self) -> Destination {
        self.header.destination()
    }
}

/// Transport boundary. Sends are fire-and-forget.
pub trait PacketSink: Send + Sync {
    fn send(&self, packet: OutgoingPacket);
}
