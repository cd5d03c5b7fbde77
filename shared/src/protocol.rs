use std::collections::HashMap;

use roomsync_serde::ProtocolVariant;

use crate::messages::{
    headers::{Incoming, Outgoing},
    packet::{Header, InboundPacket},
};

pub mod error;
pub use error::ProtocolError;

/// Wire identifier table for one client build.
///
/// Built once at startup, then locked. The transport turns each raw frame
/// into an [`InboundPacket`] with [`Protocol::inbound`] before dispatching,
/// and asks [`Protocol::wire_header`] for the number to write in front of
/// every packet handed to its sink.
#[derive(Default)]
pub struct Protocol {
    /// Wire format flavour of this build
    pub variant: ProtocolVariant,
    incoming: HashMap<u16, Incoming>,
    incoming_headers: HashMap<Incoming, u16>,
    outgoing: HashMap<Outgoing, u16>,
    outgoing_names: HashMap<u16, Outgoing>,
    locked: bool,
}

impl Protocol {
    pub fn builder() -> Self {
        Self::default()
    }

    pub fn variant(&mut self, variant: ProtocolVariant) -> &mut Self {
        self.check_lock();
        self.variant = variant;
        self
    }

    pub fn add_incoming(&mut self, header: u16, name: Incoming) -> &mut Self {
        self.check_lock();
        if self.incoming.contains_key(&header) {
            panic!("Header {} is already registered", header);
        }
        self.incoming.insert(header, name);
        self.incoming_headers.insert(name, header);
        self
    }

    pub fn add_outgoing(&mut self, header: u16, name: Outgoing) -> &mut Self {
        self.check_lock();
        if self.outgoing_names.contains_key(&header) {
            panic!("Header {} is already registered", header);
        }
        self.outgoing.insert(name, header);
        self.outgoing_names.insert(header, name);
        self
    }

    // Non-panicking builder methods

    pub fn try_variant(&mut self, variant: ProtocolVariant) -> Result<&mut Self, ProtocolError> {
        self.try_check_lock()?;
        self.variant = variant;
        Ok(self)
    }

    pub fn try_add_incoming(
        &mut self,
        header: u16,
        name: Incoming,
    ) -> Result<&mut Self, ProtocolError> {
        self.try_check_lock()?;
        if self.incoming.contains_key(&header) {
            return Err(ProtocolError::DuplicateHeader { header });
        }
        self.incoming.insert(header, name);
        self.incoming_headers.insert(name, header);
        Ok(self)
    }

    pub fn try_add_outgoing(
        &mut self,
        header: u16,
        name: Outgoing,
    ) -> Result<&mut Self, ProtocolError> {
        self.try_check_lock()?;
        if self.outgoing_names.contains_key(&header) {
            return Err(ProtocolError::DuplicateHeader { header });
        }
        self.outgoing.insert(name, header);
        self.outgoing_names.insert(header, name);
        Ok(self)
    }

    pub fn try_lock(&mut self) -> Result<(), ProtocolError> {
        self.try_check_lock()?;
        self.locked = true;
        Ok(())
    }

    pub fn lock(&mut self) {
        self.check_lock();
        self.locked = true;
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }

    /// Checks if protocol is locked without panicking
    pub fn try_check_lock(&self) -> Result<(), ProtocolError> {
        if self.locked {
            Err(ProtocolError::AlreadyLocked)
        } else {
            Ok(())
        }
    }

    /// Checks if protocol is locked, panics if it is
    pub fn check_lock(&self) {
        if self.locked {
            panic!("Protocol already locked!");
        }
    }

    pub fn build(&mut self) -> Self {
        std::mem::take(self)
    }

    // Lookups

    pub fn incoming(&self, header: u16) -> Result<Incoming, ProtocolError> {
        self.incoming
            .get(&header)
            .copied()
            .ok_or(ProtocolError::UnknownHeader { header })
    }

    pub fn incoming_header(&self, name: Incoming) -> Result<u16, ProtocolError> {
        self.incoming_headers
            .get(&name)
            .copied()
            .ok_or(ProtocolError::UnmappedIncoming { name })
    }

    pub fn outgoing_header(&self, name: Outgoing) -> Result<u16, ProtocolError> {
        self.outgoing
            .get(&name)
            .copied()
            .ok_or(ProtocolError::UnmappedOutgoing { name })
    }

    // Framing

    /// Resolves a raw header and wraps its payload for the managers
    pub fn inbound<'b>(
        &self,
        header: u16,
        payload: &'b [u8],
    ) -> Result<InboundPacket<'b>, ProtocolError> {
        let name = self.incoming(header)?;
        Ok(InboundPacket::new(name, payload, self.variant))
    }

    /// Number to write in front of a packet taken from a `PacketSink`.
    /// Client-bound packets use the inbound table.
    pub fn wire_header(&self, header: Header) -> Result<u16, ProtocolError> {
        match header {
            Header::Incoming(name) => self.incoming_header(name),
            Header::Outgoing(name) => self.outgoing_header(name),
        }
    }
}
