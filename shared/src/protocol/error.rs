use thiserror::Error;

use crate::messages::headers::{Incoming, Outgoing};

/// Errors that can occur while building or querying a header table
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProtocolError {
    /// Protocol is locked and cannot be modified
    #[error("Protocol is already locked and cannot be modified. Protocol.lock() has been called and no further changes are allowed")]
    AlreadyLocked,

    /// No message is registered under this wire identifier
    #[error("No inbound message registered for header {header}")]
    UnknownHeader { header: u16 },

    /// The wire identifier is already taken by another message
    #[error("Header {header} is already registered")]
    DuplicateHeader { header: u16 },

    /// The inbound message has no wire identifier in this build
    #[error("Inbound message {name:?} has no header in this protocol")]
    UnmappedIncoming { name: Incoming },

    /// The outbound message has no wire identifier in this build
    #[error("Outbound message {name:?} has no header in this protocol")]
    UnmappedOutgoing { name: Outgoing },
}
