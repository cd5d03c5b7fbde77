use thiserror::Error;

use roomsync_shared::{Incoming, SerdeErr, UserId};

use crate::error::AnomalyKind;

/// Errors raised while applying an inbound trade message
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TradeError {
    #[error("Failed to decode trade message: {0}")]
    Decode(#[from] SerdeErr),

    /// The local user's id is not known yet
    #[error("Ignoring {header:?}, the local profile is not loaded")]
    ProfileNotLoaded { header: Incoming },

    #[error("Ignoring {header:?} outside of a room")]
    NotInRoom { header: Incoming },

    #[error("Ignoring {header:?}, no trade is open")]
    NotTrading { header: Incoming },

    /// A trade message named a user who is neither party of the open trade
    #[error("User {user_id} is not part of the open trade")]
    UnknownParticipant { user_id: UserId },

    /// A trade started with a user not present in the room
    #[error("Trade participant {user_id} is not in the room")]
    UnknownUser { user_id: UserId },

    #[error("No trade handler for {header:?}")]
    Unhandled { header: Incoming },
}

impl TradeError {
    pub fn kind(&self) -> AnomalyKind {
        match self {
            TradeError::Decode(_) => AnomalyKind::Decode,
            TradeError::ProfileNotLoaded { .. }
            | TradeError::NotInRoom { .. }
            | TradeError::NotTrading { .. }
            | TradeError::Unhandled { .. } => AnomalyKind::InapplicableState,
            TradeError::UnknownParticipant { .. } | TradeError::UnknownUser { .. } => {
                AnomalyKind::Referential
            }
        }
    }
}
