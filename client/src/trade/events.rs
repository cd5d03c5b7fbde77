use roomsync_shared::{Entity, TradeOffer};

/// One variant per observable change to the trade
#[derive(Clone, Debug, PartialEq)]
pub enum TradeEvent {
    Started {
        is_trader: bool,
        partner: Entity,
    },
    StartFailed {
        reason: i32,
        name: String,
    },
    /// Both offers were replaced and both acceptances cleared
    Updated {
        own_offer: TradeOffer,
        partner_offer: TradeOffer,
    },
    Accepted {
        user: Entity,
        accepted: bool,
    },
    WaitingConfirmation,
    Stopped {
        user: Entity,
        reason: i32,
    },
    Completed {
        was_trader: bool,
        own: Entity,
        partner: Entity,
        own_offer: Option<TradeOffer>,
        partner_offer: Option<TradeOffer>,
    },
}

impl TradeEvent {
    pub fn name(&self) -> &'static str {
        match self {
            TradeEvent::Started { .. } => "Started",
            TradeEvent::StartFailed { .. } => "StartFailed",
            TradeEvent::Updated { .. } => "Updated",
            TradeEvent::Accepted { .. } => "Accepted",
            TradeEvent::WaitingConfirmation => "WaitingConfirmation",
            TradeEvent::Stopped { .. } => "Stopped",
            TradeEvent::Completed { .. } => "Completed",
        }
    }
}
