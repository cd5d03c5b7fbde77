use roomsync_client::{RoomManager, TradeManager};
use roomsync_shared::{Outgoing, Protocol, ProtocolVariant};

/// First inbound wire number of the test build
pub const INCOMING_BASE: u16 = 1000;
/// First outbound wire number of the test build
pub const OUTGOING_BASE: u16 = 3000;

const OUTGOING: [Outgoing; 14] = [
    Outgoing::PlaceFloorItem,
    Outgoing::PlaceWallItem,
    Outgoing::MoveFloorItem,
    Outgoing::MoveWallItem,
    Outgoing::PickupItem,
    Outgoing::SetStackHelperHeight,
    Outgoing::OpenTrade,
    Outgoing::OfferTradeItem,
    Outgoing::OfferTradeItems,
    Outgoing::CancelTradeOffer,
    Outgoing::AcceptTrade,
    Outgoing::UnacceptTrade,
    Outgoing::ConfirmTrade,
    Outgoing::CloseTrade,
];

/// Locked header table numbering every message the managers know,
/// the way a client build's table would arrive from its definitions
pub fn test_protocol(variant: ProtocolVariant) -> Protocol {
    let mut protocol = Protocol::builder();
    protocol.variant(variant);

    let incoming = RoomManager::handled_headers().chain(TradeManager::handled_headers());
    for (header, name) in (INCOMING_BASE..).zip(incoming) {
        protocol.add_incoming(header, name);
    }
    for (header, name) in (OUTGOING_BASE..).zip(OUTGOING) {
        protocol.add_outgoing(header, name);
    }

    protocol.lock();
    protocol.build()
}
