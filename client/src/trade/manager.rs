use std::{collections::HashMap, sync::Arc};

use log::{debug, error, trace, warn};

use roomsync_shared::{
    Entity, EntityIndex, InboundPacket, Incoming, ItemId, Outgoing, OutgoingPacket, PacketSink,
    PacketWriter, ProtocolVariant, Serde, TradeOffer, UserId,
};

use crate::{
    error::AnomalyKind,
    room::{Disposition, Room, RoomHandle},
    trade::{error::TradeError, events::TradeEvent},
};

type Handler = fn(&mut TradeManager, &mut InboundPacket<'_>) -> Result<(), TradeError>;

type Listener = Box<dyn FnMut(&mut TradeEvent) + Send>;

const HANDLERS: &[(Incoming, Handler)] = &[
    (Incoming::TradeOpened, TradeManager::on_opened),
    (Incoming::TradeOpenFailed, TradeManager::on_open_failed),
    (Incoming::TradeUpdated, TradeManager::on_updated),
    (Incoming::TradeAccepted, TradeManager::on_accepted),
    (Incoming::TradeConfirmation, TradeManager::on_confirmation),
    (Incoming::TradeClosed, TradeManager::on_closed),
];

#[derive(Clone, Debug)]
struct OpenTrade {
    is_trader: bool,
    own: Entity,
    partner: Entity,
    own_offer: Option<TradeOffer>,
    partner_offer: Option<TradeOffer>,
    has_accepted: bool,
    has_partner_accepted: bool,
    waiting_confirmation: bool,
}

impl OpenTrade {
    fn participant(&self, user_id: UserId) -> Option<Participant> {
        if self.own.id == user_id {
            Some(Participant::Own)
        } else if self.partner.id == user_id {
            Some(Participant::Partner)
        } else {
            None
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Participant {
    Own,
    Partner,
}

/// Trade negotiation state machine.
///
/// `Idle → Trading → Idle`. A trade needs the local user's id and an occupied
/// room; both parties are resolved against the room's occupants when it
/// opens.
pub struct TradeManager {
    room: RoomHandle,
    variant: ProtocolVariant,
    sink: Arc<dyn PacketSink>,
    local_user_id: Option<UserId>,
    trade: Option<OpenTrade>,
    handlers: HashMap<Incoming, Handler>,
    listeners: Vec<Listener>,
}

impl TradeManager {
    pub fn new(room: RoomHandle, variant: ProtocolVariant, sink: Arc<dyn PacketSink>) -> Self {
        Self {
            room,
            variant,
            sink,
            local_user_id: None,
            trade: None,
            handlers: HANDLERS.iter().copied().collect(),
            listeners: Vec::new(),
        }
    }

    /// Set once the local user's profile has loaded
    pub fn set_local_user_id(&mut self, user_id: Option<UserId>) {
        self.local_user_id = user_id;
    }

    pub fn local_user_id(&self) -> Option<UserId> {
        self.local_user_id
    }

    pub fn set_variant(&mut self, variant: ProtocolVariant) {
        self.variant = variant;
    }

    pub fn on_event(&mut self, listener: impl FnMut(&mut TradeEvent) + Send + 'static) {
        self.listeners.push(Box::new(listener));
    }

    pub fn handled_headers() -> impl Iterator<Item = Incoming> {
        HANDLERS.iter().map(|(header, _)| *header)
    }

    pub fn handles(&self, header: Incoming) -> bool {
        self.handlers.contains_key(&header)
    }

    // State

    pub fn is_trading(&self) -> bool {
        self.trade.is_some()
    }

    /// Whether the local user opened the trade
    pub fn is_trader(&self) -> bool {
        self.trade.as_ref().is_some_and(|trade| trade.is_trader)
    }

    pub fn own_entity(&self) -> Option<&Entity> {
        self.trade.as_ref().map(|trade| &trade.own)
    }

    pub fn partner(&self) -> Option<&Entity> {
        self.trade.as_ref().map(|trade| &trade.partner)
    }

    pub fn own_offer(&self) -> Option<&TradeOffer> {
        self.trade.as_ref().and_then(|trade| trade.own_offer.as_ref())
    }

    pub fn partner_offer(&self) -> Option<&TradeOffer> {
        self.trade
            .as_ref()
            .and_then(|trade| trade.partner_offer.as_ref())
    }

    pub fn has_accepted(&self) -> bool {
        self.trade.as_ref().is_some_and(|trade| trade.has_accepted)
    }

    pub fn has_partner_accepted(&self) -> bool {
        self.trade
            .as_ref()
            .is_some_and(|trade| trade.has_partner_accepted)
    }

    pub fn is_waiting_confirmation(&self) -> bool {
        self.trade
            .as_ref()
            .is_some_and(|trade| trade.waiting_confirmation)
    }

    // Inbound

    pub fn handle(&mut self, packet: &mut InboundPacket<'_>) -> Disposition {
        if let Err(error) = self.try_handle(packet) {
            match error.kind() {
                AnomalyKind::Decode => warn!("{}", error),
                AnomalyKind::InapplicableState => debug!("{}", error),
                AnomalyKind::Referential | AnomalyKind::Conflict => error!("{}", error),
            }
        }
        Disposition::Forward
    }

    pub fn try_handle(&mut self, packet: &mut InboundPacket<'_>) -> Result<(), TradeError> {
        let header = packet.header();
        let Some(handler) = self.handlers.get(&header).copied() else {
            return Err(TradeError::Unhandled { header });
        };
        handler(self, packet)
    }

    fn emit(&mut self, mut event: TradeEvent) {
        trace!("Trade event: {}", event.name());
        for listener in self.listeners.iter_mut() {
            listener(&mut event);
        }
    }

    fn require_room(&self, header: Incoming) -> Result<Arc<Room>, TradeError> {
        self.room.room().ok_or(TradeError::NotInRoom { header })
    }

    fn require_trade(&mut self, header: Incoming) -> Result<&mut OpenTrade, TradeError> {
        self.trade
            .as_mut()
            .ok_or(TradeError::NotTrading { header })
    }

    fn on_opened(&mut self, packet: &mut InboundPacket<'_>) -> Result<(), TradeError> {
        let header = packet.header();
        // Participant ids are plain ints in every variant
        let trader_id = UserId::from(packet.read_i32()?);
        let _ = packet.read_i32()?;
        let tradee_id = UserId::from(packet.read_i32()?);
        let _ = packet.read_i32()?;

        let local_user_id = self
            .local_user_id
            .ok_or(TradeError::ProfileNotLoaded { header })?;
        let room = self.require_room(header)?;
        let resolve = |user_id: UserId| {
            room.entities()
                .get_user_by_id(user_id)
                .ok_or(TradeError::UnknownUser { user_id })
        };
        let trader = resolve(trader_id)?;
        let tradee = resolve(tradee_id)?;

        let is_trader = local_user_id == trader_id;
        let (own, partner) = if is_trader {
            (trader, tradee)
        } else {
            (tradee, trader)
        };
        debug!("Trade opened with {}", partner.name);

        self.trade = Some(OpenTrade {
            is_trader,
            own,
            partner: partner.clone(),
            own_offer: None,
            partner_offer: None,
            has_accepted: false,
            has_partner_accepted: false,
            waiting_confirmation: false,
        });
        self.emit(TradeEvent::Started { is_trader, partner });
        Ok(())
    }

    fn on_open_failed(&mut self, packet: &mut InboundPacket<'_>) -> Result<(), TradeError> {
        let header = packet.header();
        let reason = packet.read_i32()?;
        let name = packet.read_string()?;
        self.require_room(header)?;

        self.trade = None;
        self.emit(TradeEvent::StartFailed { reason, name });
        Ok(())
    }

    fn on_updated(&mut self, packet: &mut InboundPacket<'_>) -> Result<(), TradeError> {
        let header = packet.header();
        let first = TradeOffer::de(packet.reader())?;
        let second = TradeOffer::de(packet.reader())?;
        self.require_room(header)?;
        let trade = self.require_trade(header)?;

        // The first offer is ours unless it carries the partner's id
        let (own_offer, partner_offer) = if first.user_id == trade.partner.id {
            (second, first)
        } else {
            (first, second)
        };

        trade.has_accepted = false;
        trade.has_partner_accepted = false;
        trade.own_offer = Some(own_offer.clone());
        trade.partner_offer = Some(partner_offer.clone());

        self.emit(TradeEvent::Updated {
            own_offer,
            partner_offer,
        });
        Ok(())
    }

    fn on_accepted(&mut self, packet: &mut InboundPacket<'_>) -> Result<(), TradeError> {
        let header = packet.header();
        let user_id = UserId::from(packet.read_i32()?);
        let accepted = packet.read_i32()? == 1;
        self.require_room(header)?;
        let trade = self.require_trade(header)?;

        let user = match trade.participant(user_id) {
            Some(Participant::Own) => {
                trade.has_accepted = accepted;
                trade.own.clone()
            }
            Some(Participant::Partner) => {
                trade.has_partner_accepted = accepted;
                trade.partner.clone()
            }
            None => return Err(TradeError::UnknownParticipant { user_id }),
        };
        self.emit(TradeEvent::Accepted { user, accepted });
        Ok(())
    }

    fn on_confirmation(&mut self, packet: &mut InboundPacket<'_>) -> Result<(), TradeError> {
        let header = packet.header();
        self.require_room(header)?;
        let trade = self.require_trade(header)?;

        trade.waiting_confirmation = true;
        self.emit(TradeEvent::WaitingConfirmation);
        Ok(())
    }

    fn on_closed(&mut self, packet: &mut InboundPacket<'_>) -> Result<(), TradeError> {
        let header = packet.header();
        let user_id = UserId::from(packet.read_i32()?);
        let reason = packet.read_i32()?;
        // Ignored outside a room; the open trade is kept as is
        self.require_room(header)?;
        let trade = self.trade.take().ok_or(TradeError::NotTrading { header })?;
        let Some(participant) = trade.participant(user_id) else {
            self.trade = Some(trade);
            return Err(TradeError::UnknownParticipant { user_id });
        };

        if reason == 0 {
            debug!("Trade with {} completed", trade.partner.name);
            self.emit(TradeEvent::Completed {
                was_trader: trade.is_trader,
                own: trade.own,
                partner: trade.partner,
                own_offer: trade.own_offer,
                partner_offer: trade.partner_offer,
            });
        } else {
            let user = match participant {
                Participant::Own => trade.own,
                Participant::Partner => trade.partner,
            };
            debug!("Trade stopped by {} ({})", user.name, reason);
            self.emit(TradeEvent::Stopped { user, reason });
        }
        Ok(())
    }

    // Outbound

    fn send(&self, header: Outgoing, write: impl FnOnce(&mut PacketWriter)) {
        let packet = OutgoingPacket::to_server(header, self.variant, write);
        trace!("Sending {:?}", packet.header);
        self.sink.send(packet);
    }

    /// Asks the occupant at `index` to trade
    pub fn open_trade(&self, index: EntityIndex) {
        self.send(Outgoing::OpenTrade, |writer| writer.write_i32(index));
    }

    pub fn offer_item(&self, id: ItemId) {
        self.send(Outgoing::OfferTradeItem, |writer| writer.write_legacy_long(id));
    }

    pub fn offer_items(&self, ids: &[ItemId]) {
        self.send(Outgoing::OfferTradeItems, |writer| {
            writer.write_int_count(ids.len());
            for id in ids {
                writer.write_legacy_long(*id);
            }
        });
    }

    pub fn cancel_offer(&self, id: ItemId) {
        self.send(Outgoing::CancelTradeOffer, |writer| writer.write_legacy_long(id));
    }

    pub fn accept(&self) {
        self.send(Outgoing::AcceptTrade, |_| {});
    }

    pub fn unaccept(&self) {
        self.send(Outgoing::UnacceptTrade, |_| {});
    }

    pub fn confirm(&self) {
        self.send(Outgoing::ConfirmTrade, |_| {});
    }

    pub fn close(&self) {
        self.send(Outgoing::CloseTrade, |_| {});
    }
}
