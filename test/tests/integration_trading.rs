/// Integration tests for trade negotiation: opening, offer updates,
/// acceptance, confirmation and the two ways a trade ends.
use roomsync_client::{TradeError, TradeEvent};
use roomsync_shared::{
    Header, Incoming, ItemData, ItemType, Outgoing, PacketReader, ProtocolVariant, TradeItem,
    TradeOffer, UserId,
};
use roomsync_test::{messages, TestClient};

const MODERN: ProtocolVariant = ProtocolVariant::Modern;

fn offer(user_id: UserId, item_ids: &[i64]) -> TradeOffer {
    TradeOffer {
        user_id,
        items: item_ids
            .iter()
            .map(|id| TradeItem {
                item_id: *id,
                item_type: ItemType::Floor,
                furni_id: id + 1000,
                kind: 100,
                category: 1,
                groupable: true,
                data: ItemData::legacy(""),
                creation_day: 1,
                creation_month: 2,
                creation_year: 2020,
                extra: 0,
            })
            .collect(),
        furni_count: item_ids.len() as i32,
        credit_count: 0,
    }
}

/// Local user 1 in a room with user 2, trade opened by the local user
fn trading_client() -> TestClient {
    let mut client = TestClient::new();
    client.enter_room_with_users(1, &[1, 2]);
    client.deliver(messages::trade_opened(MODERN, 1, 2));
    client
}

#[test]
fn trade_completes_with_both_offers() {
    let mut client = trading_client();
    assert!(client.trade.is_trading());
    assert!(client.trade.is_trader());
    assert_eq!(client.trade.partner().expect("partner").id, 2);

    client.deliver_all([
        messages::trade_updated(MODERN, &offer(1, &[10]), &offer(2, &[20, 21])),
        messages::trade_accepted(MODERN, 1, true),
        messages::trade_accepted(MODERN, 2, true),
    ]);
    assert!(client.trade.has_accepted());
    assert!(client.trade.has_partner_accepted());

    client.deliver_all([
        messages::trade_confirmation(MODERN),
        messages::trade_closed(MODERN, 1, 0),
    ]);

    assert!(!client.trade.is_trading());
    assert_eq!(
        client.trade_events.names(),
        vec![
            "Started",
            "Updated",
            "Accepted",
            "Accepted",
            "WaitingConfirmation",
            "Completed"
        ]
    );
    match client.trade_events.last() {
        Some(TradeEvent::Completed {
            was_trader,
            own,
            partner,
            own_offer,
            partner_offer,
        }) => {
            assert!(was_trader);
            assert_eq!(own.id, 1);
            assert_eq!(partner.id, 2);
            assert_eq!(own_offer, Some(offer(1, &[10])));
            assert_eq!(partner_offer, Some(offer(2, &[20, 21])));
        }
        other => panic!("Expected Completed, got {:?}", other),
    }
}

#[test]
fn trade_opened_by_the_partner() {
    let mut client = TestClient::new();
    client.enter_room_with_users(1, &[1, 2]);

    client.deliver(messages::trade_opened(MODERN, 2, 1));

    assert!(!client.trade.is_trader());
    assert_eq!(client.trade.own_entity().expect("own").id, 1);
    match client.trade_events.last() {
        Some(TradeEvent::Started { is_trader, partner }) => {
            assert!(!is_trader);
            assert_eq!(partner.id, 2);
        }
        other => panic!("Expected Started, got {:?}", other),
    }
}

#[test]
fn nonzero_reason_stops_the_trade() {
    let mut client = trading_client();

    client.deliver(messages::trade_closed(MODERN, 2, 1));

    assert!(!client.trade.is_trading());
    match client.trade_events.last() {
        Some(TradeEvent::Stopped { user, reason }) => {
            assert_eq!(user.id, 2);
            assert_eq!(reason, 1);
        }
        other => panic!("Expected Stopped, got {:?}", other),
    }
    assert_eq!(client.trade_events.count("Completed"), 0);
}

#[test]
fn partner_offer_first_is_swapped() {
    let mut client = trading_client();

    client.deliver(messages::trade_updated(
        MODERN,
        &offer(2, &[20]),
        &offer(1, &[10]),
    ));

    assert_eq!(client.trade.own_offer(), Some(&offer(1, &[10])));
    assert_eq!(client.trade.partner_offer(), Some(&offer(2, &[20])));
}

#[test]
fn update_clears_both_acceptances() {
    let mut client = trading_client();
    client.deliver_all([
        messages::trade_accepted(MODERN, 1, true),
        messages::trade_accepted(MODERN, 2, true),
    ]);

    client.deliver(messages::trade_updated(
        MODERN,
        &offer(1, &[10, 11]),
        &offer(2, &[]),
    ));

    assert!(!client.trade.has_accepted());
    assert!(!client.trade.has_partner_accepted());
    assert!(client.trade.is_trading());
}

#[test]
fn unaccept_is_tracked() {
    let mut client = trading_client();
    client.deliver(messages::trade_accepted(MODERN, 2, true));
    client.deliver(messages::trade_accepted(MODERN, 2, false));

    assert!(!client.trade.has_partner_accepted());
    match client.trade_events.last() {
        Some(TradeEvent::Accepted { user, accepted }) => {
            assert_eq!(user.id, 2);
            assert!(!accepted);
        }
        other => panic!("Expected Accepted, got {:?}", other),
    }
}

#[test]
fn open_failed_reports_reason_and_name() {
    let mut client = TestClient::new();
    client.enter_room_with_users(1, &[1, 2]);

    client.deliver(messages::trade_open_failed(MODERN, 7, "user2"));

    assert!(!client.trade.is_trading());
    assert_eq!(
        client.trade_events.last(),
        Some(TradeEvent::StartFailed {
            reason: 7,
            name: "user2".to_string()
        })
    );
}

#[test]
fn trade_messages_without_a_trade_are_rejected() {
    let mut client = TestClient::new();
    client.enter_room_with_users(1, &[1, 2]);

    assert_eq!(
        client.try_deliver_trade(messages::trade_accepted(MODERN, 1, true)),
        Err(TradeError::NotTrading {
            header: Incoming::TradeAccepted
        })
    );
    assert_eq!(
        client.try_deliver_trade(messages::trade_closed(MODERN, 1, 0)),
        Err(TradeError::NotTrading {
            header: Incoming::TradeClosed
        })
    );
    assert_eq!(
        client.try_deliver_trade(messages::trade_updated(
            MODERN,
            &offer(1, &[]),
            &offer(2, &[])
        )),
        Err(TradeError::NotTrading {
            header: Incoming::TradeUpdated
        })
    );
    assert!(client.trade_events.events().is_empty());
}

#[test]
fn trade_needs_the_local_profile() {
    let mut client = TestClient::new();
    client.enter_room_with_users(1, &[1, 2]);
    client.trade.set_local_user_id(None);

    let result = client.try_deliver_trade(messages::trade_opened(MODERN, 1, 2));

    assert_eq!(
        result,
        Err(TradeError::ProfileNotLoaded {
            header: Incoming::TradeOpened
        })
    );
    assert!(!client.trade.is_trading());
}

#[test]
fn trade_needs_a_room() {
    let mut client = TestClient::new();
    client.trade.set_local_user_id(Some(1));

    let result = client.try_deliver_trade(messages::trade_opened(MODERN, 1, 2));

    assert_eq!(
        result,
        Err(TradeError::NotInRoom {
            header: Incoming::TradeOpened
        })
    );
}

#[test]
fn trade_messages_outside_a_room_keep_the_trade() {
    let mut client = trading_client();
    client.deliver(messages::close_connection(MODERN));
    client.trade_events.clear();

    assert_eq!(
        client.try_deliver_trade(messages::trade_accepted(MODERN, 2, true)),
        Err(TradeError::NotInRoom {
            header: Incoming::TradeAccepted
        })
    );
    assert_eq!(
        client.try_deliver_trade(messages::trade_confirmation(MODERN)),
        Err(TradeError::NotInRoom {
            header: Incoming::TradeConfirmation
        })
    );
    assert_eq!(
        client.try_deliver_trade(messages::trade_closed(MODERN, 2, 1)),
        Err(TradeError::NotInRoom {
            header: Incoming::TradeClosed
        })
    );
    assert!(client.trade.is_trading());
    assert!(!client.trade.has_partner_accepted());
    assert!(!client.trade.is_waiting_confirmation());
    assert!(client.trade_events.events().is_empty());
}

#[test]
fn participant_ids_are_ints_on_modern() {
    let mut client = TestClient::new();
    client.enter_room_with_users(1, &[1, 2]);
    let header = client
        .protocol()
        .incoming_header(Incoming::TradeOpened)
        .unwrap();
    let mut payload = Vec::new();
    for value in [2i32, 1, 1, 1] {
        payload.extend_from_slice(&value.to_be_bytes());
    }

    client.deliver_raw(header, &payload).unwrap();

    assert!(client.trade.is_trading());
    assert!(!client.trade.is_trader());
    assert_eq!(client.trade.partner().expect("partner").id, 2);

    let header = client
        .protocol()
        .incoming_header(Incoming::TradeClosed)
        .unwrap();
    let mut payload = Vec::new();
    for value in [2i32, 0] {
        payload.extend_from_slice(&value.to_be_bytes());
    }
    client.deliver_raw(header, &payload).unwrap();

    assert!(!client.trade.is_trading());
    assert_eq!(client.trade_events.count("Completed"), 1);
}

#[test]
fn trade_with_absent_user_is_rejected() {
    let mut client = TestClient::new();
    client.enter_room_with_users(1, &[1, 2]);

    let result = client.try_deliver_trade(messages::trade_opened(MODERN, 1, 3));

    assert_eq!(result, Err(TradeError::UnknownUser { user_id: 3 }));
    assert!(!client.trade.is_trading());
}

#[test]
fn close_from_a_stranger_keeps_the_trade_open() {
    let mut client = trading_client();

    let result = client.try_deliver_trade(messages::trade_closed(MODERN, 9, 0));

    assert_eq!(result, Err(TradeError::UnknownParticipant { user_id: 9 }));
    assert!(client.trade.is_trading());
    assert_eq!(client.trade.partner().expect("partner").id, 2);
}

#[test]
fn accept_from_a_stranger_is_rejected() {
    let mut client = trading_client();

    let result = client.try_deliver_trade(messages::trade_accepted(MODERN, 9, true));

    assert_eq!(result, Err(TradeError::UnknownParticipant { user_id: 9 }));
    assert!(!client.trade.has_accepted());
}

#[test]
fn trade_headers_are_routed_to_the_trade_manager() {
    let client = TestClient::new();

    assert!(client.trade.handles(Incoming::TradeOpened));
    assert!(client.trade.handles(Incoming::TradeClosed));
    assert!(!client.trade.handles(Incoming::Talk));
    assert!(!client.room.handles(Incoming::TradeOpened));
}

#[test]
fn trade_commands_go_to_the_server() {
    let client = trading_client();
    client.sink.take();

    client.trade.open_trade(2);
    client.trade.offer_item(10);
    client.trade.offer_items(&[10, 11]);
    client.trade.cancel_offer(10);
    client.trade.accept();
    client.trade.unaccept();
    client.trade.confirm();
    client.trade.close();

    let packets = client.sink.take();
    let headers: Vec<_> = packets.iter().map(|packet| packet.header).collect();
    assert_eq!(
        headers,
        vec![
            Header::Outgoing(Outgoing::OpenTrade),
            Header::Outgoing(Outgoing::OfferTradeItem),
            Header::Outgoing(Outgoing::OfferTradeItems),
            Header::Outgoing(Outgoing::CancelTradeOffer),
            Header::Outgoing(Outgoing::AcceptTrade),
            Header::Outgoing(Outgoing::UnacceptTrade),
            Header::Outgoing(Outgoing::ConfirmTrade),
            Header::Outgoing(Outgoing::CloseTrade),
        ]
    );

    let mut reader = PacketReader::new(&packets[2].payload, MODERN);
    assert_eq!(reader.read_int_count().unwrap(), 2);
    assert_eq!(reader.read_legacy_long().unwrap(), 10);
    assert_eq!(reader.read_legacy_long().unwrap(), 11);
    assert!(reader.is_empty());
    assert!(packets[4].payload.is_empty());
}
