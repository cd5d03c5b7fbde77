/// Integration tests for room occupants: arrivals, departures, status and
/// toggle messages, chat filtering and local-only visibility.
use roomsync_client::{Disposition, RoomConfig, RoomError, RoomEvent, RoomStatus};
use roomsync_shared::{
    BotDetails, ChatKind, Destination, EntityDetails, EntityStatusUpdate, Header, Incoming,
    ItemType, PacketReader, ProtocolVariant, Stance, Tile,
};
use roomsync_test::{messages, TestClient, TestFloorItemBuilder, TestUserBuilder};

const MODERN: ProtocolVariant = ProtocolVariant::Modern;

fn client_with_users() -> TestClient {
    let mut client = TestClient::new();
    client.enter_room_with_users(1, &[100, 200]);
    client.room_events.clear();
    client
}

#[test]
fn entities_added_are_registered_in_one_event() {
    let mut client = TestClient::new();
    client.enter_room(1, false);

    client.deliver(messages::entities_added(
        MODERN,
        &[
            TestUserBuilder::new(100, 1).name("Alice").build(),
            TestUserBuilder::new(200, 2).name("bob").build(),
        ],
    ));

    let room = client.handle().room().expect("active room");
    assert_eq!(room.entities().len(), 2);
    assert_eq!(room.entities().get_by_name("alice").expect("alice").index, 1);
    assert_eq!(room.entities().get_user_by_id(200).expect("bob").name, "bob");
    match client.room_events.last() {
        Some(RoomEvent::EntitiesAdded(entities)) => assert_eq!(entities.len(), 2),
        other => panic!("Expected EntitiesAdded, got {:?}", other),
    }
}

#[test]
fn duplicate_index_in_batch_is_skipped() {
    let mut client = client_with_users();

    client.deliver(messages::entities_added(
        MODERN,
        &[
            TestUserBuilder::new(300, 1).build(),
            TestUserBuilder::new(400, 4).build(),
        ],
    ));

    let room = client.handle().room().expect("active room");
    assert_eq!(room.entities().len(), 3);
    assert_eq!(room.entities().get(1).expect("index 1").id, 100);
    match client.room_events.last() {
        Some(RoomEvent::EntitiesAdded(entities)) => {
            assert_eq!(entities.len(), 1);
            assert_eq!(entities[0].index, 4);
        }
        other => panic!("Expected EntitiesAdded, got {:?}", other),
    }
    assert_eq!(client.room.anomaly_count(), 1);
}

#[test]
fn entities_before_entry_are_inapplicable() {
    let mut client = TestClient::new();
    client.deliver(messages::open_connection(MODERN, 1));
    client.deliver(messages::room_ready(MODERN, "model_a", 1));

    let result = client.try_deliver(messages::entities_added(
        MODERN,
        &[TestUserBuilder::new(1, 1).build()],
    ));

    assert_eq!(
        result,
        Err(RoomError::InapplicableState {
            header: Incoming::EntitiesAdded,
            status: RoomStatus::Loading
        })
    );
}

#[test]
fn entity_removed_by_index() {
    let mut client = client_with_users();

    client.deliver(messages::entity_removed(MODERN, 2));

    let room = client.handle().room().expect("active room");
    assert!(room.entities().get(2).is_none());
    match client.room_events.last() {
        Some(RoomEvent::EntityRemoved(entity)) => assert_eq!(entity.id, 200),
        other => panic!("Expected EntityRemoved, got {:?}", other),
    }

    let result = client.try_deliver(messages::entity_removed(MODERN, 2));
    assert_eq!(result, Err(RoomError::EntityNotFound { index: 2 }));
}

#[test]
fn legacy_entity_removed_reads_a_text_index() {
    let mut client = TestClient::with_variant(ProtocolVariant::Legacy);
    client.enter_room_with_users(1, &[100, 200]);

    client.deliver(messages::entity_removed(ProtocolVariant::Legacy, 2));

    let room = client.handle().room().expect("active room");
    assert_eq!(room.entities().len(), 1);
}

#[test]
fn status_batch_updates_known_entities() {
    let mut client = client_with_users();

    client.deliver(messages::entity_status(
        MODERN,
        &[
            EntityStatusUpdate::new(1, Tile::new(4, 4, 0.0), 2, 2, "/sit 0.5/"),
            EntityStatusUpdate::new(9, Tile::new(1, 1, 0.0), 0, 0, "/"),
        ],
    ));

    let room = client.handle().room().expect("active room");
    let entity = room.entities().get(1).expect("index 1");
    assert_eq!(entity.location, Tile::new(4, 4, 0.0));
    assert_eq!(entity.stance, Stance::Sit);
    match client.room_events.last() {
        Some(RoomEvent::EntitiesUpdated(entities)) => assert_eq!(entities.len(), 1),
        other => panic!("Expected EntitiesUpdated, got {:?}", other),
    }
    assert_eq!(client.room.anomaly_count(), 1);
}

#[test]
fn avatar_update_carries_previous_values() {
    let mut client = client_with_users();

    client.deliver(messages::avatar_update(MODERN, 1, "hd-180", "F", "hello", 250));

    let room = client.handle().room().expect("active room");
    let entity = room.entities().get(1).expect("index 1");
    assert_eq!(entity.figure, "hd-180");
    assert_eq!(entity.gender(), Some("F"));
    match client.room_events.last() {
        Some(RoomEvent::EntityDataUpdated {
            previous_gender,
            previous_achievement_score,
            previous_motto,
            ..
        }) => {
            assert_eq!(previous_gender.as_deref(), Some("M"));
            assert_eq!(previous_achievement_score, Some(0));
            assert_eq!(previous_motto, "");
        }
        other => panic!("Expected EntityDataUpdated, got {:?}", other),
    }
}

#[test]
fn avatar_update_on_private_bot_keeps_no_score() {
    let mut client = TestClient::new();
    client.enter_room(1, false);
    let bot = TestUserBuilder::new(500, 7)
        .details(EntityDetails::PrivateBot(BotDetails {
            gender: "M".to_string(),
            ..BotDetails::default()
        }))
        .build();
    client.deliver(messages::entities_added(MODERN, &[bot]));

    client.deliver(messages::avatar_update(MODERN, 7, "fig", "F", "beep", 99));

    match client.room_events.last() {
        Some(RoomEvent::EntityDataUpdated {
            entity,
            previous_gender,
            previous_achievement_score,
            ..
        }) => {
            assert_eq!(entity.gender(), Some("F"));
            assert_eq!(previous_gender.as_deref(), Some("M"));
            assert_eq!(previous_achievement_score, None);
        }
        other => panic!("Expected EntityDataUpdated, got {:?}", other),
    }
}

#[test]
fn toggles_update_the_live_entity() {
    let mut client = client_with_users();

    client.deliver(messages::dance(MODERN, 2, 3));
    client.deliver(messages::typing(MODERN, 2, true));

    let room = client.handle().room().expect("active room");
    let entity = room.entities().get(2).expect("index 2");
    assert_eq!(entity.dance, 3);
    assert!(entity.is_typing);
    assert_eq!(client.room_events.names(), vec!["EntityDance", "EntityTyping"]);

    let result = client.try_deliver(messages::dance(MODERN, 9, 1));
    assert_eq!(result, Err(RoomError::EntityNotFound { index: 9 }));
}

#[test]
fn chat_is_forwarded_with_its_speaker() {
    let mut client = client_with_users();

    let disposition = client.deliver(messages::chat(MODERN, Incoming::Shout, 2, "hi all"));

    assert_eq!(disposition, Disposition::Forward);
    match client.room_events.last() {
        Some(RoomEvent::Chat(chat)) => {
            assert_eq!(chat.entity.id, 200);
            assert_eq!(chat.kind, ChatKind::Shout);
            assert_eq!(chat.message.message, "hi all");
            assert!(!chat.is_blocked());
        }
        other => panic!("Expected Chat, got {:?}", other),
    }
}

#[test]
fn chat_blocked_by_a_listener() {
    let mut client = client_with_users();
    client.room.on_event(|event| {
        if let RoomEvent::Chat(chat) = event {
            if chat.message.message.contains("spam") {
                chat.block();
            }
        }
    });

    assert_eq!(
        client.deliver(messages::talk(MODERN, 1, "buy spam")),
        Disposition::Block
    );
    assert_eq!(
        client.deliver(messages::talk(MODERN, 1, "hello")),
        Disposition::Forward
    );
}

#[test]
fn chat_from_hidden_entity_is_blocked() {
    let mut client = client_with_users();
    assert!(client.room.hide_entity(2));

    assert_eq!(
        client.deliver(messages::talk(MODERN, 2, "psst")),
        Disposition::Block
    );
    assert_eq!(client.room_events.count("Chat"), 1);
}

#[test]
fn chat_from_hidden_entity_is_forwarded_when_configured() {
    let config = RoomConfig {
        block_hidden_entity_chat: false,
        ..RoomConfig::default()
    };
    let mut client = TestClient::with_config(config, MODERN);
    client.enter_room_with_users(1, &[100, 200]);
    client.room.hide_entity(2);

    assert_eq!(
        client.deliver(messages::talk(MODERN, 2, "psst")),
        Disposition::Forward
    );
}

#[test]
fn chat_from_unknown_entity_is_an_anomaly() {
    let mut client = client_with_users();

    let result = client.try_deliver(messages::talk(MODERN, 9, "who am i"));

    assert_eq!(result, Err(RoomError::EntityNotFound { index: 9 }));
    assert_eq!(client.room_events.count("Chat"), 0);
}

#[test]
fn hiding_an_entity_injects_a_removal() {
    let mut client = client_with_users();

    assert!(client.room.hide_entity(2));
    assert!(!client.room.hide_entity(2));
    assert!(!client.room.hide_entity(9));

    let packets = client.sink.take();
    assert_eq!(packets.len(), 1);
    assert_eq!(packets[0].header, Header::Incoming(Incoming::EntityRemoved));
    assert_eq!(packets[0].destination(), Destination::Client);
    let mut reader = PacketReader::new(&packets[0].payload, MODERN);
    assert_eq!(reader.read_index_string().unwrap(), 2);

    let room = client.handle().room().expect("active room");
    assert!(room.entities().get(2).expect("index 2").is_hidden);

    assert!(client.room.show_entity(2));
    let packets = client.sink.take();
    assert_eq!(packets[0].header, Header::Incoming(Incoming::EntitiesAdded));
    assert_eq!(
        client.room_events.names(),
        vec!["EntityVisibilityToggled", "EntityVisibilityToggled"]
    );
}

#[test]
fn hiding_furniture_injects_client_packets_only() {
    let mut client = TestClient::new();
    client.enter_room(1, false);
    client.deliver(messages::floor_item_add(
        MODERN,
        &TestFloorItemBuilder::new(10).owner(5, "alice").build(),
    ));
    client.room_events.clear();

    assert!(client.room.hide_furni(ItemType::Floor, 10));
    assert!(!client.room.hide_furni(ItemType::Floor, 10));
    assert!(!client.room.hide_furni(ItemType::Wall, 10));
    assert!(client.room.show_furni(ItemType::Floor, 10));

    assert!(client.sink.sent_to(Destination::Server).is_empty());
    assert_eq!(
        client.sink.headers(),
        vec![
            Header::Incoming(Incoming::FloorItemRemove),
            Header::Incoming(Incoming::FloorItemAdd),
        ]
    );
    assert_eq!(client.room_events.count("FurniVisibilityToggled"), 2);
}

#[test]
fn visibility_needs_a_room() {
    let mut client = TestClient::new();

    assert!(!client.room.hide_entity(1));
    assert!(!client.room.hide_furni(ItemType::Floor, 1));
    assert!(client.sink.is_empty());
}
