/// PROPERTY-BASED TESTS: Wire codec round trips
///
/// Every model decodes back to itself on both protocol variants, given
/// values both variants can carry:
/// 1. ids fit a 32-bit int (`Legacy` frames them that way)
/// 2. elevations are exact in an f32 (`Modern` sends IEEE singles)

use proptest::prelude::*;
use roomsync_shared::{
    BotDetails, Entity, EntityDetails, FloorItem, HighScoreEntry, ItemData, ItemDataPayload,
    ItemType, LimitedEdition, ModerationSettings, PacketReader, PacketWriter, PetDetails,
    ProtocolVariant, RoomAccess, RoomData, RoomGroup, RoomPromotion, Serde, Tile, TradeItem,
    TradeOffer, UserDetails, WallItem, WallLocation, WallOrientation,
};

fn variant_strategy() -> impl Strategy<Value = ProtocolVariant> {
    prop_oneof![Just(ProtocolVariant::Legacy), Just(ProtocolVariant::Modern)]
}

fn id_strategy() -> impl Strategy<Value = i64> {
    1i64..i32::MAX as i64
}

fn text_strategy() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9 .-]{0,16}"
}

fn texts_strategy() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec(text_strategy(), 0..4)
}

// Quarter steps are exact in both f32 and decimal text
fn z_strategy() -> impl Strategy<Value = f64> {
    (0i32..200).prop_map(|quarters| quarters as f64 / 4.0)
}

fn tile_strategy() -> impl Strategy<Value = Tile> {
    (0i32..64, 0i32..64, z_strategy()).prop_map(|(x, y, z)| Tile::new(x, y, z))
}

fn user_details_strategy() -> impl Strategy<Value = EntityDetails> {
    (
        prop_oneof![Just("M"), Just("F")],
        id_strategy(),
        text_strategy(),
        0i32..100_000,
        any::<bool>(),
    )
        .prop_map(|(gender, group_id, group_name, score, is_moderator)| {
            EntityDetails::User(UserDetails {
                gender: gender.to_string(),
                group_id,
                group_status: 1,
                group_name,
                swim_figure: String::new(),
                achievement_score: score,
                is_moderator,
            })
        })
}

fn pet_details_strategy() -> impl Strategy<Value = EntityDetails> {
    (
        (0i32..30, id_strategy(), text_strategy(), 0i32..5),
        prop::collection::vec(any::<bool>(), 6),
        (1i32..21, text_strategy()),
    )
        .prop_map(|((breed, owner_id, owner_name, rarity), flags, (level, posture))| {
            EntityDetails::Pet(PetDetails {
                breed,
                owner_id,
                owner_name,
                rarity,
                has_saddle: flags[0],
                is_riding: flags[1],
                can_breed: flags[2],
                can_harvest: flags[3],
                can_revive: flags[4],
                has_breeding_permission: flags[5],
                level,
                posture,
            })
        })
}

fn bot_details_strategy() -> impl Strategy<Value = EntityDetails> {
    (
        prop_oneof![Just("M"), Just("F")],
        id_strategy(),
        text_strategy(),
        prop::collection::vec(any::<i16>(), 0..6),
    )
        .prop_map(|(gender, owner_id, owner_name, skills)| {
            EntityDetails::PrivateBot(BotDetails {
                gender: gender.to_string(),
                owner_id,
                owner_name,
                skills,
            })
        })
}

fn details_strategy() -> impl Strategy<Value = EntityDetails> {
    prop_oneof![
        user_details_strategy(),
        pet_details_strategy(),
        Just(EntityDetails::PublicBot),
        bot_details_strategy(),
    ]
}

fn entity_strategy() -> impl Strategy<Value = Entity> {
    (
        id_strategy(),
        0i32..500,
        text_strategy(),
        text_strategy(),
        tile_strategy(),
        0i32..8,
        details_strategy(),
    )
        .prop_map(|(id, index, name, motto, location, direction, details)| {
            let mut entity = Entity::new(id, index, &name, details);
            entity.motto = motto;
            entity.location = location;
            entity.direction = direction;
            entity
        })
}

fn payload_strategy() -> impl Strategy<Value = ItemDataPayload> {
    prop_oneof![
        text_strategy().prop_map(|value| ItemDataPayload::Legacy { value }),
        prop::collection::vec((text_strategy(), text_strategy()), 0..4)
            .prop_map(ItemDataPayload::Map),
        texts_strategy().prop_map(ItemDataPayload::StringArray),
        (text_strategy(), any::<i32>())
            .prop_map(|(value, result)| ItemDataPayload::VoteResult { value, result }),
        Just(ItemDataPayload::Empty),
        prop::collection::vec(any::<i32>(), 0..6).prop_map(ItemDataPayload::IntArray),
        (
            text_strategy(),
            0i32..4,
            0i32..4,
            prop::collection::vec((any::<i32>(), texts_strategy()), 0..4),
        )
            .prop_map(|(value, score_type, clear_type, entries)| {
                ItemDataPayload::HighScore {
                    value,
                    score_type,
                    clear_type,
                    entries: entries
                        .into_iter()
                        .map(|(value, users)| HighScoreEntry { value, users })
                        .collect(),
                }
            }),
        (text_strategy(), 0i32..100, 1i32..100).prop_map(|(value, hits, target)| {
            ItemDataPayload::CrackableFurni {
                value,
                hits,
                target,
            }
        }),
    ]
}

/// Any payload, with or without the limited-edition trailer and a spare
/// format bit above the kind byte
fn item_data_strategy() -> impl Strategy<Value = ItemData> {
    (
        payload_strategy(),
        prop_oneof![Just(0), Just(0x200)],
        prop::option::of((1i32..1000, 1i32..1000)),
    )
        .prop_map(|(payload, flags, limited)| ItemData {
            flags,
            payload,
            limited: limited.map(|(serial, total)| LimitedEdition { serial, total }),
        })
}

fn floor_item_strategy() -> impl Strategy<Value = FloorItem> {
    (
        id_strategy(),
        1i32..5000,
        tile_strategy(),
        0i32..8,
        z_strategy(),
        item_data_strategy(),
        id_strategy(),
    )
        .prop_map(|(id, kind, location, direction, height, data, owner_id)| {
            let mut item = FloorItem::new(id, kind, location);
            item.direction = direction;
            item.height = height;
            item.data = data;
            item.owner_id = owner_id;
            item
        })
}

fn wall_item_strategy() -> impl Strategy<Value = WallItem> {
    (
        id_strategy(),
        1i32..5000,
        (0i32..32, 0i32..32, 0i32..64, 0i32..64, any::<bool>()),
        text_strategy(),
    )
        .prop_map(|(id, kind, (wx, wy, lx, ly, left), data)| {
            let orientation = if left {
                WallOrientation::Left
            } else {
                WallOrientation::Right
            };
            let mut item = WallItem::new(id, kind, WallLocation::new(wx, wy, lx, ly, orientation));
            item.data = data;
            item
        })
}

fn trade_item_strategy() -> impl Strategy<Value = TradeItem> {
    (
        id_strategy(),
        any::<bool>(),
        1i32..5000,
        item_data_strategy(),
        (1i32..29, 1i32..13, 2000i32..2030),
    )
        .prop_map(|(item_id, is_floor, kind, data, (day, month, year))| TradeItem {
            item_id,
            item_type: if is_floor {
                ItemType::Floor
            } else {
                ItemType::Wall
            },
            furni_id: item_id,
            kind,
            category: 1,
            groupable: !is_floor,
            data,
            creation_day: day,
            creation_month: month,
            creation_year: year,
            extra: if is_floor { 3 } else { 0 },
        })
}

fn trade_offer_strategy() -> impl Strategy<Value = TradeOffer> {
    (
        id_strategy(),
        prop::collection::vec(trade_item_strategy(), 0..5),
        0i32..1000,
    )
        .prop_map(|(user_id, items, credit_count)| TradeOffer {
            user_id,
            furni_count: items.len() as i32,
            items,
            credit_count,
        })
}

fn room_data_strategy() -> impl Strategy<Value = RoomData> {
    (
        (
            any::<bool>(),
            id_strategy(),
            text_strategy(),
            id_strategy(),
            text_strategy(),
            0i32..6,
        ),
        (0i32..50, 0i32..50, text_strategy(), 0i32..3, texts_strategy()),
        (
            prop_oneof![Just(0), Just(8), Just(16)],
            prop::option::of((id_strategy(), text_strategy(), text_strategy())),
            prop::option::of((text_strategy(), text_strategy(), 0i32..120)),
        ),
        (
            prop::collection::vec(any::<bool>(), 5),
            (0i32..6, 0i32..6, 0i32..6),
        ),
    )
        .prop_map(
            |(
                (is_entering, id, name, owner_id, owner_name, access),
                (users, max_users, description, trading, tags),
                (flags, group, promotion),
                (toggles, (who_can_mute, who_can_kick, who_can_ban)),
            )| RoomData {
                is_entering,
                id,
                name,
                owner_id,
                owner_name,
                access: RoomAccess::from_wire(access),
                users,
                max_users,
                description,
                trading,
                tags,
                flags,
                group: group.map(|(id, name, badge)| RoomGroup { id, name, badge }),
                promotion: promotion.map(|(name, description, minutes_remaining)| {
                    RoomPromotion {
                        name,
                        description,
                        minutes_remaining,
                    }
                }),
                forward: toggles[0],
                staff_pick: toggles[1],
                is_group_member: toggles[2],
                all_muted: toggles[3],
                moderation: ModerationSettings {
                    who_can_mute,
                    who_can_kick,
                    who_can_ban,
                },
                can_mute: toggles[4],
                ..RoomData::default()
            },
        )
}

fn round_trip<T: Serde>(value: &T, variant: ProtocolVariant) -> (T, bool) {
    let mut writer = PacketWriter::new(variant);
    value.ser(&mut writer);
    let bytes = writer.to_bytes();
    let mut reader = PacketReader::new(&bytes, variant);
    let decoded = T::de(&mut reader).expect("decodes what was encoded");
    (decoded, reader.is_empty())
}

proptest! {
    /// Users, pets, public bots and private bots
    #[test]
    fn prop_entity_round_trips(entity in entity_strategy(), variant in variant_strategy()) {
        let (decoded, consumed) = round_trip(&entity, variant);
        prop_assert!(consumed);
        prop_assert_eq!(decoded, entity);
    }

    #[test]
    fn prop_item_data_round_trips(data in item_data_strategy(), variant in variant_strategy()) {
        let (decoded, consumed) = round_trip(&data, variant);
        prop_assert!(consumed);
        prop_assert_eq!(decoded, data);
    }

    /// Owner names only travel with the owner-suffixed encoding
    #[test]
    fn prop_floor_item_round_trips(item in floor_item_strategy(), variant in variant_strategy()) {
        let (decoded, consumed) = round_trip(&item, variant);
        prop_assert!(consumed);
        prop_assert_eq!(decoded, item);
    }

    #[test]
    fn prop_wall_item_round_trips(item in wall_item_strategy(), variant in variant_strategy()) {
        let (decoded, consumed) = round_trip(&item, variant);
        prop_assert!(consumed);
        prop_assert_eq!(decoded, item);
    }

    #[test]
    fn prop_trade_offer_round_trips(offer in trade_offer_strategy(), variant in variant_strategy()) {
        let (decoded, consumed) = round_trip(&offer, variant);
        prop_assert!(consumed);
        prop_assert_eq!(decoded, offer);
    }

    /// Group and promotion sections are present exactly when their flag bit is
    #[test]
    fn prop_room_data_round_trips(data in room_data_strategy(), variant in variant_strategy()) {
        let (decoded, consumed) = round_trip(&data, variant);
        prop_assert!(consumed);
        prop_assert_eq!(decoded, data);
    }

    /// The batch framing differs per variant but the contents do not
    #[test]
    fn prop_entity_batch_round_trips(
        entities in prop::collection::vec(entity_strategy(), 0..6),
        variant in variant_strategy(),
    ) {
        let mut writer = PacketWriter::new(variant);
        Entity::ser_batch(&entities, &mut writer);
        let bytes = writer.to_bytes();
        let mut reader = PacketReader::new(&bytes, variant);

        let decoded = Entity::de_batch(&mut reader).expect("decodes what was encoded");
        prop_assert!(reader.is_empty());
        prop_assert_eq!(decoded, entities);
    }
}
