/// Symbolic names of every inbound message this crate understands.
///
/// Wire identifiers vary between client builds, see
/// [`Protocol`](crate::Protocol) for the mapping.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Incoming {
    // Room lifecycle
    RoomDataResult,
    OpenConnection,
    QueueStatus,
    Spectator,
    RoomReady,
    RoomProperty,
    RightsGranted,
    RightsRevoked,
    EntryTile,
    StackingHeightmap,
    StackingHeightmapDiff,
    FloorPlan,
    Visualization,
    ChatSettings,
    EntryInfo,
    CloseConnection,
    GenericError,
    Doorbell,
    DoorbellAccepted,
    DoorbellRejected,

    // Floor items
    FloorItems,
    FloorItemAdd,
    FloorItemRemove,
    FloorItemUpdate,
    RollerMove,
    ItemDataUpdate,
    ItemDataUpdateBatch,
    DiceValue,

    // Wall items
    WallItems,
    WallItemAdd,
    WallItemRemove,
    WallItemUpdate,

    // Entities
    EntitiesAdded,
    EntityRemoved,
    EntityStatus,
    AvatarUpdate,
    NameChanged,
    Idle,
    Dance,
    Expression,
    HandItem,
    Effect,
    Typing,
    Whisper,
    Talk,
    Shout,

    // Trading
    TradeOpened,
    TradeOpenFailed,
    TradeUpdated,
    TradeAccepted,
    TradeConfirmation,
    TradeClosed,
}

/// Symbolic names of outbound commands
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Outgoing {
    PlaceFloorItem,
    PlaceWallItem,
    MoveFloorItem,
    MoveWallItem,
    PickupItem,
    SetStackHelperHeight,

    OpenTrade,
    OfferTradeItem,
    OfferTradeItems,
    CancelTradeOffer,
    AcceptTrade,
    UnacceptTrade,
    ConfirmTrade,
    CloseTrade,
}
