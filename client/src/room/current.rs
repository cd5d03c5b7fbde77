use std::{fmt, sync::Arc};

use parking_lot::RwLock;

use roomsync_shared::{
    EntityRegistry, FloorPlan, FurniStore, Heightmap, RoomData, RoomId, Tile,
};

/// Decoration codes sent as room properties while loading
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RoomProperties {
    pub floor: Option<String>,
    pub wallpaper: Option<String>,
    pub landscape: Option<String>,
}

/// Everything about a room's shape that arrives piecemeal while it loads
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RoomLayout {
    pub model: String,
    pub properties: RoomProperties,
    pub door_tile: Option<Tile>,
    pub entry_direction: i32,
    pub floor_plan: Option<FloorPlan>,
    pub heightmap: Option<Heightmap>,
    pub hide_walls: bool,
    pub wall_thickness: i32,
    pub floor_thickness: i32,
}

/// One room visit.
///
/// A `Room` is shared with readers through an `Arc`. The entity registry and
/// furniture store are concurrent maps; layout and metadata sit behind their
/// own locks so a reader only ever copies out a whole value.
pub struct Room {
    id: RoomId,
    layout: RwLock<RoomLayout>,
    data: RwLock<Option<Arc<RoomData>>>,
    entities: EntityRegistry,
    furni: FurniStore,
}

impl Room {
    pub fn new(id: RoomId, model: &str, data: Option<Arc<RoomData>>) -> Self {
        Self {
            id,
            layout: RwLock::new(RoomLayout {
                model: model.to_string(),
                ..RoomLayout::default()
            }),
            data: RwLock::new(data),
            entities: EntityRegistry::new(),
            furni: FurniStore::new(),
        }
    }

    pub fn id(&self) -> RoomId {
        self.id
    }

    pub fn layout(&self) -> RoomLayout {
        self.layout.read().clone()
    }

    pub fn model(&self) -> String {
        self.layout.read().model.clone()
    }

    pub fn properties(&self) -> RoomProperties {
        self.layout.read().properties.clone()
    }

    pub fn door_tile(&self) -> Option<Tile> {
        self.layout.read().door_tile
    }

    pub fn entry_direction(&self) -> i32 {
        self.layout.read().entry_direction
    }

    pub fn floor_plan(&self) -> Option<FloorPlan> {
        self.layout.read().floor_plan.clone()
    }

    pub fn heightmap(&self) -> Option<Heightmap> {
        self.layout.read().heightmap.clone()
    }

    pub fn data(&self) -> Option<Arc<RoomData>> {
        self.data.read().clone()
    }

    pub fn entities(&self) -> &EntityRegistry {
        &self.entities
    }

    pub fn furni(&self) -> &FurniStore {
        &self.furni
    }

    pub(crate) fn update_layout<R>(&self, f: impl FnOnce(&mut RoomLayout) -> R) -> R {
        f(&mut self.layout.write())
    }

    pub(crate) fn set_data(&self, data: Arc<RoomData>) {
        *self.data.write() = Some(data);
    }
}

impl fmt::Debug for Room {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Room")
            .field("id", &self.id)
            .field("model", &self.layout.read().model)
            .field("entities", &self.entities.len())
            .field("furni", &self.furni.len())
            .finish_non_exhaustive()
    }
}
