use std::sync::Arc;

use crate::{
    model::{
        furni::{FloorItem, Furni, ItemType, WallItem},
        tile::Tile,
    },
    types::{ItemId, UserId},
    world::item_store::ItemStore,
};

/// Floor and wall furniture of one room visit
#[derive(Default)]
pub struct FurniStore {
    pub floor: ItemStore<FloorItem>,
    pub wall: ItemStore<WallItem>,
}

impl FurniStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.floor.len() + self.wall.len()
    }

    pub fn is_empty(&self) -> bool {
        self.floor.is_empty() && self.wall.is_empty()
    }

    pub fn get(&self, item_type: ItemType, id: ItemId) -> Option<Furni> {
        match item_type {
            ItemType::Floor => self.floor.get(id).map(Furni::Floor),
            ItemType::Wall => self.wall.get(id).map(Furni::Wall),
        }
    }

    pub fn all(&self) -> Vec<Furni> {
        let mut furni: Vec<Furni> = self.floor.values().into_iter().map(Furni::Floor).collect();
        furni.extend(self.wall.values().into_iter().map(Furni::Wall));
        furni
    }

    pub fn floor_items_at(&self, x: i32, y: i32) -> Vec<Arc<FloorItem>> {
        self.floor
            .values()
            .into_iter()
            .filter(|item| item.location.matches_xy(x, y))
            .collect()
    }

    /// Floor items on `tile`, comparing elevation within `epsilon`
    pub fn floor_items_at_tile(&self, tile: &Tile, epsilon: f64) -> Vec<Arc<FloorItem>> {
        self.floor
            .values()
            .into_iter()
            .filter(|item| item.location.matches(tile, epsilon))
            .collect()
    }

    pub fn of_kind(&self, kind: i32) -> Vec<Furni> {
        self.all()
            .into_iter()
            .filter(|furni| furni.kind() == kind)
            .collect()
    }

    pub fn owned_by(&self, owner_id: UserId) -> Vec<Furni> {
        self.all()
            .into_iter()
            .filter(|furni| furni.owner_id() == owner_id)
            .collect()
    }

    /// Case-insensitive owner name match
    pub fn owned_by_name(&self, owner_name: &str) -> Vec<Furni> {
        let owner_name = owner_name.to_lowercase();
        self.all()
            .into_iter()
            .filter(|furni| furni.owner_name().to_lowercase() == owner_name)
            .collect()
    }

    pub fn clear(&self) {
        self.floor.clear();
        self.wall.clear();
    }
}
