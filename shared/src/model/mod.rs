pub mod chat;
pub mod entity;
pub mod floor_plan;
pub mod furni;
pub mod item_data;
pub mod roller;
pub mod room_data;
pub mod tile;
pub mod trade;
