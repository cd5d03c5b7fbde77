pub mod entity_registry;
pub mod error;
pub mod furni_store;
pub mod item_store;
