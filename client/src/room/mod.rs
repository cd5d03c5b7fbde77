mod commands;
mod current;
mod events;
mod handle;
mod handlers;
mod manager;
mod status;
mod visibility;

pub use current::{Room, RoomLayout, RoomProperties};
pub use events::{ChatEvent, Disposition, RoomEvent};
pub use handle::RoomHandle;
pub use manager::RoomManager;
pub use status::RoomStatus;
