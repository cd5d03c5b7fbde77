mod error;
mod events;
mod manager;

pub use error::TradeError;
pub use events::TradeEvent;
pub use manager::TradeManager;
