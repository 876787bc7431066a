pub mod catalog;
pub mod engine;
pub mod utils;

// Re-export important types
pub use catalog::{Catalog, Category, TimeControl, DEFAULT_TIME_CONTROL};
pub use engine::{ClockEngine, ClockState, GameSession, Player, PlayerClock};
pub use utils::format_clock;
