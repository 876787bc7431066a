pub mod clock_handlers;
pub mod handler;
pub mod ticker;

pub use handler::{ws_index, ClockWebSocket};
pub use ticker::{ClockTicker, Tick};
