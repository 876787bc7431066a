pub mod app_state;
pub mod messages;
pub mod views;

// Re-export important types
pub use app_state::*;
pub use messages::*;
pub use views::*;
