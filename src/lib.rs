//! Two-player chess clock.
//!
//! [`clock`] holds the time-control catalog and the turn-alternation engine.
//! [`models`], [`websocket`] and [`routes`] expose one shared clock over HTTP
//! and WebSocket, with [`websocket::ClockTicker`] as the one-second scheduler.

pub mod clock;
pub mod config;
pub mod error;
pub mod models;
pub mod routes;
pub mod websocket;

pub use clock::{Catalog, ClockEngine, Player};
pub use config::Config;
pub use error::{ClockError, Rejection};
