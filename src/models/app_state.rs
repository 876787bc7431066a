use actix::Recipient;
use log::{debug, info, warn};
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::clock::ClockEngine;
use crate::error::ClockError;
use crate::models::messages::{ClockWebSocketMessage, Command, ServerMessage};
use crate::models::views::{list_time_controls, SnapshotView};

/// Outcome of a command the clock accepted
#[derive(Debug, Clone, PartialEq)]
pub struct Applied {
    pub snapshot: SnapshotView,
    /// Whether the clock changed, and so the snapshot went out to every session.
    pub broadcast: bool,
}

/// Application state shared between connections
///
/// Holds the single live clock for the process. Every mutation goes through
/// the engine lock, so commands from HTTP, WebSocket and the ticker are
/// serialized.
pub struct AppState {
    pub engine: Mutex<ClockEngine>,
    pub sessions: Mutex<HashMap<String, Recipient<ClockWebSocketMessage>>>,
}

impl AppState {
    pub fn new(engine: ClockEngine) -> Self {
        AppState {
            engine: Mutex::new(engine),
            sessions: Mutex::new(HashMap::new()),
        }
    }

    pub fn engine(&self) -> MutexGuard<'_, ClockEngine> {
        self.engine.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn sessions(&self) -> MutexGuard<'_, HashMap<String, Recipient<ClockWebSocketMessage>>> {
        self.sessions.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn register(&self, id: &str, recipient: Recipient<ClockWebSocketMessage>) -> usize {
        let mut sessions = self.sessions();
        sessions.insert(id.to_string(), recipient);
        sessions.len()
    }

    pub fn unregister(&self, id: &str) -> usize {
        let mut sessions = self.sessions();
        sessions.remove(id);
        sessions.len()
    }

    pub fn snapshot(&self) -> SnapshotView {
        SnapshotView::of(&self.engine())
    }

    pub fn snapshot_message(&self) -> ServerMessage {
        ServerMessage::snapshot(self.snapshot())
    }

    pub fn time_controls_message(&self) -> ServerMessage {
        ServerMessage::time_controls(list_time_controls(&self.engine()))
    }

    /// Runs a command against the clock and broadcasts the new snapshot when
    /// anything changed. Rejected commands leave the clock untouched.
    pub fn apply(&self, command: Command) -> Result<Applied, ClockError> {
        let (changed, snapshot) = {
            let mut engine = self.engine();
            let changed = match &command {
                Command::StartTurn(player) => engine.start_turn(*player).map(|_| true),
                Command::SwitchTimeControl(id) => engine.switch_time_control(id),
                Command::Reset => {
                    engine.reset();
                    Ok(true)
                }
            };
            match changed {
                Ok(changed) => (changed, SnapshotView::of(&engine)),
                Err(e) => {
                    warn!("Rejected {:?}: {}", command, e);
                    return Err(e);
                }
            }
        };

        info!("Applied {:?}", command);
        if changed {
            self.broadcast(&ServerMessage::snapshot(snapshot.clone()));
        }
        Ok(Applied {
            snapshot,
            broadcast: changed,
        })
    }

    /// One scheduler beat: takes a second off the running clock, if any.
    /// Returns `None` when no clock is running, so nothing was ticked.
    pub fn tick(&self) -> Option<SnapshotView> {
        let snapshot = {
            let mut engine = self.engine();
            let player = engine.snapshot().running_player()?;
            if let Err(e) = engine.tick(player) {
                debug!("Tick for {} skipped: {}", player, e);
                return None;
            }
            SnapshotView::of(&engine)
        };

        self.broadcast(&ServerMessage::snapshot(snapshot.clone()));
        Some(snapshot)
    }

    pub fn broadcast(&self, message: &ServerMessage) {
        // Serialize the message once
        let message_str = match serde_json::to_string(message) {
            Ok(s) => s,
            Err(e) => {
                warn!("Error serializing message: {}", e);
                return;
            }
        };

        let sessions = self.sessions();
        debug!("Broadcasting {} to {} sessions", message.message_type, sessions.len());
        for (id, recipient) in sessions.iter() {
            recipient.do_send(ClockWebSocketMessage(message_str.clone()));
            debug!("Sent {} to session {}", message.message_type, id);
        }
    }
}
