use actix::Message;
use serde::{Deserialize, Serialize};

use crate::clock::Player;
use crate::models::views::{SnapshotView, TimeControlView};

/// Message sent from client to server
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ClientMessage {
    pub message_type: String,
    pub player: Option<String>,
    pub time_control: Option<String>,
}

/// Message sent from server to client
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ServerMessage {
    pub message_type: String,
    pub snapshot: Option<SnapshotView>,
    pub time_controls: Option<Vec<TimeControlView>>,
    pub error: Option<String>,
}

impl ServerMessage {
    pub fn snapshot(snapshot: SnapshotView) -> Self {
        ServerMessage {
            message_type: "snapshot".to_string(),
            snapshot: Some(snapshot),
            time_controls: None,
            error: None,
        }
    }

    pub fn time_controls(time_controls: Vec<TimeControlView>) -> Self {
        ServerMessage {
            message_type: "time_controls".to_string(),
            snapshot: None,
            time_controls: Some(time_controls),
            error: None,
        }
    }

    pub fn error(error: impl ToString) -> Self {
        ServerMessage {
            message_type: "error".to_string(),
            snapshot: None,
            time_controls: None,
            error: Some(error.to_string()),
        }
    }
}

/// Operations a client may request on the shared clock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    StartTurn(Player),
    SwitchTimeControl(String),
    Reset,
}

/// Serialized server message pushed to a connected client
#[derive(Message, Debug, Clone)]
#[rtype(result = "()")]
pub struct ClockWebSocketMessage(pub String);
