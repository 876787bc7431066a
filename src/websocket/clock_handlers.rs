use actix_web_actors::ws;
use log::{debug, warn};

use crate::clock::Player;
use crate::models::{AppState, ClientMessage, Command, ServerMessage};
use crate::websocket::handler::ClockWebSocket;

/// Turns a client request into a clock command, or explains why it can't.
pub fn parse_command(msg: &ClientMessage) -> Result<Command, String> {
    match msg.message_type.as_str() {
        "start_turn" => {
            let name = msg.player.as_deref().ok_or("start_turn requires a player")?;
            Player::parse(name)
                .map(Command::StartTurn)
                .ok_or_else(|| format!("Unknown player: {}", name))
        }
        "switch_time_control" => msg
            .time_control
            .clone()
            .map(Command::SwitchTimeControl)
            .ok_or_else(|| "switch_time_control requires a time_control".to_string()),
        "reset" => Ok(Command::Reset),
        other => Err(format!("Unknown message type: {}", other)),
    }
}

/// The reply owed to the sender of `msg`, if any.
///
/// Accepted commands that change the clock are broadcast to every session,
/// the sender included, so they get no separate reply.
pub fn respond(app_state: &AppState, msg: &ClientMessage) -> Option<ServerMessage> {
    match msg.message_type.as_str() {
        "snapshot" => return Some(app_state.snapshot_message()),
        "list_time_controls" => return Some(app_state.time_controls_message()),
        _ => {}
    }

    let command = match parse_command(msg) {
        Ok(command) => command,
        Err(e) => {
            warn!("Bad request: {}", e);
            return Some(ServerMessage::error(e));
        }
    };

    match app_state.apply(command) {
        Ok(applied) if applied.broadcast => None,
        Ok(applied) => Some(ServerMessage::snapshot(applied.snapshot)),
        Err(e) => Some(ServerMessage::error(e)),
    }
}

impl ClockWebSocket {
    pub fn handle_message(&mut self, msg: ClientMessage, ctx: &mut ws::WebsocketContext<Self>) {
        debug!("Session {} sent {}", self.id, msg.message_type);
        if let Some(reply) = respond(&self.app_state, &msg) {
            self.send(&reply, ctx);
        }
    }
}
