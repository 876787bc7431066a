use actix::*;
use actix_web::{web, Error, HttpRequest, HttpResponse};
use actix_web_actors::ws;
use log::{debug, info, warn};
use uuid::Uuid;

use crate::models::{AppState, ClientMessage, ClockWebSocketMessage, ServerMessage};

/// WebSocket session attached to the shared clock
pub struct ClockWebSocket {
    pub id: String,
    pub app_state: web::Data<AppState>,
}

impl ClockWebSocket {
    pub fn new(app_state: web::Data<AppState>) -> Self {
        ClockWebSocket {
            id: Uuid::new_v4().to_string(),
            app_state,
        }
    }

    pub fn send(&self, message: &ServerMessage, ctx: &mut ws::WebsocketContext<Self>) {
        match serde_json::to_string(message) {
            Ok(response_str) => ctx.text(response_str),
            Err(e) => {
                warn!("Failed to serialize response: {}", e);
                ctx.text("{\"error\": \"Internal server error\"}");
            }
        }
    }
}

impl Actor for ClockWebSocket {
    type Context = ws::WebsocketContext<Self>;

    fn started(&mut self, ctx: &mut Self::Context) {
        // Register the actor with the application state
        let total_sessions = self
            .app_state
            .register(&self.id, ctx.address().recipient());
        info!("WebSocket connection started: {}", self.id);
        info!("Total active sessions: {}", total_sessions);

        // New viewers render the current clock straight away
        let snapshot = self.app_state.snapshot_message();
        self.send(&snapshot, ctx);
    }

    fn stopping(&mut self, _: &mut Self::Context) -> Running {
        let total_sessions = self.app_state.unregister(&self.id);
        info!("WebSocket connection closed: {}", self.id);
        info!("Total active sessions: {}", total_sessions);

        Running::Stop
    }
}

impl Handler<ClockWebSocketMessage> for ClockWebSocket {
    type Result = ();

    fn handle(&mut self, msg: ClockWebSocketMessage, ctx: &mut Self::Context) {
        ctx.text(msg.0);
    }
}

// WebSocket message handler
impl StreamHandler<Result<ws::Message, ws::ProtocolError>> for ClockWebSocket {
    fn handle(&mut self, msg: Result<ws::Message, ws::ProtocolError>, ctx: &mut Self::Context) {
        match msg {
            Ok(ws::Message::Ping(msg)) => {
                ctx.pong(&msg);
            }
            Ok(ws::Message::Pong(_)) => {
                // Do nothing for pong messages
            }
            Ok(ws::Message::Text(text)) => {
                debug!("Received text message: {}", text);
                match serde_json::from_str::<ClientMessage>(text.as_ref()) {
                    Ok(client_msg) => {
                        self.handle_message(client_msg, ctx);
                    }
                    Err(e) => {
                        warn!("Error parsing client message: {}", e);
                        self.send(&ServerMessage::error(format!("Invalid message format: {}", e)), ctx);
                    }
                }
            }
            Ok(ws::Message::Binary(_)) => {
                warn!("Binary messages are not supported");
                self.send(&ServerMessage::error("Binary messages are not supported"), ctx);
            }
            Ok(ws::Message::Close(reason)) => {
                info!("Connection closed: {:?}", reason);
                ctx.close(reason);
                ctx.stop();
            }
            _ => {
                ctx.stop();
            }
        }
    }
}

/// WebSocket connection handler
pub async fn ws_index(req: HttpRequest, stream: web::Payload, app_state: web::Data<AppState>) -> Result<HttpResponse, Error> {
    let ws = ClockWebSocket::new(app_state);
    info!("New WebSocket connection: {}", ws.id);

    ws::start(ws, &req, stream)
}
