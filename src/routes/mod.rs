use actix_files as fs;
use actix_web::{web, HttpResponse, Responder};
use log::warn;
use std::path::Path;

use crate::clock::Player;
use crate::config::Config;
use crate::error::ClockError;
use crate::models::{AppState, Command, ServerMessage};

/// HTTP handler for the index page
pub async fn index(config: web::Data<Config>) -> actix_web::Result<fs::NamedFile> {
    let path = Path::new(&config.static_dir).join("index.html");
    Ok(fs::NamedFile::open_async(path).await?)
}

fn clock_error(e: ClockError) -> HttpResponse {
    let body = ServerMessage::error(&e);
    match e {
        ClockError::NotFound(_) => HttpResponse::NotFound().json(body),
        ClockError::InvalidTransition(_) => HttpResponse::Conflict().json(body),
        ClockError::InvalidLabel(_) | ClockError::DuplicateTimeControl(_) => {
            HttpResponse::BadRequest().json(body)
        }
    }
}

fn apply(app_state: &AppState, command: Command) -> HttpResponse {
    match app_state.apply(command) {
        Ok(applied) => HttpResponse::Ok().json(ServerMessage::snapshot(applied.snapshot)),
        Err(e) => clock_error(e),
    }
}

pub async fn time_controls(app_state: web::Data<AppState>) -> impl Responder {
    HttpResponse::Ok().json(app_state.time_controls_message())
}

pub async fn snapshot(app_state: web::Data<AppState>) -> impl Responder {
    HttpResponse::Ok().json(app_state.snapshot_message())
}

pub async fn start_turn(app_state: web::Data<AppState>, player: web::Path<String>) -> impl Responder {
    let name = player.into_inner();
    match Player::parse(&name) {
        Some(player) => apply(&app_state, Command::StartTurn(player)),
        None => {
            warn!("Unknown player: {}", name);
            HttpResponse::BadRequest().json(ServerMessage::error(format!("Unknown player: {}", name)))
        }
    }
}

pub async fn reset(app_state: web::Data<AppState>) -> impl Responder {
    apply(&app_state, Command::Reset)
}

pub async fn switch_time_control(app_state: web::Data<AppState>, id: web::Path<String>) -> impl Responder {
    apply(&app_state, Command::SwitchTimeControl(id.into_inner()))
}

/// The JSON API over the shared clock
pub fn configure_api(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .route("/time-controls", web::get().to(time_controls))
            .route("/snapshot", web::get().to(snapshot))
            .route("/turn/{player}", web::post().to(start_turn))
            .route("/reset", web::post().to(reset))
            .route("/time-control/{id}", web::post().to(switch_time_control)),
    );
}

/// Configure the HTTP routes
pub fn configure_routes(cfg: &mut web::ServiceConfig, static_dir: &str) {
    cfg.service(web::resource("/ws").route(web::get().to(crate::websocket::ws_index)))
        .configure(configure_api)
        .service(web::resource("/").route(web::get().to(index)))
        .service(fs::Files::new("/static", static_dir));
}
