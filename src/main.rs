use actix::Actor;
use actix_web::{web, App, HttpServer};
use log::info;
use std::io;

use chess_clock::models::AppState;
use chess_clock::routes::configure_routes;
use chess_clock::websocket::ClockTicker;
use chess_clock::Config;

#[actix_web::main]
async fn main() -> io::Result<()> {
    // Initialize logger
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let config = Config::from_env();
    let engine = config
        .engine()
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;
    info!(
        "Loaded {} time controls, starting with {}",
        engine.catalog().len(),
        config.time_control
    );

    // Create shared application state
    let app_state = web::Data::new(AppState::new(engine));
    ClockTicker::new(app_state.clone()).start();

    info!("Starting chess clock server at http://{}", config.bind);
    let bind = config.bind.clone();
    let static_dir = config.static_dir.clone();
    let config = web::Data::new(config);

    // Start HTTP server
    HttpServer::new(move || {
        App::new()
            .app_data(app_state.clone())
            .app_data(config.clone())
            .configure(|cfg| configure_routes(cfg, &static_dir))
    })
    .bind(bind)?
    .run()
    .await
}
