use actix_web::{web, App, HttpServer};
use backend::config::AppConfig;
use backend::relay_controller::state::{start_relay_updater, RelayState};
use backend::services;
use backend::store::RecordStore;
use env_logger::Env;
use log::info;
use std::collections::HashMap;
use std::io;
use std::sync::Arc;
use tokio::sync::{mpsc, RwLock};

#[actix_web::main]
async fn main() -> io::Result<()> {
    env_logger::init_from_env(Env::default().default_filter_or("info"));
    let config = AppConfig::from_env();

    let store = RecordStore::open(&config.database_path)
        .map_err(|e| io::Error::new(io::ErrorKind::Other, e.to_string()))?;

    // Initialize relay controller state
    let (tx, rx) = mpsc::channel(100);
    let relay_state = RelayState {
        attempts: Arc::new(RwLock::new(HashMap::new())),
        tx,
    };

    // Start relay updater task
    let updater_state = relay_state.clone();
    tokio::spawn(async move {
        start_relay_updater(updater_state, rx).await;
    });

    let bind_addr = (config.bind_host.clone(), config.bind_port);
    info!(
        "Server running at http://{}:{}",
        config.bind_host, config.bind_port
    );

    HttpServer::new(move || {
        App::new()
            .app_data(web::JsonConfig::default().limit(10 * 1024 * 1024)) // 10 MB
            .app_data(web::Data::new(store.clone()))
            .app_data(web::Data::new(config.clone()))
            .app_data(web::Data::new(relay_state.clone()))
            .service(services::templates::configure_routes())
            .service(services::contracts::configure_routes())
            .service(services::export::configure_routes())
    })
    .bind(bind_addr)?
    .run()
    .await
}
