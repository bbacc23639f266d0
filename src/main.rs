mod config;
mod dto;
mod error;
mod handlers;
mod models;
mod repository;
mod service;

use std::sync::Arc;

use repository::{NoteStore, Repository};
use service::NoteService;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    // Log setup
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("notes_api=info,tower_http=info")),
        )
        .init();

    // Load config
    let cfg = config::load_config().unwrap_or_else(|e| {
        tracing::error!("Failed to load configuration: {e}");
        panic!("failed to load configuration: {e}");
    });

    // Repository creation and migration
    let mut repo = Repository::new(&cfg.database_dsn)
        .await
        .unwrap_or_else(|e| {
            tracing::error!("Failed to establish database connection: {e}");
            panic!("failed to establish database connection: {e}");
        });
    tracing::info!("Connected to the database");

    repo.migrate().await.unwrap_or_else(|e| {
        tracing::error!("Failed to migrate database: {e}");
        panic!("failed to migrate database: {e}");
    });

    // Service creation
    let store: Arc<dyn NoteStore> = Arc::new(repo);
    let service = Arc::new(NoteService::new(store));

    let router = handlers::build_router(service, handlers::cors_layer(&cfg.cors_origins));

    let listener = tokio::net::TcpListener::bind(cfg.socket_addr())
        .await
        .unwrap_or_else(|e| {
            tracing::error!("Failed to bind to {}: {e}", cfg.socket_addr());
            panic!("failed to bind to address: {e}");
        });

    match listener.local_addr() {
        Ok(addr) => tracing::info!("Server running, listening on {}", addr),
        Err(e) => tracing::warn!("Server running, local address unknown: {e}"),
    }

    axum::serve(listener, router)
        .await
        .expect("failed to start server");
}
