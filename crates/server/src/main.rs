use std::sync::Arc;

use anyhow::Result;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod config;
mod error;
mod identity;
mod reports;
mod rooms;
mod routes;
mod state;
mod store;

use config::StoreBackend;
use state::AppState;
use store::{KeyValueStore, MemoryStore, SqliteStore, Store};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "planpoker_server=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = config::Config::load()?;
    tracing::info!(
        "Starting planpoker server on {}:{}",
        config.server.host,
        config.server.port
    );

    // Pick the storage backend once, from configuration
    let backend: Arc<dyn KeyValueStore> = match config.store.backend {
        StoreBackend::Memory => {
            tracing::warn!("Using in-memory store; rooms will not survive a restart");
            Arc::new(MemoryStore::new())
        }
        StoreBackend::Sqlite => {
            let store = SqliteStore::new(&config.store.path).await?;
            store.run_migrations().await?;
            Arc::new(store)
        }
    };
    let store = Store::new(backend, config.room_ttl(), config.report_ttl());

    // Create app state
    let state = AppState::new(store, config.clone());

    // Build router
    let app = routes::create_router(state);

    // Start server
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
