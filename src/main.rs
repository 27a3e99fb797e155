//! Bookshelf Server
//!
//! Prepares the book collection, seeds it, and serves pages and the JSON API.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use bookshelf_server::{
    api,
    config::{AppConfig, StoreBackend},
    repository::{CollectionOptions, DocumentDatabase, MemoryDatabase, PgDatabase},
    services::{bootstrap, seed, Services},
    AppState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let config = AppConfig::load().context("Failed to load configuration")?;

    // Initialize tracing
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        format!("bookshelf_server={},tower_http=debug", config.logging.level).into()
    });

    let registry = tracing_subscriber::registry().with(filter);
    if config.logging.format == "json" {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }

    tracing::info!("Starting Bookshelf Server v{}", env!("CARGO_PKG_VERSION"));

    let db: Box<dyn DocumentDatabase> = match config.database.backend {
        StoreBackend::Postgres => {
            let db = PgDatabase::connect(
                &config.database.url,
                config.database.max_connections,
                config.database.connect_timeout(),
            )
            .await
            .context("Failed to connect to database")?;
            tracing::info!("Connected to database");
            Box::new(db)
        }
        StoreBackend::Memory => {
            tracing::warn!("Using the in-memory store; data is lost on exit");
            Box::new(MemoryDatabase::new())
        }
    };

    let options = CollectionOptions {
        unique_logical_id: config.database.unique_logical_id,
    };
    let store = bootstrap::ensure_collection(
        db.as_ref(),
        &config.database.name,
        &config.database.collection,
        options,
    )
    .await
    .context("Failed to prepare the book collection")?;

    if config.database.seed {
        let report = seed::seed_books(store.as_ref(), &seed::STARTER_BOOKS)
            .await
            .context("Failed to seed the book collection")?;
        tracing::info!(
            "Seed data: {} inserted, {} already present",
            report.inserted,
            report.existing
        );
    }

    let addr = SocketAddr::new(
        config
            .server
            .host
            .parse()
            .context("Invalid host address")?,
        config.server.port,
    );

    let services = Services::new(store, config.requests.store_timeout());
    let state = AppState {
        config: Arc::new(config),
        services: Arc::new(services),
    };

    let app = api::create_router(state);

    tracing::info!("Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutting down");
}
