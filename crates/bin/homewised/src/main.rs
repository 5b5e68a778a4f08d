//! # homewised
//!
//! Composition root that wires all adapters together and starts the server.
//!
//! ## Responsibilities
//! - Load configuration (`homewise.toml`, env vars)
//! - Initialise logging
//! - Initialise the `SQLite` connection pool and run migrations
//! - Construct repositories, application services and the suggestion hub
//! - Bind to a TCP port and serve
//! - Handle graceful shutdown (SIGTERM/SIGINT)
//!
//! ## Dependency rule
//! This is the **only** crate that depends on all other crates.
//! It is the wiring layer; no domain logic belongs here.

mod config;

use std::sync::Arc;

use tokio::signal;
use tracing_subscriber::EnvFilter;

use homewise_adapter_http_axum::state::AppState;
use homewise_adapter_storage_sqlite_sqlx::{
    Config as StorageConfig, SqliteActivityLogRepository, SqliteDeviceRepository,
    SqliteUserRepository,
};
use homewise_app::event_bus::InProcessEventBus;
use homewise_app::services::admin_service::AdminService;
use homewise_app::services::device_service::DeviceService;
use homewise_app::services::user_service::UserService;
use homewise_app::suggestion::{BroadcastSuggestionSink, SuggestionHub};

const EVENT_BUS_CAPACITY: usize = 256;
const SUGGESTION_UPDATES_CAPACITY: usize = 256;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = config::Config::load()?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_new(&config.logging.filter)?)
        .init();

    // Database
    let db = StorageConfig {
        database_url: config.database_url().to_string(),
    }
    .build()
    .await?;
    let pool = db.pool().clone();

    // Repositories
    let user_repo = Arc::new(SqliteUserRepository::new(pool.clone()));
    let device_repo = Arc::new(SqliteDeviceRepository::new(pool.clone()));
    let log_repo = Arc::new(SqliteActivityLogRepository::new(pool));

    // Event bus
    let event_bus = InProcessEventBus::new(EVENT_BUS_CAPACITY);
    let device_events = event_bus.subscribe();

    // Services
    let user_service = Arc::new(UserService::new(Arc::clone(&user_repo)));
    let device_service = Arc::new(DeviceService::new(
        Arc::clone(&device_repo),
        Arc::clone(&user_repo),
        Arc::clone(&log_repo),
        event_bus,
    ));
    let admin_service = Arc::new(AdminService::new(user_repo, device_repo, log_repo));

    // Suggestions
    let suggestion_updates = BroadcastSuggestionSink::new(SUGGESTION_UPDATES_CAPACITY);
    let hub = Arc::new(SuggestionHub::new(
        Arc::clone(&device_service),
        suggestion_updates.clone(),
        config.engine_settings(),
    ));
    let follower = hub.follow(device_events);
    let reaper = hub.expire_idle(config.session_idle_timeout());

    // HTTP
    let state = AppState::from_arcs(
        user_service,
        device_service,
        admin_service,
        Arc::clone(&hub),
        suggestion_updates,
    );
    let app = homewise_adapter_http_axum::router::build(state);

    let bind_addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!(%bind_addr, "homewised listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("http server stopped, ending suggestion sessions");
    reaper.abort();
    hub.shutdown().await;
    follower.abort();

    Ok(())
}

/// Wait for Ctrl+C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            tracing::error!(error = %err, "failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(err) => {
                tracing::error!(error = %err, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("shutdown signal received");
}
