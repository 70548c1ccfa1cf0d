//! # switchroomd: switchroom daemon
//!
//! Composition root that wires all adapters together and starts the server.
//!
//! ## Responsibilities
//! - Load configuration (config file, env vars)
//! - Initialize logging
//! - Initialize the `SQLite` connection pool and run migrations
//! - Construct the repository and photo storage (adapters)
//! - Construct the application service, injecting adapters via port traits
//! - Build the axum router, injecting the service
//! - Bind to a TCP port and serve
//! - Handle graceful shutdown (SIGTERM/SIGINT)
//!
//! ## Dependency rule
//! This is the **only** crate that depends on all other crates.
//! No domain logic belongs here.

mod config;

use switchroom_adapter_http_axum::router::{self, MediaMount, RouterOptions};
use switchroom_adapter_http_axum::state::AppState;
use switchroom_adapter_storage_sqlite_sqlx::SqliteSwitchroomRepository;
use switchroom_app::services::switchroom_service::SwitchroomService;
use tracing_subscriber::EnvFilter;

use crate::config::Config;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_new(&config.logging.filter)?)
        .init();

    // Database
    let db = switchroom_adapter_storage_sqlite_sqlx::Config {
        database_url: config.database_url().to_string(),
    }
    .build()
    .await?;
    let repo = SqliteSwitchroomRepository::new(db.pool().clone());

    // Photo storage
    let media_prefix = config.media_url_prefix();
    let storage = switchroom_adapter_media_fs::Config {
        root: config.media.root.clone(),
        url_prefix: media_prefix.clone(),
    }
    .build();
    let media = MediaMount {
        url_prefix: media_prefix,
        root: storage.root().to_path_buf(),
    };

    // HTTP
    let state = AppState::new(SwitchroomService::new(repo, storage));
    let options = RouterOptions {
        max_upload_bytes: config.server.max_upload_bytes,
        media: Some(media),
    };
    let app = router::build(state, &options);

    let bind_addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!(%bind_addr, "switchroomd listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("shutdown complete");
    Ok(())
}

/// Resolve once SIGINT (Ctrl-C) or, on Unix, SIGTERM is received.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %err, "failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                tracing::error!(error = %err, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => tracing::info!("received SIGINT, shutting down"),
        () = terminate => tracing::info!("received SIGTERM, shutting down"),
    }
}
