//! chronicle-server - REST API server binary.

use std::net::SocketAddr;

use chronicle_core::{seed_defaults, ChronicleConfig};
use chronicle_server::{create_server, AppState};
use tokio::signal;
use tracing::{info, warn, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Wait for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

/// `CHRONICLE_CONFIG` names a config file; otherwise read the environment.
fn load_config() -> chronicle_core::ChronicleResult<ChronicleConfig> {
    match std::env::var("CHRONICLE_CONFIG") {
        Ok(path) => ChronicleConfig::from_file(path),
        Err(_) => ChronicleConfig::from_env(),
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(
            EnvFilter::from_default_env()
                .add_directive(Level::INFO.into())
                .add_directive("chronicle_server=debug".parse()?),
        )
        .init();

    let config = load_config()?;
    info!(path = %config.database_path.display(), "Opening changelog store");
    let state = AppState::open(config.clone())?;

    if config.seed_on_start {
        let created = seed_defaults(state.store.as_ref())?;
        info!(created, "Seeded sample changelogs");
    }

    if config.admin_token.is_none() {
        warn!("No admin token configured; admin routes are open");
    } else {
        info!("Admin token authentication enabled");
    }

    let app = create_server(state);

    // Start server
    let addr: SocketAddr = config.bind_address().parse()?;
    info!("Starting chronicle-server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;

    // Serve with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            shutdown_signal().await;
            info!("Shutdown signal received");
        })
        .await?;

    info!("Server stopped cleanly");
    Ok(())
}
