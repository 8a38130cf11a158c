//! secdesk - authentication and issue tracking backend for a security consultancy
//!
//! This is the main entry point for the secdesk application.

use std::sync::Arc;

use clap::Parser;
use tokio::signal;
use tracing::info;
use tracing_subscriber::EnvFilter;

use secdesk::auth::{RateLimiter, RateLimiterConfig, TokenService};
use secdesk::config::Config;
use secdesk::database::SqliteDatabase;
use secdesk::email::LogNotifier;
use secdesk::server::{AppState, Server};

/// secdesk - authentication and issue tracking backend
#[derive(Parser, Debug)]
#[command(name = "secdesk")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the configuration file
    #[arg(short, long, env = "SECDESK_CONFIG")]
    config: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse CLI arguments
    let args = Args::parse();

    // Load configuration
    let config = load_config(&args)?;

    // Initialize tracing/logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.logging.level.clone()));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    info!(version = env!("CARGO_PKG_VERSION"), "Starting secdesk");

    // Initialize database
    let database = SqliteDatabase::new(&config.database.path).await?;
    let database = Arc::new(database);
    info!(path = %config.database.path, "Database initialized");

    // Wire up authentication and services
    let tokens = TokenService::new(&config.auth.jwt_secret, config.auth.token_ttl_secs)
        .map_err(|e| anyhow::anyhow!("Failed to initialize token service: {}", e))?;
    let limiter = Arc::new(RateLimiter::new(RateLimiterConfig::from(&config.rate_limit)));
    info!(
        window_secs = config.rate_limit.window_secs,
        max_requests = config.rate_limit.max_requests,
        "Rate limiter initialized"
    );

    let state = AppState::new(
        database,
        Arc::new(LogNotifier),
        tokens,
        limiter,
        config.auth.cookie_secure,
    );

    // Create and start the HTTP server
    let server = Server::new(config.server.clone(), state);
    let shutdown_signal = shutdown_signal();

    info!(
        host = %config.server.host,
        port = %config.server.port,
        "Starting HTTP server"
    );

    let result = server.run(shutdown_signal).await;

    info!("secdesk shutdown complete");

    result.map_err(Into::into)
}

/// Load configuration from file or environment
fn load_config(args: &Args) -> anyhow::Result<Config> {
    match &args.config {
        Some(path) => {
            // Use eprintln! since tracing is not yet initialized
            eprintln!("Loading configuration from file: {}", path);
            Config::from_file(path).map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))
        }
        None => {
            // Use eprintln! since tracing is not yet initialized
            eprintln!("Loading configuration from environment variables");
            Config::from_env().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))
        }
    }
}

/// Create a future that resolves when a shutdown signal is received
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, initiating graceful shutdown");
        }
        _ = terminate => {
            info!("Received SIGTERM, initiating graceful shutdown");
        }
    }
}
