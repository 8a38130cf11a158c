//! HTTP server components for secdesk
//!
//! This module provides the HTTP server infrastructure including:
//! - Router configuration and route handlers
//! - The authentication gate and rate limiting middleware
//! - The standard response envelope
//! - Server lifecycle management

pub mod envelope;
pub mod middleware;
pub mod router;

pub use envelope::ApiResponse;
pub use router::{build_router, AppState, HealthResponse};

use std::future::Future;
use std::net::SocketAddr;

use tokio::net::TcpListener;

use crate::config::ServerConfig;
use crate::database::Database;
use crate::email::Notifier;

/// HTTP Server for secdesk
///
/// Manages the axum server lifecycle, including:
/// - Binding to configured address
/// - Applying middleware layers
/// - Graceful shutdown handling
pub struct Server<D: Database + 'static, N: Notifier + 'static> {
    config: ServerConfig,
    state: AppState<D, N>,
}

impl<D: Database + 'static, N: Notifier + 'static> Server<D, N> {
    /// Create a new server instance
    pub fn new(config: ServerConfig, state: AppState<D, N>) -> Self {
        Self { config, state }
    }

    /// Get the configured bind address
    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::new(
            self.config.host.parse().unwrap_or([0, 0, 0, 0].into()),
            self.config.port,
        )
    }

    /// Run the server until shutdown signal is received
    pub async fn run(
        self,
        shutdown: impl Future<Output = ()> + Send + 'static,
    ) -> Result<(), ServerError> {
        let addr = self.bind_addr();
        let app = build_router(self.state)
            .layer(tower_http::trace::TraceLayer::new_for_http())
            .into_make_service_with_connect_info::<SocketAddr>();

        let listener = TcpListener::bind(addr)
            .await
            .map_err(|e| ServerError::Bind(e.to_string()))?;

        tracing::info!("Server listening on {}", addr);

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown)
            .await
            .map_err(|e| ServerError::Serve(e.to_string()))?;

        tracing::info!("Server shutdown complete");
        Ok(())
    }
}

/// Server error types
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// Failed to bind to address
    #[error("Failed to bind to address: {0}")]
    Bind(String),

    /// Failed to serve requests
    #[error("Server error: {0}")]
    Serve(String),
}
