//! Common test utilities and helpers for integration tests

#![allow(dead_code)]

use std::sync::Arc;

use axum_test::{TestServer, TestServerConfig};

use secdesk::auth::{RateLimiter, RateLimiterConfig, TokenService};
use secdesk::database::SqliteDatabase;
use secdesk::email::LogNotifier;
use secdesk::server::{build_router, AppState};

/// JWT secret used across integration tests
pub const TEST_SECRET: &str = "integration-test-secret";

/// Create an in-memory database for testing
pub async fn create_test_database() -> Arc<SqliteDatabase> {
    Arc::new(
        SqliteDatabase::in_memory()
            .await
            .expect("Failed to create test database"),
    )
}

/// Create a test application state over an in-memory database
///
/// The rate limit budget is high enough that it never interferes with tests
/// exercising other behavior.
pub async fn create_test_state() -> AppState<SqliteDatabase, LogNotifier> {
    create_test_state_with_limit(10_000).await
}

/// Create a test application state with an explicit rate limit budget
pub async fn create_test_state_with_limit(
    max_requests: u32,
) -> AppState<SqliteDatabase, LogNotifier> {
    let database = create_test_database().await;
    let tokens = TokenService::new(TEST_SECRET, 86400).expect("Failed to create token service");
    let limiter = Arc::new(RateLimiter::new(RateLimiterConfig {
        window: std::time::Duration::from_secs(60),
        max_requests,
    }));

    AppState::new(database, Arc::new(LogNotifier), tokens, limiter, false)
}

/// Run a test server on a real socket and return its address
///
/// The server shuts down when the returned sender fires or drops.
pub async fn run_test_server(
    state: AppState<SqliteDatabase, LogNotifier>,
) -> (std::net::SocketAddr, tokio::sync::oneshot::Sender<()>) {
    use tokio::net::TcpListener;

    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind test server");
    let addr = listener.local_addr().expect("Failed to get local address");

    let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel();

    let app = build_router(state)
        .into_make_service_with_connect_info::<std::net::SocketAddr>();

    tokio::spawn(async move {
        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                let _ = shutdown_rx.await;
            })
            .await
            .expect("Server error");
    });

    // Give the server a moment to start (100ms is sufficient for slow CI systems)
    tokio::time::sleep(std::time::Duration::from_millis(100)).await;

    (addr, shutdown_tx)
}

/// Create an in-process test server with a cookie jar
pub async fn create_test_server() -> TestServer {
    let state = create_test_state().await;
    let config = TestServerConfig {
        save_cookies: true,
        ..TestServerConfig::default()
    };
    TestServer::new_with_config(build_router(state), config).expect("Failed to start test server")
}

/// Two test servers over one shared state, each with its own cookie jar
///
/// Lets tests act as two different logged-in users against the same database.
pub async fn create_test_server_pair() -> (TestServer, TestServer) {
    let state = create_test_state().await;
    let make = |state: AppState<SqliteDatabase, LogNotifier>| {
        let config = TestServerConfig {
            save_cookies: true,
            ..TestServerConfig::default()
        };
        TestServer::new_with_config(build_router(state), config)
            .expect("Failed to start test server")
    };
    (make(state.clone()), make(state))
}

/// Register a user and return the registration response body
pub async fn register(server: &TestServer, email: &str, password: &str) -> serde_json::Value {
    let response = server
        .post("/api/auth/register")
        .json(&serde_json::json!({ "email": email, "password": password }))
        .await;
    assert_eq!(response.status_code(), 201, "registration failed");
    response.json()
}

/// Log a user in; the session cookie lands in the server's cookie jar
pub async fn login(server: &TestServer, email: &str, password: &str) -> serde_json::Value {
    let response = server
        .post("/api/auth/login")
        .json(&serde_json::json!({ "email": email, "password": password }))
        .await;
    assert_eq!(response.status_code(), 200, "login failed");
    response.json()
}

/// Register and log in a fresh user, returning their ID
pub async fn register_and_login(server: &TestServer, email: &str, password: &str) -> String {
    register(server, email, password).await;
    let body = login(server, email, password).await;
    body["data"]["id"]
        .as_str()
        .expect("login response missing user id")
        .to_string()
}
