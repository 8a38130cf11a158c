//! HTTP router for secdesk
//!
//! This module defines the axum router that handles all HTTP requests:
//! health checks, authentication, profile management and issue CRUD.
//! Handlers stay thin; every body is the standard response envelope.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    middleware,
    response::IntoResponse,
    routing::{get, post},
    Extension, Json, Router,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use time::Duration;

use super::envelope::ApiResponse;
use super::middleware::{auth_gate, logging_middleware, rate_limit_middleware, TOKEN_COOKIE};
use crate::auth::{AuthService, LoginRequest, RateLimiter, RegisterRequest, TokenService};
use crate::database::Database;
use crate::email::Notifier;
use crate::error::ApiError;
use crate::models::{CreateIssueRequest, Identity, UpdateIssueRequest, UpdateProfileRequest};
use crate::services::{IssueService, UserService};

/// Shared application state
pub struct AppState<D: Database, N: Notifier> {
    /// Registration and login
    pub auth: Arc<AuthService<D, N>>,

    /// Issue business rules
    pub issues: Arc<IssueService<D, N>>,

    /// Profile business rules
    pub users: Arc<UserService<D>>,

    /// Token signing and verification
    pub tokens: TokenService,

    /// Per-client rate limiter
    pub limiter: Arc<RateLimiter>,

    /// Whether session cookies carry the Secure attribute
    pub cookie_secure: bool,
}

impl<D: Database + 'static, N: Notifier + 'static> AppState<D, N> {
    /// Wire up services over shared database and notifier handles
    pub fn new(
        db: Arc<D>,
        notifier: Arc<N>,
        tokens: TokenService,
        limiter: Arc<RateLimiter>,
        cookie_secure: bool,
    ) -> Self {
        Self {
            auth: Arc::new(AuthService::new(
                Arc::clone(&db),
                Arc::clone(&notifier),
                tokens.clone(),
            )),
            issues: Arc::new(IssueService::new(Arc::clone(&db), notifier)),
            users: Arc::new(UserService::new(db)),
            tokens,
            limiter,
            cookie_secure,
        }
    }
}

impl<D: Database, N: Notifier> Clone for AppState<D, N> {
    fn clone(&self) -> Self {
        Self {
            auth: Arc::clone(&self.auth),
            issues: Arc::clone(&self.issues),
            users: Arc::clone(&self.users),
            tokens: self.tokens.clone(),
            limiter: Arc::clone(&self.limiter),
            cookie_secure: self.cookie_secure,
        }
    }
}

/// Health check response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

/// Build the main application router
///
/// Layer order matters: logging wraps rate limiting wraps the auth gate, so
/// denied requests are still counted and logged.
pub fn build_router<D: Database + 'static, N: Notifier + 'static>(
    state: AppState<D, N>,
) -> Router {
    Router::new()
        // Health endpoint (no auth required)
        .route("/health", get(health_handler))
        // Auth routes
        .route("/api/auth/register", post(register_handler::<D, N>))
        .route("/api/auth/login", post(login_handler::<D, N>))
        .route("/api/auth/logout", post(logout_handler::<D, N>))
        .route("/api/auth/me", get(me_handler::<D, N>))
        // Profile routes
        .route(
            "/api/users/profile",
            get(get_profile_handler::<D, N>).put(update_profile_handler::<D, N>),
        )
        // Issue routes
        .route(
            "/api/issues",
            post(create_issue_handler::<D, N>).get(list_issues_handler::<D, N>),
        )
        .route(
            "/api/issues/:id",
            axum::routing::put(update_issue_handler::<D, N>)
                .delete(delete_issue_handler::<D, N>),
        )
        .layer(middleware::from_fn_with_state(
            state.tokens.clone(),
            auth_gate,
        ))
        .layer(middleware::from_fn_with_state(
            Arc::clone(&state.limiter),
            rate_limit_middleware,
        ))
        .layer(middleware::from_fn(logging_middleware))
        .with_state(state)
}

/// Session cookie carrying the identity token
fn session_cookie(token: &str, max_age_secs: i64, secure: bool) -> Cookie<'static> {
    Cookie::build((TOKEN_COOKIE, token.to_string()))
        .http_only(true)
        .secure(secure)
        .same_site(SameSite::Strict)
        .path("/")
        .max_age(Duration::seconds(max_age_secs))
        .build()
}

/// Expired cookie that clears the session
fn clear_session_cookie(secure: bool) -> Cookie<'static> {
    Cookie::build((TOKEN_COOKIE, String::new()))
        .http_only(true)
        .secure(secure)
        .same_site(SameSite::Strict)
        .path("/")
        .max_age(Duration::ZERO)
        .build()
}

// =============================================================================
// Health Handler
// =============================================================================

async fn health_handler() -> impl IntoResponse {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

// =============================================================================
// Auth Handlers
// =============================================================================

async fn register_handler<D: Database + 'static, N: Notifier + 'static>(
    State(state): State<AppState<D, N>>,
    Json(req): Json<RegisterRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let user = state.auth.register(req).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success("User registered successfully", user)),
    ))
}

async fn login_handler<D: Database + 'static, N: Notifier + 'static>(
    State(state): State<AppState<D, N>>,
    jar: CookieJar,
    Json(req): Json<LoginRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let (user, token) = state.auth.login(req).await?;
    let jar = jar.add(session_cookie(
        &token,
        state.tokens.ttl_secs(),
        state.cookie_secure,
    ));
    Ok((jar, Json(ApiResponse::success("Login successful", user))))
}

async fn logout_handler<D: Database + 'static, N: Notifier + 'static>(
    State(state): State<AppState<D, N>>,
    jar: CookieJar,
) -> impl IntoResponse {
    let jar = jar.add(clear_session_cookie(state.cookie_secure));
    (jar, Json(ApiResponse::ok("Logged out successfully")))
}

async fn me_handler<D: Database + 'static, N: Notifier + 'static>(
    State(state): State<AppState<D, N>>,
    Extension(identity): Extension<Identity>,
) -> Result<impl IntoResponse, ApiError> {
    let user = state.auth.get_user_profile(&identity.user_id).await?;
    Ok(Json(ApiResponse::success("Authenticated user", user)))
}

// =============================================================================
// Profile Handlers
// =============================================================================

async fn get_profile_handler<D: Database + 'static, N: Notifier + 'static>(
    State(state): State<AppState<D, N>>,
    Extension(identity): Extension<Identity>,
) -> Result<impl IntoResponse, ApiError> {
    let profile = state.users.get_profile(&identity.user_id).await?;
    Ok(Json(ApiResponse::success("Profile retrieved", profile)))
}

async fn update_profile_handler<D: Database + 'static, N: Notifier + 'static>(
    State(state): State<AppState<D, N>>,
    Extension(identity): Extension<Identity>,
    Json(req): Json<UpdateProfileRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let profile = state.users.update_profile(&identity.user_id, req).await?;
    Ok(Json(ApiResponse::success(
        "Profile updated successfully",
        profile,
    )))
}

// =============================================================================
// Issue Handlers
// =============================================================================

async fn create_issue_handler<D: Database + 'static, N: Notifier + 'static>(
    State(state): State<AppState<D, N>>,
    Extension(identity): Extension<Identity>,
    Json(req): Json<CreateIssueRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let issue = state.issues.create(&identity.user_id, req).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success("Issue created successfully", issue)),
    ))
}

async fn list_issues_handler<D: Database + 'static, N: Notifier + 'static>(
    State(state): State<AppState<D, N>>,
    Extension(identity): Extension<Identity>,
) -> Result<impl IntoResponse, ApiError> {
    let issues = state.issues.list(&identity.user_id).await?;
    Ok(Json(ApiResponse::success("Issues retrieved", issues)))
}

async fn update_issue_handler<D: Database + 'static, N: Notifier + 'static>(
    State(state): State<AppState<D, N>>,
    Extension(identity): Extension<Identity>,
    Path(id): Path<String>,
    Json(req): Json<UpdateIssueRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let issue = state.issues.update(&identity.user_id, &id, req).await?;
    Ok(Json(ApiResponse::success(
        "Issue updated successfully",
        issue,
    )))
}

async fn delete_issue_handler<D: Database + 'static, N: Notifier + 'static>(
    State(state): State<AppState<D, N>>,
    Extension(identity): Extension<Identity>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    state.issues.delete(&identity.user_id, &id).await?;
    Ok(Json(ApiResponse::ok("Issue deleted successfully")))
}
