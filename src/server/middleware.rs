//! HTTP middleware for secdesk
//!
//! This module provides middleware layers for:
//! - The authentication gate guarding protected routes
//! - Per-client rate limiting
//! - Request/response logging

use axum::{
    extract::{ConnectInfo, Request, State},
    http::{HeaderName, HeaderValue, StatusCode},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
    Json,
};
use axum_extra::extract::cookie::CookieJar;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

use super::envelope::ApiResponse;
use crate::auth::{RateLimiter, TokenService};
use crate::models::Identity;

/// Name of the identity cookie
pub const TOKEN_COOKIE: &str = "token";

/// Path prefixes that require an authenticated identity
pub const PROTECTED_PREFIXES: &[&str] = &[
    "/dashboard",
    "/profile",
    "/api/issues",
    "/api/users/profile",
    "/api/auth/me",
];

/// Identity headers forwarded to handlers; stripped from every inbound request
const USER_ID_HEADER: &str = "x-user-id";
const USER_ROLE_HEADER: &str = "x-user-role";

/// Whether a path falls under a protected prefix
pub fn is_protected(path: &str) -> bool {
    PROTECTED_PREFIXES.iter().any(|p| path.starts_with(p))
}

/// Authentication gate
///
/// Inbound identity headers are stripped unconditionally, so a client can
/// never impersonate a user by setting them. On protected paths the identity
/// cookie is verified; API paths get a 401 envelope, browser paths a redirect
/// to the login page. On success the verified `Identity` is attached to the
/// request and the identity headers are repopulated server-side.
pub async fn auth_gate(
    State(tokens): State<TokenService>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Response {
    request.headers_mut().remove(USER_ID_HEADER);
    request.headers_mut().remove(USER_ROLE_HEADER);

    let path = request.uri().path().to_string();
    if !is_protected(&path) {
        return next.run(request).await;
    }

    let claims = match jar
        .get(TOKEN_COOKIE)
        .and_then(|cookie| tokens.verify(cookie.value()).ok())
    {
        Some(claims) => claims,
        None => return unauthenticated(&path),
    };

    let identity = Identity {
        user_id: claims.sub,
        role: claims.role,
    };

    if let Ok(value) = HeaderValue::from_str(&identity.user_id) {
        request
            .headers_mut()
            .insert(HeaderName::from_static(USER_ID_HEADER), value);
    }
    if let Ok(value) = HeaderValue::from_str(&identity.role.to_string()) {
        request
            .headers_mut()
            .insert(HeaderName::from_static(USER_ROLE_HEADER), value);
    }
    request.extensions_mut().insert(identity);

    next.run(request).await
}

/// Response for a missing or invalid identity on a protected path
fn unauthenticated(path: &str) -> Response {
    if path.starts_with("/api") {
        let body = ApiResponse::error("Authentication required", StatusCode::UNAUTHORIZED.as_u16());
        (StatusCode::UNAUTHORIZED, Json(body)).into_response()
    } else {
        // Browser navigation: send the user to the login page
        Redirect::to("/login").into_response()
    }
}

/// Per-client rate limiting middleware
///
/// Keyed by client IP. Requests arriving without connection info (e.g. in
/// in-process tests) share one bucket.
pub async fn rate_limit_middleware(
    State(limiter): State<Arc<RateLimiter>>,
    addr: Option<ConnectInfo<SocketAddr>>,
    request: Request,
    next: Next,
) -> Response {
    let identifier = addr
        .map(|ConnectInfo(addr)| addr.ip().to_string())
        .unwrap_or_else(|| "unknown".to_string());

    if !limiter.check_limit(&identifier) {
        tracing::warn!(client = %identifier, path = %request.uri().path(), "rate limit exceeded");
        let body = ApiResponse::error(
            "Too many requests",
            StatusCode::TOO_MANY_REQUESTS.as_u16(),
        );
        return (StatusCode::TOO_MANY_REQUESTS, Json(body)).into_response();
    }

    next.run(request).await
}

/// Logging middleware function
///
/// Logs request and response details including:
/// - Method and path
/// - Status code
/// - Response time
pub async fn logging_middleware(request: Request, next: Next) -> Response {
    let start = Instant::now();
    let method = request.method().clone();
    let uri = request.uri().clone();

    let response = next.run(request).await;

    let elapsed = start.elapsed();
    let status = response.status();

    tracing::info!(
        method = %method,
        path = %uri.path(),
        status = %status.as_u16(),
        duration_ms = %elapsed.as_millis(),
        "Request completed"
    );

    response
}
