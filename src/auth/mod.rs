//! Authentication and authorization core
//!
//! This module provides credential hashing, identity token issuance and
//! verification, the fixed-window rate limiter, and the authentication
//! service orchestrating registration and login.

pub mod jwt;
pub mod password;
pub mod ratelimit;
pub mod service;

pub use jwt::{Claims, TokenService};
pub use password::{hash_password, verify_password};
pub use ratelimit::{RateLimiter, RateLimiterConfig};
pub use service::{AuthService, LoginRequest, RegisterRequest};
