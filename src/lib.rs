//! secdesk - authentication and issue tracking backend for a security consultancy
//!
//! This crate provides the API server behind the client dashboard: cookie-based
//! JWT authentication, per-client rate limiting, and CRUD for reported
//! security issues with strict ownership checks.

pub mod auth;
pub mod config;
pub mod database;
pub mod email;
pub mod error;
pub mod models;
pub mod server;
pub mod services;
