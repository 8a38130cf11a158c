//! Database layer for secdesk
//!
//! This module defines the database trait and SQLite implementation.

pub mod migrations;
pub mod sqlite;

pub use sqlite::SqliteDatabase;

use async_trait::async_trait;

use crate::error::DbError;
use crate::models::{Issue, User};

/// Database trait for data persistence
///
/// This trait defines all database operations needed by the application.
/// It uses `async_trait` for async methods and `mockall::automock` for testing.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Database: Send + Sync {
    // =========================================================================
    // User operations
    // =========================================================================

    /// Insert a new user
    ///
    /// Fails with `DbError::ConstraintViolation` if the email is taken.
    async fn create_user(&self, user: &User) -> Result<(), DbError>;

    /// Look up a user by email
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, DbError>;

    /// Look up a user by ID
    async fn find_user_by_id(&self, id: &str) -> Result<Option<User>, DbError>;

    /// Persist mutable user fields (name, password hash, role, updated_at)
    async fn update_user(&self, user: &User) -> Result<(), DbError>;

    // =========================================================================
    // Issue operations
    // =========================================================================

    /// Insert a new issue
    async fn create_issue(&self, issue: &Issue) -> Result<(), DbError>;

    /// Look up an issue by ID; soft-deleted issues read as absent
    async fn find_issue_by_id(&self, id: &str) -> Result<Option<Issue>, DbError>;

    /// All non-deleted issues owned by a user, newest first
    async fn find_issues_by_user(&self, user_id: &str) -> Result<Vec<Issue>, DbError>;

    /// Persist mutable issue fields (title, description, status, updated_at)
    async fn update_issue(&self, issue: &Issue) -> Result<(), DbError>;

    /// Mark an issue deleted without removing the row
    async fn soft_delete_issue(&self, id: &str) -> Result<(), DbError>;
}
