//! SQLite implementation of the Database trait
//!
//! This module provides a SQLite-based implementation of the Database trait
//! using rusqlite and tokio-rusqlite for async operations. Timestamps are
//! stored as RFC 3339 text so rows stay readable in ad-hoc queries.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rusqlite::OptionalExtension;
use tokio_rusqlite::Connection;

use super::migrations::CREATE_SCHEMA;
use super::Database;
use crate::error::DbError;
use crate::models::{Issue, User};

/// SQLite database implementation
pub struct SqliteDatabase {
    conn: Connection,
}

impl SqliteDatabase {
    /// Create a new SQLite database connection
    ///
    /// Use `:memory:` for in-memory database or a file path for persistent storage.
    pub async fn new(path: &str) -> Result<Self, DbError> {
        let conn = Connection::open(path).await?;

        // Run migrations
        conn.call(|conn| {
            conn.execute_batch(CREATE_SCHEMA)?;
            Ok(())
        })
        .await?;

        Ok(Self { conn })
    }

    /// Create a new in-memory database (useful for testing)
    pub async fn in_memory() -> Result<Self, DbError> {
        Self::new(":memory:").await
    }
}

/// Parse a stored RFC 3339 timestamp
fn parse_datetime(idx: usize, value: String) -> Result<DateTime<Utc>, rusqlite::Error> {
    DateTime::parse_from_rfc3339(&value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(e))
        })
}

/// Parse a stored enum column via its FromStr impl
fn parse_enum<T: std::str::FromStr>(idx: usize, value: String) -> Result<T, rusqlite::Error> {
    value.parse().map_err(|_| {
        rusqlite::Error::FromSqlConversionFailure(
            idx,
            rusqlite::types::Type::Text,
            format!("unrecognized value: {}", value).into(),
        )
    })
}

/// Map an insert failure, detecting unique-constraint violations
fn map_constraint(err: tokio_rusqlite::Error, message: &str) -> DbError {
    if let tokio_rusqlite::Error::Rusqlite(rusqlite::Error::SqliteFailure(e, _)) = &err {
        if e.code == rusqlite::ErrorCode::ConstraintViolation {
            return DbError::ConstraintViolation(message.to_string());
        }
    }
    DbError::Sqlite(err)
}

fn user_from_row(row: &rusqlite::Row<'_>) -> Result<User, rusqlite::Error> {
    Ok(User {
        id: row.get(0)?,
        email: row.get(1)?,
        password_hash: row.get(2)?,
        name: row.get(3)?,
        role: parse_enum(4, row.get::<_, String>(4)?)?,
        created_at: parse_datetime(5, row.get::<_, String>(5)?)?,
        updated_at: parse_datetime(6, row.get::<_, String>(6)?)?,
    })
}

fn issue_from_row(row: &rusqlite::Row<'_>) -> Result<Issue, rusqlite::Error> {
    Ok(Issue {
        id: row.get(0)?,
        user_id: row.get(1)?,
        title: row.get(2)?,
        description: row.get(3)?,
        issue_type: parse_enum(4, row.get::<_, String>(4)?)?,
        status: parse_enum(5, row.get::<_, String>(5)?)?,
        created_at: parse_datetime(6, row.get::<_, String>(6)?)?,
        updated_at: parse_datetime(7, row.get::<_, String>(7)?)?,
        deleted_at: row
            .get::<_, Option<String>>(8)?
            .map(|s| parse_datetime(8, s))
            .transpose()?,
    })
}

const USER_COLUMNS: &str = "id, email, password_hash, name, role, created_at, updated_at";
const ISSUE_COLUMNS: &str =
    "id, user_id, title, description, issue_type, status, created_at, updated_at, deleted_at";

#[async_trait]
impl Database for SqliteDatabase {
    // =========================================================================
    // User operations
    // =========================================================================

    async fn create_user(&self, user: &User) -> Result<(), DbError> {
        let user = user.clone();

        self.conn
            .call(move |conn| {
                conn.execute(
                    r#"
                    INSERT INTO users (id, email, password_hash, name, role, created_at, updated_at)
                    VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
                    "#,
                    rusqlite::params![
                        user.id,
                        user.email,
                        user.password_hash,
                        user.name,
                        user.role.to_string(),
                        user.created_at.to_rfc3339(),
                        user.updated_at.to_rfc3339(),
                    ],
                )?;
                Ok(())
            })
            .await
            .map_err(|e| map_constraint(e, "Email already registered"))
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, DbError> {
        let email = email.to_string();

        self.conn
            .call(move |conn| {
                let mut stmt = conn.prepare(&format!(
                    "SELECT {} FROM users WHERE email = ?1",
                    USER_COLUMNS
                ))?;
                let user = stmt.query_row([&email], user_from_row).optional()?;
                Ok(user)
            })
            .await
            .map_err(Into::into)
    }

    async fn find_user_by_id(&self, id: &str) -> Result<Option<User>, DbError> {
        let id = id.to_string();

        self.conn
            .call(move |conn| {
                let mut stmt =
                    conn.prepare(&format!("SELECT {} FROM users WHERE id = ?1", USER_COLUMNS))?;
                let user = stmt.query_row([&id], user_from_row).optional()?;
                Ok(user)
            })
            .await
            .map_err(Into::into)
    }

    async fn update_user(&self, user: &User) -> Result<(), DbError> {
        let user = user.clone();

        let affected = self
            .conn
            .call(move |conn| {
                let affected = conn.execute(
                    r#"
                    UPDATE users
                    SET password_hash = ?2, name = ?3, role = ?4, updated_at = ?5
                    WHERE id = ?1
                    "#,
                    rusqlite::params![
                        user.id,
                        user.password_hash,
                        user.name,
                        user.role.to_string(),
                        user.updated_at.to_rfc3339(),
                    ],
                )?;
                Ok(affected)
            })
            .await?;

        if affected == 0 {
            return Err(DbError::NotFound);
        }
        Ok(())
    }

    // =========================================================================
    // Issue operations
    // =========================================================================

    async fn create_issue(&self, issue: &Issue) -> Result<(), DbError> {
        let issue = issue.clone();

        self.conn
            .call(move |conn| {
                conn.execute(
                    r#"
                    INSERT INTO issues
                    (id, user_id, title, description, issue_type, status, created_at, updated_at, deleted_at)
                    VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
                    "#,
                    rusqlite::params![
                        issue.id,
                        issue.user_id,
                        issue.title,
                        issue.description,
                        issue.issue_type.to_string(),
                        issue.status.to_string(),
                        issue.created_at.to_rfc3339(),
                        issue.updated_at.to_rfc3339(),
                        issue.deleted_at.map(|dt| dt.to_rfc3339()),
                    ],
                )?;
                Ok(())
            })
            .await?;

        Ok(())
    }

    async fn find_issue_by_id(&self, id: &str) -> Result<Option<Issue>, DbError> {
        let id = id.to_string();

        self.conn
            .call(move |conn| {
                let mut stmt = conn.prepare(&format!(
                    "SELECT {} FROM issues WHERE id = ?1 AND deleted_at IS NULL",
                    ISSUE_COLUMNS
                ))?;
                let issue = stmt.query_row([&id], issue_from_row).optional()?;
                Ok(issue)
            })
            .await
            .map_err(Into::into)
    }

    async fn find_issues_by_user(&self, user_id: &str) -> Result<Vec<Issue>, DbError> {
        let user_id = user_id.to_string();

        self.conn
            .call(move |conn| {
                let mut stmt = conn.prepare(&format!(
                    r#"
                    SELECT {}
                    FROM issues
                    WHERE user_id = ?1 AND deleted_at IS NULL
                    ORDER BY created_at DESC
                    "#,
                    ISSUE_COLUMNS
                ))?;

                let issues = stmt
                    .query_map([&user_id], issue_from_row)?
                    .collect::<Result<Vec<_>, _>>()?;

                Ok(issues)
            })
            .await
            .map_err(Into::into)
    }

    async fn update_issue(&self, issue: &Issue) -> Result<(), DbError> {
        let issue = issue.clone();

        let affected = self
            .conn
            .call(move |conn| {
                let affected = conn.execute(
                    r#"
                    UPDATE issues
                    SET title = ?2, description = ?3, status = ?4, updated_at = ?5
                    WHERE id = ?1 AND deleted_at IS NULL
                    "#,
                    rusqlite::params![
                        issue.id,
                        issue.title,
                        issue.description,
                        issue.status.to_string(),
                        issue.updated_at.to_rfc3339(),
                    ],
                )?;
                Ok(affected)
            })
            .await?;

        if affected == 0 {
            return Err(DbError::NotFound);
        }
        Ok(())
    }

    async fn soft_delete_issue(&self, id: &str) -> Result<(), DbError> {
        let id = id.to_string();

        let affected = self
            .conn
            .call(move |conn| {
                let affected = conn.execute(
                    "UPDATE issues SET deleted_at = ?2 WHERE id = ?1 AND deleted_at IS NULL",
                    rusqlite::params![id, Utc::now().to_rfc3339()],
                )?;
                Ok(affected)
            })
            .await?;

        if affected == 0 {
            return Err(DbError::NotFound);
        }
        Ok(())
    }
}
