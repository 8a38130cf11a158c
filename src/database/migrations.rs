//! Database migrations for secdesk
//!
//! This module contains SQL migrations for the SQLite database schema.

/// SQL statement to create the initial database schema
pub const CREATE_SCHEMA: &str = r#"
-- Users table
CREATE TABLE IF NOT EXISTS users (
    id TEXT PRIMARY KEY,
    email TEXT NOT NULL UNIQUE,
    password_hash TEXT NOT NULL,
    name TEXT,
    role TEXT NOT NULL DEFAULT 'CLIENT',
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_users_email ON users(email);

-- Issues table (soft-deleted rows keep their data, deleted_at set)
CREATE TABLE IF NOT EXISTS issues (
    id TEXT PRIMARY KEY,
    user_id TEXT NOT NULL REFERENCES users(id),
    title TEXT NOT NULL,
    description TEXT NOT NULL DEFAULT '',
    issue_type TEXT NOT NULL,
    status TEXT NOT NULL DEFAULT 'OPEN',
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL,
    deleted_at TEXT
);

CREATE INDEX IF NOT EXISTS idx_issues_user ON issues(user_id, created_at DESC);
"#;

/// Get the migration version
pub fn migration_version() -> i32 {
    1
}

#[cfg(test)]
mod tests {
    use super::*;
    use rusqlite::Connection;

    #[test]
    fn test_create_schema_valid_sql() {
        let conn = Connection::open_in_memory().unwrap();

        conn.execute_batch(CREATE_SCHEMA).unwrap();

        let tables: Vec<String> = conn
            .prepare("SELECT name FROM sqlite_master WHERE type='table' ORDER BY name")
            .unwrap()
            .query_map([], |row| row.get(0))
            .unwrap()
            .filter_map(Result::ok)
            .collect();

        assert!(tables.contains(&"users".to_string()));
        assert!(tables.contains(&"issues".to_string()));
    }

    #[test]
    fn test_users_email_unique_constraint() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(CREATE_SCHEMA).unwrap();

        conn.execute(
            "INSERT INTO users (id, email, password_hash, created_at, updated_at) VALUES (?, ?, ?, ?, ?)",
            ["id1", "a@example.com", "hash", "2026-01-01T00:00:00Z", "2026-01-01T00:00:00Z"],
        )
        .unwrap();

        // Duplicate email must fail
        let result = conn.execute(
            "INSERT INTO users (id, email, password_hash, created_at, updated_at) VALUES (?, ?, ?, ?, ?)",
            ["id2", "a@example.com", "hash", "2026-01-01T00:00:00Z", "2026-01-01T00:00:00Z"],
        );

        assert!(result.is_err());
    }

    #[test]
    fn test_migration_version() {
        assert_eq!(migration_version(), 1);
    }
}
