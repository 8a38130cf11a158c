//! User-related domain models
//!
//! The `User` record owns the credential; its `password_hash` never leaves the
//! service boundary. `SafeUser` is the only user shape returned to clients.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// User role
///
/// Two flat roles; `Client` is the registration default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    #[serde(rename = "CLIENT")]
    Client,
    #[serde(rename = "ADMIN")]
    Admin,
}

impl Default for Role {
    fn default() -> Self {
        Role::Client
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Client => write!(f, "CLIENT"),
            Role::Admin => write!(f, "ADMIN"),
        }
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "CLIENT" => Ok(Role::Client),
            "ADMIN" => Ok(Role::Admin),
            other => Err(format!("unknown role: {}", other)),
        }
    }
}

/// User record as stored in the database
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Unique user ID (UUID v4)
    pub id: String,

    /// Email address (unique, stored case-sensitively)
    pub email: String,

    /// bcrypt hash of the password
    pub password_hash: String,

    /// Optional display name
    pub name: Option<String>,

    /// User role
    pub role: Role,

    /// When the user was created
    pub created_at: DateTime<Utc>,

    /// When the user was last updated
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Create a new user with a fresh ID and timestamps
    pub fn new(email: impl Into<String>, password_hash: impl Into<String>, role: Role) -> Self {
        let now = Utc::now();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            email: email.into(),
            password_hash: password_hash.into(),
            name: None,
            role,
            created_at: now,
            updated_at: now,
        }
    }
}

/// User representation with the password hash stripped, safe to return to clients
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SafeUser {
    pub id: String,
    pub email: String,
    pub name: Option<String>,
    pub role: Role,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<User> for SafeUser {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            name: user.name,
            role: user.role,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

impl From<&User> for SafeUser {
    fn from(user: &User) -> Self {
        SafeUser::from(user.clone())
    }
}

/// Verified identity attached to a request by the auth gate
///
/// Exists only for the duration of request handling. Handlers must read this
/// from request extensions, never from client-supplied headers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub user_id: String,
    pub role: Role,
}

/// Profile update payload
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateProfileRequest {
    pub name: Option<String>,
    pub password: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    // Test 1: New users get unique IDs
    #[test]
    fn test_user_new_unique_ids() {
        let a = User::new("a@example.com", "hash", Role::Client);
        let b = User::new("a@example.com", "hash", Role::Client);
        assert_ne!(a.id, b.id);
    }

    // Test 2: Default role is Client
    #[test]
    fn test_default_role_is_client() {
        assert_eq!(Role::default(), Role::Client);
    }

    // Test 3: SafeUser carries everything except the password hash
    #[test]
    fn test_safe_user_strips_hash() {
        let user = User::new("a@example.com", "secret-hash", Role::Admin);
        let safe = SafeUser::from(&user);

        assert_eq!(safe.id, user.id);
        assert_eq!(safe.email, user.email);
        assert_eq!(safe.role, Role::Admin);

        let json = serde_json::to_string(&safe).unwrap();
        assert!(!json.contains("secret-hash"));
        assert!(!json.contains("password_hash"));
    }

    // Test 4: Role serializes to the uppercase wire format
    #[test]
    fn test_role_wire_format() {
        assert_eq!(serde_json::to_string(&Role::Client).unwrap(), "\"CLIENT\"");
        assert_eq!(serde_json::to_string(&Role::Admin).unwrap(), "\"ADMIN\"");
        assert_eq!("CLIENT".parse::<Role>().unwrap(), Role::Client);
        assert_eq!("ADMIN".parse::<Role>().unwrap(), Role::Admin);
        assert!("client".parse::<Role>().is_err());
    }

    // Test 5: Display matches FromStr round trip
    #[test]
    fn test_role_display_round_trip() {
        for role in [Role::Client, Role::Admin] {
            assert_eq!(role.to_string().parse::<Role>().unwrap(), role);
        }
    }
}
