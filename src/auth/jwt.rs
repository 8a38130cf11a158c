//! Identity token issuance and verification
//!
//! Tokens are compact HS256 JWTs carrying the authenticated identity. They
//! are stateless: validity is determined solely by signature and expiry at
//! verification time, and revocation before expiry is not possible.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::models::Role;

/// Claims embedded in an identity token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: the user ID
    pub sub: String,

    pub email: String,

    pub role: Role,

    /// Issued at (Unix seconds)
    pub iat: i64,

    /// Expires at (Unix seconds)
    pub exp: i64,
}

/// Signs and verifies identity tokens with a server-held symmetric secret
#[derive(Clone)]
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    ttl: Duration,
}

impl TokenService {
    /// Create a token service from the configured secret and TTL
    ///
    /// An empty secret is a process misconfiguration and must be caught at
    /// startup (see `Config::validate`); this constructor enforces it again
    /// so no caller can produce forgeable tokens.
    pub fn new(secret: &str, ttl_secs: u64) -> Result<Self, ApiError> {
        if secret.is_empty() {
            return Err(ApiError::Internal(
                "JWT secret is not configured".to_string(),
            ));
        }
        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            ttl: Duration::seconds(ttl_secs as i64),
        })
    }

    /// Token lifetime in seconds
    pub fn ttl_secs(&self) -> i64 {
        self.ttl.num_seconds()
    }

    /// Issue a signed token for the given identity
    pub fn issue(&self, user_id: &str, email: &str, role: Role) -> Result<String, ApiError> {
        let now = Utc::now();
        let claims = Claims {
            sub: user_id.to_string(),
            email: email.to_string(),
            role,
            iat: now.timestamp(),
            exp: (now + self.ttl).timestamp(),
        };
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| ApiError::Internal(format!("jwt encode: {}", e)))
    }

    /// Verify a token's signature and expiry, returning its claims
    ///
    /// The algorithm is pinned to HS256; tokens signed with any other
    /// algorithm fail verification regardless of their header.
    pub fn verify(&self, token: &str) -> Result<Claims, ApiError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        decode::<Claims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|_| ApiError::Unauthorized("Invalid token".to_string()))
    }
}
