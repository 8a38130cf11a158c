//! Registration and login orchestration

use std::sync::Arc;

use serde::Deserialize;

use crate::auth::jwt::TokenService;
use crate::auth::password::{hash_password, verify_password};
use crate::database::Database;
use crate::email::Notifier;
use crate::error::ApiError;
use crate::models::{Role, SafeUser, User};

/// Minimum accepted password length
pub const MIN_PASSWORD_LEN: usize = 6;

/// Registration payload
#[derive(Debug, Clone, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub name: Option<String>,
    /// Role override; defaults to `Role::Client` when absent
    #[serde(default)]
    pub role: Option<Role>,
}

/// Login payload
#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Orchestrates registration, login and identity lookup
pub struct AuthService<D: Database, N: Notifier> {
    db: Arc<D>,
    notifier: Arc<N>,
    tokens: TokenService,
}

impl<D: Database + 'static, N: Notifier + 'static> AuthService<D, N> {
    pub fn new(db: Arc<D>, notifier: Arc<N>, tokens: TokenService) -> Self {
        Self {
            db,
            notifier,
            tokens,
        }
    }

    /// The token service used for issuing and verifying identity tokens
    pub fn tokens(&self) -> &TokenService {
        &self.tokens
    }

    /// Register a new user
    ///
    /// New users get `Role::Client` unless the payload overrides it. The
    /// welcome notification is spawned off the request path and its failure
    /// is logged, never returned.
    pub async fn register(&self, req: RegisterRequest) -> Result<SafeUser, ApiError> {
        validate_email(&req.email)?;
        validate_password(&req.password)?;

        let role = req.role.unwrap_or_default();
        let mut user = User::new(req.email.trim(), hash_password(&req.password)?, role);
        user.name = req.name.filter(|n| !n.trim().is_empty());

        // Unique-email violation converts to Conflict
        self.db.create_user(&user).await?;
        tracing::info!(user_id = %user.id, "user registered");

        let safe = SafeUser::from(&user);
        let notifier = Arc::clone(&self.notifier);
        let recipient = safe.clone();
        tokio::spawn(async move {
            if let Err(e) = notifier.send_welcome(&recipient).await {
                tracing::warn!(user_id = %recipient.id, error = %e, "welcome notification failed");
            }
        });

        Ok(safe)
    }

    /// Authenticate a user and issue an identity token
    ///
    /// Unknown email and wrong password both return the same
    /// `invalid_credentials` error, so the response never reveals whether an
    /// account exists.
    pub async fn login(&self, req: LoginRequest) -> Result<(SafeUser, String), ApiError> {
        let user = self
            .db
            .find_user_by_email(req.email.trim())
            .await?
            .ok_or_else(ApiError::invalid_credentials)?;

        if !verify_password(&req.password, &user.password_hash) {
            return Err(ApiError::invalid_credentials());
        }

        let token = self.tokens.issue(&user.id, &user.email, user.role)?;
        tracing::info!(user_id = %user.id, "user logged in");

        Ok((SafeUser::from(user), token))
    }

    /// Look up the authenticated user's record
    pub async fn get_user_profile(&self, user_id: &str) -> Result<SafeUser, ApiError> {
        let user = self
            .db
            .find_user_by_id(user_id)
            .await?
            .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;
        Ok(SafeUser::from(user))
    }
}

fn validate_email(email: &str) -> Result<(), ApiError> {
    let email = email.trim();
    if email.is_empty() {
        return Err(ApiError::Validation("Email is required".to_string()));
    }
    // Full RFC validation is not the goal; reject obvious garbage
    if !email.contains('@') || email.starts_with('@') || email.ends_with('@') {
        return Err(ApiError::Validation("Invalid email address".to_string()));
    }
    Ok(())
}

fn validate_password(password: &str) -> Result<(), ApiError> {
    if password.is_empty() {
        return Err(ApiError::Validation("Password is required".to_string()));
    }
    if password.len() < MIN_PASSWORD_LEN {
        return Err(ApiError::Validation(
            "Password must be at least 6 characters".to_string(),
        ));
    }
    Ok(())
}
