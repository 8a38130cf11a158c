//! User profile management

use std::sync::Arc;

use crate::auth::password::hash_password;
use crate::auth::service::MIN_PASSWORD_LEN;
use crate::database::Database;
use crate::error::ApiError;
use crate::models::{SafeUser, UpdateProfileRequest};

/// Business rules for user profiles
pub struct UserService<D: Database> {
    db: Arc<D>,
}

impl<D: Database + 'static> UserService<D> {
    pub fn new(db: Arc<D>) -> Self {
        Self { db }
    }

    /// Fetch the caller's profile
    pub async fn get_profile(&self, user_id: &str) -> Result<SafeUser, ApiError> {
        let user = self
            .db
            .find_user_by_id(user_id)
            .await?
            .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;
        Ok(SafeUser::from(user))
    }

    /// Update the caller's name and/or password
    ///
    /// At least one field must be present. A new password is validated and
    /// rehashed; the plaintext is never stored.
    pub async fn update_profile(
        &self,
        user_id: &str,
        req: UpdateProfileRequest,
    ) -> Result<SafeUser, ApiError> {
        if req.name.is_none() && req.password.is_none() {
            return Err(ApiError::Validation("No fields to update".to_string()));
        }

        let mut user = self
            .db
            .find_user_by_id(user_id)
            .await?
            .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

        if let Some(name) = req.name {
            let name = name.trim().to_string();
            if name.is_empty() {
                return Err(ApiError::Validation("Name cannot be empty".to_string()));
            }
            user.name = Some(name);
        }

        if let Some(password) = req.password {
            if password.len() < MIN_PASSWORD_LEN {
                return Err(ApiError::Validation(
                    "Password must be at least 6 characters".to_string(),
                ));
            }
            user.password_hash = hash_password(&password)?;
        }

        user.updated_at = chrono::Utc::now();
        self.db.update_user(&user).await?;
        tracing::info!(user_id = %user.id, "profile updated");

        Ok(SafeUser::from(user))
    }
}
