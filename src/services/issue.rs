//! Issue reporting and lifecycle

use std::sync::Arc;

use crate::database::Database;
use crate::email::Notifier;
use crate::error::ApiError;
use crate::models::{CreateIssueRequest, Issue, SafeUser, UpdateIssueRequest};

/// Business rules for reported issues
///
/// Every mutation is gated on ownership: a missing or soft-deleted issue is
/// `NotFound`, an issue owned by someone else is `Forbidden`. Existence is
/// checked first so a non-owner probing random IDs cannot distinguish "not
/// yours" from "does not exist" by timing the ID space they do own.
pub struct IssueService<D: Database, N: Notifier> {
    db: Arc<D>,
    notifier: Arc<N>,
}

impl<D: Database + 'static, N: Notifier + 'static> IssueService<D, N> {
    pub fn new(db: Arc<D>, notifier: Arc<N>) -> Self {
        Self { db, notifier }
    }

    /// Report a new issue owned by `user_id`
    ///
    /// The confirmation notification is spawned off the request path; its
    /// failure is logged, never returned.
    pub async fn create(&self, user_id: &str, req: CreateIssueRequest) -> Result<Issue, ApiError> {
        if req.title.trim().is_empty() {
            return Err(ApiError::Validation("Title is required".to_string()));
        }

        let issue = Issue::new(user_id, req.title.trim(), req.description, req.issue_type);
        self.db.create_issue(&issue).await?;
        tracing::info!(issue_id = %issue.id, user_id = %user_id, issue_type = %issue.issue_type, "issue created");

        if let Some(user) = self.db.find_user_by_id(user_id).await? {
            let notifier = Arc::clone(&self.notifier);
            let recipient = SafeUser::from(user);
            let created = issue.clone();
            tokio::spawn(async move {
                if let Err(e) = notifier.send_issue_created(&recipient, &created).await {
                    tracing::warn!(issue_id = %created.id, error = %e, "issue notification failed");
                }
            });
        }

        Ok(issue)
    }

    /// List the caller's issues, newest first
    pub async fn list(&self, user_id: &str) -> Result<Vec<Issue>, ApiError> {
        Ok(self.db.find_issues_by_user(user_id).await?)
    }

    /// Update an issue the caller owns; absent fields are left unchanged
    pub async fn update(
        &self,
        user_id: &str,
        issue_id: &str,
        req: UpdateIssueRequest,
    ) -> Result<Issue, ApiError> {
        let mut issue = self.load_owned(user_id, issue_id).await?;

        if let Some(title) = req.title {
            if title.trim().is_empty() {
                return Err(ApiError::Validation("Title cannot be empty".to_string()));
            }
            issue.title = title.trim().to_string();
        }
        if let Some(description) = req.description {
            issue.description = description;
        }
        if let Some(status) = req.status {
            issue.status = status;
        }
        issue.updated_at = chrono::Utc::now();

        self.db.update_issue(&issue).await?;
        tracing::info!(issue_id = %issue.id, status = %issue.status, "issue updated");
        Ok(issue)
    }

    /// Soft-delete an issue the caller owns
    pub async fn delete(&self, user_id: &str, issue_id: &str) -> Result<(), ApiError> {
        let issue = self.load_owned(user_id, issue_id).await?;
        self.db.soft_delete_issue(&issue.id).await?;
        tracing::info!(issue_id = %issue.id, user_id = %user_id, "issue deleted");
        Ok(())
    }

    /// Load an issue, enforcing existence before ownership
    async fn load_owned(&self, user_id: &str, issue_id: &str) -> Result<Issue, ApiError> {
        let issue = self
            .db
            .find_issue_by_id(issue_id)
            .await?
            .ok_or_else(|| ApiError::NotFound("Issue not found".to_string()))?;

        if issue.user_id != user_id {
            return Err(ApiError::Forbidden);
        }
        Ok(issue)
    }
}
