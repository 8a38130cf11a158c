//! Outbound notifications
//!
//! Notifications are fire-and-forget: callers spawn them off the request path
//! and log failures instead of surfacing them, so a broken mail pipeline never
//! fails a registration or an issue report.

use async_trait::async_trait;
use thiserror::Error;

use crate::models::{Issue, SafeUser};

/// Notification delivery error
#[derive(Debug, Error)]
pub enum NotifyError {
    /// The delivery backend rejected or failed the send
    #[error("Delivery failed: {0}")]
    Delivery(String),
}

/// Sends user-facing notifications
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Welcome message after successful registration
    async fn send_welcome(&self, user: &SafeUser) -> Result<(), NotifyError>;

    /// Confirmation after an issue is reported
    async fn send_issue_created(&self, user: &SafeUser, issue: &Issue) -> Result<(), NotifyError>;
}

/// Notifier that only writes to the log
///
/// Stands in until a real mail backend is wired up; keeps the notification
/// call sites honest in the meantime.
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn send_welcome(&self, user: &SafeUser) -> Result<(), NotifyError> {
        tracing::info!(user_id = %user.id, email = %user.email, "welcome notification");
        Ok(())
    }

    async fn send_issue_created(&self, user: &SafeUser, issue: &Issue) -> Result<(), NotifyError> {
        tracing::info!(
            user_id = %user.id,
            issue_id = %issue.id,
            issue_type = %issue.issue_type,
            "issue-created notification"
        );
        Ok(())
    }
}
