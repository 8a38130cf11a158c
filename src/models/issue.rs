//! Issue-related domain models
//!
//! An issue is a reported vulnerability or threat. Every issue has exactly one
//! owning `user_id`, set at creation and immutable afterwards; mutations are
//! gated on ownership. Deletion is a soft delete via `deleted_at`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Category of a reported issue
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IssueType {
    #[serde(rename = "VAPT")]
    Vapt,
    #[serde(rename = "REDTEAM")]
    RedTeam,
    #[serde(rename = "CLOUD")]
    Cloud,
}

impl fmt::Display for IssueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IssueType::Vapt => write!(f, "VAPT"),
            IssueType::RedTeam => write!(f, "REDTEAM"),
            IssueType::Cloud => write!(f, "CLOUD"),
        }
    }
}

impl FromStr for IssueType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "VAPT" => Ok(IssueType::Vapt),
            "REDTEAM" => Ok(IssueType::RedTeam),
            "CLOUD" => Ok(IssueType::Cloud),
            other => Err(format!("unknown issue type: {}", other)),
        }
    }
}

/// Lifecycle state of an issue
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IssueStatus {
    #[serde(rename = "OPEN")]
    Open,
    #[serde(rename = "IN_PROGRESS")]
    InProgress,
    #[serde(rename = "RESOLVED")]
    Resolved,
}

impl Default for IssueStatus {
    fn default() -> Self {
        IssueStatus::Open
    }
}

impl fmt::Display for IssueStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IssueStatus::Open => write!(f, "OPEN"),
            IssueStatus::InProgress => write!(f, "IN_PROGRESS"),
            IssueStatus::Resolved => write!(f, "RESOLVED"),
        }
    }
}

impl FromStr for IssueStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "OPEN" => Ok(IssueStatus::Open),
            "IN_PROGRESS" => Ok(IssueStatus::InProgress),
            "RESOLVED" => Ok(IssueStatus::Resolved),
            other => Err(format!("unknown issue status: {}", other)),
        }
    }
}

/// Issue record as stored in the database
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issue {
    /// Unique issue ID (UUID v4)
    pub id: String,

    /// Owning user, immutable after creation
    pub user_id: String,

    pub title: String,

    pub description: String,

    #[serde(rename = "type")]
    pub issue_type: IssueType,

    pub status: IssueStatus,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,

    /// Soft-delete marker; listings exclude rows where this is set
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Issue {
    /// Create a new open issue owned by `user_id`
    pub fn new(
        user_id: impl Into<String>,
        title: impl Into<String>,
        description: impl Into<String>,
        issue_type: IssueType,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            user_id: user_id.into(),
            title: title.into(),
            description: description.into(),
            issue_type,
            status: IssueStatus::Open,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        }
    }
}

/// Issue creation payload
#[derive(Debug, Clone, Deserialize)]
pub struct CreateIssueRequest {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(rename = "type")]
    pub issue_type: IssueType,
}

/// Issue update payload; absent fields are left unchanged
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateIssueRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<IssueStatus>,
}
