//! Domain models for secdesk
//!
//! This module contains the core domain models used throughout the application.

pub mod issue;
pub mod user;

// Re-export commonly used types
pub use issue::{CreateIssueRequest, Issue, IssueStatus, IssueType, UpdateIssueRequest};
pub use user::{Identity, Role, SafeUser, UpdateProfileRequest, User};
