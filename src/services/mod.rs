//! Domain services
//!
//! Services hold the business rules between the HTTP handlers and the
//! database trait. Handlers stay thin; ownership and validation live here.

pub mod issue;
pub mod user;

pub use issue::IssueService;
pub use user::UserService;
