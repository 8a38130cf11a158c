//! Standard response envelope
//!
//! Every API response body is one envelope shape, success or failure, so
//! clients can branch on `success` without sniffing the status code.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Uniform JSON body for all API responses
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T = serde_json::Value> {
    pub success: bool,

    pub message: String,

    /// Payload; present only on success responses that carry data
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,

    /// HTTP status code; present only on failure responses
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<u16>,

    /// Extra failure context, e.g. field-level validation detail
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,

    pub timestamp: DateTime<Utc>,
}

impl<T> ApiResponse<T> {
    /// Success envelope with a payload
    pub fn success(message: impl Into<String>, data: T) -> Self {
        Self {
            success: true,
            message: message.into(),
            data: Some(data),
            code: None,
            details: None,
            timestamp: Utc::now(),
        }
    }
}

impl ApiResponse<serde_json::Value> {
    /// Success envelope without a payload
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            data: None,
            code: None,
            details: None,
            timestamp: Utc::now(),
        }
    }

    /// Failure envelope
    pub fn error(message: impl Into<String>, code: u16) -> Self {
        Self {
            success: false,
            message: message.into(),
            data: None,
            code: Some(code),
            details: None,
            timestamp: Utc::now(),
        }
    }

    /// Attach failure detail
    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }
}
