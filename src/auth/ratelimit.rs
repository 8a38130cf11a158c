//! Fixed-window request rate limiter
//!
//! Tracks one record per identifier (client IP or user ID) in a process-wide
//! map. The window resets at fixed boundaries, so up to 2N requests can land
//! across a boundary in the worst case; that is the accepted trade-off for
//! O(1) bookkeeping. Records are never evicted except by `reset_limit` /
//! `clear_all` or process restart, so the map grows with identifier
//! cardinality.
//!
//! The limiter is constructed explicitly and shared via `AppState`; there is
//! no hidden global instance.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

/// Configuration for the rate limiter
#[derive(Debug, Clone)]
pub struct RateLimiterConfig {
    /// Window duration
    pub window: Duration,

    /// Maximum requests per identifier per window
    pub max_requests: u32,
}

impl Default for RateLimiterConfig {
    fn default() -> Self {
        Self {
            window: Duration::from_secs(900), // 15 minutes
            max_requests: 100,
        }
    }
}

impl From<&crate::config::RateLimitConfig> for RateLimiterConfig {
    fn from(cfg: &crate::config::RateLimitConfig) -> Self {
        Self {
            window: Duration::from_secs(cfg.window_secs),
            max_requests: cfg.max_requests,
        }
    }
}

/// Per-identifier counter for the current window
#[derive(Debug, Clone)]
struct RateLimitRecord {
    count: u32,
    window_reset_at: Instant,
}

/// Thread-safe fixed-window rate limiter
///
/// `check_limit` performs the check-then-increment under one lock, so
/// concurrent requests for the same identifier cannot over-admit.
pub struct RateLimiter {
    config: RateLimiterConfig,
    records: Mutex<HashMap<String, RateLimitRecord>>,
}

impl RateLimiter {
    /// Create a new rate limiter with the given configuration
    pub fn new(config: RateLimiterConfig) -> Self {
        Self {
            config,
            records: Mutex::new(HashMap::new()),
        }
    }

    /// Create a new rate limiter with default configuration
    pub fn with_defaults() -> Self {
        Self::new(RateLimiterConfig::default())
    }

    /// Record a request for `identifier` and report whether it is allowed
    ///
    /// A fresh or expired window starts at count 1 and is allowed; a full
    /// window denies without mutating the record.
    pub fn check_limit(&self, identifier: &str) -> bool {
        let now = Instant::now();
        let mut records = self.records.lock().unwrap();

        match records.get_mut(identifier) {
            Some(record) if now <= record.window_reset_at => {
                if record.count >= self.config.max_requests {
                    return false;
                }
                record.count += 1;
                true
            }
            _ => {
                // New identifier or expired window
                records.insert(
                    identifier.to_string(),
                    RateLimitRecord {
                        count: 1,
                        window_reset_at: now + self.config.window,
                    },
                );
                true
            }
        }
    }

    /// Remaining budget for `identifier` in the current window
    ///
    /// Read-only: never mutates the stored count. Returns the full budget
    /// when no active window exists.
    pub fn remaining_requests(&self, identifier: &str) -> u32 {
        let now = Instant::now();
        let records = self.records.lock().unwrap();

        match records.get(identifier) {
            Some(record) if now <= record.window_reset_at => {
                self.config.max_requests.saturating_sub(record.count)
            }
            _ => self.config.max_requests,
        }
    }

    /// Drop the record for `identifier`, starting a fresh window on next use
    pub fn reset_limit(&self, identifier: &str) {
        self.records.lock().unwrap().remove(identifier);
    }

    /// Clear all records
    pub fn clear_all(&self) {
        self.records.lock().unwrap().clear();
    }

    /// Number of identifiers currently tracked
    pub fn tracked_identifiers(&self) -> usize {
        self.records.lock().unwrap().len()
    }
}
