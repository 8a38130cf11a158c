//! Configuration management for secdesk
//!
//! This module handles loading, parsing, and validating application
//! configuration from YAML files and environment variables.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Config {
    /// HTTP server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// Authentication configuration
    #[serde(default)]
    pub auth: AuthConfig,

    /// Rate limiting configuration
    #[serde(default)]
    pub rate_limit: RateLimitConfig,

    /// Database configuration
    #[serde(default)]
    pub database: DatabaseConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::FileRead(format!("Failed to read config file: {}", e)))?;
        Self::from_yaml(&content)
    }

    /// Parse configuration from a YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        let config: Config = serde_yaml::from_str(yaml)
            .map_err(|e| ConfigError::Parse(format!("Failed to parse YAML: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from environment variables with prefix SECDESK_
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Config::default();

        if let Ok(host) = std::env::var("SECDESK_SERVER_HOST") {
            config.server.host = host;
        }
        if let Ok(port) = std::env::var("SECDESK_SERVER_PORT") {
            config.server.port = port
                .parse()
                .map_err(|_| ConfigError::Parse("Invalid port number".to_string()))?;
        }

        if let Ok(secret) = std::env::var("SECDESK_JWT_SECRET") {
            config.auth.jwt_secret = secret;
        }
        if let Ok(ttl) = std::env::var("SECDESK_TOKEN_TTL_SECS") {
            config.auth.token_ttl_secs = ttl
                .parse()
                .map_err(|_| ConfigError::Parse("Invalid token TTL".to_string()))?;
        }
        if let Ok(secure) = std::env::var("SECDESK_COOKIE_SECURE") {
            config.auth.cookie_secure = secure.parse().unwrap_or(false);
        }

        if let Ok(window) = std::env::var("SECDESK_RATE_LIMIT_WINDOW_SECS") {
            config.rate_limit.window_secs = window
                .parse()
                .map_err(|_| ConfigError::Parse("Invalid rate limit window".to_string()))?;
        }
        if let Ok(max) = std::env::var("SECDESK_RATE_LIMIT_MAX_REQUESTS") {
            config.rate_limit.max_requests = max
                .parse()
                .map_err(|_| ConfigError::Parse("Invalid rate limit budget".to_string()))?;
        }

        if let Ok(path) = std::env::var("SECDESK_DATABASE_PATH") {
            config.database.path = path;
        }
        if let Ok(level) = std::env::var("SECDESK_LOG_LEVEL") {
            config.logging.level = level;
        }

        config.validate()?;
        Ok(config)
    }

    /// Validate cross-field constraints
    ///
    /// A missing JWT secret must fail here, at startup, rather than surface as
    /// a forgeable token later.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.auth.jwt_secret.is_empty() {
            return Err(ConfigError::Validation(
                "auth.jwt_secret must be set (SECDESK_JWT_SECRET)".to_string(),
            ));
        }
        if self.auth.token_ttl_secs == 0 {
            return Err(ConfigError::Validation(
                "auth.token_ttl_secs must be positive".to_string(),
            ));
        }
        if self.rate_limit.max_requests == 0 {
            return Err(ConfigError::Validation(
                "rate_limit.max_requests must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ServerConfig {
    /// Host address to bind to
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to listen on
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

/// Authentication configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AuthConfig {
    /// HMAC secret for signing identity tokens
    #[serde(default)]
    pub jwt_secret: String,

    /// Identity token lifetime in seconds
    #[serde(default = "default_token_ttl")]
    pub token_ttl_secs: u64,

    /// Whether the identity cookie carries the Secure attribute
    #[serde(default)]
    pub cookie_secure: bool,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: String::new(),
            token_ttl_secs: default_token_ttl(),
            cookie_secure: false,
        }
    }
}

fn default_token_ttl() -> u64 {
    86400 // 1 day
}

/// Fixed-window rate limiter configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RateLimitConfig {
    /// Window duration in seconds
    #[serde(default = "default_window_secs")]
    pub window_secs: u64,

    /// Maximum requests per identifier per window
    #[serde(default = "default_max_requests")]
    pub max_requests: u32,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            window_secs: default_window_secs(),
            max_requests: default_max_requests(),
        }
    }
}

fn default_window_secs() -> u64 {
    900 // 15 minutes
}

fn default_max_requests() -> u32 {
    100
}

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DatabaseConfig {
    /// SQLite database path; `:memory:` for an in-memory database
    #[serde(default = "default_db_path")]
    pub path: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
        }
    }
}

fn default_db_path() -> String {
    "secdesk.db".to_string()
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LoggingConfig {
    /// Log level filter (e.g. "info", "debug", "secdesk=debug,info")
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Configuration error types
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigError {
    /// Failed to read the config file
    #[error("File read error: {0}")]
    FileRead(String),

    /// Failed to parse the config contents
    #[error("Parse error: {0}")]
    Parse(String),

    /// Config parsed but violates a constraint
    #[error("Validation error: {0}")]
    Validation(String),
}
