// ABOUTME: Environment configuration management for deployment-specific settings
// ABOUTME: Handles environment variables, deployment modes, and runtime configuration parsing
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Environment-based configuration management

use crate::constants::defaults;
use crate::logging::LogFormat;
use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::str::FromStr;
use std::time::Duration;
use tracing::{info, warn};

/// Strongly typed log level configuration
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Errors only
    Error,
    /// Warnings and errors
    Warn,
    /// Informational (default)
    #[default]
    Info,
    /// Debug output
    Debug,
    /// Everything
    Trace,
}

impl LogLevel {
    /// Convert to `tracing::Level`
    #[must_use]
    pub const fn to_tracing_level(self) -> tracing::Level {
        match self {
            Self::Error => tracing::Level::ERROR,
            Self::Warn => tracing::Level::WARN,
            Self::Info => tracing::Level::INFO,
            Self::Debug => tracing::Level::DEBUG,
            Self::Trace => tracing::Level::TRACE,
        }
    }
}

impl FromStr for LogLevel {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "error" => Ok(Self::Error),
            "warn" | "warning" => Ok(Self::Warn),
            "info" => Ok(Self::Info),
            "debug" => Ok(Self::Debug),
            "trace" => Ok(Self::Trace),
            other => Err(anyhow!("unknown log level '{other}'")),
        }
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Error => write!(f, "error"),
            Self::Warn => write!(f, "warn"),
            Self::Info => write!(f, "info"),
            Self::Debug => write!(f, "debug"),
            Self::Trace => write!(f, "trace"),
        }
    }
}

/// Environment type for security and other configurations
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    /// Local development
    #[default]
    Development,
    /// Production deployment
    Production,
    /// Automated tests
    Testing,
}

impl Environment {
    /// Parse from string with fallback
    #[must_use]
    pub fn from_str_or_default(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "production" | "prod" => Self::Production,
            "testing" | "test" => Self::Testing,
            _ => Self::Development,
        }
    }

    /// Check if this is a production environment
    #[must_use]
    pub const fn is_production(self) -> bool {
        matches!(self, Self::Production)
    }
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Development => write!(f, "development"),
            Self::Production => write!(f, "production"),
            Self::Testing => write!(f, "testing"),
        }
    }
}

/// Top-level server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Bind address
    pub host: String,
    /// Bind port
    pub port: u16,
    /// Log level
    pub log_level: LogLevel,
    /// Log output format
    pub log_format: LogFormat,
    /// Deployment environment
    pub environment: Environment,
    /// HTTP limits and deadlines
    pub http: HttpConfig,
    /// Per-address rate limiting
    pub rate_limit: RateLimitConfig,
    /// GET stream settings
    pub sse: SseConfig,
    /// Session expiry
    pub session: SessionConfig,
    /// Cross-origin policy
    pub cors: CorsConfig,
}

/// HTTP limits and deadlines
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    /// Request body ceiling in bytes
    pub max_body_bytes: usize,
    /// Deadline for non-streaming requests
    pub request_timeout_secs: u64,
    /// Bound on the graceful shutdown drain
    pub shutdown_timeout_secs: u64,
}

/// Per-address rate limiting
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateLimitConfig {
    /// Enable rate limiting
    pub enabled: bool,
    /// Requests per window
    pub requests_per_window: u32,
    /// Window duration in seconds
    pub window_seconds: u64,
    /// Entries unseen this long are purged
    pub idle_purge_secs: u64,
    /// Purge sweep period
    pub cleanup_interval_secs: u64,
}

/// GET stream settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SseConfig {
    /// Heartbeat period
    pub heartbeat_interval_secs: u64,
}

/// Session expiry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Age after which a session is swept; 0 disables expiry
    pub ttl_secs: u64,
    /// Sweep period
    pub sweep_interval_secs: u64,
}

/// Cross-origin policy
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorsConfig {
    /// Comma-separated origins or `*`
    pub allowed_origins: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: defaults::HOST.to_owned(),
            port: defaults::PORT,
            log_level: LogLevel::default(),
            log_format: LogFormat::Json,
            environment: Environment::default(),
            http: HttpConfig {
                max_body_bytes: defaults::MAX_BODY_BYTES,
                request_timeout_secs: defaults::REQUEST_TIMEOUT_SECS,
                shutdown_timeout_secs: defaults::SHUTDOWN_TIMEOUT_SECS,
            },
            rate_limit: RateLimitConfig {
                enabled: true,
                requests_per_window: defaults::RATE_LIMIT_PER_WINDOW,
                window_seconds: defaults::RATE_LIMIT_WINDOW_SECS,
                idle_purge_secs: defaults::RATE_LIMIT_IDLE_SECS,
                cleanup_interval_secs: defaults::RATE_LIMIT_CLEANUP_SECS,
            },
            sse: SseConfig {
                heartbeat_interval_secs: defaults::SSE_HEARTBEAT_SECS,
            },
            session: SessionConfig {
                ttl_secs: defaults::SESSION_TTL_SECS,
                sweep_interval_secs: defaults::SESSION_SWEEP_SECS,
            },
            cors: CorsConfig {
                allowed_origins: defaults::CORS_ALLOWED_ORIGINS.to_owned(),
            },
        }
    }
}

impl ServerConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if a variable is malformed or the result fails validation
    pub fn from_env() -> Result<Self> {
        // Load .env file if it exists
        if let Err(e) = dotenvy::dotenv() {
            warn!("No .env file found or failed to load: {}", e);
        }

        let config = Self {
            host: env_var_or("SERVER_HOST", defaults::HOST),
            port: parse_env_or("SERVER_PORT", defaults::PORT)?,
            log_level: env_var_or("LOG_LEVEL", "info")
                .parse()
                .context("Invalid LOG_LEVEL value")?,
            log_format: env_var_or("LOG_FORMAT", "json")
                .parse()
                .context("Invalid LOG_FORMAT value")?,
            environment: Environment::from_str_or_default(&env_var_or(
                "ENVIRONMENT",
                "development",
            )),
            http: HttpConfig {
                max_body_bytes: parse_env_or("MAX_BODY_BYTES", defaults::MAX_BODY_BYTES)?,
                request_timeout_secs: parse_env_or(
                    "REQUEST_TIMEOUT_SECS",
                    defaults::REQUEST_TIMEOUT_SECS,
                )?,
                shutdown_timeout_secs: parse_env_or(
                    "SHUTDOWN_TIMEOUT_SECS",
                    defaults::SHUTDOWN_TIMEOUT_SECS,
                )?,
            },
            rate_limit: RateLimitConfig {
                enabled: parse_env_or("RATE_LIMIT_ENABLED", true)?,
                requests_per_window: parse_env_or(
                    "RATE_LIMIT_PER_SECOND",
                    defaults::RATE_LIMIT_PER_WINDOW,
                )?,
                window_seconds: parse_env_or(
                    "RATE_LIMIT_WINDOW_SECS",
                    defaults::RATE_LIMIT_WINDOW_SECS,
                )?,
                idle_purge_secs: parse_env_or(
                    "RATE_LIMIT_IDLE_SECS",
                    defaults::RATE_LIMIT_IDLE_SECS,
                )?,
                cleanup_interval_secs: parse_env_or(
                    "RATE_LIMIT_CLEANUP_SECS",
                    defaults::RATE_LIMIT_CLEANUP_SECS,
                )?,
            },
            sse: SseConfig {
                heartbeat_interval_secs: parse_env_or(
                    "SSE_HEARTBEAT_SECS",
                    defaults::SSE_HEARTBEAT_SECS,
                )?,
            },
            session: SessionConfig {
                ttl_secs: parse_env_or("SESSION_TTL_SECS", defaults::SESSION_TTL_SECS)?,
                sweep_interval_secs: parse_env_or(
                    "SESSION_SWEEP_SECS",
                    defaults::SESSION_SWEEP_SECS,
                )?,
            },
            cors: CorsConfig {
                allowed_origins: env_var_or(
                    "CORS_ALLOWED_ORIGINS",
                    defaults::CORS_ALLOWED_ORIGINS,
                ),
            },
        };

        config.validate()?;
        info!("Configuration loaded successfully");
        Ok(config)
    }

    /// Validate configuration values
    ///
    /// # Errors
    ///
    /// Returns an error naming the first invalid setting
    pub fn validate(&self) -> Result<()> {
        if self.port == 0 {
            return Err(anyhow!("SERVER_PORT must be non-zero"));
        }
        if self.http.max_body_bytes == 0 {
            return Err(anyhow!("MAX_BODY_BYTES must be greater than zero"));
        }
        if self.http.request_timeout_secs == 0 {
            return Err(anyhow!("REQUEST_TIMEOUT_SECS must be greater than zero"));
        }
        if self.rate_limit.enabled {
            if self.rate_limit.requests_per_window == 0 {
                return Err(anyhow!("RATE_LIMIT_PER_SECOND must be greater than zero"));
            }
            if self.rate_limit.window_seconds == 0 {
                return Err(anyhow!("RATE_LIMIT_WINDOW_SECS must be greater than zero"));
            }
            if self.rate_limit.cleanup_interval_secs == 0 {
                return Err(anyhow!("RATE_LIMIT_CLEANUP_SECS must be greater than zero"));
            }
        }
        if self.sse.heartbeat_interval_secs == 0 {
            return Err(anyhow!("SSE_HEARTBEAT_SECS must be greater than zero"));
        }
        if self.session.ttl_secs > 0 && self.session.sweep_interval_secs == 0 {
            return Err(anyhow!(
                "SESSION_SWEEP_SECS must be greater than zero when sessions expire"
            ));
        }
        if self.cors.allowed_origins.trim().is_empty() {
            warn!("CORS_ALLOWED_ORIGINS is empty; allowing any origin");
        }

        Ok(())
    }

    /// `host:port` for the listener
    #[must_use]
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Deadline applied to non-streaming requests
    #[must_use]
    pub const fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.http.request_timeout_secs)
    }

    /// Heartbeat period on GET streams
    #[must_use]
    pub const fn heartbeat_interval(&self) -> Duration {
        Duration::from_secs(self.sse.heartbeat_interval_secs)
    }

    /// Graceful shutdown bound
    #[must_use]
    pub const fn shutdown_timeout(&self) -> Duration {
        Duration::from_secs(self.http.shutdown_timeout_secs)
    }

    /// Get a summary of the configuration for logging
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "Calculator MCP Server Configuration:\n\
             - Address: {}\n\
             - Environment: {}\n\
             - Log Level: {}\n\
             - Max Body: {} bytes\n\
             - Request Timeout: {}s\n\
             - Rate Limiting: {}\n\
             - SSE Heartbeat: {}s\n\
             - Session TTL: {}\n\
             - CORS Origins: {}\n\
             - Protocol Version: {}",
            self.address(),
            self.environment,
            self.log_level,
            self.http.max_body_bytes,
            self.http.request_timeout_secs,
            if self.rate_limit.enabled {
                format!(
                    "{} req / {}s",
                    self.rate_limit.requests_per_window, self.rate_limit.window_seconds
                )
            } else {
                "Disabled".to_owned()
            },
            self.sse.heartbeat_interval_secs,
            if self.session.ttl_secs == 0 {
                "Never expires".to_owned()
            } else {
                format!("{}s", self.session.ttl_secs)
            },
            self.cors.allowed_origins,
            crate::constants::MCP_PROTOCOL_VERSION,
        )
    }
}

/// Get environment variable or default value
fn env_var_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_owned())
}

/// Parse an environment variable, falling back to `default` when unset
fn parse_env_or<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("Invalid {key} value: '{raw}'")),
        Err(_) => Ok(default),
    }
}
