//! Configuration validation rules.
//!
//! This module provides validation logic for `AppConfig` values
//! after they have been loaded from environment, files, or defaults.

use crate::config::AppConfig;
use thiserror::Error;

/// Configuration validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    LoadFailed(String),

    #[error("invalid configuration: {field} - {reason}")]
    Invalid { field: String, reason: String },

    #[error("missing required configuration: {field} ({hint})")]
    Missing { field: String, hint: String },
}

impl AppConfig {
    /// Validate configuration values after loading.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` if:
    /// - `bind_addr` or `assistant_url` is empty
    /// - `session_ttl_secs` or `sweep_interval_secs` is 0
    /// - `enrich_concurrency` is 0 or exceeds 16
    /// - `timeout_ms` is less than 100ms or exceeds 5 minutes
    /// - `user_agent` is empty
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.bind_addr.is_empty() {
            return Err(ConfigError::Invalid { field: "bind_addr".into(), reason: "must not be empty".into() });
        }

        if self.assistant_url.is_empty() {
            return Err(ConfigError::Invalid { field: "assistant_url".into(), reason: "must not be empty".into() });
        }
        if !self.assistant_url.starts_with("http://") && !self.assistant_url.starts_with("https://") {
            return Err(ConfigError::Invalid {
                field: "assistant_url".into(),
                reason: "must be an http(s) URL".into(),
            });
        }

        if self.session_ttl_secs == 0 {
            return Err(ConfigError::Invalid { field: "session_ttl_secs".into(), reason: "must be greater than 0".into() });
        }
        if self.sweep_interval_secs == 0 {
            return Err(ConfigError::Invalid {
                field: "sweep_interval_secs".into(),
                reason: "must be greater than 0".into(),
            });
        }

        if self.enrich_concurrency == 0 {
            return Err(ConfigError::Invalid { field: "enrich_concurrency".into(), reason: "must be at least 1".into() });
        }
        if self.enrich_concurrency > 16 {
            return Err(ConfigError::Invalid { field: "enrich_concurrency".into(), reason: "must not exceed 16".into() });
        }

        if self.timeout_ms < 100 {
            return Err(ConfigError::Invalid { field: "timeout_ms".into(), reason: "must be at least 100ms".into() });
        }
        if self.timeout_ms > 300_000 {
            return Err(ConfigError::Invalid {
                field: "timeout_ms".into(),
                reason: "must not exceed 5 minutes (300000ms)".into(),
            });
        }

        if self.user_agent.is_empty() {
            return Err(ConfigError::Invalid { field: "user_agent".into(), reason: "must not be empty".into() });
        }

        if self.sweep_interval_secs > self.session_ttl_secs {
            tracing::warn!(
                sweep_interval_secs = self.sweep_interval_secs,
                session_ttl_secs = self.session_ttl_secs,
                "sweep interval exceeds session TTL; expired sessions will \
                 linger until the next pass"
            );
        }

        Ok(())
    }
}
