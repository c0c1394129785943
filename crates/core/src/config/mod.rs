//! Application configuration with layered loading.
//!
//! This module provides configuration management using figment for layered
//! configuration loading from multiple sources:
//!
//! 1. Environment variables (PETWELL_*)
//! 2. TOML config file (if PETWELL_CONFIG_FILE set)
//! 3. Built-in defaults

use std::path::PathBuf;
use std::time::Duration;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};

mod validation;

pub use validation::ConfigError;

/// Application configuration with layered loading.
///
/// Loading precedence (highest wins):
/// 1. Environment variables (PETWELL_*)
/// 2. TOML config file (if PETWELL_CONFIG_FILE set)
/// 3. Built-in defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Address the HTTP server binds to.
    ///
    /// Set via PETWELL_BIND_ADDR environment variable.
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    /// Base URL of the insurance assistant service.
    ///
    /// Set via PETWELL_ASSISTANT_URL environment variable.
    #[serde(default = "default_assistant_url")]
    pub assistant_url: String,

    /// API key for the external places service.
    ///
    /// Set via PETWELL_MAPS_API_KEY environment variable. When absent,
    /// clinic enrichment and live vet search are disabled.
    #[serde(default)]
    pub maps_api_key: Option<String>,

    /// Path to the durable clinic directory CSV.
    ///
    /// Set via PETWELL_CLINICS_CSV environment variable.
    #[serde(default = "default_clinics_csv")]
    pub clinics_csv: PathBuf,

    /// Idle seconds before a chat session expires.
    ///
    /// Set via PETWELL_SESSION_TTL_SECS environment variable.
    #[serde(default = "default_session_ttl_secs")]
    pub session_ttl_secs: u64,

    /// Seconds between session sweep passes.
    ///
    /// Set via PETWELL_SWEEP_INTERVAL_SECS environment variable.
    #[serde(default = "default_sweep_interval_secs")]
    pub sweep_interval_secs: u64,

    /// Maximum concurrent external calls during clinic enrichment.
    ///
    /// Set via PETWELL_ENRICH_CONCURRENCY environment variable.
    #[serde(default = "default_enrich_concurrency")]
    pub enrich_concurrency: usize,

    /// Outbound HTTP request timeout in milliseconds.
    ///
    /// Set via PETWELL_TIMEOUT_MS environment variable.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// User-Agent string for outbound HTTP requests.
    ///
    /// Set via PETWELL_USER_AGENT environment variable.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

fn default_bind_addr() -> String {
    "0.0.0.0:8000".into()
}

fn default_assistant_url() -> String {
    "http://localhost:8001".into()
}

fn default_clinics_csv() -> PathBuf {
    PathBuf::from("assets/clinics.csv")
}

fn default_session_ttl_secs() -> u64 {
    1800 // 30 minutes
}

fn default_sweep_interval_secs() -> u64 {
    300 // 5 minutes
}

fn default_enrich_concurrency() -> usize {
    5
}

fn default_timeout_ms() -> u64 {
    10_000
}

fn default_user_agent() -> String {
    "petwell/0.1".into()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            assistant_url: default_assistant_url(),
            maps_api_key: None,
            clinics_csv: default_clinics_csv(),
            session_ttl_secs: default_session_ttl_secs(),
            sweep_interval_secs: default_sweep_interval_secs(),
            enrich_concurrency: default_enrich_concurrency(),
            timeout_ms: default_timeout_ms(),
            user_agent: default_user_agent(),
        }
    }
}

impl AppConfig {
    /// Outbound HTTP timeout as a Duration for use with reqwest.
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Session idle TTL as a Duration.
    pub fn session_ttl(&self) -> Duration {
        Duration::from_secs(self.session_ttl_secs)
    }

    /// Session sweep interval as a Duration.
    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_secs)
    }

    /// Load configuration from all sources with layered precedence.
    ///
    /// Priority (highest wins):
    /// 1. Environment variables prefixed with `PETWELL_`
    /// 2. TOML file from `PETWELL_CONFIG_FILE` (if set)
    /// 3. Built-in defaults via `Default::default()`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if:
    /// - Configuration file cannot be read
    /// - Environment variables cannot be parsed
    /// - Validation fails after loading
    pub fn load() -> Result<Self, ConfigError> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Ok(config_path) = std::env::var("PETWELL_CONFIG_FILE") {
            figment = figment.merge(Toml::file(&config_path));
        }

        figment = figment.merge(
            Env::prefixed("PETWELL_")
                .map(|key| key.as_str().to_lowercase().into())
                .split("__"),
        );

        let config: Self = figment.extract().map_err(|e| ConfigError::LoadFailed(e.to_string()))?;

        config.validate()?;

        Ok(config)
    }

    /// Check if the places API key is available (for deferred validation).
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Missing` if the places API key is not set.
    pub fn require_maps_api_key(&self) -> Result<&str, ConfigError> {
        self.maps_api_key.as_deref().ok_or_else(|| ConfigError::Missing {
            field: "maps_api_key".into(),
            hint: "Set PETWELL_MAPS_API_KEY environment variable".into(),
        })
    }
}
