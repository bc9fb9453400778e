//! Application configuration management.

use chrono::NaiveDate;
use serde::Deserialize;

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Database configuration.
    pub database: DatabaseConfig,
    /// JWT configuration.
    pub jwt: JwtSettings,
    /// Active reporting window.
    #[serde(default)]
    pub reporting: ReportingConfig,
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to listen on.
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

/// Database configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Database connection URL.
    pub url: String,
    /// Maximum number of connections in the pool.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Minimum number of connections in the pool.
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
}

fn default_max_connections() -> u32 {
    10
}

fn default_min_connections() -> u32 {
    1
}

/// Bearer token settings.
///
/// Tokens are issued by the identity provider; this service only verifies them
/// with the shared secret.
#[derive(Debug, Clone, Deserialize)]
pub struct JwtSettings {
    /// Secret key shared with the identity provider.
    pub secret: String,
    /// Access token lifetime in seconds, used when minting tokens for tooling.
    #[serde(default = "default_access_token_expiry")]
    pub access_token_expiry_secs: u64,
}

fn default_access_token_expiry() -> u64 {
    3600 // 1 hour
}

/// The reporting period reports are currently filed against.
#[derive(Debug, Clone, Deserialize)]
pub struct ReportingConfig {
    /// First day of the active period.
    #[serde(default = "default_period_start")]
    pub period_start: NaiveDate,
    /// Last day of the active period (inclusive).
    #[serde(default = "default_period_end")]
    pub period_end: NaiveDate,
}

impl Default for ReportingConfig {
    fn default() -> Self {
        Self {
            period_start: default_period_start(),
            period_end: default_period_end(),
        }
    }
}

fn default_period_start() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 1, 1).unwrap_or_default()
}

fn default_period_end() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 6, 30).unwrap_or_default()
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(config::Environment::with_prefix("MIDYEAR").separator("__"))
            .build()?;

        config.try_deserialize()
    }
}
