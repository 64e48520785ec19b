//! Configuration management for the circulation engine

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::env;

/// Lending policy knobs
#[derive(Debug, Deserialize, Clone)]
pub struct LendingConfig {
    /// Days a loan runs before it is due
    pub loan_period_days: i64,
    /// Days a notified reservation stays claimable before it expires
    pub notification_expiry_days: i64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    pub level: String,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct CirculationConfig {
    #[serde(default)]
    pub lending: LendingConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl CirculationConfig {
    /// Load configuration from files and environment variables
    pub fn load() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let config = Config::builder()
            // Start with default configuration
            .add_source(File::with_name("config/default").required(false))
            // Layer on the environment-specific file
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // Add environment variables (with prefix CIRCULATION_)
            .add_source(
                Environment::with_prefix("CIRCULATION")
                    .separator("_")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}

impl Default for LendingConfig {
    fn default() -> Self {
        Self {
            loan_period_days: 14,
            notification_expiry_days: 7,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}
