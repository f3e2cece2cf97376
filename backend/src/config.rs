//! Configuration management for the Factory Insights service
//!
//! Supports hierarchical configuration loading:
//! 1. Default values in code
//! 2. Configuration files (development.toml, production.toml)
//! 3. Environment variable overrides with FI_ prefix

use config::{ConfigError, Environment, File};
use serde::Deserialize;

use crate::models::AnalysisParams;

/// Main application configuration
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Current environment (development, production)
    pub environment: String,

    /// Server configuration
    pub server: ServerConfig,

    /// Database configuration
    pub database: DatabaseConfig,

    /// Report defaults and limits
    pub reporting: ReportingConfig,

    /// Replenishment parameters for inventory analytics
    pub analytics: AnalyticsConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    /// Server port
    pub port: u16,

    /// Server host
    pub host: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    /// PostgreSQL connection URL
    pub url: String,

    /// Maximum number of connections in the pool
    pub max_connections: u32,

    /// Minimum number of connections in the pool
    pub min_connections: u32,

    /// Seconds to wait for a pooled connection
    pub acquire_timeout_secs: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ReportingConfig {
    /// Trailing window used when a consumption report does not specify one
    pub default_months_back: u32,

    /// Largest accepted trailing window
    pub max_months_back: u32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AnalyticsConfig {
    pub lead_time_days: f64,
    pub order_cost: f64,
    pub holding_cost: f64,
    pub safety_days: f64,
}

impl AnalyticsConfig {
    pub fn params(&self) -> AnalysisParams {
        AnalysisParams {
            lead_time_days: self.lead_time_days,
            order_cost: self.order_cost,
            holding_cost: self.holding_cost,
            safety_days: self.safety_days,
        }
    }
}

impl Config {
    /// Load configuration from files and environment variables
    pub fn load() -> Result<Self, ConfigError> {
        let environment = std::env::var("FI_ENVIRONMENT").unwrap_or_else(|_| "development".into());

        let config = config::Config::builder()
            // Start with default values
            .set_default("environment", environment.clone())?
            .set_default("server.port", 3000)?
            .set_default("server.host", "0.0.0.0")?
            .set_default("database.max_connections", 10)?
            .set_default("database.min_connections", 2)?
            .set_default("database.acquire_timeout_secs", 30)?
            .set_default("reporting.default_months_back", 6)?
            .set_default("reporting.max_months_back", 36)?
            .set_default("analytics.lead_time_days", 7.0)?
            .set_default("analytics.order_cost", 50.0)?
            .set_default("analytics.holding_cost", 2.0)?
            .set_default("analytics.safety_days", 3.0)?
            // Load environment-specific config file
            .add_source(File::with_name(&format!("config/{}", environment)).required(false))
            // Override with environment variables (FI_ prefix)
            .add_source(
                Environment::with_prefix("FI")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 3000,
            host: "0.0.0.0".to_string(),
        }
    }
}

impl Default for ReportingConfig {
    fn default() -> Self {
        Self {
            default_months_back: shared::DEFAULT_MONTHS_BACK,
            max_months_back: 36,
        }
    }
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        let params = AnalysisParams::default();
        Self {
            lead_time_days: params.lead_time_days,
            order_cost: params.order_cost,
            holding_cost: params.holding_cost,
            safety_days: params.safety_days,
        }
    }
}
