//! ==============================================================================
//! config.rs - Reporter Configuration Loader
//! ==============================================================================
//!
//! purpose:
//!     defines the schema for `reporter.toml`.
//!     loads configuration from file or falls back to defaults.
//!
//! structure:
//!     - CollectorConfig: Where readings are POSTed and how long to wait.
//!     - BackoffConfig: Pauses between cycles and the escalation threshold.
//!     - FeedConfig: Target file and interval for the sensor_data.json writer.
//!     - LoggingConfig: Log level and whether readings are echoed.
//!
//! every section and field is optional; missing values take the defaults.
//! the loaded config is immutable and handed to the loop at construction.
//!
//! ==============================================================================

use anyhow::{anyhow, Context};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Root configuration structure
#[derive(Debug, Deserialize, Clone, Default, PartialEq)]
#[serde(default)]
pub struct ReporterConfig {
    pub collector: CollectorConfig,
    pub backoff: BackoffConfig,
    pub feed: FeedConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct CollectorConfig {
    pub endpoint: String,
    pub timeout_seconds: u64,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct BackoffConfig {
    /// pause after a successful send
    pub update_interval_seconds: u64,
    /// pause after a failure below the threshold
    pub retry_delay_seconds: u64,
    /// pause once the threshold is reached
    pub escalated_delay_seconds: u64,
    /// pause after a fault outside the outcome taxonomy
    pub unexpected_delay_seconds: u64,
    pub max_failures: u32,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct FeedConfig {
    pub path: PathBuf,
    pub interval_seconds: u64,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub show_sensor_data: bool,
}

impl Default for CollectorConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://localhost:3000/api/sensors".to_string(),
            timeout_seconds: 5,
        }
    }
}

impl Default for BackoffConfig {
    fn default() -> Self {
        Self {
            update_interval_seconds: 5,
            retry_delay_seconds: 10,
            escalated_delay_seconds: 30,
            unexpected_delay_seconds: 5,
            max_failures: 3,
        }
    }
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("public").join("sensor_data.json"),
            interval_seconds: 3,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: "info".to_string(), show_sensor_data: true }
    }
}

impl CollectorConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

impl BackoffConfig {
    pub fn update_interval(&self) -> Duration {
        Duration::from_secs(self.update_interval_seconds)
    }

    pub fn retry_delay(&self) -> Duration {
        Duration::from_secs(self.retry_delay_seconds)
    }

    pub fn escalated_delay(&self) -> Duration {
        Duration::from_secs(self.escalated_delay_seconds)
    }

    pub fn unexpected_delay(&self) -> Duration {
        Duration::from_secs(self.unexpected_delay_seconds)
    }
}

impl FeedConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_seconds)
    }
}

impl ReporterConfig {
    /// Load configuration from file
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file {}", path.as_ref().display()))?;

        Self::parse(&content)
    }

    /// Parse and validate a TOML document
    pub fn parse(content: &str) -> anyhow::Result<Self> {
        let config: ReporterConfig = toml::from_str(content)
            .map_err(|e| anyhow!("Failed to parse config: {}", e))?;

        config.validate()?;
        Ok(config)
    }

    /// Reject values the reporter loop cannot run with
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.backoff.max_failures == 0 {
            anyhow::bail!("backoff.max_failures must be at least 1");
        }
        if self.collector.endpoint.trim().is_empty() {
            anyhow::bail!("collector.endpoint must not be empty");
        }
        if self.collector.timeout_seconds == 0 {
            anyhow::bail!("collector.timeout_seconds must be at least 1");
        }
        if self.backoff.update_interval_seconds == 0 {
            anyhow::bail!("backoff.update_interval_seconds must be at least 1");
        }
        if self.feed.interval_seconds == 0 {
            anyhow::bail!("feed.interval_seconds must be at least 1");
        }
        Ok(())
    }

    /// Load with default fallback
    pub fn load_or_default() -> Self {
        let paths = [
            PathBuf::from("config").join("reporter.toml"),
            PathBuf::from("..").join("config").join("reporter.toml"),
        ];

        for path in &paths {
            if path.exists() {
                match Self::load(path) {
                    Ok(config) => {
                        println!("[CONFIG] Loaded from {}", path.display());
                        return config;
                    }
                    Err(e) => {
                        println!("[CONFIG] Warning: Failed to load {}: {:#}", path.display(), e);
                    }
                }
            }
        }

        println!("[CONFIG] Warning: No config file found - using defaults");
        Self::default()
    }

    /// Print configuration summary
    pub fn print_summary(&self) {
        println!("Target URL: {}", self.collector.endpoint);
        println!("Update interval: {} seconds", self.backoff.update_interval_seconds);
        println!(
            "Backoff: {}s retry, {}s after {} consecutive failures",
            self.backoff.retry_delay_seconds,
            self.backoff.escalated_delay_seconds,
            self.backoff.max_failures
        );
        println!("Log level: {}", self.logging.level);
    }
}
