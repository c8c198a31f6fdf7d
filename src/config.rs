//! Configuration Module
//!
//! Handles loading the sweeper and driver settings from environment variables.

use std::env;
use std::time::Duration;

use crate::error::{Result, StashError};

/// Runtime configuration.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Interval between sweeper passes
    pub sweep_interval: Duration,
    /// TTL applied to the driver's example entry
    pub default_ttl: Duration,
    /// How often the driver reads its example entry
    pub poll_interval: Duration,
    /// How long to wait for the sweeper to stop on shutdown
    pub shutdown_grace: Duration,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `SWEEP_INTERVAL_MS` - Sweeper interval (default: 2000)
    /// - `DEFAULT_TTL_MS` - TTL of the example entry (default: 5000)
    /// - `POLL_INTERVAL_MS` - Driver polling interval (default: 1000)
    /// - `SHUTDOWN_GRACE_MS` - Shutdown grace period (default: 1000)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            sweep_interval: millis_var("SWEEP_INTERVAL_MS").unwrap_or(defaults.sweep_interval),
            default_ttl: millis_var("DEFAULT_TTL_MS").unwrap_or(defaults.default_ttl),
            poll_interval: millis_var("POLL_INTERVAL_MS").unwrap_or(defaults.poll_interval),
            shutdown_grace: millis_var("SHUTDOWN_GRACE_MS").unwrap_or(defaults.shutdown_grace),
        }
    }

    /// Rejects settings the sweeper or driver cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.sweep_interval.is_zero() {
            return Err(StashError::InvalidConfig(
                "SWEEP_INTERVAL_MS must be greater than zero".to_string(),
            ));
        }
        if self.poll_interval.is_zero() {
            return Err(StashError::InvalidConfig(
                "POLL_INTERVAL_MS must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            sweep_interval: Duration::from_secs(2),
            default_ttl: Duration::from_secs(5),
            poll_interval: Duration::from_secs(1),
            shutdown_grace: Duration::from_secs(1),
        }
    }
}

fn millis_var(name: &str) -> Option<Duration> {
    env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .map(Duration::from_millis)
}
