use crate::{Error, ErrorContext, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Longest gap between two dispatches a config may ask for (one per day).
pub const MAX_INTERVAL: Duration = Duration::from_secs(24 * 60 * 60);

/// Pacing configuration for a [`RequestGovernor`](super::RequestGovernor).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GovernorConfig {
    /// Upper bound on dispatches per second.
    pub max_requests_per_second: f64,
}

impl GovernorConfig {
    /// Build a config from a rate, rejecting zero, negative and non-finite values.
    pub fn from_rps(rps: f64) -> Result<Self> {
        let cfg = Self {
            max_requests_per_second: rps,
        };
        cfg.validate()?;
        Ok(cfg)
    }

    /// Rejects rates that are not positive and finite, and rates slower than
    /// one dispatch per [`MAX_INTERVAL`].
    pub fn validate(&self) -> Result<()> {
        let rps = self.max_requests_per_second;
        if !rps.is_finite() || rps <= 0.0 {
            return Err(invalid_rate(
                "max_requests_per_second must be a positive, finite number",
                rps,
            ));
        }
        match Duration::try_from_secs_f64(1.0 / rps) {
            Ok(interval) if interval <= MAX_INTERVAL => Ok(()),
            _ => Err(invalid_rate(
                "max_requests_per_second is below one request per day",
                rps,
            )),
        }
    }

    /// Minimum gap between the start times of two consecutive dispatches,
    /// never longer than [`MAX_INTERVAL`].
    pub fn min_interval(&self) -> Duration {
        Duration::try_from_secs_f64(1.0 / self.max_requests_per_second)
            .map(|interval| interval.min(MAX_INTERVAL))
            .unwrap_or(MAX_INTERVAL)
    }
}

fn invalid_rate(message: &str, rps: f64) -> Error {
    Error::configuration_with_context(
        message,
        ErrorContext::new()
            .with_field_path("governor.max_requests_per_second")
            .with_details(format!("got {}", rps))
            .with_source("governor"),
    )
}

impl Default for GovernorConfig {
    fn default() -> Self {
        Self {
            max_requests_per_second: 1.0,
        }
    }
}
