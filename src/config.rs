//! Runtime configuration.
//!
//! Loaded from a YAML or JSON file, then overridden from the environment:
//!
//! | Variable | Field |
//! |----------|-------|
//! | `FLIGHTWATCH_MAX_RPS` | `governor.max_requests_per_second` |
//! | `FLIGHTWATCH_BASE_URL` | `upstream.base_url` |
//! | `FLIGHTWATCH_WEATHER_BASE_URL` | `upstream.weather_base_url` |
//! | `FLIGHTWATCH_HTTP_TIMEOUT_SECS` | `upstream.timeout_secs` |
//! | `FLIGHTWATCH_CACHE_TTL_SECS` | `cache.default_ttl_secs` |

use crate::cache::CacheConfig;
use crate::governor::GovernorConfig;
use crate::upstream::UpstreamConfig;
use crate::{Error, ErrorContext, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::str::FromStr;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlightwatchConfig {
    pub governor: GovernorConfig,
    pub upstream: UpstreamConfig,
    pub cache: CacheConfig,
}

impl FlightwatchConfig {
    /// Parse a config file; `.json` is read as JSON, anything else as YAML.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let is_json = path
            .extension()
            .map(|ext| ext.eq_ignore_ascii_case("json"))
            .unwrap_or(false);
        let config: Self = if is_json {
            serde_json::from_str(&content)?
        } else {
            serde_yaml::from_str(&content)?
        };
        config.validate()?;
        Ok(config)
    }

    /// Defaults with environment overrides applied.
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();
        config.apply_env_overrides()?;
        Ok(config)
    }

    pub fn apply_env_overrides(&mut self) -> Result<()> {
        self.apply_overrides(|name| std::env::var(name).ok())
    }

    /// Apply overrides from an arbitrary lookup, e.g. a map in tests.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(rps) = parse_var::<f64, _>(&lookup, "FLIGHTWATCH_MAX_RPS")? {
            self.governor.max_requests_per_second = rps;
        }
        if let Some(url) = lookup("FLIGHTWATCH_BASE_URL") {
            self.upstream.base_url = url;
        }
        if let Some(url) = lookup("FLIGHTWATCH_WEATHER_BASE_URL") {
            self.upstream.weather_base_url = url;
        }
        if let Some(secs) = parse_var::<u64, _>(&lookup, "FLIGHTWATCH_HTTP_TIMEOUT_SECS")? {
            self.upstream.timeout_secs = secs;
        }
        if let Some(secs) = parse_var::<u64, _>(&lookup, "FLIGHTWATCH_CACHE_TTL_SECS")? {
            self.cache.default_ttl_secs = secs;
        }
        self.validate()
    }

    pub fn validate(&self) -> Result<()> {
        self.governor.validate()?;
        if self.upstream.timeout_secs == 0 {
            return Err(Error::configuration_with_context(
                "timeout must be at least one second",
                ErrorContext::new()
                    .with_field_path("upstream.timeout_secs")
                    .with_source("config"),
            ));
        }
        for (field, raw) in [
            ("upstream.base_url", &self.upstream.base_url),
            ("upstream.weather_base_url", &self.upstream.weather_base_url),
        ] {
            if url::Url::parse(raw).is_err() {
                return Err(Error::configuration_with_context(
                    format!("invalid base URL '{}'", raw),
                    ErrorContext::new()
                        .with_field_path(field)
                        .with_source("config"),
                ));
            }
        }
        Ok(())
    }
}

fn parse_var<T, F>(lookup: &F, name: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    match lookup(name) {
        None => Ok(None),
        Some(raw) => raw.trim().parse::<T>().map(Some).map_err(|e| {
            Error::configuration_with_context(
                format!("cannot parse {}", name),
                ErrorContext::new()
                    .with_field_path(name)
                    .with_details(format!("'{}': {}", raw, e))
                    .with_source("config"),
            )
        }),
    }
}
