//! Cache keys for airport and weather lookups.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CacheKey {
    pub key: String,
}

impl CacheKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self { key: key.into() }
    }

    /// Airport reference data, keyed by IATA code (case-insensitive).
    pub fn airport(iata_code: &str) -> Self {
        Self::new(format!("airport:{}", iata_code.trim().to_ascii_uppercase()))
    }

    /// Weather observations, keyed by the airport's coordinates.
    pub fn coordinates(lat: f64, lon: f64) -> Self {
        Self::new(format!("weather:{},{}", lat, lon))
    }

    pub fn as_str(&self) -> &str {
        &self.key
    }
}

impl std::fmt::Display for CacheKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.key)
    }
}

impl From<&str> for CacheKey {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for CacheKey {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}
