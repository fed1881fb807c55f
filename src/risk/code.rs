//! Discrete delay result codes returned by the prediction endpoint.

use super::band::DelayBand;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DelayResultCode {
    #[serde(rename = "LESS_THAN_30_MINUTES")]
    LessThan30Minutes,
    #[serde(rename = "BETWEEN_30_AND_60_MINUTES")]
    Between30And60Minutes,
    #[serde(rename = "BETWEEN_60_AND_120_MINUTES")]
    Between60And120Minutes,
    #[serde(rename = "GREATER_THAN_120_MINUTES")]
    GreaterThan120Minutes,
}

impl DelayResultCode {
    pub fn as_str(self) -> &'static str {
        match self {
            DelayResultCode::LessThan30Minutes => "LESS_THAN_30_MINUTES",
            DelayResultCode::Between30And60Minutes => "BETWEEN_30_AND_60_MINUTES",
            DelayResultCode::Between60And120Minutes => "BETWEEN_60_AND_120_MINUTES",
            DelayResultCode::GreaterThan120Minutes => "GREATER_THAN_120_MINUTES",
        }
    }

    /// Direct mapping onto the delay table; probability thresholds are not consulted.
    pub fn band(self) -> DelayBand {
        match self {
            DelayResultCode::LessThan30Minutes => DelayBand::OnTime,
            DelayResultCode::Between30And60Minutes => DelayBand::UpTo60,
            DelayResultCode::Between60And120Minutes => DelayBand::UpTo120,
            DelayResultCode::GreaterThan120Minutes => DelayBand::Over120,
        }
    }
}

impl std::fmt::Display for DelayResultCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown delay result code: {0}")]
pub struct UnknownResultCode(pub String);

impl FromStr for DelayResultCode {
    type Err = UnknownResultCode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "LESS_THAN_30_MINUTES" => Ok(DelayResultCode::LessThan30Minutes),
            "BETWEEN_30_AND_60_MINUTES" => Ok(DelayResultCode::Between30And60Minutes),
            "BETWEEN_60_AND_120_MINUTES" => Ok(DelayResultCode::Between60And120Minutes),
            "GREATER_THAN_120_MINUTES" => Ok(DelayResultCode::GreaterThan120Minutes),
            _ => Err(UnknownResultCode(s.to_string())),
        }
    }
}
