//! Tolerant parsing of upstream delay-prediction payloads.

use super::band::{classify_band, DelayBand};
use super::code::DelayResultCode;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

const UNAVAILABLE_LABEL: &str = "Prediction Unavailable";

/// Outcome of one per-segment delay query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DelayPrediction {
    Probability { probability: f64 },
    Code { result: DelayResultCode },
    Unavailable { reason: String },
}

impl DelayPrediction {
    pub fn probability(probability: f64) -> Self {
        DelayPrediction::Probability { probability }
    }

    pub fn code(result: DelayResultCode) -> Self {
        DelayPrediction::Code { result }
    }

    pub fn unavailable(reason: impl Into<String>) -> Self {
        DelayPrediction::Unavailable {
            reason: reason.into(),
        }
    }

    /// Interpret a raw payload.
    ///
    /// Accepts `{probability}` (number or numeric string), `{result}`,
    /// `{predictionUnavailable, error}`, a `{data: [..]}` envelope, `null` and
    /// absent payloads. When both probability and result are present the
    /// probability wins. Anything unusable degrades to `Unavailable`.
    pub fn from_payload(payload: Option<&Value>) -> Self {
        let payload = match payload {
            None | Some(Value::Null) => return Self::unavailable(UNAVAILABLE_LABEL),
            Some(v) => v,
        };

        let obj = match payload.as_object() {
            Some(obj) => obj,
            None => {
                warn!(payload = %payload, "delay prediction payload is not an object");
                return Self::unavailable(UNAVAILABLE_LABEL);
            }
        };

        if let Some(data) = obj.get("data") {
            return match data {
                Value::Array(items) => Self::from_payload(items.first()),
                other => Self::from_payload(Some(other)),
            };
        }

        if obj
            .get("predictionUnavailable")
            .and_then(Value::as_bool)
            .unwrap_or(false)
        {
            let reason = obj
                .get("error")
                .and_then(Value::as_str)
                .filter(|s| !s.is_empty())
                .unwrap_or(UNAVAILABLE_LABEL);
            return Self::unavailable(reason);
        }

        match obj.get("probability") {
            Some(Value::Number(n)) => {
                if let Some(p) = n.as_f64() {
                    return Self::probability(p);
                }
            }
            Some(Value::String(s)) => match s.trim().parse::<f64>() {
                Ok(p) if p.is_finite() => return Self::probability(p),
                _ => warn!(probability = %s, "unparseable delay probability"),
            },
            Some(Value::Null) | None => {}
            Some(other) => warn!(probability = %other, "unexpected delay probability type"),
        }

        if let Some(result) = obj.get("result").and_then(Value::as_str) {
            return match result.parse::<DelayResultCode>() {
                Ok(code) => Self::code(code),
                Err(e) => {
                    warn!(error = %e, "discarding delay prediction");
                    Self::unavailable(UNAVAILABLE_LABEL)
                }
            };
        }

        Self::unavailable(UNAVAILABLE_LABEL)
    }

    pub fn is_available(&self) -> bool {
        !matches!(self, DelayPrediction::Unavailable { .. })
    }

    /// Band on the delay table, or `None` when no prediction was available.
    pub fn band(&self) -> Option<DelayBand> {
        match self {
            DelayPrediction::Probability { probability } => Some(classify_band(*probability)),
            DelayPrediction::Code { result } => Some(result.band()),
            DelayPrediction::Unavailable { .. } => None,
        }
    }

    /// Probability as reported, 0 for discrete codes and unavailable predictions.
    pub fn probability_or_zero(&self) -> f64 {
        match self {
            DelayPrediction::Probability { probability } if probability.is_finite() => *probability,
            _ => 0.0,
        }
    }

    /// Delay used for connection checks; 0 when unavailable.
    pub fn estimated_delay_minutes(&self) -> u32 {
        self.band()
            .map(DelayBand::estimated_delay_minutes)
            .unwrap_or(0)
    }
}

impl std::fmt::Display for DelayPrediction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DelayPrediction::Probability { probability } => write!(
                f,
                "{} ({:.1}%)",
                classify_band(*probability).label(),
                probability * 100.0
            ),
            DelayPrediction::Code { result } => f.write_str(result.band().label()),
            DelayPrediction::Unavailable { reason } if reason.is_empty() => {
                f.write_str(UNAVAILABLE_LABEL)
            }
            DelayPrediction::Unavailable { reason } => f.write_str(reason),
        }
    }
}

impl From<Option<&Value>> for DelayPrediction {
    fn from(payload: Option<&Value>) -> Self {
        Self::from_payload(payload)
    }
}
