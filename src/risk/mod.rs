//! 延误风险模块：将延误预测映射为风险等级，并判断中转衔接是否有风险。
//!
//! # Delay Risk Module
//!
//! Pure functions that turn upstream delay predictions into user-facing risk
//! labels and decide whether a connection between two flights is jeopardized.
//!
//! ## Delay table
//!
//! | Probability | Band | Category | Label | Est. delay |
//! |-------------|------|----------|-------|------------|
//! | `< 0.15` | [`DelayBand::OnTime`] | `ON_TIME` | On Time (< 30 min) | 0 |
//! | `0.15..0.20` | [`DelayBand::UpTo30`] | `MINOR` | 0-30 min delay | 30 |
//! | `0.20..0.25` | [`DelayBand::UpTo60`] | `MODERATE` | 30-60 min delay | 60 |
//! | `0.25..0.30` | [`DelayBand::UpTo120`] | `SEVERE` | 60-120 min delay | 120 |
//! | `>= 0.30` | [`DelayBand::Over120`] | `SEVERE` | > 120 min delay | 180 |
//!
//! Discrete result codes ([`DelayResultCode`]) map onto the same rows directly.
//!
//! ```rust
//! use flightwatch::risk::{classify, classify_band, RiskCategory};
//!
//! assert_eq!(classify(0.22), RiskCategory::Moderate);
//! assert_eq!(classify_band(0.30).label(), "> 120 min delay");
//! ```

mod band;
mod code;
mod connection;
mod itinerary;
mod prediction;

pub use band::{
    classify, classify_band, display_label, estimated_delay_minutes, DelayBand, RiskCategory,
    Severity,
};
pub use code::{DelayResultCode, UnknownResultCode};
pub use connection::{assess_connections, is_connection_at_risk, ConnectionAssessment};
pub use itinerary::{layover_minutes, parse_timestamp, Segment};
pub use prediction::DelayPrediction;
