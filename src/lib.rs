//! # flightwatch
//!
//! 航班延误风险核心库：受限速的上游调用调度与延误风险分类。
//!
//! Rate-governed flight delay lookups and connection-risk classification.
//!
//! ## Overview
//!
//! Flight search front-ends call a rate-limited delay-prediction API once per
//! flight leg and then need to tell the user how risky each leg and each
//! connection is. This crate provides the two reusable pieces of that flow,
//! plus the thin glue around them:
//!
//! - **Request governor**: a caller-owned FIFO queue with a single dispatcher
//!   that keeps outbound calls under a configured rate ([`governor`])
//! - **Delay-risk classifier**: pure functions from a delay probability or
//!   result code to a category, label and estimated delay, and a
//!   connection-at-risk verdict for whole itineraries ([`risk`])
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use flightwatch::governor::RequestGovernor;
//! use flightwatch::risk::{is_connection_at_risk, Segment};
//! use flightwatch::upstream::{PredictionClient, UpstreamConfig};
//!
//! # async fn demo(segments: Vec<Segment>) -> flightwatch::Result<()> {
//! let governor = RequestGovernor::with_rate(1.0)?;
//! let client = PredictionClient::new(&UpstreamConfig::default(), "access-token")?;
//!
//! let predictions = client.predict_itinerary(&governor, &segments).await;
//! for p in &predictions {
//!     println!("{}", p);
//! }
//! if is_connection_at_risk(&segments, &predictions) {
//!     println!("Not Recommended");
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Module Organization
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`governor`] | Serialized, paced execution of outbound calls |
//! | [`risk`] | Delay bands, labels, payload parsing and connection risk |
//! | [`cache`] | Caller-owned caches for airport and weather lookups |
//! | [`upstream`] | Delay-prediction and airport lookup client |
//! | [`config`] | File and environment configuration |

pub mod cache;
pub mod config;
pub mod governor;
pub mod risk;
pub mod upstream;

pub use config::FlightwatchConfig;
pub use governor::{GovernorConfig, RequestGovernor, TaskError, TaskHandle};
pub use risk::{
    assess_connections, classify, classify_band, display_label, estimated_delay_minutes,
    is_connection_at_risk, DelayBand, DelayPrediction, DelayResultCode, RiskCategory, Segment,
};

/// Result type alias for the library
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for the library
pub mod error;
pub use error::{Error, ErrorContext};
