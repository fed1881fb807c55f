//! 上游接口模块：航班延误预测与机场查询的轻量客户端。
//!
//! # Upstream Client Module
//!
//! A thin HTTP client for the flight-delay prediction endpoint and the airport
//! reference-data lookup. It holds a bearer token supplied by the caller.
//! [`WeatherClient`] adds current weather at an airport, cached per
//! coordinate pair for 30 minutes.
//!
//! Prediction calls never fail outright: transport errors, HTTP errors and the
//! "no historical data" response are reported as
//! [`DelayPrediction::Unavailable`](crate::risk::DelayPrediction::Unavailable)
//! so a single bad leg does not break itinerary rendering. Use
//! [`PredictionClient::predict_governed`] or
//! [`PredictionClient::predict_itinerary`] to route calls through a
//! [`RequestGovernor`](crate::governor::RequestGovernor).

mod client;
mod query;
mod weather;

pub use client::{AirportLocation, PredictionClient, UpstreamConfig};
pub use weather::{AirportWeather, WeatherClient};
pub use query::{iso8601_duration, PredictionQuery, DEFAULT_AIRCRAFT_CODE};
