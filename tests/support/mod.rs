//! Shared helpers for integration tests

pub mod mock_server;

use flightwatch::risk::{parse_timestamp, Segment};

/// Segment with explicit local timestamps, e.g. `"2025-03-01T08:00"`.
pub fn segment(from: &str, to: &str, dep: &str, arr: &str, flight: &str) -> Segment {
    Segment::new(
        from,
        to,
        parse_timestamp(dep, "departure.at").expect("valid departure"),
        parse_timestamp(arr, "arrival.at").expect("valid arrival"),
    )
    .with_flight("AI", flight)
}
