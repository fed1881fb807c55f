//! Query parameters for the flight-delay prediction endpoint.

use crate::risk::Segment;
use time::format_description::BorrowedFormatItem;
use time::macros::format_description;
use time::Duration;

const DATE: &[BorrowedFormatItem<'static>] = format_description!("[year]-[month]-[day]");
const TIME: &[BorrowedFormatItem<'static>] = format_description!("[hour]:[minute]:[second]");

/// Aircraft type sent when the offer does not name one.
pub const DEFAULT_AIRCRAFT_CODE: &str = "320";

#[derive(Debug, Clone, PartialEq)]
pub struct PredictionQuery {
    pub origin: String,
    pub destination: String,
    pub departure_date: String,
    pub departure_time: String,
    pub arrival_date: String,
    pub arrival_time: String,
    pub aircraft_code: String,
    pub carrier_code: String,
    pub flight_number: String,
    pub duration: String,
}

impl PredictionQuery {
    /// Derive the query for one leg. Airport and carrier codes are upper-cased.
    pub fn from_segment(segment: &Segment) -> Self {
        Self {
            origin: segment.departure_airport.to_ascii_uppercase(),
            destination: segment.arrival_airport.to_ascii_uppercase(),
            departure_date: format_or_empty(segment.departure_at.date().format(DATE)),
            departure_time: format_or_empty(segment.departure_at.time().format(TIME)),
            arrival_date: format_or_empty(segment.arrival_at.date().format(DATE)),
            arrival_time: format_or_empty(segment.arrival_at.time().format(TIME)),
            aircraft_code: DEFAULT_AIRCRAFT_CODE.to_string(),
            carrier_code: segment.carrier_code.to_ascii_uppercase(),
            flight_number: segment.flight_number.clone(),
            duration: iso8601_duration(segment.duration()),
        }
    }

    pub fn with_aircraft_code(mut self, aircraft_code: impl Into<String>) -> Self {
        self.aircraft_code = aircraft_code.into();
        self
    }

    pub fn to_params(&self) -> Vec<(&'static str, &str)> {
        vec![
            ("originLocationCode", self.origin.as_str()),
            ("destinationLocationCode", self.destination.as_str()),
            ("departureDate", self.departure_date.as_str()),
            ("departureTime", self.departure_time.as_str()),
            ("arrivalDate", self.arrival_date.as_str()),
            ("arrivalTime", self.arrival_time.as_str()),
            ("aircraftCode", self.aircraft_code.as_str()),
            ("carrierCode", self.carrier_code.as_str()),
            ("flightNumber", self.flight_number.as_str()),
            ("duration", self.duration.as_str()),
        ]
    }
}

// Formatting a PrimitiveDateTime component with a fixed numeric description cannot fail.
fn format_or_empty(formatted: std::result::Result<String, time::error::Format>) -> String {
    formatted.unwrap_or_default()
}

/// `PT#H#M`, e.g. `PT2H15M`, `PT45M`, `PT3H`. Negative durations clamp to `PT0M`.
pub fn iso8601_duration(duration: Duration) -> String {
    let total = duration.whole_minutes().max(0);
    let (hours, minutes) = (total / 60, total % 60);
    match (hours, minutes) {
        (0, m) => format!("PT{}M", m),
        (h, 0) => format!("PT{}H", h),
        (h, m) => format!("PT{}H{}M", h, m),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    fn segment() -> Segment {
        Segment::new(
            "del",
            "bom",
            datetime!(2024-11-04 07:35),
            datetime!(2024-11-04 09:50),
        )
        .with_flight("ai", "101")
    }

    #[test]
    fn test_from_segment() {
        let q = PredictionQuery::from_segment(&segment());
        assert_eq!(q.origin, "DEL");
        assert_eq!(q.destination, "BOM");
        assert_eq!(q.departure_date, "2024-11-04");
        assert_eq!(q.departure_time, "07:35:00");
        assert_eq!(q.arrival_time, "09:50:00");
        assert_eq!(q.carrier_code, "AI");
        assert_eq!(q.flight_number, "101");
        assert_eq!(q.duration, "PT2H15M");
        assert_eq!(q.aircraft_code, "320");
    }

    #[test]
    fn test_overnight_arrival_date() {
        let seg = Segment::new(
            "BOM",
            "LHR",
            datetime!(2024-11-04 23:10),
            datetime!(2024-11-05 04:40),
        );
        let q = PredictionQuery::from_segment(&seg).with_aircraft_code("77W");
        assert_eq!(q.arrival_date, "2024-11-05");
        assert_eq!(q.duration, "PT5H30M");
        assert_eq!(q.aircraft_code, "77W");
    }

    #[test]
    fn test_params_order_and_names() {
        let q = PredictionQuery::from_segment(&segment());
        let names: Vec<_> = q.to_params().into_iter().map(|(k, _)| k).collect();
        assert_eq!(names[0], "originLocationCode");
        assert_eq!(names.len(), 10);
        assert!(names.contains(&"flightNumber"));
    }

    #[test]
    fn test_iso8601_duration() {
        assert_eq!(iso8601_duration(Duration::minutes(45)), "PT45M");
        assert_eq!(iso8601_duration(Duration::hours(3)), "PT3H");
        assert_eq!(iso8601_duration(Duration::minutes(-5)), "PT0M");
    }
}
