//! Flight segments and the timing arithmetic between them.

use crate::{Error, ErrorContext, Result};
use serde_json::Value;
use time::format_description::BorrowedFormatItem;
use time::macros::format_description;
use time::{Duration, PrimitiveDateTime};

/// Local wall-clock timestamps as delivered in flight offers, e.g. `2024-11-04T07:35:00`.
const OFFER_TIMESTAMP: &[BorrowedFormatItem<'static>] =
    format_description!("[year]-[month]-[day]T[hour]:[minute]:[second]");

const OFFER_TIMESTAMP_SHORT: &[BorrowedFormatItem<'static>] =
    format_description!("[year]-[month]-[day]T[hour]:[minute]");

/// One flight leg. Read-only input to the classifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    pub departure_airport: String,
    pub arrival_airport: String,
    pub departure_at: PrimitiveDateTime,
    pub arrival_at: PrimitiveDateTime,
    pub carrier_code: String,
    pub flight_number: String,
}

impl Segment {
    pub fn new(
        departure_airport: impl Into<String>,
        arrival_airport: impl Into<String>,
        departure_at: PrimitiveDateTime,
        arrival_at: PrimitiveDateTime,
    ) -> Self {
        Self {
            departure_airport: departure_airport.into(),
            arrival_airport: arrival_airport.into(),
            departure_at,
            arrival_at,
            carrier_code: String::new(),
            flight_number: String::new(),
        }
    }

    pub fn with_flight(mut self, carrier_code: impl Into<String>, flight_number: impl Into<String>) -> Self {
        self.carrier_code = carrier_code.into();
        self.flight_number = flight_number.into();
        self
    }

    /// Build a segment from a flight-offer segment object.
    ///
    /// Reads `departure.iataCode`, `departure.at`, `arrival.iataCode`,
    /// `arrival.at`, `carrierCode` and `number`.
    pub fn from_offer_json(value: &Value) -> Result<Self> {
        let departure_airport = required_str(value, &["departure", "iataCode"])?;
        let arrival_airport = required_str(value, &["arrival", "iataCode"])?;
        let departure_at = parse_timestamp(
            required_str(value, &["departure", "at"])?,
            "departure.at",
        )?;
        let arrival_at = parse_timestamp(required_str(value, &["arrival", "at"])?, "arrival.at")?;
        let carrier_code = value
            .get("carrierCode")
            .and_then(Value::as_str)
            .unwrap_or_default();
        let flight_number = match value.get("number") {
            Some(Value::String(s)) => s.clone(),
            Some(Value::Number(n)) => n.to_string(),
            _ => String::new(),
        };

        Ok(Self::new(departure_airport, arrival_airport, departure_at, arrival_at)
            .with_flight(carrier_code, flight_number))
    }

    /// Scheduled block time of the leg.
    pub fn duration(&self) -> Duration {
        self.arrival_at - self.departure_at
    }

    /// Carrier code and number, e.g. `AI101`.
    pub fn flight_designator(&self) -> String {
        format!("{}{}", self.carrier_code, self.flight_number)
    }
}

/// Minutes between an arrival and the next departure. Negative if they overlap.
pub fn layover_minutes(arriving: &Segment, departing: &Segment) -> f64 {
    (departing.departure_at - arriving.arrival_at).as_seconds_f64() / 60.0
}

/// Parse an offer timestamp; seconds are optional.
pub fn parse_timestamp(raw: &str, field: &str) -> Result<PrimitiveDateTime> {
    PrimitiveDateTime::parse(raw, OFFER_TIMESTAMP)
        .or_else(|_| PrimitiveDateTime::parse(raw, OFFER_TIMESTAMP_SHORT))
        .map_err(|e| {
            Error::validation_with_context(
                format!("invalid timestamp '{}'", raw),
                ErrorContext::new()
                    .with_field_path(field)
                    .with_details(e.to_string())
                    .with_source("itinerary"),
            )
        })
}

fn required_str<'a>(value: &'a Value, path: &[&str]) -> Result<&'a str> {
    let mut cur = value;
    for key in path {
        cur = cur.get(*key).ok_or_else(|| missing(path))?;
    }
    cur.as_str().ok_or_else(|| missing(path))
}

fn missing(path: &[&str]) -> Error {
    Error::validation_with_context(
        "missing segment field",
        ErrorContext::new()
            .with_field_path(path.join("."))
            .with_source("itinerary"),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use time::macros::datetime;

    #[test]
    fn test_from_offer_json() {
        let seg = Segment::from_offer_json(&json!({
            "departure": {"iataCode": "DEL", "terminal": "3", "at": "2024-11-04T07:35:00"},
            "arrival": {"iataCode": "BOM", "at": "2024-11-04T09:50:00"},
            "carrierCode": "AI",
            "number": "101",
            "duration": "PT2H15M"
        }))
        .unwrap();

        assert_eq!(seg.departure_airport, "DEL");
        assert_eq!(seg.arrival_airport, "BOM");
        assert_eq!(seg.departure_at, datetime!(2024-11-04 07:35));
        assert_eq!(seg.duration(), Duration::minutes(135));
        assert_eq!(seg.flight_designator(), "AI101");
    }

    #[test]
    fn test_numeric_flight_number_and_short_timestamp() {
        let seg = Segment::from_offer_json(&json!({
            "departure": {"iataCode": "BOM", "at": "2024-11-04T11:00"},
            "arrival": {"iataCode": "DXB", "at": "2024-11-04T13:10"},
            "carrierCode": "EK",
            "number": 505
        }))
        .unwrap();
        assert_eq!(seg.flight_number, "505");
        assert_eq!(seg.arrival_at, datetime!(2024-11-04 13:10));
    }

    #[test]
    fn test_missing_field_reports_path() {
        let err = Segment::from_offer_json(&json!({
            "departure": {"iataCode": "DEL"},
            "arrival": {"iataCode": "BOM", "at": "2024-11-04T09:50:00"}
        }))
        .unwrap_err();
        let ctx = err.context().unwrap();
        assert_eq!(ctx.field_path.as_deref(), Some("departure.at"));
    }

    #[test]
    fn test_bad_timestamp() {
        assert!(parse_timestamp("04/11/2024 07:35", "departure.at").is_err());
    }

    #[test]
    fn test_layover_minutes() {
        let first = Segment::new("DEL", "BOM", datetime!(2024-11-04 07:35), datetime!(2024-11-04 09:50));
        let second = Segment::new("BOM", "DXB", datetime!(2024-11-04 10:35), datetime!(2024-11-04 12:40));
        assert_eq!(layover_minutes(&first, &second), 45.0);
    }
}
