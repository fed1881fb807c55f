//! Connection (layover) risk across a multi-leg itinerary.

use super::itinerary::{layover_minutes, Segment};
use super::prediction::DelayPrediction;
use serde::Serialize;

/// Verdict for one connection between adjacent segments.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConnectionAssessment {
    /// Index of the inbound segment; the outbound one is `index + 1`.
    pub index: usize,
    pub connection_airport: String,
    pub layover_minutes: f64,
    pub predicted_delay_minutes: u32,
    pub at_risk: bool,
}

impl ConnectionAssessment {
    /// Layover rendered as `"{h}h {m}m"`, minutes truncated.
    pub fn layover_display(&self) -> String {
        let total = self.layover_minutes.max(0.0).floor() as u64;
        format!("{}h {}m", total / 60, total % 60)
    }
}

/// Assess every connection in order.
///
/// `predictions[i]` is the prediction for `segments[i]`; a missing entry counts
/// as unavailable. A connection is at risk when the estimated delay of the
/// inbound leg is at least as long as the layover.
pub fn assess_connections(
    segments: &[Segment],
    predictions: &[DelayPrediction],
) -> Vec<ConnectionAssessment> {
    segments
        .windows(2)
        .enumerate()
        .map(|(index, pair)| {
            let layover = layover_minutes(&pair[0], &pair[1]);
            let predicted = predictions
                .get(index)
                .map(DelayPrediction::estimated_delay_minutes)
                .unwrap_or(0);
            ConnectionAssessment {
                index,
                connection_airport: pair[0].arrival_airport.clone(),
                layover_minutes: layover,
                predicted_delay_minutes: predicted,
                at_risk: f64::from(predicted) >= layover,
            }
        })
        .collect()
}

/// Whether any connection in the itinerary is at risk. A single leg never is.
pub fn is_connection_at_risk(segments: &[Segment], predictions: &[DelayPrediction]) -> bool {
    assess_connections(segments, predictions)
        .iter()
        .any(|c| c.at_risk)
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;
    use time::PrimitiveDateTime;

    fn leg(from: &str, to: &str, dep: PrimitiveDateTime, arr: PrimitiveDateTime) -> Segment {
        Segment::new(from, to, dep, arr)
    }

    fn two_legs(layover_minutes: i64) -> Vec<Segment> {
        let arrive = datetime!(2024-11-04 09:50);
        let depart = arrive + time::Duration::minutes(layover_minutes);
        vec![
            leg("DEL", "BOM", datetime!(2024-11-04 07:35), arrive),
            leg("BOM", "DXB", depart, depart + time::Duration::hours(3)),
        ]
    }

    #[test]
    fn test_single_segment_never_at_risk() {
        let segments = vec![leg("DEL", "BOM", datetime!(2024-11-04 07:35), datetime!(2024-11-04 09:50))];
        let predictions = vec![DelayPrediction::probability(0.9)];
        assert!(!is_connection_at_risk(&segments, &predictions));
        assert!(!is_connection_at_risk(&segments, &[]));
        assert!(!is_connection_at_risk(&[], &[]));
    }

    #[test]
    fn test_short_layover_with_moderate_delay_is_at_risk() {
        let segments = two_legs(45);
        let predictions = vec![DelayPrediction::probability(0.22)];
        assert!(is_connection_at_risk(&segments, &predictions));

        let assessed = assess_connections(&segments, &predictions);
        assert_eq!(assessed.len(), 1);
        assert_eq!(assessed[0].layover_minutes, 45.0);
        assert_eq!(assessed[0].predicted_delay_minutes, 60);
        assert_eq!(assessed[0].connection_airport, "BOM");
    }

    #[test]
    fn test_long_layover_with_minor_delay_is_safe() {
        let segments = two_legs(90);
        let predictions = vec![DelayPrediction::probability(0.17)];
        assert!(!is_connection_at_risk(&segments, &predictions));
    }

    #[test]
    fn test_equal_delay_and_layover_is_at_risk() {
        let segments = two_legs(60);
        assert!(is_connection_at_risk(&segments, &[DelayPrediction::probability(0.2)]));
    }

    #[test]
    fn test_unavailable_or_missing_prediction_counts_as_zero() {
        let segments = two_legs(30);
        assert!(!is_connection_at_risk(
            &segments,
            &[DelayPrediction::unavailable("No historical data available for this flight.")]
        ));
        assert!(!is_connection_at_risk(&segments, &[]));
    }

    #[test]
    fn test_overlapping_segments_always_at_risk() {
        let segments = two_legs(-10);
        assert!(is_connection_at_risk(&segments, &[DelayPrediction::probability(0.0)]));
    }

    #[test]
    fn test_any_connection_flags_itinerary() {
        let t0 = datetime!(2024-11-04 06:00);
        let segments = vec![
            leg("DEL", "BOM", t0, t0 + time::Duration::hours(2)),
            leg("BOM", "DXB", t0 + time::Duration::hours(5), t0 + time::Duration::hours(8)),
            leg("DXB", "LHR", t0 + time::Duration::minutes(530), t0 + time::Duration::hours(16)),
        ];
        let predictions = vec![
            DelayPrediction::probability(0.10),
            DelayPrediction::probability(0.31),
            DelayPrediction::probability(0.05),
        ];
        let assessed = assess_connections(&segments, &predictions);
        assert!(!assessed[0].at_risk);
        assert!(assessed[1].at_risk);
        assert!(is_connection_at_risk(&segments, &predictions));
    }

    #[test]
    fn test_discrete_code_feeds_delay_estimate() {
        let segments = two_legs(100);
        let predictions = vec![DelayPrediction::code(
            crate::risk::DelayResultCode::Between60And120Minutes,
        )];
        assert!(is_connection_at_risk(&segments, &predictions));
    }

    #[test]
    fn test_repeated_calls_agree() {
        let segments = two_legs(45);
        let predictions = vec![DelayPrediction::probability(0.22)];
        let first = assess_connections(&segments, &predictions);
        for _ in 0..3 {
            assert_eq!(assess_connections(&segments, &predictions), first);
            assert!(is_connection_at_risk(&segments, &predictions));
        }
    }

    #[test]
    fn test_layover_display() {
        let assessed = assess_connections(&two_legs(95), &[]);
        assert_eq!(assessed[0].layover_display(), "1h 35m");
    }
}
