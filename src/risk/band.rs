//! Probability thresholds, bands and display labels.

use serde::{Deserialize, Serialize};

/// Coarse delay severity shown to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RiskCategory {
    OnTime,
    Minor,
    Moderate,
    Severe,
}

impl RiskCategory {
    pub fn severity(self) -> Severity {
        match self {
            RiskCategory::OnTime | RiskCategory::Minor => Severity::Low,
            RiskCategory::Moderate => Severity::Medium,
            RiskCategory::Severe => Severity::High,
        }
    }
}

/// Badge tier for a category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
}

impl Severity {
    pub fn badge_color(self) -> &'static str {
        match self {
            Severity::Low => "green",
            Severity::Medium => "yellow",
            Severity::High => "red",
        }
    }
}

/// One row of the delay table.
///
/// `UpTo120` and `Over120` share the [`RiskCategory::Severe`] category but
/// keep distinct labels and delay estimates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum DelayBand {
    #[serde(rename = "on_time")]
    OnTime,
    #[serde(rename = "up_to_30")]
    UpTo30,
    #[serde(rename = "up_to_60")]
    UpTo60,
    #[serde(rename = "up_to_120")]
    UpTo120,
    #[serde(rename = "over_120")]
    Over120,
}

impl DelayBand {
    pub fn category(self) -> RiskCategory {
        match self {
            DelayBand::OnTime => RiskCategory::OnTime,
            DelayBand::UpTo30 => RiskCategory::Minor,
            DelayBand::UpTo60 => RiskCategory::Moderate,
            DelayBand::UpTo120 | DelayBand::Over120 => RiskCategory::Severe,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            DelayBand::OnTime => "On Time (< 30 min)",
            DelayBand::UpTo30 => "0-30 min delay",
            DelayBand::UpTo60 => "30-60 min delay",
            DelayBand::UpTo120 => "60-120 min delay",
            DelayBand::Over120 => "> 120 min delay",
        }
    }

    /// Delay assumed when checking whether a connection can still be made.
    pub fn estimated_delay_minutes(self) -> u32 {
        match self {
            DelayBand::OnTime => 0,
            DelayBand::UpTo30 => 30,
            DelayBand::UpTo60 => 60,
            DelayBand::UpTo120 => 120,
            DelayBand::Over120 => 180,
        }
    }

    pub fn severity(self) -> Severity {
        self.category().severity()
    }
}

impl std::fmt::Display for DelayBand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Map a delay probability to its band.
///
/// Lower bounds are inclusive and checked in ascending order. NaN and
/// infinities count as 0; there is no clamping, so values above 1 land in
/// [`DelayBand::Over120`].
pub fn classify_band(probability: f64) -> DelayBand {
    let p = if probability.is_finite() { probability } else { 0.0 };
    if p < 0.15 {
        DelayBand::OnTime
    } else if p < 0.20 {
        DelayBand::UpTo30
    } else if p < 0.25 {
        DelayBand::UpTo60
    } else if p < 0.30 {
        DelayBand::UpTo120
    } else {
        DelayBand::Over120
    }
}

pub fn classify(probability: f64) -> RiskCategory {
    classify_band(probability).category()
}

pub fn display_label(band: DelayBand) -> &'static str {
    band.label()
}

pub fn estimated_delay_minutes(probability: f64) -> u32 {
    classify_band(probability).estimated_delay_minutes()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_boundaries() {
        assert_eq!(classify(0.0), RiskCategory::OnTime);
        assert_eq!(classify(0.1499), RiskCategory::OnTime);
        assert_eq!(classify(0.15), RiskCategory::Minor);
        assert_eq!(classify(0.1999), RiskCategory::Minor);
        assert_eq!(classify(0.20), RiskCategory::Moderate);
        assert_eq!(classify(0.2499), RiskCategory::Moderate);
        assert_eq!(classify(0.25), RiskCategory::Severe);
        assert_eq!(classify(0.30), RiskCategory::Severe);
        assert_eq!(classify(0.3), RiskCategory::Severe);
    }

    #[test]
    fn test_severe_rows_keep_distinct_labels() {
        assert_eq!(display_label(classify_band(0.27)), "60-120 min delay");
        assert_eq!(display_label(classify_band(0.30)), "> 120 min delay");
        assert_eq!(display_label(classify_band(0.0)), "On Time (< 30 min)");
        assert_eq!(display_label(classify_band(0.16)), "0-30 min delay");
        assert_eq!(display_label(classify_band(0.21)), "30-60 min delay");
    }

    #[test]
    fn test_estimated_delay_minutes() {
        assert_eq!(estimated_delay_minutes(0.10), 0);
        assert_eq!(estimated_delay_minutes(0.17), 30);
        assert_eq!(estimated_delay_minutes(0.22), 60);
        assert_eq!(estimated_delay_minutes(0.26), 120);
        // Inclusive boundary resolves to the upper row.
        assert_eq!(estimated_delay_minutes(0.30), 180);
        assert_eq!(estimated_delay_minutes(0.95), 180);
    }

    #[test]
    fn test_out_of_range_and_non_finite() {
        assert_eq!(classify(f64::NAN), RiskCategory::OnTime);
        assert_eq!(classify(f64::INFINITY), RiskCategory::OnTime);
        assert_eq!(classify(-0.5), RiskCategory::OnTime);
        assert_eq!(classify_band(1.7), DelayBand::Over120);
    }

    #[test]
    fn test_severity_tiers() {
        assert_eq!(RiskCategory::OnTime.severity(), Severity::Low);
        assert_eq!(RiskCategory::Minor.severity().badge_color(), "green");
        assert_eq!(RiskCategory::Moderate.severity().badge_color(), "yellow");
        assert_eq!(DelayBand::Over120.severity().badge_color(), "red");
    }

    #[test]
    fn test_classify_is_deterministic() {
        for p in [0.0, 0.15, 0.2, 0.25, 0.3, 0.99] {
            assert_eq!(classify_band(p), classify_band(p));
            assert_eq!(classify(p), classify(p));
        }
    }

    #[test]
    fn test_serde_names() {
        assert_eq!(
            serde_json::to_string(&RiskCategory::OnTime).unwrap(),
            "\"ON_TIME\""
        );
        assert_eq!(serde_json::to_string(&DelayBand::UpTo60).unwrap(), "\"up_to_60\"");
    }
}
