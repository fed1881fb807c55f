//! Assess the connections of one itinerary.
//!
//! Usage: `assess-itinerary <itinerary.json> [config.yaml]`
//!
//! The itinerary file holds `{"segments": [...], "predictions": [...]}` with
//! segments in flight-offer shape and predictions as raw upstream payloads.
//! When `predictions` is absent and `FLIGHTWATCH_TOKEN` is set, predictions are
//! fetched through a rate-governed client instead.

use anyhow::{bail, Context};
use flightwatch::governor::RequestGovernor;
use flightwatch::risk::{assess_connections, is_connection_at_risk, DelayPrediction, Segment};
use flightwatch::upstream::PredictionClient;
use flightwatch::FlightwatchConfig;
use serde_json::Value;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let mut args = std::env::args().skip(1);
    let Some(itinerary_path) = args.next() else {
        bail!("usage: assess-itinerary <itinerary.json> [config.yaml]");
    };
    let mut config = match args.next() {
        Some(path) => FlightwatchConfig::from_file(&path)
            .with_context(|| format!("loading config {}", path))?,
        None => FlightwatchConfig::default(),
    };
    config.apply_env_overrides()?;

    let raw = std::fs::read_to_string(&itinerary_path)
        .with_context(|| format!("reading {}", itinerary_path))?;
    let doc: Value = serde_json::from_str(&raw)?;

    let segments = doc
        .get("segments")
        .and_then(Value::as_array)
        .context("itinerary has no 'segments' array")?
        .iter()
        .map(Segment::from_offer_json)
        .collect::<flightwatch::Result<Vec<_>>>()?;

    let predictions = match doc.get("predictions").and_then(Value::as_array) {
        Some(payloads) => payloads
            .iter()
            .map(|p| DelayPrediction::from_payload(Some(p)))
            .collect(),
        None => match std::env::var("FLIGHTWATCH_TOKEN") {
            Ok(token) => {
                let governor = RequestGovernor::new(config.governor.clone())?;
                let client = PredictionClient::new(&config.upstream, token)?;
                let predictions = client.predict_itinerary(&governor, &segments).await;
                governor.shutdown().await;
                predictions
            }
            Err(_) => Vec::new(),
        },
    };

    for (i, segment) in segments.iter().enumerate() {
        let badge = predictions
            .get(i)
            .map(|p| p.to_string())
            .unwrap_or_else(|| "Prediction Unavailable".to_string());
        println!(
            "{} {} -> {}  {}",
            segment.flight_designator(),
            segment.departure_airport,
            segment.arrival_airport,
            badge
        );
    }

    for connection in assess_connections(&segments, &predictions) {
        println!(
            "  {} layover in {} (expected delay {} min){}",
            connection.layover_display(),
            connection.connection_airport,
            connection.predicted_delay_minutes,
            if connection.at_risk { "  AT RISK" } else { "" }
        );
    }

    if is_connection_at_risk(&segments, &predictions) {
        println!("Not Recommended");
    }
    Ok(())
}
