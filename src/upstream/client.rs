use super::query::PredictionQuery;
use crate::cache::{CacheKey, CacheManager};
use crate::governor::{RequestGovernor, TaskError};
use crate::risk::{DelayPrediction, Segment};
use crate::{Error, ErrorContext, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::convert::Infallible;
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

// Relative to the base URL so a path prefix on it is kept.
const PREDICTION_PATH: &str = "v1/travel/predictions/flight-delay";
const LOCATIONS_PATH: &str = "v1/reference-data/locations";
const UNSEEN_FLIGHT_DETAIL: &str = "Data not seen at training time";
const UNSEEN_FLIGHT_REASON: &str = "No historical data available for this flight.";

/// Airport reference data never changes within a session.
const AIRPORT_TTL: Duration = Duration::from_secs(24 * 60 * 60);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UpstreamConfig {
    /// Flight API root. May carry a path prefix, e.g. `http://proxy/amadeus`.
    pub base_url: String,
    /// Current-weather API root.
    pub weather_base_url: String,
    pub timeout_secs: u64,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            base_url: "https://test.api.amadeus.com".to_string(),
            weather_base_url: "https://api.openweathermap.org/data/2.5".to_string(),
            timeout_secs: 30,
        }
    }
}

impl UpstreamConfig {
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_weather_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.weather_base_url = base_url.into();
        self
    }
}

/// Parse an API root so that relative joins append to it instead of
/// replacing its last path segment.
pub(crate) fn api_root(raw: &str, field: &str) -> Result<Url> {
    let mut url = Url::parse(raw).map_err(|e| {
        Error::configuration_with_context(
            format!("invalid base URL '{}'", raw),
            ErrorContext::new()
                .with_field_path(field)
                .with_details(e.to_string())
                .with_source("upstream"),
        )
    })?;
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

pub(crate) fn http_client(config: &UpstreamConfig) -> Result<reqwest::Client> {
    Ok(reqwest::Client::builder()
        .timeout(Duration::from_secs(config.timeout_secs))
        .build()?)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AirportLocation {
    pub iata_code: String,
    pub name: String,
    pub city: String,
    pub lat: f64,
    pub lon: f64,
}

/// Thin client for the delay-prediction and airport-lookup endpoints.
///
/// Holds the bearer token it is given; acquiring or refreshing tokens is the
/// caller's concern.
#[derive(Clone)]
pub struct PredictionClient {
    http: reqwest::Client,
    base_url: Url,
    token: String,
}

impl PredictionClient {
    pub fn new(config: &UpstreamConfig, token: impl Into<String>) -> Result<Self> {
        Ok(Self {
            http: http_client(config)?,
            base_url: api_root(&config.base_url, "upstream.base_url")?,
            token: token.into(),
        })
    }

    /// Fetch the delay prediction for one leg. Never fails: upstream and
    /// transport errors come back as [`DelayPrediction::Unavailable`].
    pub async fn predict(&self, query: &PredictionQuery) -> DelayPrediction {
        match self.try_predict(query).await {
            Ok(prediction) => prediction,
            Err(e) => {
                warn!(
                    carrier = %query.carrier_code,
                    flight = %query.flight_number,
                    error = %e,
                    "delay prediction failed"
                );
                DelayPrediction::unavailable(e.to_string())
            }
        }
    }

    /// Like [`predict`](Self::predict) but surfaces errors.
    pub async fn try_predict(&self, query: &PredictionQuery) -> Result<DelayPrediction> {
        let url = self.base_url.join(PREDICTION_PATH)?;
        debug!(
            origin = %query.origin,
            destination = %query.destination,
            flight = %query.flight_number,
            "requesting delay prediction"
        );

        let resp = self
            .http
            .get(url)
            .bearer_auth(&self.token)
            .header("accept", "application/json")
            .query(&query.to_params())
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body: Value = resp.json().await.unwrap_or(Value::Null);
            let detail = first_error_detail(&body);
            if detail
                .as_deref()
                .map(|d| d.contains(UNSEEN_FLIGHT_DETAIL))
                .unwrap_or(false)
            {
                return Ok(DelayPrediction::unavailable(UNSEEN_FLIGHT_REASON));
            }
            return Err(Error::Remote {
                status: status.as_u16(),
                message: format!("API Error: {}", detail.unwrap_or_else(|| "Unknown error".into())),
            });
        }

        let body: Value = resp.json().await?;
        Ok(DelayPrediction::from_payload(Some(&body)))
    }

    /// Run one prediction through the governor so it obeys the configured rate.
    pub async fn predict_governed(
        &self,
        governor: &RequestGovernor,
        query: PredictionQuery,
    ) -> DelayPrediction {
        let client = self.clone();
        let handle = governor.submit(move || async move {
            Ok::<_, Infallible>(client.predict(&query).await)
        });
        settle(handle.await)
    }

    /// Predict every leg of an itinerary. All lookups are queued up front, so
    /// they run back to back at the governed rate and come back in leg order.
    pub async fn predict_itinerary(
        &self,
        governor: &RequestGovernor,
        segments: &[Segment],
    ) -> Vec<DelayPrediction> {
        let handles: Vec<_> = segments
            .iter()
            .map(|segment| {
                let client = self.clone();
                let query = PredictionQuery::from_segment(segment);
                governor.submit(move || async move {
                    Ok::<_, Infallible>(client.predict(&query).await)
                })
            })
            .collect();

        let mut predictions = Vec::with_capacity(handles.len());
        for handle in handles {
            predictions.push(settle(handle.await));
        }
        predictions
    }

    /// Look up an airport's coordinates, consulting the caller's cache first.
    ///
    /// Returns `Ok(None)` when the upstream knows no airport with that code.
    pub async fn airport_location(
        &self,
        iata_code: &str,
        cache: &CacheManager,
    ) -> Result<Option<AirportLocation>> {
        let iata_code = iata_code.trim().to_ascii_uppercase();
        let key = CacheKey::airport(&iata_code);
        if let Some(hit) = cache.get::<AirportLocation>(&key).await? {
            return Ok(Some(hit));
        }

        let url = self.base_url.join(LOCATIONS_PATH)?;
        let resp = self
            .http
            .get(url)
            .bearer_auth(&self.token)
            .query(&[("subType", "AIRPORT"), ("keyword", iata_code.as_str())])
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body: Value = resp.json().await.unwrap_or(Value::Null);
            return Err(Error::Remote {
                status: status.as_u16(),
                message: first_error_detail(&body).unwrap_or_else(|| status.to_string()),
            });
        }

        let body: Value = resp.json().await?;
        let location = body
            .get("data")
            .and_then(Value::as_array)
            .and_then(|items| {
                items
                    .iter()
                    .find(|item| item.get("iataCode").and_then(Value::as_str) == Some(iata_code.as_str()))
            })
            .and_then(|item| parse_location(&iata_code, item));

        match location {
            Some(location) => {
                cache.set_with_ttl(&key, &location, AIRPORT_TTL).await?;
                Ok(Some(location))
            }
            None => {
                debug!(iata = %iata_code, "airport not found");
                Ok(None)
            }
        }
    }
}

impl std::fmt::Debug for PredictionClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PredictionClient")
            .field("base_url", &self.base_url.as_str())
            .finish()
    }
}

fn settle(outcome: std::result::Result<DelayPrediction, TaskError<Infallible>>) -> DelayPrediction {
    match outcome {
        Ok(prediction) => prediction,
        Err(e) => DelayPrediction::unavailable(e.to_string()),
    }
}

pub(crate) fn first_error_detail(body: &Value) -> Option<String> {
    body.get("errors")
        .and_then(Value::as_array)
        .and_then(|errors| errors.first())
        .and_then(|e| e.get("detail").or_else(|| e.get("title")))
        .and_then(Value::as_str)
        .map(str::to_string)
}

fn parse_location(iata_code: &str, item: &Value) -> Option<AirportLocation> {
    let geo = item.get("geoCode")?;
    Some(AirportLocation {
        iata_code: iata_code.to_string(),
        name: item
            .get("name")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string(),
        city: item
            .pointer("/address/cityName")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string(),
        lat: geo.get("latitude")?.as_f64()?,
        lon: geo.get("longitude")?.as_f64()?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_first_error_detail() {
        let body = json!({"errors": [{"status": 400, "detail": "Data not seen at training time"}]});
        assert_eq!(
            first_error_detail(&body).as_deref(),
            Some("Data not seen at training time")
        );
        assert_eq!(first_error_detail(&json!({})), None);
    }

    #[test]
    fn test_parse_location() {
        let item = json!({
            "iataCode": "DEL",
            "name": "INDIRA GANDHI INTL",
            "address": {"cityName": "DELHI"},
            "geoCode": {"latitude": 28.5665, "longitude": 77.10309}
        });
        let loc = parse_location("DEL", &item).unwrap();
        assert_eq!(loc.city, "DELHI");
        assert_eq!(loc.lat, 28.5665);
        assert!(parse_location("DEL", &json!({"iataCode": "DEL"})).is_none());
    }

    #[test]
    fn test_invalid_base_url() {
        let cfg = UpstreamConfig::default().with_base_url("not a url");
        let err = PredictionClient::new(&cfg, "token").unwrap_err();
        assert!(matches!(err, Error::Configuration { .. }));
    }

    #[test]
    fn test_api_root_keeps_path_prefix() {
        let root = api_root("http://proxy.local/amadeus", "upstream.base_url").unwrap();
        assert_eq!(
            root.join(PREDICTION_PATH).unwrap().as_str(),
            "http://proxy.local/amadeus/v1/travel/predictions/flight-delay"
        );

        let root = api_root("https://test.api.amadeus.com", "upstream.base_url").unwrap();
        assert_eq!(
            root.join(LOCATIONS_PATH).unwrap().as_str(),
            "https://test.api.amadeus.com/v1/reference-data/locations"
        );

        let root = api_root("http://proxy.local/amadeus/", "upstream.base_url").unwrap();
        assert_eq!(root.as_str(), "http://proxy.local/amadeus/");
    }

    #[test]
    fn test_settle_maps_task_errors() {
        let p = settle(Err(TaskError::Abandoned));
        assert!(!p.is_available());
        assert_eq!(p.to_string(), "task abandoned before it could run");
    }
}
