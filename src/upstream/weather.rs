//! Current weather at an airport, cached per coordinate pair.

use super::client::{api_root, first_error_detail, http_client, AirportLocation, PredictionClient, UpstreamConfig};
use crate::cache::{CacheKey, CacheManager, WEATHER_TTL};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;
use url::Url;

const WEATHER_PATH: &str = "weather";

/// Weather summary shown next to a destination airport.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AirportWeather {
    pub location: String,
    pub city: String,
    /// Degrees Celsius, rounded.
    pub temperature: i64,
    pub feels_like: i64,
    pub description: String,
    pub icon: String,
    /// Percent.
    pub humidity: f64,
    /// Metres per second.
    pub wind_speed: f64,
    /// hPa.
    pub pressure: f64,
    pub visibility_km: f64,
    /// Unix seconds of the observation, sunrise and sunset.
    pub observed_at: i64,
    pub sunrise: i64,
    pub sunset: i64,
}

#[derive(Deserialize)]
struct Observation {
    main: Readings,
    #[serde(default)]
    weather: Vec<Condition>,
    #[serde(default)]
    wind: Wind,
    #[serde(default)]
    visibility: f64,
    #[serde(default)]
    dt: i64,
    #[serde(default)]
    sys: Sun,
}

#[derive(Deserialize)]
struct Readings {
    temp: f64,
    feels_like: f64,
    #[serde(default)]
    humidity: f64,
    #[serde(default)]
    pressure: f64,
}

#[derive(Deserialize)]
struct Condition {
    description: String,
    icon: String,
}

#[derive(Deserialize, Default)]
struct Wind {
    #[serde(default)]
    speed: f64,
}

#[derive(Deserialize, Default)]
struct Sun {
    #[serde(default)]
    sunrise: i64,
    #[serde(default)]
    sunset: i64,
}

impl AirportWeather {
    fn from_observation(airport: &AirportLocation, obs: Observation) -> Self {
        let (description, icon) = obs
            .weather
            .into_iter()
            .next()
            .map(|c| (c.description, c.icon))
            .unwrap_or_default();
        let location = if airport.name.is_empty() {
            format!("{} Airport", airport.iata_code)
        } else {
            airport.name.clone()
        };
        Self {
            location,
            city: airport.city.clone(),
            temperature: obs.main.temp.round() as i64,
            feels_like: obs.main.feels_like.round() as i64,
            description,
            icon,
            humidity: obs.main.humidity,
            wind_speed: obs.wind.speed,
            pressure: obs.main.pressure,
            visibility_km: obs.visibility / 1000.0,
            observed_at: obs.dt,
            sunrise: obs.sys.sunrise,
            sunset: obs.sys.sunset,
        }
    }
}

/// Client for the current-weather endpoint, authenticated by an API key.
#[derive(Clone)]
pub struct WeatherClient {
    http: reqwest::Client,
    base_url: Url,
    api_key: String,
}

impl WeatherClient {
    pub fn new(config: &UpstreamConfig, api_key: impl Into<String>) -> Result<Self> {
        Ok(Self {
            http: http_client(config)?,
            base_url: api_root(&config.weather_base_url, "upstream.weather_base_url")?,
            api_key: api_key.into(),
        })
    }

    /// Current weather at an airport's coordinates. Observations are reused
    /// for [`WEATHER_TTL`].
    pub async fn weather_at(
        &self,
        airport: &AirportLocation,
        cache: &CacheManager,
    ) -> Result<AirportWeather> {
        let key = CacheKey::coordinates(airport.lat, airport.lon);
        if let Some(hit) = cache.get::<AirportWeather>(&key).await? {
            return Ok(hit);
        }

        let url = self.base_url.join(WEATHER_PATH)?;
        let (lat, lon) = (airport.lat.to_string(), airport.lon.to_string());
        debug!(iata = %airport.iata_code, %lat, %lon, "requesting current weather");
        let resp = self
            .http
            .get(url)
            .query(&[
                ("lat", lat.as_str()),
                ("lon", lon.as_str()),
                ("units", "metric"),
                ("appid", self.api_key.as_str()),
            ])
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body: Value = resp.json().await.unwrap_or(Value::Null);
            let detail = body
                .get("message")
                .and_then(Value::as_str)
                .map(str::to_string)
                .or_else(|| first_error_detail(&body));
            return Err(Error::Remote {
                status: status.as_u16(),
                message: format!(
                    "Weather API error: {}",
                    detail.unwrap_or_else(|| status.to_string())
                ),
            });
        }

        let observation: Observation = resp.json().await?;
        let weather = AirportWeather::from_observation(airport, observation);
        cache.set_with_ttl(&key, &weather, WEATHER_TTL).await?;
        Ok(weather)
    }

    /// Resolve the airport through `airports`, then fetch its weather.
    ///
    /// Returns `Ok(None)` when the airport is unknown.
    pub async fn airport_weather(
        &self,
        airports: &PredictionClient,
        iata_code: &str,
        cache: &CacheManager,
    ) -> Result<Option<AirportWeather>> {
        match airports.airport_location(iata_code, cache).await? {
            Some(airport) => self.weather_at(&airport, cache).await.map(Some),
            None => Ok(None),
        }
    }
}

impl std::fmt::Debug for WeatherClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WeatherClient")
            .field("base_url", &self.base_url.as_str())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn delhi() -> AirportLocation {
        AirportLocation {
            iata_code: "DEL".into(),
            name: String::new(),
            city: "DELHI".into(),
            lat: 28.5665,
            lon: 77.10309,
        }
    }

    #[test]
    fn test_from_observation() {
        let obs: Observation = serde_json::from_value(json!({
            "main": {"temp": 31.6, "feels_like": 35.2, "humidity": 48, "pressure": 1004},
            "weather": [{"description": "haze", "icon": "50d"}],
            "wind": {"speed": 3.1},
            "visibility": 3500,
            "dt": 1_740_800_000,
            "sys": {"sunrise": 1_740_790_000, "sunset": 1_740_832_000}
        }))
        .unwrap();

        let weather = AirportWeather::from_observation(&delhi(), obs);
        assert_eq!(weather.location, "DEL Airport");
        assert_eq!(weather.temperature, 32);
        assert_eq!(weather.feels_like, 35);
        assert_eq!(weather.description, "haze");
        assert_eq!(weather.visibility_km, 3.5);
        assert_eq!(weather.humidity, 48.0);
    }

    #[test]
    fn test_sparse_observation() {
        let obs: Observation =
            serde_json::from_value(json!({"main": {"temp": -0.4, "feels_like": -3.6}})).unwrap();
        let weather = AirportWeather::from_observation(&delhi(), obs);
        assert_eq!(weather.temperature, 0);
        assert_eq!(weather.feels_like, -4);
        assert!(weather.description.is_empty());
    }

    #[test]
    fn test_invalid_weather_base_url() {
        let cfg = UpstreamConfig::default().with_weather_base_url("::nope");
        let err = WeatherClient::new(&cfg, "key").unwrap_err();
        assert_eq!(
            err.context().and_then(|c| c.field_path.as_deref()),
            Some("upstream.weather_base_url")
        );
    }
}
