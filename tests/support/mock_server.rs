//! Mock upstream server for integration tests

use flightwatch::upstream::{PredictionClient, UpstreamConfig, WeatherClient};
use mockito::{Matcher, Mock, Server, ServerGuard};

pub const PREDICTION_PATH: &str = "/v1/travel/predictions/flight-delay";
pub const LOCATIONS_PATH: &str = "/v1/reference-data/locations";
pub const WEATHER_PATH: &str = "/weather";

/// Test fixture that owns a mock server
pub struct MockServerFixture {
    pub server: ServerGuard,
    pub base_url: String,
}

impl MockServerFixture {
    pub async fn new() -> Self {
        let server = Server::new_async().await;
        let base_url = server.url();
        Self { server, base_url }
    }

    /// Client pointed at the mock server
    pub fn client(&self) -> PredictionClient {
        let config = UpstreamConfig::default().with_base_url(&self.base_url);
        PredictionClient::new(&config, "test-token").expect("client should build")
    }

    /// Weather client pointed at the mock server
    pub fn weather_client(&self) -> WeatherClient {
        let config = UpstreamConfig::default().with_weather_base_url(&self.base_url);
        WeatherClient::new(&config, "test-key").expect("weather client should build")
    }

    /// Weather endpoint answering once for the given coordinates
    pub async fn mock_weather(&mut self, lat: &str, lon: &str, body: &str) -> Mock {
        self.server
            .mock("GET", WEATHER_PATH)
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("lat".into(), lat.into()),
                Matcher::UrlEncoded("lon".into(), lon.into()),
                Matcher::UrlEncoded("units".into(), "metric".into()),
                Matcher::UrlEncoded("appid".into(), "test-key".into()),
            ]))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(body)
            .expect(1)
            .create_async()
            .await
    }

    /// Prediction endpoint answering `status` with a JSON body
    pub async fn mock_prediction(&mut self, status: usize, body: &str) -> Mock {
        self.server
            .mock("GET", PREDICTION_PATH)
            .match_query(Matcher::Any)
            .match_header("authorization", "Bearer test-token")
            .with_status(status)
            .with_header("content-type", "application/json")
            .with_body(body)
            .create_async()
            .await
    }

    /// Prediction endpoint answering only for one flight number
    pub async fn mock_prediction_for(&mut self, flight_number: &str, body: &str) -> Mock {
        self.server
            .mock("GET", PREDICTION_PATH)
            .match_query(Matcher::UrlEncoded(
                "flightNumber".into(),
                flight_number.into(),
            ))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(body)
            .create_async()
            .await
    }

    /// Airport lookup answering once for `keyword`
    pub async fn mock_airport(&mut self, keyword: &str, body: &str) -> Mock {
        self.server
            .mock("GET", LOCATIONS_PATH)
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("subType".into(), "AIRPORT".into()),
                Matcher::UrlEncoded("keyword".into(), keyword.into()),
            ]))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(body)
            .expect(1)
            .create_async()
            .await
    }
}
