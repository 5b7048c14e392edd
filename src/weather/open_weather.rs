//! OpenWeatherMap client for the 5-day / 3-hour forecast endpoint

use std::time::Instant;

use async_trait::async_trait;
use chrono::NaiveDateTime;
use reqwest::Client;
use tracing::{debug, info, instrument, warn};

use super::WeatherProvider;
use crate::config::WeatherConfig;
use crate::models::WeatherEntry;
use crate::{Result, SidekickError};

/// Weather API client for OpenWeatherMap
#[derive(Clone)]
pub struct OpenWeatherClient {
    /// HTTP client
    client: Client,
    api_key: String,
    base_url: String,
}

impl OpenWeatherClient {
    /// Create a new weather API client
    pub fn new(config: &WeatherConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout())
            .user_agent(concat!("sidekick-forecast/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| SidekickError::config(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            api_key: config.api_key.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl WeatherProvider for OpenWeatherClient {
    #[instrument(name = "fetch_weather", skip(self))]
    async fn fetch(&self, location: &str) -> Result<Vec<WeatherEntry>> {
        let start_time = Instant::now();
        let url = format!("{}/forecast", self.base_url);
        debug!("Requesting forecast from {}", url);

        let fail = |message: String| SidekickError::weather_fetch(location, message);

        // The credential travels in the query string; keep URLs out of error text.
        let response = self
            .client
            .get(&url)
            .query(&[
                ("q", location),
                ("appid", self.api_key.as_str()),
                ("units", "metric"),
            ])
            .send()
            .await
            .map_err(|e| fail(format!("request failed: {}", e.without_url())))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(fail(format!("provider returned status {status}: {body}")));
        }

        let payload: api::ForecastResponse = response
            .json()
            .await
            .map_err(|e| fail(format!("malformed payload: {}", e.without_url())))?;

        if payload.list.is_empty() {
            return Err(fail("provider returned no forecast entries".to_string()));
        }

        let entries = payload
            .list
            .into_iter()
            .map(WeatherEntry::try_from)
            .collect::<std::result::Result<Vec<_>, String>>()
            .map_err(|e| fail(format!("malformed payload: {e}")))?;

        let elapsed = start_time.elapsed();
        info!(
            "Retrieved {} forecast entries in {:.3}s",
            entries.len(),
            elapsed.as_secs_f64()
        );
        if elapsed.as_secs() > 5 {
            warn!("Slow weather API response detected: {:.3}s", elapsed.as_secs_f64());
        }

        Ok(entries)
    }
}

/// OpenWeatherMap response structures
mod api {
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    pub struct ForecastResponse {
        #[serde(default)]
        pub list: Vec<ForecastItem>,
    }

    #[derive(Debug, Deserialize)]
    pub struct ForecastItem {
        pub dt_txt: String,
        pub main: MainData,
        #[serde(default)]
        pub weather: Vec<Condition>,
    }

    #[derive(Debug, Deserialize)]
    pub struct MainData {
        pub temp: f64,
    }

    #[derive(Debug, Deserialize)]
    pub struct Condition {
        pub description: String,
    }
}

impl TryFrom<api::ForecastItem> for WeatherEntry {
    type Error = String;

    fn try_from(item: api::ForecastItem) -> std::result::Result<Self, Self::Error> {
        let timestamp = NaiveDateTime::parse_from_str(&item.dt_txt, "%Y-%m-%d %H:%M:%S")
            .map_err(|e| format!("invalid timestamp '{}': {e}", item.dt_txt))?;
        let description = item
            .weather
            .into_iter()
            .next()
            .map(|condition| condition.description)
            .ok_or_else(|| format!("entry at {} has no weather condition", item.dt_txt))?;

        Ok(WeatherEntry::new(timestamp, item.main.temp, description))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use serde_json::json;

    fn client_for(server: &MockServer) -> OpenWeatherClient {
        let config = WeatherConfig {
            api_key: "ow-test-key".to_string(),
            base_url: server.base_url(),
            timeout_seconds: 5,
        };
        OpenWeatherClient::new(&config).unwrap()
    }

    fn item(dt_txt: &str, temp: f64, description: &str) -> serde_json::Value {
        json!({
            "dt": 1_714_564_800,
            "main": { "temp": temp, "feels_like": temp - 1.0, "humidity": 60 },
            "weather": [{ "id": 800, "main": "Clear", "description": description, "icon": "01d" }],
            "wind": { "speed": 3.1 },
            "dt_txt": dt_txt
        })
    }

    #[tokio::test]
    async fn test_fetch_maps_entries_in_order() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/forecast")
                    .query_param("q", "Berlin")
                    .query_param("appid", "ow-test-key")
                    .query_param("units", "metric");
                then.status(200).json_body(json!({
                    "cod": "200",
                    "cnt": 2,
                    "list": [
                        item("2024-05-01 12:00:00", 18.4, "clear sky"),
                        item("2024-05-01 15:00:00", 19.6, "few clouds")
                    ],
                    "city": { "name": "Berlin" }
                }));
            })
            .await;

        let entries = client_for(&server).fetch("Berlin").await.unwrap();

        mock.assert_async().await;
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].date_key(), "2024-05-01");
        assert_eq!(entries[0].temperature, 18.4);
        assert_eq!(entries[1].description, "few clouds");
    }

    #[tokio::test]
    async fn test_fetch_non_success_status() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/forecast");
                then.status(404)
                    .json_body(json!({ "cod": "404", "message": "city not found" }));
            })
            .await;

        let err = client_for(&server).fetch("Atlantis").await.unwrap_err();
        match err {
            SidekickError::WeatherFetch { location, message } => {
                assert_eq!(location, "Atlantis");
                assert!(message.contains("404"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_fetch_empty_list_is_error() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/forecast");
                then.status(200).json_body(json!({ "cod": "200", "cnt": 0, "list": [] }));
            })
            .await;

        let err = client_for(&server).fetch("Nowhere").await.unwrap_err();
        assert!(matches!(err, SidekickError::WeatherFetch { .. }));
        assert!(err.to_string().contains("no forecast entries"));
    }

    #[tokio::test]
    async fn test_fetch_malformed_payload() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/forecast");
                then.status(200).json_body(json!({
                    "list": [{ "dt_txt": "2024-05-01 12:00:00", "main": { "temp": 12.0 }, "weather": [] }]
                }));
            })
            .await;

        let err = client_for(&server).fetch("Oslo").await.unwrap_err();
        assert!(err.to_string().contains("no weather condition"));

        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/forecast");
                then.status(200).body("not json");
            })
            .await;

        let err = client_for(&server).fetch("Oslo").await.unwrap_err();
        assert!(err.to_string().contains("malformed payload"));
        assert!(!err.to_string().contains("ow-test-key"));
    }
}
