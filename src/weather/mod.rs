//! Hourly temperature forecasts from Open-Meteo.
//!
//! The API is asked for `temperature_2m` in the location's own timezone, so
//! the returned timestamps are local wall-clock times without an offset.

use crate::core::HourlyReading;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// Public Open-Meteo forecast endpoint.
pub const DEFAULT_BASE_URL: &str = "https://api.open-meteo.com/v1/forecast";

const HOURLY_FIELD: &str = "temperature_2m";

/// Capability to fetch the hourly forecast for a fixed location.
pub trait WeatherSource {
    fn hourly_temperatures(&self) -> Result<Vec<HourlyReading>, WeatherError>;
}

/// Errors that can occur while fetching or decoding a forecast
#[derive(Debug, Error)]
pub enum WeatherError {
    #[error("Weather request failed: {0}")]
    Fetch(#[from] reqwest::Error),

    #[error("Weather service returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Unexpected weather data: {0}")]
    DataFormat(String),
}

impl WeatherError {
    /// True when the service answered but the payload could not be used.
    pub fn is_data_format(&self) -> bool {
        matches!(self, Self::DataFormat(_))
    }
}

/// Forecast location.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
    /// IANA timezone identifier, e.g. `Europe/Zurich`.
    pub timezone: String,
}

impl Default for Location {
    fn default() -> Self {
        Self {
            latitude: 47.3769,
            longitude: 8.5417,
            timezone: "Europe/Zurich".to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct ForecastResponse {
    hourly: HourlySeries,
}

#[derive(Debug, Deserialize)]
struct HourlySeries {
    time: Vec<String>,
    temperature_2m: Vec<Option<f64>>,
}

/// Decode an Open-Meteo response body into readings.
///
/// Missing `hourly` fields, arrays of different lengths and unparseable
/// timestamps are rejected. Hours with a `null` temperature are dropped,
/// the same as hours absent from the series.
pub fn parse_forecast(body: &str) -> Result<Vec<HourlyReading>, WeatherError> {
    let response: ForecastResponse =
        serde_json::from_str(body).map_err(|e| WeatherError::DataFormat(e.to_string()))?;
    let HourlySeries {
        time,
        temperature_2m,
    } = response.hourly;

    if time.len() != temperature_2m.len() {
        return Err(WeatherError::DataFormat(format!(
            "{} timestamps but {} temperatures",
            time.len(),
            temperature_2m.len()
        )));
    }

    let mut readings = Vec::with_capacity(time.len());
    for (raw, temperature) in time.iter().zip(temperature_2m) {
        let stamp = parse_timestamp(raw)?;
        if let Some(temperature_c) = temperature {
            readings.push(HourlyReading::new(stamp, temperature_c));
        }
    }
    Ok(readings)
}

/// Parse `YYYY-MM-DDTHH:MM`, tolerating a seconds component.
pub fn parse_timestamp(raw: &str) -> Result<NaiveDateTime, WeatherError> {
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M")
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S"))
        .map_err(|e| WeatherError::DataFormat(format!("bad timestamp '{raw}': {e}")))
}

/// Blocking Open-Meteo client for one location.
#[derive(Clone, Debug)]
pub struct OpenMeteoClient {
    http: reqwest::blocking::Client,
    base_url: String,
    location: Location,
}

impl OpenMeteoClient {
    pub fn new(
        base_url: impl Into<String>,
        location: Location,
        timeout: Duration,
    ) -> Result<Self, WeatherError> {
        let http = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            http,
            base_url: base_url.into(),
            location,
        })
    }

    pub fn location(&self) -> &Location {
        &self.location
    }

    pub fn fetch(&self) -> Result<Vec<HourlyReading>, WeatherError> {
        let response = self
            .http
            .get(&self.base_url)
            .query(&[
                ("latitude", self.location.latitude.to_string()),
                ("longitude", self.location.longitude.to_string()),
                ("hourly", HOURLY_FIELD.to_string()),
                ("timezone", self.location.timezone.clone()),
            ])
            .send()?;

        let status = response.status();
        let body = response.text()?;
        if !status.is_success() {
            return Err(WeatherError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let readings = parse_forecast(&body)?;
        tracing::debug!(
            readings = readings.len(),
            timezone = %self.location.timezone,
            "Fetched hourly forecast"
        );
        Ok(readings)
    }
}

impl WeatherSource for OpenMeteoClient {
    fn hourly_temperatures(&self) -> Result<Vec<HourlyReading>, WeatherError> {
        self.fetch()
    }
}


#[cfg(test)]
mod http_tests {
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn fetch_blocking(
        base_url: String,
    ) -> tokio::task::JoinHandle<Result<Vec<HourlyReading>, WeatherError>> {
        tokio::task::spawn_blocking(move || {
            OpenMeteoClient::new(base_url, Location::default(), Duration::from_secs(5))
                .and_then(|client| client.fetch())
        })
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn fetch_sends_location_query() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v1/forecast"))
            .and(query_param("latitude", "47.3769"))
            .and(query_param("longitude", "8.5417"))
            .and(query_param("hourly", "temperature_2m"))
            .and(query_param("timezone", "Europe/Zurich"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "hourly": {
                    "time": ["2025-05-10T10:00", "2025-05-10T11:00", "2025-05-10T12:00"],
                    "temperature_2m": [10.0, 12.0, 16.0]
                }
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let readings = fetch_blocking(format!("{}/v1/forecast", mock_server.uri()))
            .await
            .unwrap()
            .unwrap();

        assert_eq!(readings.len(), 3);
        assert_eq!(readings[2].temperature_c, 16.0);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn fetch_reports_http_errors() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503).set_body_string("busy"))
            .mount(&mock_server)
            .await;

        let err = fetch_blocking(format!("{}/v1/forecast", mock_server.uri()))
            .await
            .unwrap()
            .unwrap_err();

        match err {
            WeatherError::Status { status, body } => {
                assert_eq!(status, 503);
                assert_eq!(body, "busy");
            }
            other => panic!("Expected status error, got {other:?}"),
        }
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn fetch_reports_malformed_payload() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({"daily": {}})),
            )
            .mount(&mock_server)
            .await;

        let err = fetch_blocking(format!("{}/v1/forecast", mock_server.uri()))
            .await
            .unwrap()
            .unwrap_err();

        assert!(err.is_data_format());
    }
}
