use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use crate::{
    model::{WeatherRequest, WeatherSnapshot},
    provider::FetchError,
};

use super::WeatherProvider;

/// WeatherAPI.com `current.json` client.
#[derive(Debug, Clone)]
pub struct WeatherApiProvider {
    api_key: String,
    base_url: String,
    http: Client,
}

impl WeatherApiProvider {
    pub fn with_base_url(api_key: String, base_url: String) -> Self {
        Self { api_key, base_url, http: Client::new() }
    }

    fn current_url(&self) -> String {
        format!("{}/current.json", self.base_url.trim_end_matches('/'))
    }

    async fn fetch_current(&self, request: &WeatherRequest) -> Result<WeatherSnapshot, FetchError> {
        debug!(query = %request.query, "requesting current conditions");

        // aqi is requested for parity with the web widget, nothing reads it.
        let res = self
            .http
            .get(self.current_url())
            .query(&[
                ("key", self.api_key.as_str()),
                ("q", request.query.as_str()),
                ("aqi", "yes"),
            ])
            .send()
            .await
            .map_err(FetchError::Request)?;

        let status = res.status();
        let body = res.text().await.map_err(FetchError::Body)?;

        if !status.is_success() {
            return Err(FetchError::Status { status, body: truncate_body(&body) });
        }

        parse_current(&body)
    }
}

#[derive(Debug, Deserialize)]
struct WaLocation {
    name: String,
    country: String,
}

#[derive(Debug, Deserialize)]
struct WaCondition {
    text: String,
    icon: String,
}

#[derive(Debug, Deserialize)]
struct WaCurrent {
    last_updated: String,
    temp_c: f64,
    feelslike_c: f64,
    wind_kph: f64,
    wind_dir: String,
    humidity: f64,
    cloud: f64,
    condition: WaCondition,
}

#[derive(Debug, Deserialize)]
struct WaResponse {
    location: WaLocation,
    current: WaCurrent,
}

impl From<WaResponse> for WeatherSnapshot {
    fn from(res: WaResponse) -> Self {
        let WaResponse { location, current } = res;
        Self {
            city: location.name,
            country: location.country,
            last_updated: current.last_updated,
            temp_c: current.temp_c,
            feels_like_c: current.feelslike_c,
            wind_kph: current.wind_kph,
            wind_direction: current.wind_dir,
            humidity_pct: current.humidity,
            cloud_pct: current.cloud,
            condition: current.condition.text,
            icon: current.condition.icon,
        }
    }
}

/// Parse a `current.json` body. Missing fields are an error, never defaulted.
pub fn parse_current(body: &str) -> Result<WeatherSnapshot, FetchError> {
    let parsed: WaResponse = serde_json::from_str(body)?;
    Ok(parsed.into())
}

#[async_trait]
impl WeatherProvider for WeatherApiProvider {
    async fn get_weather(&self, request: &WeatherRequest) -> Result<WeatherSnapshot, FetchError> {
        self.fetch_current(request).await
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}
