use serde::{Deserialize, Serialize};

/// A single current-conditions lookup. `query` is already trimmed and non-empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeatherRequest {
    pub query: String,
}

impl WeatherRequest {
    /// Trim the raw input; blank input yields no request.
    pub fn from_input(raw: &str) -> Option<Self> {
        let query = raw.trim();
        if query.is_empty() { None } else { Some(Self { query: query.to_string() }) }
    }
}

/// Flat projection of one provider response. Values are copied as-is,
/// with no unit conversion and no defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherSnapshot {
    pub city: String,
    pub country: String,
    /// Provider timestamp text, not parsed.
    pub last_updated: String,
    pub temp_c: f64,
    pub feels_like_c: f64,
    pub wind_kph: f64,
    pub wind_direction: String,
    pub humidity_pct: f64,
    pub cloud_pct: f64,
    pub condition: String,
    /// Usually scheme-relative (`//cdn.weatherapi.com/...`).
    pub icon: String,
}
