use crate::{Config, WeatherRequest, WeatherSnapshot, provider::weatherapi::WeatherApiProvider};
use async_trait::async_trait;
use reqwest::StatusCode;
use std::fmt::Debug;
use thiserror::Error;

pub mod weatherapi;

/// Everything that can go wrong between sending the request and holding a snapshot.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("failed to send request to weather provider: {0}")]
    Request(#[source] reqwest::Error),

    #[error("failed to read weather provider response body: {0}")]
    Body(#[source] reqwest::Error),

    #[error("weather provider returned status {status}: {body}")]
    Status { status: StatusCode, body: String },

    #[error("unexpected weather provider response: {0}")]
    Parse(#[from] serde_json::Error),
}

#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    async fn get_weather(&self, request: &WeatherRequest) -> Result<WeatherSnapshot, FetchError>;
}

/// Construct the provider from config. Fails when no API key can be resolved.
pub fn provider_from_config(config: &Config) -> anyhow::Result<Box<dyn WeatherProvider>> {
    let api_key = config.require_api_key()?;
    Ok(Box::new(WeatherApiProvider::with_base_url(api_key, config.base_url.clone())))
}
