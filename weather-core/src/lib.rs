//! Core library for the `weather` CLI.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - The WeatherAPI.com current-conditions client
//! - Card rendering with escaped HTML templates
//! - The submit controller that ties a [`View`] to a provider
//!
//! It is used by `weather-cli`, but can also be reused by other binaries or services.

pub mod config;
pub mod controller;
pub mod model;
pub mod provider;
pub mod render;

pub use config::Config;
pub use controller::{Controller, SubmitOutcome, View};
pub use model::{WeatherRequest, WeatherSnapshot};
pub use provider::{FetchError, WeatherProvider, provider_from_config};
pub use render::{CardRenderer, RenderError};
