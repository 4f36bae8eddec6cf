//! Core library for the `wanniweather` widget.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - The OpenWeatherMap client behind a provider trait
//! - Shared domain models (query state, current weather, forecast)
//! - The query controller that drives the loading/error/result lifecycle
//!
//! It is used by `wanniweather-cli`, but can also be reused by other
//! front ends or services.

pub mod config;
pub mod controller;
pub mod model;
pub mod provider;

pub use config::Config;
pub use controller::WeatherQueryController;
pub use model::{CurrentWeather, ForecastEntry, QueryState, RequestOutcome, Unit};
pub use provider::{ProviderError, WeatherProvider, WeatherQuery};
