use std::fmt::Debug;

use async_trait::async_trait;
use thiserror::Error;

use crate::model::{CurrentWeather, ForecastEntry, Unit};

pub mod openweather;

/// Fallback shown when the provider rejects a query without a usable
/// `message` field.
pub const GENERIC_REJECTION: &str = "city not found or provider error";

/// A single weather lookup: city name plus the unit system to request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeatherQuery {
    pub city: String,
    pub unit: Unit,
}

impl WeatherQuery {
    pub fn new(city: impl Into<String>, unit: Unit) -> Self {
        Self { city: city.into(), unit }
    }
}

/// Errors surfaced by a weather provider. All are terminal for the
/// current query attempt; no retries are performed.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("failed to reach weather provider: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("failed to decode provider response: {0}")]
    Decode(#[from] serde_json::Error),

    /// The provider answered but refused the query (unknown city, bad
    /// key, ...). Carries the provider's own message when it sent one.
    #[error("{0}")]
    Rejected(String),
}

/// Source of current conditions and the daily forecast for a query.
///
/// The widget ships a single OpenWeatherMap implementation; the trait is
/// the seam that lets tests substitute a scripted provider.
#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    async fn current_weather(
        &self,
        query: &WeatherQuery,
    ) -> Result<CurrentWeather, ProviderError>;

    /// Returns at most five entries, one per day, in ascending date order.
    async fn forecast(&self, query: &WeatherQuery)
    -> Result<Vec<ForecastEntry>, ProviderError>;
}
