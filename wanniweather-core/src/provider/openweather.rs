use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::model::{CurrentWeather, ForecastEntry};
use crate::provider::GENERIC_REJECTION;

use super::{ProviderError, WeatherProvider, WeatherQuery};

pub const DEFAULT_BASE_URL: &str = "https://api.openweathermap.org/data/2.5";
pub const ICON_BASE_URL: &str = "https://openweathermap.org/img/wn";

/// Forecast samples arrive at 3-hour granularity; the local-noon slot is
/// the one representative sample kept per day.
const NOON_MARKER: &str = "12:00:00";
const FORECAST_DAYS: usize = 5;

/// The original design leaves requests without a deadline; cap them so a
/// dead network cannot leave the widget loading forever.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// URL of the provider-hosted icon asset for a condition code.
pub fn icon_url(icon: &str) -> String {
    format!("{ICON_BASE_URL}/{icon}@2x.png")
}

#[derive(Debug, Clone)]
pub struct OpenWeatherProvider {
    api_key: String,
    base_url: String,
    http: Client,
}

impl OpenWeatherProvider {
    pub fn new(api_key: String) -> Self {
        Self::with_base_url(api_key, DEFAULT_BASE_URL.to_string())
    }

    /// Point the client at a non-default endpoint (local mock servers).
    pub fn with_base_url(api_key: String, base_url: String) -> Self {
        let http = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_else(|_| Client::new());

        Self { api_key, base_url, http }
    }

    /// GET one endpoint and return the raw body. The provider reports
    /// rejections in the JSON `cod` field, so HTTP-level status is not
    /// checked here; the caller inspects the envelope instead.
    async fn fetch_body(&self, endpoint: &str, query: &WeatherQuery) -> Result<String, ProviderError> {
        let url = format!("{}/{endpoint}", self.base_url);
        debug!(endpoint, city = %query.city, unit = %query.unit, "requesting OpenWeather endpoint");

        let res = self
            .http
            .get(&url)
            .query(&[
                ("q", query.city.as_str()),
                ("units", query.unit.as_query_param()),
                ("appid", self.api_key.as_str()),
            ])
            .send()
            .await?;

        Ok(res.text().await?)
    }

    async fn fetch_current(&self, query: &WeatherQuery) -> Result<CurrentWeather, ProviderError> {
        let body = self.fetch_body("weather", query).await?;
        reject_unless_success(&body)?;

        let parsed: OwCurrentResponse = serde_json::from_str(&body)?;
        let (description, icon) = primary_condition(&parsed.weather);

        Ok(CurrentWeather {
            location_name: parsed.name,
            country: parsed.sys.country,
            description,
            icon,
            temperature: parsed.main.temp,
            feels_like: parsed.main.feels_like,
            humidity_pct: parsed.main.humidity,
            wind_speed: parsed.wind.speed,
            pressure_hpa: parsed.main.pressure,
        })
    }

    async fn fetch_forecast(&self, query: &WeatherQuery) -> Result<Vec<ForecastEntry>, ProviderError> {
        let body = self.fetch_body("forecast", query).await?;
        reject_unless_success(&body)?;

        let parsed: OwForecastResponse = serde_json::from_str(&body)?;
        Ok(noon_entries(&parsed.list))
    }
}

#[async_trait]
impl WeatherProvider for OpenWeatherProvider {
    async fn current_weather(
        &self,
        query: &WeatherQuery,
    ) -> Result<CurrentWeather, ProviderError> {
        self.fetch_current(query).await
    }

    async fn forecast(
        &self,
        query: &WeatherQuery,
    ) -> Result<Vec<ForecastEntry>, ProviderError> {
        self.fetch_forecast(query).await
    }
}

/// Status envelope shared by both endpoints. The current-weather endpoint
/// returns `cod` as a number while the forecast endpoint returns it as a
/// string; error bodies use strings on both.
#[derive(Debug, Deserialize)]
struct OwStatus {
    cod: OwCode,
    /// String on rejection; the forecast success body abuses this field
    /// for a number, so it cannot be typed as `Option<String>`.
    #[serde(default)]
    message: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum OwCode {
    Number(i64),
    Text(String),
}

impl OwCode {
    fn is_success(&self) -> bool {
        match self {
            OwCode::Number(n) => *n == 200,
            OwCode::Text(s) => s == "200",
        }
    }
}

/// Parse the status envelope and fail with the provider's message when
/// `cod` is not the success code.
fn reject_unless_success(body: &str) -> Result<(), ProviderError> {
    let status: OwStatus = serde_json::from_str(body)?;
    if status.cod.is_success() {
        return Ok(());
    }

    let message = status
        .message
        .as_ref()
        .and_then(serde_json::Value::as_str)
        .unwrap_or(GENERIC_REJECTION)
        .to_string();

    warn!(%message, "OpenWeather rejected the query");
    Err(ProviderError::Rejected(message))
}

fn primary_condition(weather: &[OwCondition]) -> (String, String) {
    weather
        .first()
        .map(|w| (w.description.clone(), w.icon.clone()))
        .unwrap_or_else(|| ("Unknown".to_string(), String::new()))
}

/// Reduce the 3-hourly list to one entry per day by keeping the
/// noon-aligned slots, in list (ascending) order, truncated to five.
/// Fewer than five noon slots is passed through as-is.
fn noon_entries(list: &[OwForecastSlot]) -> Vec<ForecastEntry> {
    list.iter()
        .filter(|slot| slot.dt_txt.contains(NOON_MARKER))
        .take(FORECAST_DAYS)
        .map(|slot| {
            let (description, icon) = primary_condition(&slot.weather);
            ForecastEntry {
                timestamp: slot.dt,
                description,
                icon,
                temperature: slot.main.temp,
            }
        })
        .collect()
}

#[derive(Debug, Deserialize)]
struct OwCondition {
    description: String,
    icon: String,
}

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: f64,
    feels_like: f64,
    humidity: u8,
    pressure: u32,
}

#[derive(Debug, Deserialize)]
struct OwSys {
    country: String,
}

#[derive(Debug, Deserialize)]
struct OwWind {
    speed: f64,
}

#[derive(Debug, Deserialize)]
struct OwCurrentResponse {
    name: String,
    sys: OwSys,
    weather: Vec<OwCondition>,
    main: OwMain,
    wind: OwWind,
}

#[derive(Debug, Deserialize)]
struct OwForecastMain {
    temp: f64,
}

#[derive(Debug, Deserialize)]
struct OwForecastSlot {
    dt: i64,
    dt_txt: String,
    weather: Vec<OwCondition>,
    main: OwForecastMain,
}

#[derive(Debug, Deserialize)]
struct OwForecastResponse {
    list: Vec<OwForecastSlot>,
}
