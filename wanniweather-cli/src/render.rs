//! Human-friendly output formatting. Pure presentation: everything here
//! reads the controller's state and writes to stdout.

use chrono::{DateTime, Utc};

use wanniweather_core::WeatherQueryController;
use wanniweather_core::model::{CurrentWeather, ForecastEntry, RequestOutcome, Unit};
use wanniweather_core::provider::openweather::icon_url;

/// Unix timestamp -> "Weekday, Mon Day" (en-US), e.g. "Mon, Jan 1".
fn format_date(timestamp: i64) -> String {
    DateTime::<Utc>::from_timestamp(timestamp, 0)
        .map(|dt| dt.format("%a, %b %-d").to_string())
        .unwrap_or_else(|| timestamp.to_string())
}

fn format_temperature(value: f64, unit: Unit) -> String {
    format!("{:.0}{}", value.round(), unit.temperature_suffix())
}

pub fn render_outcome(controller: &WeatherQueryController) {
    match controller.outcome() {
        RequestOutcome::Idle => println!("Enter a city name to get started."),
        RequestOutcome::Loading => println!("Loading weather data..."),
        RequestOutcome::Failed(message) => {
            println!("Error: {message}. Please check the city name or your API key.");
        }
        RequestOutcome::Success => render_results(controller),
    }
}

pub fn render_results(controller: &WeatherQueryController) {
    let unit = controller.unit();

    if let Some(current) = controller.current() {
        render_current(current, unit);
    }
    render_forecast(controller.forecast(), unit);
}

fn render_current(current: &CurrentWeather, unit: Unit) {
    println!();
    println!(
        "Current weather in {}, {}",
        current.location_name, current.country
    );
    println!(
        "  {}  (feels like {})  {}",
        format_temperature(current.temperature, unit),
        format_temperature(current.feels_like, unit),
        current.description,
    );
    println!(
        "  Humidity: {}%   Wind: {} {}   Pressure: {} hPa",
        current.humidity_pct,
        current.wind_speed,
        unit.wind_suffix(),
        current.pressure_hpa,
    );
    if !current.icon.is_empty() {
        println!("  Icon: {}", icon_url(&current.icon));
    }
}

fn render_forecast(forecast: &[ForecastEntry], unit: Unit) {
    if forecast.is_empty() {
        return;
    }

    println!();
    println!("{}-day forecast", forecast.len());
    for entry in forecast {
        println!(
            "  {:<12} {:>6}  {}",
            format_date(entry.timestamp),
            format_temperature(entry.temperature, unit),
            entry.description,
        );
    }
    println!();
}
