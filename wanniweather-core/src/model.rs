use serde::{Deserialize, Serialize};

/// Temperature/speed unit system sent to the provider.
///
/// The provider does not convert units client-side; each unit requires
/// its own request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Unit {
    #[default]
    Metric,
    Imperial,
}

impl Unit {
    /// Value of the provider's `units` query parameter.
    pub const fn as_query_param(self) -> &'static str {
        match self {
            Unit::Metric => "metric",
            Unit::Imperial => "imperial",
        }
    }

    pub const fn toggled(self) -> Self {
        match self {
            Unit::Metric => Unit::Imperial,
            Unit::Imperial => Unit::Metric,
        }
    }

    pub const fn temperature_suffix(self) -> &'static str {
        match self {
            Unit::Metric => "°C",
            Unit::Imperial => "°F",
        }
    }

    pub const fn wind_suffix(self) -> &'static str {
        match self {
            Unit::Metric => "m/s",
            Unit::Imperial => "mph",
        }
    }
}

impl std::fmt::Display for Unit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_query_param())
    }
}

/// User input state: the city being queried and the active unit.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryState {
    pub city: String,
    pub unit: Unit,
}

/// Normalized projection of the provider's current-conditions response.
///
/// Replaced wholesale on every successful query; cleared at the start of
/// each new attempt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentWeather {
    pub location_name: String,
    pub country: String,
    pub description: String,
    pub icon: String,
    pub temperature: f64,
    pub feels_like: f64,
    pub humidity_pct: u8,
    pub wind_speed: f64,
    pub pressure_hpa: u32,
}

/// One representative forecast sample per day (the local-noon slot),
/// at most five per query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastEntry {
    /// Unix timestamp of the sample; date formatting is a View concern.
    pub timestamp: i64,
    pub description: String,
    pub icon: String,
    pub temperature: f64,
}

/// Discrete request lifecycle state driving what the View shows.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum RequestOutcome {
    #[default]
    Idle,
    Loading,
    Success,
    Failed(String),
}

impl RequestOutcome {
    pub const fn is_loading(&self) -> bool {
        matches!(self, RequestOutcome::Loading)
    }

    pub const fn is_failed(&self) -> bool {
        matches!(self, RequestOutcome::Failed(_))
    }
}
