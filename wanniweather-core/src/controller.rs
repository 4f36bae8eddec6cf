use tracing::debug;

use crate::model::{CurrentWeather, ForecastEntry, QueryState, RequestOutcome, Unit};
use crate::provider::{ProviderError, WeatherProvider, WeatherQuery};

/// Drives the fetch lifecycle of the widget: owns the input state, issues
/// the two dependent provider calls, and exposes the derived
/// loading/error/result state to a presentation layer.
///
/// State machine for the outcome:
/// `Idle --submit--> Loading --success--> Success`,
/// `Loading --failure--> Failed`,
/// `Success --submit/toggle--> Loading`, `Failed --submit--> Loading`.
/// Every entry into `Loading` settles exactly once.
#[derive(Debug)]
pub struct WeatherQueryController {
    provider: Box<dyn WeatherProvider>,
    state: QueryState,
    outcome: RequestOutcome,
    current: Option<CurrentWeather>,
    forecast: Vec<ForecastEntry>,
    /// Bumped at the start of every query; a settle whose generation no
    /// longer matches belongs to a superseded query and is discarded.
    generation: u64,
}

impl WeatherQueryController {
    pub fn new(provider: Box<dyn WeatherProvider>) -> Self {
        Self {
            provider,
            state: QueryState::default(),
            outcome: RequestOutcome::Idle,
            current: None,
            forecast: Vec::new(),
            generation: 0,
        }
    }

    pub fn state(&self) -> &QueryState {
        &self.state
    }

    pub fn unit(&self) -> Unit {
        self.state.unit
    }

    pub fn outcome(&self) -> &RequestOutcome {
        &self.outcome
    }

    pub fn current(&self) -> Option<&CurrentWeather> {
        self.current.as_ref()
    }

    pub fn forecast(&self) -> &[ForecastEntry] {
        &self.forecast
    }

    /// Fetch current conditions and the forecast for `city` in `unit`.
    ///
    /// An empty (or whitespace-only) city is a no-op: no state change, no
    /// network call. Otherwise the outcome moves to `Loading` and any
    /// prior results are cleared before the first request goes out. The
    /// two calls run sequentially; the forecast is only requested once
    /// current conditions succeed, and the first failure wins.
    pub async fn query(&mut self, city: &str, unit: Unit) -> RequestOutcome {
        let city = city.trim();
        if city.is_empty() {
            return self.outcome.clone();
        }

        self.generation += 1;
        let generation = self.generation;

        self.state.city = city.to_string();
        self.state.unit = unit;
        self.outcome = RequestOutcome::Loading;
        self.current = None;
        self.forecast.clear();

        let query = WeatherQuery::new(city, unit);
        let result = self.fetch_both(&query).await;
        self.settle(generation, result);

        self.outcome.clone()
    }

    /// Re-issue the last query with the current input state.
    pub async fn submit(&mut self) -> RequestOutcome {
        let city = self.state.city.clone();
        self.query(&city, self.state.unit).await
    }

    /// Flip metric/imperial. When a prior result is on screen, re-issue
    /// exactly one query for the same city in the new unit; the provider
    /// does not convert units client-side.
    pub async fn toggle_unit(&mut self) -> Unit {
        let unit = self.state.unit.toggled();
        self.state.unit = unit;

        if self.current.is_some() {
            let city = self.state.city.clone();
            self.query(&city, unit).await;
        }

        unit
    }

    async fn fetch_both(
        &self,
        query: &WeatherQuery,
    ) -> Result<(CurrentWeather, Vec<ForecastEntry>), ProviderError> {
        let current = self.provider.current_weather(query).await?;
        let forecast = self.provider.forecast(query).await?;
        Ok((current, forecast))
    }

    /// Terminal transition out of `Loading`. Runs on success and on every
    /// failure path, so `Loading` can never be left pending; results from
    /// a superseded generation are dropped without touching state.
    fn settle(
        &mut self,
        generation: u64,
        result: Result<(CurrentWeather, Vec<ForecastEntry>), ProviderError>,
    ) {
        if generation != self.generation {
            debug!(generation, current = self.generation, "discarding stale query result");
            return;
        }

        match result {
            Ok((current, forecast)) => {
                self.current = Some(current);
                self.forecast = forecast;
                self.outcome = RequestOutcome::Success;
            }
            Err(err) => {
                self.current = None;
                self.forecast.clear();
                self.outcome = RequestOutcome::Failed(err.to_string());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;

    use super::*;
    use crate::provider::ProviderError;

    #[derive(Debug, Default)]
    struct MockInner {
        calls: Mutex<Vec<WeatherQuery>>,
        reject_current: Option<String>,
        reject_forecast: Option<String>,
    }

    /// Scripted provider: records every call, answers with fixed sample
    /// data unless a rejection is configured.
    #[derive(Debug, Clone, Default)]
    struct MockProvider(Arc<MockInner>);

    impl MockProvider {
        fn rejecting_current(message: &str) -> Self {
            Self(Arc::new(MockInner {
                reject_current: Some(message.to_string()),
                ..MockInner::default()
            }))
        }

        fn rejecting_forecast(message: &str) -> Self {
            Self(Arc::new(MockInner {
                reject_forecast: Some(message.to_string()),
                ..MockInner::default()
            }))
        }

        fn calls(&self) -> Vec<WeatherQuery> {
            self.0.calls.lock().unwrap().clone()
        }
    }

    fn sample_current() -> CurrentWeather {
        CurrentWeather {
            location_name: "Paris".to_string(),
            country: "FR".to_string(),
            description: "clear sky".to_string(),
            icon: "01d".to_string(),
            temperature: 20.4,
            feels_like: 19.8,
            humidity_pct: 55,
            wind_speed: 3.1,
            pressure_hpa: 1012,
        }
    }

    fn sample_forecast() -> Vec<ForecastEntry> {
        vec![
            ForecastEntry {
                timestamp: 1_704_110_400,
                description: "clear sky".to_string(),
                icon: "01d".to_string(),
                temperature: 7.2,
            },
            ForecastEntry {
                timestamp: 1_704_196_800,
                description: "light rain".to_string(),
                icon: "10d".to_string(),
                temperature: 5.9,
            },
        ]
    }

    #[async_trait]
    impl WeatherProvider for MockProvider {
        async fn current_weather(
            &self,
            query: &WeatherQuery,
        ) -> Result<CurrentWeather, ProviderError> {
            self.0.calls.lock().unwrap().push(query.clone());
            match &self.0.reject_current {
                Some(message) => Err(ProviderError::Rejected(message.clone())),
                None => Ok(sample_current()),
            }
        }

        async fn forecast(
            &self,
            _query: &WeatherQuery,
        ) -> Result<Vec<ForecastEntry>, ProviderError> {
            match &self.0.reject_forecast {
                Some(message) => Err(ProviderError::Rejected(message.clone())),
                None => Ok(sample_forecast()),
            }
        }
    }

    fn controller(mock: &MockProvider) -> WeatherQueryController {
        WeatherQueryController::new(Box::new(mock.clone()))
    }

    #[tokio::test]
    async fn empty_city_is_a_no_op() {
        let mock = MockProvider::default();
        let mut ctrl = controller(&mock);

        let outcome = ctrl.query("", Unit::Metric).await;
        assert_eq!(outcome, RequestOutcome::Idle);
        assert_eq!(*ctrl.outcome(), RequestOutcome::Idle);
        assert_eq!(ctrl.state().city, "");
        assert!(mock.calls().is_empty());

        let outcome = ctrl.query("   ", Unit::Metric).await;
        assert_eq!(outcome, RequestOutcome::Idle);
        assert!(mock.calls().is_empty());
    }

    #[tokio::test]
    async fn successful_query_populates_both_result_sets() {
        let mock = MockProvider::default();
        let mut ctrl = controller(&mock);

        let outcome = ctrl.query("Paris", Unit::Metric).await;

        assert_eq!(outcome, RequestOutcome::Success);
        assert_eq!(ctrl.current(), Some(&sample_current()));
        assert_eq!(ctrl.forecast(), sample_forecast().as_slice());
        assert_eq!(ctrl.state().city, "Paris");
        assert_eq!(ctrl.unit(), Unit::Metric);
    }

    #[tokio::test]
    async fn repeated_query_is_idempotent() {
        let mock = MockProvider::default();
        let mut ctrl = controller(&mock);

        ctrl.query("Paris", Unit::Metric).await;
        let first = (ctrl.current().cloned(), ctrl.forecast().to_vec());

        ctrl.query("Paris", Unit::Metric).await;
        let second = (ctrl.current().cloned(), ctrl.forecast().to_vec());

        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn current_rejection_surfaces_provider_message() {
        let mock = MockProvider::rejecting_current("city not found");
        let mut ctrl = controller(&mock);

        let outcome = ctrl.query("Nowhere", Unit::Metric).await;

        match outcome {
            RequestOutcome::Failed(message) => assert!(message.contains("city not found")),
            other => panic!("expected Failed, got {other:?}"),
        }
        assert!(ctrl.current().is_none());
        assert!(ctrl.forecast().is_empty());
    }

    #[tokio::test]
    async fn forecast_failure_clears_already_fetched_current() {
        let mock = MockProvider::rejecting_forecast("forecast unavailable");
        let mut ctrl = controller(&mock);

        let outcome = ctrl.query("Paris", Unit::Metric).await;

        assert!(outcome.is_failed());
        // Loading/Failed imply both result sets are absent.
        assert!(ctrl.current().is_none());
        assert!(ctrl.forecast().is_empty());
    }

    #[tokio::test]
    async fn controller_recovers_after_a_failure() {
        let failing = MockProvider::rejecting_current("city not found");
        let mut ctrl = controller(&failing);
        ctrl.query("Nowhere", Unit::Metric).await;
        assert!(ctrl.outcome().is_failed());

        ctrl.provider = Box::new(MockProvider::default());
        let outcome = ctrl.submit().await;
        assert_eq!(outcome, RequestOutcome::Success);
    }

    #[tokio::test]
    async fn toggle_without_result_only_flips_the_unit() {
        let mock = MockProvider::default();
        let mut ctrl = controller(&mock);

        let unit = ctrl.toggle_unit().await;

        assert_eq!(unit, Unit::Imperial);
        assert_eq!(ctrl.unit(), Unit::Imperial);
        assert_eq!(*ctrl.outcome(), RequestOutcome::Idle);
        assert!(mock.calls().is_empty());
    }

    #[tokio::test]
    async fn toggle_after_success_requeries_same_city_in_new_unit() {
        let mock = MockProvider::default();
        let mut ctrl = controller(&mock);
        ctrl.query("Paris", Unit::Metric).await;

        let unit = ctrl.toggle_unit().await;

        assert_eq!(unit, Unit::Imperial);
        let calls = mock.calls();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[1], WeatherQuery::new("Paris", Unit::Imperial));

        // And back again.
        let unit = ctrl.toggle_unit().await;
        assert_eq!(unit, Unit::Metric);
        assert_eq!(mock.calls().len(), 3);
    }

    #[tokio::test]
    async fn stale_generation_settle_is_discarded() {
        let mock = MockProvider::default();
        let mut ctrl = controller(&mock);
        ctrl.query("Paris", Unit::Metric).await;
        let settled_generation = ctrl.generation;

        // A newer submission supersedes the in-flight one.
        ctrl.generation += 1;
        ctrl.settle(
            settled_generation,
            Err(ProviderError::Rejected("stale failure".to_string())),
        );

        assert_eq!(*ctrl.outcome(), RequestOutcome::Success);
        assert!(ctrl.current().is_some());
    }
}
