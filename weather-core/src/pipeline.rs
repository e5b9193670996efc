//! Debounced query → geocode → forecast → view-model pipeline.
//!
//! Every committed query gets a generation token. A result is published
//! only if its token is still the current one, so a slow response for an
//! older query can never overwrite the state of a newer one.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::{
    Config, DayViewModel, PipelineError, PipelineState, ProviderError,
    background::categorize,
    provider::{ForecastClient, GeocodeClient, clients_from_config},
};

/// Identifies one committed query.
type Generation = u64;

#[derive(Debug)]
pub struct ForecastPipeline {
    shared: Arc<Shared>,
    debounce: Duration,
    timer: Mutex<Option<JoinHandle<()>>>,
}

#[derive(Debug)]
struct Shared {
    geocoder: Arc<dyn GeocodeClient>,
    forecaster: Arc<dyn ForecastClient>,
    date_format: String,
    /// Held while publishing so the token check and the state write are atomic.
    current: Mutex<Generation>,
    state: watch::Sender<PipelineState>,
}

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(PoisonError::into_inner)
}

impl ForecastPipeline {
    pub fn new(
        geocoder: Arc<dyn GeocodeClient>,
        forecaster: Arc<dyn ForecastClient>,
        config: &Config,
    ) -> Self {
        let (state, _) = watch::channel(PipelineState::Idle);

        Self {
            shared: Arc::new(Shared {
                geocoder,
                forecaster,
                date_format: config.date_format.clone(),
                current: Mutex::new(0),
                state,
            }),
            debounce: config.debounce(),
            timer: Mutex::new(None),
        }
    }

    /// Pipeline backed by the Open-Meteo client described by `config`.
    pub fn from_config(config: &Config) -> Result<Self, ProviderError> {
        let (geocoder, forecaster) = clients_from_config(config)?;
        Ok(Self::new(geocoder, forecaster, config))
    }

    pub fn debounce(&self) -> Duration {
        self.debounce
    }

    /// Snapshot of the current state.
    pub fn state(&self) -> PipelineState {
        self.shared.state.borrow().clone()
    }

    /// Receiver that observes every published state.
    pub fn subscribe(&self) -> watch::Receiver<PipelineState> {
        self.shared.state.subscribe()
    }

    /// Input entry point, called on every keystroke.
    ///
    /// Restarts the quiet period; the query is committed only once the input
    /// has been stable for [`Self::debounce`]. Must be called from within a
    /// Tokio runtime.
    pub fn set_query(&self, query: impl Into<String>) {
        let query = query.into();
        let shared = Arc::clone(&self.shared);
        let delay = self.debounce;

        let mut timer = lock(&self.timer);
        if let Some(pending) = timer.take() {
            debug!("Restarting debounce timer");
            pending.abort();
        }

        *timer = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            // Committing is synchronous, so aborting the timer can never
            // leave a half-committed query behind.
            if let Some(generation) = shared.commit(&query) {
                tokio::spawn(async move {
                    shared.run(generation, &query).await;
                });
            }
        }));
    }

    /// Commit `query` right away, skipping the quiet period.
    pub fn submit(&self, query: impl Into<String>) {
        let query = query.into();
        self.cancel_pending();

        if let Some(generation) = self.shared.commit(&query) {
            let shared = Arc::clone(&self.shared);
            tokio::spawn(async move {
                shared.run(generation, &query).await;
            });
        }
    }

    /// Commit `query` and drive it to completion on the calling task.
    ///
    /// Returns the state this query produced, which is also published. If a
    /// newer query superseded it before the forecast step, nothing is
    /// produced and the current (newer) state is returned instead.
    pub async fn run_query(&self, query: &str) -> PipelineState {
        self.cancel_pending();

        match self.shared.commit(query) {
            Some(generation) => self.shared.run(generation, query).await,
            None => PipelineState::empty(),
        }
    }

    /// Drop the debounce timer, if any. In-flight queries are unaffected.
    pub fn cancel_pending(&self) {
        if let Some(pending) = lock(&self.timer).take() {
            pending.abort();
        }
    }
}

impl Drop for ForecastPipeline {
    fn drop(&mut self) {
        self.cancel_pending();
        self.shared.invalidate();
    }
}

impl Shared {
    /// Make `query` the current one. Blank input settles immediately on an
    /// empty forecast and returns `None`.
    fn commit(&self, query: &str) -> Option<Generation> {
        let mut current = lock(&self.current);
        *current += 1;

        if query.trim().is_empty() {
            debug!(generation = *current, "Blank query, clearing forecast");
            self.state.send_replace(PipelineState::empty());
            return None;
        }

        info!(query = query.trim(), generation = *current, "Committing forecast query");
        self.state.send_replace(PipelineState::Loading);
        Some(*current)
    }

    fn is_current(&self, generation: Generation) -> bool {
        *lock(&self.current) == generation
    }

    fn invalidate(&self) {
        *lock(&self.current) += 1;
    }

    fn publish(&self, generation: Generation, state: PipelineState) -> bool {
        let current = lock(&self.current);
        if *current != generation {
            debug!(generation, current = *current, "Discarding superseded result");
            return false;
        }

        self.state.send_replace(state);
        true
    }

    async fn run(&self, generation: Generation, query: &str) -> PipelineState {
        let state = match self.resolve(generation, query).await {
            Ok(Some(state)) => state,
            Ok(None) => return self.state.borrow().clone(),
            Err(err) => PipelineState::error(err.to_string()),
        };

        self.publish(generation, state.clone());
        state
    }

    /// `Ok(None)` means the query was superseded between the two calls.
    /// A query superseded during the forecast call still resolves here and is
    /// dropped by [`Shared::publish`].
    async fn resolve(
        &self,
        generation: Generation,
        query: &str,
    ) -> Result<Option<PipelineState>, PipelineError> {
        let name = query.trim();

        let coords = self.geocoder.geocode(name).await.map_err(|err| {
            log_provider_error("geocode", &err);
            PipelineError::from_geocode(&err)
        })?;

        if !self.is_current(generation) {
            debug!(generation, "Query superseded before forecast fetch");
            return Ok(None);
        }

        let days = self.forecaster.fetch_forecast(coords).await.map_err(|err| {
            log_provider_error("forecast", &err);
            PipelineError::from_forecast(&err)
        })?;

        let forecast: Vec<DayViewModel> = days
            .iter()
            .map(|raw| DayViewModel::from_raw(raw, &self.date_format))
            .collect();

        let background = days
            .first()
            .map(|d| categorize(d.weather_code))
            .unwrap_or_default();

        debug!(days = forecast.len(), %background, "Forecast ready");
        Ok(Some(PipelineState::Ready { forecast, background }))
    }
}

fn log_provider_error(step: &str, err: &ProviderError) {
    if err.is_fault() {
        warn!(step, error = %err, "Forecast lookup failed");
    } else {
        info!(step, error = %err, "Forecast lookup found nothing");
    }
}
