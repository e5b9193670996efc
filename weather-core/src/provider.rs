use crate::{
    Config, Coordinates, DailyRaw, ProviderError, provider::open_meteo::OpenMeteoClient,
};
use async_trait::async_trait;
use std::{fmt::Debug, sync::Arc};

pub mod open_meteo;

/// Resolves a free-text place name to coordinates.
#[async_trait]
pub trait GeocodeClient: Send + Sync + Debug {
    async fn geocode(&self, name: &str) -> Result<Coordinates, ProviderError>;
}

/// Retrieves the multi-day daily forecast for a position.
///
/// Implementations must reject responses whose daily arrays disagree in
/// length with [`ProviderError::MalformedResponse`].
#[async_trait]
pub trait ForecastClient: Send + Sync + Debug {
    async fn fetch_forecast(&self, coords: Coordinates) -> Result<Vec<DailyRaw>, ProviderError>;
}

/// Build the Open-Meteo client from config and hand it out as both collaborators.
pub fn clients_from_config(
    config: &Config,
) -> Result<(Arc<dyn GeocodeClient>, Arc<dyn ForecastClient>), ProviderError> {
    let client = Arc::new(OpenMeteoClient::new(config)?);
    let geocoder: Arc<dyn GeocodeClient> = client.clone();
    let forecaster: Arc<dyn ForecastClient> = client;
    Ok((geocoder, forecaster))
}
