use thiserror::Error;

/// Failures reported by the geocoding and forecast clients.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// The place name matched nothing. User-correctable, not a fault.
    #[error("No location found for '{0}'")]
    NotFound(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Malformed response: {0}")]
    MalformedResponse(String),
}

impl ProviderError {
    pub fn is_fault(&self) -> bool {
        !matches!(self, ProviderError::NotFound(_))
    }
}

/// What the pipeline shows the user. Every provider failure collapses into
/// one of these three messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PipelineError {
    #[error("not found")]
    NotFound,

    #[error("geocode failed")]
    GeocodeFailed,

    #[error("fetch failed")]
    FetchFailed,
}

impl PipelineError {
    pub fn from_geocode(err: &ProviderError) -> Self {
        match err {
            ProviderError::NotFound(_) => PipelineError::NotFound,
            _ => PipelineError::GeocodeFailed,
        }
    }

    pub fn from_forecast(_err: &ProviderError) -> Self {
        PipelineError::FetchFailed
    }
}
