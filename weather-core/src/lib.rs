//! Core library for the `weather` CLI.
//!
//! This crate defines:
//! - Configuration handling
//! - Geocoding and forecast clients (Open-Meteo)
//! - The static WMO weather-code table and background categories
//! - The debounced forecast pipeline and its view-models
//!
//! The pipeline is host-agnostic: any front-end can drive it through
//! [`ForecastPipeline::set_query`] and render [`PipelineState`].

pub mod background;
pub mod codes;
pub mod config;
pub mod error;
pub mod model;
pub mod pipeline;
pub mod provider;

pub use background::{BackgroundCategory, categorize};
pub use codes::{CodeLabel, WeatherCodeEntry};
pub use config::Config;
pub use error::{PipelineError, ProviderError};
pub use model::{Coordinates, DailyRaw, DayPeriod, DayViewModel, PipelineState};
pub use pipeline::ForecastPipeline;
pub use provider::{ForecastClient, GeocodeClient, open_meteo::OpenMeteoClient};
