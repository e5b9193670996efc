use chrono::{NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};

use crate::background::BackgroundCategory;
use crate::codes;

/// Hour (local to the forecast location) from which a day counts as night.
pub const NIGHT_FROM_HOUR: u32 = 18;

/// Resolved position of a place name.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }
}

/// One index through the forecast endpoint's parallel daily arrays.
#[derive(Debug, Clone, PartialEq)]
pub struct DailyRaw {
    /// Local time at the forecast location. Plain dates are local midnight.
    pub date: NaiveDateTime,
    pub max_temp: f64,
    pub min_temp: f64,
    pub wind_speed_max: f64,
    pub weather_code: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DayPeriod {
    Day,
    Night,
}

impl DayPeriod {
    /// Day before 18:00 local time, night from then on.
    ///
    /// This is a stand-in for real sunrise/sunset: it never looks at the
    /// sunrise side, so early-morning hours count as day.
    pub fn from_local_time(time: &NaiveDateTime) -> Self {
        if time.hour() < NIGHT_FROM_HOUR {
            DayPeriod::Day
        } else {
            DayPeriod::Night
        }
    }
}

/// Display-ready representation of one forecast day.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DayViewModel {
    pub display_date: String,
    pub description: String,
    pub icon: String,
    pub max_temp: f64,
    pub min_temp: f64,
    pub wind_speed: f64,
    pub weather_code: i32,
    pub period: DayPeriod,
}

impl DayViewModel {
    /// Build the view-model for `raw`, formatting its date with `date_format`
    /// (chrono `strftime` syntax).
    pub fn from_raw(raw: &DailyRaw, date_format: &str) -> Self {
        let period = DayPeriod::from_local_time(&raw.date);
        let label = codes::label(raw.weather_code, period);

        Self {
            display_date: raw.date.format(date_format).to_string(),
            description: label.description.to_string(),
            icon: label.icon.to_string(),
            max_temp: raw.max_temp,
            min_temp: raw.min_temp,
            wind_speed: raw.wind_speed_max,
            weather_code: raw.weather_code,
            period,
        }
    }
}

/// What the view layer renders. Exactly one variant is active at a time.
#[derive(Debug, Clone, PartialEq, Serialize, Default)]
#[serde(tag = "state", rename_all = "lowercase")]
pub enum PipelineState {
    #[default]
    Idle,
    Loading,
    Error {
        message: String,
    },
    Ready {
        forecast: Vec<DayViewModel>,
        background: BackgroundCategory,
    },
}

impl PipelineState {
    pub fn error(message: impl Into<String>) -> Self {
        PipelineState::Error { message: message.into() }
    }

    /// Ready state with no days and the default background.
    pub fn empty() -> Self {
        PipelineState::Ready {
            forecast: Vec::new(),
            background: BackgroundCategory::default(),
        }
    }

    /// Days to render; empty for every state except `Ready`.
    pub fn forecast(&self) -> &[DayViewModel] {
        match self {
            PipelineState::Ready { forecast, .. } => forecast,
            _ => &[],
        }
    }

    pub fn background(&self) -> Option<BackgroundCategory> {
        match self {
            PipelineState::Ready { background, .. } => Some(*background),
            _ => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, PipelineState::Loading)
    }

    pub fn error_message(&self) -> Option<&str> {
        match self {
            PipelineState::Error { message } => Some(message),
            _ => None,
        }
    }
}
