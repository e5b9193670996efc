use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime};
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, instrument};

use crate::{Config, Coordinates, DailyRaw, ProviderError};

use super::{ForecastClient, GeocodeClient};

const DAILY_FIELDS: &str = "temperature_2m_max,temperature_2m_min,weathercode,windspeed_10m_max";

/// Open-Meteo geocoding and forecast APIs. No API key required.
#[derive(Debug, Clone)]
pub struct OpenMeteoClient {
    http: Client,
    geocoding_url: String,
    forecast_url: String,
    forecast_days: u8,
}

impl OpenMeteoClient {
    pub fn new(config: &Config) -> Result<Self, ProviderError> {
        let http = Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| ProviderError::Network(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            http,
            geocoding_url: config.geocoding_url.trim_end_matches('/').to_string(),
            forecast_url: config.forecast_url.trim_end_matches('/').to_string(),
            forecast_days: config.forecast_days(),
        })
    }

    async fn get_body(
        &self,
        request: reqwest::RequestBuilder,
        what: &str,
    ) -> Result<String, ProviderError> {
        let res = request
            .send()
            .await
            .map_err(|e| ProviderError::Network(format!("Failed to send {what} request: {e}")))?;

        let status = res.status();
        let body = res
            .text()
            .await
            .map_err(|e| ProviderError::Network(format!("Failed to read {what} response body: {e}")))?;

        if !status.is_success() {
            return Err(ProviderError::Network(format!(
                "{what} request failed with status {}: {}",
                status,
                truncate_body(&body),
            )));
        }

        Ok(body)
    }
}

#[derive(Debug, Deserialize)]
struct GeoResult {
    latitude: f64,
    longitude: f64,
}

#[derive(Debug, Deserialize)]
struct GeoResponse {
    #[serde(default)]
    results: Option<Vec<GeoResult>>,
}

/// Values are `null` for days past the forecast model's horizon.
#[derive(Debug, Deserialize)]
struct OmDaily {
    time: Vec<String>,
    temperature_2m_max: Vec<Option<f64>>,
    temperature_2m_min: Vec<Option<f64>>,
    weathercode: Vec<Option<i32>>,
    windspeed_10m_max: Vec<Option<f64>>,
}

#[derive(Debug, Deserialize)]
struct OmForecastResponse {
    daily: OmDaily,
}

#[async_trait]
impl GeocodeClient for OpenMeteoClient {
    #[instrument(skip(self))]
    async fn geocode(&self, name: &str) -> Result<Coordinates, ProviderError> {
        let url = format!("{}/search", self.geocoding_url);
        debug!(url = %url, "Geocoding place name");

        let request = self.http.get(&url).query(&[
            ("name", name),
            ("count", "1"),
            ("language", "en"),
            ("format", "json"),
        ]);
        let body = self.get_body(request, "geocoding").await?;

        let parsed: GeoResponse = serde_json::from_str(&body).map_err(|e| {
            ProviderError::MalformedResponse(format!("Failed to parse geocoding JSON: {e}"))
        })?;

        parsed
            .results
            .and_then(|r| r.into_iter().next())
            .map(|r| Coordinates::new(r.latitude, r.longitude))
            .ok_or_else(|| ProviderError::NotFound(name.to_string()))
    }
}

#[async_trait]
impl ForecastClient for OpenMeteoClient {
    #[instrument(skip(self), fields(lat = %coords.latitude, lon = %coords.longitude))]
    async fn fetch_forecast(&self, coords: Coordinates) -> Result<Vec<DailyRaw>, ProviderError> {
        let url = format!("{}/forecast", self.forecast_url);
        debug!(url = %url, days = self.forecast_days, "Fetching daily forecast");

        let request = self.http.get(&url).query(&[
            ("latitude", coords.latitude.to_string()),
            ("longitude", coords.longitude.to_string()),
            ("daily", DAILY_FIELDS.to_string()),
            ("timezone", "auto".to_string()),
            ("forecast_days", self.forecast_days.to_string()),
        ]);
        let body = self.get_body(request, "forecast").await?;

        let parsed: OmForecastResponse = serde_json::from_str(&body).map_err(|e| {
            ProviderError::MalformedResponse(format!("Failed to parse forecast JSON: {e}"))
        })?;

        zip_daily(parsed.daily)
    }
}

/// Turn the parallel daily arrays into one record per day. Days with any
/// `null` value are left out; arrays of unequal length are rejected.
fn zip_daily(daily: OmDaily) -> Result<Vec<DailyRaw>, ProviderError> {
    let len = daily.time.len();
    let lengths = [
        ("temperature_2m_max", daily.temperature_2m_max.len()),
        ("temperature_2m_min", daily.temperature_2m_min.len()),
        ("weathercode", daily.weathercode.len()),
        ("windspeed_10m_max", daily.windspeed_10m_max.len()),
    ];
    if let Some((field, other)) = lengths.iter().find(|(_, l)| *l != len) {
        return Err(ProviderError::MalformedResponse(format!(
            "daily.{field} has {other} entries but daily.time has {len}"
        )));
    }

    let mut days = Vec::with_capacity(len);
    for (i, time) in daily.time.iter().enumerate() {
        let date = parse_local_time(time)?;
        let (Some(max_temp), Some(min_temp), Some(wind_speed_max), Some(weather_code)) = (
            daily.temperature_2m_max[i],
            daily.temperature_2m_min[i],
            daily.windspeed_10m_max[i],
            daily.weathercode[i],
        ) else {
            debug!(date = %time, "Skipping day without forecast values");
            continue;
        };

        days.push(DailyRaw { date, max_temp, min_temp, wind_speed_max, weather_code });
    }

    Ok(days)
}

/// Open-Meteo reports local times without an offset: `2024-01-15` for daily
/// values, `2024-01-15T14:00` for sub-daily ones.
fn parse_local_time(s: &str) -> Result<NaiveDateTime, ProviderError> {
    if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M") {
        return Ok(dt);
    }

    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .ok_or_else(|| ProviderError::MalformedResponse(format!("Invalid date '{s}'")))
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}
