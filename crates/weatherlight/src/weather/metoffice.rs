//! Met Office DataHub daily point forecast client.
//!
//! Fetches the daily spot forecast for the configured coordinates and maps
//! each `timeSeries` entry to a [`ForecastSample`]. Only the day-time fields
//! are used.

use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;

use super::{ForecastSample, ForecastSource, SourceError};
use crate::config::WeatherConfig;

// ── Constants ───────────────────────────────────────────────────────

/// Path of the daily spot forecast, relative to the configured base URL.
const DAILY_PATH: &str = "/forecasts/point/daily";

// ── Wire format ─────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct DailyResponse {
    #[serde(default)]
    features: Vec<Feature>,
}

#[derive(Debug, Deserialize)]
struct Feature {
    properties: Properties,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Properties {
    #[serde(default)]
    location: Option<Location>,
    #[serde(default)]
    time_series: Vec<TimeSeriesEntry>,
}

#[derive(Debug, Deserialize)]
struct Location {
    name: Option<String>,
}

/// The first entry of a daily series usually covers yesterday and has no
/// day-time values, so every field is optional.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TimeSeriesEntry {
    #[serde(default)]
    time: Option<String>,
    day_probability_of_precipitation: Option<i64>,
    day_probability_of_heavy_rain: Option<i64>,
    day_probability_of_heavy_snow: Option<i64>,
    day_max_feels_like_temp: Option<f64>,
}

impl TimeSeriesEntry {
    fn to_sample(&self) -> Option<ForecastSample> {
        Some(ForecastSample {
            precipitation_probability: percent(self.day_probability_of_precipitation?),
            heavy_rain_probability: percent(self.day_probability_of_heavy_rain?),
            heavy_snow_probability: percent(self.day_probability_of_heavy_snow?),
            feels_like_temp: self.day_max_feels_like_temp?,
        })
    }
}

fn percent(value: i64) -> u8 {
    value.clamp(0, 100) as u8
}

/// Parse a daily forecast response body into samples.
pub fn parse_daily_forecast(body: &str) -> Result<Vec<ForecastSample>, SourceError> {
    let response: DailyResponse =
        serde_json::from_str(body).map_err(|e| SourceError::Format(e.to_string()))?;

    let feature = response
        .features
        .into_iter()
        .next()
        .ok_or_else(|| SourceError::Format("response has no features".to_string()))?;

    if let Some(name) = feature.properties.location.and_then(|l| l.name) {
        log::info!("Forecast location: {}", name);
    }

    let samples = feature
        .properties
        .time_series
        .iter()
        .filter_map(|entry| {
            let sample = entry.to_sample();
            if sample.is_none() {
                log::debug!(
                    "Skipping incomplete forecast entry {}",
                    entry.time.as_deref().unwrap_or("<no time>")
                );
            }
            sample
        })
        .collect();

    Ok(samples)
}

// ── Client ──────────────────────────────────────────────────────────

/// Met Office DataHub client.
///
/// `Debug` goes through [`WeatherConfig`]'s, which redacts the client secret.
#[derive(Debug)]
pub struct MetOfficeClient {
    client: reqwest::Client,
    config: WeatherConfig,
}

impl MetOfficeClient {
    pub fn new(config: WeatherConfig) -> Result<Self, SourceError> {
        if config.client_id.is_empty() || config.client_secret.is_empty() {
            return Err(SourceError::MissingCredentials);
        }

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { client, config })
    }

    fn daily_url(&self) -> String {
        format!(
            "{}{}?excludeParameterMetadata=false&includeLocationName=true&latitude={}&longitude={}",
            self.config.base_url.trim_end_matches('/'),
            DAILY_PATH,
            self.config.latitude,
            self.config.longitude
        )
    }
}

#[async_trait]
impl ForecastSource for MetOfficeClient {
    async fn fetch(&self) -> Result<Vec<ForecastSample>, SourceError> {
        log::info!(
            "Fetching daily forecast for ({:.4}, {:.4})",
            self.config.latitude,
            self.config.longitude
        );

        let response = self
            .client
            .get(self.daily_url())
            .header("x-ibm-client-id", &self.config.client_id)
            .header("x-ibm-client-secret", &self.config.client_secret)
            .header("accept", "application/json")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            return Err(SourceError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body = response.text().await?;
        parse_daily_forecast(&body)
    }
}

// ── Tests ───────────────────────────────────────────────────────────
