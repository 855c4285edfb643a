//! Reduction of per-period forecast samples into a single day summary.

use serde::{Deserialize, Serialize};

/// One forecast period as reported by the weather source.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ForecastSample {
    /// Probability of any precipitation, 0-100.
    pub precipitation_probability: u8,
    /// Probability of heavy rain, 0-100.
    pub heavy_rain_probability: u8,
    /// Probability of heavy snow, 0-100.
    pub heavy_snow_probability: u8,
    /// Representative feels-like temperature in °C.
    pub feels_like_temp: f64,
}

/// Probability thresholds (inclusive) at which a flag is raised.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Thresholds {
    #[serde(default = "default_threshold")]
    pub precipitation: u8,
    #[serde(default = "default_threshold")]
    pub heavy_rain: u8,
    #[serde(default = "default_threshold")]
    pub heavy_snow: u8,
}

fn default_threshold() -> u8 {
    50
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            precipitation: default_threshold(),
            heavy_rain: default_threshold(),
            heavy_snow: default_threshold(),
        }
    }
}

/// Day-level weather summary used for every downstream decision.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DaySummary {
    pub precipitation: bool,
    pub heavy_rain: bool,
    pub heavy_snow: bool,
    pub min_temp: f64,
    pub max_temp: f64,
}

/// Errors from forecast aggregation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ForecastError {
    #[error("forecast contains no samples")]
    EmptyForecast,
}

/// Aggregate forecast samples into a [`DaySummary`].
///
/// Each flag is raised if any sample reaches its threshold. Temperatures are
/// the extremes over all samples, so the result does not depend on sample
/// order.
pub fn aggregate(
    samples: &[ForecastSample],
    thresholds: &Thresholds,
) -> Result<DaySummary, ForecastError> {
    let first = samples.first().ok_or(ForecastError::EmptyForecast)?;

    let seed = DaySummary {
        precipitation: false,
        heavy_rain: false,
        heavy_snow: false,
        min_temp: first.feels_like_temp,
        max_temp: first.feels_like_temp,
    };

    let summary = samples.iter().fold(seed, |acc, sample| DaySummary {
        precipitation: acc.precipitation
            || sample.precipitation_probability >= thresholds.precipitation,
        heavy_rain: acc.heavy_rain || sample.heavy_rain_probability >= thresholds.heavy_rain,
        heavy_snow: acc.heavy_snow || sample.heavy_snow_probability >= thresholds.heavy_snow,
        min_temp: acc.min_temp.min(sample.feels_like_temp),
        max_temp: acc.max_temp.max(sample.feels_like_temp),
    });

    log::debug!(
        "Aggregated {} samples: precipitation={}, heavy_rain={}, heavy_snow={}, temp {:.1}..{:.1}",
        samples.len(),
        summary.precipitation,
        summary.heavy_rain,
        summary.heavy_snow,
        summary.min_temp,
        summary.max_temp
    );

    Ok(summary)
}
