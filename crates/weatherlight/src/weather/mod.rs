//! Forecast acquisition, aggregation and classification.

mod band;
mod forecast;
pub mod metoffice;

use async_trait::async_trait;

pub use band::{classify, ClassifyError, WeatherBand};
pub use forecast::{aggregate, DaySummary, ForecastError, ForecastSample, Thresholds};
pub use metoffice::MetOfficeClient;

/// Errors raised while obtaining a forecast from a weather source.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("weather API credentials not configured")]
    MissingCredentials,

    #[error("format error: {0}")]
    Format(String),
}

/// A provider of per-period forecast samples for one location.
#[async_trait]
pub trait ForecastSource: Send + Sync {
    async fn fetch(&self) -> Result<Vec<ForecastSample>, SourceError>;
}
