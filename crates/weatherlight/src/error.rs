//! Errors that abort a run.
//!
//! Per-device failures are not here: they are captured as
//! [`DeviceError`](crate::device::DeviceError) in the run report.

use thiserror::Error;

use crate::config::ConfigError;
use crate::device::DiscoveryError;
use crate::weather::{ClassifyError, ForecastError, SourceError};

#[derive(Debug, Error)]
pub enum Error {
    /// Configuration file unreadable or invalid
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    /// Weather source could not be reached or answered garbage
    #[error("Weather source error: {0}")]
    Source(#[from] SourceError),

    /// Forecast could not be summarised
    #[error("Forecast error: {0}")]
    Forecast(#[from] ForecastError),

    /// Day summary could not be classified
    #[error("Classification error: {0}")]
    Classify(#[from] ClassifyError),

    /// Device discovery failed outright
    #[error("Discovery error: {0}")]
    Discovery(#[from] DiscoveryError),
}

pub type Result<T> = std::result::Result<T, Error>;
