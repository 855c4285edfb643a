//! Temperature classification into ordinal weather bands.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Day-level temperature band, ordered from coldest to hottest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeatherBand {
    Freezing,
    Cold,
    Fair,
    Warm,
    Hot,
}

impl WeatherBand {
    pub const ALL: [WeatherBand; 5] = [
        WeatherBand::Freezing,
        WeatherBand::Cold,
        WeatherBand::Fair,
        WeatherBand::Warm,
        WeatherBand::Hot,
    ];
}

impl fmt::Display for WeatherBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            WeatherBand::Freezing => "freezing",
            WeatherBand::Cold => "cold",
            WeatherBand::Fair => "fair",
            WeatherBand::Warm => "warm",
            WeatherBand::Hot => "hot",
        };
        f.write_str(name)
    }
}

/// Errors from temperature classification.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ClassifyError {
    #[error("invalid temperature range: min {min} / max {max}")]
    InvalidRange { min: f64, max: f64 },
}

/// Classify a day's feels-like temperature extremes.
///
/// The minimum decides the cold bands; once the minimum is at least 10°C the
/// maximum decides between fair, warm and hot. A boundary value belongs to the
/// higher band. Inputs that match no rule (max below 10 with min at or above
/// 10, or NaN) are rejected instead of being guessed.
pub fn classify(min_temp: f64, max_temp: f64) -> Result<WeatherBand, ClassifyError> {
    if min_temp.is_nan() || max_temp.is_nan() {
        return Err(ClassifyError::InvalidRange {
            min: min_temp,
            max: max_temp,
        });
    }

    if min_temp <= 0.0 {
        Ok(WeatherBand::Freezing)
    } else if min_temp < 10.0 {
        Ok(WeatherBand::Cold)
    } else if (10.0..20.0).contains(&max_temp) {
        Ok(WeatherBand::Fair)
    } else if (20.0..25.0).contains(&max_temp) {
        Ok(WeatherBand::Warm)
    } else if max_temp >= 25.0 {
        Ok(WeatherBand::Hot)
    } else {
        Err(ClassifyError::InvalidRange {
            min: min_temp,
            max: max_temp,
        })
    }
}
