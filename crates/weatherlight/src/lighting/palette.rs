//! Colors used to render each weather condition.

use serde::{Deserialize, Serialize};

use crate::weather::WeatherBand;

/// Hue (degrees, 0-359) and saturation (percent, 0-100).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HueSat {
    pub hue: u16,
    pub saturation: u8,
}

/// 8-bit RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgb {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
}

/// Band to color table plus the color pulsed for precipitation.
///
/// Hot and warm share the red family and differ by saturation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Palette {
    #[serde(default = "default_hot")]
    pub hot: HueSat,
    #[serde(default = "default_warm")]
    pub warm: HueSat,
    #[serde(default = "default_fair")]
    pub fair: HueSat,
    #[serde(default = "default_cold")]
    pub cold: HueSat,
    #[serde(default = "default_freezing")]
    pub freezing: HueSat,
    /// Pulsed when rain or snow is likely.
    #[serde(default = "default_rain")]
    pub rain: Rgb,
}

fn default_hot() -> HueSat {
    HueSat { hue: 10, saturation: 100 }
}

fn default_warm() -> HueSat {
    HueSat { hue: 10, saturation: 41 }
}

fn default_fair() -> HueSat {
    HueSat { hue: 50, saturation: 100 }
}

fn default_cold() -> HueSat {
    HueSat { hue: 180, saturation: 100 }
}

fn default_freezing() -> HueSat {
    HueSat { hue: 240, saturation: 100 }
}

fn default_rain() -> Rgb {
    Rgb {
        red: 160,
        green: 200,
        blue: 255,
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            hot: default_hot(),
            warm: default_warm(),
            fair: default_fair(),
            cold: default_cold(),
            freezing: default_freezing(),
            rain: default_rain(),
        }
    }
}

impl Palette {
    pub fn color_for(&self, band: WeatherBand) -> HueSat {
        match band {
            WeatherBand::Hot => self.hot,
            WeatherBand::Warm => self.warm,
            WeatherBand::Fair => self.fair,
            WeatherBand::Cold => self.cold,
            WeatherBand::Freezing => self.freezing,
        }
    }

    /// Check that every hue is below 360 and every saturation at most 100.
    pub fn validate(&self) -> Result<(), String> {
        for band in WeatherBand::ALL {
            let color = self.color_for(band);
            if color.hue >= 360 {
                return Err(format!("{} hue {} must be in 0..360", band, color.hue));
            }
            if color.saturation > 100 {
                return Err(format!(
                    "{} saturation {} must be at most 100",
                    band, color.saturation
                ));
            }
        }
        Ok(())
    }
}
