//! Selection of the lighting pattern for a day summary.

use serde::Serialize;
use std::fmt;

use super::palette::Palette;
use crate::weather::{classify, ClassifyError, DaySummary};

/// Pulse length when heavy rain or heavy snow is expected.
pub const HEAVY_PULSE_MS: u32 = 200;

/// Pulse length for ordinary precipitation.
pub const LIGHT_PULSE_MS: u32 = 2000;

/// Brightness used for steady colors, in percent.
pub const FULL_BRIGHTNESS: u8 = 100;

/// What every device is asked to render for the day.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LightingPattern {
    SteadyColor {
        hue: u16,
        saturation: u8,
        brightness: u8,
        hold_duration_secs: u32,
    },
    PulseEffect {
        red: u8,
        green: u8,
        blue: u8,
        pulse_duration_ms: u32,
        repeat_count: u32,
    },
}

impl fmt::Display for LightingPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LightingPattern::SteadyColor {
                hue,
                saturation,
                brightness,
                hold_duration_secs,
            } => write!(
                f,
                "steady hue={} sat={} bright={} for {}s",
                hue, saturation, brightness, hold_duration_secs
            ),
            LightingPattern::PulseEffect {
                red,
                green,
                blue,
                pulse_duration_ms,
                repeat_count,
            } => write!(
                f,
                "pulse rgb=({},{},{}) every {}ms x{}",
                red, green, blue, pulse_duration_ms, repeat_count
            ),
        }
    }
}

/// Choose the pattern for a day.
///
/// Precipitation always wins over temperature: a wet day pulses the rain
/// color, fast when heavy rain or snow is expected. A dry day holds the
/// band's color for `base_hold_secs`.
pub fn select_pattern(
    summary: &DaySummary,
    base_hold_secs: u32,
    palette: &Palette,
) -> Result<LightingPattern, ClassifyError> {
    if summary.precipitation {
        let pulse_duration_ms = if summary.heavy_rain || summary.heavy_snow {
            HEAVY_PULSE_MS
        } else {
            LIGHT_PULSE_MS
        };
        let repeat_count =
            (u64::from(base_hold_secs) * 1000 / u64::from(pulse_duration_ms)).max(1);

        return Ok(LightingPattern::PulseEffect {
            red: palette.rain.red,
            green: palette.rain.green,
            blue: palette.rain.blue,
            pulse_duration_ms,
            repeat_count: u32::try_from(repeat_count).unwrap_or(u32::MAX),
        });
    }

    let band = classify(summary.min_temp, summary.max_temp)?;
    let color = palette.color_for(band);
    log::debug!("No precipitation, rendering {} band", band);

    Ok(LightingPattern::SteadyColor {
        hue: color.hue,
        saturation: color.saturation,
        brightness: FULL_BRIGHTNESS,
        hold_duration_secs: base_hold_secs,
    })
}
