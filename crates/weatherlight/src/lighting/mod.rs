//! Mapping from a day summary to a lighting pattern.

mod palette;
mod pattern;

pub use palette::{HueSat, Palette, Rgb};
pub use pattern::{select_pattern, LightingPattern, FULL_BRIGHTNESS, HEAVY_PULSE_MS, LIGHT_PULSE_MS};
