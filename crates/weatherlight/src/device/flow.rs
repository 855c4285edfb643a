//! Color flows: the transition lists a light plays back on its own.

use crate::lighting::{LightingPattern, Rgb, FULL_BRIGHTNESS};

/// Shortest transition the bulbs accept.
const MIN_TRANSITION_MS: u32 = 50;

/// Length of the single transition used for a steady color.
const STEADY_TRANSITION_MS: u32 = 1000;

/// Brightness of the dark half of a pulse.
const PULSE_LOW_BRIGHTNESS: u8 = 1;

/// What the light does after the flow ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowAction {
    /// Return to the state before the flow started.
    Recover = 0,
}

/// One step of a flow: move to `color` at `brightness` over `duration_ms`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub duration_ms: u32,
    pub color: Rgb,
    pub brightness: u8,
}

impl Transition {
    /// Color mode in the bulb protocol.
    const MODE_COLOR: u8 = 1;

    fn expression(&self) -> String {
        let value = (u32::from(self.color.red) << 16)
            | (u32::from(self.color.green) << 8)
            | u32::from(self.color.blue);
        format!(
            "{},{},{},{}",
            self.duration_ms.max(MIN_TRANSITION_MS),
            Self::MODE_COLOR,
            value,
            self.brightness.clamp(1, 100)
        )
    }
}

/// An ordered transition list repeated `count` times.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Flow {
    pub count: u32,
    pub action: FlowAction,
    pub transitions: Vec<Transition>,
}

impl Flow {
    /// Translate a lighting pattern into the flow a device plays.
    pub fn from_pattern(pattern: &LightingPattern) -> Self {
        match *pattern {
            LightingPattern::SteadyColor {
                hue,
                saturation,
                brightness,
                hold_duration_secs,
            } => Flow {
                count: hold_duration_secs.max(1),
                action: FlowAction::Recover,
                transitions: vec![Transition {
                    duration_ms: STEADY_TRANSITION_MS,
                    color: hsv_to_rgb(hue, saturation),
                    brightness,
                }],
            },
            LightingPattern::PulseEffect {
                red,
                green,
                blue,
                pulse_duration_ms,
                repeat_count,
            } => {
                let color = Rgb { red, green, blue };
                let half = (pulse_duration_ms / 2).max(MIN_TRANSITION_MS);
                Flow {
                    count: repeat_count.max(1),
                    action: FlowAction::Recover,
                    transitions: vec![
                        Transition {
                            duration_ms: half,
                            color,
                            brightness: FULL_BRIGHTNESS,
                        },
                        Transition {
                            duration_ms: half,
                            color,
                            brightness: PULSE_LOW_BRIGHTNESS,
                        },
                    ],
                }
            }
        }
    }

    /// Number of visible state changes before the flow stops.
    ///
    /// The bulbs count individual transitions, not loops.
    pub fn state_changes(&self) -> u32 {
        self.count
            .saturating_mul(u32::try_from(self.transitions.len()).unwrap_or(u32::MAX))
    }

    /// Comma-joined `duration,mode,value,brightness` tuples.
    pub fn expression(&self) -> String {
        self.transitions
            .iter()
            .map(Transition::expression)
            .collect::<Vec<_>>()
            .join(",")
    }

    /// Total playback time in milliseconds.
    pub fn total_duration_ms(&self) -> u64 {
        let cycle: u64 = self
            .transitions
            .iter()
            .map(|t| u64::from(t.duration_ms.max(MIN_TRANSITION_MS)))
            .sum();
        cycle * u64::from(self.count)
    }
}

/// Convert hue (degrees) and saturation (percent) at full value to RGB.
pub fn hsv_to_rgb(hue: u16, saturation: u8) -> Rgb {
    let h = f64::from(hue % 360) / 60.0;
    let s = f64::from(saturation.min(100)) / 100.0;
    let v = 1.0;

    let sector = h.floor();
    let f = h - sector;
    let p = v * (1.0 - s);
    let q = v * (1.0 - s * f);
    let t = v * (1.0 - s * (1.0 - f));

    let (r, g, b) = match sector as u8 {
        0 => (v, t, p),
        1 => (q, v, p),
        2 => (p, v, t),
        3 => (p, q, v),
        4 => (t, p, v),
        _ => (v, p, q),
    };

    let channel = |c: f64| (c * 255.0) as u8;
    Rgb {
        red: channel(r),
        green: channel(g),
        blue: channel(b),
    }
}
