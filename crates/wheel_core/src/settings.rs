use serde::{Deserialize, Serialize};

use crate::{animator::CueThresholds, slices::DEFAULT_POINTER_DEGREES, spinner::SpinRanges};

pub const DEFAULT_LABEL_MAX_CHARS: usize = 12;
pub const DEFAULT_PALETTE_SIZE: usize = 6;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WheelSettings {
    /// Where the pointer sits, in degrees with 0 at the right and angles
    /// growing clockwise. 270 is the top of the wheel.
    pub pointer_degrees: f64,
    pub min_duration_ms: f64,
    pub duration_spread_ms: f64,
    pub min_turns: f64,
    pub turn_spread: f64,
    pub tick_cue_until: f64,
    pub slowdown_cue_until: f64,
    pub label_max_chars: usize,
    pub palette_size: usize,
}

impl Default for WheelSettings {
    fn default() -> Self {
        Self {
            pointer_degrees: DEFAULT_POINTER_DEGREES,
            min_duration_ms: 6000.0,
            duration_spread_ms: 2000.0,
            min_turns: 6.0,
            turn_spread: 4.0,
            tick_cue_until: 0.7,
            slowdown_cue_until: 0.9,
            label_max_chars: DEFAULT_LABEL_MAX_CHARS,
            palette_size: DEFAULT_PALETTE_SIZE,
        }
    }
}

impl WheelSettings {
    pub fn spin_ranges(&self) -> SpinRanges {
        SpinRanges {
            min_duration_ms: self.min_duration_ms,
            duration_spread_ms: self.duration_spread_ms,
            min_turns: self.min_turns,
            turn_spread: self.turn_spread,
        }
    }

    pub fn cue_thresholds(&self) -> CueThresholds {
        CueThresholds {
            tick_until: self.tick_cue_until,
            slowdown_until: self.slowdown_cue_until,
        }
    }
}
