use serde::{Deserialize, Serialize};

use crate::domain::GameMode;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Cue {
    Tick,
    SlowDown,
}

/// Moments a host may hook sound or visuals onto.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "snake_case")]
pub enum WheelEvent {
    SpinStarted {
        mode: GameMode,
        duration_ms: u64,
        total_rotation_degrees: f64,
    },
    SliceCrossed {
        slice_index: usize,
        progress: f64,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        cue: Option<Cue>,
    },
    SpinCompleted {
        winner: String,
        index: usize,
    },
    SpinCancelled,
    ResultDismissed,
    ListEmptied {
        mode: GameMode,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SliceView {
    pub index: usize,
    pub label: String,
    pub start_angle: f64,
    pub end_angle: f64,
    pub palette_index: usize,
}

/// Everything a painter needs for one frame; angles are radians and already
/// include the current rotation offset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WheelFrame {
    pub rotation_radians: f64,
    pub slices: Vec<SliceView>,
}
