use std::{f64::consts::TAU, ops::Range};

use shared::protocol::{SliceView, WheelFrame};

use crate::settings::WheelSettings;

pub const DEFAULT_POINTER_DEGREES: f64 = 270.0;

/// Equal-slice geometry for a non-empty wheel and pointer resolution.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SliceMapper {
    count: usize,
    pointer_degrees: f64,
}

impl SliceMapper {
    pub fn new(count: usize) -> Option<Self> {
        Self::with_pointer(count, DEFAULT_POINTER_DEGREES)
    }

    /// `None` for an empty wheel: there is nothing to resolve against.
    pub fn with_pointer(count: usize, pointer_degrees: f64) -> Option<Self> {
        (count > 0).then_some(Self {
            count,
            pointer_degrees,
        })
    }

    pub fn count(&self) -> usize {
        self.count
    }

    pub fn pointer_degrees(&self) -> f64 {
        self.pointer_degrees
    }

    pub fn slice_angle(&self) -> f64 {
        TAU / self.count as f64
    }

    pub fn slice_angle_degrees(&self) -> f64 {
        360.0 / self.count as f64
    }

    pub fn angle_of(&self, index: usize) -> f64 {
        index as f64 * self.slice_angle()
    }

    pub fn span_of(&self, index: usize) -> Range<f64> {
        let start = self.angle_of(index);
        start..start + self.slice_angle()
    }

    /// Index of the slice under the pointer after a cumulative rotation.
    pub fn resolve_degrees(&self, rotation_degrees: f64) -> usize {
        let normalized = normalize_degrees(rotation_degrees);
        let at_pointer = normalize_degrees(self.pointer_degrees - normalized);
        let slot = (at_pointer / self.slice_angle_degrees()).floor();
        // `as` saturates, and the modulo folds the 360-epsilon rounding case back to 0.
        (slot as usize) % self.count
    }

    pub fn resolve(&self, rotation_radians: f64) -> usize {
        self.resolve_degrees(rotation_radians.to_degrees())
    }
}

/// Maps any angle into `[0, 360)`.
pub fn normalize_degrees(degrees: f64) -> f64 {
    let wrapped = degrees.rem_euclid(360.0);
    if wrapped >= 360.0 {
        0.0
    } else {
        wrapped
    }
}

pub fn display_label(name: &str, max_chars: usize) -> String {
    if name.chars().count() > max_chars {
        let head: String = name.chars().take(max_chars).collect();
        format!("{head}...")
    } else {
        name.to_string()
    }
}

pub fn wheel_frame(
    participants: &[String],
    rotation_degrees: f64,
    settings: &WheelSettings,
) -> WheelFrame {
    let rotation_radians = rotation_degrees.to_radians();
    let slices = match SliceMapper::with_pointer(participants.len(), settings.pointer_degrees) {
        Some(mapper) => participants
            .iter()
            .enumerate()
            .map(|(index, name)| {
                let span = mapper.span_of(index);
                SliceView {
                    index,
                    label: display_label(name, settings.label_max_chars),
                    start_angle: span.start + rotation_radians,
                    end_angle: span.end + rotation_radians,
                    palette_index: index % settings.palette_size.max(1),
                }
            })
            .collect(),
        None => Vec::new(),
    };

    WheelFrame {
        rotation_radians,
        slices,
    }
}

#[cfg(test)]
#[path = "tests/slices_tests.rs"]
mod tests;
