use std::{
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc,
    },
    time::Duration,
};

use shared::protocol::Cue;

use crate::{slices::SliceMapper, spinner::SpinPlan};

/// Monotonic time source, measured from an arbitrary origin.
pub trait Clock {
    fn now(&self) -> Duration;
}

/// Reads `tokio::time::Instant`, so paused test runtimes control it too.
#[derive(Debug, Clone, Copy)]
pub struct TokioClock {
    origin: tokio::time::Instant,
}

impl TokioClock {
    pub fn new() -> Self {
        Self {
            origin: tokio::time::Instant::now(),
        }
    }
}

impl Default for TokioClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for TokioClock {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }
}

/// Hand-advanced clock; clones share the same reading.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    nanos: Arc<AtomicU64>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance(&self, by: Duration) {
        self.nanos.fetch_add(by.as_nanos() as u64, Ordering::SeqCst);
    }

    pub fn set(&self, to: Duration) {
        self.nanos.store(to.as_nanos() as u64, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Duration {
        Duration::from_nanos(self.nanos.load(Ordering::SeqCst))
    }
}

pub fn ease_out_quart(progress: f64) -> f64 {
    1.0 - (1.0 - progress).powi(4)
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CueThresholds {
    pub tick_until: f64,
    pub slowdown_until: f64,
}

impl Default for CueThresholds {
    fn default() -> Self {
        Self {
            tick_until: 0.7,
            slowdown_until: 0.9,
        }
    }
}

impl CueThresholds {
    pub fn cue_for(&self, progress: f64) -> Option<Cue> {
        if progress < self.tick_until {
            Some(Cue::Tick)
        } else if progress < self.slowdown_until {
            Some(Cue::SlowDown)
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SliceCrossing {
    pub slice_index: usize,
    pub cue: Option<Cue>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AnimationStep {
    Running {
        rotation_degrees: f64,
        progress: f64,
        crossing: Option<SliceCrossing>,
    },
    Finished {
        rotation_degrees: f64,
        crossing: Option<SliceCrossing>,
        winner_index: usize,
    },
}

/// One in-flight spin. Each step derives progress from the clock reading,
/// never from how many frames were drawn.
#[derive(Debug, Clone)]
pub struct SpinAnimator {
    mapper: SliceMapper,
    start_degrees: f64,
    total_degrees: f64,
    duration: Duration,
    started_at: Duration,
    last_slice: usize,
    cues: CueThresholds,
    finished: bool,
}

impl SpinAnimator {
    pub fn start(
        mapper: SliceMapper,
        start_degrees: f64,
        plan: SpinPlan,
        cues: CueThresholds,
        now: Duration,
    ) -> Self {
        Self {
            mapper,
            start_degrees,
            total_degrees: plan.total_rotation_degrees,
            duration: plan.duration,
            started_at: now,
            last_slice: mapper.resolve_degrees(start_degrees),
            cues,
            finished: false,
        }
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn target_degrees(&self) -> f64 {
        self.start_degrees + self.total_degrees
    }

    pub fn progress_at(&self, now: Duration) -> f64 {
        if self.duration.is_zero() {
            return 1.0;
        }
        let elapsed = now.saturating_sub(self.started_at);
        (elapsed.as_secs_f64() / self.duration.as_secs_f64()).clamp(0.0, 1.0)
    }

    pub fn rotation_at(&self, now: Duration) -> f64 {
        let progress = self.progress_at(now);
        if progress >= 1.0 {
            return self.target_degrees();
        }
        self.start_degrees + self.total_degrees * ease_out_quart(progress)
    }

    /// Advances to `now`. Returns `None` once the finishing step was taken.
    pub fn step(&mut self, now: Duration) -> Option<AnimationStep> {
        if self.finished {
            return None;
        }

        let progress = self.progress_at(now);
        let rotation_degrees = self.rotation_at(now);
        let slice_index = self.mapper.resolve_degrees(rotation_degrees);
        let crossing = (slice_index != self.last_slice).then(|| SliceCrossing {
            slice_index,
            cue: self.cues.cue_for(progress),
        });
        self.last_slice = slice_index;

        if progress >= 1.0 {
            self.finished = true;
            return Some(AnimationStep::Finished {
                rotation_degrees,
                crossing,
                winner_index: slice_index,
            });
        }

        Some(AnimationStep::Running {
            rotation_degrees,
            progress,
            crossing,
        })
    }
}

#[cfg(test)]
#[path = "tests/animator_tests.rs"]
mod tests;
