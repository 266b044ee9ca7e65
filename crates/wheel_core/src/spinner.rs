use std::time::Duration;

use rand::{rngs::StdRng, Rng, SeedableRng};
use tracing::warn;

/// Target of one spin: how long to animate and how far to turn.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpinPlan {
    pub duration: Duration,
    pub total_rotation_degrees: f64,
}

impl SpinPlan {
    pub fn full_turns(&self) -> f64 {
        self.total_rotation_degrees / 360.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpinRanges {
    pub min_duration_ms: f64,
    pub duration_spread_ms: f64,
    pub min_turns: f64,
    pub turn_spread: f64,
}

impl Default for SpinRanges {
    fn default() -> Self {
        Self {
            min_duration_ms: 6000.0,
            duration_spread_ms: 2000.0,
            min_turns: 6.0,
            turn_spread: 4.0,
        }
    }
}

pub struct RandomSpinner<R = StdRng> {
    rng: R,
    ranges: SpinRanges,
}

impl RandomSpinner<StdRng> {
    pub fn from_entropy(ranges: SpinRanges) -> Self {
        Self::with_rng(StdRng::from_os_rng(), ranges)
    }

    pub fn seeded(seed: u64, ranges: SpinRanges) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed), ranges)
    }
}

impl<R: Rng> RandomSpinner<R> {
    pub fn with_rng(rng: R, ranges: SpinRanges) -> Self {
        Self { rng, ranges }
    }

    pub fn ranges(&self) -> &SpinRanges {
        &self.ranges
    }

    /// Three independent uniform draws: duration, whole-and-fractional turns,
    /// and a final offset in `[0, 360)` that makes the resting angle uniform.
    pub fn plan(&mut self) -> SpinPlan {
        let duration_ms =
            self.ranges.min_duration_ms + self.rng.random::<f64>() * self.ranges.duration_spread_ms;
        let turns = self.ranges.min_turns + self.rng.random::<f64>() * self.ranges.turn_spread;
        let offset = self.rng.random::<f64>() * 360.0;

        let duration =
            Duration::try_from_secs_f64(duration_ms.max(0.0) / 1000.0).unwrap_or_else(|err| {
                let fallback = SpinRanges::default().min_duration_ms;
                warn!(duration_ms, error = %err, fallback, "spin duration out of range");
                Duration::from_secs_f64(fallback / 1000.0)
            });

        let mut total_rotation_degrees = 360.0 * turns + offset;
        if !total_rotation_degrees.is_finite() {
            let fallback = SpinRanges::default().min_turns;
            warn!(turns, fallback, "spin turns out of range");
            total_rotation_degrees = 360.0 * fallback + offset;
        }

        SpinPlan {
            duration,
            total_rotation_degrees,
        }
    }
}

#[cfg(test)]
#[path = "tests/spinner_tests.rs"]
mod tests;
