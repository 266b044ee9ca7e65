//! Frame loop that plays a spin out on a tokio interval.

use std::time::Duration;

use rand::Rng;
use shared::{domain::WinnerPick, protocol::WheelFrame};
use storage::KeyValueStore;
use tokio::time::{self, MissedTickBehavior};
use tracing::debug;

use crate::{
    animator::Clock,
    wheel::{Wheel, WheelHooks},
};

pub const DEFAULT_FRAME_INTERVAL: Duration = Duration::from_millis(16);

/// Steps `wheel` once per frame until the spin in flight settles, handing each
/// frame to `paint`. Returns the winner on completion.
///
/// Dropping the future mid-spin (a lost `select!`, a timeout) cancels the
/// spin, so no completion can surface afterwards.
pub async fn drive_spin<S, R, C, H, F>(
    wheel: &mut Wheel<S, R, C, H>,
    frame_interval: Duration,
    mut paint: F,
) -> Option<WinnerPick>
where
    S: KeyValueStore,
    R: Rng,
    C: Clock,
    H: WheelHooks,
    F: FnMut(&WheelFrame),
{
    let guard = CancelOnDrop { wheel };
    let mut ticker = time::interval(frame_interval.max(Duration::from_millis(1)));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    while guard.wheel.is_spinning() {
        ticker.tick().await;
        if let Some(frame) = guard.wheel.tick() {
            paint(&frame);
        }
    }

    guard.wheel.winner().cloned()
}

struct CancelOnDrop<'a, S, R, C, H>
where
    S: KeyValueStore,
    R: Rng,
    C: Clock,
    H: WheelHooks,
{
    wheel: &'a mut Wheel<S, R, C, H>,
}

impl<S, R, C, H> Drop for CancelOnDrop<'_, S, R, C, H>
where
    S: KeyValueStore,
    R: Rng,
    C: Clock,
    H: WheelHooks,
{
    fn drop(&mut self) {
        if self.wheel.is_spinning() {
            debug!("frame loop dropped mid-spin; cancelling");
            let _ = self.wheel.cancel_spin();
        }
    }
}

#[cfg(test)]
#[path = "tests/driver_tests.rs"]
mod tests;
