use rand::{rngs::StdRng, Rng};
use shared::{
    domain::{GameMode, WinnerPick},
    error::{Outcome, Rejection},
    protocol::{WheelEvent, WheelFrame},
};
use storage::KeyValueStore;
use tracing::debug;

use crate::{
    animator::{AnimationStep, Clock, SliceCrossing, SpinAnimator, TokioClock},
    machine::GameStateMachine,
    roster::ImportSummary,
    settings::WheelSettings,
    slices::{wheel_frame, SliceMapper},
    spinner::RandomSpinner,
};

/// Receives cue moments: sound, confetti, volume ducking and the like.
pub trait WheelHooks {
    fn on_event(&mut self, event: &WheelEvent);
}

impl WheelHooks for () {
    fn on_event(&mut self, _event: &WheelEvent) {}
}

impl WheelHooks for Vec<WheelEvent> {
    fn on_event(&mut self, event: &WheelEvent) {
        self.push(event.clone());
    }
}

/// The wheel as a host sees it: game state plus the spin currently in flight.
pub struct Wheel<S, R = StdRng, C = TokioClock, H = ()> {
    machine: GameStateMachine<S>,
    spinner: RandomSpinner<R>,
    clock: C,
    hooks: H,
    settings: WheelSettings,
    rotation_degrees: f64,
    animator: Option<SpinAnimator>,
}

impl<S, R, C, H> Wheel<S, R, C, H>
where
    S: KeyValueStore,
    R: Rng,
    C: Clock,
    H: WheelHooks,
{
    pub fn new(
        machine: GameStateMachine<S>,
        spinner: RandomSpinner<R>,
        clock: C,
        hooks: H,
        settings: WheelSettings,
    ) -> Self {
        Self {
            machine,
            spinner,
            clock,
            hooks,
            settings,
            rotation_degrees: 0.0,
            animator: None,
        }
    }

    pub fn machine(&self) -> &GameStateMachine<S> {
        &self.machine
    }

    pub fn hooks(&self) -> &H {
        &self.hooks
    }

    pub fn hooks_mut(&mut self) -> &mut H {
        &mut self.hooks
    }

    pub fn settings(&self) -> &WheelSettings {
        &self.settings
    }

    pub fn rotation_degrees(&self) -> f64 {
        self.rotation_degrees
    }

    pub fn is_spinning(&self) -> bool {
        self.animator.is_some()
    }

    pub fn winner(&self) -> Option<&WinnerPick> {
        self.machine.winner()
    }

    pub fn frame(&self) -> WheelFrame {
        wheel_frame(
            self.machine.participants(),
            self.rotation_degrees,
            &self.settings,
        )
    }

    pub fn spin(&mut self) -> Outcome {
        if self.animator.is_some() {
            return Outcome::Ignored(Rejection::AlreadySpinning);
        }
        let outcome = self.machine.spin();
        if !outcome.is_applied() {
            return outcome;
        }
        let Some(mapper) = SliceMapper::with_pointer(
            self.machine.participants().len(),
            self.settings.pointer_degrees,
        ) else {
            let _ = self.machine.cancel_spin();
            return Outcome::Ignored(Rejection::NoParticipants);
        };

        let plan = self.spinner.plan();
        self.animator = Some(SpinAnimator::start(
            mapper,
            self.rotation_degrees,
            plan,
            self.settings.cue_thresholds(),
            self.clock.now(),
        ));
        self.emit(WheelEvent::SpinStarted {
            mode: self.machine.mode(),
            duration_ms: plan.duration.as_millis() as u64,
            total_rotation_degrees: plan.total_rotation_degrees,
        });
        outcome
    }

    /// One animation step. Returns the frame to paint, or `None` when idle.
    pub fn tick(&mut self) -> Option<WheelFrame> {
        let now = self.clock.now();
        let step = self.animator.as_mut()?.step(now)?;

        match step {
            AnimationStep::Running {
                rotation_degrees,
                progress,
                crossing,
            } => {
                self.rotation_degrees = rotation_degrees;
                self.emit_crossing(crossing, progress);
            }
            AnimationStep::Finished {
                rotation_degrees,
                crossing,
                winner_index,
            } => {
                self.rotation_degrees = rotation_degrees;
                self.emit_crossing(crossing, 1.0);
                self.animator = None;
                if self.machine.complete_spin(winner_index).is_applied() {
                    if let Some(pick) = self.machine.winner().cloned() {
                        self.emit(WheelEvent::SpinCompleted {
                            winner: pick.name,
                            index: pick.index,
                        });
                    }
                }
            }
        }

        Some(self.frame())
    }

    /// Tears down the in-flight spin; no completion will follow.
    pub fn cancel_spin(&mut self) -> Outcome {
        if self.animator.take().is_none() {
            return Outcome::Ignored(Rejection::NotSpinning);
        }
        let _ = self.machine.cancel_spin();
        self.emit(WheelEvent::SpinCancelled);
        Outcome::Applied
    }

    pub fn confirm_and_continue(&mut self) -> Outcome {
        let outcome = self.machine.confirm_and_continue();
        if outcome.is_applied() {
            self.emit(WheelEvent::ResultDismissed);
            if self.machine.is_game_over() {
                self.emit(WheelEvent::ListEmptied {
                    mode: self.machine.mode(),
                });
            }
        }
        outcome
    }

    pub fn retry_spin(&mut self) -> Outcome {
        let outcome = self.machine.retry_spin();
        if outcome.is_applied() {
            self.emit(WheelEvent::ResultDismissed);
        }
        outcome
    }

    /// Clears the active mode. The wheel returns to its resting angle.
    pub fn reset(&mut self) -> Outcome {
        let _ = self.cancel_spin();
        let outcome = self.machine.reset();
        if outcome.is_applied() {
            self.rotation_degrees = 0.0;
        }
        outcome
    }

    pub fn undo(&mut self) -> Outcome {
        self.machine.undo()
    }

    pub fn switch_mode(&mut self, mode: GameMode) -> Outcome {
        let outcome = self.machine.switch_mode(mode);
        if outcome.is_applied() {
            self.rotation_degrees = 0.0;
        }
        outcome
    }

    pub fn add_participant(&mut self, name: &str) -> Outcome {
        self.machine.add_participant(name)
    }

    pub fn remove_participant(&mut self, index: usize) -> Outcome {
        self.machine.remove_participant(index)
    }

    pub fn import_participants(&mut self, text: &str) -> Result<ImportSummary, Rejection> {
        self.machine.import_participants(text)
    }

    fn emit_crossing(&mut self, crossing: Option<SliceCrossing>, progress: f64) {
        if let Some(crossing) = crossing {
            self.emit(WheelEvent::SliceCrossed {
                slice_index: crossing.slice_index,
                progress,
                cue: crossing.cue,
            });
        }
    }

    fn emit(&mut self, event: WheelEvent) {
        debug!(?event, "wheel event");
        self.hooks.on_event(&event);
    }
}

#[cfg(test)]
#[path = "tests/wheel_tests.rs"]
mod tests;
