use shared::{
    domain::{GameMode, GameSnapshot, WinnerPick},
    error::{Outcome, Rejection},
};
use storage::{GameStore, KeyValueStore};
use tracing::{debug, info, warn};

use crate::roster::{ImportSummary, Roster};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Spinning,
    WinnerShown(WinnerPick),
    GameOver,
}

/// Game progression for the active mode. Every mutation of the roster,
/// game-over flag or undo slot is mirrored to the store.
#[derive(Debug)]
pub struct GameStateMachine<S> {
    store: GameStore<S>,
    mode: GameMode,
    roster: Roster,
    is_game_over: bool,
    phase: Phase,
    undo: Option<GameSnapshot>,
}

impl<S: KeyValueStore> GameStateMachine<S> {
    pub fn new(store: GameStore<S>) -> Self {
        let mode = store.load_active_mode().unwrap_or_default();
        let mut machine = Self {
            store,
            mode,
            roster: Roster::new(),
            is_game_over: false,
            phase: Phase::Idle,
            undo: None,
        };
        machine.load_mode_state();
        machine
    }

    pub fn mode(&self) -> GameMode {
        self.mode
    }

    pub fn participants(&self) -> &[String] {
        self.roster.names()
    }

    pub fn is_game_over(&self) -> bool {
        self.is_game_over
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    pub fn is_spinning(&self) -> bool {
        self.phase == Phase::Spinning
    }

    pub fn winner(&self) -> Option<&WinnerPick> {
        match &self.phase {
            Phase::WinnerShown(pick) => Some(pick),
            _ => None,
        }
    }

    pub fn can_undo(&self) -> bool {
        self.undo.is_some()
    }

    pub fn undo_snapshot(&self) -> Option<&GameSnapshot> {
        self.undo.as_ref()
    }

    pub fn snapshot(&self) -> GameSnapshot {
        GameSnapshot::new(self.roster.to_vec(), self.is_game_over)
    }

    pub fn store(&self) -> &GameStore<S> {
        &self.store
    }

    pub fn into_store(self) -> GameStore<S> {
        self.store
    }

    pub fn spin(&mut self) -> Outcome {
        let result = match self.phase {
            Phase::Spinning => Err(Rejection::AlreadySpinning),
            Phase::WinnerShown(_) => Err(Rejection::WinnerPending),
            Phase::GameOver => Err(Rejection::GameOver),
            Phase::Idle if self.roster.is_empty() => Err(Rejection::NoParticipants),
            Phase::Idle => {
                self.phase = Phase::Spinning;
                info!(mode = %self.mode, participants = self.roster.len(), "spin started");
                Ok(())
            }
        };
        self.settle("spin", result)
    }

    /// Records the animator's result. Only meaningful while spinning.
    pub fn complete_spin(&mut self, index: usize) -> Outcome {
        let result = if self.phase != Phase::Spinning {
            Err(Rejection::NotSpinning)
        } else {
            match self.roster.get(index) {
                Some(name) => {
                    let pick = WinnerPick {
                        name: name.to_string(),
                        index,
                    };
                    info!(mode = %self.mode, winner = %pick.name, index, "winner selected");
                    self.phase = Phase::WinnerShown(pick);
                    Ok(())
                }
                None => Err(Rejection::IndexOutOfRange),
            }
        };
        self.settle("complete_spin", result)
    }

    /// Drops an in-flight spin without recording anything.
    pub fn cancel_spin(&mut self) -> Outcome {
        let result = if self.phase == Phase::Spinning {
            self.phase = Phase::Idle;
            info!(mode = %self.mode, "spin cancelled");
            Ok(())
        } else {
            Err(Rejection::NotSpinning)
        };
        self.settle("cancel_spin", result)
    }

    pub fn confirm_and_continue(&mut self) -> Outcome {
        let result = match &self.phase {
            Phase::WinnerShown(pick) => {
                let index = pick.index;
                let previous = self.snapshot();
                self.store.save_undo(self.mode, &previous);
                self.undo = Some(previous);

                let removed = self.roster.remove(index);
                if self.roster.is_empty() {
                    self.is_game_over = true;
                    self.phase = Phase::GameOver;
                } else {
                    self.phase = Phase::Idle;
                }
                self.persist();
                info!(
                    mode = %self.mode,
                    removed = removed.as_deref().unwrap_or_default(),
                    remaining = self.roster.len(),
                    game_over = self.is_game_over,
                    "winner removed"
                );
                Ok(())
            }
            _ => Err(Rejection::NoWinnerShown),
        };
        self.settle("confirm_and_continue", result)
    }

    /// "Got my own name": dismiss the winner and keep everyone on the wheel.
    pub fn retry_spin(&mut self) -> Outcome {
        let result = match self.phase {
            Phase::WinnerShown(_) => {
                self.phase = Phase::Idle;
                Ok(())
            }
            _ => Err(Rejection::NoWinnerShown),
        };
        self.settle("retry_spin", result)
    }

    pub fn reset(&mut self) -> Outcome {
        self.roster.clear();
        self.is_game_over = false;
        self.undo = None;
        self.phase = Phase::Idle;
        self.store.clear(self.mode);
        info!(mode = %self.mode, "game reset");
        Outcome::Applied
    }

    pub fn undo(&mut self) -> Outcome {
        let result = if self.phase == Phase::Spinning {
            Err(Rejection::AlreadySpinning)
        } else {
            match self.undo.take() {
                Some(previous) => {
                    self.store.clear_undo(self.mode);
                    self.roster = Roster::from_names(previous.participants);
                    self.is_game_over = previous.is_game_over && self.roster.is_empty();
                    self.phase = if self.is_game_over {
                        Phase::GameOver
                    } else {
                        Phase::Idle
                    };
                    self.persist();
                    info!(mode = %self.mode, participants = self.roster.len(), "undo applied");
                    Ok(())
                }
                None => Err(Rejection::NoUndoSnapshot),
            }
        };
        self.settle("undo", result)
    }

    /// Loads `mode`'s stored game as the live one. Allowed only between games.
    pub fn switch_mode(&mut self, mode: GameMode) -> Outcome {
        let result = if self.phase == Phase::Spinning {
            Err(Rejection::AlreadySpinning)
        } else if !self.roster.is_empty() {
            Err(Rejection::ModeLocked)
        } else {
            self.mode = mode;
            self.store.save_active_mode(mode);
            self.load_mode_state();
            Ok(())
        };
        self.settle("switch_mode", result)
    }

    pub fn add_participant(&mut self, name: &str) -> Outcome {
        let result = match self.phase {
            Phase::Spinning => Err(Rejection::AlreadySpinning),
            Phase::GameOver => Err(Rejection::GameOver),
            Phase::Idle | Phase::WinnerShown(_) => self.roster.insert(name),
        };
        if result.is_ok() {
            self.persist();
        }
        self.settle("add_participant", result)
    }

    pub fn remove_participant(&mut self, index: usize) -> Outcome {
        let result = match self.phase {
            Phase::Spinning => Err(Rejection::AlreadySpinning),
            Phase::WinnerShown(_) => Err(Rejection::WinnerPending),
            Phase::GameOver => Err(Rejection::GameOver),
            Phase::Idle => match self.roster.remove(index) {
                Some(_) => {
                    self.persist();
                    Ok(())
                }
                None => Err(Rejection::IndexOutOfRange),
            },
        };
        self.settle("remove_participant", result)
    }

    pub fn import_participants(&mut self, text: &str) -> Result<ImportSummary, Rejection> {
        match self.phase {
            Phase::Spinning => return Err(Rejection::AlreadySpinning),
            Phase::GameOver => return Err(Rejection::GameOver),
            Phase::Idle | Phase::WinnerShown(_) => {}
        }
        let summary = self.roster.import(text);
        if summary.added > 0 {
            self.persist();
        }
        info!(mode = %self.mode, added = summary.added, skipped = summary.skipped, "names imported");
        Ok(summary)
    }

    fn load_mode_state(&mut self) {
        let stored = self.store.load(self.mode).unwrap_or_default();
        self.roster = Roster::from_names(stored.participants);
        if stored.is_game_over && !self.roster.is_empty() {
            warn!(
                mode = %self.mode,
                participants = self.roster.len(),
                "stored game-over flag with names left; resuming play"
            );
        }
        self.is_game_over = stored.is_game_over && self.roster.is_empty();
        self.undo = self.store.load_undo(self.mode);
        self.phase = if self.is_game_over {
            Phase::GameOver
        } else {
            Phase::Idle
        };
        info!(
            mode = %self.mode,
            participants = self.roster.len(),
            game_over = self.is_game_over,
            can_undo = self.undo.is_some(),
            "game state loaded"
        );
    }

    fn persist(&mut self) {
        let snapshot = self.snapshot();
        self.store.save(self.mode, &snapshot);
    }

    fn settle(&self, action: &'static str, result: Result<(), Rejection>) -> Outcome {
        if let Err(reason) = &result {
            debug!(action, mode = %self.mode, %reason, "transition ignored");
        }
        result.into()
    }
}

#[cfg(test)]
#[path = "tests/machine_tests.rs"]
mod tests;
