use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Reason a requested transition was ignored. None of these are failures;
/// the game simply stays where it was.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rejection {
    #[error("a spin is already in flight")]
    AlreadySpinning,
    #[error("no spin is in flight")]
    NotSpinning,
    #[error("there are no participants to spin")]
    NoParticipants,
    #[error("a winner is waiting to be confirmed or re-spun")]
    WinnerPending,
    #[error("no winner is being shown")]
    NoWinnerShown,
    #[error("the game is over; reset to start again")]
    GameOver,
    #[error("there is nothing to undo")]
    NoUndoSnapshot,
    #[error("name is empty")]
    EmptyName,
    #[error("name is already on the wheel")]
    DuplicateName,
    #[error("no participant at that position")]
    IndexOutOfRange,
    #[error("mode can only change while the wheel is empty")]
    ModeLocked,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "reason", rename_all = "snake_case")]
#[must_use]
pub enum Outcome {
    Applied,
    Ignored(Rejection),
}

impl Outcome {
    pub fn is_applied(self) -> bool {
        matches!(self, Outcome::Applied)
    }

    pub fn rejection(self) -> Option<Rejection> {
        match self {
            Outcome::Applied => None,
            Outcome::Ignored(reason) => Some(reason),
        }
    }
}

impl From<Result<(), Rejection>> for Outcome {
    fn from(value: Result<(), Rejection>) -> Self {
        match value {
            Ok(()) => Outcome::Applied,
            Err(reason) => Outcome::Ignored(reason),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown game mode '{value}' (expected 'employee' or 'executive')")]
pub struct ParseModeError {
    pub value: String,
}
