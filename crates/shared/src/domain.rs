use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::error::ParseModeError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameMode {
    #[default]
    Employee,
    Executive,
}

impl GameMode {
    pub const ALL: [GameMode; 2] = [GameMode::Employee, GameMode::Executive];

    pub fn as_str(self) -> &'static str {
        match self {
            GameMode::Employee => "employee",
            GameMode::Executive => "executive",
        }
    }
}

impl fmt::Display for GameMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GameMode {
    type Err = ParseModeError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim() {
            "employee" => Ok(GameMode::Employee),
            "executive" => Ok(GameMode::Executive),
            other => Err(ParseModeError {
                value: other.to_string(),
            }),
        }
    }
}

/// Persisted shape of one mode's game, also used for the undo slot.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameSnapshot {
    #[serde(alias = "names")]
    pub participants: Vec<String>,
    #[serde(default)]
    pub is_game_over: bool,
}

impl GameSnapshot {
    pub fn new(participants: Vec<String>, is_game_over: bool) -> Self {
        Self {
            participants,
            is_game_over,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WinnerPick {
    pub name: String,
    pub index: usize,
}
