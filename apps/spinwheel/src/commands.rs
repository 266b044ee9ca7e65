//! Line commands understood by `spinwheel play`.

use shared::{domain::GameMode, error::ParseModeError};
use thiserror::Error;

pub const HELP: &str = "\
commands:
  spin | s              spin the wheel
  confirm | c           remove the shown winner and continue
  retry | r             put the shown winner back and spin again later
  add <name>            add a participant
  remove <n> | rm <n>   remove participant number n
  list | ls             show the wheel
  undo | u              restore the list before the last removal
  reset                 clear the current mode
  mode [employee|executive]
  help | ?              this text
  quit | q";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlayCommand {
    Spin,
    Confirm,
    Retry,
    Add(String),
    Remove(usize),
    List,
    Undo,
    Reset,
    Mode(Option<GameMode>),
    Help,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error("unknown command '{0}' (try 'help')")]
    Unknown(String),
    #[error("'{0}' needs an argument")]
    MissingArgument(&'static str),
    #[error("expected a participant number starting at 1, got '{0}'")]
    BadPosition(String),
    #[error(transparent)]
    Mode(#[from] ParseModeError),
}

/// Parses one input line. Blank lines parse to `None`.
pub fn parse_line(line: &str) -> Result<Option<PlayCommand>, CommandError> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }

    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };

    let command = match word.to_ascii_lowercase().as_str() {
        "spin" | "s" => PlayCommand::Spin,
        "confirm" | "c" | "ok" => PlayCommand::Confirm,
        "retry" | "r" => PlayCommand::Retry,
        "add" | "a" => {
            if rest.is_empty() {
                return Err(CommandError::MissingArgument("add"));
            }
            PlayCommand::Add(rest.to_string())
        }
        "remove" | "rm" => {
            if rest.is_empty() {
                return Err(CommandError::MissingArgument("remove"));
            }
            PlayCommand::Remove(parse_position(rest)?)
        }
        "list" | "ls" => PlayCommand::List,
        "undo" | "u" => PlayCommand::Undo,
        "reset" => PlayCommand::Reset,
        "mode" if rest.is_empty() => PlayCommand::Mode(None),
        "mode" => PlayCommand::Mode(Some(rest.to_ascii_lowercase().parse()?)),
        "help" | "?" => PlayCommand::Help,
        "quit" | "q" | "exit" => PlayCommand::Quit,
        _ => return Err(CommandError::Unknown(word.to_string())),
    };

    Ok(Some(command))
}

/// Turns a 1-based participant number into a list index.
pub fn parse_position(raw: &str) -> Result<usize, CommandError> {
    raw.trim()
        .parse::<usize>()
        .ok()
        .and_then(|position| position.checked_sub(1))
        .ok_or_else(|| CommandError::BadPosition(raw.trim().to_string()))
}

#[cfg(test)]
#[path = "tests/commands_tests.rs"]
mod tests;
