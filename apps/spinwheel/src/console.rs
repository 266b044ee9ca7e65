use std::io::{self, Write};

use serde::Serialize;
use shared::{
    domain::{GameMode, WinnerPick},
    protocol::{Cue, WheelEvent},
};
use tracing::warn;
use wheel_core::{Phase, WheelHooks};

/// Prints wheel events to stdout, either as text cues or one JSON object per line.
#[derive(Debug, Clone, Copy, Default)]
pub struct Console {
    json: bool,
}

impl Console {
    pub fn new(json: bool) -> Self {
        Self { json }
    }

    pub fn is_json(&self) -> bool {
        self.json
    }

    pub fn render(&self, event: &WheelEvent) -> Option<String> {
        if self.json {
            return match serde_json::to_string(event) {
                Ok(line) => Some(format!("{line}\n")),
                Err(err) => {
                    warn!(error = %err, "failed to encode wheel event");
                    None
                }
            };
        }

        match event {
            WheelEvent::SpinStarted {
                mode, duration_ms, ..
            } => Some(format!(
                "spinning the {mode} wheel for {:.1}s ",
                *duration_ms as f64 / 1000.0
            )),
            WheelEvent::SliceCrossed { cue, .. } => match cue {
                Some(Cue::Tick) => Some(".".into()),
                Some(Cue::SlowDown) => Some(":".into()),
                None => None,
            },
            WheelEvent::SpinCompleted { winner, index } => {
                Some(format!("\nwinner: {winner} (#{})\n", index + 1))
            }
            WheelEvent::SpinCancelled => Some("\nspin cancelled\n".into()),
            WheelEvent::ResultDismissed => None,
            WheelEvent::ListEmptied { mode } => Some(format!(
                "every {mode} participant has been drawn; reset or undo to go on\n"
            )),
        }
    }
}

impl WheelHooks for Console {
    fn on_event(&mut self, event: &WheelEvent) {
        if let Some(text) = self.render(event) {
            let mut out = io::stdout().lock();
            let _ = out.write_all(text.as_bytes());
            let _ = out.flush();
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Status<'a> {
    pub mode: GameMode,
    pub phase: &'static str,
    pub participants: &'a [String],
    pub is_game_over: bool,
    pub can_undo: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub winner: Option<&'a WinnerPick>,
}

pub fn phase_name(phase: &Phase) -> &'static str {
    match phase {
        Phase::Idle => "idle",
        Phase::Spinning => "spinning",
        Phase::WinnerShown(_) => "winner_shown",
        Phase::GameOver => "game_over",
    }
}

pub fn render_status(status: &Status<'_>, json: bool) -> String {
    if json {
        return match serde_json::to_string(status) {
            Ok(line) => line,
            Err(err) => {
                warn!(error = %err, "failed to encode status");
                String::new()
            }
        };
    }

    let mut text = format!(
        "{} wheel, {} participant(s)",
        status.mode,
        status.participants.len()
    );
    if status.is_game_over {
        text.push_str(", game over");
    }
    if status.can_undo {
        text.push_str(", undo available");
    }
    for (index, name) in status.participants.iter().enumerate() {
        let marker = match status.winner {
            Some(pick) if pick.index == index => " <- winner",
            _ => "",
        };
        text.push_str(&format!("\n  {:>3}. {name}{marker}", index + 1));
    }
    text
}

#[cfg(test)]
#[path = "tests/console_tests.rs"]
mod tests;
