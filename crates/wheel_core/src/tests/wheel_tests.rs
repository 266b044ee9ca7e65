use std::time::Duration;

use rand::RngCore;
use shared::protocol::Cue;
use storage::{GameStore, MemoryStore};

use super::*;
use crate::animator::ManualClock;

/// Every draw is 0.0: 6 s, exactly six turns.
struct ZeroRng;

impl RngCore for ZeroRng {
    fn next_u32(&mut self) -> u32 {
        0
    }

    fn next_u64(&mut self) -> u64 {
        0
    }

    fn fill_bytes(&mut self, dst: &mut [u8]) {
        dst.fill(0);
    }
}

type TestWheel = Wheel<MemoryStore, ZeroRng, ManualClock, Vec<WheelEvent>>;

fn wheel_with(names: &[&str]) -> (TestWheel, ManualClock) {
    let clock = ManualClock::new();
    let settings = WheelSettings::default();
    let mut wheel = Wheel::new(
        GameStateMachine::new(GameStore::new(MemoryStore::new())),
        RandomSpinner::with_rng(ZeroRng, settings.spin_ranges()),
        clock.clone(),
        Vec::new(),
        settings,
    );
    for name in names {
        assert!(wheel.add_participant(name).is_applied());
    }
    (wheel, clock)
}

fn run_to_rest(wheel: &mut TestWheel, clock: &ManualClock) -> usize {
    let mut frames = 0;
    while wheel.is_spinning() {
        clock.advance(Duration::from_millis(16));
        if wheel.tick().is_some() {
            frames += 1;
        }
    }
    frames
}

fn completions(events: &[WheelEvent]) -> usize {
    events
        .iter()
        .filter(|event| matches!(event, WheelEvent::SpinCompleted { .. }))
        .count()
}

#[test]
fn spin_on_empty_wheel_is_a_silent_no_op() {
    let (mut wheel, _clock) = wheel_with(&[]);
    assert_eq!(wheel.spin(), Outcome::Ignored(Rejection::NoParticipants));
    assert!(!wheel.is_spinning());
    assert!(wheel.hooks().is_empty());
    assert_eq!(wheel.tick(), None);
}

#[test]
fn double_spin_produces_a_single_completion() {
    let (mut wheel, clock) = wheel_with(&["Alice", "Bob", "Carol"]);

    assert!(wheel.spin().is_applied());
    assert_eq!(wheel.spin(), Outcome::Ignored(Rejection::AlreadySpinning));
    let frames = run_to_rest(&mut wheel, &clock);

    assert!(frames > 300);
    let events = wheel.hooks();
    assert_eq!(completions(events), 1);
    assert!(matches!(events.first(), Some(WheelEvent::SpinStarted { .. })));
    assert_eq!(
        events.last(),
        Some(&WheelEvent::SpinCompleted {
            winner: "Carol".into(),
            index: 2
        })
    );
    assert_eq!(
        wheel.winner(),
        Some(&WinnerPick {
            name: "Carol".into(),
            index: 2
        })
    );
    assert_eq!(wheel.tick(), None);
}

#[test]
fn spin_started_reports_the_plan() {
    let (mut wheel, _clock) = wheel_with(&["Alice"]);
    assert!(wheel.spin().is_applied());
    assert_eq!(
        wheel.hooks().first(),
        Some(&WheelEvent::SpinStarted {
            mode: GameMode::Employee,
            duration_ms: 6000,
            total_rotation_degrees: 2160.0
        })
    );
}

#[test]
fn crossing_cues_slow_down_then_fall_silent() {
    let (mut wheel, clock) = wheel_with(&["A", "B", "C", "D", "E", "F", "G", "H"]);
    assert!(wheel.spin().is_applied());
    run_to_rest(&mut wheel, &clock);

    let cues: Vec<Option<Cue>> = wheel
        .hooks()
        .iter()
        .filter_map(|event| match event {
            WheelEvent::SliceCrossed { cue, .. } => Some(*cue),
            _ => None,
        })
        .collect();
    assert!(cues.len() >= 40);
    assert_eq!(cues.first(), Some(&Some(Cue::Tick)));
    let mut seen_slowdown = false;
    for cue in &cues {
        match cue {
            Some(Cue::Tick) => assert!(!seen_slowdown, "tick after slowdown"),
            Some(Cue::SlowDown) | None => seen_slowdown = true,
        }
    }
}

#[test]
fn frames_carry_labels_and_rotation() {
    let (mut wheel, clock) = wheel_with(&["Alice", "Bartholomew Jr", "Carol"]);
    assert!(wheel.spin().is_applied());
    clock.advance(Duration::from_millis(3000));

    let frame = wheel.tick().expect("frame mid-spin");

    assert_eq!(frame.slices.len(), 3);
    assert_eq!(frame.slices[1].label, "Bartholomew ...");
    let expected = 2160.0 * crate::animator::ease_out_quart(0.5);
    assert!((frame.rotation_radians - expected.to_radians()).abs() < 1e-9);
}

#[test]
fn cancelling_mid_spin_never_completes() {
    let (mut wheel, clock) = wheel_with(&["Alice", "Bob"]);
    assert!(wheel.spin().is_applied());
    clock.advance(Duration::from_millis(1000));
    assert!(wheel.tick().is_some());

    assert!(wheel.cancel_spin().is_applied());
    clock.advance(Duration::from_secs(10));

    assert_eq!(wheel.tick(), None);
    assert_eq!(wheel.hooks().last(), Some(&WheelEvent::SpinCancelled));
    assert_eq!(completions(wheel.hooks()), 0);
    assert_eq!(wheel.winner(), None);
    assert_eq!(wheel.machine().phase(), &crate::machine::Phase::Idle);
    assert_eq!(wheel.machine().participants(), ["Alice", "Bob"]);
    assert_eq!(
        wheel.cancel_spin(),
        Outcome::Ignored(Rejection::NotSpinning)
    );
}

#[test]
fn confirming_the_last_winner_signals_an_empty_list() {
    let (mut wheel, clock) = wheel_with(&["Alice"]);
    assert!(wheel.spin().is_applied());
    run_to_rest(&mut wheel, &clock);

    assert!(wheel.confirm_and_continue().is_applied());

    let tail = &wheel.hooks()[wheel.hooks().len() - 2..];
    assert_eq!(
        tail,
        [
            WheelEvent::ResultDismissed,
            WheelEvent::ListEmptied {
                mode: GameMode::Employee
            }
        ]
    );
    assert!(wheel.machine().is_game_over());
}

#[test]
fn retry_dismisses_without_removing() {
    let (mut wheel, clock) = wheel_with(&["Alice", "Bob"]);
    assert!(wheel.spin().is_applied());
    run_to_rest(&mut wheel, &clock);

    assert!(wheel.retry_spin().is_applied());

    assert_eq!(wheel.hooks().last(), Some(&WheelEvent::ResultDismissed));
    assert_eq!(wheel.machine().participants(), ["Alice", "Bob"]);
    assert!(wheel.spin().is_applied());
}

#[test]
fn reset_mid_spin_tears_the_animation_down() {
    let (mut wheel, clock) = wheel_with(&["Alice", "Bob"]);
    assert!(wheel.spin().is_applied());
    clock.advance(Duration::from_millis(500));
    assert!(wheel.tick().is_some());

    assert!(wheel.reset().is_applied());

    assert!(!wheel.is_spinning());
    assert!(wheel.machine().participants().is_empty());
    clock.advance(Duration::from_secs(10));
    assert_eq!(wheel.tick(), None);
    assert_eq!(completions(wheel.hooks()), 0);
}

#[test]
fn next_spin_continues_from_the_resting_angle() {
    let (mut wheel, clock) = wheel_with(&["Alice", "Bob", "Carol"]);
    assert!(wheel.spin().is_applied());
    run_to_rest(&mut wheel, &clock);
    assert_eq!(wheel.rotation_degrees(), 2160.0);
    assert!(wheel.retry_spin().is_applied());

    assert!(wheel.spin().is_applied());
    run_to_rest(&mut wheel, &clock);
    assert_eq!(wheel.rotation_degrees(), 4320.0);
}

#[test]
fn mode_switch_is_refused_mid_spin() {
    let (mut wheel, _clock) = wheel_with(&["Alice"]);
    assert!(wheel.spin().is_applied());
    assert_eq!(
        wheel.switch_mode(GameMode::Executive),
        Outcome::Ignored(Rejection::AlreadySpinning)
    );
}

#[test]
fn reset_and_mode_switch_return_the_wheel_to_rest() {
    let (mut wheel, clock) = wheel_with(&["Alice", "Bob", "Carol"]);
    assert!(wheel.spin().is_applied());
    run_to_rest(&mut wheel, &clock);
    assert_eq!(wheel.rotation_degrees(), 2160.0);

    assert!(wheel.reset().is_applied());
    assert_eq!(wheel.rotation_degrees(), 0.0);

    assert!(wheel.add_participant("Dana").is_applied());
    assert!(wheel.spin().is_applied());
    run_to_rest(&mut wheel, &clock);
    assert!(wheel.confirm_and_continue().is_applied());
    assert_ne!(wheel.rotation_degrees(), 0.0);

    assert!(wheel.switch_mode(GameMode::Executive).is_applied());
    assert_eq!(wheel.rotation_degrees(), 0.0);
    assert_eq!(wheel.frame().rotation_radians, 0.0);
}
