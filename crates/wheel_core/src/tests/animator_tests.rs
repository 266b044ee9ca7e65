use super::*;

fn plan(duration_ms: u64, total_rotation_degrees: f64) -> SpinPlan {
    SpinPlan {
        duration: Duration::from_millis(duration_ms),
        total_rotation_degrees,
    }
}

fn animator(count: usize, start: f64, plan: SpinPlan) -> SpinAnimator {
    SpinAnimator::start(
        SliceMapper::new(count).expect("mapper"),
        start,
        plan,
        CueThresholds::default(),
        Duration::ZERO,
    )
}

#[test]
fn easing_starts_fast_and_settles() {
    assert_eq!(ease_out_quart(0.0), 0.0);
    assert_eq!(ease_out_quart(1.0), 1.0);
    assert!((ease_out_quart(0.5) - 0.9375).abs() < 1e-12);
}

#[test]
fn rotation_follows_the_eased_curve_from_wall_clock_time() {
    let anim = animator(4, 30.0, plan(1000, 720.0));

    assert_eq!(anim.rotation_at(Duration::ZERO), 30.0);
    let half = anim.rotation_at(Duration::from_millis(500));
    assert!((half - (30.0 + 720.0 * 0.9375)).abs() < 1e-9);
    assert_eq!(anim.rotation_at(Duration::from_secs(5)), 750.0);
    assert_eq!(anim.target_degrees(), 750.0);
}

#[test]
fn progress_is_clamped() {
    let anim = SpinAnimator::start(
        SliceMapper::new(2).expect("mapper"),
        0.0,
        plan(1000, 360.0),
        CueThresholds::default(),
        Duration::from_secs(10),
    );
    assert_eq!(anim.progress_at(Duration::from_secs(3)), 0.0);
    assert_eq!(anim.progress_at(Duration::from_secs(12)), 1.0);
}

#[test]
fn cue_depends_on_progress_band() {
    let cues = CueThresholds::default();
    assert_eq!(cues.cue_for(0.0), Some(Cue::Tick));
    assert_eq!(cues.cue_for(0.69), Some(Cue::Tick));
    assert_eq!(cues.cue_for(0.7), Some(Cue::SlowDown));
    assert_eq!(cues.cue_for(0.89), Some(Cue::SlowDown));
    assert_eq!(cues.cue_for(0.9), None);
    assert_eq!(cues.cue_for(1.0), None);
}

#[test]
fn final_step_resolves_winner_from_exact_target_rotation() {
    // 3 slices, target 90 + 6 turns puts slice 1 under the top pointer.
    let mut anim = animator(3, 0.0, plan(6000, 90.0 + 360.0 * 6.0));

    let step = anim.step(Duration::from_millis(6500)).expect("final step");
    match step {
        AnimationStep::Finished {
            rotation_degrees,
            winner_index,
            ..
        } => {
            assert_eq!(rotation_degrees, 2250.0);
            assert_eq!(winner_index, 1);
        }
        other => panic!("expected finish, got {other:?}"),
    }
    assert!(anim.is_finished());
    assert_eq!(anim.step(Duration::from_millis(7000)), None);
}

#[test]
fn crossings_are_reported_once_per_slice_change_with_ordered_cues() {
    let mut anim = animator(8, 0.0, plan(6000, 360.0 * 6.0 + 3.5));
    let mut crossings = Vec::new();
    let mut finished = false;
    let mut now = Duration::ZERO;

    while !finished {
        now += Duration::from_millis(16);
        match anim.step(now).expect("still animating") {
            AnimationStep::Running { crossing, .. } => crossings.extend(crossing),
            AnimationStep::Finished { crossing, .. } => {
                crossings.extend(crossing);
                finished = true;
            }
        }
    }

    assert!(!crossings.is_empty());
    for pair in crossings.windows(2) {
        assert_ne!(pair[0].slice_index, pair[1].slice_index);
    }
    let first_slowdown = crossings
        .iter()
        .position(|c| c.cue == Some(Cue::SlowDown))
        .expect("some slowdown cue");
    assert!(crossings[..first_slowdown]
        .iter()
        .all(|c| c.cue == Some(Cue::Tick)));
    assert!(crossings[first_slowdown..]
        .iter()
        .all(|c| c.cue != Some(Cue::Tick)));
}

#[test]
fn frame_rate_does_not_change_the_outcome() {
    let spin = plan(7000, 3000.5);
    let mut coarse = animator(5, 12.0, spin);
    let mut fine = animator(5, 12.0, spin);

    let last = |anim: &mut SpinAnimator, frame_ms: u64| {
        let mut now = Duration::ZERO;
        loop {
            now += Duration::from_millis(frame_ms);
            if let Some(AnimationStep::Finished {
                rotation_degrees,
                winner_index,
                ..
            }) = anim.step(now)
            {
                return (rotation_degrees, winner_index);
            }
        }
    };

    assert_eq!(last(&mut coarse, 250), last(&mut fine, 16));
}

#[test]
fn zero_duration_finishes_on_first_step() {
    let mut anim = animator(2, 0.0, plan(0, 400.0));
    assert!(matches!(
        anim.step(Duration::ZERO),
        Some(AnimationStep::Finished { .. })
    ));
}

#[test]
fn manual_clock_clones_share_time() {
    let clock = ManualClock::new();
    let view = clock.clone();
    clock.advance(Duration::from_millis(40));
    assert_eq!(view.now(), Duration::from_millis(40));
    clock.set(Duration::from_secs(2));
    assert_eq!(view.now(), Duration::from_secs(2));
}
