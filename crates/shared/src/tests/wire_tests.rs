use serde_json::json;

use crate::{
    domain::{GameMode, GameSnapshot},
    error::{Outcome, Rejection},
    protocol::{Cue, WheelEvent},
};

#[test]
fn mode_parses_its_own_tag() {
    for mode in GameMode::ALL {
        assert_eq!(mode.as_str().parse::<GameMode>(), Ok(mode));
    }
    assert_eq!(" executive ".parse::<GameMode>(), Ok(GameMode::Executive));
    let err = "Board".parse::<GameMode>().expect_err("unknown");
    assert_eq!(err.value, "Board");
    assert_eq!(GameMode::default(), GameMode::Employee);
}

#[test]
fn snapshot_accepts_the_legacy_names_field() {
    let snapshot: GameSnapshot =
        serde_json::from_value(json!({ "names": ["Ann", "Ben"] })).expect("legacy");
    assert_eq!(snapshot, GameSnapshot::new(vec!["Ann".into(), "Ben".into()], false));

    let encoded = serde_json::to_value(&snapshot).expect("encode");
    assert_eq!(encoded, json!({ "participants": ["Ann", "Ben"], "isGameOver": false }));
}

#[test]
fn outcome_is_tagged_by_status() {
    assert_eq!(
        serde_json::to_value(Outcome::Applied).expect("applied"),
        json!({ "status": "applied" })
    );
    assert_eq!(
        serde_json::to_value(Outcome::Ignored(Rejection::WinnerPending)).expect("ignored"),
        json!({ "status": "ignored", "reason": "winner_pending" })
    );
    assert_eq!(
        Outcome::from(Err::<(), _>(Rejection::GameOver)).rejection(),
        Some(Rejection::GameOver)
    );
}

#[test]
fn events_carry_type_and_payload() {
    let event = WheelEvent::SliceCrossed {
        slice_index: 2,
        progress: 0.75,
        cue: Some(Cue::SlowDown),
    };
    assert_eq!(
        serde_json::to_value(&event).expect("event"),
        json!({
            "type": "slice_crossed",
            "payload": { "slice_index": 2, "progress": 0.75, "cue": "slow_down" }
        })
    );
    assert_eq!(
        serde_json::to_value(WheelEvent::SpinCancelled).expect("unit"),
        json!({ "type": "spin_cancelled" })
    );
}
