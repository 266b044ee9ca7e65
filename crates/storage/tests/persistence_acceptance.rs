use shared::domain::{GameMode, GameSnapshot};
use storage::{GameStore, JsonFileStore};

#[test]
fn per_mode_state_survives_reopening_the_device_store() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("spinwheel.json");

    let employee = GameSnapshot::new(vec!["Alice".into(), "Carol".into()], false);
    let employee_undo = GameSnapshot::new(vec!["Alice".into(), "Bob".into(), "Carol".into()], false);
    let executive = GameSnapshot::new(Vec::new(), true);

    {
        let mut store = GameStore::new(JsonFileStore::open(&path).expect("open"));
        assert!(store.save(GameMode::Employee, &employee));
        assert!(store.save_undo(GameMode::Employee, &employee_undo));
        assert!(store.save(GameMode::Executive, &executive));
        assert!(store.save_active_mode(GameMode::Executive));
    }

    let mut store = GameStore::new(JsonFileStore::open(&path).expect("reopen"));
    assert_eq!(store.load_active_mode(), Some(GameMode::Executive));
    assert_eq!(store.load(GameMode::Employee), Some(employee));
    assert_eq!(store.load_undo(GameMode::Employee), Some(employee_undo));
    assert_eq!(store.load(GameMode::Executive), Some(executive.clone()));

    assert!(store.clear(GameMode::Employee));
    drop(store);

    let store = GameStore::new(JsonFileStore::open(&path).expect("reopen again"));
    assert_eq!(store.load(GameMode::Employee), None);
    assert_eq!(store.load_undo(GameMode::Employee), None);
    assert_eq!(store.load(GameMode::Executive), Some(executive));
}
