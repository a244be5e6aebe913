// tests/session_file_store.rs
use std::fs;

use fab_history::model::{EventRecord, RatedStatus, RunState};
use fab_history::session::{self, KEY_EVENTS, KEY_IN_PROGRESS};
use fab_history::store::{FileStore, StateStore};

fn event(name: &str) -> EventRecord {
    EventRecord {
        event_name: name.into(),
        event_date: "Unknown".into(),
        rated_status: RatedStatus::No,
        matches: Vec::new(),
    }
}

#[test]
fn run_state_persists_across_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(".store").join("session.json");

    let mut state = RunState::started(None);
    state.events = vec![event("A"), event("B")];
    {
        let mut st = FileStore::open(&path).unwrap();
        session::save(&mut st, &state).unwrap();
    }

    let st = FileStore::open(&path).unwrap();
    assert_eq!(session::load(&st), state);
    assert!(!path.with_extension("json.tmp").exists());
}

#[test]
fn cleared_run_leaves_no_events_behind() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("session.json");

    let mut st = FileStore::open(&path).unwrap();
    let mut state = RunState::started(None);
    state.events.push(event("A"));
    session::save(&mut st, &state).unwrap();
    session::clear(&mut st).unwrap();

    let reopened = FileStore::open(&path).unwrap();
    assert_eq!(reopened.get(KEY_IN_PROGRESS).as_deref(), Some("false"));
    assert_eq!(reopened.get(KEY_EVENTS), None);
    assert_eq!(session::load(&reopened), RunState::default());
}

#[test]
fn damaged_store_file_degrades_to_idle() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("session.json");
    fs::write(&path, "{\"fab_history.in_progress\": tru").unwrap();

    let mut st = FileStore::open(&path).unwrap();
    assert!(!session::is_in_progress(&st));

    // The next write replaces the damaged file.
    st.set(KEY_IN_PROGRESS, "true").unwrap();
    let text = fs::read_to_string(&path).unwrap();
    assert!(serde_json::from_str::<serde_json::Value>(&text).is_ok());
}
