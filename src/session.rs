// src/session.rs
//
// RunState <-> StateStore. Four keys, all written as strings:
// progress flag, events blob (JSON array), player blob (JSON object),
// pages visited (decimal).

use crate::error::Result;
use crate::model::{EventRecord, PlayerMeta, RunState};
use crate::store::StateStore;

pub const KEY_IN_PROGRESS: &str = "fab_history.in_progress";
pub const KEY_EVENTS: &str = "fab_history.events";
pub const KEY_META: &str = "fab_history.player_meta";
pub const KEY_PAGES: &str = "fab_history.pages_visited";

pub fn is_in_progress<S: StateStore + ?Sized>(store: &S) -> bool {
    store.get(KEY_IN_PROGRESS).as_deref() == Some("true")
}

/// Rebuild the run state from the store.
///
/// A run that isn't in progress never carries events; leftovers are ignored.
/// Unreadable blobs degrade to empty data.
pub fn load<S: StateStore + ?Sized>(store: &S) -> RunState {
    let in_progress = is_in_progress(store);

    let events = if in_progress {
        match store.get(KEY_EVENTS) {
            Some(blob) => serde_json::from_str::<Vec<EventRecord>>(&blob).unwrap_or_else(|e| {
                loge!("Session: Events blob unreadable ({}), continuing with none", e);
                Vec::new()
            }),
            None => Vec::new(),
        }
    } else {
        if store.get(KEY_EVENTS).is_some() {
            logd!("Session: Ignoring events left by a finished run");
        }
        Vec::new()
    };

    let meta = store.get(KEY_META).and_then(|blob| {
        serde_json::from_str::<PlayerMeta>(&blob)
            .map_err(|e| loge!("Session: Player blob unreadable ({})", e))
            .ok()
    });

    let pages_visited = if in_progress {
        store.get(KEY_PAGES).and_then(|v| v.trim().parse().ok()).unwrap_or(0)
    } else {
        0
    };

    RunState { in_progress, events, meta, pages_visited }
}

pub fn save<S: StateStore + ?Sized>(store: &mut S, state: &RunState) -> Result<()> {
    let events: &[EventRecord] = if state.in_progress { &state.events } else { &[] };
    store.set(KEY_EVENTS, &serde_json::to_string(events)?)?;
    match &state.meta {
        Some(meta) => store.set(KEY_META, &serde_json::to_string(meta)?)?,
        None => store.remove(KEY_META)?,
    }
    let pages = if state.in_progress { state.pages_visited } else { 0 };
    store.set(KEY_PAGES, &pages.to_string())?;
    // Flag last: a crash mid-save never marks a run without its data.
    store.set(KEY_IN_PROGRESS, if state.in_progress { "true" } else { "false" })
}

/// Forget the run entirely (after export, or on an explicit reset).
pub fn clear<S: StateStore + ?Sized>(store: &mut S) -> Result<()> {
    store.set(KEY_IN_PROGRESS, "false")?;
    store.remove(KEY_EVENTS)?;
    store.remove(KEY_PAGES)?;
    store.remove(KEY_META)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{MatchOutcome, MatchRecord, RatedStatus};
    use crate::store::MemoryStore;

    fn event(name: &str) -> EventRecord {
        EventRecord {
            event_name: s!(name),
            event_date: s!("2024-01-01"),
            rated_status: RatedStatus::Yes,
            matches: vec![MatchRecord {
                round: s!("1"),
                opponent: s!("Alice"),
                result: MatchOutcome::Draw,
                rating_change: s!("0"),
            }],
        }
    }

    #[test]
    fn empty_store_is_idle() {
        let st = MemoryStore::new();
        assert_eq!(load(&st), RunState::default());
    }

    #[test]
    fn save_then_load_roundtrips() {
        let mut st = MemoryStore::new();
        let mut state = RunState::started(Some(PlayerMeta {
            name: s!("P"), gem_id: s!("1"), elo_rating: s!("1500"),
        }));
        state.events.push(event("A"));
        state.pages_visited = 4;
        save(&mut st, &state).unwrap();
        assert!(is_in_progress(&st));
        assert_eq!(load(&st), state);
    }

    #[test]
    fn finished_run_never_exposes_events() {
        let mut st = MemoryStore::new();
        st.set(KEY_IN_PROGRESS, "false").unwrap();
        st.set(KEY_EVENTS, &serde_json::to_string(&vec![event("stale")]).unwrap()).unwrap();
        assert!(load(&st).events.is_empty());
    }

    #[test]
    fn clear_resets_everything() {
        let mut st = MemoryStore::new();
        let mut state = RunState::started(None);
        state.events.push(event("A"));
        save(&mut st, &state).unwrap();
        clear(&mut st).unwrap();
        let after = load(&st);
        assert!(!after.in_progress);
        assert!(after.events.is_empty());
        assert!(after.meta.is_none());
        assert_eq!(after.pages_visited, 0);
        assert!(st.get(KEY_PAGES).is_none());
    }

    #[test]
    fn unreadable_page_count_restarts_at_zero() {
        let mut st = MemoryStore::new();
        save(&mut st, &RunState::started(None)).unwrap();
        st.set(KEY_PAGES, "lots").unwrap();
        assert_eq!(load(&st).pages_visited, 0);
    }

    #[test]
    fn corrupt_events_blob_degrades() {
        let mut st = MemoryStore::new();
        st.set(KEY_IN_PROGRESS, "true").unwrap();
        st.set(KEY_EVENTS, "[{broken").unwrap();
        let state = load(&st);
        assert!(state.in_progress);
        assert!(state.events.is_empty());
    }
}
