// tests/export_csv.rs
use chrono::{TimeZone, Utc};

use fab_history::csv::{read_export, serialize, BOM, HEADERS};
use fab_history::model::{EventRecord, MatchOutcome, MatchRecord, PlayerMeta, RatedStatus, RunState};
use fab_history::stats::{compute, OpponentOrder};

fn m(round: &str, opponent: &str, result: MatchOutcome, delta: &str) -> MatchRecord {
    MatchRecord {
        round: round.into(),
        opponent: opponent.into(),
        result,
        rating_change: delta.into(),
    }
}

fn run_state() -> RunState {
    let mut st = RunState::started(Some(PlayerMeta {
        name: "Kayo, \"the\" Berserker".into(),
        gem_id: "123".into(),
        elo_rating: "1700".into(),
    }));
    st.events = vec![
        EventRecord {
            event_name: "Pro Quest, Berlin".into(),
            event_date: "Mar 3, 2024".into(),
            rated_status: RatedStatus::Yes,
            matches: vec![
                m("1", "Renée", MatchOutcome::Win, "+12"),
                m("2", "Jürgen", MatchOutcome::Loss, "-9"),
                m("Playoff 1", "Renée", MatchOutcome::Win, "+4"),
            ],
        },
        EventRecord {
            event_name: "Armory".into(),
            event_date: "Unknown".into(),
            rated_status: RatedStatus::No,
            matches: vec![m("1", "", MatchOutcome::Bye, ""), m("2", "Line\nBreak", MatchOutcome::Unknown, "")],
        },
    ];
    st
}

#[test]
fn export_reimports_to_the_same_events() {
    let st = run_state();
    let at = Utc.with_ymd_and_hms(2024, 3, 4, 9, 30, 0).unwrap();
    let text = serialize(&st, at, true);

    assert!(text.starts_with(BOM));
    let imported = read_export(&text);
    assert_eq!(imported.meta.as_ref().map(|m| m.gem_id.as_str()), Some("123"));
    assert_eq!(imported.rows.len(), st.match_count());
    assert_eq!(imported.events(), st.events);
}

#[test]
fn header_is_the_only_unquoted_free_line_after_preamble() {
    let text = serialize(&run_state(), Utc.timestamp_opt(0, 0).unwrap(), false);
    let body = text.trim_start_matches(BOM);
    assert!(!body.starts_with('#'));
    let header = body.lines().next().unwrap();
    let expected: Vec<String> = HEADERS.iter().map(|h| format!("\"{h}\"")).collect();
    assert_eq!(header, expected.join(","));
}

#[test]
fn stats_over_an_export() {
    let text = serialize(&run_state(), Utc.timestamp_opt(0, 0).unwrap(), true);
    let st = compute(&read_export(&text).rows);

    assert_eq!(st.overall.matches, 5);
    assert_eq!(st.byes, 1);
    assert_eq!(st.unknown, 1);
    // 2 wins out of 3 decided
    let rate = st.overall.win_rate().unwrap();
    assert!((rate - 2.0 / 3.0).abs() < 1e-9);

    let top = st.top_opponents(5);
    assert_eq!(top[0].label, "Renée");
    assert_eq!(top[0].tally.matches, 2);

    let report = st.render(OpponentOrder::WinRate, true);
    assert!(report.contains("Total matches: 5"));
    assert!(report.contains("Playoff 1"));
}
