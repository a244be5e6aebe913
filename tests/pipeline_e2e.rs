// tests/pipeline_e2e.rs
use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

use fab_history::core::{Page, PageSource};
use fab_history::csv::read_export;
use fab_history::error::{Result, ScrapeError};
use fab_history::file::Delivery;
use fab_history::model::MatchOutcome;
use fab_history::pipeline::{Pipeline, PipelineConfig, PipelineState, Step};
use fab_history::runner::Runner;
use fab_history::session;
use fab_history::store::{FileStore, MemoryStore};

const PROFILE: &str = "https://gem.fabtcg.com/profile/player/";
const HIST: &str = "https://gem.fabtcg.com/profile/history/?page=";

/// Site stand-in; counts loads per URL.
struct FakeSite {
    pages: HashMap<String, String>,
    hits: Vec<String>,
}

impl PageSource for FakeSite {
    fn load(&mut self, url: &str) -> Result<String> {
        self.hits.push(url.to_string());
        self.pages
            .get(url)
            .cloned()
            .ok_or_else(|| ScrapeError::Status { status: 404, url: url.to_string() })
    }
}

/// Keeps delivered files in memory.
#[derive(Default)]
struct Downloads(Vec<(String, String, Vec<u8>)>);

impl Delivery for &mut Downloads {
    fn deliver(&mut self, bytes: &[u8], mime: &str, file_name: &str) -> Result<PathBuf> {
        self.0.push((file_name.to_string(), mime.to_string(), bytes.to_vec()));
        Ok(PathBuf::from(file_name))
    }
}

fn event(name: &str, rows: &[(&str, &str, &str, &str)]) -> String {
    let body: String = rows
        .iter()
        .map(|(r, o, res, d)| format!("<tr><td>{r}</td><td>{o}</td><td>{res}</td><td>{d}</td></tr>"))
        .collect();
    format!(
        r#"<div class="event">
             <h4 class="event__title">{name}</h4>
             <div class="event__when">2024-01-01</div>
             <div class="event__meta-item">Rated</div>
             <table><thead><tr><th>Round</th><th>Opponent</th><th>Result</th><th>Rating Change</th></tr></thead>
             <tbody>{body}</tbody></table>
           </div>"#
    )
}

fn pager(index: usize, last: usize) -> String {
    let items: String = (1..=last)
        .map(|i| {
            if i == index {
                format!(r#"<li class="page-item active"><span class="page-link">{i}</span></li>"#)
            } else {
                format!(r#"<li class="page-item"><a class="page-link" href="/profile/history/?page={i}">{i}</a></li>"#)
            }
        })
        .collect();
    format!(r#"<ul class="pagination-pages">{items}</ul>"#)
}

/// Three history pages with 2, 0 and 1 events.
fn site() -> FakeSite {
    let mut pages = HashMap::new();
    pages.insert(
        PROFILE.to_string(),
        r#"<h2 class="profile__name">Leon</h2><span class="profile__gem-id">GEM ID: 42</span>
           <span class="profile__elo">Elo: 1600</span>"#
            .to_string(),
    );
    let p1 = [
        event("Armory", &[("1", "Alice", "Win", "+10"), ("2", "Bob", "勝利", "+8")]),
        event("Skirmish", &[("1", "Carol", "Loss", "-5")]),
    ]
    .concat();
    pages.insert(format!("{HIST}1"), p1 + &pager(1, 3));
    pages.insert(format!("{HIST}2"), pager(2, 3));
    pages.insert(format!("{HIST}3"), event("Calling", &[("1", "Dave", "Draw", "0")]) + &pager(3, 3));
    FakeSite { pages, hits: Vec::new() }
}

fn cfg() -> PipelineConfig {
    PipelineConfig { delay: Duration::ZERO, ..PipelineConfig::default() }
}

#[test]
fn full_run_visits_pages_in_order_and_exports_once() {
    let mut downloads = Downloads::default();
    let mut runner = Runner::new(site(), MemoryStore::new(), &mut downloads, cfg());

    let summary = runner.run(PROFILE, &format!("{HIST}1"), None).unwrap();
    assert_eq!(summary.pages, 3);
    assert_eq!(summary.events, 3);
    assert_eq!(summary.matches, 4);
    assert!(!runner.status().in_progress);
    drop(runner);

    assert_eq!(downloads.0.len(), 1);
    let (name, mime, bytes) = &downloads.0[0];
    assert_eq!(name, "match_history.csv");
    assert!(mime.starts_with("text/csv"));

    let text = String::from_utf8(bytes.clone()).unwrap();
    let imported = read_export(&text);
    assert_eq!(imported.meta.as_ref().unwrap().name, "Leon");
    assert_eq!(imported.rows.len(), 4);
    assert_eq!(imported.rows[1].result, MatchOutcome::Win);
    assert_eq!(imported.rows[3].opponent, "Dave");
}

#[test]
fn state_tracks_scenario_with_two_zero_one_events() {
    let mut store = MemoryStore::new();
    let mut src = site();

    let first = Pipeline::with_config(&mut store, cfg()).start_run(None, &format!("{HIST}1")).unwrap();
    let Step::Navigate { mut url, .. } = first else { panic!("expected navigation") };

    let mut seen = Vec::new();
    loop {
        let body = src.load(&url).unwrap();
        let page = Page::parse(&url, &body);
        // brand-new pipeline per page
        let mut pl = Pipeline::with_config(&mut store, cfg());
        assert_eq!(pl.state(), PipelineState::ExtractingPage);
        let visit = pl.on_page_load(&page).unwrap();
        seen.push(visit.events_found);
        match visit.step {
            Step::Navigate { url: next, .. } => {
                assert!(session::load(&store).in_progress);
                url = next;
            }
            Step::Finished(export) => {
                assert_eq!(export.events, 3);
                break;
            }
            Step::Idle => panic!("run dropped out"),
        }
    }

    assert_eq!(seen, [2, 0, 1]);
    let after = session::load(&store);
    assert!(!after.in_progress);
    assert!(after.events.is_empty());
}

#[test]
fn run_survives_store_reopen_between_pages() {
    let dir = tempfile::tempdir().unwrap();
    let store_path = dir.path().join("session.json");
    let mut downloads = Downloads::default();

    // One "process" per page: new store handle, new runner, same file.
    let mut next = {
        let mut r = Runner::new(site(), FileStore::open(&store_path).unwrap(), &mut downloads, cfg());
        match r.start(PROFILE, &format!("{HIST}1")).unwrap() {
            Step::Navigate { url, .. } => Some(url),
            other => panic!("unexpected {other:?}"),
        }
    };
    let mut steps = 0;
    while let Some(url) = next {
        let mut r = Runner::new(site(), FileStore::open(&store_path).unwrap(), &mut downloads, cfg());
        next = r.step(&url).unwrap().next_url;
        steps += 1;
    }

    assert_eq!(steps, 3);
    assert_eq!(downloads.0.len(), 1);
    let text = String::from_utf8(downloads.0[0].2.clone()).unwrap();
    assert!(text.contains("# Player: Leon"));
    assert_eq!(read_export(&text).rows.len(), 4);
    assert!(!session::is_in_progress(&FileStore::open(&store_path).unwrap()));
}

#[test]
fn single_page_history_finalizes_immediately() {
    let mut src = site();
    src.pages.insert(format!("{HIST}1"), event("Only", &[("1", "Eve", "Bye", "")]));
    let mut downloads = Downloads::default();
    let mut runner = Runner::new(src, MemoryStore::new(), &mut downloads, cfg());

    let summary = runner.run(PROFILE, &format!("{HIST}1"), None).unwrap();
    assert_eq!(summary.pages, 1);
    assert_eq!(summary.matches, 1);
}

#[test]
fn restarting_after_abandoned_run_starts_clean() {
    let mut src = site();
    src.pages.remove(&format!("{HIST}3"));
    let mut downloads = Downloads::default();
    let mut runner = Runner::new(src, MemoryStore::new(), &mut downloads, cfg());

    assert!(runner.run(PROFILE, &format!("{HIST}1"), None).is_err());
    assert_eq!(runner.status().events.len(), 2);

    // A new trigger wipes the partial data instead of appending to it.
    runner.start(PROFILE, &format!("{HIST}1")).unwrap();
    let st = runner.status();
    assert!(st.in_progress);
    assert!(st.events.is_empty());
}
