// src/specs/history.rs
//! Scraping *spec* for one page of the player's match history.
//!
//! Layout (one container per event):
//! ```text
//! div.event
//!   .event__title            → event name
//!   .event__when             → event date
//!   .event__meta-item × n    → format, "Rated"/"Unrated", XP modifier, …
//!   table (header "Round …")    → regular rounds
//!   table (header "Playoff …")  → elimination bracket
//! ```
//!
//! Responsibilities:
//! - Turn the page tree into `EventRecord`s in document order.
//! - Substitute `"Unknown"` for missing name/date; never fail.
//! - Classify result text through `results::normalize`.
//!
//! Non-Responsibilities:
//! - No fetching, persistence or pagination.

use crate::core::Node;
use crate::core::sanitize::{canonical_text, or_unknown};
use crate::model::{EventRecord, MatchRecord, RatedStatus};

use super::results;

pub const EVENT_SEL: &str = ".event";
pub const NAME_SEL: &str = ".event__title";
pub const DATE_SEL: &str = ".event__when";
pub const META_SEL: &str = ".event__meta-item";
pub const TABLE_SEL: &str = "table";

/// Only this many metadata fragments are scanned for the rated marker.
pub const MAX_META_FRAGMENTS: usize = 8;

/// Stage marker for bracket rounds; keeps them apart from numbered rounds.
pub const PLAYOFF_PREFIX: &str = "Playoff ";
/// Put in front of a regular round label that already reads like a playoff one.
pub const ROUND_ESCAPE: &str = "Round ";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ExtractOptions {
    pub rated_default: RatedStatus,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self { rated_default: RatedStatus::No }
    }
}

/// Kind of match table, decided from its header text.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TableKind {
    Rounds,
    Playoff,
}

impl TableKind {
    pub fn classify(header: &str) -> Option<Self> {
        let lc = header.to_lowercase();
        if lc.contains("playoff") {
            Some(TableKind::Playoff)
        } else if lc.contains("round") {
            Some(TableKind::Rounds)
        } else {
            None
        }
    }

    /// Rating-change column when the header doesn't name one.
    /// Round tables carry a running record column before it; playoff tables don't.
    pub fn default_rating_col(self) -> usize {
        match self {
            TableKind::Rounds => 4,
            TableKind::Playoff => 3,
        }
    }

    /// Only playoff labels ever start with `PLAYOFF_PREFIX`.
    fn label(self, raw: &str) -> String {
        match self {
            TableKind::Rounds if raw.starts_with(PLAYOFF_PREFIX) => join!(ROUND_ESCAPE, raw),
            TableKind::Rounds => s!(raw),
            TableKind::Playoff => join!(PLAYOFF_PREFIX, raw),
        }
    }
}

/// Extract every event on the page. Pure: same tree → same records.
pub fn extract<N: Node>(root: N, opts: &ExtractOptions) -> Vec<EventRecord> {
    root.find_all(EVENT_SEL)
        .into_iter()
        .map(|event| extract_event(event, opts))
        .collect()
}

fn extract_event<N: Node>(event: N, opts: &ExtractOptions) -> EventRecord {
    let event_name = or_unknown(event.find(NAME_SEL).map(|n| n.text()).unwrap_or_default());
    let event_date = or_unknown(event.find(DATE_SEL).map(|n| n.text()).unwrap_or_default());
    let rated_status = rated_status(event, opts.rated_default);

    let mut matches = Vec::new();
    for table in event.find_all(TABLE_SEL) {
        let header = header_text(table);
        let Some(kind) = TableKind::classify(&header) else {
            logd!("History: Skipping table without round/playoff header ('{}')", header);
            continue;
        };
        let rating_col = rating_col_from_header(table).unwrap_or(kind.default_rating_col());
        matches.extend(extract_rows(table, kind, rating_col));
    }

    if matches.is_empty() {
        logd!("History: Event '{}' has no match rows", event_name);
    }

    EventRecord { event_name, event_date, rated_status, matches }
}

/// First decisive marker wins; "unrated"/"not rated" are explicit No.
fn rated_status<N: Node>(event: N, default: RatedStatus) -> RatedStatus {
    for frag in event.find_all(META_SEL).into_iter().take(MAX_META_FRAGMENTS) {
        let lc = frag.text().to_lowercase();
        if lc.contains("unrated") || lc.contains("not rated") {
            return RatedStatus::No;
        }
        if lc.contains("rated") {
            return RatedStatus::Yes;
        }
    }
    default
}

fn header_cells<N: Node>(table: N) -> Vec<N> {
    table.find_all("th")
}

fn header_text<N: Node>(table: N) -> String {
    if let Some(thead) = table.find("thead") {
        return thead.text();
    }
    header_cells(table)
        .into_iter()
        .map(|th| th.text())
        .collect::<Vec<_>>()
        .join(" ")
}

fn rating_col_from_header<N: Node>(table: N) -> Option<usize> {
    header_cells(table)
        .into_iter()
        .position(|th| th.text().to_lowercase().contains("rating"))
}

fn extract_rows<N: Node>(table: N, kind: TableKind, rating_col: usize) -> Vec<MatchRecord> {
    let mut out = Vec::new();
    for tr in table.find_all("tr") {
        let cells: Vec<N> = tr.children().into_iter().filter(|c| c.tag() == "td").collect();
        if cells.len() < 3 {
            continue; // header/separator row
        }
        out.push(MatchRecord {
            round: kind.label(&cells[0].text()),
            opponent: canonical_text(&cells[1].text()),
            result: results::normalize(&cells[2].text()),
            rating_change: cells.get(rating_col).map(|c| c.text()).unwrap_or_default(),
        });
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Page;
    use crate::model::MatchOutcome;

    fn page(body: &str) -> Page {
        Page::parse("https://gem.fabtcg.com/profile/history/?page=1", body)
    }

    const ONE_EVENT: &str = r#"
        <div class="event">
          <h4 class="event__title">Armory Night</h4>
          <div class="event__when">Jan 5, 2024</div>
          <div class="event__meta">
            <div class="event__meta-item">Classic Constructed</div>
            <div class="event__meta-item">Rated</div>
          </div>
          <div class="block-table"><table>
            <thead><tr><th>Round</th><th>Opponent</th><th>Result</th><th>Rating Change</th></tr></thead>
            <tbody>
              <tr><td>1</td><td>Alice</td><td>Win</td><td>+10</td></tr>
              <tr><td>2</td><td>Bob</td><td>勝利</td><td>+8</td></tr>
            </tbody>
          </table></div>
        </div>"#;

    #[test]
    fn round_table_rows_become_matches() {
        let p = page(ONE_EVENT);
        let events = extract(p.root(), &ExtractOptions::default());
        assert_eq!(events.len(), 1);
        let ev = &events[0];
        assert_eq!(ev.event_name, "Armory Night");
        assert_eq!(ev.event_date, "Jan 5, 2024");
        assert_eq!(ev.rated_status, RatedStatus::Yes);
        assert_eq!(ev.matches.len(), 2);
        assert!(ev.matches.iter().all(|m| m.result == MatchOutcome::Win));
        assert_eq!(ev.matches[0].opponent, "Alice");
        assert_eq!(ev.matches[0].rating_change, "+10");
        assert_eq!(ev.matches[1].round, "2");
    }

    #[test]
    fn extraction_is_repeatable() {
        let p = page(ONE_EVENT);
        let a = extract(p.root(), &ExtractOptions::default());
        let b = extract(p.root(), &ExtractOptions::default());
        assert_eq!(a, b);
    }

    #[test]
    fn playoff_rows_are_prefixed_and_use_their_own_column() {
        let p = page(r#"
            <div class="event">
              <h4 class="event__title">Calling</h4>
              <table>
                <tr><th>Round</th><th>Opponent</th><th>Result</th><th>Record</th><th>Δ</th></tr>
                <tr><td>1</td><td>Carol</td><td>Loss</td><td>0-1</td><td>-12</td></tr>
              </table>
              <table>
                <tr><th>Playoff</th><th>Opponent</th><th>Result</th><th>Δ</th></tr>
                <tr><td>1</td><td>Dave</td><td>Niederlage</td><td>-3</td></tr>
              </table>
            </div>"#);
        let ev = &extract(p.root(), &ExtractOptions::default())[0];
        assert_eq!(ev.matches.len(), 2);

        let swiss = &ev.matches[0];
        let top = &ev.matches[1];
        assert_eq!(swiss.round, "1");
        assert_eq!(swiss.rating_change, "-12");
        assert_eq!(top.round, "Playoff 1");
        assert_eq!(top.rating_change, "-3");
        assert_eq!(top.result, MatchOutcome::Loss);
        assert_ne!(swiss.round, top.round);
    }

    #[test]
    fn regular_round_named_like_playoff_stays_distinct() {
        let p = page(r#"
            <div class="event">
              <table>
                <tr><th>Round</th><th>Opponent</th><th>Result</th></tr>
                <tr><td>Playoff 1</td><td>Fay</td><td>Win</td></tr>
              </table>
              <table>
                <tr><th>Playoff</th><th>Opponent</th><th>Result</th></tr>
                <tr><td>1</td><td>Gus</td><td>Win</td></tr>
              </table>
            </div>"#);
        let ev = &extract(p.root(), &ExtractOptions::default())[0];
        assert_eq!(ev.matches[0].round, "Round Playoff 1");
        assert_eq!(ev.matches[1].round, "Playoff 1");
        assert!(!ev.matches[0].round.starts_with(PLAYOFF_PREFIX));
    }

    #[test]
    fn missing_fields_degrade_to_placeholders() {
        let p = page(r#"
            <div class="event">
              <table><tr><th>Standings</th></tr><tr><td>1</td><td>x</td><td>y</td></tr></table>
            </div>"#);
        let events = extract(p.root(), &ExtractOptions::default());
        assert_eq!(events.len(), 1);
        let ev = &events[0];
        assert_eq!(ev.event_name, "Unknown");
        assert_eq!(ev.event_date, "Unknown");
        assert_eq!(ev.rated_status, RatedStatus::No);
        assert!(ev.matches.is_empty());
    }

    #[test]
    fn rated_default_is_configurable_and_unrated_wins_over_rated() {
        let p = page(r#"<div class="event"><h4 class="event__title">A</h4></div>"#);
        let opts = ExtractOptions { rated_default: RatedStatus::Unknown };
        assert_eq!(extract(p.root(), &opts)[0].rated_status, RatedStatus::Unknown);

        let p = page(r#"<div class="event"><div class="event__meta-item">Unrated</div></div>"#);
        assert_eq!(extract(p.root(), &opts)[0].rated_status, RatedStatus::No);
    }

    #[test]
    fn short_rows_are_skipped_and_missing_rating_is_empty() {
        let p = page(r#"
            <div class="event"><table>
              <tr><th>Round</th><th>Opponent</th><th>Result</th></tr>
              <tr><td colspan="3">— Day 2 —</td></tr>
              <tr><td>3</td><td>Eve</td><td>Bye</td></tr>
            </table></div>"#);
        let ev = &extract(p.root(), &ExtractOptions::default())[0];
        assert_eq!(ev.matches.len(), 1);
        assert_eq!(ev.matches[0].result, MatchOutcome::Bye);
        assert_eq!(ev.matches[0].rating_change, "");
    }

    #[test]
    fn opponent_names_are_unicode_normalized() {
        let composed = "Ren\u{e9}e";
        let decomposed = "Rene\u{301}e";
        let body = format!(r#"
            <div class="event"><table>
              <tr><th>Round</th><th>Opponent</th><th>Result</th></tr>
              <tr><td>1</td><td>{composed}</td><td>Win</td></tr>
              <tr><td>2</td><td>{decomposed}</td><td>Loss</td></tr>
            </table></div>"#);
        let p = page(&body);
        let ev = &extract(p.root(), &ExtractOptions::default())[0];
        assert_eq!(ev.matches[0].opponent, ev.matches[1].opponent);
    }

    #[test]
    fn page_without_events_yields_nothing() {
        let p = page("<p>No history yet.</p>");
        assert!(extract(p.root(), &ExtractOptions::default()).is_empty());
    }
}
