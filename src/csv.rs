// src/csv.rs
use std::mem::take;

use chrono::{DateTime, Utc};

use crate::model::{EventRecord, MatchOutcome, MatchRecord, PlayerMeta, RatedStatus, RunState};

pub const BOM: char = '\u{FEFF}';
pub const SEP: char = ',';

pub const HEADERS: [&str; 7] = [
    "Event Name", "Event Date", "Rated", "Round", "Opponent", "Result", "Rating Change",
];

/* ---------------- Writing ---------------- */

/// Always-quoted field; embedded quotes doubled.
fn quoted(field: &str) -> String {
    join!("\"", &field.replace('"', "\"\""), "\"")
}

fn push_row<S: AsRef<str>>(out: &mut String, row: &[S]) {
    let line = row.iter().map(|c| quoted(c.as_ref())).collect::<Vec<_>>().join(",");
    out.push_str(&line);
    out.push('\n');
}

/// Comment lines must stay on one line.
fn comment_value(s: &str) -> String {
    s.replace(['\r', '\n'], " ")
}

fn push_meta(out: &mut String, meta: &PlayerMeta, exported_at: &DateTime<Utc>) {
    out.push_str(&format!("# Player: {}\n", comment_value(&meta.name)));
    out.push_str(&format!("# GEM ID: {}\n", comment_value(&meta.gem_id)));
    out.push_str(&format!("# Elo: {}\n", comment_value(&meta.elo_rating)));
    out.push_str(&format!("# Exported: {}\n", exported_at.to_rfc3339()));
}

/// Render the finished run: BOM, optional `#` preamble, header, one row per
/// (event, match) in encounter order. Same state + same timestamp → same text.
pub fn serialize(state: &RunState, exported_at: DateTime<Utc>, include_meta: bool) -> String {
    let mut out = String::with_capacity(64 + state.match_count() * 64);
    out.push(BOM);

    if include_meta {
        if let Some(meta) = &state.meta {
            push_meta(&mut out, meta, &exported_at);
        }
    }

    push_row(&mut out, &HEADERS);
    for ev in &state.events {
        for m in &ev.matches {
            push_row(&mut out, &[
                ev.event_name.as_str(),
                ev.event_date.as_str(),
                ev.rated_status.as_str(),
                m.round.as_str(),
                m.opponent.as_str(),
                m.result.as_str(),
                m.rating_change.as_str(),
            ]);
        }
    }
    out
}

/* ---------------- Parsing ---------------- */

/// Minimal CSV/TSV parser (quotes + CRLF tolerant).
pub fn parse_rows(text: &str, sep: char) -> Vec<Vec<String>> {
    let mut rows = Vec::new();
    let mut field = s!();
    let mut row = Vec::new();
    let mut in_quotes = false;
    let mut chars = text.chars().peekable();

    while let Some(ch) = chars.next() {
        match ch {
            '"' => {
                if in_quotes {
                    if matches!(chars.peek(), Some('"')) {
                        chars.next(); // double-quote escape
                        field.push('"');
                    } else {
                        in_quotes = false;
                    }
                } else {
                    in_quotes = true;
                }
            }
            c if c == sep && !in_quotes => {
                // move the field without cloning
                row.push(take(&mut field));
            }
            '\n' | '\r' if !in_quotes => {
                if ch == '\r' && matches!(chars.peek(), Some('\n')) { chars.next(); }
                row.push(take(&mut field));
                if !(row.len() == 1 && row[0].is_empty()) {
                    rows.push(take(&mut row));
                } else {
                    row.clear();
                }
            }
            _ => field.push(ch),
        }
    }

    // Flush any trailing field/row even if quotes were unterminated.
    if !field.is_empty() || !row.is_empty() {
        row.push(field);
        rows.push(row);
    }

    rows
}

/// One data row of an exported file, typed again.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExportRow {
    pub event_name: String,
    pub event_date: String,
    pub rated: RatedStatus,
    pub round: String,
    pub opponent: String,
    pub result: MatchOutcome,
    pub rating_change: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ImportedHistory {
    pub meta: Option<PlayerMeta>,
    pub exported_at: Option<String>,
    pub rows: Vec<ExportRow>,
}

impl ImportedHistory {
    /// Regroup consecutive rows of the same event. Events without matches
    /// never reach the file, so they don't come back either.
    ///
    /// The file carries no event id: two back-to-back events with the same
    /// name, date and rated flag come back as one event holding both sets of
    /// matches. Row-level figures (`rows`, `stats`) are unaffected.
    pub fn events(&self) -> Vec<EventRecord> {
        let mut out: Vec<EventRecord> = Vec::new();
        for r in &self.rows {
            let same = out.last().is_some_and(|ev| {
                ev.event_name == r.event_name && ev.event_date == r.event_date && ev.rated_status == r.rated
            });
            if !same {
                out.push(EventRecord {
                    event_name: r.event_name.clone(),
                    event_date: r.event_date.clone(),
                    rated_status: r.rated,
                    matches: Vec::new(),
                });
            }
            if let Some(ev) = out.last_mut() {
                ev.matches.push(MatchRecord {
                    round: r.round.clone(),
                    opponent: r.opponent.clone(),
                    result: r.result,
                    rating_change: r.rating_change.clone(),
                });
            }
        }
        out
    }
}

/// Read a file written by `serialize` (BOM and preamble optional).
pub fn read_export(text: &str) -> ImportedHistory {
    let text = text.strip_prefix(BOM).unwrap_or(text);

    let mut name = None;
    let mut gem_id = None;
    let mut elo = None;
    let mut exported_at = None;

    // Preamble: leading '#' lines only.
    let mut body_start = 0usize;
    for line in text.split_inclusive('\n') {
        let Some(comment) = line.trim_end().strip_prefix('#') else { break; };
        body_start += line.len();
        if let Some((k, v)) = comment.split_once(':') {
            let v = s!(v.trim());
            match k.trim() {
                "Player" => name = Some(v),
                "GEM ID" => gem_id = Some(v),
                "Elo" => elo = Some(v),
                "Exported" => exported_at = Some(v),
                _ => {}
            }
        }
    }

    let meta = name.map(|name| PlayerMeta {
        name,
        gem_id: gem_id.unwrap_or_default(),
        elo_rating: elo.unwrap_or_default(),
    });

    let mut rows = Vec::new();
    for (i, cells) in parse_rows(&text[body_start..], SEP).into_iter().enumerate() {
        if i == 0 && cells.first().map(String::as_str) == Some(HEADERS[0]) {
            continue;
        }
        if cells.len() < HEADERS.len() {
            logd!("Import: Skipping short row {} ({} cells)", i, cells.len());
            continue;
        }
        let mut it = cells.into_iter();
        let mut next = || it.next().unwrap_or_default();
        let event_name = next();
        let event_date = next();
        let rated = next().parse().unwrap_or(RatedStatus::Unknown);
        let round = next();
        let opponent = next();
        let result = next().parse().unwrap_or(MatchOutcome::Unknown);
        let rating_change = next();
        rows.push(ExportRow { event_name, event_date, rated, round, opponent, result, rating_change });
    }

    ImportedHistory { meta, exported_at, rows }
}
