// src/model.rs
//
// Record model shared by the extractor, the session store and the exporter.
// Everything here is plain data: serde derives give the JSON blob layout
// persisted between pages.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Player identity captured once, from the profile page, when a run starts.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerMeta {
    pub name: String,
    pub gem_id: String,
    pub elo_rating: String,
}

/// Canonical match result. The localized source text is never kept.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MatchOutcome {
    Win,
    Loss,
    Draw,
    Bye,
    Unknown,
}

impl MatchOutcome {
    pub fn as_str(self) -> &'static str {
        match self {
            MatchOutcome::Win => "Win",
            MatchOutcome::Loss => "Loss",
            MatchOutcome::Draw => "Draw",
            MatchOutcome::Bye => "Bye",
            MatchOutcome::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for MatchOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MatchOutcome {
    type Err = String;

    /// Parses the canonical names written by the exporter (not localized text).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "Win" => Ok(MatchOutcome::Win),
            "Loss" => Ok(MatchOutcome::Loss),
            "Draw" => Ok(MatchOutcome::Draw),
            "Bye" => Ok(MatchOutcome::Bye),
            "Unknown" => Ok(MatchOutcome::Unknown),
            other => Err(format!("Unknown outcome: {}", other)),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum RatedStatus {
    Yes,
    No,
    Unknown,
}

impl RatedStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            RatedStatus::Yes => "Yes",
            RatedStatus::No => "No",
            RatedStatus::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for RatedStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RatedStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "yes" => Ok(RatedStatus::Yes),
            "no" => Ok(RatedStatus::No),
            "unknown" => Ok(RatedStatus::Unknown),
            other => Err(format!("Unknown rated status: {}", other)),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchRecord {
    /// Round label; playoff rows carry the stage prefix.
    pub round: String,
    pub opponent: String,
    pub result: MatchOutcome,
    pub rating_change: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventRecord {
    pub event_name: String,
    pub event_date: String,
    pub rated_status: RatedStatus,
    /// Document order.
    pub matches: Vec<MatchRecord>,
}

/// The single unit persisted across page loads.
///
/// `in_progress == false` implies `events` is empty and `pages_visited` is 0.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RunState {
    pub in_progress: bool,
    pub events: Vec<EventRecord>,
    pub meta: Option<PlayerMeta>,
    /// History pages extracted so far in this run, whatever their labels say.
    pub pages_visited: usize,
}

impl RunState {
    /// Fresh state for a run that is about to start.
    pub fn started(meta: Option<PlayerMeta>) -> Self {
        Self { in_progress: true, events: Vec::new(), meta, pages_visited: 0 }
    }

    pub fn match_count(&self) -> usize {
        self.events.iter().map(|e| e.matches.len()).sum()
    }
}
