// src/stats.rs
//
// Summary numbers over an exported history: totals, win rate, opponents,
// per-round win rate. Byes never count as decided and have no opponent.

use std::collections::HashMap;
use std::fmt::Write as _;

use crate::csv::ExportRow;
use crate::model::MatchOutcome;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Tally {
    pub matches: usize,
    pub wins: usize,
    pub losses: usize,
    pub draws: usize,
}

impl Tally {
    fn add(&mut self, r: MatchOutcome) {
        self.matches += 1;
        match r {
            MatchOutcome::Win => self.wins += 1,
            MatchOutcome::Loss => self.losses += 1,
            MatchOutcome::Draw => self.draws += 1,
            MatchOutcome::Bye | MatchOutcome::Unknown => {}
        }
    }

    pub fn decided(&self) -> usize {
        self.wins + self.losses + self.draws
    }

    /// Wins over decided matches; `None` when nothing was decided.
    pub fn win_rate(&self) -> Option<f64> {
        match self.decided() {
            0 => None,
            n => Some(self.wins as f64 / n as f64),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Labeled {
    pub label: String,
    pub tally: Tally,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OpponentOrder {
    Name,
    WinRate,
    Matches,
}

impl std::str::FromStr for OpponentOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "name" => Ok(OpponentOrder::Name),
            "winrate" | "win-rate" => Ok(OpponentOrder::WinRate),
            "matches" => Ok(OpponentOrder::Matches),
            other => Err(format!("Unknown sort order: {}", other)),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct HistoryStats {
    pub overall: Tally,
    pub byes: usize,
    pub unknown: usize,
    /// Sorted by name.
    pub opponents: Vec<Labeled>,
    /// Numbered rounds first (numerically), then other labels.
    pub rounds: Vec<Labeled>,
}

fn round_key(label: &str) -> (u8, u32, String) {
    match label.trim().parse::<u32>() {
        Ok(n) => (0, n, s!()),
        Err(_) => (1, 0, s!(label)),
    }
}

fn grouped(map: HashMap<String, Tally>) -> Vec<Labeled> {
    map.into_iter().map(|(label, tally)| Labeled { label, tally }).collect()
}

pub fn compute(rows: &[ExportRow]) -> HistoryStats {
    let mut stats = HistoryStats::default();
    let mut opponents: HashMap<String, Tally> = HashMap::new();
    let mut rounds: HashMap<String, Tally> = HashMap::new();

    for r in rows {
        stats.overall.add(r.result);
        match r.result {
            MatchOutcome::Bye => stats.byes += 1,
            MatchOutcome::Unknown => stats.unknown += 1,
            _ => {}
        }
        rounds.entry(r.round.clone()).or_default().add(r.result);
        if r.result != MatchOutcome::Bye && !r.opponent.is_empty() {
            opponents.entry(r.opponent.clone()).or_default().add(r.result);
        }
    }

    stats.opponents = grouped(opponents);
    stats.opponents.sort_by(|a, b| a.label.cmp(&b.label));
    stats.rounds = grouped(rounds);
    stats.rounds.sort_by_key(|l| round_key(&l.label));
    stats
}

impl HistoryStats {
    pub fn opponents_by(&self, order: OpponentOrder, descending: bool) -> Vec<&Labeled> {
        let mut v: Vec<&Labeled> = self.opponents.iter().collect();
        match order {
            OpponentOrder::Name => {}
            OpponentOrder::WinRate => v.sort_by(|a, b| {
                let ra = a.tally.win_rate().unwrap_or(-1.0);
                let rb = b.tally.win_rate().unwrap_or(-1.0);
                ra.total_cmp(&rb)
            }),
            OpponentOrder::Matches => v.sort_by_key(|l| l.tally.matches),
        }
        if descending {
            v.reverse();
        }
        v
    }

    /// Most-played opponents; ties keep name order.
    pub fn top_opponents(&self, n: usize) -> Vec<&Labeled> {
        let mut v: Vec<&Labeled> = self.opponents.iter().collect();
        v.sort_by(|a, b| b.tally.matches.cmp(&a.tally.matches));
        v.truncate(n);
        v
    }

    /// Plain-text report.
    pub fn render(&self, order: OpponentOrder, descending: bool) -> String {
        let pct = |t: &Tally| match t.win_rate() {
            Some(r) => format!("{:.2}", r),
            None => s!("-"),
        };

        let mut out = String::new();
        let _ = writeln!(out, "Total matches: {}", self.overall.matches);
        let _ = writeln!(out, "Total win rate: {}", pct(&self.overall));
        let _ = writeln!(
            out,
            "W/L/D: {}/{}/{}  (byes {}, unknown {})",
            self.overall.wins, self.overall.losses, self.overall.draws, self.byes, self.unknown
        );
        let _ = writeln!(out, "Different opponents: {}", self.opponents.len());

        let _ = writeln!(out, "\nTop 5 opponents by match count:");
        for l in self.top_opponents(5) {
            let _ = writeln!(out, "  {:<32} {:>4}  {}", l.label, l.tally.matches, pct(&l.tally));
        }

        let _ = writeln!(out, "\nWin rate per round:");
        for l in &self.rounds {
            let _ = writeln!(out, "  {:<12} {:>4}  {}", l.label, l.tally.matches, pct(&l.tally));
        }

        let _ = writeln!(out, "\nWin rate against each opponent:");
        for l in self.opponents_by(order, descending) {
            let _ = writeln!(out, "  {:<32} {}", l.label, pct(&l.tally));
        }
        out
    }
}
