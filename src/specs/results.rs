// src/specs/results.rs
//! Results-column vocabulary.
//!
//! The history page prints the match result in the viewer's language. Each
//! outcome owns one set of accepted literals; lookups are exact and
//! case-sensitive against trimmed text. Anything else is `Unknown`, which
//! stays visible in the export instead of aborting or being dropped.
//!
//! Adding a language means appending to the right set; nothing else reads them.

use crate::model::MatchOutcome;

pub const WIN: &[&str] = &[
    "Win", "Won", "win", "W",
    "Sieg", "Gewonnen",              // de / nl
    "Victoire", "Gagné",             // fr
    "Victoria", "Ganado", "Ganó",    // es
    "Vittoria", "Vinto",             // it
    "Vitória", "Venceu",             // pt
    "Wygrana",                       // pl
    "Winst",                         // nl
    "勝利", "勝ち",                   // ja
    "胜利", "胜",                     // zh
    "승리",                           // ko
    "Победа",                        // ru
];

pub const LOSS: &[&str] = &[
    "Loss", "Lost", "loss", "L",
    "Niederlage", "Verloren",        // de / nl
    "Défaite", "Perdu",              // fr
    "Derrota", "Perdido", "Perdió",  // es / pt
    "Sconfitta", "Perso",            // it
    "Perdeu",                        // pt
    "Przegrana",                     // pl
    "Verlies",                       // nl
    "敗北", "負け",                   // ja
    "失败", "负", "失敗",              // zh
    "패배",                           // ko
    "Поражение",                     // ru
];

pub const DRAW: &[&str] = &[
    "Draw", "Tie", "draw", "D",
    "Unentschieden",                 // de
    "Remis",                         // de / pl
    "Match nul", "Nul", "Égalité",   // fr
    "Empate",                        // es / pt
    "Pareggio", "Patta",             // it
    "Gelijkspel",                    // nl
    "引き分け",                        // ja
    "平局", "和局", "平",              // zh
    "무승부",                          // ko
    "Ничья",                         // ru
];

pub const BYE: &[&str] = &[
    "Bye", "bye",
    "Freilos",                       // de
    "Exempt", "Exempté",             // fr
    "Libre", "Descanso",             // es
    "Riposo", "Turno di riposo",     // it
    "Folga",                         // pt
    "Wolny los", "Pauza",            // pl
    "Vrijloting",                    // nl
    "不戦勝",                          // ja
    "轮空", "輪空",                    // zh
    "부전승",                          // ko
    "Пропуск",                       // ru
];

/// Map one results-column string onto the canonical outcome.
pub fn normalize(raw: &str) -> MatchOutcome {
    let s = raw.trim();
    if WIN.contains(&s) {
        MatchOutcome::Win
    } else if LOSS.contains(&s) {
        MatchOutcome::Loss
    } else if DRAW.contains(&s) {
        MatchOutcome::Draw
    } else if BYE.contains(&s) {
        MatchOutcome::Bye
    } else {
        MatchOutcome::Unknown
    }
}
