// src/core/sanitize.rs
use unicode_normalization::UnicodeNormalization;

pub fn normalize_ws(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev_space = false;
    for ch in s.chars() {
        if ch.is_whitespace() {
            if !prev_space { out.push(' '); prev_space = true; }
        } else { out.push(ch); prev_space = false; }
    }
    out.trim().to_string()
}

/// Whitespace-collapsed text in Unicode NFC, so the same name typed with
/// precomposed or combining diacritics compares equal.
pub fn canonical_text(s: &str) -> String {
    normalize_ws(s).nfc().collect()
}

/// Empty text → the literal placeholder.
pub fn or_unknown(s: String) -> String {
    if s.is_empty() { s!(crate::config::consts::UNKNOWN) } else { s }
}

/// File-system friendly stem from a player name; falls back to `fallback`.
pub fn sanitize_filename(name: &str, fallback: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut last_us = false;
    for ch in name.chars() {
        if ch.is_alphanumeric() { out.push(ch); last_us = false; }
        else if ch.is_whitespace() { if !last_us { out.push('_'); last_us = true; } }
        else if ch=='-' || ch=='_' { if !(last_us && ch=='_') { out.push(ch); } last_us = ch=='_'; }
    }
    let out = out.trim_matches('_').to_string();
    if out.is_empty() { s!(fallback) } else { out }
}
