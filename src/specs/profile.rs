// src/specs/profile.rs
//! Scraping *spec* for the player profile page (run entry point).
//!
//! Reads the player's name, GEM id and Elo once, when a run starts.
//! Missing pieces become `"Unknown"`.

use crate::core::Node;
use crate::core::sanitize::{canonical_text, or_unknown};
use crate::model::PlayerMeta;

pub const NAME_SEL: &str = ".profile__name";
pub const GEM_ID_SEL: &str = ".profile__gem-id";
pub const ELO_SEL: &str = ".profile__elo";

pub fn extract_meta<N: Node>(root: N) -> PlayerMeta {
    let text_of = |sel: &str| root.find(sel).map(|n| n.text()).unwrap_or_default();

    PlayerMeta {
        name: or_unknown(canonical_text(&text_of(NAME_SEL))),
        gem_id: or_unknown(value_after_label(&text_of(GEM_ID_SEL))),
        elo_rating: or_unknown(value_after_label(&text_of(ELO_SEL))),
    }
}

/// `"GEM ID: 12345"` → `"12345"`; unlabeled text passes through.
fn value_after_label(s: &str) -> String {
    match s.split_once(':') {
        Some((_, v)) => s!(v.trim()),
        None => s!(s.trim()),
    }
}
