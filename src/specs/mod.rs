// src/specs/mod.rs
//! # Scraping “specs” module
//!
//! Page-specific readers for the GEM site. Each spec encodes *where the ground
//! truth lives in the page tree* and *how to read it without failing*.
//!
//! ## What lives here
//! - **Pure extraction** over the `core::Node` query interface (no parser types).
//! - **Selector choice** for the profile page, history events and the
//!   pagination control.
//! - **Result vocabulary** (`results`): localized result text → `MatchOutcome`.
//!
//! ## What does **not** live here
//! - **Fetching/navigation** (`core::net`), **persistence** (`store`, `session`),
//!   **run control** (`pipeline`, `runner`) and **export** (`csv`, `file`).
//!
//! ## Typical call chain
//! ```text
//! runner → PageSource::load → Page::parse
//!        → pipeline::Pipeline::on_page_load → specs::history::extract
//!                                            → specs::pagination::next_page
//! ```
//!
//! ## Conventions & invariants
//! - Specs **degrade, never abort**: missing text becomes `"Unknown"`,
//!   unknown result text becomes `MatchOutcome::Unknown`.
//! - Output order is document order.
//! - Specs are testable **offline** against small HTML fixtures.
pub mod history;
pub mod pagination;
pub mod profile;
pub mod results;
