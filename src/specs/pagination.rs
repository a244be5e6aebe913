// src/specs/pagination.rs
//! Scraping *spec* for the history pagination control.
//!
//! ```text
//! .pagination-pages
//!   li.page-item            <a class="page-link" href="?page=1">1</a>
//!   li.page-item.active     3            ← current page
//!   li.page-item            <a class="page-link" href="?page=4">4</a>   ← next target
//! ```
//!
//! Every way of not finding a next link ends the run. `EndReason` only
//! records *why*, so a truncated history can be spotted in the log.

use crate::core::Node;

pub const CONTROL_SEL: &str = ".pagination-pages";
pub const ACTIVE_SEL: &str = ".pagination-pages li.page-item.active";
pub const LINK_SEL: &str = "a.page-link";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EndReason {
    /// Active item is the last one.
    LastPage,
    /// Successor item exists but holds no link.
    NoLinkInSuccessor,
    /// Control present, but nothing marked active.
    NoActiveItem,
    /// No control at all: a single-page history.
    NoPaginationControl,
}

impl EndReason {
    /// Reasons that may hide a broken control rather than a real end.
    pub fn is_suspicious(self) -> bool {
        matches!(self, EndReason::NoLinkInSuccessor | EndReason::NoActiveItem)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NextPage {
    Target(String),
    End(EndReason),
}

/// Leading number of the active item's label (`"2 (current)"` → 2);
/// 1 when absent or when the label doesn't start with digits.
pub fn current_page_index<N: Node>(root: N) -> usize {
    root.find(ACTIVE_SEL)
        .and_then(|li| leading_number(&li.text()))
        .unwrap_or(1)
}

fn leading_number(label: &str) -> Option<usize> {
    let digits: String = label.trim_start().chars().take_while(|c| c.is_ascii_digit()).collect();
    digits.parse().ok()
}

pub fn next_page<N: Node>(root: N) -> NextPage {
    let Some(active) = root.find(ACTIVE_SEL) else {
        return if root.find(CONTROL_SEL).is_some() {
            NextPage::End(EndReason::NoActiveItem)
        } else {
            NextPage::End(EndReason::NoPaginationControl)
        };
    };
    let Some(succ) = active.next_element_sibling() else {
        return NextPage::End(EndReason::LastPage);
    };
    match succ.find(LINK_SEL).and_then(|a| a.attr("href")) {
        Some(href) if !href.trim().is_empty() => NextPage::Target(s!(href.trim())),
        _ => NextPage::End(EndReason::NoLinkInSuccessor),
    }
}

/// Raw href of the next page, if any.
pub fn next_page_target<N: Node>(root: N) -> Option<String> {
    match next_page(root) {
        NextPage::Target(href) => Some(href),
        NextPage::End(_) => None,
    }
}
