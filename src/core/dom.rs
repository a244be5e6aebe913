// src/core/dom.rs
//
// Narrow read-only view of a rendered page. Specs only talk to `Node`, so
// they never depend on the parser behind it.

use std::ops::Deref;

use scraper::{ElementRef, Html, Selector};

use super::sanitize::normalize_ws;

/// Cheap handle to one element of a page tree.
pub trait Node: Copy {
    /// Descendants matching a CSS selector, in document order.
    fn find_all(self, selector: &str) -> Vec<Self>;

    fn find(self, selector: &str) -> Option<Self> {
        self.find_all(selector).into_iter().next()
    }

    /// Element children only (text nodes skipped).
    fn children(self) -> Vec<Self>;

    /// Lower-case tag name.
    fn tag(self) -> String;

    /// Visible text, whitespace collapsed and trimmed.
    fn text(self) -> String;

    fn attr(self, name: &str) -> Option<String>;

    fn next_element_sibling(self) -> Option<Self>;
}

impl<'a> Node for ElementRef<'a> {
    fn find_all(self, selector: &str) -> Vec<Self> {
        match Selector::parse(selector) {
            Ok(sel) => self.select(&sel).collect(),
            Err(e) => {
                loge!("Dom: Bad selector '{}': {:?}", selector, e);
                Vec::new()
            }
        }
    }

    fn children(self) -> Vec<Self> {
        // `ElementRef` derefs to the underlying tree node.
        self.deref().children().filter_map(ElementRef::wrap).collect()
    }

    fn tag(self) -> String {
        self.value().name().to_ascii_lowercase()
    }

    fn text(self) -> String {
        normalize_ws(&ElementRef::text(&self).collect::<String>())
    }

    fn attr(self, name: &str) -> Option<String> {
        self.value().attr(name).map(str::to_owned)
    }

    fn next_element_sibling(self) -> Option<Self> {
        self.next_siblings().find_map(ElementRef::wrap)
    }
}

/// One loaded page: where it came from plus its parsed tree.
pub struct Page {
    pub url: String,
    html: Html,
}

impl Page {
    pub fn parse(url: &str, body: &str) -> Self {
        Self { url: s!(url), html: Html::parse_document(body) }
    }

    pub fn root(&self) -> ElementRef<'_> {
        self.html.root_element()
    }
}
