//! Leaf extractors: paragraphs, lists and label/value tables from a DOM subtree.
//!
//! Every extractor call owns its own [`SeenText`] set, so deduplication never
//! leaks across sections.

pub mod dom;
mod list;
mod paragraph;
mod table;

use std::collections::HashSet;

pub use list::ListExtractor;
pub use paragraph::ParagraphExtractor;
pub use table::{ContactTableExtractor, TableExtractor};

/// Per-call dedup set keyed on normalized, lower-cased text.
#[derive(Debug, Default)]
pub(crate) struct SeenText {
    enabled: bool,
    seen: HashSet<String>,
}

impl SeenText {
    pub(crate) fn new(enabled: bool) -> Self {
        Self {
            enabled,
            seen: HashSet::new(),
        }
    }

    /// Record `text`; false if dedup is on and it was already seen.
    pub(crate) fn admit(&mut self, text: &str) -> bool {
        !self.enabled || self.seen.insert(dom::dedup_key(text))
    }
}
