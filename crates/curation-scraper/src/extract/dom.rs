//! Small DOM helpers over `scraper`'s element tree.

use std::collections::HashMap;

use scraper::node::Element;
use scraper::{ElementRef, Html};

/// Whitespace-normalized text of an element and all its descendants.
pub fn element_text(el: &ElementRef<'_>) -> String {
    normalize_ws(&el.text().collect::<String>())
}

/// Text of an element with each text node trimmed and joined by `sep`.
///
/// Keeps line structure in values such as postal addresses.
pub fn element_text_sep(el: &ElementRef<'_>, sep: &str) -> String {
    el.text()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join(sep)
}

/// Collapse every whitespace run to one space and trim.
pub fn normalize_ws(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Deduplication key: lower-cased, whitespace-normalized text.
pub fn dedup_key(text: &str) -> String {
    normalize_ws(&text.to_lowercase())
}

pub fn is_tag(el: &ElementRef<'_>, name: &str) -> bool {
    el.value().name() == name
}

pub fn is_any_tag(el: &ElementRef<'_>, names: &[&str]) -> bool {
    names.contains(&el.value().name())
}

/// Strict descendants of `el` that are elements, in document order.
pub fn descendant_elements<'a>(el: ElementRef<'a>) -> impl Iterator<Item = ElementRef<'a>> {
    el.descendants().skip(1).filter_map(ElementRef::wrap)
}

/// Strict descendants of `el` with one of the given tag names.
pub fn descendants_named<'a>(
    el: ElementRef<'a>,
    names: &'a [&'a str],
) -> impl Iterator<Item = ElementRef<'a>> {
    descendant_elements(el).filter(move |d| is_any_tag(d, names))
}

/// `el` itself and its descendants with one of the given tag names.
pub fn subtree_named<'a>(
    el: ElementRef<'a>,
    names: &'a [&'a str],
) -> impl Iterator<Item = ElementRef<'a>> {
    el.descendants()
        .filter_map(ElementRef::wrap)
        .filter(move |d| is_any_tag(d, names))
}

pub fn count_descendants(el: ElementRef<'_>, name: &str) -> usize {
    descendant_elements(el).filter(|d| is_tag(d, name)).count()
}

pub fn has_descendant(el: ElementRef<'_>, name: &str) -> bool {
    descendant_elements(el).any(|d| is_tag(&d, name))
}

/// Element children of `el` (text and comments skipped).
pub fn child_elements<'a>(el: ElementRef<'a>) -> impl Iterator<Item = ElementRef<'a>> {
    el.children().filter_map(ElementRef::wrap)
}

/// Element siblings following `el`, nearest first.
pub fn following_elements<'a>(el: ElementRef<'a>) -> impl Iterator<Item = ElementRef<'a>> {
    el.next_siblings().filter_map(ElementRef::wrap)
}

pub fn parent_element<'a>(el: &ElementRef<'a>) -> Option<ElementRef<'a>> {
    el.parent().and_then(ElementRef::wrap)
}

/// Whether any ancestor of `el` has one of the given tag names.
pub fn has_ancestor(el: &ElementRef<'_>, names: &[&str]) -> bool {
    el.ancestors()
        .filter_map(ElementRef::wrap)
        .any(|a| is_any_tag(&a, names))
}

pub fn class_attr<'a>(el: &ElementRef<'a>) -> &'a str {
    el.value().attr("class").unwrap_or("")
}

/// First element in the document with one of `names`, tried in order.
pub fn first_of<'a>(document: &'a Html, names: &[&str]) -> Option<ElementRef<'a>> {
    names.iter().find_map(|name| {
        document
            .root_element()
            .descendants()
            .filter_map(ElementRef::wrap)
            .find(|el| is_tag(el, name))
    })
}

/// Pre-order positions of every element under a root, for document-order
/// comparisons ("does this `<p>` come before that heading?").
///
/// Keyed by element address; only valid while the document is borrowed.
pub struct DocumentOrder {
    positions: HashMap<*const Element, usize>,
}

impl DocumentOrder {
    pub fn new(root: ElementRef<'_>) -> Self {
        let positions = root
            .descendants()
            .filter_map(ElementRef::wrap)
            .enumerate()
            .map(|(i, el)| (el.value() as *const Element, i))
            .collect();
        Self { positions }
    }

    pub fn position(&self, el: &ElementRef<'_>) -> Option<usize> {
        self.positions.get(&(el.value() as *const Element)).copied()
    }

    /// Whether `el` starts before `anchor` in pre-order.
    pub fn is_before(&self, el: &ElementRef<'_>, anchor: &ElementRef<'_>) -> bool {
        match (self.position(el), self.position(anchor)) {
            (Some(a), Some(b)) => a < b,
            _ => false,
        }
    }
}

/// Remove every element with one of `names` from the document tree.
pub fn strip_tags(document: &mut Html, names: &[&str]) {
    let ids: Vec<_> = document
        .root_element()
        .descendants()
        .filter_map(ElementRef::wrap)
        .filter(|el| is_any_tag(el, names))
        .map(|el| el.id())
        .collect();
    for id in ids {
        if let Some(mut node) = document.tree.get_mut(id) {
            node.detach();
        }
    }
}
