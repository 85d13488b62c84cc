//! Segment a page into titled sections along its `<h2>` headings.
//!
//! Headings are the only segmentation signal that holds across sites. The
//! material before the first heading gets its own untitled section because
//! introductions and contact blocks usually live there. Pages without a
//! usable heading collapse into a single "Content" section.

use scraper::{ElementRef, Html};

use crate::content_type::ContentConfig;
use crate::extract::dom::{
    class_attr, count_descendants, dedup_key, descendants_named, element_text, first_of,
    following_elements, has_descendant, is_tag, parent_element, strip_tags, DocumentOrder,
};
use crate::extract::{ListExtractor, ParagraphExtractor};
use crate::types::Section;

/// Removed from the working copy before segmentation.
const STRIPPED_TAGS: &[&str] = &["script", "style", "nav", "footer", "aside"];

/// Preferred content containers, most specific first.
const ROOT_CANDIDATES: &[&str] = &["main", "article", "body"];

/// Class fragments of pre-heading divs that are page chrome.
const CHROME_CLASS_PATTERNS: &[&str] = &["nav", "menu", "card", "header", "footer", "sidebar"];

/// Pre-heading divs need more text than this to count as prose.
const MIN_LOOSE_DIV_CHARS: usize = 100;

const MAX_BULLETS: usize = 3;
const MAX_NESTED_DIVS: usize = 3;

/// Title of the single section produced when no heading survives.
pub const FALLBACK_SECTION_TITLE: &str = "Content";

/// Splits a document into [`Section`]s using the leaf extractors.
///
/// Sections leave `tables` empty; only the contact harvester fills them.
pub struct SectionExtractor<'c> {
    config: &'c ContentConfig,
    paragraphs: ParagraphExtractor<'c>,
    lists: ListExtractor<'c>,
}

impl<'c> SectionExtractor<'c> {
    pub fn new(config: &'c ContentConfig, max_list_items: usize) -> Self {
        Self {
            config,
            paragraphs: ParagraphExtractor::new(config),
            lists: ListExtractor::new(config, max_list_items),
        }
    }

    /// Sections in document order.
    ///
    /// Works on a copy of `document` with scripts, styles and page chrome
    /// removed; the caller's document is left untouched.
    pub fn extract(&self, document: &Html) -> Vec<Section> {
        let mut working = document.clone();
        strip_tags(&mut working, STRIPPED_TAGS);

        let Some(root) = first_of(&working, ROOT_CANDIDATES) else {
            return Vec::new();
        };

        let headings: Vec<ElementRef<'_>> = descendants_named(root, &["h2"])
            .filter(|h| {
                let text = element_text(h);
                !text.is_empty() && !self.config.is_skipped_heading(&text)
            })
            .collect();

        let Some(first) = headings.first() else {
            return vec![self.everything(root)];
        };

        let order = DocumentOrder::new(root);
        let mut sections = Vec::with_capacity(headings.len() + 1);
        sections.extend(self.before_heading(root, first, &order));
        for heading in &headings {
            sections.extend(self.under_heading(root, *heading));
        }

        if sections.is_empty() {
            sections.push(self.everything(root));
        }
        sections
    }

    // ── Before the first heading ────────────────────────────────────────────

    fn before_heading(
        &self,
        root: ElementRef<'_>,
        first: &ElementRef<'_>,
        order: &DocumentOrder,
    ) -> Option<Section> {
        let before = |el: &ElementRef<'_>| order.is_before(el, first);
        let mut section = Section::default();

        for p in descendants_named(root, &["p"]).filter(before) {
            let text = element_text(&p);
            if text.chars().count() > 1 {
                section.paragraphs.push(text);
            }
        }

        for div in descendants_named(root, &["div"]).filter(before) {
            if let Some(text) = self.loose_div_text(div) {
                let key = dedup_key(&text);
                if !section.paragraphs.iter().any(|p| dedup_key(p) == key) {
                    section.paragraphs.push(text);
                }
            }
        }

        for list in descendants_named(root, &["ul", "ol"]).filter(before) {
            let items = self.lists.items(list);
            if !items.is_empty() {
                section.lists.push(items);
            }
        }

        section.has_content().then_some(section)
    }

    /// Text of a `<p>`-less div that reads like prose rather than layout,
    /// navigation or a contact block.
    fn loose_div_text(&self, div: ElementRef<'_>) -> Option<String> {
        if has_descendant(div, "p")
            || has_descendant(div, "h2")
            || count_descendants(div, "div") > MAX_NESTED_DIVS
        {
            return None;
        }
        let class = class_attr(&div).to_lowercase();
        if CHROME_CLASS_PATTERNS.iter().any(|p| class.contains(p)) {
            return None;
        }

        let text = element_text(&div);
        if text.matches('•').count() > MAX_BULLETS || looks_like_contact_block(&text) {
            return None;
        }
        (text.chars().count() > MIN_LOOSE_DIV_CHARS).then_some(text)
    }

    // ── Heading sections ────────────────────────────────────────────────────

    fn under_heading(&self, root: ElementRef<'_>, heading: ElementRef<'_>) -> Option<Section> {
        let mut section = Section::titled(element_text(&heading));

        self.collect_until_heading(following_elements(heading), &mut section);

        let parent = parent_element(&heading);
        if !section.has_content() {
            // Never walk out of the root container.
            if let Some(parent) = parent.filter(|p| p.id() != root.id()) {
                self.collect_until_heading(following_elements(parent), &mut section);
            }
        }

        // Heading and content often share one wrapping div. A div holding
        // several headings is a layout container, and re-scanning it would
        // pull every sibling section's text under this heading.
        if let Some(parent) = parent.filter(|p| is_tag(p, "div")) {
            if count_descendants(parent, "h2") == 1 {
                self.rescan_wrapper(parent, &mut section);
            }
        }

        section.has_content().then_some(section)
    }

    fn collect_until_heading<'a>(
        &self,
        siblings: impl Iterator<Item = ElementRef<'a>>,
        section: &mut Section,
    ) {
        for el in siblings {
            if is_tag(&el, "h2") || has_descendant(el, "h2") {
                break;
            }
            self.collect_block(el, section);
        }
    }

    fn collect_block(&self, el: ElementRef<'_>, section: &mut Section) {
        match el.value().name() {
            "p" => {
                let text = element_text(&el);
                if text.chars().count() > 1 {
                    section.paragraphs.push(text);
                }
            }
            "ul" | "ol" => {
                let items = self.lists.items(el);
                if !items.is_empty() {
                    section.lists.push(items);
                }
            }
            _ => {
                section.paragraphs.extend(self.paragraphs.extract(el));
                section.lists.extend(self.lists.extract(el));
            }
        }
    }

    fn rescan_wrapper(&self, wrapper: ElementRef<'_>, section: &mut Section) {
        for p in descendants_named(wrapper, &["p"]) {
            let text = element_text(&p);
            if text.chars().count() > 1 && !section.paragraphs.contains(&text) {
                section.paragraphs.push(text);
            }
        }
        for list in descendants_named(wrapper, &["ul", "ol"]) {
            let items = self.lists.items(list);
            if !items.is_empty() && !section.lists.contains(&items) {
                section.lists.push(items);
            }
        }
    }

    // ── Fallback ────────────────────────────────────────────────────────────

    /// Every `<p>` and list under `root` as one "Content" section.
    /// Emitted even when empty so headingless pages always yield one section.
    fn everything(&self, root: ElementRef<'_>) -> Section {
        let mut section = Section::titled(FALLBACK_SECTION_TITLE);
        section.paragraphs = descendants_named(root, &["p"])
            .map(|p| element_text(&p))
            .filter(|text| !text.is_empty())
            .collect();
        section.lists = self.lists.extract(root);
        section
    }
}

/// Phone marker together with an e-mail or room marker. Such blocks are
/// left to the contact harvester.
fn looks_like_contact_block(text: &str) -> bool {
    let lower = text.to_lowercase();
    let has_tel = lower.contains("tel.") || lower.contains("tel:");
    let has_email = lower.contains("e-mail") || lower.contains('@');
    let has_room = lower.contains("room") || lower.contains("raum");
    has_tel && (has_email || has_room)
}
