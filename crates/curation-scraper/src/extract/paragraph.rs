use scraper::ElementRef;

use super::dom::{
    class_attr, count_descendants, descendants_named, element_text, has_descendant, is_tag,
};
use super::SeenText;
use crate::content_type::ContentConfig;

/// Content divs nesting more divs than this are layout, not prose.
const MAX_NESTED_DIVS: usize = 3;

/// Pulls paragraph strings out of a subtree according to a [`ContentConfig`].
#[derive(Debug, Clone, Copy)]
pub struct ParagraphExtractor<'c> {
    config: &'c ContentConfig,
}

impl<'c> ParagraphExtractor<'c> {
    pub fn new(config: &'c ContentConfig) -> Self {
        Self { config }
    }

    /// Paragraphs under `root`, in document order.
    ///
    /// A content div that is itself a leaf (no nested `div`, no `<p>`) is
    /// returned whole as the only paragraph.
    pub fn extract(&self, root: ElementRef<'_>) -> Vec<String> {
        let mut seen = SeenText::new(self.config.deduplicate);
        let mut out = Vec::new();

        if self.config.is_content_class(class_attr(&root))
            && !has_descendant(root, "div")
            && !has_descendant(root, "p")
        {
            let text = element_text(&root);
            if !text.is_empty() {
                out.push(text);
            }
            return out;
        }

        let own_p = is_tag(&root, "p").then_some(root);
        for p in own_p.into_iter().chain(descendants_named(root, &["p"])) {
            let text = element_text(&p);
            if self.long_enough(&text) && seen.admit(&text) {
                out.push(text);
            }
        }

        for div in descendants_named(root, &["div"]) {
            if !self.config.is_content_class(class_attr(&div))
                || has_descendant(div, "p")
                || count_descendants(div, "div") > MAX_NESTED_DIVS
            {
                continue;
            }
            let text = element_text(&div);
            if self.long_enough(&text) && seen.admit(&text) {
                out.push(text);
            }
        }

        out
    }

    fn long_enough(&self, text: &str) -> bool {
        text.chars().count() >= self.config.min_paragraph_length
    }
}
