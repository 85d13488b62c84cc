use scraper::ElementRef;

use super::dom::{child_elements, element_text, is_tag, subtree_named};
use super::SeenText;
use crate::content_type::ContentConfig;

/// Collects `<ul>`/`<ol>` items under a subtree.
#[derive(Debug, Clone, Copy)]
pub struct ListExtractor<'c> {
    config: &'c ContentConfig,
    max_items: usize,
}

impl<'c> ListExtractor<'c> {
    pub fn new(config: &'c ContentConfig, max_items: usize) -> Self {
        Self { config, max_items }
    }

    /// One entry per non-empty list, items from direct `<li>` children only.
    pub fn extract(&self, root: ElementRef<'_>) -> Vec<Vec<String>> {
        let mut seen = SeenText::new(self.config.deduplicate);
        subtree_named(root, &["ul", "ol"])
            .map(|list| self.collect_items(list, &mut seen))
            .filter(|items| !items.is_empty())
            .collect()
    }

    /// Items of a single `<ul>`/`<ol>`.
    pub fn items(&self, list: ElementRef<'_>) -> Vec<String> {
        self.collect_items(list, &mut SeenText::new(self.config.deduplicate))
    }

    fn collect_items(&self, list: ElementRef<'_>, seen: &mut SeenText) -> Vec<String> {
        child_elements(list)
            .filter(|li| is_tag(li, "li"))
            .map(|li| element_text(&li))
            .filter(|text| !text.is_empty() && seen.admit(text))
            .take(self.max_items)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content_type::GENERIC;
    use crate::extract::dom::first_of;
    use scraper::Html;

    #[test]
    fn test_direct_items_only_and_empty_lists_dropped() {
        let doc = Html::parse_document(
            "<html><body><ul><li>One</li><li> Two </li><li></li></ul><ol></ol></body></html>",
        );
        let root = first_of(&doc, &["body"]).unwrap();
        let lists = ListExtractor::new(&GENERIC, 20).extract(root);
        assert_eq!(lists, vec![vec!["One".to_string(), "Two".to_string()]]);
    }

    #[test]
    fn test_item_cap() {
        let items: String = (0..30).map(|i| format!("<li>Item {i}</li>")).collect();
        let doc = Html::parse_document(&format!("<html><body><ul>{items}</ul></body></html>"));
        let root = first_of(&doc, &["body"]).unwrap();
        let lists = ListExtractor::new(&GENERIC, 20).extract(root);
        assert_eq!(lists[0].len(), 20);
        assert_eq!(lists[0][19], "Item 19");
    }

    #[test]
    fn test_root_list_is_included() {
        let doc = Html::parse_document("<html><body><ol><li>Alpha</li></ol></body></html>");
        let ol = first_of(&doc, &["ol"]).unwrap();
        assert_eq!(ListExtractor::new(&GENERIC, 20).extract(ol).len(), 1);
    }
}
