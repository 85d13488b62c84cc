//! Core data types for scraped pages and the entities they describe.

use serde::{Deserialize, Serialize};

/// One discovered `{label, value}` fact, e.g. `Email: a@b.ch`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableRow {
    pub label: String,
    pub value: String,
}

impl TableRow {
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
        }
    }

    /// Case-insensitive identity used for contact-row deduplication.
    pub fn dedup_key(&self) -> (String, String) {
        (
            self.label.trim().to_lowercase(),
            self.value.trim().to_lowercase(),
        )
    }
}

/// Label/value rows pulled from a `<table>` or `<dl>`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Table {
    pub rows: Vec<TableRow>,
}

/// A titled run of content, in document order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    pub title: Option<String>,
    pub paragraphs: Vec<String>,
    pub lists: Vec<Vec<String>>,
    pub tables: Vec<Table>,
}

impl Section {
    /// Create an empty section with the given title.
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            ..Default::default()
        }
    }

    /// Whether the section has prose or list content. Tables do not count.
    pub fn has_content(&self) -> bool {
        !self.paragraphs.is_empty() || !self.lists.is_empty()
    }
}

/// An `<h1>`/`<h2>` page header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeaderItem {
    pub level: u8,
    pub text: String,
}

/// Page-level metadata from `<title>`, `<meta>` and `<html lang>`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageMetadata {
    pub title: Option<String>,
    pub description: Option<String>,
    pub keywords: Option<String>,
    pub language: Option<String>,
}

/// Layout-preserving view of one page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructuredContent {
    pub navigation: Option<String>,
    pub header: Vec<HeaderItem>,
    pub main_sections: Vec<Section>,
    pub footer: Option<String>,
    pub metadata: PageMetadata,
}

/// The per-URL result handed back to callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageContent {
    pub url: String,
    pub title: String,
    pub text_content: String,
    pub structured_content: Option<StructuredContent>,
    pub char_count: usize,
    pub word_count: usize,
    pub error: Option<String>,
}

impl PageContent {
    /// Build a successful page, computing counts from the rendered text.
    pub fn new(
        url: impl Into<String>,
        title: impl Into<String>,
        text_content: String,
        structured_content: Option<StructuredContent>,
    ) -> Self {
        let (char_count, word_count) = text_counts(&text_content);
        Self {
            url: url.into(),
            title: title.into(),
            text_content,
            structured_content,
            char_count,
            word_count,
            error: None,
        }
    }

    /// Build the degraded record for a URL that could not be scraped.
    pub fn failed(url: impl Into<String>, error: impl Into<String>) -> Self {
        let error = error.into();
        Self {
            url: url.into(),
            title: format!("Error: {error}"),
            text_content: format!("Failed to fetch: {error}"),
            structured_content: None,
            char_count: 0,
            word_count: 0,
            error: Some(error),
        }
    }

    pub fn is_placeholder(&self) -> bool {
        self.url.starts_with(PLACEHOLDER_SCHEME)
    }
}

/// URL scheme of synthesized pages for entities without a source URL.
pub const PLACEHOLDER_SCHEME: &str = "placeholder://";

/// Character and word counts of a rendered text.
pub fn text_counts(text: &str) -> (usize, usize) {
    (text.chars().count(), text.split_whitespace().count())
}

/// A curated entity (e.g. a digital edition or a researcher).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Entity {
    pub id: i64,
    pub entity_name: String,
    #[serde(default)]
    pub source_internal_id: Option<String>,
    /// Synthetic/demo records never hit the external curation API.
    #[serde(default = "default_is_dummy")]
    pub is_dummy: bool,
}

fn default_is_dummy() -> bool {
    true
}

/// The catalogue an entity was ingested from.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Source {
    #[serde(default)]
    pub id: Option<i64>,
    pub name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dedup_key_ignores_case_and_padding() {
        let a = TableRow::new(" Email ", "A@B.ch");
        let b = TableRow::new("email", "a@b.ch ");
        assert_eq!(a.dedup_key(), b.dedup_key());
    }

    #[test]
    fn test_section_tables_do_not_count_as_content() {
        let mut section = Section::titled("Contact");
        section.tables.push(Table {
            rows: vec![TableRow::new("Phone", "+41 44 000 00 00")],
        });
        assert!(!section.has_content());
        section.lists.push(vec!["item".to_string()]);
        assert!(section.has_content());
    }

    #[test]
    fn test_failed_page_has_zero_counts() {
        let page = PageContent::failed("https://example.com", "timeout");
        assert_eq!(page.char_count, 0);
        assert_eq!(page.word_count, 0);
        assert_eq!(page.title, "Error: timeout");
        assert_eq!(page.text_content, "Failed to fetch: timeout");
        assert!(page.structured_content.is_none());
        assert_eq!(page.error.as_deref(), Some("timeout"));
    }

    #[test]
    fn test_entity_defaults_to_dummy() {
        let entity: Entity =
            serde_json::from_str(r#"{"id": 7, "entity_name": "Some Edition"}"#).unwrap();
        assert!(entity.is_dummy);
        assert!(entity.source_internal_id.is_none());
    }

    #[test]
    fn test_text_counts_unicode() {
        assert_eq!(text_counts("Paippalāda über"), (15, 2));
    }
}
