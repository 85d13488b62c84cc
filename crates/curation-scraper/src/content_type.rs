//! Page classification and per-class extraction parameters.
//!
//! Classification is a pure function of the URL and the raw markup; the
//! selected [`ContentConfig`] is a compile-time preset and is never mutated.

use scraper::Html;
use serde::{Deserialize, Serialize};

/// The kinds of page the extractor knows how to tune for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentType {
    ResearcherProfile,
    DigitalEdition,
    #[serde(rename = "institutional_page")]
    Institutional,
    Generic,
}

impl ContentType {
    /// The preset extraction parameters for this kind of page.
    pub fn config(self) -> &'static ContentConfig {
        match self {
            Self::ResearcherProfile => &RESEARCHER_PROFILE,
            Self::DigitalEdition => &DIGITAL_EDITION,
            Self::Institutional => &INSTITUTIONAL,
            Self::Generic => &GENERIC,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::ResearcherProfile => "researcher_profile",
            Self::DigitalEdition => "digital_edition",
            Self::Institutional => "institutional_page",
            Self::Generic => "generic",
        }
    }
}

/// How sections are segmented. Headings are the only signal the section
/// extractor acts on today; the other strategies are carried for callers
/// that inspect the preset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionStrategy {
    Headings,
    Divs,
    Both,
}

/// Extraction parameters selected once per page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContentConfig {
    pub content_type: ContentType,
    /// CSS class substrings that mark a `div` as holding body prose.
    pub content_div_patterns: &'static [&'static str],
    pub section_strategy: SectionStrategy,
    /// Drop repeated paragraphs/list items within one extraction pass.
    pub deduplicate: bool,
    /// Minimum trimmed length (characters) of a kept paragraph.
    pub min_paragraph_length: usize,
    /// `<h2>` texts containing any of these are navigation, not sections.
    pub skip_heading_keywords: &'static [&'static str],
}

impl ContentConfig {
    /// Whether a `class` attribute value matches one of the content-div patterns.
    pub fn is_content_class(&self, class_attr: &str) -> bool {
        let lower = class_attr.to_lowercase();
        !lower.is_empty() && self.content_div_patterns.iter().any(|p| lower.contains(p))
    }

    /// Whether a heading text marks navigation rather than content.
    pub fn is_skipped_heading(&self, heading_text: &str) -> bool {
        let lower = heading_text.trim().to_lowercase();
        self.skip_heading_keywords.iter().any(|k| lower.contains(k))
    }
}

pub static RESEARCHER_PROFILE: ContentConfig = ContentConfig {
    content_type: ContentType::ResearcherProfile,
    content_div_patterns: &[
        "personcard--content",
        "textimage--content",
        "richtext",
        "person-bio",
        "biography",
        "team-detail",
        "staff-profile",
        "content",
        "text",
        "main",
        "body",
        "article",
        "section",
        "info",
        "about",
        "detail",
    ],
    section_strategy: SectionStrategy::Both,
    deduplicate: false,
    min_paragraph_length: 5,
    skip_heading_keywords: &[
        "navigation",
        "footer",
        "sprachwahl",
        "wichtige seiten",
        "rechtliches",
        "impressum",
        "adresse",
        "partner",
        "hier",
        "quicklinks",
        "hauptnavigation",
        "weiterführende",
        "menu",
        "sidebar",
        "widget",
    ],
};

// Variant readings are intentional in scholarly texts, so never dedupe.
pub static DIGITAL_EDITION: ContentConfig = ContentConfig {
    content_type: ContentType::DigitalEdition,
    content_div_patterns: &[
        "edition-content",
        "text-body",
        "manuscript-text",
        "critical-text",
        "apparatus",
        "commentary",
        "annotation",
        "transcription",
        "diplomatic",
        "normalized",
        "content",
        "text",
        "main",
        "body",
        "article",
        "section",
    ],
    section_strategy: SectionStrategy::Headings,
    deduplicate: false,
    min_paragraph_length: 5,
    skip_heading_keywords: &["navigation", "menu", "footer", "copyright"],
};

pub static INSTITUTIONAL: ContentConfig = ContentConfig {
    content_type: ContentType::Institutional,
    content_div_patterns: &[
        "main-content",
        "page-content",
        "article-body",
        "content-area",
        "content",
        "text",
        "main",
        "body",
        "article",
        "section",
    ],
    section_strategy: SectionStrategy::Headings,
    deduplicate: false,
    min_paragraph_length: 5,
    skip_heading_keywords: &["navigation", "menu", "footer", "sidebar"],
};

pub static GENERIC: ContentConfig = ContentConfig {
    content_type: ContentType::Generic,
    content_div_patterns: &[
        "content",
        "article",
        "main",
        "body-content",
        "text",
        "body",
        "section",
        "info",
        "about",
    ],
    section_strategy: SectionStrategy::Headings,
    deduplicate: false,
    min_paragraph_length: 5,
    skip_heading_keywords: &["navigation", "menu", "footer"],
};

const EDITION_URL_KEYWORDS: &[&str] = &["edition", "manuscript", "archive", "corpus"];

const EDITION_TEXT_KEYWORDS: &[&str] = &[
    "edition",
    "manuscript",
    "diplomatic",
    "apparatus",
    "transcription",
    "critical edition",
    "textual witness",
    "variant",
    "lemma",
    "manuscript description",
];

const PROFILE_URL_KEYWORDS: &[&str] = &["team", "people", "personen", "staff"];

const PROFILE_CLASSES: &[&str] = &[
    "personcard",
    "team-detail",
    "staff-profile",
    "researcher-profile",
];

const PROFILE_TEXT_KEYWORDS: &[&str] = &[
    "personcard",
    "staff",
    "team",
    "researcher",
    "professor",
    "publikationen",
    "publications",
    "forschung",
    "research",
    "cv",
    "curriculum vitae",
    "biography",
];

const INSTITUTIONAL_URL_KEYWORDS: &[&str] = &["about", "ueber", "institut", "department"];

/// Minimum number of profile keywords in the markup to call it a profile.
const PROFILE_KEYWORD_THRESHOLD: usize = 3;

/// Classify a page. First matching rule wins; [`ContentType::Generic`] is
/// the universal fallback.
pub fn detect_content_type(url: &str, document: &Html) -> ContentType {
    detect_from_markup(url, &document.html())
}

/// Same as [`detect_content_type`] over already-serialized markup.
pub fn detect_from_markup(url: &str, markup: &str) -> ContentType {
    let url_lower = url.to_lowercase();
    let text = markup.to_lowercase();

    let contains_any =
        |haystack: &str, needles: &[&str]| needles.iter().any(|n| haystack.contains(n));

    if contains_any(&url_lower, EDITION_URL_KEYWORDS) {
        return ContentType::DigitalEdition;
    }
    if contains_any(&text, EDITION_TEXT_KEYWORDS) {
        return ContentType::DigitalEdition;
    }
    if contains_any(&url_lower, PROFILE_URL_KEYWORDS) {
        return ContentType::ResearcherProfile;
    }
    if contains_any(&text, PROFILE_CLASSES) {
        return ContentType::ResearcherProfile;
    }
    let profile_hits = PROFILE_TEXT_KEYWORDS
        .iter()
        .filter(|k| text.contains(*k))
        .count();
    if profile_hits >= PROFILE_KEYWORD_THRESHOLD {
        return ContentType::ResearcherProfile;
    }
    if contains_any(&url_lower, INSTITUTIONAL_URL_KEYWORDS) {
        return ContentType::Institutional;
    }
    ContentType::Generic
}

/// Detect the content type and return its preset.
pub fn get_config(url: &str, document: &Html) -> &'static ContentConfig {
    detect_content_type(url, document).config()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn detect(url: &str, body: &str) -> ContentType {
        let html = format!("<html><body>{body}</body></html>");
        detect_content_type(url, &Html::parse_document(&html))
    }

    #[test]
    fn test_edition_url_wins_over_profile_url() {
        assert_eq!(
            detect("https://example.org/team/edition", "<p>Hello</p>"),
            ContentType::DigitalEdition
        );
    }

    #[test]
    fn test_edition_vocabulary_in_text() {
        assert_eq!(
            detect("https://example.org/x", "<p>The apparatus lists readings.</p>"),
            ContentType::DigitalEdition
        );
    }

    #[test]
    fn test_profile_url() {
        assert_eq!(
            detect("https://www.uzh.ch/personen/jdoe", "<p>Hello</p>"),
            ContentType::ResearcherProfile
        );
    }

    #[test]
    fn test_profile_class_in_markup() {
        assert_eq!(
            detect("https://example.org/x", r#"<div class="team-detail">Jane</div>"#),
            ContentType::ResearcherProfile
        );
    }

    #[test]
    fn test_profile_vocabulary_threshold() {
        assert_eq!(
            detect(
                "https://example.org/x",
                "<p>Professor of history. Publications and biography.</p>"
            ),
            ContentType::ResearcherProfile
        );
        assert_eq!(
            detect("https://example.org/x", "<p>Professor of history.</p>"),
            ContentType::Generic
        );
    }

    #[test]
    fn test_institutional_url() {
        assert_eq!(
            detect("https://example.org/about-us", "<p>Hello world</p>"),
            ContentType::Institutional
        );
    }

    #[test]
    fn test_generic_fallback() {
        assert_eq!(
            detect("https://example.org/", "<p>Hello world</p>"),
            ContentType::Generic
        );
    }

    #[test]
    fn test_presets_match_their_type() {
        for ct in [
            ContentType::ResearcherProfile,
            ContentType::DigitalEdition,
            ContentType::Institutional,
            ContentType::Generic,
        ] {
            assert_eq!(ct.config().content_type, ct);
        }
    }

    #[test]
    fn test_type_names_match_serialized_form() {
        for ct in [
            ContentType::ResearcherProfile,
            ContentType::DigitalEdition,
            ContentType::Institutional,
            ContentType::Generic,
        ] {
            let json = serde_json::to_value(ct).unwrap();
            assert_eq!(json, ct.as_str());
        }
        assert_eq!(ContentType::Institutional.as_str(), "institutional_page");
        let parsed: ContentType = serde_json::from_str(r#""institutional_page""#).unwrap();
        assert_eq!(parsed, ContentType::Institutional);
    }

    #[test]
    fn test_class_and_heading_matching() {
        let cfg = ContentType::Generic.config();
        assert!(cfg.is_content_class("col Main-Content"));
        assert!(!cfg.is_content_class(""));
        assert!(!cfg.is_content_class("sidebar"));
        assert!(cfg.is_skipped_heading("  Main Navigation "));
        assert!(!cfg.is_skipped_heading("Research"));
    }
}
