//! Whole-page extraction: metadata, navigation, headers, sections, footer
//! and merged contact data.

use std::panic::{self, AssertUnwindSafe};
use std::sync::LazyLock;

use scraper::{ElementRef, Html, Selector};
use tracing::{debug, info};

use crate::config::ScraperConfig;
use crate::contact;
use crate::content_type::detect_content_type;
use crate::error::{panic_message, ExtractionError};
use crate::extract::dom::{element_text, normalize_ws};
use crate::sections::SectionExtractor;
use crate::types::{HeaderItem, PageMetadata, StructuredContent};

/// At most this many `<nav>`/`<header>` blocks and `<h1>`/`<h2>` headers each.
const MAX_PAGE_CHROME: usize = 3;

#[allow(clippy::expect_used)]
static TITLE_SEL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("title").expect("title selector is valid"));
#[allow(clippy::expect_used)]
static DESCRIPTION_SEL: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(r#"meta[name="description"]"#).expect("description selector is valid")
});
#[allow(clippy::expect_used)]
static KEYWORDS_SEL: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(r#"meta[name="keywords"]"#).expect("keywords selector is valid")
});
#[allow(clippy::expect_used)]
static NAV_SEL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("nav, header").expect("nav selector is valid"));
#[allow(clippy::expect_used)]
static H1_SEL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("h1").expect("h1 selector is valid"));
#[allow(clippy::expect_used)]
static H2_SEL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("h2").expect("h2 selector is valid"));
#[allow(clippy::expect_used)]
static FOOTER_SEL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("footer").expect("footer selector is valid"));

/// Extract the layout-preserving view of one page.
///
/// Any panic inside the HTML pipeline is caught and reported as an
/// [`ExtractionError`] naming `url`.
pub fn extract_structured_content(
    html: &str,
    url: &str,
    config: &ScraperConfig,
) -> Result<StructuredContent, ExtractionError> {
    panic::catch_unwind(AssertUnwindSafe(|| build_structured_content(html, url, config))).map_err(
        |payload| ExtractionError::Parser {
            url: url.to_string(),
            detail: panic_message(payload.as_ref()),
        },
    )
}

fn build_structured_content(html: &str, url: &str, config: &ScraperConfig) -> StructuredContent {
    let document = Html::parse_document(html);

    let content_type = detect_content_type(url, &document);
    debug!(url, content_type = content_type.as_str(), "detected content type");

    let mut main_sections =
        SectionExtractor::new(content_type.config(), config.max_list_items).extract(&document);

    let contact_rows = contact::harvest(&document);
    if contact_rows.is_empty() {
        debug!(url, "no contact information found");
    }
    contact::merge_into_sections(&mut main_sections, contact_rows);

    let structured = StructuredContent {
        navigation: navigation(&document, config.max_nav_length),
        header: headers(&document),
        main_sections,
        footer: footer(&document, config.max_footer_length),
        metadata: metadata(&document),
    };

    info!(
        url,
        sections = structured.main_sections.len(),
        headers = structured.header.len(),
        "extracted structured content"
    );
    structured
}

// ── Page chrome ─────────────────────────────────────────────────────────────

/// `<title>`, meta description/keywords and `<html lang>`.
pub fn metadata(document: &Html) -> PageMetadata {
    let meta_content = |sel: &Selector| {
        document
            .select(sel)
            .next()
            .and_then(|m| m.value().attr("content"))
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .map(str::to_string)
    };

    PageMetadata {
        title: page_title(document),
        description: meta_content(&DESCRIPTION_SEL),
        keywords: meta_content(&KEYWORDS_SEL),
        language: document
            .root_element()
            .value()
            .attr("lang")
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(str::to_string),
    }
}

/// Trimmed `<title>` text, if any.
pub fn page_title(document: &Html) -> Option<String> {
    document
        .select(&TITLE_SEL)
        .next()
        .map(|t| element_text(&t))
        .filter(|t| !t.is_empty())
}

/// The first few `<nav>`/`<header>` blocks shorter than `max_len`, joined by ` | `.
pub fn navigation(document: &Html, max_len: usize) -> Option<String> {
    let parts: Vec<String> = document
        .select(&NAV_SEL)
        .take(MAX_PAGE_CHROME)
        .map(|nav| spaced_text(&nav))
        .filter(|text| !text.is_empty() && text.chars().count() < max_len)
        .collect();
    (!parts.is_empty()).then(|| parts.join(" | "))
}

/// Up to three `<h1>` then up to three `<h2>`.
pub fn headers(document: &Html) -> Vec<HeaderItem> {
    let take = |sel: &Selector, level: u8| {
        document
            .select(sel)
            .take(MAX_PAGE_CHROME)
            .map(|h| element_text(&h))
            .filter(|text| !text.is_empty())
            .map(move |text| HeaderItem { level, text })
            .collect::<Vec<_>>()
    };
    let mut out = take(&H1_SEL, 1);
    out.extend(take(&H2_SEL, 2));
    out
}

/// Text of the first `<footer>` when shorter than `max_len`.
pub fn footer(document: &Html, max_len: usize) -> Option<String> {
    document
        .select(&FOOTER_SEL)
        .next()
        .map(|f| spaced_text(&f))
        .filter(|text| !text.is_empty() && text.chars().count() < max_len)
}

/// Text nodes joined by spaces, so adjacent links do not run together.
fn spaced_text(el: &ElementRef<'_>) -> String {
    normalize_ws(&el.text().collect::<Vec<_>>().join(" "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TableRow;

    const PROFILE_PAGE: &str = r#"<!DOCTYPE html>
<html lang="de">
<head>
  <title> Prof. Dr. Jane Doe | Historisches Seminar </title>
  <meta name="description" content=" Profile page ">
  <meta name="keywords" content="">
</head>
<body>
  <header><a href="/">Home</a><a href="/team">Team</a></header>
  <nav><ul><li>Lehre</li><li>Forschung</li></ul></nav>
  <main>
    <h1>Jane Doe</h1>
    <p>Jane Doe is professor of medieval history.</p>
    <h2>Forschung</h2>
    <p>Legal history of the high middle ages.</p>
    <h2>Kontakt</h2>
    <table><tr><td>Room</td><td>KOL-F-101</td></tr></table>
    <p>Sprechstunde nach Vereinbarung.</p>
  </main>
  <footer>© Universität Zürich</footer>
  <a href="mailto:jane.doe@uzh.ch">E-Mail</a>
</body>
</html>"#;

    #[test]
    fn test_metadata() {
        let doc = Html::parse_document(PROFILE_PAGE);
        let meta = metadata(&doc);
        assert_eq!(
            meta.title.as_deref(),
            Some("Prof. Dr. Jane Doe | Historisches Seminar")
        );
        assert_eq!(meta.description.as_deref(), Some("Profile page"));
        assert_eq!(meta.keywords, None);
        assert_eq!(meta.language.as_deref(), Some("de"));
    }

    #[test]
    fn test_navigation_and_footer() {
        let doc = Html::parse_document(PROFILE_PAGE);
        assert_eq!(
            navigation(&doc, 800).as_deref(),
            Some("Home Team | Lehre Forschung")
        );
        assert_eq!(navigation(&doc, 5), None);
        assert_eq!(footer(&doc, 500).as_deref(), Some("© Universität Zürich"));
        assert_eq!(footer(&doc, 10), None);
    }

    #[test]
    fn test_headers_h1_then_h2() {
        let doc = Html::parse_document(PROFILE_PAGE);
        let h = headers(&doc);
        assert_eq!(h.len(), 3);
        assert_eq!((h[0].level, h[0].text.as_str()), (1, "Jane Doe"));
        assert_eq!((h[2].level, h[2].text.as_str()), (2, "Kontakt"));
    }

    #[test]
    fn test_structured_content_merges_contact_into_kontakt() {
        let url = "https://www.hist.uzh.ch/de/team/doe.html";
        let out = extract_structured_content(PROFILE_PAGE, url, &ScraperConfig::default()).unwrap();
        let titles: Vec<_> = out.main_sections.iter().map(|s| s.title.as_deref()).collect();
        assert_eq!(titles, vec![None, Some("Forschung"), Some("Kontakt")]);

        let kontakt = &out.main_sections[2];
        assert_eq!(kontakt.tables.len(), 1);
        let rows = &kontakt.tables[0].rows;
        assert_eq!(rows[0], TableRow::new("Room", "KOL-F-101"));
        assert!(rows.contains(&TableRow::new("Email", "jane.doe@uzh.ch")));
    }

    #[test]
    fn test_empty_input_does_not_fail() {
        let out = extract_structured_content("", "https://example.org", &ScraperConfig::default())
            .unwrap();
        assert_eq!(out.main_sections.len(), 1);
        assert!(out.navigation.is_none());
        assert!(out.metadata.title.is_none());
    }
}
