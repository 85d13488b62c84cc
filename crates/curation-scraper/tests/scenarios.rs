//! End-to-end scraping scenarios against a local mock HTTP server.

use std::sync::Arc;
use std::time::Duration;

use assert_json_diff::assert_json_include;
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use curation_scraper::{
    page_from_html, Entity, EntityScraper, HttpFetcher, ScraperConfig, Section, Source,
    TableRow, UrlResolver,
};

// ─────────────────────── helpers ───────────────────────

const TEAM_DETAIL: &str = r#"<html><body>
<div class="team-detail">
  <table><tr><td>Email</td><td><a href="mailto:a@b.ch">a@b.ch</a></td></tr></table>
</div>
</body></html>"#;

const EDITION_PAGE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head><title>Paippalāda Edition</title></head>
<body>
  <nav><a href="/">Home</a> <a href="/texts">Texts</a></nav>
  <main>
    <h1>The Paippalāda Recension</h1>
    <p>An electronic critical edition of the Atharvaveda.</p>
    <h2>Manuscripts</h2>
    <ul><li>Orissa manuscripts</li><li>Kashmir birch-bark</li></ul>
    <h2>Team</h2>
    <p>Edited by a group of Vedic scholars.</p>
  </main>
  <footer>Contact: info@edition.example.org</footer>
</body>
</html>"#;

fn entity(id: i64, name: &str) -> Entity {
    Entity {
        id,
        entity_name: name.to_string(),
        source_internal_id: None,
        is_dummy: true,
    }
}

fn scraper(config: ScraperConfig) -> EntityScraper {
    let fetcher = HttpFetcher::new(&config).unwrap();
    EntityScraper::with_parts(config, UrlResolver::default(), Arc::new(fetcher))
}

fn titles(sections: &[Section]) -> Vec<Option<&str>> {
    sections.iter().map(|s| s.title.as_deref()).collect()
}

async fn serve(route: &str, response: ResponseTemplate) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(response)
        .mount(&server)
        .await;
    server
}

// ─────────────────────── scenario A ───────────────────────

#[test]
fn test_contact_table_without_headings() {
    let page = page_from_html(
        "https://example.org/profile",
        TEAM_DETAIL,
        &ScraperConfig::default(),
    )
    .unwrap();
    let structured = page.structured_content.as_ref().unwrap();

    assert_eq!(
        titles(&structured.main_sections),
        vec![Some("Contact Information"), Some("Content")]
    );
    let contact = &structured.main_sections[0];
    assert_eq!(contact.tables.len(), 1);
    assert_eq!(contact.tables[0].rows, vec![TableRow::new("Email", "a@b.ch")]);
    assert!(structured.main_sections[1].tables.is_empty());
    assert_eq!(page.text_content.matches("Email: a@b.ch").count(), 1);
    assert_eq!(page.text_content, "Contact Information\n\nEmail: a@b.ch\n\nContent");
}

// ─────────────────────── scenario B ───────────────────────

#[tokio::test]
async fn test_timeout_yields_degraded_page() {
    let server = serve(
        "/slow",
        ResponseTemplate::new(200)
            .set_body_string("<p>too late</p>")
            .set_delay(Duration::from_secs(3)),
    )
    .await;
    let url = format!("{}/slow", server.uri());

    let report = scraper(ScraperConfig::default().with_timeout_secs(1))
        .scrape_entity(&entity(1, "Slow Site"), &Source::default(), &[url.clone()])
        .await;

    assert_eq!(report.pages.len(), 1);
    let page = &report.pages[0];
    assert!(page.error.is_some());
    assert!(page.structured_content.is_none());
    assert_eq!(page.char_count, 0);
    assert_eq!(page.word_count, 0);
    assert_eq!(report.errors.len(), 1);
    assert!(report.errors[0].contains(&url));
    assert!(report.errors[0].contains("timeout"));
}

// ─────────────────────── scenario C ───────────────────────

#[tokio::test]
async fn test_unresolvable_entity_gets_placeholder() {
    let source = Source {
        id: Some(3),
        name: "Digital Editions Catalogue".into(),
    };
    let report = scraper(ScraperConfig::default())
        .scrape_entity(&entity(99, "Unknown Corpus"), &source, &[])
        .await;

    assert!(report.errors.is_empty());
    assert_eq!(report.pages.len(), 1);
    let page = &report.pages[0];
    assert!(page.url.starts_with("placeholder://"));
    assert_eq!(page.url, "placeholder://entity-99");
    assert!(page.text_content.contains("Unknown Corpus"));
    assert!(page.text_content.contains("Digital Editions Catalogue"));
    assert!(page.text_content.contains("Source ID: N/A"));
    assert!(page.structured_content.is_none());
}

// ─────────────────────── full pipeline ───────────────────────

#[tokio::test]
async fn test_scrape_served_page() {
    let server = serve(
        "/edition",
        ResponseTemplate::new(200).set_body_raw(EDITION_PAGE, "text/html; charset=utf-8"),
    )
    .await;
    let url = format!("{}/edition", server.uri());

    let report = scraper(ScraperConfig::default())
        .scrape_entity(&entity(5, "Some Edition"), &Source::default(), &[url.clone()])
        .await;

    assert!(report.errors.is_empty());
    let page = &report.pages[0];
    assert_eq!(page.url, url);
    assert_eq!(page.title, "Paippalāda Edition");
    assert!(page.error.is_none());
    assert_eq!(page.char_count, page.text_content.chars().count());

    let structured = page.structured_content.as_ref().unwrap();
    assert_eq!(structured.metadata.language.as_deref(), Some("en"));
    assert_eq!(structured.navigation.as_deref(), Some("Home Texts"));
    assert_eq!(
        structured.footer.as_deref(),
        Some("Contact: info@edition.example.org")
    );
    assert_eq!(
        titles(&structured.main_sections),
        vec![
            Some("Contact Information"),
            None,
            Some("Manuscripts"),
            Some("Team")
        ]
    );
    assert_eq!(
        structured.main_sections[2].lists,
        vec![vec![
            "Orissa manuscripts".to_string(),
            "Kashmir birch-bark".to_string()
        ]]
    );
    assert!(page.text_content.starts_with("The Paippalāda Recension"));
    assert!(page.text_content.contains("• Orissa manuscripts"));
}

#[tokio::test]
async fn test_non_html_content_type_still_extracts() {
    let server = serve(
        "/raw",
        ResponseTemplate::new(200)
            .set_body_raw("<p>Served as octet stream</p>", "application/octet-stream"),
    )
    .await;
    let url = format!("{}/raw", server.uri());

    let page = scraper(ScraperConfig::default())
        .scrape_url(&url)
        .await
        .unwrap();
    assert!(page.text_content.contains("Served as octet stream"));
}

#[tokio::test]
async fn test_mixed_results_keep_url_order() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/ok"))
        .respond_with(
            ResponseTemplate::new(200).set_body_raw("<p>Present</p>", "text/html"),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/gone"))
        .respond_with(ResponseTemplate::new(410))
        .mount(&server)
        .await;

    let urls = vec![
        format!("{}/gone", server.uri()),
        format!("{}/ok", server.uri()),
    ];
    let report = scraper(ScraperConfig::default())
        .scrape_entity(&entity(2, "Half Broken"), &Source::default(), &urls)
        .await;

    assert_eq!(report.pages.len(), 2);
    assert_eq!(report.pages[0].url, urls[0]);
    assert_eq!(
        report.pages[0].error.as_deref(),
        Some(format!("HTTP error 410: {}", urls[0]).as_str())
    );
    assert_eq!(report.pages[1].url, urls[1]);
    assert!(report.pages[1].error.is_none());
    assert_eq!(
        report.errors,
        vec![format!("Error processing {0}: HTTP error 410: {0}", urls[0])]
    );
}

// ─────────────────────── serialized shape ───────────────────────

#[test]
fn test_page_content_json_shape() {
    let page = page_from_html(
        "https://example.org/profile",
        TEAM_DETAIL,
        &ScraperConfig::default(),
    )
    .unwrap();
    let value = serde_json::to_value(&page).unwrap();

    assert_json_include!(
        actual: value,
        expected: json!({
            "url": "https://example.org/profile",
            "title": "https://example.org/profile",
            "error": null,
            "structured_content": {
                "navigation": null,
                "footer": null,
                "header": [],
                "main_sections": [
                    {
                        "title": "Contact Information",
                        "paragraphs": [],
                        "lists": [],
                        "tables": [{ "rows": [{ "label": "Email", "value": "a@b.ch" }] }]
                    },
                    { "title": "Content", "tables": [] }
                ],
                "metadata": { "title": null, "language": null }
            }
        })
    );
}
