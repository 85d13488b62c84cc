//! Per-entity scraping: resolve URLs, fetch each in turn, extract, render.
//!
//! A failing URL becomes a degraded [`PageContent`] and an entry in the
//! error list; it never stops the remaining URLs. An unexpected failure of
//! the whole call is caught and reported as one error string alongside
//! whatever pages were already produced.

use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures::FutureExt;
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

use crate::config::ScraperConfig;
use crate::error::{panic_message, ExtractionError, FetchError, ScrapeError};
use crate::fetch::{HtmlFetcher, HttpFetcher};
use crate::page::extract_structured_content;
use crate::render::render_text;
use crate::resolver::UrlResolver;
use crate::types::{Entity, PageContent, Source, PLACEHOLDER_SCHEME};

/// Pages and human-readable errors for one entity.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScrapeReport {
    pub pages: Vec<PageContent>,
    pub errors: Vec<String>,
}

/// Drives URL resolution, fetching and extraction for entities.
///
/// Holds no per-call state, so one instance can serve concurrent calls for
/// different entities.
#[derive(Clone)]
pub struct EntityScraper {
    config: ScraperConfig,
    resolver: UrlResolver,
    fetcher: Arc<dyn HtmlFetcher>,
}

impl EntityScraper {
    /// Scraper with an HTTP fetcher and no external curation client.
    pub fn new(config: ScraperConfig) -> Result<Self, FetchError> {
        let fetcher = HttpFetcher::new(&config)?;
        Ok(Self::with_parts(config, UrlResolver::default(), Arc::new(fetcher)))
    }

    pub fn with_parts(
        config: ScraperConfig,
        resolver: UrlResolver,
        fetcher: Arc<dyn HtmlFetcher>,
    ) -> Self {
        Self {
            config,
            resolver,
            fetcher,
        }
    }

    pub fn config(&self) -> &ScraperConfig {
        &self.config
    }

    /// Scrape every URL resolved for `entity`, in order.
    ///
    /// Always returns one page per resolved URL, or exactly one placeholder
    /// page when nothing resolved.
    pub async fn scrape_entity(
        &self,
        entity: &Entity,
        source: &Source,
        fallback_urls: &[String],
    ) -> ScrapeReport {
        let mut report = ScrapeReport::default();

        let run = self.scrape_into(entity, source, fallback_urls, &mut report);
        if let Err(payload) = AssertUnwindSafe(run).catch_unwind().await {
            let msg = format!(
                "Unexpected error scraping entity {}: {}",
                entity.entity_name,
                panic_message(payload.as_ref())
            );
            error!("{msg}");
            report.errors.push(msg);
        }

        info!(
            entity = %entity.entity_name,
            pages = report.pages.len(),
            errors = report.errors.len(),
            "entity scrape finished"
        );
        report
    }

    async fn scrape_into(
        &self,
        entity: &Entity,
        source: &Source,
        fallback_urls: &[String],
        report: &mut ScrapeReport,
    ) {
        let resolved = self.resolver.resolve(entity, fallback_urls).await;
        if resolved.is_empty() {
            report.pages.push(placeholder_page(entity, source));
            return;
        }

        for url in &resolved.urls {
            match self.scrape_url(url).await {
                Ok(page) => report.pages.push(page),
                Err(e) => {
                    let msg = format!("Error processing {url}: {e}");
                    error!("{msg}");
                    warn!(url = %url, kind = error_kind(&e), "returning degraded page");
                    report.errors.push(msg);
                    report.pages.push(PageContent::failed(url.as_str(), e.to_string()));
                }
            }
        }
    }

    /// Fetch and extract a single URL.
    pub async fn scrape_url(&self, url: &str) -> Result<PageContent, ScrapeError> {
        let response = self.fetcher.fetch_html(url).await?;
        let page = page_from_html(url, &response.body, &self.config)?;
        info!(
            url,
            chars = page.char_count,
            words = page.word_count,
            "scraped page"
        );
        Ok(page)
    }
}

/// Run the extraction pipeline over already-fetched HTML.
pub fn page_from_html(
    url: &str,
    html: &str,
    config: &ScraperConfig,
) -> Result<PageContent, ExtractionError> {
    let structured = extract_structured_content(html, url, config)?;
    let title = structured
        .metadata
        .title
        .clone()
        .unwrap_or_else(|| url.to_string());
    let text = render_text(&structured);
    Ok(PageContent::new(url, title, text, Some(structured)))
}

/// The synthesized page for an entity without any scrapeable URL.
pub fn placeholder_page(entity: &Entity, source: &Source) -> PageContent {
    let source_name = if source.name.trim().is_empty() {
        "Unknown"
    } else {
        source.name.as_str()
    };
    let text = format!(
        "Entity Information:\n\
         - Entity: {name}\n\
         - Source: {source_name}\n\
         - Source ID: {source_id}\n\
         - Database ID: {id}\n\
         \n\
         No URL was found and no context content is available for this entity.\n\
         \n\
         Metadata for this entity can still be curated manually or from suggestions.",
        name = entity.entity_name,
        source_id = entity.source_internal_id.as_deref().unwrap_or("N/A"),
        id = entity.id,
    );
    info!(entity = %entity.entity_name, "generated placeholder content");
    PageContent::new(
        format!("{PLACEHOLDER_SCHEME}entity-{}", entity.id),
        format!("Entity: {}", entity.entity_name),
        text,
        None,
    )
}

fn error_kind(err: &ScrapeError) -> &'static str {
    match err {
        ScrapeError::Fetch(e) => e.kind(),
        ScrapeError::Extraction(_) => "extraction",
    }
}
