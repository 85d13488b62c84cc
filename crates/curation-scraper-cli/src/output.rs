//! Printing scraped pages.

use clap::ValueEnum;

use curation_scraper::PageContent;

/// How a single page is written to stdout.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Pretty-printed `PageContent` JSON.
    #[default]
    Json,
    /// Rendered plain text only.
    Text,
}

pub fn render_page(page: &PageContent, format: OutputFormat) -> serde_json::Result<String> {
    match format {
        OutputFormat::Json => serde_json::to_string_pretty(page),
        OutputFormat::Text => Ok(page.text_content.clone()),
    }
}
