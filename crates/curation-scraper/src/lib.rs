//! Curation scraper: layout-preserving content extraction for entity pages.

pub mod config;
pub mod contact;
pub mod content_type;
pub mod error;
pub mod extract;
pub mod fetch;
pub mod orchestrator;
pub mod page;
pub mod render;
pub mod resolver;
pub mod sections;
pub mod types;

pub use config::ScraperConfig;
pub use content_type::{detect_content_type, get_config, ContentConfig, ContentType};
pub use error::{ConfigError, ExtractionError, FetchError, ScrapeError};
pub use fetch::{HtmlFetcher, HttpFetcher, HttpResponse};
pub use orchestrator::{page_from_html, placeholder_page, EntityScraper, ScrapeReport};
pub use page::extract_structured_content;
pub use render::render_text;
pub use resolver::{CurationClient, EntityContext, ResolvedUrls, Suggestion, UrlResolver, UrlSource};
pub use sections::SectionExtractor;
pub use types::*;
