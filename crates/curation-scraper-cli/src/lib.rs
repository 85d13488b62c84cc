//! Curation scraper CLI: config resolution and output formatting.

pub mod config;
pub mod output;

pub use config::{resolve_config, resolve_config_path};
pub use output::{render_page, OutputFormat};
