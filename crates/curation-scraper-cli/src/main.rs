//! Curation scraper: entry point.

use std::path::PathBuf;

use anyhow::Context;
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;

use curation_scraper::{page_from_html, Entity, EntityScraper, Source};
use curation_scraper_cli::{render_page, resolve_config, OutputFormat};

#[derive(Parser)]
#[command(
    name = "curation-scraper",
    about = "Extract structured page content and contact details for metadata curation",
    version
)]
struct Cli {
    /// Path to a JSON config file.
    /// Also reads CURATION_SCRAPER_CONFIG, then ./.curation-scraper.json.
    #[arg(short, long, global = true)]
    config: Option<String>,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch one URL and print its extracted content.
    Page {
        url: String,

        #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
        format: OutputFormat,
    },

    /// Extract content from a local HTML file.
    Extract {
        file: PathBuf,

        /// URL the file was saved from (drives content-type detection).
        #[arg(long)]
        url: String,

        #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
        format: OutputFormat,
    },

    /// Resolve and scrape every URL for one entity.
    Entity {
        /// Entity display name.
        #[arg(long)]
        name: String,

        /// Database id.
        #[arg(long, default_value_t = 0)]
        id: i64,

        /// Source catalogue name.
        #[arg(long)]
        source: Option<String>,

        /// Id of the entity in its source catalogue.
        #[arg(long)]
        source_id: Option<String>,

        /// Fallback URL (repeatable).
        #[arg(long = "url")]
        urls: Vec<String>,
    },

    /// Generate shell completion scripts.
    ///
    /// Examples:
    ///   curation-scraper completions bash > ~/.local/share/bash-completion/completions/curation-scraper
    ///   curation-scraper completions zsh > ~/.zfunc/_curation-scraper
    Completions {
        /// Shell type (bash, zsh, fish, powershell, elvish).
        shell: Shell,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&cli.log_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Page { url, format } => {
            let config = resolve_config(cli.config.as_deref())?;
            let scraper = EntityScraper::new(config)?;
            let page = scraper.scrape_url(&url).await?;
            println!("{}", render_page(&page, format)?);
        }

        Commands::Extract { file, url, format } => {
            let config = resolve_config(cli.config.as_deref())?;
            let html = std::fs::read_to_string(&file)
                .with_context(|| format!("reading {}", file.display()))?;
            let page = page_from_html(&url, &html, &config)?;
            println!("{}", render_page(&page, format)?);
        }

        Commands::Entity {
            name,
            id,
            source,
            source_id,
            urls,
        } => {
            let config = resolve_config(cli.config.as_deref())?;
            let scraper = EntityScraper::new(config)?;
            let entity = Entity {
                id,
                entity_name: name,
                source_internal_id: source_id,
                is_dummy: true,
            };
            let source = Source {
                id: None,
                name: source.unwrap_or_default(),
            };
            let report = scraper.scrape_entity(&entity, &source, &urls).await;
            for err in &report.errors {
                tracing::warn!("{err}");
            }
            println!("{}", serde_json::to_string_pretty(&report)?);
        }

        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            clap_complete::generate(shell, &mut cmd, "curation-scraper", &mut std::io::stdout());
        }
    }

    Ok(())
}
