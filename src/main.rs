mod archiver;
mod config;
mod error;
mod fetcher;
mod layout;
mod ledger;
mod links;
mod models;
mod parser;
mod runner;

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use clap::{CommandFactory, Parser};
use tracing::{Level, error};
use tracing_subscriber::FmtSubscriber;

use crate::config::{Config, normalize_base_url};
use crate::error::ScrapeError;
use crate::fetcher::HttpClient;
use crate::layout::LayoutKind;
use crate::runner::{BatchRunner, DEFAULT_LIMIT};

#[derive(Parser)]
#[command(name = "catalog_scraper")]
#[command(about = "Scraper: extract product URLs or download products")]
#[command(version)]
struct Cli {
    /// Extract product URLs from INPUT_HTML into OUTPUT_URLS
    #[arg(long, conflicts_with = "scrape")]
    get_urls: bool,

    /// Process OUTPUT_URLS: download images and write datos.json per product
    #[arg(long, alias = "scrapper")]
    scrape: bool,

    /// Maximum number of URLs to process from the top of OUTPUT_URLS
    #[arg(long, default_value_t = DEFAULT_LIMIT)]
    limit: usize,

    /// Site origin used to absolutize relative links
    #[arg(long, env = "BASE_URL")]
    base_url: Option<String>,

    /// Saved listing page
    #[arg(long, env = "INPUT_HTML", default_value = "items.txt")]
    input_html: PathBuf,

    /// Extracted product URLs, one per line
    #[arg(long, env = "OUTPUT_URLS", default_value = "urls.txt")]
    output_urls: PathBuf,

    /// Root directory for product folders
    #[arg(long, env = "CARPETA_PRODUCTOS", default_value = "productos")]
    products_dir: PathBuf,

    /// Ledger of completed URLs
    #[arg(long, env = "ARCHIVO_PROGRESO", default_value = "progreso_urls.txt")]
    progress_file: PathBuf,

    /// Storefront template the pages are built with
    #[arg(long, env = "PAGE_LAYOUT", value_enum, default_value_t = LayoutKind::Tiendanube)]
    layout: LayoutKind,

    /// Product page request timeout in seconds
    #[arg(long, env = "PAGE_TIMEOUT_SECS", default_value_t = 60)]
    page_timeout_secs: u64,

    /// Image download timeout in seconds
    #[arg(long, env = "IMAGE_TIMEOUT_SECS", default_value_t = 30)]
    image_timeout_secs: u64,

    /// Verbosity level
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    fn build_config(&self) -> Config {
        Config {
            base_url: normalize_base_url(self.base_url.as_deref()),
            input_html: self.input_html.clone(),
            output_urls: self.output_urls.clone(),
            products_dir: self.products_dir.clone(),
            progress_file: self.progress_file.clone(),
            layout: self.layout,
            page_timeout: Duration::from_secs(self.page_timeout_secs),
            image_timeout: Duration::from_secs(self.image_timeout_secs),
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = match cli.verbose {
        0 => Level::INFO,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    if !cli.get_urls && !cli.scrape {
        Cli::command().print_help()?;
        println!("\nExamples:");
        println!("  catalog_scraper --get-urls   # extract URLs from INPUT_HTML into OUTPUT_URLS");
        println!("  catalog_scraper --scrape     # download products listed in OUTPUT_URLS");
        return Ok(());
    }

    let config = cli.build_config();
    let layout = config.layout.build()?;

    if cli.get_urls {
        match links::extract_links_to_file(&config, layout.as_ref()) {
            Ok(_) => {}
            Err(ScrapeError::NotFound(path)) => {
                error!("'{}' not found. Save the listing page there first.", path.display());
            }
            Err(e) => error!("Link extraction failed: {e}"),
        }
        return Ok(());
    }

    let http = HttpClient::new(&config)?;
    match BatchRunner::new(&config, &http, layout.as_ref()).run(cli.limit) {
        Ok(_) => Ok(()),
        Err(ScrapeError::NotFound(path)) => {
            error!("'{}' not found. Run --get-urls first.", path.display());
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn flags_are_mutually_exclusive() {
        assert!(Cli::try_parse_from(["catalog_scraper", "--get-urls", "--scrape"]).is_err());
    }

    #[test]
    fn scrapper_alias_selects_batch_mode() {
        let cli = Cli::try_parse_from(["catalog_scraper", "--scrapper", "--base-url", "https://shop.test/"]).unwrap();
        assert!(cli.scrape);
        let config = cli.build_config();
        assert_eq!(config.base_url(), Some("https://shop.test"));
        assert_eq!(config.page_timeout, Duration::from_secs(60));
    }
}
