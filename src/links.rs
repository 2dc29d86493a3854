use std::fs;

use scraper::Html;
use tracing::info;

use crate::config::Config;
use crate::error::{Result, ScrapeError};
use crate::layout::PageLayout;

/// Absolute product URLs referenced by a saved listing page, in document order.
pub fn extract_product_links(html: &str, layout: &dyn PageLayout, base_url: Option<&str>) -> Vec<String> {
    let doc = Html::parse_document(html);
    layout
        .product_links(&doc)
        .into_iter()
        .map(|href| match base_url {
            Some(base) if !href.starts_with("http") => format!("{base}{href}"),
            _ => href,
        })
        .collect()
}

/// Reads `config.input_html` and writes one product URL per line to `config.output_urls`.
pub fn extract_links_to_file(config: &Config, layout: &dyn PageLayout) -> Result<Vec<String>> {
    info!("--- Reading {} ---", config.input_html.display());
    let html = fs::read_to_string(&config.input_html).map_err(|e| ScrapeError::input(&config.input_html, e))?;

    let urls = extract_product_links(&html, layout, config.base_url());
    info!("Found {} products.", urls.len());

    let mut out = urls.join("\n");
    if !out.is_empty() {
        out.push('\n');
    }
    fs::write(&config.output_urls, out).map_err(|e| ScrapeError::io(&config.output_urls, e))?;

    info!("--- Done! Saved {} links to '{}' ---", urls.len(), config.output_urls.display());
    Ok(urls)
}
