//! Sequential, resumable batch over the extracted URL list.
//!
//! Each URL ends up skipped, completed or failed. Only the first two are
//! written to the progress ledger, so killing the process at any point leaves
//! the ledger listing exactly the products that were fully archived. Failed
//! URLs are retried on the next run.

use std::fs;

use tracing::{error, info};

use crate::archiver;
use crate::config::Config;
use crate::error::{Result, ScrapeError};
use crate::fetcher::{self, HttpFetch};
use crate::layout::PageLayout;
use crate::ledger::ProgressLedger;
use crate::models::ArchivedProduct;

pub const DEFAULT_LIMIT: usize = 99_999;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemOutcome {
    Skipped,
    Completed,
    Failed,
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct BatchSummary {
    /// URLs considered (the first `limit` of the file).
    pub total: usize,
    /// URLs not yet in the ledger when the run started.
    pub pending: usize,
    pub completed: usize,
    pub skipped: usize,
    pub failed: usize,
}

impl BatchSummary {
    fn record(&mut self, outcome: ItemOutcome) {
        match outcome {
            ItemOutcome::Skipped => self.skipped += 1,
            ItemOutcome::Completed => self.completed += 1,
            ItemOutcome::Failed => self.failed += 1,
        }
    }
}

pub struct BatchRunner<'a> {
    config: &'a Config,
    http: &'a dyn HttpFetch,
    layout: &'a dyn PageLayout,
}

impl<'a> BatchRunner<'a> {
    pub fn new(config: &'a Config, http: &'a dyn HttpFetch, layout: &'a dyn PageLayout) -> Self {
        Self { config, http, layout }
    }

    /// Processes up to `limit` URLs from `config.output_urls`.
    ///
    /// Fails only when the URL list cannot be read or the ledger cannot be
    /// written; per-product errors are logged and counted.
    pub fn run(&self, limit: usize) -> Result<BatchSummary> {
        let urls_path = &self.config.output_urls;
        let content = fs::read_to_string(urls_path).map_err(|e| ScrapeError::input(urls_path, e))?;
        let all_urls: Vec<&str> = content.lines().map(str::trim).filter(|l| !l.is_empty()).collect();

        let mut summary = BatchSummary::default();
        if all_urls.is_empty() {
            info!("No URLs in '{}'.", urls_path.display());
            return Ok(summary);
        }

        let mut ledger = ProgressLedger::load(&self.config.progress_file)?;
        let already_done = ledger.len();
        if !ledger.is_empty() {
            info!("Resuming: {already_done} URLs already recorded in '{}'", self.config.progress_file.display());
        }
        let selected = &all_urls[..limit.min(all_urls.len())];
        let pending: Vec<&str> = selected.iter().copied().filter(|url| !ledger.contains(url)).collect();
        summary.total = selected.len();
        summary.pending = pending.len();

        if pending.is_empty() {
            info!("--- All {} URLs were already processed. Nothing to do. ---", summary.total);
            return Ok(summary);
        }

        info!(
            "--- Processing {} URLs (of {}). Progress in '{}' ---",
            pending.len(),
            summary.total,
            self.config.progress_file.display()
        );
        let root = &self.config.products_dir;
        fs::create_dir_all(root).map_err(|e| ScrapeError::io(root, e))?;

        for (i, url) in pending.iter().enumerate() {
            info!("[{}/{}] {url}", already_done + i + 1, summary.total);
            let outcome = match self.process(url) {
                Ok(archived) => {
                    report(&archived);
                    ledger.append(url)?;
                    if archived.skipped { ItemOutcome::Skipped } else { ItemOutcome::Completed }
                }
                Err(e) => {
                    error!("  Failed to process {url}: {e} (not recorded, will retry next run)");
                    ItemOutcome::Failed
                }
            };
            summary.record(outcome);
        }

        info!(
            "--- Done: {} downloaded, {} skipped, {} failed. Folders in '{}'. Progress in '{}' ---",
            summary.completed,
            summary.skipped,
            summary.failed,
            root.display(),
            self.config.progress_file.display()
        );
        Ok(summary)
    }

    fn process(&self, url: &str) -> Result<ArchivedProduct> {
        let product = fetcher::fetch_product(self.http, self.layout, self.config.base_url(), url)?;
        archiver::archive_product(product, &self.config.products_dir, self.http)
    }
}

fn report(archived: &ArchivedProduct) {
    if archived.skipped {
        info!("  Skipped (folder already archived): {}", archived.product.name);
    } else {
        info!(
            "  OK: {} -> {} ({} images)",
            archived.product.name,
            archived.folder.display(),
            archived.downloaded_images.len()
        );
    }
}
