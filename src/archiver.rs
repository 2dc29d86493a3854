use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::warn;
use uuid::Uuid;

use crate::error::{Result, ScrapeError};
use crate::fetcher::HttpFetch;
use crate::models::{ArchivedProduct, FolderRecord, Product};

pub const METADATA_FILE: &str = "datos.json";
const MAX_FOLDER_NAME: usize = 80;
const FALLBACK_FOLDER_NAME: &str = "producto";

pub fn sanitize_folder_name(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .filter(|c| !matches!(c, '<' | '>' | ':' | '"' | '/' | '\\' | '|' | '?' | '*'))
        .collect();
    let trimmed = cleaned.trim();
    let base = if trimmed.is_empty() { FALLBACK_FOLDER_NAME } else { trimmed };
    base.chars().take(MAX_FOLDER_NAME).collect()
}

/// Only the URL decides ownership; other fields of `datos.json` may be absent.
#[derive(Deserialize)]
struct RecordedUrl {
    source_url: String,
}

/// True when `folder` holds metadata recorded for exactly `url`.
fn holds_same_product(folder: &Path, url: &str) -> bool {
    fs::read_to_string(folder.join(METADATA_FILE))
        .ok()
        .and_then(|json| serde_json::from_str::<RecordedUrl>(&json).ok())
        .is_some_and(|record| record.source_url == url)
}

/// Picks `<name>-<8 hex>` until the path is free.
fn free_sibling(root: &Path, name: &str) -> PathBuf {
    loop {
        let suffix = Uuid::new_v4().simple().to_string();
        let candidate = root.join(format!("{name}-{}", &suffix[..8]));
        if !candidate.exists() {
            return candidate;
        }
    }
}

fn image_file_name(index: usize, url: &str) -> String {
    let ext = if url.contains(".webp") { "webp" } else { "jpg" };
    format!("{index:02}.{ext}")
}

fn download_image(http: &dyn HttpFetch, url: &str, path: &Path) -> Result<()> {
    let bytes = http.fetch_bytes(url)?;
    fs::write(path, bytes).map_err(|e| ScrapeError::io(path, e))
}

pub fn save_to_file(record: &FolderRecord, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(record)?;
    fs::write(path, json).map_err(|e| ScrapeError::io(path, e))
}

/// Writes a product folder under `root`: numbered images plus `datos.json`.
///
/// A folder already holding this product's URL is left alone and reported as
/// skipped. A same-named folder belonging to another product is never touched;
/// a suffixed sibling is created instead. Individual image failures are logged
/// and leave a gap in the numbering.
pub fn archive_product(product: Product, root: &Path, http: &dyn HttpFetch) -> Result<ArchivedProduct> {
    let folder_name = sanitize_folder_name(&product.name);
    let mut folder = root.join(&folder_name);

    if holds_same_product(&folder, &product.source_url) {
        return Ok(ArchivedProduct { product, folder, downloaded_images: Vec::new(), skipped: true });
    }

    if folder.exists() {
        folder = free_sibling(root, &folder_name);
    }
    fs::create_dir_all(&folder).map_err(|e| ScrapeError::io(&folder, e))?;

    let mut downloaded_images = Vec::new();
    for (i, url) in product.images.iter().enumerate() {
        let file_name = image_file_name(i + 1, url);
        match download_image(http, url, &folder.join(&file_name)) {
            Ok(()) => downloaded_images.push(file_name),
            Err(e) => warn!("  Failed to download image {}: {e}", i + 1),
        }
    }

    let record = FolderRecord::new(&product, downloaded_images.clone());
    save_to_file(&record, &folder.join(METADATA_FILE))?;

    Ok(ArchivedProduct { product, folder, downloaded_images, skipped: false })
}
