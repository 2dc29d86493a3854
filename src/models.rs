use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// One level of a breadcrumb trail. The last level (the product itself) has no URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub name: String,
    pub url: Option<String>,
}

impl Category {
    pub fn linked(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self { name: name.into(), url: Some(url.into()) }
    }

    pub fn current(name: impl Into<String>) -> Self {
        Self { name: name.into(), url: None }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Product {
    pub name: String,
    /// Absolute URL of the product page; identity key for skip checks and the ledger.
    pub source_url: String,
    pub categories: Vec<Category>,
    /// Absolute image URLs, de-duplicated in first-seen order.
    pub images: Vec<String>,
}

/// On-disk form of an archived product, stored as `datos.json` inside its folder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FolderRecord {
    pub name: String,
    pub source_url: String,
    pub category_path: Vec<Category>,
    /// File names (relative to the folder) of the images actually downloaded.
    pub images: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub archived_at: Option<String>,
}

impl FolderRecord {
    pub fn new(product: &Product, images: Vec<String>) -> Self {
        Self {
            name: product.name.clone(),
            source_url: product.source_url.clone(),
            category_path: product.categories.clone(),
            images,
            archived_at: Some(chrono::Utc::now().to_rfc3339()),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ArchivedProduct {
    pub product: Product,
    pub folder: PathBuf,
    pub downloaded_images: Vec<String>,
    pub skipped: bool,
}
