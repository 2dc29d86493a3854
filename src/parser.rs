use std::collections::HashSet;
use std::sync::OnceLock;

use regex::Regex;
use scraper::{ElementRef, Html};

use crate::layout::PageLayout;
use crate::models::Product;

pub const UNNAMED_PRODUCT: &str = "Sin Nombre";

static THUMB_SIZE: OnceLock<Regex> = OnceLock::new();

pub fn parse_product(url: &str, html: &str, layout: &dyn PageLayout, base_url: Option<&str>) -> Product {
    let doc = Html::parse_document(html);

    let name = layout
        .product_name(&doc)
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| UNNAMED_PRODUCT.into());

    let categories = layout.categories(&doc, base_url);

    let mut images: Vec<String> = layout
        .slide_images(&doc)
        .iter()
        .map(|href| upgrade_protocol_relative(href))
        .collect();
    // Older templates only expose thumbnails; their srcset points at small renditions.
    // A single slide link disables this path, so partial galleries are not topped up.
    if images.is_empty() {
        images = layout
            .thumbnail_srcsets(&doc)
            .iter()
            .filter_map(|srcset| largest_candidate(srcset))
            .map(|raw| upgrade_protocol_relative(&upscale_thumbnail(raw)))
            .collect();
    }

    Product {
        name,
        source_url: url.to_string(),
        categories,
        images: dedup_preserving_order(images),
    }
}

pub fn element_text(el: ElementRef) -> String {
    el.text().collect::<String>().trim().to_string()
}

pub fn upgrade_protocol_relative(href: &str) -> String {
    if href.starts_with("//") {
        format!("https:{href}")
    } else {
        href.to_string()
    }
}

/// Protocol-relative links become `https:`; root-relative ones get the base URL when known.
pub fn absolutize_href(href: &str, base_url: Option<&str>) -> String {
    match base_url {
        _ if href.starts_with("//") => upgrade_protocol_relative(href),
        Some(base) if href.starts_with('/') => format!("{base}{href}"),
        _ => href.to_string(),
    }
}

/// URL of the last candidate in a `srcset`, without its size descriptor.
fn largest_candidate(srcset: &str) -> Option<&str> {
    let candidate = srcset.rsplit(',').next()?.trim();
    candidate.split(' ').next().filter(|url| !url.is_empty())
}

/// Rewrites `-<w>-<h>.webp` renditions to the 1024x1024 variant.
pub fn upscale_thumbnail(url: &str) -> String {
    let re = THUMB_SIZE.get_or_init(|| Regex::new(r"-\d+-\d+\.webp").unwrap());
    re.replace_all(url, "-1024-1024.webp").into_owned()
}

pub fn dedup_preserving_order(items: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    items.into_iter().filter(|item| seen.insert(item.clone())).collect()
}
