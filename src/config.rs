//! Runtime settings resolved once at startup and handed to each component.

use std::path::PathBuf;
use std::time::Duration;

use crate::layout::LayoutKind;

#[derive(Debug, Clone)]
pub struct Config {
    /// Site origin used to absolutize root-relative links. `None` leaves them untouched.
    pub base_url: Option<String>,
    pub input_html: PathBuf,
    pub output_urls: PathBuf,
    pub products_dir: PathBuf,
    pub progress_file: PathBuf,
    pub layout: LayoutKind,
    pub page_timeout: Duration,
    pub image_timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: None,
            input_html: PathBuf::from("items.txt"),
            output_urls: PathBuf::from("urls.txt"),
            products_dir: PathBuf::from("productos"),
            progress_file: PathBuf::from("progreso_urls.txt"),
            layout: LayoutKind::Tiendanube,
            page_timeout: Duration::from_secs(60),
            image_timeout: Duration::from_secs(30),
        }
    }
}

impl Config {
    pub fn base_url(&self) -> Option<&str> {
        self.base_url.as_deref()
    }
}

/// Strips trailing slashes; a blank value counts as unset.
pub fn normalize_base_url(raw: Option<&str>) -> Option<String> {
    let trimmed = raw?.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_loses_trailing_slashes() {
        assert_eq!(
            normalize_base_url(Some("https://shop.example.com//")),
            Some("https://shop.example.com".to_string())
        );
    }

    #[test]
    fn blank_base_url_is_unset() {
        assert_eq!(normalize_base_url(Some("")), None);
        assert_eq!(normalize_base_url(Some("/")), None);
        assert_eq!(normalize_base_url(None), None);
    }

    #[test]
    fn defaults_match_legacy_file_names() {
        let config = Config::default();
        assert_eq!(config.output_urls, PathBuf::from("urls.txt"));
        assert_eq!(config.progress_file, PathBuf::from("progreso_urls.txt"));
        assert_eq!(config.image_timeout, Duration::from_secs(30));
        assert!(config.base_url().is_none());
    }
}
