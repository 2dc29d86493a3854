use std::time::Duration;

use reqwest::blocking::{Client, Response};
use reqwest::redirect;
use tracing::debug;

use crate::config::Config;
use crate::error::{Result, ScrapeError};
use crate::layout::PageLayout;
use crate::models::Product;
use crate::parser;

const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";
const MAX_REDIRECTS: usize = 10;

/// Blocking GETs used by the scraper. Swapped for an in-memory fake in tests.
pub trait HttpFetch {
    fn fetch_html(&self, url: &str) -> Result<String>;
    fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>>;
}

pub struct HttpClient {
    client: Client,
    image_timeout: Duration,
}

impl HttpClient {
    pub fn new(config: &Config) -> Result<Self> {
        let redirect_policy = redirect::Policy::custom(|attempt| {
            if attempt.previous().len() > MAX_REDIRECTS {
                attempt.error(format!("Too many redirects (>{MAX_REDIRECTS})"))
            } else {
                attempt.follow()
            }
        });

        let client = Client::builder()
            .redirect(redirect_policy)
            .user_agent(USER_AGENT)
            .timeout(config.page_timeout)
            .build()?;

        Ok(Self { client, image_timeout: config.image_timeout })
    }
}

fn check_status(url: &str, resp: Response) -> Result<Response> {
    let status = resp.status();
    if status.is_success() {
        Ok(resp)
    } else {
        Err(ScrapeError::Status { url: url.to_string(), status: status.as_u16() })
    }
}

impl HttpFetch for HttpClient {
    fn fetch_html(&self, url: &str) -> Result<String> {
        let resp = self.client.get(url).send()?;
        Ok(check_status(url, resp)?.text()?)
    }

    fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>> {
        let resp = self.client.get(url).timeout(self.image_timeout).send()?;
        Ok(check_status(url, resp)?.bytes()?.to_vec())
    }
}

/// Downloads a product page and extracts its name, breadcrumb and images.
/// Any failure fails the whole product; no partial record is produced.
pub fn fetch_product(
    http: &dyn HttpFetch,
    layout: &dyn PageLayout,
    base_url: Option<&str>,
    url: &str,
) -> Result<Product> {
    let html = http.fetch_html(url)?;
    let product = parser::parse_product(url, &html, layout, base_url);
    debug!(
        "{}: {} categories, {} images",
        product.name,
        product.categories.len(),
        product.images.len()
    );
    Ok(product)
}


#[cfg(test)]
mod tests {
    use super::testing::FakeHttp;
    use super::*;
    use crate::layout::LayoutKind;

    #[test]
    fn fetch_product_parses_served_page() {
        let url = "https://shop.test/p/1";
        let http = FakeHttp::default().with_page(
            url,
            r#"<h1 class="js-product-name">Mate</h1><a class="js-product-slide-link" href="//cdn.test/m.webp"></a>"#,
        );
        let layout = LayoutKind::Tiendanube.build().unwrap();

        let product = fetch_product(&http, layout.as_ref(), None, url).unwrap();

        assert_eq!(product.name, "Mate");
        assert_eq!(product.images, vec!["https://cdn.test/m.webp"]);
        assert_eq!(http.request_count(), 1);
    }

    #[test]
    fn non_success_status_fails_the_product() {
        let url = "https://shop.test/p/gone";
        let http = FakeHttp::default().failing(url);
        let layout = LayoutKind::Tiendanube.build().unwrap();

        let err = fetch_product(&http, layout.as_ref(), None, url).unwrap_err();

        assert!(matches!(err, ScrapeError::Status { status: 503, .. }));
    }

    #[test]
    fn client_builds_from_default_config() {
        assert!(HttpClient::new(&Config::default()).is_ok());
    }
}
