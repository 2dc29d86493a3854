//! Knowledge of a storefront's DOM. Each supported template gets its own
//! `PageLayout`; the scraping core only talks to the trait.

use clap::ValueEnum;
use scraper::{ElementRef, Html, Selector};

use crate::error::{Result, ScrapeError};
use crate::models::Category;
use crate::parser::{absolutize_href, element_text};

pub trait PageLayout {
    /// Raw `href`s of product anchors on a saved listing page, in document order.
    fn product_links(&self, doc: &Html) -> Vec<String>;

    /// Text of the product title heading, if the page has one.
    fn product_name(&self, doc: &Html) -> Option<String>;

    /// Breadcrumb trail from root to the product. Empty when the page has none.
    fn categories(&self, doc: &Html, base_url: Option<&str>) -> Vec<Category>;

    /// Full-size image links from the product gallery.
    fn slide_images(&self, doc: &Html) -> Vec<String>;

    /// Responsive image sets (`srcset` values) of the gallery thumbnails.
    fn thumbnail_srcsets(&self, doc: &Html) -> Vec<String>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LayoutKind {
    /// Tiendanube / Nuvemshop storefront templates.
    Tiendanube,
}

impl LayoutKind {
    pub fn build(self) -> Result<Box<dyn PageLayout>> {
        match self {
            LayoutKind::Tiendanube => Ok(Box::new(Tiendanube::new()?)),
        }
    }
}

fn selector(css: &str) -> Result<Selector> {
    Selector::parse(css).map_err(|e| ScrapeError::Parse(format!("invalid selector `{css}`: {e:?}")))
}

pub struct Tiendanube {
    product_link: Selector,
    name: Selector,
    breadcrumbs: Selector,
    crumb: Selector,
    slide_link: Selector,
    thumb: Selector,
    img: Selector,
}

impl Tiendanube {
    pub fn new() -> Result<Self> {
        Ok(Self {
            product_link: selector("a.js-product-item-image-link-private")?,
            name: selector("h1.js-product-name")?,
            breadcrumbs: selector("div.breadcrumbs")?,
            crumb: selector(".crumb")?,
            slide_link: selector("a.js-product-slide-link")?,
            thumb: selector("a.js-product-thumb")?,
            img: selector("img")?,
        })
    }

    fn crumb_entry(crumb: ElementRef, base_url: Option<&str>) -> Option<Category> {
        let name = element_text(crumb);
        if name.is_empty() {
            return None;
        }
        if crumb.value().name() == "a" {
            let href = crumb.value().attr("href").unwrap_or_default();
            Some(Category::linked(name, absolutize_href(href, base_url)))
        } else {
            Some(Category::current(name))
        }
    }
}

fn non_empty_attr(el: ElementRef, attr: &str) -> Option<String> {
    el.value()
        .attr(attr)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

impl PageLayout for Tiendanube {
    fn product_links(&self, doc: &Html) -> Vec<String> {
        doc.select(&self.product_link)
            .filter_map(|a| non_empty_attr(a, "href"))
            .collect()
    }

    fn product_name(&self, doc: &Html) -> Option<String> {
        doc.select(&self.name).next().map(element_text)
    }

    fn categories(&self, doc: &Html, base_url: Option<&str>) -> Vec<Category> {
        let Some(container) = doc.select(&self.breadcrumbs).next() else {
            return Vec::new();
        };
        container
            .select(&self.crumb)
            .filter_map(|crumb| Self::crumb_entry(crumb, base_url))
            .collect()
    }

    fn slide_images(&self, doc: &Html) -> Vec<String> {
        doc.select(&self.slide_link)
            .filter_map(|a| non_empty_attr(a, "href"))
            .collect()
    }

    fn thumbnail_srcsets(&self, doc: &Html) -> Vec<String> {
        doc.select(&self.thumb)
            .filter_map(|thumb| thumb.select(&self.img).next())
            .filter_map(|img| non_empty_attr(img, "data-srcset").or_else(|| non_empty_attr(img, "srcset")))
            .collect()
    }
}
