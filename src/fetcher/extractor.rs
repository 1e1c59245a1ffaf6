//! HTML extractor for object detail pages
//!
//! This module pulls the two supplementary fields out of a collection
//! object's public page:
//! - The gallery location link (`span.artwork__location--gallery a[href]`)
//! - The introductory description (`div.artwork__intro__desc p`)
//!
//! Lookups never fail; any missing step yields `None` for that field.

use scraper::{ElementRef, Html, Selector};

/// Gallery location marker
const GALLERY_SELECTOR: &str = "span.artwork__location--gallery";

/// Description container marker
const DESCRIPTION_SELECTOR: &str = "div.artwork__intro__desc.js-artwork__intro__desc";

/// Fields extracted from a detail page
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DetailPage {
    /// The gallery link target, verbatim from the `href` attribute
    pub gallery_link: Option<String>,

    /// The first paragraph of the description, trimmed
    pub description: Option<String>,
}

/// Extracts the gallery link and description from detail page HTML
///
/// # Arguments
///
/// * `html` - The page body
///
/// # Example
///
/// ```
/// use met_harvest::fetcher::extract_detail_page;
///
/// let html = r#"<div class="artwork__intro__desc js-artwork__intro__desc"><p> A vase </p></div>"#;
/// let page = extract_detail_page(html);
/// assert_eq!(page.description.as_deref(), Some("A vase"));
/// assert_eq!(page.gallery_link, None);
/// ```
pub fn extract_detail_page(html: &str) -> DetailPage {
    let document = Html::parse_document(html);

    DetailPage {
        gallery_link: extract_gallery_link(&document),
        description: extract_description(&document),
    }
}

/// Finds the first link nested in the gallery location span
fn extract_gallery_link(document: &Html) -> Option<String> {
    let span = select_first(document, GALLERY_SELECTOR)?;
    let link_selector = Selector::parse("a").ok()?;
    let link = span.select(&link_selector).next()?;

    link.value()
        .attr("href")
        .filter(|href| !href.is_empty())
        .map(str::to_string)
}

/// Finds the first paragraph in the description container
fn extract_description(document: &Html) -> Option<String> {
    let container = select_first(document, DESCRIPTION_SELECTOR)?;
    let paragraph_selector = Selector::parse("p").ok()?;
    let paragraph = container.select(&paragraph_selector).next()?;

    let text = collapse_text(paragraph);
    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}

fn select_first<'a>(document: &'a Html, selector: &str) -> Option<ElementRef<'a>> {
    let selector = Selector::parse(selector).ok()?;
    document.select(&selector).next()
}

/// Concatenates the element's text nodes and trims the result
fn collapse_text(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}
