//! Page discovery from an index page
//!
//! When no static page list is configured, the pipeline fetches the index
//! page and collects the documentation pages linked from its navigation
//! container. The driver only ever sees the resulting list of
//! [`PageEntry`] values, so static and discovered page lists are
//! interchangeable.

use crate::config::PageEntry;
use crate::DiscoverError;
use scraper::{Html, Selector};
use std::collections::HashSet;
use url::Url;

/// Discovers documentation pages from the navigation of an index page
///
/// # Link Extraction Rules
///
/// **Include:**
/// - `<a href="...">` tags inside the configured nav container
///
/// **Exclude:**
/// - Fragment-only links (`#section`)
/// - `javascript:`, `mailto:`, `tel:`, `data:` links
/// - Links that resolve outside http/https
/// - Links whose host differs from the base URL's host
/// - Duplicate targets (first occurrence wins)
///
/// The link text becomes the page title. Entries are returned in document
/// order of the nav, which fixes the section order of the final document.
///
/// # Arguments
///
/// * `index_html` - Raw HTML of the index page
/// * `base_url` - Base URL for resolving relative links
/// * `nav_selector` - CSS selector for the navigation container
///
/// # Returns
///
/// * `Ok(Vec<PageEntry>)` - Pages in nav order
/// * `Err(DiscoverError)` - Nav container missing or empty
pub fn discover_pages(
    index_html: &str,
    base_url: &Url,
    nav_selector: &str,
) -> Result<Vec<PageEntry>, DiscoverError> {
    let document = Html::parse_document(index_html);

    // Selector validity is checked at config load
    let selector = Selector::parse(nav_selector).map_err(|_| DiscoverError::NavMissing {
        selector: nav_selector.to_string(),
    })?;

    let nav = document
        .select(&selector)
        .next()
        .ok_or_else(|| DiscoverError::NavMissing {
            selector: nav_selector.to_string(),
        })?;

    let mut pages = Vec::new();
    let mut seen = HashSet::new();

    if let Ok(link_selector) = Selector::parse("a[href]") {
        for element in nav.select(&link_selector) {
            let href = match element.value().attr("href") {
                Some(href) => href,
                None => continue,
            };

            let resolved = match resolve_link(href, base_url) {
                Some(url) => url,
                None => continue,
            };

            // Stay on the documentation site
            if resolved.host_str() != base_url.host_str() {
                continue;
            }

            let title = element.text().collect::<String>().trim().to_string();
            if title.is_empty() {
                continue;
            }

            if seen.insert(resolved.to_string()) {
                pages.push(PageEntry {
                    title,
                    url: resolved.to_string(),
                });
            }
        }
    }

    if pages.is_empty() {
        return Err(DiscoverError::NoLinks);
    }

    tracing::info!("Discovered {} pages from index navigation", pages.len());
    Ok(pages)
}

/// Resolves a link href to an absolute URL and validates it
///
/// Returns None if the link should be excluded:
/// - Fragment-only links (same page anchors)
/// - javascript:, mailto:, tel:, data: schemes
/// - Invalid URLs
/// - Non-HTTP(S) URLs after resolution
fn resolve_link(href: &str, base_url: &Url) -> Option<Url> {
    let href = href.trim();

    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    if href.starts_with("javascript:")
        || href.starts_with("mailto:")
        || href.starts_with("tel:")
        || href.starts_with("data:")
    {
        return None;
    }

    match base_url.join(href) {
        Ok(mut absolute_url) => {
            if absolute_url.scheme() != "http" && absolute_url.scheme() != "https" {
                return None;
            }
            // Anchor fragments identify positions within a page, not pages
            absolute_url.set_fragment(None);
            Some(absolute_url)
        }
        Err(_) => None,
    }
}
