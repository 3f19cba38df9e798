//! Card discovery on a set listing page.

use reqwest::Url;

use crate::html::{first_href, table_rows};

/// Resolves a listing link against `base`.
///
/// Absolute URLs are returned verbatim. Relative ones are joined onto `base`
/// with URL semantics. Empty and fragment-only targets yield `None`.
#[must_use]
pub fn resolve_card_url(href: &str, base: &Url) -> Option<String> {
    let href = href.trim();
    if href.is_empty() || href.starts_with('#') {
        return None;
    }
    if Url::parse(href).is_ok() {
        return Some(href.to_string());
    }
    match base.join(href) {
        Ok(url) => Some(url.to_string()),
        Err(e) => {
            tracing::warn!(href, error = %e, "could not resolve card link");
            None
        }
    }
}

/// Collects one card URL per listing row, in document order.
///
/// Only the first link in each `<tr>` is considered. Rows without a link are
/// skipped, so the result is never longer than the number of rows. A row
/// whose first link is empty or fragment-only (`href="#..."`) counts as having
/// no link, since it names no card page. Duplicate URLs are kept.
#[must_use]
pub fn enumerate_card_urls(html: &str, base: &Url) -> Vec<String> {
    let urls: Vec<String> = table_rows(html)
        .filter_map(first_href)
        .filter_map(|href| resolve_card_url(&href, base))
        .collect();

    for url in &urls {
        tracing::debug!(card_url = %url, "found card URL");
    }
    tracing::info!(cards = urls.len(), "enumerated listing");

    urls
}
