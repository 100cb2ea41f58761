//! Next-page resolution
//!
//! Locates the pagination control on a classified-normal page and resolves
//! its reference to an absolute URL. Every ambiguous case (control absent,
//! control disabled, reference missing or unresolvable) surfaces as "no
//! next page" — never as an error and never as a fabricated URL.

use crate::extract::ExtractionProfile;
use scraper::Html;
use url::Url;

/// Resolves the next-page URL of a document, if it has one
///
/// # Arguments
///
/// * `html` - The parsed document
/// * `base_url` - The page's final URL, for resolving relative references
/// * `profile` - The compiled extraction profile
///
/// # Returns
///
/// * `Some(Url)` - The absolute next-page URL
/// * `None` - No control, a disabled control, or an unresolvable reference
pub fn next_page_url(html: &Html, base_url: &Url, profile: &ExtractionProfile) -> Option<Url> {
    let control = html.select(&profile.next_page).next()?;

    if control
        .value()
        .classes()
        .any(|class| class == profile.next_page_disabled_class)
    {
        tracing::debug!("Next-page control on {} is disabled", base_url);
        return None;
    }

    let href = match control.value().attr("href") {
        Some(href) => href.trim(),
        None => {
            tracing::warn!("Next-page control on {} has no href", base_url);
            return None;
        }
    };

    if href.is_empty() {
        tracing::warn!("Next-page control on {} has an empty href", base_url);
        return None;
    }

    match base_url.join(href) {
        Ok(next) if next.scheme() == "http" || next.scheme() == "https" => Some(next),
        Ok(next) => {
            tracing::warn!("Next-page reference on {} has scheme {}", base_url, next.scheme());
            None
        }
        Err(e) => {
            tracing::warn!("Unresolvable next-page reference '{}' on {}: {}", href, base_url, e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SelectorConfig;

    fn profile() -> ExtractionProfile {
        ExtractionProfile::compile(&SelectorConfig::default()).unwrap()
    }

    fn base() -> Url {
        Url::parse("https://example.com/s?page=1").unwrap()
    }

    fn resolve(html_source: &str) -> Option<Url> {
        let html = Html::parse_document(html_source);
        next_page_url(&html, &base(), &profile())
    }

    #[test]
    fn test_relative_href_resolved() {
        let next = resolve(r#"<a class="s-pagination-next" href="/s?page=2">Next</a>"#);
        assert_eq!(next.unwrap().as_str(), "https://example.com/s?page=2");
    }

    #[test]
    fn test_absolute_href_kept() {
        let next =
            resolve(r#"<a class="s-pagination-next" href="https://example.com/s?page=5">Next</a>"#);
        assert_eq!(next.unwrap().as_str(), "https://example.com/s?page=5");
    }

    #[test]
    fn test_missing_control_is_none() {
        assert!(resolve("<div>no pagination here</div>").is_none());
    }

    #[test]
    fn test_disabled_control_is_none() {
        let next = resolve(
            r#"<a class="s-pagination-next s-pagination-disabled" href="/s?page=2">Next</a>"#,
        );
        assert!(next.is_none());
    }

    #[test]
    fn test_control_without_href_is_none() {
        assert!(resolve(r#"<a class="s-pagination-next">Next</a>"#).is_none());
    }

    #[test]
    fn test_non_http_reference_is_none() {
        let next = resolve(r#"<a class="s-pagination-next" href="javascript:void(0)">Next</a>"#);
        assert!(next.is_none());
    }
}
