//! Extraction module: turning a rendered document into records
//!
//! This module contains the per-page decision logic:
//! - Locator chains with ordered fallback strategies per field
//! - Record extraction across item containers
//! - Page classification (normal, blocked, empty)
//! - Next-page resolution
//!
//! Everything here is a pure, synchronous function of the document markup;
//! no network access and no shared mutable state.

mod classifier;
mod extractor;
mod locator;
mod pagination;
mod profile;

pub use classifier::{classify, PageClass};
pub use extractor::{extract_records, ExtractedPage, Record};
pub use locator::{Field, FieldRule, Locator};
pub use pagination::next_page_url;
pub use profile::ExtractionProfile;

use scraper::Html;
use url::Url;

/// Everything the controller needs from one processed page
#[derive(Debug)]
pub struct PageOutcome {
    /// How the page was classified
    pub class: PageClass,

    /// Valid records, in document order (empty unless `Normal`)
    pub records: Vec<Record>,

    /// Containers dropped for lacking a title
    pub dropped: usize,

    /// Resolved absolute next-page URL, if the page has an enabled control
    pub next_url: Option<Url>,
}

/// Classifies a fetched page and, when normal, extracts its records and
/// resolves the next-page link
///
/// A `Blocked` page yields nothing: extraction and navigation are skipped
/// entirely. An `Empty` page has no listing container, so there is nothing
/// to extract and no pagination control to resolve.
///
/// # Arguments
///
/// * `html_source` - The rendered page markup
/// * `page_url` - The page's final URL, used to resolve relative references
/// * `profile` - The compiled extraction profile
pub fn process_page(html_source: &str, page_url: &Url, profile: &ExtractionProfile) -> PageOutcome {
    let html = Html::parse_document(html_source);

    match classify(&html, profile) {
        PageClass::Blocked => PageOutcome {
            class: PageClass::Blocked,
            records: Vec::new(),
            dropped: 0,
            next_url: None,
        },
        PageClass::Empty => PageOutcome {
            class: PageClass::Empty,
            records: Vec::new(),
            dropped: 0,
            next_url: None,
        },
        PageClass::Normal => {
            let extracted = extract_records(&html, page_url, profile);
            let next_url = next_page_url(&html, page_url, profile);
            PageOutcome {
                class: PageClass::Normal,
                records: extracted.records,
                dropped: extracted.dropped,
                next_url,
            }
        }
    }
}
