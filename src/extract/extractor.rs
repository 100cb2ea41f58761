//! Record extraction from classified-normal pages
//!
//! One record per item container, in document order. Field lookups are
//! total: a missing or malformed substructure leaves that field absent and
//! never aborts the record or the page. Records without a title are
//! dropped before they reach any sink.

use crate::extract::locator::Field;
use crate::extract::ExtractionProfile;
use chrono::{DateTime, Utc};
use scraper::Html;
use serde::{Deserialize, Serialize};
use url::Url;

/// One extracted listing record
///
/// Immutable once produced. `title` is the validity criterion; the other
/// fields are best-effort.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Record {
    pub title: Option<String>,
    pub price: Option<String>,
    pub rating: Option<String>,
    pub id: Option<String>,

    /// URL of the page the record was extracted from
    pub source_url: String,

    /// When the record was extracted
    pub scraped_at: DateTime<Utc>,
}

impl Record {
    fn empty(page_url: &Url) -> Self {
        Self {
            title: None,
            price: None,
            rating: None,
            id: None,
            source_url: page_url.to_string(),
            scraped_at: Utc::now(),
        }
    }

    /// A record is valid only if its title is present
    pub fn is_valid(&self) -> bool {
        self.title.is_some()
    }
}

/// Result of extracting one page
#[derive(Debug)]
pub struct ExtractedPage {
    /// Valid records in document order
    pub records: Vec<Record>,

    /// Containers discarded for lacking a title
    pub dropped: usize,
}

/// Extracts records from a document classified as normal
///
/// Pure function of the document content: every item container is visited
/// in document order, each field rule's locator chain runs against it, and
/// the assembled record is kept only when a title was found.
///
/// # Arguments
///
/// * `html` - The parsed document
/// * `page_url` - The page's final URL, recorded on each record
/// * `profile` - The compiled extraction profile
pub fn extract_records(html: &Html, page_url: &Url, profile: &ExtractionProfile) -> ExtractedPage {
    let mut records = Vec::new();
    let mut dropped = 0;

    for container in html.select(&profile.item_container) {
        let mut record = Record::empty(page_url);

        for rule in &profile.rules {
            let value = rule.resolve(&container);
            match rule.field {
                Field::Title => record.title = value,
                Field::Price => record.price = value,
                Field::Rating => record.rating = value,
                Field::Id => record.id = value,
            }
        }

        if record.is_valid() {
            records.push(record);
        } else {
            dropped += 1;
            tracing::debug!("Dropping container without title on {}", page_url);
        }
    }

    ExtractedPage { records, dropped }
}
