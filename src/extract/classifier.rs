//! Page classification
//!
//! A fetched document is one of three things: the listing content we came
//! for, an interstitial that means the crawl has been challenged, or a page
//! where the expected listing never rendered. The classifier decides which;
//! the controller's handling follows from the class alone. Blocked pages
//! are skipped without retry, empty pages are retried up to the budget.

use crate::extract::ExtractionProfile;
use scraper::Html;

/// Classification of one fetched document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageClass {
    /// The listing container is present; extract and navigate
    Normal,

    /// A challenge/verification marker is present; skip without retry
    Blocked,

    /// The listing container never became available within the provider's
    /// bounded structure wait
    Empty,
}

impl PageClass {
    /// Returns true if the page should go through extraction
    pub fn is_extractable(&self) -> bool {
        matches!(self, Self::Normal)
    }
}

/// Classifies a fetched document
///
/// The blocked marker is checked before the listing container; a challenge
/// page sometimes carries skeleton listing markup.
pub fn classify(html: &Html, profile: &ExtractionProfile) -> PageClass {
    if html.select(&profile.blocked_marker).next().is_some() {
        return PageClass::Blocked;
    }

    if html.select(&profile.item_container).next().is_some() {
        PageClass::Normal
    } else {
        PageClass::Empty
    }
}
