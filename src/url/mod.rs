//! URL handling for the crawler
//!
//! This module provides URL normalization used as the frontier's dedup
//! identity. Listing pages encode pagination state in their query strings,
//! so query parameters are preserved verbatim.

mod normalize;

pub use normalize::{dedup_key, normalize_url};
