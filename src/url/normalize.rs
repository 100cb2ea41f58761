use crate::UrlError;
use url::Url;

/// Normalizes a URL string into the form used for frontier deduplication
///
/// # Normalization Steps
///
/// 1. Parse the URL; reject if malformed
/// 2. Reject schemes other than HTTP and HTTPS
/// 3. Lowercase the host
/// 4. Remove www. prefix from the host
/// 5. Normalize path:
///    - Remove dot segments (. and ..)
///    - Remove trailing slash (except for root /)
///    - Empty path becomes /
/// 6. Remove fragment (everything after #)
///
/// Query parameters are kept untouched: listing pages carry their page
/// number and search state there, and two pages that differ only in query
/// are genuinely different pages.
///
/// # Arguments
///
/// * `url_str` - The URL string to normalize
///
/// # Returns
///
/// * `Ok(Url)` - Normalized URL
/// * `Err(UrlError)` - Failed to parse or normalize the URL
///
/// # Examples
///
/// ```
/// use koi_skimmer::url::normalize_url;
///
/// let url = normalize_url("http://WWW.EXAMPLE.COM/s/?page=2#reviews").unwrap();
/// assert_eq!(url.as_str(), "http://example.com/s?page=2");
/// ```
pub fn normalize_url(url_str: &str) -> Result<Url, UrlError> {
    let url = Url::parse(url_str).map_err(|e| UrlError::Parse(e.to_string()))?;
    normalize_parsed(url)
}

/// Normalizes an already-parsed URL (same rules as [`normalize_url`])
fn normalize_parsed(mut url: Url) -> Result<Url, UrlError> {
    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(UrlError::InvalidScheme(format!(
            "Only HTTP and HTTPS schemes are supported, got: {}",
            url.scheme()
        )));
    }

    // Lowercase the host and remove www. prefix
    if let Some(host) = url.host_str() {
        let mut normalized_host = host.to_lowercase();

        if let Some(stripped) = normalized_host.strip_prefix("www.") {
            normalized_host = stripped.to_string();
        }

        url.set_host(Some(&normalized_host))
            .map_err(|e| UrlError::Malformed(format!("Failed to set host: {}", e)))?;
    } else {
        return Err(UrlError::MissingHost);
    }

    let normalized_path = normalize_path(url.path());
    url.set_path(&normalized_path);

    url.set_fragment(None);

    Ok(url)
}

/// Returns the string identity a URL is deduplicated under
///
/// Falls back to the verbatim URL string if normalization fails, so a URL
/// that slipped past parsing is still deduplicated against itself.
pub fn dedup_key(url: &Url) -> String {
    normalize_parsed(url.clone())
        .map(|u| u.to_string())
        .unwrap_or_else(|_| url.to_string())
}

/// Normalizes a URL path by removing dot segments and trailing slashes
fn normalize_path(path: &str) -> String {
    if path.is_empty() {
        return "/".to_string();
    }

    let mut normalized_segments: Vec<&str> = Vec::new();

    for segment in path.split('/') {
        match segment {
            // Skip empty segments (from multiple slashes) and current directory markers
            "" | "." => continue,
            ".." => {
                normalized_segments.pop();
            }
            _ => normalized_segments.push(segment),
        }
    }

    if normalized_segments.is_empty() {
        return "/".to_string();
    }

    format!("/{}", normalized_segments.join("/"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lowercase_host() {
        let url = normalize_url("https://EXAMPLE.COM/page").unwrap();
        assert_eq!(url.as_str(), "https://example.com/page");
    }

    #[test]
    fn test_strip_www() {
        let url = normalize_url("https://www.example.com/page").unwrap();
        assert_eq!(url.as_str(), "https://example.com/page");
    }

    #[test]
    fn test_strip_fragment() {
        let url = normalize_url("https://example.com/page#section").unwrap();
        assert_eq!(url.as_str(), "https://example.com/page");
    }

    #[test]
    fn test_query_preserved() {
        let url = normalize_url("https://example.com/s?page=3&sort=rank").unwrap();
        assert_eq!(url.as_str(), "https://example.com/s?page=3&sort=rank");
    }

    #[test]
    fn test_trailing_slash_removed() {
        let url = normalize_url("https://example.com/listing/").unwrap();
        assert_eq!(url.as_str(), "https://example.com/listing");
    }

    #[test]
    fn test_root_path_kept() {
        let url = normalize_url("https://example.com").unwrap();
        assert_eq!(url.as_str(), "https://example.com/");
    }

    #[test]
    fn test_dot_segments_collapsed() {
        let url = normalize_url("https://example.com/a/./b/../c").unwrap();
        assert_eq!(url.as_str(), "https://example.com/a/c");
    }

    #[test]
    fn test_rejects_non_http_scheme() {
        let result = normalize_url("ftp://example.com/file");
        assert!(matches!(result, Err(UrlError::InvalidScheme(_))));
    }

    #[test]
    fn test_rejects_malformed() {
        let result = normalize_url("not a url");
        assert!(matches!(result, Err(UrlError::Parse(_))));
    }

    #[test]
    fn test_dedup_key_matches_normalized_form() {
        let a = Url::parse("https://WWW.Example.com/s/?k=laptops#top").unwrap();
        let b = Url::parse("https://example.com/s?k=laptops").unwrap();
        assert_eq!(dedup_key(&a), dedup_key(&b));
    }
}
