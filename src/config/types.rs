use serde::Deserialize;
use std::time::Duration;

/// Main configuration structure for Koi-Skimmer
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Listing URLs the run starts from
    #[serde(default)]
    pub seeds: Vec<String>,

    #[serde(default)]
    pub crawler: CrawlerConfig,

    #[serde(default)]
    pub fetch: FetchConfig,

    #[serde(default)]
    pub output: OutputConfig,

    #[serde(default)]
    pub selectors: SelectorConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            seeds: Vec::new(),
            crawler: CrawlerConfig::default(),
            fetch: FetchConfig::default(),
            output: OutputConfig::default(),
            selectors: SelectorConfig::default(),
        }
    }
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlerConfig {
    /// Maximum number of pages one run may visit
    #[serde(rename = "max-pages", default = "default_max_pages")]
    pub max_pages: u32,

    /// Number of parallel workers
    #[serde(rename = "max-concurrency", default = "default_max_concurrency")]
    pub max_concurrency: u32,

    /// Bound on one full fetch-through-navigate cycle (seconds)
    #[serde(rename = "request-timeout-seconds", default = "default_request_timeout")]
    pub request_timeout_seconds: u64,

    /// Retry budget per page request (fetch errors and empty pages)
    #[serde(rename = "max-retries", default = "default_max_retries")]
    pub max_retries: u32,

    /// Bounded wait for the listing structure to become available (seconds)
    #[serde(rename = "structure-wait-seconds", default = "default_structure_wait")]
    pub structure_wait_seconds: u64,

    /// Delay between retry attempts (milliseconds, scaled linearly by attempt)
    #[serde(rename = "retry-backoff-ms", default = "default_retry_backoff")]
    pub retry_backoff_ms: u64,

    /// Verbose provider behavior; never changes crawl decisions
    #[serde(rename = "debug-mode", default)]
    pub debug_mode: bool,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            max_pages: default_max_pages(),
            max_concurrency: default_max_concurrency(),
            request_timeout_seconds: default_request_timeout(),
            max_retries: default_max_retries(),
            structure_wait_seconds: default_structure_wait(),
            retry_backoff_ms: default_retry_backoff(),
            debug_mode: false,
        }
    }
}

impl CrawlerConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_seconds)
    }

    pub fn structure_wait(&self) -> Duration {
        Duration::from_secs(self.structure_wait_seconds)
    }

    pub fn retry_backoff(&self) -> Duration {
        Duration::from_millis(self.retry_backoff_ms)
    }
}

/// Network identity configuration for the document provider
#[derive(Debug, Clone, Deserialize)]
pub struct FetchConfig {
    /// User agent presented to the target site
    #[serde(rename = "user-agent", default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            user_agent: default_user_agent(),
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Path of the JSONL record file
    #[serde(rename = "records-path", default = "default_records_path")]
    pub records_path: String,

    /// When set, records go to this SQLite database instead of JSONL
    #[serde(rename = "database-path", default)]
    pub database_path: Option<String>,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            records_path: default_records_path(),
            database_path: None,
        }
    }
}

/// Extraction profile configuration
///
/// Field chains are ordered CSS selectors tried against each item
/// container until one yields a non-empty value; a `selector@attribute`
/// spelling reads an attribute instead of text. Defaults describe the
/// software listing deployment this crate grew up against.
#[derive(Debug, Clone, Deserialize)]
pub struct SelectorConfig {
    /// Matches one listing entry
    #[serde(rename = "item-container", default = "default_item_container")]
    pub item_container: String,

    /// Title locator chain (a record without a title is discarded)
    #[serde(default = "default_title_chain")]
    pub title: Vec<String>,

    /// Price locator chain
    #[serde(default = "default_price_chain")]
    pub price: Vec<String>,

    /// Rating locator chain
    #[serde(default = "default_rating_chain")]
    pub rating: Vec<String>,

    /// Attribute on the container carrying the listing id; empty disables
    #[serde(rename = "id-attribute", default = "default_id_attribute")]
    pub id_attribute: String,

    /// Matches the interstitial/challenge marker of a blocked page
    #[serde(rename = "blocked-marker", default = "default_blocked_marker")]
    pub blocked_marker: String,

    /// Matches the next-page control
    #[serde(rename = "next-page", default = "default_next_page")]
    pub next_page: String,

    /// Class marking the next-page control as disabled
    #[serde(
        rename = "next-page-disabled-class",
        default = "default_next_page_disabled_class"
    )]
    pub next_page_disabled_class: String,
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            item_container: default_item_container(),
            title: default_title_chain(),
            price: default_price_chain(),
            rating: default_rating_chain(),
            id_attribute: default_id_attribute(),
            blocked_marker: default_blocked_marker(),
            next_page: default_next_page(),
            next_page_disabled_class: default_next_page_disabled_class(),
        }
    }
}

fn default_max_pages() -> u32 {
    5
}

fn default_max_concurrency() -> u32 {
    2
}

fn default_request_timeout() -> u64 {
    120
}

fn default_max_retries() -> u32 {
    3
}

fn default_structure_wait() -> u64 {
    5
}

fn default_retry_backoff() -> u64 {
    1000
}

fn default_user_agent() -> String {
    "Mozilla/5.0 (X11; Linux x86_64; rv:126.0) Gecko/20100101 Firefox/126.0".to_string()
}

fn default_records_path() -> String {
    "./records.jsonl".to_string()
}

fn default_item_container() -> String {
    "div.s-card-container".to_string()
}

fn default_title_chain() -> Vec<String> {
    vec![
        ".a-size-medium".to_string(),
        "h2 .a-link-normal".to_string(),
        ".a-size-base-plus".to_string(),
    ]
}

fn default_price_chain() -> Vec<String> {
    vec![
        ".a-price > .a-offscreen".to_string(),
        ".a-price[data-a-size='xl'] > span:first-of-type".to_string(),
        ".a-row.a-size-base.a-color-secondary > .a-color-base".to_string(),
    ]
}

fn default_rating_chain() -> Vec<String> {
    vec![
        ".a-icon-alt".to_string(),
        "a[aria-label*='stars']@aria-label".to_string(),
    ]
}

fn default_id_attribute() -> String {
    "data-asin".to_string()
}

fn default_blocked_marker() -> String {
    "form[action*='validateCaptcha']".to_string()
}

fn default_next_page() -> String {
    "a.s-pagination-next".to_string()
}

fn default_next_page_disabled_class() -> String {
    "s-pagination-disabled".to_string()
}
