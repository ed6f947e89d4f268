use serde::Deserialize;

/// Main configuration structure for the harvester
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub source: SourceConfig,
    #[serde(default)]
    pub fetch: FetchConfig,
    #[serde(default)]
    pub pacing: PacingConfig,
    #[serde(default)]
    pub run: RunConfig,
    #[serde(default)]
    pub store: StoreConfig,
}

/// Remote endpoint bases
///
/// Each base is an absolute http(s) URL without a trailing slash; the
/// harvester appends `/page/{n}/`, `/{key}/`, `/{key}/stats/` and
/// `/{key}/ratings-summary/` to these.
#[derive(Debug, Clone, Deserialize)]
pub struct SourceConfig {
    /// Base of the ranked listing endpoint
    #[serde(rename = "listing-base")]
    pub listing_base: String,

    /// Base of the per-item detail endpoint
    #[serde(rename = "item-base")]
    pub item_base: String,

    /// Base of the per-item stats/ratings endpoints
    #[serde(rename = "stats-base")]
    pub stats_base: String,
}

/// Fetch retry and identity configuration
#[derive(Debug, Clone, Deserialize)]
pub struct FetchConfig {
    /// Attempts per logical request before giving up
    #[serde(rename = "max-attempts", default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Fixed delay after a network-level failure (milliseconds)
    #[serde(rename = "retry-delay-ms", default = "default_retry_delay_ms")]
    pub retry_delay_ms: u64,

    /// Base delay after an HTTP 403; scaled by the attempt number
    #[serde(rename = "blocked-delay-ms", default = "default_blocked_delay_ms")]
    pub blocked_delay_ms: u64,

    /// Whole-request timeout (seconds)
    #[serde(rename = "timeout-secs", default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Identity pool; one entry is drawn at random per request
    #[serde(rename = "user-agents", default = "default_user_agents")]
    pub user_agents: Vec<String>,
}

/// Randomized delay ranges between requests, items, and pages
#[derive(Debug, Clone, Deserialize)]
pub struct PacingConfig {
    /// Between successive calls for the same item
    #[serde(default = "default_request_range")]
    pub request: DelayRange,

    /// After finishing one item, before the next
    #[serde(default = "default_item_range")]
    pub item: DelayRange,

    /// After finishing one page, before the next page fetch
    #[serde(default = "default_page_range")]
    pub page: DelayRange,
}

/// Inclusive interval a delay is drawn from uniformly
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct DelayRange {
    #[serde(rename = "min-ms")]
    pub min_ms: u64,
    #[serde(rename = "max-ms")]
    pub max_ms: u64,
}

/// Run-level bounds
#[derive(Debug, Clone, Deserialize)]
pub struct RunConfig {
    /// Wall-clock budget for one run (seconds), checked at page granularity
    #[serde(rename = "time-budget-secs", default = "default_time_budget_secs")]
    pub time_budget_secs: u64,

    /// Viewer count below which the listing is no longer worth walking
    #[serde(rename = "popularity-floor", default = "default_popularity_floor")]
    pub popularity_floor: u64,
}

/// Durable state locations
#[derive(Debug, Clone, Deserialize)]
pub struct StoreConfig {
    /// Root directory of the sharded record files
    #[serde(default = "default_store_root")]
    pub root: String,

    /// Path of the page-cursor checkpoint file
    #[serde(default = "default_checkpoint_path")]
    pub checkpoint: String,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            retry_delay_ms: default_retry_delay_ms(),
            blocked_delay_ms: default_blocked_delay_ms(),
            timeout_secs: default_timeout_secs(),
            user_agents: default_user_agents(),
        }
    }
}

impl Default for PacingConfig {
    fn default() -> Self {
        Self {
            request: default_request_range(),
            item: default_item_range(),
            page: default_page_range(),
        }
    }
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            time_budget_secs: default_time_budget_secs(),
            popularity_floor: default_popularity_floor(),
        }
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            root: default_store_root(),
            checkpoint: default_checkpoint_path(),
        }
    }
}

/// Built-in browser identities used when the config supplies none
const DEFAULT_USER_AGENTS: &[&str] = &[
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/119.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.1 Safari/605.1.15",
    "Mozilla/5.0 (X11; Linux x86_64; rv:121.0) Gecko/20100101 Firefox/121.0",
];

fn default_max_attempts() -> u32 {
    3
}

fn default_retry_delay_ms() -> u64 {
    2000
}

fn default_blocked_delay_ms() -> u64 {
    5000
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_user_agents() -> Vec<String> {
    DEFAULT_USER_AGENTS.iter().map(|s| s.to_string()).collect()
}

fn default_request_range() -> DelayRange {
    DelayRange {
        min_ms: 250,
        max_ms: 750,
    }
}

fn default_item_range() -> DelayRange {
    DelayRange {
        min_ms: 500,
        max_ms: 1500,
    }
}

fn default_page_range() -> DelayRange {
    DelayRange {
        min_ms: 1000,
        max_ms: 2500,
    }
}

fn default_time_budget_secs() -> u64 {
    3000
}

fn default_popularity_floor() -> u64 {
    1000
}

fn default_store_root() -> String {
    "./records".to_string()
}

fn default_checkpoint_path() -> String {
    "./checkpoint.txt".to_string()
}
