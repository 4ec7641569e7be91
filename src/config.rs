//! Pipeline configuration
//!
//! Provider endpoints, cache location and limits. Defaults match the public
//! providers; the CLI and a couple of environment variables can override them.

use std::path::PathBuf;
use std::time::Duration;

use crate::cache::MAX_CACHED_QUOTES;
use crate::cli::Cli;
use crate::data::dummy_json::DUMMY_JSON_BASE_URL;
use crate::data::zen_quotes::ZEN_QUOTES_BASE_URL;

/// Name of the persistent quote store
pub const STORE_NAME: &str = "quotes-db";

/// Schema version of the persistent quote store
pub const STORE_VERSION: u32 = 1;

/// Environment variable overriding the DummyJSON base URL
pub const DUMMY_JSON_URL_ENV: &str = "QUOTEBOX_DUMMY_JSON_URL";

/// Environment variable overriding the ZenQuotes base URL
pub const ZEN_QUOTES_URL_ENV: &str = "QUOTEBOX_ZEN_QUOTES_URL";

/// Settings for the quote acquisition pipeline
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Base URL of the DummyJSON quotes API
    pub dummy_json_base: String,
    /// Base URL of the ZenQuotes API
    pub zen_quotes_base: String,
    /// Cap on cached records
    pub max_cached_quotes: usize,
    /// Store name and version identifying the cache on disk
    pub store_name: String,
    pub store_version: u32,
    /// Directory for the cache; `None` uses the XDG cache directory
    pub cache_dir: Option<PathBuf>,
    /// Keep the cache in memory only
    pub ephemeral: bool,
    /// Per-provider time limit; `None` leaves it to the HTTP client
    pub request_timeout: Option<Duration>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            dummy_json_base: DUMMY_JSON_BASE_URL.to_string(),
            zen_quotes_base: ZEN_QUOTES_BASE_URL.to_string(),
            max_cached_quotes: MAX_CACHED_QUOTES,
            store_name: STORE_NAME.to_string(),
            store_version: STORE_VERSION,
            cache_dir: None,
            ephemeral: false,
            request_timeout: None,
        }
    }
}

impl Config {
    /// Builds the configuration from CLI arguments and the environment
    pub fn from_cli(cli: &Cli) -> Self {
        let defaults = Self::default();
        Self {
            dummy_json_base: std::env::var(DUMMY_JSON_URL_ENV).unwrap_or(defaults.dummy_json_base),
            zen_quotes_base: std::env::var(ZEN_QUOTES_URL_ENV).unwrap_or(defaults.zen_quotes_base),
            max_cached_quotes: cli.max_cached.unwrap_or(defaults.max_cached_quotes),
            cache_dir: cli.cache_dir.clone(),
            ephemeral: cli.ephemeral,
            request_timeout: cli.timeout_secs.map(Duration::from_secs),
            ..defaults
        }
    }
}
