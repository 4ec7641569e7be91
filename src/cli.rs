//! Command-line interface parsing for quotebox
//!
//! This module handles parsing of CLI arguments using clap, including the
//! --slideshow flag with its optional interval and the --rate flag.

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use thiserror::Error;

use crate::data::{MAX_RATING, MIN_RATING};

/// Slideshow interval used when `--slideshow` is given without a value
pub const DEFAULT_SLIDESHOW_SECS: u64 = 8;

/// Error types for CLI argument parsing
#[derive(Debug, Error)]
pub enum CliError {
    /// The rating is outside 1..=5
    #[error("Invalid rating: {0}. Ratings go from 1 to 5")]
    InvalidRating(u8),

    /// A slideshow interval of zero seconds
    #[error("Invalid slideshow interval: must be at least 1 second")]
    InvalidInterval,

    /// Asked for zero quotes
    #[error("Invalid count: must be at least 1")]
    InvalidCount,
}

/// quotebox - A short dose of wisdom, online or off
#[derive(Parser, Debug)]
#[command(name = "quotebox")]
#[command(about = "Fetch an inspirational quote, with an offline cache fallback")]
#[command(version)]
pub struct Cli {
    /// Skip the providers and serve a quote from the local cache
    #[arg(long)]
    pub offline: bool,

    /// Number of quotes to fetch before exiting
    #[arg(long, default_value_t = 1, value_name = "N")]
    pub count: usize,

    /// Rate the last fetched quote (1-5); repeating the current rating clears it
    #[arg(long, value_name = "STAR")]
    pub rate: Option<u8>,

    /// Keep showing a new quote every SECS seconds until Ctrl+C
    ///
    /// Examples:
    ///   quotebox --slideshow       # New quote every 8 seconds
    ///   quotebox --slideshow 30    # New quote every 30 seconds
    #[arg(long, value_name = "SECS")]
    pub slideshow: Option<Option<u64>>,

    /// Directory holding the quote cache (defaults to the XDG cache dir)
    #[arg(long, value_name = "PATH")]
    pub cache_dir: Option<PathBuf>,

    /// Keep the cache in memory only
    #[arg(long)]
    pub ephemeral: bool,

    /// Give up on a provider after SECS seconds
    #[arg(long, value_name = "SECS")]
    pub timeout_secs: Option<u64>,

    /// Maximum number of quotes kept in the cache
    #[arg(long, value_name = "N")]
    pub max_cached: Option<usize>,
}

/// Configuration derived from CLI arguments for what the binary does on startup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartupConfig {
    /// Treat the network as unreachable
    pub offline: bool,
    /// How many quotes to load up front
    pub count: usize,
    /// Rating to apply to the last loaded quote
    pub rating: Option<u8>,
    /// Slideshow interval, if the slideshow was requested
    pub slideshow: Option<Duration>,
}

impl Default for StartupConfig {
    fn default() -> Self {
        Self {
            offline: false,
            count: 1,
            rating: None,
            slideshow: None,
        }
    }
}

/// Parses a star rating argument.
///
/// # Returns
/// * `Ok(u8)` if the rating is between 1 and 5
/// * `Err(CliError::InvalidRating)` otherwise
pub fn parse_rating_arg(star: u8) -> Result<u8, CliError> {
    if (MIN_RATING..=MAX_RATING).contains(&star) {
        Ok(star)
    } else {
        Err(CliError::InvalidRating(star))
    }
}

impl StartupConfig {
    /// Creates a StartupConfig from parsed CLI arguments.
    ///
    /// # Returns
    /// * `Ok(StartupConfig)` with appropriate settings
    /// * `Err(CliError)` if a rating, count or interval is out of range
    pub fn from_cli(cli: &Cli) -> Result<Self, CliError> {
        if cli.count == 0 {
            return Err(CliError::InvalidCount);
        }

        let rating = cli.rate.map(parse_rating_arg).transpose()?;

        let slideshow = match cli.slideshow {
            None => None,
            Some(None) => Some(Duration::from_secs(DEFAULT_SLIDESHOW_SECS)),
            Some(Some(0)) => return Err(CliError::InvalidInterval),
            Some(Some(secs)) => Some(Duration::from_secs(secs)),
        };

        Ok(StartupConfig {
            offline: cli.offline,
            count: cli.count,
            rating,
            slideshow,
        })
    }
}
