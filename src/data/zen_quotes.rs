//! ZenQuotes provider
//!
//! `GET {base}/random` answers with a JSON array; only the first element is used
//! and an empty array means the provider had nothing to offer.

use serde::Deserialize;

use super::Quote;

/// Default base URL for the ZenQuotes API
pub const ZEN_QUOTES_BASE_URL: &str = "https://zenquotes.io/api";

/// Wire shape of a ZenQuotes entry
#[derive(Debug, Clone, Deserialize)]
pub struct ZenQuote {
    /// Quote text
    pub q: String,
    /// Author
    pub a: String,
    /// Pre-rendered HTML blockquote
    #[serde(default)]
    pub h: Option<String>,
}

/// Maps a ZenQuotes entry onto the canonical shape
pub fn normalize_zen_quote(dto: &ZenQuote) -> Quote {
    Quote::new(dto.q.clone(), dto.a.clone())
}

/// Builds the random-quote endpoint for `base`
pub fn random_url(base: &str) -> String {
    format!("{}/random", base.trim_end_matches('/'))
}

/// Parses a response body, returning `None` for an empty result list
pub fn parse_random(body: &str) -> Result<Option<Quote>, serde_json::Error> {
    let entries: Vec<ZenQuote> = serde_json::from_str(body)?;
    Ok(entries.first().map(normalize_zen_quote))
}
