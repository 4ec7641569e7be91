//! DummyJSON quote provider
//!
//! `GET {base}/random` answers with a single JSON object.

use serde::Deserialize;

use super::Quote;

/// Default base URL for the DummyJSON quotes API
pub const DUMMY_JSON_BASE_URL: &str = "https://dummyjson.com/quotes";

/// Wire shape of a DummyJSON quote
#[derive(Debug, Clone, Deserialize)]
pub struct DummyJsonQuote {
    /// Provider-side identifier
    #[serde(default)]
    pub id: Option<u64>,
    /// The quote text
    pub quote: String,
    /// The quote author
    pub author: String,
}

/// Maps a DummyJSON quote onto the canonical shape
pub fn normalize_dummy_json(dto: &DummyJsonQuote) -> Quote {
    Quote::new(dto.quote.clone(), dto.author.clone())
}

/// Builds the random-quote endpoint for `base`
pub fn random_url(base: &str) -> String {
    format!("{}/random", base.trim_end_matches('/'))
}

/// Parses a response body into a normalized quote
pub fn parse_random(body: &str) -> Result<Quote, serde_json::Error> {
    let dto: DummyJsonQuote = serde_json::from_str(body)?;
    Ok(normalize_dummy_json(&dto))
}
