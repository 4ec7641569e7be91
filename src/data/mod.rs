//! Quote model and upstream provider clients
//!
//! This module contains the canonical `Quote` type, the two provider wire shapes
//! with their normalizers, and the race client that asks both providers at once.

pub mod dummy_json;
pub mod race;
#[cfg(test)]
pub(crate) mod testing;
pub mod transport;
pub mod zen_quotes;

pub use dummy_json::{normalize_dummy_json, DummyJsonQuote};
pub use race::{QuoteApiClient, RaceError};
pub use transport::{AbortController, AbortSignal, HttpTransport, Transport, TransportError};
pub use zen_quotes::{normalize_zen_quote, ZenQuote};

use serde::{Deserialize, Serialize};

/// Lowest star a user can give a quote
pub const MIN_RATING: u8 = 1;

/// Highest star a user can give a quote
pub const MAX_RATING: u8 = 5;

/// Text of the quote used when neither the providers nor the cache can help
pub const LOCAL_QUOTE_TEXT: &str = "Even offline, you still get wisdom. Hardcoded, but still.";

/// Author of the local fallback quote
pub const LOCAL_QUOTE_AUTHOR: &str = "Local Fallback";

/// A quote as seen by everything outside the provider and cache internals
///
/// Two quotes show the same saying when their `(text, author)` pair matches;
/// `rating` is an optional user annotation from 1 to 5.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quote {
    /// The saying itself
    pub text: String,
    /// Who said it
    pub author: String,
    /// User rating (1..=5), if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<u8>,
}

impl Quote {
    /// Creates an unrated quote
    pub fn new(text: impl Into<String>, author: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            author: author.into(),
            rating: None,
        }
    }

    /// The hardcoded quote served when everything else has failed
    pub fn local_fallback() -> Self {
        Self::new(LOCAL_QUOTE_TEXT, LOCAL_QUOTE_AUTHOR)
    }

    /// Returns a copy of this quote carrying `rating` instead of the current one
    pub fn with_rating(&self, rating: Option<u8>) -> Self {
        Self {
            rating,
            ..self.clone()
        }
    }
}

impl std::fmt::Display for Quote {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "\u{201c}{}\u{201d} \u{2014} {}", self.text, self.author)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_quote_is_unrated() {
        let quote = Quote::new("Stay hungry", "Jobs");
        assert_eq!(quote.text, "Stay hungry");
        assert_eq!(quote.author, "Jobs");
        assert!(quote.rating.is_none());
    }

    #[test]
    fn test_with_rating_leaves_original_untouched() {
        let quote = Quote::new("Stay hungry", "Jobs");
        let rated = quote.with_rating(Some(4));

        assert_eq!(rated.rating, Some(4));
        assert!(quote.rating.is_none());
        assert_eq!(rated.with_rating(None), quote);
        assert_ne!(rated, quote);
    }

    #[test]
    fn test_local_fallback_constants() {
        let quote = Quote::local_fallback();
        assert_eq!(quote.text, LOCAL_QUOTE_TEXT);
        assert_eq!(quote.author, "Local Fallback");
        assert!(quote.rating.is_none());
    }

    #[test]
    fn test_rating_is_omitted_from_json_when_absent() {
        let json = serde_json::to_string(&Quote::new("a", "b")).expect("serialize");
        assert!(!json.contains("rating"));

        let rated: Quote =
            serde_json::from_str(r#"{"text":"a","author":"b","rating":3}"#).expect("deserialize");
        assert_eq!(rated.rating, Some(3));
    }

    #[test]
    fn test_display_formats_text_and_author() {
        let quote = Quote::new("Less is more", "Mies");
        assert_eq!(quote.to_string(), "\u{201c}Less is more\u{201d} \u{2014} Mies");
    }
}
