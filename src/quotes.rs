//! Motivational quote lookup
//!
//! Best-effort client for the public type.fit quote API. Any failure
//! (non-success status, network error, malformed payload, empty list)
//! degrades to a fixed fallback string.

use async_trait::async_trait;
use rand::seq::SliceRandom;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::warn;

use crate::error::CoachError;

/// Fallback substituted whenever a quote cannot be fetched.
pub const FALLBACK_QUOTE: &str = "Stay strong, you've got this!";

const QUOTES_URL: &str = "https://type.fit/api/quotes";

/// Source of one motivational quote per call.
#[async_trait]
pub trait QuoteSource: Send + Sync {
    /// Fetch one quote. Never fails; degrades to [`FALLBACK_QUOTE`].
    async fn motivational_quote(&self) -> String;
}

#[derive(Debug, Deserialize)]
struct Quote {
    text: Option<String>,
}

/// HTTP client for the public quote API
pub struct QuoteClient {
    client: Client,
}

impl QuoteClient {
    pub fn new() -> Self {
        Self {
            client: Client::new(),
        }
    }

    async fn try_fetch(&self) -> crate::Result<String> {
        let response = self
            .client
            .get(QUOTES_URL)
            .timeout(Duration::from_secs(5))
            .send()
            .await
            .map_err(|e| CoachError::QuoteFetch(format!("quote request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(CoachError::QuoteFetch(format!(
                "quote API returned {}",
                response.status()
            )));
        }

        let quotes: Vec<Quote> = response
            .json()
            .await
            .map_err(|e| CoachError::QuoteFetch(format!("quote payload malformed: {}", e)))?;

        quotes
            .choose(&mut rand::thread_rng())
            .and_then(|q| q.text.clone())
            .filter(|t| !t.trim().is_empty())
            .ok_or_else(|| CoachError::QuoteFetch("quote list empty".to_string()))
    }
}

impl Default for QuoteClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl QuoteSource for QuoteClient {
    async fn motivational_quote(&self) -> String {
        match self.try_fetch().await {
            Ok(quote) => quote,
            Err(e) => {
                warn!("Failed to fetch quote: {}", e);
                FALLBACK_QUOTE.to_string()
            }
        }
    }
}

/// Fixed quote source for tests and the offline demo.
pub struct StaticQuotes {
    quote: String,
}

impl StaticQuotes {
    pub fn new(quote: impl Into<String>) -> Self {
        Self {
            quote: quote.into(),
        }
    }
}

#[async_trait]
impl QuoteSource for StaticQuotes {
    async fn motivational_quote(&self) -> String {
        self.quote.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_static_source_returns_fixed_quote() {
        let source = StaticQuotes::new("Keep going.");
        assert_eq!(source.motivational_quote().await, "Keep going.");
    }

    #[test]
    fn test_quote_payload_parsing() {
        let raw = r#"[{"text": "Do it now.", "author": "someone"}, {"text": null}]"#;
        let quotes: Vec<Quote> = serde_json::from_str(raw).unwrap();
        assert_eq!(quotes.len(), 2);
        assert_eq!(quotes[0].text.as_deref(), Some("Do it now."));
        assert!(quotes[1].text.is_none());
    }
}
