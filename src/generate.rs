//! External generation gateway
//!
//! Wraps the Gemini API behind a [`TextGenerator`] trait so the pipeline
//! can be exercised without network access, and adds the bounded-retry
//! policy: up to N attempts, then a fixed fallback coaching message.
//! The gateway never propagates an error to its caller.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{error, info, warn};

use crate::error::CoachError;

/// Degraded-mode reply returned when every generation attempt fails.
/// Static and never templated.
pub const FALLBACK_COACHING_TEXT: &str = "\
I hear you, and I want you to know that reaching out takes courage.

While I'm having a technical moment, here's what I want you to remember: \
every challenge you're facing right now is temporary, but your strength is \
permanent.

Take a deep breath. You've overcome difficulties before, and you have \
everything within you to handle whatever comes next.

What's one small thing you can do today to take care of yourself? Make \
sure you do it until I'm back online.";

/// An opaque prompt-in, text-out generation backend.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, prompt: &str) -> crate::Result<String>;
}

//
// ================= Gemini client =================
//

/// Reusable Gemini client (connection-pooled)
pub struct GeminiClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl GeminiClient {
    const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

    pub fn new(api_key: String) -> crate::Result<Self> {
        if api_key.trim().is_empty() {
            return Err(CoachError::Config(
                "GEMINI_API_KEY is required".to_string(),
            ));
        }

        let client = Client::builder()
            .pool_idle_timeout(Duration::from_secs(90))
            .pool_max_idle_per_host(8)
            .timeout(Self::REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            client,
            api_key,
            base_url: "https://generativelanguage.googleapis.com/v1beta/models/gemini-1.5-flash:generateContent".to_string(),
        })
    }
}

#[async_trait]
impl TextGenerator for GeminiClient {
    async fn generate(&self, prompt: &str) -> crate::Result<String> {
        let url = format!("{}?key={}", self.base_url, self.api_key);

        let request = GeminiRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: prompt.to_string(),
                }],
            }],
            generation_config: GenerationConfig {
                temperature: 0.6,
                top_p: 0.9,
                top_k: 40,
                max_output_tokens: 1024,
            },
        };

        info!("Calling Gemini API");

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                error!("Gemini API request failed: {}", e);
                CoachError::GenerationFailure(format!("Gemini request error: {}", e))
            })?;

        if !response.status().is_success() {
            let error_text = response.text().await.unwrap_or_default();
            error!("Gemini API error response: {}", error_text);
            return Err(CoachError::GenerationFailure(format!(
                "Gemini API error: {}",
                error_text
            )));
        }

        let gemini_response: GeminiResponse = response.json().await.map_err(|e| {
            error!("Failed to parse Gemini response: {}", e);
            CoachError::GenerationFailure(format!("Gemini parse error: {}", e))
        })?;

        let text = gemini_response
            .candidates
            .first()
            .and_then(|c| c.content.parts.first())
            .map(|p| p.text.clone())
            .filter(|t| !t.trim().is_empty())
            .ok_or_else(|| {
                CoachError::GenerationFailure("Empty response from Gemini".to_string())
            })?;

        Ok(text)
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiRequest {
    contents: Vec<Content>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    text: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    top_p: f32,
    top_k: i32,
    max_output_tokens: i32,
}

#[derive(Debug, Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Content,
}

//
// ================= Retrying gateway =================
//

/// Bounded-retry wrapper over any [`TextGenerator`]. This is the system's
/// single point of guaranteed degradation: `generate` always returns text.
pub struct GenerationGateway {
    inner: Box<dyn TextGenerator>,
    max_retries: u32,
}

impl GenerationGateway {
    pub fn new(inner: Box<dyn TextGenerator>, max_retries: u32) -> Self {
        Self {
            inner,
            max_retries: max_retries.max(1),
        }
    }

    /// Generate text, retrying on any failure. All attempts exhausted
    /// means the fixed fallback coaching message is returned instead.
    pub async fn generate(&self, prompt: &str) -> String {
        let mut attempt: u32 = 0;
        loop {
            attempt += 1;
            match self.inner.generate(prompt).await {
                Ok(text) => return text,
                Err(e) => {
                    warn!("Generation attempt {} failed: {}", attempt, e);
                    if attempt >= self.max_retries {
                        warn!("All generation attempts exhausted, degrading to fallback text");
                        return FALLBACK_COACHING_TEXT.to_string();
                    }
                    tokio::time::sleep(Duration::from_millis(250u64 << (attempt - 1))).await;
                }
            }
        }
    }
}

//
// ================= Offline generator =================
//

/// Canned generator for the demo binary and tests.
pub struct StaticGenerator {
    text: String,
}

impl StaticGenerator {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

#[async_trait]
impl TextGenerator for StaticGenerator {
    async fn generate(&self, _prompt: &str) -> crate::Result<String> {
        Ok(self.text.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    struct FailingGenerator {
        attempts: Arc<AtomicU32>,
    }

    #[async_trait]
    impl TextGenerator for FailingGenerator {
        async fn generate(&self, _prompt: &str) -> crate::Result<String> {
            self.attempts.fetch_add(1, Ordering::SeqCst);
            Err(CoachError::GenerationFailure("network down".to_string()))
        }
    }

    struct FlakyGenerator {
        attempts: Arc<AtomicU32>,
        succeed_on: u32,
    }

    #[async_trait]
    impl TextGenerator for FlakyGenerator {
        async fn generate(&self, _prompt: &str) -> crate::Result<String> {
            let n = self.attempts.fetch_add(1, Ordering::SeqCst) + 1;
            if n >= self.succeed_on {
                Ok("recovered".to_string())
            } else {
                Err(CoachError::GenerationFailure("transient".to_string()))
            }
        }
    }

    #[tokio::test]
    async fn test_permanent_failure_returns_fallback_on_third_attempt() {
        let attempts = Arc::new(AtomicU32::new(0));
        let gateway = GenerationGateway::new(
            Box::new(FailingGenerator {
                attempts: attempts.clone(),
            }),
            3,
        );

        let text = gateway.generate("anything").await;
        assert_eq!(text, FALLBACK_COACHING_TEXT);
        assert_eq!(attempts.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_recovers_on_retry() {
        let attempts = Arc::new(AtomicU32::new(0));
        let gateway = GenerationGateway::new(
            Box::new(FlakyGenerator {
                attempts: attempts.clone(),
                succeed_on: 2,
            }),
            3,
        );

        let text = gateway.generate("anything").await;
        assert_eq!(text, "recovered");
        assert_eq!(attempts.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_static_generator_passthrough() {
        let gateway = GenerationGateway::new(Box::new(StaticGenerator::new("canned")), 3);
        assert_eq!(gateway.generate("prompt").await, "canned");
    }

    #[test]
    fn test_empty_api_key_rejected() {
        assert!(GeminiClient::new("  ".to_string()).is_err());
    }
}
