//! Environment-driven configuration
//!
//! The Gemini API key is mandatory: startup fails without it rather than
//! limping along with a client that can never succeed.

use crate::error::{CoachError, Result};

/// Runtime configuration for the coach and its HTTP surface
#[derive(Debug, Clone)]
pub struct CoachConfig {
    pub gemini_api_key: String,
    /// Attempts per generation call before degrading to the fixed fallback
    pub max_retries: u32,
    /// Display-layer cap on incoming message length, in characters
    pub max_message_length: usize,
    pub port: u16,
}

impl CoachConfig {
    pub const DEFAULT_MAX_RETRIES: u32 = 3;
    pub const DEFAULT_MAX_MESSAGE_LENGTH: usize = 500;

    /// Load configuration from the environment. `dotenv` should already
    /// have been applied by the binary.
    pub fn from_env() -> Result<Self> {
        let gemini_api_key = std::env::var("GEMINI_API_KEY")
            .ok()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| {
                CoachError::Config(
                    "GEMINI_API_KEY is required. Set it in the environment or .env file."
                        .to_string(),
                )
            })?;

        let max_retries = std::env::var("COACH_MAX_RETRIES")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(Self::DEFAULT_MAX_RETRIES);

        let max_message_length = std::env::var("COACH_MAX_MESSAGE_LENGTH")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(Self::DEFAULT_MAX_MESSAGE_LENGTH);

        let port = std::env::var("PORT")
            .or_else(|_| std::env::var("API_PORT"))
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(8080);

        Ok(Self {
            gemini_api_key,
            max_retries,
            max_message_length,
            port,
        })
    }

}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_api_key_is_fatal() {
        std::env::remove_var("GEMINI_API_KEY");
        let result = CoachConfig::from_env();
        assert!(result.is_err());
        let msg = result.unwrap_err().to_string();
        assert!(msg.contains("GEMINI_API_KEY"));
    }
}
