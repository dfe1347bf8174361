//! Input validation at the UI boundary
//!
//! Rejections here happen before a turn is accepted, so they are the only
//! failures ever reported to the caller as errors.

use crate::error::{CoachError, Result};

/// Placeholder/test tokens that should never reach the pipeline.
const DENYLIST: &[&str] = &["spam", "test123", "asdf"];

/// Validate raw user input against the display-layer rules: non-empty,
/// within `max_length` characters, and free of denylisted tokens.
pub fn validate_user_input(text: &str, max_length: usize) -> Result<()> {
    if text.trim().is_empty() {
        return Err(CoachError::InvalidInput(
            "Please enter a message".to_string(),
        ));
    }

    if text.chars().count() > max_length {
        return Err(CoachError::InvalidInput(format!(
            "Message too long. Please keep it under {} characters.",
            max_length
        )));
    }

    let lowered = text.to_lowercase();
    if DENYLIST.iter().any(|word| lowered.contains(word)) {
        return Err(CoachError::InvalidInput(
            "Please enter a meaningful message".to_string(),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_empty_and_whitespace() {
        assert!(validate_user_input("", 500).is_err());
        assert!(validate_user_input("   \n\t ", 500).is_err());
    }

    #[test]
    fn test_rejects_over_length() {
        let long = "x".repeat(501);
        assert!(validate_user_input(&long, 500).is_err());
        let exact = "x".repeat(500);
        assert!(validate_user_input(&exact, 500).is_ok());
    }

    #[test]
    fn test_rejects_denylisted_tokens() {
        assert!(validate_user_input("asdf", 500).is_err());
        assert!(validate_user_input("this is Test123 content", 500).is_err());
        assert!(validate_user_input("pure spam here", 500).is_err());
    }

    #[test]
    fn test_accepts_ordinary_message() {
        assert!(validate_user_input("I feel great today", 500).is_ok());
    }
}
