//! Prompt construction for the coaching model
//!
//! All prompts the coach sends to the generation gateway are built here so
//! the persona and output-format contracts live in one place.

/// Builds the system, assessment, and response prompts.
pub struct ConfidencePromptEngine;

impl ConfidencePromptEngine {
    pub fn new() -> Self {
        Self
    }

    /// Fixed coaching persona prepended to every response generation.
    pub fn system_prompt(&self) -> &'static str {
        r#"You are ConfidenceAI, a warm and practical confidence coach.

Guidelines:
- Be empathetic first, then constructive
- Keep language simple and encouraging, never clinical
- Offer concrete, small actions the person can take today
- Acknowledge effort and courage, not just outcomes

Format: a short conversational reply followed by a bulleted list of up to
three confidence tips and up to three next steps."#
    }

    /// Structured prompt for the secondary confidence assessment.
    /// The model must answer with a single JSON object.
    pub fn assessment_prompt(&self, user_message: &str) -> String {
        format!(
            r#"Assess the confidence expressed in the message below.

MESSAGE:
{}

Return ONLY valid JSON, no explanation text, in this exact format:

{{
  "confidence_level": <integer 1-10>,
  "emotional_state": "<short phrase>",
  "main_challenge": "<short phrase>",
  "hidden_strengths": "<short phrase>",
  "best_approach": "<short phrase>"
}}
"#,
            user_message
        )
    }

    /// Natural-language generation prompt for the coaching reply.
    pub fn response_prompt(&self, user_message: &str, confidence_level: u8, context: &str) -> String {
        format!(
            r#"{}

CONFIDENCE LEVEL (1-10): {}

USER MESSAGE:
{}

Respond as their coach. Match your tone to the confidence level: gentler
and more reassuring for low levels, energizing for high levels. End with
a bulleted list of tips and next steps."#,
            context, confidence_level, user_message
        )
    }
}

impl Default for ConfidencePromptEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_assessment_prompt_requests_json() {
        let engine = ConfidencePromptEngine::new();
        let prompt = engine.assessment_prompt("I feel stuck");
        assert!(prompt.contains("I feel stuck"));
        assert!(prompt.contains("ONLY valid JSON"));
        assert!(prompt.contains("confidence_level"));
    }

    #[test]
    fn test_response_prompt_embeds_level_and_context() {
        let engine = ConfidencePromptEngine::new();
        let prompt = engine.response_prompt("big day tomorrow", 7, "User: hi...");
        assert!(prompt.contains("big day tomorrow"));
        assert!(prompt.contains("7"));
        assert!(prompt.contains("User: hi..."));
    }
}
