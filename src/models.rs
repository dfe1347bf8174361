//! Core data models for the confidence coach

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Clamp an arbitrary integer into the 1-10 confidence range.
pub fn clamp_level(level: i64) -> u8 {
    level.clamp(1, 10) as u8
}

//
// ================= User Message =================
//

/// A single validated user turn. Immutable once constructed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserMessage {
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

impl UserMessage {
    /// Maximum stored length, independent of the display-layer cap.
    pub const MAX_CONTENT_CHARS: usize = 1000;

    pub fn new(content: &str) -> crate::Result<Self> {
        let trimmed = content.trim();

        if trimmed.is_empty() {
            return Err(crate::error::CoachError::InvalidInput(
                "Message cannot be empty".to_string(),
            ));
        }

        if trimmed.chars().count() > Self::MAX_CONTENT_CHARS {
            return Err(crate::error::CoachError::InvalidInput(format!(
                "Message exceeds the {} character storage limit",
                Self::MAX_CONTENT_CHARS
            )));
        }

        Ok(Self {
            content: trimmed.to_string(),
            timestamp: Utc::now(),
        })
    }
}

//
// ================= Confidence Assessment =================
//

/// Structured assessment of one user message, either produced by the
/// secondary model call or synthesized locally.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfidenceAssessment {
    pub confidence_level: u8,
    pub emotional_state: String,
    pub main_challenge: String,
    pub hidden_strengths: String,
    pub best_approach: String,
}

impl ConfidenceAssessment {
    /// Default assessment used whenever the model's structured output is
    /// missing or unusable. Neutral level; min-reconciliation against the
    /// keyword estimate happens at the composer.
    pub fn degraded() -> Self {
        Self {
            confidence_level: 5,
            emotional_state: "uncertain".to_string(),
            main_challenge: "general confidence".to_string(),
            hidden_strengths: "resilience and self-awareness".to_string(),
            best_approach: "supportive encouragement".to_string(),
        }
    }

    /// Parse a model-produced JSON object. Missing descriptive fields get
    /// generic defaults; an out-of-range level is clamped, never carried
    /// forward. Unparseable payloads or a missing level are an
    /// `AssessmentParse` error for the caller to degrade on.
    pub fn from_json_str(raw: &str) -> crate::Result<Self> {
        let value: serde_json::Value = serde_json::from_str(raw.trim()).map_err(|e| {
            crate::error::CoachError::AssessmentParse(format!("not a JSON object: {}", e))
        })?;

        let level = value
            .get("confidence_level")
            .and_then(|v| v.as_i64())
            .ok_or_else(|| {
                crate::error::CoachError::AssessmentParse(
                    "missing integer confidence_level".to_string(),
                )
            })?;

        let field = |name: &str, default: &str| -> String {
            value
                .get(name)
                .and_then(|v| v.as_str())
                .unwrap_or(default)
                .to_string()
        };

        Ok(Self {
            confidence_level: clamp_level(level),
            emotional_state: field("emotional_state", "processing"),
            main_challenge: field("main_challenge", "general confidence"),
            hidden_strengths: field("hidden_strengths", "self-awareness and courage to reach out"),
            best_approach: field("best_approach", "supportive encouragement"),
        })
    }
}

//
// ================= AI Response =================
//

const TIP_LINE_MARKERS: &[&str] = &["1.", "2.", "3.", "•", "-", "→"];
const STEP_WORDS: &[&str] = &["try", "practice", "do", "start"];

/// Complete composed reply for one turn.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AIResponse {
    pub response: String,
    pub confidence_level: u8,
    #[serde(default)]
    pub confidence_tips: Vec<String>,
    #[serde(default)]
    pub next_steps: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assessment: Option<ConfidenceAssessment>,
    #[serde(default)]
    pub matched_keywords: Vec<String>,
    pub timestamp: DateTime<Utc>,
}

impl AIResponse {
    pub fn new(
        response: String,
        confidence_level: u8,
        assessment: Option<ConfidenceAssessment>,
        matched_keywords: Vec<String>,
    ) -> Self {
        Self {
            response,
            confidence_level: clamp_level(confidence_level as i64),
            confidence_tips: Vec::new(),
            next_steps: Vec::new(),
            assessment,
            matched_keywords,
            timestamp: Utc::now(),
        }
    }

    /// Pull up to 3 tips and 3 next steps out of the response text.
    /// Only runs when tips were not supplied by a more specific path.
    pub fn extract_tips_and_steps(&mut self) {
        if !self.confidence_tips.is_empty() {
            return;
        }

        let mut tips = Vec::new();
        let mut steps = Vec::new();

        for line in self.response.lines() {
            let clean = line.trim();
            if !TIP_LINE_MARKERS.iter().any(|m| clean.starts_with(m)) {
                continue;
            }

            let stripped = clean
                .trim_start_matches(|c: char| "123456789.•-→ ".contains(c))
                .to_string();
            let lowered = clean.to_lowercase();

            if STEP_WORDS.iter().any(|w| lowered.contains(w)) {
                steps.push(stripped);
            } else {
                tips.push(stripped);
            }
        }

        tips.truncate(3);
        steps.truncate(3);
        self.confidence_tips = tips;
        self.next_steps = steps;
    }

    /// The hard-coded degraded-mode reply used when the composition
    /// pipeline fails anywhere past validation. Constructed locally with
    /// no further I/O so it can never itself fail.
    pub fn fallback() -> Self {
        Self {
            response: crate::generate::FALLBACK_COACHING_TEXT.to_string(),
            confidence_level: 5,
            confidence_tips: vec![
                "Take one small step forward today".to_string(),
                "Remember that setbacks are temporary".to_string(),
                "You're stronger than you think".to_string(),
            ],
            next_steps: vec![
                "Practice deep breathing for 2 minutes".to_string(),
                "Write down one thing you're grateful for".to_string(),
                "Reach out to someone who supports you".to_string(),
            ],
            assessment: None,
            matched_keywords: Vec::new(),
            timestamp: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_message_trims_and_rejects_empty() {
        let msg = UserMessage::new("  hello there  ").unwrap();
        assert_eq!(msg.content, "hello there");

        assert!(UserMessage::new("   ").is_err());
        assert!(UserMessage::new("").is_err());
    }

    #[test]
    fn test_user_message_storage_limit() {
        let long = "a".repeat(1001);
        assert!(UserMessage::new(&long).is_err());

        let exact = "a".repeat(1000);
        assert!(UserMessage::new(&exact).is_ok());
    }

    #[test]
    fn test_assessment_parses_valid_json() {
        let raw = r#"{
            "confidence_level": 7,
            "emotional_state": "hopeful",
            "main_challenge": "public speaking",
            "hidden_strengths": "preparation",
            "best_approach": "gradual exposure"
        }"#;
        let assessment = ConfidenceAssessment::from_json_str(raw).unwrap();
        assert_eq!(assessment.confidence_level, 7);
        assert_eq!(assessment.emotional_state, "hopeful");
    }

    #[test]
    fn test_assessment_malformed_json_is_parse_error() {
        assert!(ConfidenceAssessment::from_json_str("not json at all").is_err());
        assert!(ConfidenceAssessment::from_json_str(r#"{"emotional_state": "ok"}"#).is_err());
    }

    #[test]
    fn test_assessment_clamps_out_of_range_level() {
        let assessment =
            ConfidenceAssessment::from_json_str(r#"{"confidence_level": 42, "emotional_state": "wired"}"#)
                .unwrap();
        assert_eq!(assessment.confidence_level, 10);

        let assessment =
            ConfidenceAssessment::from_json_str(r#"{"confidence_level": -3, "emotional_state": "flat"}"#)
                .unwrap();
        assert_eq!(assessment.confidence_level, 1);
    }

    #[test]
    fn test_degraded_assessment_is_neutral() {
        let assessment = ConfidenceAssessment::degraded();
        assert_eq!(assessment.confidence_level, 5);
    }

    #[test]
    fn test_extract_tips_and_steps() {
        let text = "Here is my guidance.\n\
                    1. Celebrate how far you have come\n\
                    2. Try practicing in front of a mirror\n\
                    • You are more capable than you believe\n\
                    - Start a small journal tonight\n";
        let mut response = AIResponse::new(text.to_string(), 6, None, vec![]);
        response.extract_tips_and_steps();

        assert_eq!(
            response.confidence_tips,
            vec![
                "Celebrate how far you have come",
                "You are more capable than you believe"
            ]
        );
        assert_eq!(
            response.next_steps,
            vec![
                "Try practicing in front of a mirror",
                "Start a small journal tonight"
            ]
        );
    }

    #[test]
    fn test_extract_caps_at_three_each() {
        let text = "• one\n• two\n• three\n• four\n\
                    - try a\n- try b\n- try c\n- try d\n";
        let mut response = AIResponse::new(text.to_string(), 5, None, vec![]);
        response.extract_tips_and_steps();

        assert_eq!(response.confidence_tips.len(), 3);
        assert_eq!(response.next_steps.len(), 3);
    }

    #[test]
    fn test_extract_skips_when_tips_already_supplied() {
        let mut response = AIResponse::new("1. something".to_string(), 5, None, vec![]);
        response.confidence_tips = vec!["pre-supplied".to_string()];
        response.extract_tips_and_steps();
        assert_eq!(response.confidence_tips, vec!["pre-supplied"]);
        assert!(response.next_steps.is_empty());
    }

    #[test]
    fn test_fallback_response_shape() {
        let fallback = AIResponse::fallback();
        assert_eq!(fallback.confidence_level, 5);
        assert_eq!(fallback.confidence_tips.len(), 3);
        assert_eq!(fallback.next_steps.len(), 3);
        assert!(fallback.matched_keywords.is_empty());
    }

    #[test]
    fn test_clamp_level() {
        assert_eq!(clamp_level(0), 1);
        assert_eq!(clamp_level(11), 10);
        assert_eq!(clamp_level(7), 7);
    }
}
