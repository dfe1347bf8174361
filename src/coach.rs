//! Confidence coaching pipeline
//!
//! Orchestrates one turn: local keyword classification, secondary model
//! assessment with min-reconciliation, low-score quote injection, rolling
//! context, generation, and tip/step extraction. No failure past input
//! validation ever reaches the caller as an error; the outer boundary
//! converts everything to the fixed fallback response.

use tracing::{error, info, warn};

use crate::classifier::ConfidenceClassifier;
use crate::config::CoachConfig;
use crate::generate::{GeminiClient, GenerationGateway, TextGenerator};
use crate::models::{AIResponse, ConfidenceAssessment, UserMessage};
use crate::prompts::ConfidencePromptEngine;
use crate::quotes::{QuoteClient, QuoteSource};
use crate::session::{ChatSession, Role, SessionExport, SessionSummary};

/// Confidence level below which a motivational quote is injected into the
/// coaching guidance.
const QUOTE_THRESHOLD: u8 = 4;

/// Prior turns included in the rolling generation context.
const CONTEXT_TURNS: usize = 4;

/// Per-turn character cap on each context line.
const CONTEXT_CHARS: usize = 100;

/// One conversation's coach: generation gateway, quote source, prompt
/// engine, and the session record it exclusively owns.
pub struct ConfidenceCoach {
    gateway: GenerationGateway,
    quotes: Box<dyn QuoteSource>,
    prompts: ConfidencePromptEngine,
    session: ChatSession,
}

impl ConfidenceCoach {
    pub fn new(generator: Box<dyn TextGenerator>, quotes: Box<dyn QuoteSource>, max_retries: u32) -> Self {
        Self {
            gateway: GenerationGateway::new(generator, max_retries),
            quotes,
            prompts: ConfidencePromptEngine::new(),
            session: ChatSession::new(),
        }
    }

    /// Production wiring: Gemini generation + the public quote API.
    pub fn from_config(config: &CoachConfig) -> crate::Result<Self> {
        let client = GeminiClient::new(config.gemini_api_key.clone())?;
        Ok(Self::new(
            Box::new(client),
            Box::new(QuoteClient::new()),
            config.max_retries,
        ))
    }

    /// Run one full coaching turn. Never fails: any pipeline error is
    /// converted to the fixed fallback response here, with both turns
    /// still appended to the session.
    pub async fn respond(&mut self, user_message: &UserMessage) -> AIResponse {
        match self.run_pipeline(user_message).await {
            Ok(response) => response,
            Err(e) => {
                error!("Response generation failed: {}", e);
                let fallback = AIResponse::fallback();
                self.log_turn(user_message, &fallback);
                fallback
            }
        }
    }

    async fn run_pipeline(&mut self, user_message: &UserMessage) -> crate::Result<AIResponse> {
        // Direct motivation request bypasses assessment and generation.
        if user_message.content.to_lowercase().contains("motivate me") {
            let quote = self.quotes.motivational_quote().await;
            let mut response = AIResponse::new(
                format!("Here's something to lift you up: \"{}\"", quote),
                5,
                Some(ConfidenceAssessment {
                    confidence_level: 5,
                    emotional_state: "motivated".to_string(),
                    main_challenge: "seeking inspiration".to_string(),
                    hidden_strengths: "openness to encouragement".to_string(),
                    best_approach: "positive reinforcement".to_string(),
                }),
                vec!["motivate".to_string()],
            );
            response.extract_tips_and_steps();
            self.log_turn(user_message, &response);
            return Ok(response);
        }

        let (local_level, local_keywords) = ConfidenceClassifier::classify(&user_message.content);
        let mut assessment = self.assess(&user_message.content, local_level).await;

        if assessment.confidence_level < QUOTE_THRESHOLD {
            let quote = self.quotes.motivational_quote().await;
            assessment
                .best_approach
                .push_str(&format!(" Here's a quote to inspire you: \"{}\"", quote));
        }

        let context = self.build_context();
        let response_prompt = self.prompts.response_prompt(
            &user_message.content,
            assessment.confidence_level,
            &context,
        );
        let full_prompt = format!("{}\n\n{}", self.prompts.system_prompt(), response_prompt);

        let text = self.gateway.generate(&full_prompt).await;

        let mut response = AIResponse::new(
            text,
            assessment.confidence_level,
            Some(assessment),
            local_keywords,
        );
        response.extract_tips_and_steps();
        self.log_turn(user_message, &response);

        info!(
            "Generated response for confidence level: {}",
            response.confidence_level
        );
        Ok(response)
    }

    /// Secondary assessment through the gateway, reconciled against the
    /// local keyword estimate: the lower (more cautious) level wins.
    async fn assess(&self, content: &str, local_level: u8) -> ConfidenceAssessment {
        let prompt = self.prompts.assessment_prompt(content);
        let raw = self.gateway.generate(&prompt).await;

        let mut assessment = match ConfidenceAssessment::from_json_str(&raw) {
            Ok(assessment) => assessment,
            Err(e) => {
                warn!("Assessment degraded to default: {}", e);
                ConfidenceAssessment::degraded()
            }
        };

        assessment.confidence_level = local_level.min(assessment.confidence_level);
        assessment
    }

    /// Short rolling context from the most recent turns, each truncated.
    fn build_context(&self) -> String {
        if self.session.messages().len() < 2 {
            return "This is the beginning of our conversation.".to_string();
        }

        let messages = self.session.messages();
        let recent = &messages[messages.len().saturating_sub(CONTEXT_TURNS)..];

        let mut lines = Vec::with_capacity(recent.len());
        for msg in recent {
            let role = match msg.role {
                Role::User => "User",
                Role::Assistant => "You",
            };
            let truncated: String = msg.content.chars().take(CONTEXT_CHARS).collect();
            lines.push(format!("{}: {}...", role, truncated));
        }

        format!("Recent conversation context:\n{}", lines.join("\n"))
    }

    /// Append both sides of the turn to the session record.
    fn log_turn(&mut self, user_message: &UserMessage, response: &AIResponse) {
        self.session.append(
            Role::User,
            &user_message.content,
            None,
            Vec::new(),
            Some(user_message.timestamp),
        );
        self.session.append(
            Role::Assistant,
            &response.response,
            Some(response.confidence_level),
            response.matched_keywords.clone(),
            Some(response.timestamp),
        );
    }

    pub fn session_summary(&self) -> SessionSummary {
        self.session.summary()
    }

    pub fn export_session(&self) -> SessionExport {
        self.session.export()
    }

    pub fn session(&self) -> &ChatSession {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut ChatSession {
        &mut self.session
    }

    /// Discard the conversation and start fresh.
    pub fn reset_session(&mut self) {
        self.session = ChatSession::new();
        info!("Session reset");
    }
}
