//! ConfidenceAI coaching pipeline
//!
//! A confidence-coaching conversation engine that:
//! - Classifies each user message into a 1-10 confidence level via an
//!   ordered keyword-tier scan
//! - Composes coaching replies through a Gemini-backed generation gateway
//!   with bounded retry and a fixed degraded-mode response
//! - Reconciles local and model assessments, always keeping the more
//!   cautious estimate
//! - Tracks an append-only session record with running analytics
//! - Exposes the whole pipeline over a small REST API
//!
//! TURN FLOW:
//! VALIDATE → CLASSIFY → ASSESS → (QUOTE?) → GENERATE → EXTRACT → LOG

pub mod api;
pub mod classifier;
pub mod coach;
pub mod config;
pub mod error;
pub mod generate;
pub mod models;
pub mod prompts;
pub mod quotes;
pub mod session;
pub mod validate;

pub use error::Result;

// Re-export common types
pub use classifier::ConfidenceClassifier;
pub use coach::ConfidenceCoach;
pub use models::{AIResponse, ConfidenceAssessment, UserMessage};
pub use session::{ChatSession, SessionSummary};
