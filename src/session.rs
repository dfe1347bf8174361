//! Chat session record and analytics
//!
//! Append-only log of exchanged messages with derived statistics for the
//! dashboard: running average confidence, trailing trend window, elapsed
//! duration. Owned by exactly one conversation; never mutated except by
//! appending.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Message sender role
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// One logged turn. Confidence fields are populated for assistant turns.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionMessage {
    pub role: Role,
    pub content: String,
    pub timestamp: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidence_level: Option<u8>,
    #[serde(default)]
    pub matched_keywords: Vec<String>,
}

/// A goal the user set for today, kept with the session and exported.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailyGoal {
    pub id: Uuid,
    pub goal: String,
    pub date: NaiveDate,
    pub completed: bool,
}

/// Derived analytics for the dashboard
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionSummary {
    pub total_messages: usize,
    pub average_confidence: f64,
    pub confidence_trend: Vec<u8>,
    pub session_duration: String,
    pub latest_confidence: u8,
}

/// Downloadable export payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionExport {
    pub session_summary: SessionSummary,
    pub full_conversation: Vec<SessionMessage>,
    pub confidence_progression: Vec<u8>,
    pub daily_goals: Vec<DailyGoal>,
}

/// Append-only record of one running conversation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatSession {
    messages: Vec<SessionMessage>,
    confidence_history: Vec<u8>,
    start_time: DateTime<Utc>,
    total_messages: usize,
    daily_goals: Vec<DailyGoal>,
}

impl ChatSession {
    /// Trend entries shown when fewer than 2 real data points exist.
    /// A chart-friendly placeholder, not real data.
    const TREND_PLACEHOLDER: [u8; 2] = [5, 6];

    pub fn new() -> Self {
        Self {
            messages: Vec::new(),
            confidence_history: Vec::new(),
            start_time: Utc::now(),
            total_messages: 0,
            daily_goals: Vec::new(),
        }
    }

    /// Append one turn. Assistant turns with a confidence level also feed
    /// the confidence history; the level is clamped into range on entry.
    pub fn append(
        &mut self,
        role: Role,
        content: &str,
        confidence_level: Option<u8>,
        matched_keywords: Vec<String>,
        timestamp: Option<DateTime<Utc>>,
    ) {
        let confidence_level = confidence_level.map(|l| crate::models::clamp_level(l as i64));
        let is_assistant = role == Role::Assistant;

        self.messages.push(SessionMessage {
            role,
            content: content.to_string(),
            timestamp: timestamp.unwrap_or_else(Utc::now),
            confidence_level: if is_assistant { confidence_level } else { None },
            matched_keywords: if is_assistant { matched_keywords } else { Vec::new() },
        });
        self.total_messages += 1;

        if is_assistant {
            if let Some(level) = confidence_level {
                self.confidence_history.push(level);
            }
        }
    }

    pub fn messages(&self) -> &[SessionMessage] {
        &self.messages
    }

    pub fn message_count(&self) -> usize {
        self.total_messages
    }

    pub fn confidence_history(&self) -> &[u8] {
        &self.confidence_history
    }

    /// Arithmetic mean of the confidence history, rounded to 1 decimal.
    /// Neutral 5.0 when no assistant turn has been recorded yet.
    pub fn average_confidence(&self) -> f64 {
        if self.confidence_history.is_empty() {
            return 5.0;
        }
        let sum: u32 = self.confidence_history.iter().map(|&l| l as u32).sum();
        let mean = sum as f64 / self.confidence_history.len() as f64;
        (mean * 10.0).round() / 10.0
    }

    /// Last 10 confidence entries for charting, or the fixed placeholder
    /// pair when fewer than 2 entries exist.
    pub fn confidence_trend(&self) -> Vec<u8> {
        if self.confidence_history.len() < 2 {
            return Self::TREND_PLACEHOLDER.to_vec();
        }
        let start = self.confidence_history.len().saturating_sub(10);
        self.confidence_history[start..].to_vec()
    }

    pub fn latest_confidence(&self) -> u8 {
        self.confidence_history.last().copied().unwrap_or(5)
    }

    pub fn summary(&self) -> SessionSummary {
        let elapsed = Utc::now() - self.start_time;
        SessionSummary {
            total_messages: self.total_messages,
            average_confidence: self.average_confidence(),
            confidence_trend: self.confidence_trend(),
            session_duration: format_duration_secs(elapsed.num_seconds().max(0)),
            latest_confidence: self.latest_confidence(),
        }
    }

    pub fn export(&self) -> SessionExport {
        SessionExport {
            session_summary: self.summary(),
            full_conversation: self.messages.clone(),
            confidence_progression: self.confidence_history.clone(),
            daily_goals: self.daily_goals.clone(),
        }
    }

    pub fn add_goal(&mut self, goal: &str) -> DailyGoal {
        let entry = DailyGoal {
            id: Uuid::new_v4(),
            goal: goal.trim().to_string(),
            date: Utc::now().date_naive(),
            completed: false,
        };
        self.daily_goals.push(entry.clone());
        entry
    }

    /// Mark a goal completed. Returns false when the id is unknown.
    pub fn complete_goal(&mut self, id: Uuid) -> bool {
        match self.daily_goals.iter_mut().find(|g| g.id == id) {
            Some(goal) => {
                goal.completed = true;
                true
            }
            None => false,
        }
    }

    pub fn daily_goals(&self) -> &[DailyGoal] {
        &self.daily_goals
    }
}

impl Default for ChatSession {
    fn default() -> Self {
        Self::new()
    }
}

/// Wall-clock duration as a truncated `H:MM:SS` string, sub-second
/// precision discarded.
fn format_duration_secs(total_secs: i64) -> String {
    let hours = total_secs / 3600;
    let minutes = (total_secs % 3600) / 60;
    let seconds = total_secs % 60;
    format!("{}:{:02}:{:02}", hours, minutes, seconds)
}
