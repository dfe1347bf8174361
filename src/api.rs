//! REST API server for the confidence coach
//!
//! Exposes coaching turns and session analytics over HTTP. Sessions live
//! in an in-process map keyed by UUID; each session is guarded by its own
//! mutex so at most one turn is in flight per conversation.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;
use uuid::Uuid;

use crate::coach::ConfidenceCoach;
use crate::config::CoachConfig;
use crate::models::UserMessage;
use crate::validate::validate_user_input;

/// Fixed instant-booster affirmations.
const AFFIRMATIONS: &[&str] = &[
    "You are capable of amazing things!",
    "Every challenge is an opportunity to grow!",
    "Your potential is limitless!",
    "You have everything you need to succeed!",
    "Progress, not perfection, is the goal!",
];

/// =============================
/// Request Models
/// =============================

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub message: String,
    pub session_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct GoalRequest {
    pub goal: String,
}

/// =============================
/// Response Wrapper
/// =============================

#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse {
    pub success: bool,
    pub data: Option<serde_json::Value>,
    pub error: Option<String>,
    pub timestamp: String,
}

impl ApiResponse {
    pub fn success<T: Serialize>(data: T) -> Self {
        Self {
            success: true,
            data: serde_json::to_value(data).ok(),
            error: None,
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }

    pub fn error(message: String) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// =============================
/// API State
/// =============================

type CoachFactory = Arc<dyn Fn() -> crate::Result<ConfidenceCoach> + Send + Sync>;
type SessionMap = Arc<RwLock<HashMap<Uuid, Arc<Mutex<ConfidenceCoach>>>>>;

#[derive(Clone)]
pub struct ApiState {
    factory: CoachFactory,
    sessions: SessionMap,
    max_message_length: usize,
}

impl ApiState {
    async fn session(&self, id: Uuid) -> Option<Arc<Mutex<ConfidenceCoach>>> {
        self.sessions.read().await.get(&id).cloned()
    }

    async fn session_or_create(&self, id: Uuid) -> crate::Result<Arc<Mutex<ConfidenceCoach>>> {
        if let Some(coach) = self.session(id).await {
            return Ok(coach);
        }

        let mut sessions = self.sessions.write().await;
        if let Some(coach) = sessions.get(&id) {
            return Ok(coach.clone());
        }

        let coach = Arc::new(Mutex::new((self.factory)()?));
        sessions.insert(id, coach.clone());
        info!("Created session {}", id);
        Ok(coach)
    }
}

/// =============================
/// Helpers
/// =============================

fn stable_uuid_from_string(input: &str) -> Uuid {
    use sha2::{Digest, Sha256};

    let hash = Sha256::digest(input.as_bytes());
    let mut bytes = [0u8; 16];
    bytes.copy_from_slice(&hash[..16]);

    // Set UUID version (4) and variant (RFC4122) bits.
    bytes[6] = (bytes[6] & 0x0f) | 0x40;
    bytes[8] = (bytes[8] & 0x3f) | 0x80;

    Uuid::from_bytes(bytes)
}

/// Use the session id a caller supplies (parsing non-UUID keys into a
/// stable UUID), or mint a fresh one for brand-new conversations.
fn resolve_session_id(value: Option<&str>) -> Uuid {
    match value {
        Some(v) if !v.trim().is_empty() => {
            Uuid::parse_str(v).unwrap_or_else(|_| stable_uuid_from_string(v))
        }
        _ => Uuid::new_v4(),
    }
}

/// =============================
/// Endpoints
/// =============================

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

async fn chat(
    State(state): State<ApiState>,
    Json(req): Json<ChatRequest>,
) -> (StatusCode, Json<ApiResponse>) {
    if let Err(e) = validate_user_input(&req.message, state.max_message_length) {
        return (StatusCode::BAD_REQUEST, Json(ApiResponse::error(e.to_string())));
    }

    let user_message = match UserMessage::new(&req.message) {
        Ok(msg) => msg,
        Err(e) => {
            return (StatusCode::BAD_REQUEST, Json(ApiResponse::error(e.to_string())));
        }
    };

    let session_id = resolve_session_id(req.session_id.as_deref());
    info!("Coaching turn for session {}", session_id);

    let coach = match state.session_or_create(session_id).await {
        Ok(coach) => coach,
        Err(e) => {
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::error(format!("Failed to start session: {}", e))),
            );
        }
    };

    let response = coach.lock().await.respond(&user_message).await;

    (
        StatusCode::OK,
        Json(ApiResponse::success(serde_json::json!({
            "session_id": session_id,
            "response": response.response,
            "confidence_level": response.confidence_level,
            "confidence_tips": response.confidence_tips,
            "next_steps": response.next_steps,
            "assessment": response.assessment,
            "matched_keywords": response.matched_keywords,
            "timestamp": response.timestamp,
        }))),
    )
}

async fn session_summary(
    State(state): State<ApiState>,
    Path(id): Path<Uuid>,
) -> (StatusCode, Json<ApiResponse>) {
    match state.session(id).await {
        Some(coach) => {
            let summary = coach.lock().await.session_summary();
            (StatusCode::OK, Json(ApiResponse::success(summary)))
        }
        None => (
            StatusCode::NOT_FOUND,
            Json(ApiResponse::error("Unknown session".to_string())),
        ),
    }
}

async fn session_export(
    State(state): State<ApiState>,
    Path(id): Path<Uuid>,
) -> (StatusCode, Json<ApiResponse>) {
    match state.session(id).await {
        Some(coach) => {
            let export = coach.lock().await.export_session();
            (StatusCode::OK, Json(ApiResponse::success(export)))
        }
        None => (
            StatusCode::NOT_FOUND,
            Json(ApiResponse::error("Unknown session".to_string())),
        ),
    }
}

async fn session_reset(
    State(state): State<ApiState>,
    Path(id): Path<Uuid>,
) -> (StatusCode, Json<ApiResponse>) {
    match state.session(id).await {
        Some(coach) => {
            coach.lock().await.reset_session();
            (
                StatusCode::OK,
                Json(ApiResponse::success(serde_json::json!({ "session_id": id }))),
            )
        }
        None => (
            StatusCode::NOT_FOUND,
            Json(ApiResponse::error("Unknown session".to_string())),
        ),
    }
}

async fn add_goal(
    State(state): State<ApiState>,
    Path(id): Path<Uuid>,
    Json(req): Json<GoalRequest>,
) -> (StatusCode, Json<ApiResponse>) {
    if req.goal.trim().is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::error("Goal cannot be empty".to_string())),
        );
    }

    match state.session(id).await {
        Some(coach) => {
            let goal = coach.lock().await.session_mut().add_goal(&req.goal);
            (StatusCode::OK, Json(ApiResponse::success(goal)))
        }
        None => (
            StatusCode::NOT_FOUND,
            Json(ApiResponse::error("Unknown session".to_string())),
        ),
    }
}

async fn complete_goal(
    State(state): State<ApiState>,
    Path((id, goal_id)): Path<(Uuid, Uuid)>,
) -> (StatusCode, Json<ApiResponse>) {
    match state.session(id).await {
        Some(coach) => {
            if coach.lock().await.session_mut().complete_goal(goal_id) {
                (
                    StatusCode::OK,
                    Json(ApiResponse::success(serde_json::json!({ "completed": true }))),
                )
            } else {
                (
                    StatusCode::NOT_FOUND,
                    Json(ApiResponse::error("Unknown goal".to_string())),
                )
            }
        }
        None => (
            StatusCode::NOT_FOUND,
            Json(ApiResponse::error("Unknown session".to_string())),
        ),
    }
}

async fn affirmation() -> Json<ApiResponse> {
    let pick = AFFIRMATIONS
        .choose(&mut rand::thread_rng())
        .copied()
        .unwrap_or(AFFIRMATIONS[0]);
    Json(ApiResponse::success(
        serde_json::json!({ "affirmation": pick }),
    ))
}

/// =============================
/// Router
/// =============================

pub fn create_router(config: &CoachConfig) -> Router {
    let cfg = config.clone();
    let factory: CoachFactory = Arc::new(move || ConfidenceCoach::from_config(&cfg));
    router_with_factory(factory, config.max_message_length)
}

/// Router with an injectable coach factory, used by tests and the demo.
pub fn router_with_factory(factory: CoachFactory, max_message_length: usize) -> Router {
    let state = ApiState {
        factory,
        sessions: Arc::new(RwLock::new(HashMap::new())),
        max_message_length,
    };

    Router::new()
        .route("/health", get(health))
        .route("/api/chat", post(chat))
        .route("/api/affirmation", get(affirmation))
        .route("/api/session/:id/summary", get(session_summary))
        .route("/api/session/:id/export", get(session_export))
        .route("/api/session/:id/reset", post(session_reset))
        .route("/api/session/:id/goals", post(add_goal))
        .route("/api/session/:id/goals/:goal_id/complete", post(complete_goal))
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

/// =============================
/// Server Startup
/// =============================

pub async fn start_server(config: CoachConfig) -> std::result::Result<(), Box<dyn std::error::Error>> {
    let port = config.port;
    let router = create_router(&config);

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", port)).await?;

    info!("API Server listening on http://0.0.0.0:{}", port);
    info!("Local: http://127.0.0.1:{}", port);

    axum::serve(listener, router).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generate::StaticGenerator;
    use crate::quotes::StaticQuotes;

    fn offline_state() -> ApiState {
        let factory: CoachFactory = Arc::new(|| {
            Ok(ConfidenceCoach::new(
                Box::new(StaticGenerator::new(
                    r#"{"confidence_level": 6, "emotional_state": "even"}"#,
                )),
                Box::new(StaticQuotes::new("Keep going.")),
                3,
            ))
        });
        ApiState {
            factory,
            sessions: Arc::new(RwLock::new(HashMap::new())),
            max_message_length: CoachConfig::DEFAULT_MAX_MESSAGE_LENGTH,
        }
    }

    #[test]
    fn test_stable_uuid_is_deterministic_and_valid() {
        let a = stable_uuid_from_string("my-session-key");
        let b = stable_uuid_from_string("my-session-key");
        assert_eq!(a, b);
        assert_eq!(a.get_version_num(), 4);

        assert_ne!(a, stable_uuid_from_string("other-key"));
    }

    #[test]
    fn test_resolve_session_id() {
        let fixed = Uuid::new_v4();
        assert_eq!(resolve_session_id(Some(&fixed.to_string())), fixed);

        // Non-UUID keys map to the same stable id every time.
        assert_eq!(
            resolve_session_id(Some("alice")),
            resolve_session_id(Some("alice"))
        );

        // Absent or blank keys mint fresh ids.
        assert_ne!(resolve_session_id(None), resolve_session_id(None));
        assert_ne!(resolve_session_id(Some("  ")), resolve_session_id(Some("  ")));
    }

    #[tokio::test]
    async fn test_chat_rejects_denylisted_input() {
        let state = offline_state();
        let (status, Json(body)) = chat(
            State(state),
            Json(ChatRequest {
                message: "asdf".to_string(),
                session_id: None,
            }),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(!body.success);
        assert_eq!(body.error.as_deref(), Some("Please enter a meaningful message"));
    }

    #[tokio::test]
    async fn test_chat_turn_and_summary_roundtrip() {
        let state = offline_state();

        let (status, Json(body)) = chat(
            State(state.clone()),
            Json(ChatRequest {
                message: "feeling good about today".to_string(),
                session_id: Some("alice".to_string()),
            }),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let data = body.data.unwrap();
        assert_eq!(data["confidence_level"], 6);

        let session_id = resolve_session_id(Some("alice"));
        let (status, Json(body)) = session_summary(State(state), Path(session_id)).await;
        assert_eq!(status, StatusCode::OK);
        let summary = body.data.unwrap();
        assert_eq!(summary["total_messages"], 2);
    }

    #[tokio::test]
    async fn test_unknown_session_is_not_found() {
        let state = offline_state();
        let (status, _) = session_summary(State(state.clone()), Path(Uuid::new_v4())).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = session_export(State(state), Path(Uuid::new_v4())).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_goal_endpoints() {
        let state = offline_state();
        let session_id = resolve_session_id(Some("goals"));
        state.session_or_create(session_id).await.unwrap();

        let (status, Json(body)) = add_goal(
            State(state.clone()),
            Path(session_id),
            Json(GoalRequest {
                goal: "speak up in standup".to_string(),
            }),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let goal_id: Uuid =
            serde_json::from_value(body.data.unwrap()["id"].clone()).unwrap();

        let (status, _) = complete_goal(State(state), Path((session_id, goal_id))).await;
        assert_eq!(status, StatusCode::OK);
    }
}
