//! Research agent DTOs

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::domain::session::RemoteStatus;

/// Request body for `POST /chat`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StartChatRequest {
    pub query: String,
}

/// Response of `POST /chat`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StartChatResponse {
    pub session_id: String,
    #[serde(default)]
    pub status: String,
}

/// Response of `GET /status/{session_id}`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionStatus {
    pub session_id: String,
    pub status: RemoteStatus,
    #[serde(default)]
    pub activity: String,
    #[serde(default)]
    pub confidence: f64,
    #[serde(default)]
    pub complete: bool,
    #[serde(default)]
    pub plan_steps: Vec<String>,
    #[serde(default)]
    pub current_step: i64,
    #[serde(default)]
    pub step_results: Vec<StepResultEntry>,
}

impl SessionStatus {
    /// Whether this report means the remote job has finished.
    ///
    /// Either signal is sufficient: the `complete` flag or a `Complete` status.
    pub fn reports_completion(&self) -> bool {
        self.complete || self.status == RemoteStatus::Complete
    }
}

/// One partial result reported inside a status response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepResultEntry {
    pub step: i64,
    pub result: String,
    /// Kept as the raw string; the services do not agree on an offset format.
    #[serde(default)]
    pub timestamp: String,
}

/// Response of `GET /result/{session_id}`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResultResponse {
    pub session_id: String,
    #[serde(default)]
    pub response: String,
    #[serde(default)]
    pub complete: bool,
}

/// Response of `GET /reflection/{session_id}`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReflectionResponse {
    pub session_id: String,
    #[serde(default)]
    pub reflection: String,
    #[serde(default)]
    pub complete: bool,
}

/// Response of `GET /execution/{session_id}`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutionResponse {
    pub session_id: String,
    #[serde(default)]
    pub execution_history: Vec<String>,
    #[serde(default)]
    pub step_count: i64,
}

/// Response of `GET /health`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agent_initialized: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active_sessions: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
}

/// Response of `GET /memory/summary`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemorySummary {
    pub total_conversations: u64,
    pub semantic_enabled: bool,
    pub embeddings_cached: u64,
    pub memory_file_size: u64,
    #[serde(default)]
    pub latest_conversation: String,
    #[serde(default)]
    pub confidence_trend: f64,
    #[serde(default)]
    pub recent_topics: Vec<String>,
}

/// Response of `POST /memory/clear`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClearMemoryResponse {
    pub status: String,
}

/// Response of `GET /keys/status`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeyStatus {
    pub total_keys: u64,
    pub available_keys: u64,
    pub exhausted_keys: u64,
    #[serde(default)]
    pub request_counts: HashMap<String, KeyUsage>,
}

/// Per-key usage counters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeyUsage {
    pub requests: u64,
    #[serde(default)]
    pub last_used: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_status_deserializes_full_payload() {
        let status: SessionStatus = serde_json::from_value(json!({
            "session_id": "abc",
            "status": "Processing",
            "activity": "Researching",
            "confidence": 0.4,
            "complete": false,
            "plan_steps": ["search", "summarize"],
            "current_step": 1,
            "step_results": [
                { "step": 0, "result": "found 3 papers", "timestamp": "2025-01-01T10:00:00Z" }
            ]
        }))
        .unwrap();

        assert_eq!(status.status, RemoteStatus::Processing);
        assert_eq!(status.plan_steps.len(), 2);
        assert_eq!(status.step_results[0].result, "found 3 papers");
        assert!(!status.reports_completion());
    }

    #[test]
    fn test_status_tolerates_missing_optional_fields() {
        let status: SessionStatus = serde_json::from_value(json!({
            "session_id": "abc",
            "status": "Starting"
        }))
        .unwrap();

        assert!(status.plan_steps.is_empty());
        assert!(status.step_results.is_empty());
        assert_eq!(status.current_step, 0);
    }

    #[test]
    fn test_completion_from_flag_or_status() {
        let mut status: SessionStatus = serde_json::from_value(json!({
            "session_id": "abc",
            "status": "Processing",
            "complete": true
        }))
        .unwrap();
        assert!(status.reports_completion());

        status.complete = false;
        status.status = RemoteStatus::Complete;
        assert!(status.reports_completion());
    }

    #[test]
    fn test_key_status_with_null_last_used() {
        let keys: KeyStatus = serde_json::from_value(json!({
            "total_keys": 2,
            "available_keys": 1,
            "exhausted_keys": 1,
            "request_counts": {
                "key_1": { "requests": 12, "last_used": "2025-01-01T10:00:00" },
                "key_2": { "requests": 0, "last_used": null }
            }
        }))
        .unwrap();

        assert_eq!(keys.request_counts["key_1"].requests, 12);
        assert!(keys.request_counts["key_2"].last_used.is_none());
    }
}
