//! Research agent client against a mock HTTP server

use folio_client::{ClientError, ResearchAgentClient};
use folio_core::domain::session::RemoteStatus;
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> ResearchAgentClient {
    ResearchAgentClient::new(format!("{}/api", server.uri()))
}

#[tokio::test]
async fn test_start_chat_posts_query() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .and(header("content-type", "application/json"))
        .and(body_json(json!({ "query": "Summarize AI news" })))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "session_id": "abc", "status": "Starting" })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let started = client.start_chat("Summarize AI news").await.unwrap();

    assert_eq!(started.session_id, "abc");
    assert_eq!(started.status, "Starting");
}

#[tokio::test]
async fn test_get_status_sends_json_content_type() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/status/abc"))
        .and(header("content-type", "application/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "session_id": "abc",
            "status": "Processing",
            "activity": "Researching",
            "confidence": 0.3,
            "complete": false,
            "plan_steps": ["search", "read", "write"],
            "current_step": 0,
            "step_results": []
        })))
        .mount(&server)
        .await;

    let status = client_for(&server).get_status("abc").await.unwrap();

    assert_eq!(status.status, RemoteStatus::Processing);
    assert_eq!(status.plan_steps.len(), 3);
    assert!(!status.reports_completion());
}

#[tokio::test]
async fn test_non_success_status_is_an_error_even_with_json_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .respond_with(
            ResponseTemplate::new(500)
                .set_body_json(json!({ "session_id": "abc", "status": "Starting" })),
        )
        .mount(&server)
        .await;

    let err = client_for(&server).start_chat("anything").await.unwrap_err();

    assert!(matches!(err, ClientError::ApiError { status: 500, .. }));
    assert!(err.is_server_error());
}

#[tokio::test]
async fn test_malformed_body_is_a_parse_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/result/abc"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let err = client_for(&server).get_result("abc").await.unwrap_err();
    assert!(matches!(err, ClientError::ParseError(_)));
}

#[tokio::test]
async fn test_terminal_artifact_endpoints() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/result/abc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "session_id": "abc", "response": "AI news digest", "complete": true
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/reflection/abc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "session_id": "abc", "reflection": "Sources were thin", "complete": true
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/execution/abc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "session_id": "abc", "execution_history": ["plan", "search"], "step_count": 2
        })))
        .mount(&server)
        .await;

    let client = client_for(&server);

    assert_eq!(client.get_result("abc").await.unwrap().response, "AI news digest");
    assert_eq!(
        client.get_reflection("abc").await.unwrap().reflection,
        "Sources were thin"
    );
    let execution = client.get_execution("abc").await.unwrap();
    assert_eq!(execution.execution_history, vec!["plan", "search"]);
    assert_eq!(execution.step_count, 2);
}

#[tokio::test]
async fn test_maintenance_endpoints() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/health"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "healthy", "agent_initialized": true, "active_sessions": 2
        })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/memory/clear"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "status": "cleared" })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/memory/summary"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "total_conversations": 4,
            "semantic_enabled": true,
            "embeddings_cached": 12,
            "memory_file_size": 2048,
            "latest_conversation": "2025-01-01T10:00:00",
            "confidence_trend": 0.8,
            "recent_topics": ["llms", "robotics"]
        })))
        .mount(&server)
        .await;

    let client = client_for(&server);

    let health = client.health_check().await.unwrap();
    assert_eq!(health.status, "healthy");
    assert_eq!(health.active_sessions, Some(2));
    assert!(health.timestamp.is_none());

    assert_eq!(client.clear_memory().await.unwrap().status, "cleared");

    let memory = client.get_memory_summary().await.unwrap();
    assert_eq!(memory.total_conversations, 4);
    assert_eq!(memory.recent_topics, vec!["llms", "robotics"]);
}

#[tokio::test]
async fn test_blank_session_id_is_rejected_locally() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let err = client_for(&server).get_status(" ").await.unwrap_err();

    assert!(matches!(err, ClientError::InvalidRequest(_)));
    assert!(!err.is_transport());
    assert_eq!(err.status(), None);
}
