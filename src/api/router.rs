use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use super::admin;
use super::chat;
use super::health;
use super::state::AppState;
use super::workflows;

/// Create a minimal router without state
/// Note: /ready endpoint is not available without state
pub fn create_router() -> Router {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/live", get(health::live_check))
        .layer(TraceLayer::new_for_http())
}

/// Create the full router with application state
pub fn create_router_with_state(state: AppState) -> Router {
    let api = Router::new()
        .route("/workflows", get(workflows::list_public_workflows))
        .route("/chat", post(chat::chat))
        .route("/chat/stream", post(chat::chat_stream))
        .nest("/admin", admin::create_admin_router());

    Router::new()
        .route("/health", get(health::health_check))
        .route("/ready", get(health::ready_check))
        .route("/live", get(health::live_check))
        .nest("/api", api)
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request, StatusCode};
    use serde_json::{json, Value};
    use tower::ServiceExt;
    use wiremock::matchers::{body_partial_json, header as header_matcher, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use crate::domain::{ParserConfig, RelayConfig, StreamEvent, WorkflowConfig};
    use crate::infrastructure::call_log::InMemoryCallRecorder;
    use crate::infrastructure::http::HttpWorkflowInvoker;
    use crate::infrastructure::workflow::InMemoryWorkflowRepository;

    const ARTICLE: &str = "A workflow relay turns one slow answer into a steady stream of text.";

    fn state(workflows: Vec<WorkflowConfig>) -> (AppState, Arc<InMemoryCallRecorder>) {
        let recorder = Arc::new(InMemoryCallRecorder::default());
        let state = AppState::new(
            Arc::new(InMemoryWorkflowRepository::with_workflows(workflows)),
            Arc::new(HttpWorkflowInvoker::new()),
            recorder.clone(),
            RelayConfig {
                chunk_size: 20,
                chunk_delay_ms: 0,
            },
            ParserConfig::default(),
        );
        (state, recorder)
    }

    fn workflow_for(server: &MockServer) -> WorkflowConfig {
        let template = json!({"parameters": {"topic": ""}, "workflow_id": "42"});
        WorkflowConfig::new("Blog", format!("{}/run", server.uri()), "abc123")
            .unwrap()
            .with_template(template.as_object().unwrap(), "parameters.topic")
    }

    async fn mount_article(server: &MockServer) {
        Mock::given(method("POST"))
            .and(path("/run"))
            .and(header_matcher("authorization", "Bearer abc123"))
            .and(body_partial_json(json!({"parameters": {"topic": "Rust"}})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "article_title": "Relays",
                "generated_article": ARTICLE,
                "cover_image_url": "https://img.example/cover.png",
                "illustration_urls": ["https://img.example/1.png"]
            })))
            .mount(server)
            .await;
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    async fn body_json(response: axum::response::Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    async fn body_text(response: axum::response::Response) -> String {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    fn data_lines(body: &str) -> Vec<String> {
        body.lines()
            .filter_map(|line| line.strip_prefix("data: "))
            .map(str::to_string)
            .collect()
    }

    #[tokio::test]
    async fn test_health_endpoints() {
        let app = create_router();

        let response = app.clone().oneshot(get("/health")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let response = app.oneshot(get("/live")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_chat_returns_normalized_result() {
        let server = MockServer::start().await;
        mount_article(&server).await;
        let (state, recorder) = state(vec![workflow_for(&server)]);

        let response = create_router_with_state(state)
            .oneshot(post_json("/api/chat", json!({"message": "Rust"})))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            body_json(response).await,
            json!({
                "success": true,
                "data": {
                    "title": "Relays",
                    "content": ARTICLE,
                    "images": ["https://img.example/cover.png", "https://img.example/1.png"],
                    "imagePositions": []
                }
            })
        );
        assert_eq!(recorder.wait_for_entries(1).await.len(), 1);
    }

    #[tokio::test]
    async fn test_chat_requires_message() {
        let (state, _) = state(Vec::new());

        let response = create_router_with_state(state)
            .oneshot(post_json("/api/chat", json!({"message": ""})))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await, json!({"error": "Message is required"}));
    }

    #[tokio::test]
    async fn test_chat_without_workflow_is_503() {
        let (state, _) = state(Vec::new());

        let response = create_router_with_state(state)
            .oneshot(post_json("/api/chat", json!({"message": "Rust"})))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(
            body_json(response).await["error"],
            crate::domain::error::SERVICE_NOT_CONFIGURED
        );
    }

    #[tokio::test]
    async fn test_chat_upstream_error_status_is_forwarded() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500).set_body_string("stack trace"))
            .mount(&server)
            .await;
        let (state, recorder) = state(vec![workflow_for(&server)]);

        let response = create_router_with_state(state)
            .oneshot(post_json("/api/chat", json!({"message": "Rust"})))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body_json(response).await, json!({"error": "Workflow API error: 500"}));

        let entries = recorder.wait_for_entries(1).await;
        assert!(!entries[0].success);
    }

    #[tokio::test]
    async fn test_stream_emits_wire_protocol() {
        let server = MockServer::start().await;
        mount_article(&server).await;
        let (state, _) = state(vec![workflow_for(&server)]);

        let response = create_router_with_state(state)
            .oneshot(post_json("/api/chat/stream", json!({"message": "Rust"})))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get(header::CONTENT_TYPE).unwrap(),
            "text/event-stream"
        );
        assert_eq!(response.headers().get(header::CACHE_CONTROL).unwrap(), "no-cache");

        let body = body_text(response).await;
        let lines = data_lines(&body);

        assert_eq!(lines.first().map(String::as_str), Some(r#"{"type":"start"}"#));
        assert_eq!(lines.last().map(String::as_str), Some("[DONE]"));

        let events: Vec<Value> = lines[..lines.len() - 1]
            .iter()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect();

        let reassembled: String = events
            .iter()
            .filter(|event| event["type"] == "content")
            .map(|event| event["content"].as_str().unwrap().to_string())
            .collect();
        assert_eq!(reassembled, ARTICLE);

        let complete = events.last().unwrap();
        assert_eq!(complete["type"], "complete");
        assert_eq!(complete["title"], "Relays");
        assert_eq!(complete["content"], ARTICLE);
        assert_eq!(complete["images"].as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_stream_and_chat_agree() {
        let server = MockServer::start().await;
        mount_article(&server).await;
        let (state, _) = state(vec![workflow_for(&server)]);
        let app = create_router_with_state(state);

        let single = body_json(
            app.clone()
                .oneshot(post_json("/api/chat", json!({"message": "Rust"})))
                .await
                .unwrap(),
        )
        .await;

        let body = body_text(
            app.oneshot(post_json("/api/chat/stream", json!({"message": "Rust"})))
                .await
                .unwrap(),
        )
        .await;
        let lines = data_lines(&body);
        let complete: Value = serde_json::from_str(&lines[lines.len() - 2]).unwrap();

        for key in ["title", "content", "images"] {
            assert_eq!(single["data"][key], complete[key]);
        }
    }

    #[tokio::test]
    async fn test_stream_error_frames() {
        let (state, _) = state(Vec::new());

        let response = create_router_with_state(state)
            .oneshot(post_json("/api/chat/stream", json!({"message": "Rust"})))
            .await
            .unwrap();

        let body = body_text(response).await;
        let expected: String = [
            StreamEvent::Start,
            StreamEvent::error(crate::domain::error::SERVICE_NOT_CONFIGURED),
            StreamEvent::Done,
        ]
        .iter()
        .map(StreamEvent::to_frame)
        .collect();
        assert_eq!(body, expected);
    }

    #[tokio::test]
    async fn test_public_workflows_hide_secrets() {
        let server = MockServer::start().await;
        let (state, _) = state(vec![workflow_for(&server).with_default(true)]);

        let response = create_router_with_state(state)
            .oneshot(get("/api/workflows"))
            .await
            .unwrap();

        let body = body_json(response).await;
        let workflow = &body["workflows"][0];
        assert_eq!(workflow["name"], "Blog");
        assert_eq!(workflow["isDefault"], true);
        assert!(workflow.get("token").is_none());
        assert!(workflow.get("endpoint").is_none());
    }

    #[tokio::test]
    async fn test_admin_parse() {
        let (state, _) = state(Vec::new());
        let command = "curl --location 'https://x.example/run' --header 'Authorization: Bearer abc123' --data '{\"topic\":\"\"}'";

        let response = create_router_with_state(state)
            .oneshot(post_json("/api/admin/workflows/parse", json!({"command": command})))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            body_json(response).await,
            json!({
                "success": true,
                "result": {
                    "bodyTemplate": {"topic": ""},
                    "inputField": "topic",
                    "endpoint": "https://x.example/run",
                    "token": "abc123"
                }
            })
        );
    }

    #[tokio::test]
    async fn test_admin_parse_failure_is_422() {
        let (state, _) = state(Vec::new());

        let response = create_router_with_state(state)
            .oneshot(post_json(
                "/api/admin/workflows/parse",
                json!({"command": "this is not a command"}),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(
            body_json(response).await,
            json!({"error": "Could not parse the command, check its format"})
        );
    }

    #[tokio::test]
    async fn test_admin_import_then_chat() {
        let server = MockServer::start().await;
        mount_article(&server).await;
        let (state, _) = state(Vec::new());
        let app = create_router_with_state(state);

        let command = format!(
            "curl -X POST '{}/run' \\\n  -H 'Authorization: Bearer abc123' \\\n  -d '{{\"parameters\":{{\"topic\":\"\"}}}}'",
            server.uri()
        );

        let response = app
            .clone()
            .oneshot(post_json(
                "/api/admin/workflows/import",
                json!({"name": "Imported", "command": command}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        let imported = body_json(response).await;
        assert_eq!(imported["workflow"]["inputField"], "parameters.topic");
        assert_eq!(imported["workflow"]["isDefault"], true);

        let response = app
            .oneshot(post_json("/api/chat", json!({"message": "Rust"})))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["data"]["title"], "Relays");
    }

    #[tokio::test]
    async fn test_admin_import_unparseable_writes_nothing() {
        let (state, _) = state(Vec::new());
        let app = create_router_with_state(state);

        let response = app
            .clone()
            .oneshot(post_json(
                "/api/admin/workflows/import",
                json!({"name": "Broken", "command": "curl https://x.example/run -d 'nope'"}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let listed = body_json(app.oneshot(get("/api/admin/workflows")).await.unwrap()).await;
        assert_eq!(listed["workflows"], json!([]));
    }

    #[tokio::test]
    async fn test_admin_get_unknown_workflow() {
        let (state, _) = state(Vec::new());

        let response = create_router_with_state(state)
            .oneshot(get("/api/admin/workflows/wf-missing"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_admin_stats() {
        let server = MockServer::start().await;
        mount_article(&server).await;
        let (state, recorder) = state(vec![workflow_for(&server)]);
        let app = create_router_with_state(state);

        app.clone()
            .oneshot(post_json("/api/chat", json!({"message": "Rust"})))
            .await
            .unwrap();
        recorder.wait_for_entries(1).await;

        let stats = body_json(app.oneshot(get("/api/admin/stats")).await.unwrap()).await;
        assert_eq!(stats["today"]["totalCalls"], 1);
        assert_eq!(stats["today"]["successRate"], 100);
        assert_eq!(stats["recent"][0]["type"], "workflow");
        assert_eq!(stats["recent"][0]["action"], "workflow-generate");
    }

    fn send_json(method: &str, uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn delete(uri: &str) -> Request<Body> {
        Request::builder()
            .method("DELETE")
            .uri(uri)
            .body(Body::empty())
            .unwrap()
    }

    #[tokio::test]
    async fn test_stream_rejected_body_is_error_event() {
        let (state, _) = state(Vec::new());

        let request = Request::builder()
            .method("POST")
            .uri("/api/chat/stream")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{\"message\": "))
            .unwrap();
        let response = create_router_with_state(state).oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get(header::CONTENT_TYPE).unwrap(),
            "text/event-stream"
        );

        let lines = data_lines(&body_text(response).await);
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], r#"{"type":"start"}"#);
        let error: Value = serde_json::from_str(&lines[1]).unwrap();
        assert_eq!(error["type"], "error");
        assert!(error["error"].as_str().unwrap().starts_with("Invalid JSON"));
        assert_eq!(lines[2], "[DONE]");
    }

    #[tokio::test]
    async fn test_admin_manual_create_update_and_chat() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/run"))
            .and(body_partial_json(json!({"input": {"query": "Rust"}})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"title": "Fixed"})))
            .mount(&server)
            .await;
        let (state, _) = state(Vec::new());
        let app = create_router_with_state(state);

        let response = app
            .clone()
            .oneshot(post_json(
                "/api/admin/workflows",
                json!({
                    "name": "Search",
                    "endpoint": format!("{}/run", server.uri()),
                    "token": "abc123",
                    "paramTemplate": "{\"input\":{\"query\":\"\"},\"lang\":\"en\"}",
                    "inputField": "lang"
                }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        let created = body_json(response).await;
        let id = created["workflow"]["id"].as_str().unwrap().to_string();
        assert_eq!(created["workflow"]["isDefault"], true);

        let response = app
            .clone()
            .oneshot(send_json(
                "PUT",
                &format!("/api/admin/workflows/{id}"),
                json!({"inputField": "input.query"}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let updated = body_json(response).await;
        assert_eq!(updated["workflow"]["inputField"], "input.query");
        assert_eq!(updated["workflow"]["name"], "Search");

        let response = app
            .oneshot(post_json("/api/chat", json!({"message": "Rust"})))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["data"]["title"], "Fixed");
    }

    #[tokio::test]
    async fn test_admin_manual_create_requires_fields() {
        let (state, _) = state(Vec::new());

        let response = create_router_with_state(state)
            .oneshot(post_json("/api/admin/workflows", json!({"name": "Search"})))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            body_json(response).await,
            json!({"error": "Name, endpoint, and token are required"})
        );
    }

    #[tokio::test]
    async fn test_admin_set_default_and_delete() {
        let first = WorkflowConfig::new("first", "https://x.example/a", "t").unwrap();
        let second = WorkflowConfig::new("second", "https://x.example/b", "t").unwrap();
        let (first_id, second_id) = (
            first.id().as_str().to_string(),
            second.id().as_str().to_string(),
        );
        let (state, _) = state(vec![first.with_default(true), second]);
        let app = create_router_with_state(state);

        let response = app
            .clone()
            .oneshot(post_json(
                &format!("/api/admin/workflows/{second_id}/default"),
                json!({}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let public = body_json(app.clone().oneshot(get("/api/workflows")).await.unwrap()).await;
        assert_eq!(public["workflows"][0]["isDefault"], false);
        assert_eq!(public["workflows"][1]["isDefault"], true);

        let response = app
            .clone()
            .oneshot(delete(&format!("/api/admin/workflows/{second_id}")))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["deleted"], true);

        let public = body_json(app.clone().oneshot(get("/api/workflows")).await.unwrap()).await;
        assert_eq!(public["workflows"].as_array().unwrap().len(), 1);
        assert_eq!(public["workflows"][0]["id"], first_id.as_str());
        assert_eq!(public["workflows"][0]["isDefault"], true);

        let response = app
            .oneshot(delete(&format!("/api/admin/workflows/{second_id}")))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_admin_update_unknown_workflow() {
        let (state, _) = state(Vec::new());

        let response = create_router_with_state(state)
            .oneshot(send_json(
                "PUT",
                "/api/admin/workflows/wf-missing",
                json!({"name": "x"}),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
