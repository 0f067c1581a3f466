//! Shared fixtures: sample n8n payloads and an in-process fake n8n API.
#![allow(dead_code)]

use axum::{
    extract::{Json, Path, State},
    http::{HeaderMap, StatusCode},
    routing::get,
    Router,
};
use n8n_mirror::schema::{Attribute, AttributeType};
use serde_json::{json, Value};
use std::net::SocketAddr;
use std::sync::Arc;

pub const API_KEY: &str = "test-key";

/// Two workflows as `GET /api/v1/workflows` returns them.
pub fn sample_workflows() -> Vec<Value> {
    vec![
        json!({
            "id": "wf1",
            "name": "Demo",
            "active": true,
            "nodes": [
                {
                    "id": "n1",
                    "name": "Start",
                    "type": "n8n-nodes-base.manualTrigger",
                    "typeVersion": 1,
                    "position": [100, 200],
                    "parameters": {"mode": "manual"}
                },
                {
                    "id": "n2",
                    "name": "Fetch",
                    "type": "n8n-nodes-base.httpRequest",
                    "typeVersion": 4.2,
                    "position": [320, 200],
                    "parameters": {"url": "https://example.com/api", "method": "GET"},
                    "credentials": {"httpHeaderAuth": "cred-7"}
                }
            ],
            "connections": {
                "Start": {"main": [[{"node": "Fetch", "type": "main", "index": 0}]]}
            },
            "settings": {"executionOrder": "v1", "timezone": "UTC"},
            "staticData": null,
            "tags": [{"id": "t1", "name": "prod", "createdAt": "2024-01-01T00:00:00.000Z", "updatedAt": "2024-01-01T00:00:00.000Z"}],
            "createdAt": "2024-01-01T00:00:00.000Z",
            "updatedAt": "2024-03-01T12:00:00.000Z"
        }),
        json!({
            "id": "wf2",
            "name": "Nightly report",
            "active": false,
            "nodes": [
                {"id": "n1", "name": "Schedule", "type": "n8n-nodes-base.scheduleTrigger", "position": [0, 0]}
            ],
            "connections": {},
            "settings": {},
            "createdAt": "2024-02-01T00:00:00.000Z",
            "updatedAt": "2024-02-01T00:00:00.000Z"
        }),
    ]
}

#[derive(Clone)]
struct FakeN8n {
    workflows: Arc<Vec<Value>>,
    next_cursor: Option<String>,
}

/// Starts a fake n8n API on an ephemeral port and returns its base URL.
pub async fn spawn_fake_n8n(workflows: Vec<Value>) -> String {
    spawn_fake_n8n_with_cursor(workflows, None).await
}

/// Like [`spawn_fake_n8n`], but the list endpoint reports `next_cursor`.
pub async fn spawn_fake_n8n_with_cursor(workflows: Vec<Value>, next_cursor: Option<&str>) -> String {
    let state = FakeN8n {
        workflows: Arc::new(workflows),
        next_cursor: next_cursor.map(str::to_string),
    };
    let app = Router::new()
        .route("/api/v1/workflows", get(list_workflows))
        .route("/api/v1/workflows/{id}", get(get_workflow))
        .with_state(state);

    serve(app).await
}

/// Serves `app` on an ephemeral port and returns its base URL.
pub async fn serve(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind test listener");
    let addr: SocketAddr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("test server");
    });
    format!("http://{}", addr)
}

fn authorized(headers: &HeaderMap) -> bool {
    headers
        .get("x-n8n-api-key")
        .and_then(|v| v.to_str().ok())
        .map(|v| v == API_KEY)
        .unwrap_or(false)
}

fn unauthorized() -> (StatusCode, Json<Value>) {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({"message": "X-N8N-API-KEY header required"})),
    )
}

async fn list_workflows(
    State(state): State<FakeN8n>,
    headers: HeaderMap,
) -> (StatusCode, Json<Value>) {
    if !authorized(&headers) {
        return unauthorized();
    }
    (
        StatusCode::OK,
        Json(json!({"data": state.workflows.as_slice(), "nextCursor": state.next_cursor})),
    )
}

async fn get_workflow(
    State(state): State<FakeN8n>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> (StatusCode, Json<Value>) {
    if !authorized(&headers) {
        return unauthorized();
    }
    match state.workflows.iter().find(|w| w["id"] == id.as_str()) {
        Some(workflow) => (StatusCode::OK, Json(workflow.clone())),
        None => (StatusCode::NOT_FOUND, Json(json!({"message": "Not Found"}))),
    }
}

/// Asserts that a serialized state object carries exactly the schema's
/// attributes, recursing into nested objects and lists of objects.
pub fn assert_matches_schema(attributes: &[Attribute], value: &Value) {
    let object = value.as_object().expect("state should be an object");

    let mut expected: Vec<&str> = attributes.iter().map(|a| a.name.as_str()).collect();
    expected.sort();
    let mut actual: Vec<&str> = object.keys().map(String::as_str).collect();
    actual.sort();
    assert_eq!(actual, expected);

    for attr in attributes {
        match &attr.kind {
            AttributeType::SingleNested { attributes } => {
                assert_matches_schema(attributes, &object[&attr.name]);
            }
            AttributeType::ListNested { attributes } => {
                if let Some(items) = object[&attr.name].as_array() {
                    for item in items {
                        assert_matches_schema(attributes, item);
                    }
                }
            }
            _ => {}
        }
    }
}
