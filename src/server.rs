use axum::{
    extract::{Json, Path, State},
    http::StatusCode,
    routing::{get, post},
    Router,
};
use serde_json::Value;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::provider::{Diagnostic, Provider, ReadResponse};

pub fn router(provider: Arc<Provider>) -> Router {
    Router::new()
        .route("/health", get(handle_health))
        .route("/schema", get(handle_schema))
        .route("/data-sources/{type_name}/read", post(handle_read))
        .layer(TraceLayer::new_for_http())
        .with_state(provider)
}

pub async fn run_server(provider: Arc<Provider>, port: u16) -> anyhow::Result<()> {
    let app = router(provider);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    log::info!("Serving n8n data sources on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

async fn handle_health() -> Json<Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

async fn handle_schema(State(provider): State<Arc<Provider>>) -> Json<Value> {
    let data_sources: serde_json::Map<String, Value> = provider
        .data_sources()
        .iter()
        .map(|ds| (ds.type_name(), serde_json::json!(ds.schema())))
        .collect();

    Json(serde_json::json!({
        "provider": provider.schema(),
        "data_sources": data_sources,
    }))
}

async fn handle_read(
    State(provider): State<Arc<Provider>>,
    Path(type_name): Path<String>,
    Json(config): Json<Value>,
) -> (StatusCode, Json<ReadResponse>) {
    log::info!("Received read request for data source: {}", type_name);

    let Some(data_source) = provider.data_source(&type_name) else {
        return (
            StatusCode::NOT_FOUND,
            Json(ReadResponse {
                state: None,
                diagnostics: vec![Diagnostic::error(
                    "Unknown Data Source",
                    format!("No data source named \"{}\"", type_name),
                )],
            }),
        );
    };

    let response = data_source.read(&config).await;
    if response.has_error() {
        log::debug!("Read of {} finished with errors", type_name);
    }
    (StatusCode::OK, Json(response))
}
