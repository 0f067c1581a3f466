use crate::client::N8nClient;
use crate::config::ProviderConfig;
use crate::mirror::ResourceMirror;
use crate::schema::{self, Schema};
use crate::state::WorkflowListState;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;

pub const PROVIDER_TYPE_NAME: &str = "n8n";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub severity: Severity,
    pub summary: String,
    pub detail: String,
}

impl Diagnostic {
    pub fn error(summary: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            summary: summary.into(),
            detail: detail.into(),
        }
    }

    pub fn warning(summary: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            ..Self::error(summary, detail)
        }
    }
}

/// Outcome of a data source read. A state may come with warnings; an error
/// diagnostic means there is no state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReadResponse {
    pub state: Option<Value>,
    pub diagnostics: Vec<Diagnostic>,
}

impl ReadResponse {
    fn ok(state: Value) -> Self {
        Self {
            state: Some(state),
            diagnostics: Vec::new(),
        }
    }

    fn with_warning(mut self, diagnostic: Diagnostic) -> Self {
        self.diagnostics.push(diagnostic);
        self
    }

    fn error(diagnostic: Diagnostic) -> Self {
        Self {
            state: None,
            diagnostics: vec![diagnostic],
        }
    }

    pub fn has_error(&self) -> bool {
        self.diagnostics.iter().any(|d| d.severity == Severity::Error)
    }
}

#[async_trait]
pub trait DataSource: Send + Sync {
    /// Fully qualified type name, e.g. `n8n_workflow`.
    fn type_name(&self) -> String;

    fn schema(&self) -> Schema;

    async fn read(&self, config: &Value) -> ReadResponse;
}

/// Holds the configured mirror and hands it to each data source.
pub struct Provider {
    mirror: Arc<ResourceMirror>,
}

impl Provider {
    pub fn new(mirror: Arc<ResourceMirror>) -> Self {
        Self { mirror }
    }

    pub fn configure(config: &ProviderConfig) -> Self {
        log::debug!("configuring provider with {:?}", config);
        let client = N8nClient::new(config);
        Self::new(Arc::new(ResourceMirror::new(
            Arc::new(client),
            config.scalar_policy(),
        )))
    }

    pub fn schema(&self) -> Schema {
        schema::provider_schema()
    }

    pub fn data_sources(&self) -> Vec<Box<dyn DataSource>> {
        vec![
            Box::new(WorkflowDataSource {
                mirror: self.mirror.clone(),
            }),
            Box::new(WorkflowsDataSource {
                mirror: self.mirror.clone(),
            }),
        ]
    }

    pub fn data_source(&self, type_name: &str) -> Option<Box<dyn DataSource>> {
        self.data_sources()
            .into_iter()
            .find(|ds| ds.type_name() == type_name)
    }
}

pub struct WorkflowDataSource {
    mirror: Arc<ResourceMirror>,
}

#[async_trait]
impl DataSource for WorkflowDataSource {
    fn type_name(&self) -> String {
        format!("{}_workflow", PROVIDER_TYPE_NAME)
    }

    fn schema(&self) -> Schema {
        schema::workflow_data_source_schema()
    }

    async fn read(&self, config: &Value) -> ReadResponse {
        let id = match config.get("id").and_then(Value::as_str) {
            Some(id) if !id.trim().is_empty() => id,
            _ => {
                return ReadResponse::error(Diagnostic::error(
                    "Missing Workflow ID",
                    "The \"id\" attribute must be set to a non-empty string.",
                ))
            }
        };

        let state = match self.mirror.fetch_one(id).await {
            Ok(state) => state,
            Err(e) => {
                return ReadResponse::error(Diagnostic::error(
                    "Unable to Read n8n Workflow",
                    e.to_string(),
                ))
            }
        };

        match serde_json::to_value(&state) {
            Ok(value) => ReadResponse::ok(value),
            Err(e) => ReadResponse::error(Diagnostic::error(
                "Unable to Encode n8n Workflow State",
                e.to_string(),
            )),
        }
    }
}

pub struct WorkflowsDataSource {
    mirror: Arc<ResourceMirror>,
}

#[async_trait]
impl DataSource for WorkflowsDataSource {
    fn type_name(&self) -> String {
        format!("{}_workflows", PROVIDER_TYPE_NAME)
    }

    fn schema(&self) -> Schema {
        schema::workflows_data_source_schema()
    }

    async fn read(&self, _config: &Value) -> ReadResponse {
        let page = match self.mirror.fetch_all().await {
            Ok(page) => page,
            Err(e) => {
                return ReadResponse::error(Diagnostic::error(
                    "Unable to Read n8n Workflows",
                    e.to_string(),
                ))
            }
        };

        let count = page.workflows.len();
        let response = match serde_json::to_value(WorkflowListState {
            data: page.workflows,
        }) {
            Ok(value) => ReadResponse::ok(value),
            Err(e) => ReadResponse::error(Diagnostic::error(
                "Unable to Encode n8n Workflows State",
                e.to_string(),
            )),
        };

        match page.next_cursor {
            Some(cursor) if !response.has_error() => {
                response.with_warning(Diagnostic::warning(
                    "Incomplete n8n Workflow List",
                    format!(
                        "Read the first {} workflows only; the instance has more (nextCursor {}).",
                        count, cursor
                    ),
                ))
            }
            _ => response,
        }
    }
}
