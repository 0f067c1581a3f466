//! Workflow types as the n8n public REST API returns them.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct Workflow {
    pub id: Option<String>,
    pub name: String,
    pub active: Option<bool>,
    #[serde(default)]
    pub nodes: Vec<Node>,
    pub connections: Option<Map<String, Value>>,
    #[serde(default)]
    pub settings: Settings,
    pub static_data: Option<Value>,
    pub tags: Option<Vec<Tag>>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    pub id: Option<String>,
    pub name: Option<String>,
    pub webhook_id: Option<String>,
    pub disabled: Option<bool>,
    pub notes_in_flow: Option<bool>,
    pub notes: Option<String>,
    #[serde(rename = "type")]
    pub node_type: Option<String>,
    pub type_version: Option<f64>,
    pub execute_once: Option<bool>,
    pub always_output_data: Option<bool>,
    pub retry_on_fail: Option<bool>,
    pub max_tries: Option<f64>,
    pub wait_between_tries: Option<f64>,
    pub continue_on_fail: Option<bool>,
    pub on_error: Option<String>,
    /// Kept as raw JSON so a malformed element surfaces as a conversion
    /// error naming the node instead of failing the whole response decode.
    pub position: Option<Vec<Value>>,
    pub parameters: Option<Map<String, Value>>,
    pub credentials: Option<Map<String, Value>>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    pub save_execution_progress: Option<bool>,
    pub save_manual_executions: Option<bool>,
    pub save_data_error_execution: Option<String>,
    pub save_data_success_execution: Option<String>,
    /// Seconds.
    pub execution_timeout: Option<f64>,
    pub error_workflow: Option<String>,
    pub timezone: Option<String>,
    pub execution_order: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct Tag {
    pub id: Option<String>,
    pub name: String,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

/// Body of `GET /workflows`.
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowList {
    #[serde(default)]
    pub data: Vec<Workflow>,
    pub next_cursor: Option<String>,
}

/// Error body returned by the API on non-2xx responses.
#[derive(Debug, Deserialize)]
pub struct ApiErrorBody {
    pub message: String,
}
