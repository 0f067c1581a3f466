//! The typed state handed back to the host.
//!
//! `None` serializes as `null`, which the host reads as "known absent". Fields
//! are never skipped so the serialized object always carries every attribute
//! of the schema.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkflowState {
    pub id: Option<String>,
    pub name: String,
    pub active: Option<bool>,
    pub nodes: Vec<NodeState>,
    /// Node name to the JSON text of its outputs.
    pub connections: Option<BTreeMap<String, String>>,
    pub settings: SettingsState,
    pub static_data: Option<String>,
    pub tags: Option<Vec<TagState>>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeState {
    pub id: Option<String>,
    pub name: String,
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
    pub position: Option<Vec<f64>>,
    pub parameters: Option<BTreeMap<String, String>>,
    pub credentials: Option<BTreeMap<String, String>>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SettingsState {
    pub save_execution_progress: Option<bool>,
    pub save_manual_executions: Option<bool>,
    pub save_data_error_execution: Option<String>,
    pub save_data_success_execution: Option<String>,
    /// Whole seconds. Declared as an integer attribute, unlike the node's
    /// float-valued numbers, so fractional or oversized values fail conversion.
    pub execution_timeout: Option<i64>,
    pub error_workflow: Option<String>,
    pub timezone: Option<String>,
    pub execution_order: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TagState {
    pub id: Option<String>,
    pub name: String,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

/// State of the `n8n_workflows` data source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkflowListState {
    pub data: Vec<WorkflowState>,
}
