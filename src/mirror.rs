use crate::client::WorkflowSource;
use crate::error::{ConversionError, MirrorError};
use crate::model::{Node, Settings, Tag, Workflow};
use crate::state::{NodeState, SettingsState, TagState, WorkflowState};
use crate::value::{convert_scalar_map, json_kind, ScalarPolicy};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Result of [`ResourceMirror::fetch_all`]. `next_cursor` is set when the
/// instance holds more workflows than the first page carried.
#[derive(Debug, Clone, PartialEq)]
pub struct WorkflowPage {
    pub workflows: Vec<WorkflowState>,
    pub next_cursor: Option<String>,
}

/// Fetches workflows from a [`WorkflowSource`] and converts them into state.
///
/// Every call performs exactly one request and returns either a fully
/// converted result or an error, never a partial one.
pub struct ResourceMirror {
    source: Arc<dyn WorkflowSource>,
    policy: ScalarPolicy,
}

impl ResourceMirror {
    pub fn new(source: Arc<dyn WorkflowSource>, policy: ScalarPolicy) -> Self {
        Self { source, policy }
    }

    pub async fn fetch_one(&self, id: &str) -> Result<WorkflowState, MirrorError> {
        let workflow = self
            .source
            .get_workflow(id)
            .await
            .map_err(|source| MirrorError::Fetch {
                context: "failed to get workflow",
                source,
            })?;
        log::debug!(
            "received workflow {} with {} nodes",
            id,
            workflow.nodes.len()
        );

        Ok(self.convert(&workflow)?)
    }

    pub async fn fetch_all(&self) -> Result<WorkflowPage, MirrorError> {
        let list = self
            .source
            .get_workflows()
            .await
            .map_err(|source| MirrorError::Fetch {
                context: "failed to list workflows",
                source,
            })?;
        log::debug!("received {} workflows", list.data.len());

        let workflows = list
            .data
            .iter()
            .enumerate()
            .map(|(index, workflow)| {
                self.convert(workflow)
                    .map_err(|source| MirrorError::ConvertItem {
                        index,
                        id: workflow.id.clone().unwrap_or_else(|| "<none>".to_string()),
                        source,
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(WorkflowPage {
            workflows,
            next_cursor: list.next_cursor,
        })
    }

    pub fn convert(&self, workflow: &Workflow) -> Result<WorkflowState, ConversionError> {
        if workflow.name.is_empty() {
            return Err(ConversionError::MissingField {
                field: "name".to_string(),
            });
        }

        let nodes = workflow
            .nodes
            .iter()
            .enumerate()
            .map(|(index, node)| self.convert_node(index, node))
            .collect::<Result<Vec<_>, _>>()?;

        let tags = workflow
            .tags
            .as_ref()
            .map(|tags| {
                tags.iter()
                    .enumerate()
                    .map(|(index, tag)| convert_tag(index, tag))
                    .collect::<Result<Vec<_>, _>>()
            })
            .transpose()?;

        Ok(WorkflowState {
            id: workflow.id.clone(),
            name: workflow.name.clone(),
            active: workflow.active,
            nodes,
            connections: convert_connections(workflow.connections.as_ref())?,
            settings: convert_settings(&workflow.settings)?,
            static_data: encode_static_data(workflow.static_data.as_ref())?,
            tags,
            created_at: workflow.created_at.clone(),
            updated_at: workflow.updated_at.clone(),
        })
    }

    fn convert_node(&self, index: usize, node: &Node) -> Result<NodeState, ConversionError> {
        let name = match node.name.as_deref() {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => {
                return Err(ConversionError::MissingField {
                    field: format!("nodes[{}].name", index),
                })
            }
        };

        let position = convert_position(
            &format!("nodes[{}].position", index),
            node.position.as_deref(),
        )?;
        let parameters = convert_scalar_map(
            &format!("nodes[{}].parameters", index),
            node.parameters.as_ref(),
            self.policy,
        )?;
        let credentials = convert_scalar_map(
            &format!("nodes[{}].credentials", index),
            node.credentials.as_ref(),
            self.policy,
        )?;

        Ok(NodeState {
            id: node.id.clone(),
            name,
            webhook_id: node.webhook_id.clone(),
            disabled: node.disabled,
            notes_in_flow: node.notes_in_flow,
            notes: node.notes.clone(),
            node_type: node.node_type.clone(),
            type_version: node.type_version,
            execute_once: node.execute_once,
            always_output_data: node.always_output_data,
            retry_on_fail: node.retry_on_fail,
            max_tries: node.max_tries,
            wait_between_tries: node.wait_between_tries,
            continue_on_fail: node.continue_on_fail,
            on_error: node.on_error.clone(),
            position,
            parameters,
            credentials,
            created_at: node.created_at.clone(),
            updated_at: node.updated_at.clone(),
        })
    }
}

fn convert_position(
    field: &str,
    position: Option<&[Value]>,
) -> Result<Option<Vec<f64>>, ConversionError> {
    let Some(position) = position else {
        return Ok(None);
    };

    position
        .iter()
        .enumerate()
        .map(|(index, element)| {
            element.as_f64().ok_or_else(|| ConversionError::NonNumeric {
                field: field.to_string(),
                index,
                found: json_kind(element),
            })
        })
        .collect::<Result<Vec<_>, _>>()
        .map(Some)
}

/// Each entry maps a source node name to its outputs
/// (`{"main": [[{"node": ..., "type": ..., "index": ...}]]}`), carried as
/// compact JSON text.
fn convert_connections(
    connections: Option<&Map<String, Value>>,
) -> Result<Option<BTreeMap<String, String>>, ConversionError> {
    let Some(connections) = connections else {
        return Ok(None);
    };

    let mut output = BTreeMap::new();
    for (key, value) in connections {
        if !value.is_object() {
            return Err(ConversionError::InvalidConnection {
                field: "connections".to_string(),
                key: key.clone(),
                found: json_kind(value),
            });
        }
        let encoded = serde_json::to_string(value).map_err(|e| ConversionError::Encode {
            field: format!("connections.{}", key),
            message: e.to_string(),
        })?;
        output.insert(key.clone(), encoded);
    }

    Ok(Some(output))
}

fn convert_settings(settings: &Settings) -> Result<SettingsState, ConversionError> {
    let execution_timeout = settings
        .execution_timeout
        .map(|seconds| {
            if seconds.fract() != 0.0 || !seconds.is_finite() {
                Err(ConversionError::NotAnInteger {
                    field: "settings.execution_timeout".to_string(),
                    value: seconds,
                })
            } else if seconds < i64::MIN as f64 || seconds >= i64::MAX as f64 {
                Err(ConversionError::OutOfRange {
                    field: "settings.execution_timeout".to_string(),
                    value: seconds,
                })
            } else {
                Ok(seconds as i64)
            }
        })
        .transpose()?;

    Ok(SettingsState {
        save_execution_progress: settings.save_execution_progress,
        save_manual_executions: settings.save_manual_executions,
        save_data_error_execution: settings.save_data_error_execution.clone(),
        save_data_success_execution: settings.save_data_success_execution.clone(),
        execution_timeout,
        error_workflow: settings.error_workflow.clone(),
        timezone: settings.timezone.clone(),
        execution_order: settings.execution_order.clone(),
    })
}

fn convert_tag(index: usize, tag: &Tag) -> Result<TagState, ConversionError> {
    if tag.name.is_empty() {
        return Err(ConversionError::MissingField {
            field: format!("tags[{}].name", index),
        });
    }

    Ok(TagState {
        id: tag.id.clone(),
        name: tag.name.clone(),
        created_at: tag.created_at.clone(),
        updated_at: tag.updated_at.clone(),
    })
}

/// Strings pass through untouched; other values become their JSON text.
fn encode_static_data(static_data: Option<&Value>) -> Result<Option<String>, ConversionError> {
    match static_data {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(other) => serde_json::to_string(other)
            .map(Some)
            .map_err(|e| ConversionError::Encode {
                field: "static_data".to_string(),
                message: e.to_string(),
            }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ClientError;
    use crate::model::WorkflowList;
    use async_trait::async_trait;
    use serde_json::json;

    struct Unreachable;

    #[async_trait]
    impl WorkflowSource for Unreachable {
        async fn get_workflow(&self, _id: &str) -> Result<Workflow, ClientError> {
            unreachable!("conversion tests never fetch")
        }

        async fn get_workflows(&self) -> Result<WorkflowList, ClientError> {
            unreachable!("conversion tests never fetch")
        }
    }

    fn mirror(policy: ScalarPolicy) -> ResourceMirror {
        ResourceMirror::new(Arc::new(Unreachable), policy)
    }

    fn workflow(value: Value) -> Workflow {
        serde_json::from_value(value).expect("fixture should decode")
    }

    fn full_workflow() -> Workflow {
        workflow(json!({
            "id": "wf1",
            "name": "Demo",
            "active": true,
            "nodes": [
                {
                    "id": "n1",
                    "name": "Start",
                    "webhookId": "hook-1",
                    "disabled": false,
                    "notesInFlow": true,
                    "notes": "entry point",
                    "type": "n8n-nodes-base.manualTrigger",
                    "typeVersion": 1,
                    "executeOnce": false,
                    "alwaysOutputData": true,
                    "retryOnFail": true,
                    "maxTries": 3,
                    "waitBetweenTries": 1000,
                    "continueOnFail": false,
                    "onError": "stopWorkflow",
                    "position": [100, 200],
                    "parameters": {"mode": "manual"},
                    "credentials": {"httpBasicAuth": "cred-1"},
                    "createdAt": "2024-01-02T03:04:05.000Z",
                    "updatedAt": "2024-01-03T03:04:05.000Z"
                },
                {
                    "id": "n2",
                    "name": "Fetch",
                    "type": "n8n-nodes-base.httpRequest",
                    "typeVersion": 4.2,
                    "position": [300.5, 200]
                }
            ],
            "connections": {
                "Start": {"main": [[{"node": "Fetch", "type": "main", "index": 0}]]}
            },
            "settings": {
                "saveExecutionProgress": true,
                "saveManualExecutions": false,
                "saveDataErrorExecution": "all",
                "saveDataSuccessExecution": "none",
                "executionTimeout": 3600,
                "errorWorkflow": "wf-errors",
                "timezone": "Europe/Berlin",
                "executionOrder": "v1"
            },
            "staticData": {"lastId": 7},
            "tags": [
                {"id": "t1", "name": "prod", "createdAt": "2024-01-01", "updatedAt": "2024-01-02"},
                {"id": "t2", "name": "billing"}
            ],
            "createdAt": "2024-01-01T00:00:00.000Z",
            "updatedAt": "2024-02-01T00:00:00.000Z"
        }))
    }

    #[test]
    fn converts_example_workflow() {
        let wf = workflow(json!({
            "id": "wf1",
            "name": "Demo",
            "active": true,
            "nodes": [{"id": "n1", "name": "Start", "position": [100, 200], "parameters": {"mode": "manual"}}],
            "tags": [{"id": "t1", "name": "prod"}]
        }));

        let state = mirror(ScalarPolicy::Strict).convert(&wf).unwrap();
        assert_eq!(state.name, "Demo");
        assert_eq!(state.active, Some(true));
        assert_eq!(state.nodes[0].position, Some(vec![100.0, 200.0]));
        assert_eq!(
            state.nodes[0].parameters,
            Some(BTreeMap::from([("mode".to_string(), "manual".to_string())]))
        );
        assert_eq!(state.tags.as_ref().unwrap()[0].name, "prod");
    }

    #[test]
    fn every_present_field_is_carried_over() {
        let state = mirror(ScalarPolicy::Strict).convert(&full_workflow()).unwrap();

        assert_eq!(state.id.as_deref(), Some("wf1"));
        assert_eq!(state.created_at.as_deref(), Some("2024-01-01T00:00:00.000Z"));
        assert_eq!(state.updated_at.as_deref(), Some("2024-02-01T00:00:00.000Z"));

        let start = &state.nodes[0];
        assert_eq!(start.id.as_deref(), Some("n1"));
        assert_eq!(start.webhook_id.as_deref(), Some("hook-1"));
        assert_eq!(start.disabled, Some(false));
        assert_eq!(start.notes_in_flow, Some(true));
        assert_eq!(start.notes.as_deref(), Some("entry point"));
        assert_eq!(start.node_type.as_deref(), Some("n8n-nodes-base.manualTrigger"));
        assert_eq!(start.type_version, Some(1.0));
        assert_eq!(start.execute_once, Some(false));
        assert_eq!(start.always_output_data, Some(true));
        assert_eq!(start.retry_on_fail, Some(true));
        assert_eq!(start.max_tries, Some(3.0));
        assert_eq!(start.wait_between_tries, Some(1000.0));
        assert_eq!(start.continue_on_fail, Some(false));
        assert_eq!(start.on_error.as_deref(), Some("stopWorkflow"));
        assert_eq!(start.credentials.as_ref().unwrap()["httpBasicAuth"], "cred-1");
        assert_eq!(start.created_at.as_deref(), Some("2024-01-02T03:04:05.000Z"));

        assert_eq!(state.nodes[1].type_version, Some(4.2));
        assert_eq!(state.nodes[1].position, Some(vec![300.5, 200.0]));

        let connections = state.connections.as_ref().unwrap();
        let decoded: Value = serde_json::from_str(&connections["Start"]).unwrap();
        assert_eq!(decoded["main"][0][0]["node"], "Fetch");

        assert_eq!(
            state.settings,
            SettingsState {
                save_execution_progress: Some(true),
                save_manual_executions: Some(false),
                save_data_error_execution: Some("all".into()),
                save_data_success_execution: Some("none".into()),
                execution_timeout: Some(3600),
                error_workflow: Some("wf-errors".into()),
                timezone: Some("Europe/Berlin".into()),
                execution_order: Some("v1".into()),
            }
        );
        assert_eq!(state.static_data.as_deref(), Some(r#"{"lastId":7}"#));

        let tags = state.tags.as_ref().unwrap();
        assert_eq!(tags[0].created_at.as_deref(), Some("2024-01-01"));
        assert_eq!(tags[1].id.as_deref(), Some("t2"));
    }

    #[test]
    fn absent_fields_stay_absent() {
        let wf = workflow(json!({
            "name": "Sparse",
            "nodes": [{"name": "Only"}]
        }));

        let state = mirror(ScalarPolicy::Strict).convert(&wf).unwrap();
        assert_eq!(state.id, None);
        assert_eq!(state.active, None);
        assert_eq!(state.connections, None);
        assert_eq!(state.static_data, None);
        assert_eq!(state.tags, None);
        assert_eq!(state.settings, SettingsState::default());

        let node = &state.nodes[0];
        assert_eq!(node.disabled, None);
        assert_eq!(node.type_version, None);
        assert_eq!(node.position, None);
        assert_eq!(node.parameters, None);
        assert_eq!(node.credentials, None);

        let serialized = serde_json::to_value(&state).unwrap();
        assert_eq!(serialized["active"], Value::Null);
        assert_eq!(serialized["settings"]["timezone"], Value::Null);
        assert_eq!(serialized["nodes"][0]["disabled"], Value::Null);
    }

    #[test]
    fn nodes_and_tags_keep_source_order() {
        let names = ["Zeta", "Alpha", "Mid", "Beta"];
        let wf = workflow(json!({
            "name": "Ordered",
            "nodes": names.iter().map(|n| json!({"name": n})).collect::<Vec<_>>(),
            "tags": [{"name": "z"}, {"name": "a"}]
        }));

        let state = mirror(ScalarPolicy::Strict).convert(&wf).unwrap();
        let converted: Vec<&str> = state.nodes.iter().map(|n| n.name.as_str()).collect();
        assert_eq!(converted, names);
        let tags: Vec<&str> = state.tags.as_ref().unwrap().iter().map(|t| t.name.as_str()).collect();
        assert_eq!(tags, ["z", "a"]);
    }

    #[test]
    fn nested_parameter_fails_whole_conversion() {
        let wf = workflow(json!({
            "name": "Nested",
            "nodes": [
                {"name": "Ok", "parameters": {"mode": "manual"}},
                {"name": "Bad", "parameters": {"url": "https://example.com", "options": {"timeout": 5}}}
            ]
        }));

        let err = mirror(ScalarPolicy::Lenient).convert(&wf).unwrap_err();
        assert_eq!(
            err,
            ConversionError::NonScalar {
                field: "nodes[1].parameters".into(),
                key: "options".into(),
                found: "an object",
            }
        );
    }

    #[test]
    fn policy_decides_non_string_parameters() {
        let wf = workflow(json!({
            "name": "Numbers",
            "nodes": [{"name": "Wait", "parameters": {"amount": 5}}]
        }));

        let err = mirror(ScalarPolicy::Strict).convert(&wf).unwrap_err();
        assert!(matches!(err, ConversionError::TypeMismatch { ref key, .. } if key == "amount"));

        let state = mirror(ScalarPolicy::Lenient).convert(&wf).unwrap();
        assert_eq!(state.nodes[0].parameters.as_ref().unwrap()["amount"], "5");
    }

    #[test]
    fn non_numeric_position_fails() {
        let wf = workflow(json!({
            "name": "Pos",
            "nodes": [{"name": "A", "position": [10, "twenty"]}]
        }));

        let err = mirror(ScalarPolicy::Strict).convert(&wf).unwrap_err();
        assert_eq!(
            err,
            ConversionError::NonNumeric {
                field: "nodes[0].position".into(),
                index: 1,
                found: "a string",
            }
        );
    }

    #[test]
    fn connections_must_be_objects() {
        let wf = workflow(json!({
            "name": "Conn",
            "connections": {"Start": "Fetch"}
        }));

        let err = mirror(ScalarPolicy::Strict).convert(&wf).unwrap_err();
        assert!(matches!(err, ConversionError::InvalidConnection { ref key, found: "a string", .. } if key == "Start"));
    }

    #[test]
    fn missing_names_are_rejected() {
        let err = mirror(ScalarPolicy::Strict)
            .convert(&workflow(json!({"name": ""})))
            .unwrap_err();
        assert_eq!(err, ConversionError::MissingField { field: "name".into() });

        let err = mirror(ScalarPolicy::Strict)
            .convert(&workflow(json!({"name": "X", "nodes": [{"name": "A"}, {"id": "n2"}]})))
            .unwrap_err();
        assert_eq!(err, ConversionError::MissingField { field: "nodes[1].name".into() });

        let err = mirror(ScalarPolicy::Strict)
            .convert(&workflow(json!({"name": "X", "tags": [{"name": ""}]})))
            .unwrap_err();
        assert_eq!(err, ConversionError::MissingField { field: "tags[0].name".into() });
    }

    #[test]
    fn fractional_timeout_is_rejected() {
        let wf = workflow(json!({"name": "T", "settings": {"executionTimeout": 1.5}}));
        let err = mirror(ScalarPolicy::Strict).convert(&wf).unwrap_err();
        assert!(matches!(err, ConversionError::NotAnInteger { value, .. } if value == 1.5));
    }

    #[test]
    fn timeout_beyond_int64_is_rejected() {
        for seconds in [1e20, -1e20, 9_223_372_036_854_775_807.0] {
            let wf = workflow(json!({"name": "T", "settings": {"executionTimeout": seconds}}));
            let err = mirror(ScalarPolicy::Strict).convert(&wf).unwrap_err();
            assert!(matches!(err, ConversionError::OutOfRange { value, .. } if value == seconds));
        }

        let wf = workflow(json!({"name": "T", "settings": {"executionTimeout": -1}}));
        let state = mirror(ScalarPolicy::Strict).convert(&wf).unwrap();
        assert_eq!(state.settings.execution_timeout, Some(-1));
    }

    #[test]
    fn static_data_strings_pass_through() {
        let wf = workflow(json!({"name": "S", "staticData": "raw"}));
        let state = mirror(ScalarPolicy::Strict).convert(&wf).unwrap();
        assert_eq!(state.static_data.as_deref(), Some("raw"));

        let wf = workflow(json!({"name": "S", "staticData": null}));
        let state = mirror(ScalarPolicy::Strict).convert(&wf).unwrap();
        assert_eq!(state.static_data, None);
    }
}
