//! Declarative attribute trees for the provider and its data sources.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementType {
    String,
    Number,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AttributeType {
    String,
    Bool,
    Number,
    Int64,
    List { element: ElementType },
    Map { element: ElementType },
    ListNested { attributes: Vec<Attribute> },
    SingleNested { attributes: Vec<Attribute> },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Attribute {
    pub name: String,
    pub description: String,
    #[serde(rename = "type")]
    pub kind: AttributeType,
    pub required: bool,
    pub computed: bool,
    pub sensitive: bool,
}

impl Attribute {
    pub fn computed(name: &str, kind: AttributeType, description: &str) -> Self {
        Self {
            name: name.to_string(),
            description: description.to_string(),
            kind,
            required: false,
            computed: true,
            sensitive: false,
        }
    }

    pub fn required(name: &str, kind: AttributeType, description: &str) -> Self {
        Self {
            required: true,
            computed: false,
            ..Self::computed(name, kind, description)
        }
    }

    pub fn sensitive(mut self) -> Self {
        self.sensitive = true;
        self
    }

    /// Nested attributes, if this is a nested object or list of objects.
    pub fn children(&self) -> Option<&[Attribute]> {
        match &self.kind {
            AttributeType::ListNested { attributes } | AttributeType::SingleNested { attributes } => {
                Some(attributes)
            }
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Schema {
    pub description: String,
    pub attributes: Vec<Attribute>,
}

impl Schema {
    pub fn attribute(&self, name: &str) -> Option<&Attribute> {
        self.attributes.iter().find(|a| a.name == name)
    }
}

/// Provider block: where the n8n instance lives and how to authenticate.
pub fn provider_schema() -> Schema {
    Schema {
        description: "Reads workflows from an n8n instance.".to_string(),
        attributes: vec![
            Attribute::required("host_url", AttributeType::String, "URL of the n8n instance."),
            Attribute::required("api_key", AttributeType::String, "API Key for n8n instance.")
                .sensitive(),
        ],
    }
}

/// Schema of `n8n_workflow`: a single workflow looked up by `id`.
pub fn workflow_data_source_schema() -> Schema {
    Schema {
        description: "Reads a single workflow.".to_string(),
        attributes: workflow_attributes(true),
    }
}

/// Schema of `n8n_workflows`: every workflow under `data`.
pub fn workflows_data_source_schema() -> Schema {
    Schema {
        description: "Lists workflows.".to_string(),
        attributes: vec![Attribute::computed(
            "data",
            AttributeType::ListNested {
                attributes: workflow_attributes(false),
            },
            "The workflows of the instance.",
        )],
    }
}

/// The workflow attribute tree shared by both data sources. Only the `id`
/// attribute differs: it is the lookup key of the single-workflow source.
pub fn workflow_attributes(id_required: bool) -> Vec<Attribute> {
    let id = if id_required {
        Attribute::required("id", AttributeType::String, "Workflow ID")
    } else {
        Attribute::computed("id", AttributeType::String, "Workflow ID")
    };

    vec![
        id,
        Attribute::computed("name", AttributeType::String, "The name of the workflow."),
        Attribute::computed("active", AttributeType::Bool, "Whether the workflow is active."),
        Attribute::computed(
            "nodes",
            AttributeType::ListNested {
                attributes: node_attributes(),
            },
            "The nodes of the workflow.",
        ),
        Attribute::computed(
            "connections",
            AttributeType::Map {
                element: ElementType::String,
            },
            "The connections of the workflow, keyed by source node name. Values are JSON encoded.",
        ),
        Attribute::computed(
            "settings",
            AttributeType::SingleNested {
                attributes: settings_attributes(),
            },
            "The settings of the workflow.",
        ),
        Attribute::computed("static_data", AttributeType::String, "The static data of the workflow."),
        Attribute::computed(
            "tags",
            AttributeType::ListNested {
                attributes: tag_attributes(),
            },
            "The tags of the workflow.",
        ),
        Attribute::computed("created_at", AttributeType::String, "The creation date of the workflow."),
        Attribute::computed("updated_at", AttributeType::String, "The last update date of the workflow."),
    ]
}

fn node_attributes() -> Vec<Attribute> {
    use AttributeType::{Bool, Number, String};

    vec![
        Attribute::computed("id", String, "Node ID"),
        Attribute::computed("name", String, "Node name"),
        Attribute::computed("webhook_id", String, "Webhook ID"),
        Attribute::computed("disabled", Bool, "Whether the node is disabled."),
        Attribute::computed("notes_in_flow", Bool, "Whether the node has notes in the flow."),
        Attribute::computed("notes", String, "Node notes"),
        Attribute::computed("type", String, "Node type"),
        Attribute::computed("type_version", Number, "Node type version"),
        Attribute::computed("execute_once", Bool, "Whether the node executes only once."),
        Attribute::computed("always_output_data", Bool, "Whether the node always outputs data."),
        Attribute::computed("retry_on_fail", Bool, "Whether the node retries on fail."),
        Attribute::computed("max_tries", Number, "Max tries for the node."),
        Attribute::computed("wait_between_tries", Number, "Wait between tries for the node."),
        Attribute::computed("continue_on_fail", Bool, "Whether the node continues on fail."),
        Attribute::computed("on_error", String, "On error action for the node."),
        Attribute::computed(
            "position",
            AttributeType::List {
                element: ElementType::Number,
            },
            "Node position",
        ),
        Attribute::computed(
            "parameters",
            AttributeType::Map {
                element: ElementType::String,
            },
            "Node parameters",
        ),
        Attribute::computed(
            "credentials",
            AttributeType::Map {
                element: ElementType::String,
            },
            "Node credentials",
        ),
        Attribute::computed("created_at", String, "Node creation date"),
        Attribute::computed("updated_at", String, "Node last update date"),
    ]
}

fn settings_attributes() -> Vec<Attribute> {
    use AttributeType::{Bool, Int64, String};

    vec![
        Attribute::computed("save_execution_progress", Bool, "Whether to save execution progress."),
        Attribute::computed("save_manual_executions", Bool, "Whether to save manual executions."),
        Attribute::computed("save_data_error_execution", String, "Save data on error execution."),
        Attribute::computed("save_data_success_execution", String, "Save data on success execution."),
        Attribute::computed("execution_timeout", Int64, "Execution timeout in whole seconds."),
        Attribute::computed("error_workflow", String, "Error workflow."),
        Attribute::computed("timezone", String, "Timezone."),
        Attribute::computed("execution_order", String, "Execution order."),
    ]
}

fn tag_attributes() -> Vec<Attribute> {
    use AttributeType::String;

    vec![
        Attribute::computed("id", String, "Tag ID"),
        Attribute::computed("name", String, "Tag name"),
        Attribute::computed("created_at", String, "Tag creation date"),
        Attribute::computed("updated_at", String, "Tag last update date"),
    ]
}
