use crate::error::ConversionError;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};
use std::collections::BTreeMap;

/// A single JSON primitive. Arrays and objects have no scalar form.
#[derive(Debug, Clone, PartialEq)]
pub enum ScalarValue {
    String(String),
    Number(Number),
    Bool(bool),
    Null,
}

impl ScalarValue {
    /// Classifies a JSON value, returning the JSON kind name on failure.
    pub fn classify(value: &Value) -> Result<Self, &'static str> {
        match value {
            Value::String(s) => Ok(ScalarValue::String(s.clone())),
            Value::Number(n) => Ok(ScalarValue::Number(n.clone())),
            Value::Bool(b) => Ok(ScalarValue::Bool(*b)),
            Value::Null => Ok(ScalarValue::Null),
            other => Err(json_kind(other)),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            ScalarValue::String(_) => "a string",
            ScalarValue::Number(_) => "a number",
            ScalarValue::Bool(_) => "a bool",
            ScalarValue::Null => "null",
        }
    }
}

/// How scalar map values are turned into strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScalarPolicy {
    /// Only string values are accepted.
    #[default]
    Strict,
    /// Numbers, bools and null are rendered with their JSON text.
    Lenient,
}

impl ScalarPolicy {
    /// Renders a scalar, or returns `None` when the policy rejects it.
    pub fn render(self, value: ScalarValue) -> Option<String> {
        match (self, value) {
            (_, ScalarValue::String(s)) => Some(s),
            (ScalarPolicy::Strict, _) => None,
            (ScalarPolicy::Lenient, ScalarValue::Number(n)) => Some(n.to_string()),
            (ScalarPolicy::Lenient, ScalarValue::Bool(b)) => Some(b.to_string()),
            (ScalarPolicy::Lenient, ScalarValue::Null) => Some("null".to_string()),
        }
    }
}

/// Converts a `parameters`/`credentials` style map into a string map.
///
/// An absent map stays absent. Keys are visited in sorted order and the
/// first offending key aborts the conversion.
pub fn convert_scalar_map(
    field: &str,
    input: Option<&Map<String, Value>>,
    policy: ScalarPolicy,
) -> Result<Option<BTreeMap<String, String>>, ConversionError> {
    let Some(input) = input else {
        return Ok(None);
    };

    let mut output = BTreeMap::new();
    for (key, value) in input {
        let scalar = ScalarValue::classify(value).map_err(|found| ConversionError::NonScalar {
            field: field.to_string(),
            key: key.clone(),
            found,
        })?;
        let found = scalar.kind();
        let rendered = policy
            .render(scalar)
            .ok_or_else(|| ConversionError::TypeMismatch {
                field: field.to_string(),
                key: key.clone(),
                found,
            })?;
        output.insert(key.clone(), rendered);
    }

    Ok(Some(output))
}

pub(crate) fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a bool",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
