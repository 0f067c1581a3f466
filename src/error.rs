use thiserror::Error;

/// Failures talking to the n8n API.
#[derive(Error, Debug)]
pub enum ClientError {
    #[error("request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("n8n API returned status {status} for {url}: {message}")]
    Status {
        url: String,
        status: u16,
        message: String,
    },

    #[error("failed to decode response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("cannot build a request URL from '{0}'")]
    InvalidUrl(String),
}

/// A domain value that has no representation in the state model.
///
/// `field` is the attribute path inside the workflow, e.g.
/// `nodes[2].parameters`.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConversionError {
    #[error("{field}: value for key '{key}' is {found}, expected a scalar")]
    NonScalar {
        field: String,
        key: String,
        found: &'static str,
    },

    #[error("{field}: value for key '{key}' must be a string, found {found}")]
    TypeMismatch {
        field: String,
        key: String,
        found: &'static str,
    },

    #[error("{field}: element {index} is {found}, expected a number")]
    NonNumeric {
        field: String,
        index: usize,
        found: &'static str,
    },

    #[error("{field}: {value} is not a whole number")]
    NotAnInteger { field: String, value: f64 },

    #[error("{field}: {value} does not fit in a 64-bit integer")]
    OutOfRange { field: String, value: f64 },

    #[error("{field}: entry '{key}' is {found}, expected an object of outputs")]
    InvalidConnection {
        field: String,
        key: String,
        found: &'static str,
    },

    #[error("{field} is required but missing")]
    MissingField { field: String },

    #[error("{field}: failed to encode value: {message}")]
    Encode { field: String, message: String },
}

/// Errors surfaced by the resource mirror.
#[derive(Error, Debug)]
pub enum MirrorError {
    #[error("{context}: {source}")]
    Fetch {
        context: &'static str,
        #[source]
        source: ClientError,
    },

    #[error("failed to convert workflow: {0}")]
    Convert(#[from] ConversionError),

    #[error("failed to convert workflow at index {index} (id {id}): {source}")]
    ConvertItem {
        index: usize,
        id: String,
        #[source]
        source: ConversionError,
    },
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("invalid host URL '{url}': {reason}")]
    InvalidHostUrl { url: String, reason: String },
}
