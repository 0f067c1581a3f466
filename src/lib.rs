//! Read-only mirror of n8n workflows as typed, declarative state.
//!
//! [`mirror::ResourceMirror`] fetches workflows through a
//! [`client::WorkflowSource`] and converts them into [`state::WorkflowState`].
//! [`provider::Provider`] wraps the mirror as the `n8n_workflow` and
//! `n8n_workflows` data sources.

pub mod client;
pub mod config;
pub mod error;
pub mod mirror;
pub mod model;
pub mod provider;
pub mod schema;
pub mod server;
pub mod state;
pub mod value;

pub use client::{N8nClient, WorkflowSource};
pub use config::ProviderConfig;
pub use error::{ClientError, ConfigError, ConversionError, MirrorError};
pub use mirror::{ResourceMirror, WorkflowPage};
pub use provider::{DataSource, Diagnostic, Provider, ReadResponse};
pub use value::{ScalarPolicy, ScalarValue};
