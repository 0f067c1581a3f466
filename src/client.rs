use crate::config::ProviderConfig;
use crate::error::ClientError;
use crate::model::{ApiErrorBody, Workflow, WorkflowList};
use async_trait::async_trait;
use reqwest::header::ACCEPT;
use reqwest::Url;
use serde::de::DeserializeOwned;

pub const API_KEY_HEADER: &str = "X-N8N-API-KEY";

/// Read access to workflows held by an n8n instance.
#[async_trait]
pub trait WorkflowSource: Send + Sync {
    async fn get_workflow(&self, id: &str) -> Result<Workflow, ClientError>;

    async fn get_workflows(&self) -> Result<WorkflowList, ClientError>;
}

/// Client for the n8n public API (`/api/v1`).
pub struct N8nClient {
    http: reqwest::Client,
    base_url: Url,
    api_key: String,
}

impl N8nClient {
    pub fn new(config: &ProviderConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: config.host_url().clone(),
            api_key: config.api_key().to_string(),
        }
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url, ClientError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ClientError::InvalidUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(["api", "v1"])
            .extend(segments);
        Ok(url)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, ClientError> {
        log::debug!("GET {}", url);

        let response = self
            .http
            .get(url.clone())
            .header(API_KEY_HEADER, &self.api_key)
            .header(ACCEPT, "application/json")
            .send()
            .await
            .map_err(|source| ClientError::Request {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        let body = response.text().await.map_err(|source| ClientError::Request {
            url: url.to_string(),
            source,
        })?;

        if !status.is_success() {
            return Err(ClientError::Status {
                url: url.to_string(),
                status: status.as_u16(),
                message: error_message(&body),
            });
        }

        serde_json::from_str(&body).map_err(|source| ClientError::Decode {
            url: url.to_string(),
            source,
        })
    }
}

#[async_trait]
impl WorkflowSource for N8nClient {
    async fn get_workflow(&self, id: &str) -> Result<Workflow, ClientError> {
        let url = self.endpoint(&["workflows", id])?;
        self.get_json(url).await
    }

    async fn get_workflows(&self) -> Result<WorkflowList, ClientError> {
        let url = self.endpoint(&["workflows"])?;
        self.get_json(url).await
    }
}

/// Prefers the API's `{"message": ...}` body, falling back to the raw text.
fn error_message(body: &str) -> String {
    match serde_json::from_str::<ApiErrorBody>(body) {
        Ok(parsed) => parsed.message,
        Err(_) if body.trim().is_empty() => "empty response body".to_string(),
        Err(_) => body.trim().to_string(),
    }
}
