use crate::error::ConfigError;
use crate::value::ScalarPolicy;
use reqwest::Url;
use std::fmt;

/// Connection settings for one n8n instance.
#[derive(Clone)]
pub struct ProviderConfig {
    host_url: Url,
    api_key: String,
    scalar_policy: ScalarPolicy,
}

impl ProviderConfig {
    pub fn new(host_url: &str, api_key: &str) -> Result<Self, ConfigError> {
        let host_url = host_url.trim();
        if host_url.is_empty() {
            return Err(ConfigError::Missing("host_url"));
        }
        if api_key.trim().is_empty() {
            return Err(ConfigError::Missing("api_key"));
        }

        let parsed = Url::parse(host_url.trim_end_matches('/')).map_err(|e| {
            ConfigError::InvalidHostUrl {
                url: host_url.to_string(),
                reason: e.to_string(),
            }
        })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ConfigError::InvalidHostUrl {
                url: host_url.to_string(),
                reason: format!("unsupported scheme '{}'", parsed.scheme()),
            });
        }

        Ok(Self {
            host_url: parsed,
            api_key: api_key.to_string(),
            scalar_policy: ScalarPolicy::default(),
        })
    }

    pub fn with_scalar_policy(mut self, policy: ScalarPolicy) -> Self {
        self.scalar_policy = policy;
        self
    }

    pub fn host_url(&self) -> &Url {
        &self.host_url
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    pub fn scalar_policy(&self) -> ScalarPolicy {
        self.scalar_policy
    }
}

impl fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("host_url", &self.host_url.as_str())
            .field("api_key", &"<redacted>")
            .field("scalar_policy", &self.scalar_policy)
            .finish()
    }
}
