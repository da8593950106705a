use std::time::Duration;

use crate::error::Result;
use super::request::{ProviderKind, RequestSpec};

/// Resolved connection settings handed to a provider at construction time
#[derive(Debug, Clone)]
pub struct ProviderEndpoint {
    /// API key, already resolved from config, environment or prompt
    pub credential: String,

    /// Base URL without a trailing slash
    pub base_url: String,

    /// Overall request timeout, if any
    pub timeout: Option<Duration>,
}

impl ProviderEndpoint {
    pub fn new(
        kind: ProviderKind,
        credential: impl Into<String>,
        base_url: Option<String>,
    ) -> Self {
        let base_url = base_url
            .unwrap_or_else(|| kind.default_base_url().to_string())
            .trim_end_matches('/')
            .to_string();

        Self {
            credential: credential.into(),
            base_url,
            timeout: None,
        }
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Trait for LLM providers that can generate documentation
#[async_trait::async_trait]
pub trait LlmDocumenter: Send + Sync {
    /// Issue exactly one request and return the provider's raw text
    async fn generate(&self, spec: &RequestSpec) -> Result<String>;

    /// Which provider this is
    fn kind(&self) -> ProviderKind;

    /// Human readable provider name (e.g. "OpenRouter")
    fn provider_name(&self) -> String {
        self.kind().to_string()
    }
}
