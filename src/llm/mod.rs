//! LLM integration for ticket classification.
//!
//! Supports:
//! - **OpenAI**: hosted API via rig-core
//! - **OpenAI-compatible**: any server speaking the same protocol
//!   (a local inference server, for instance) at a custom base URL
//!
//! Uses the rig-core crate for HTTP transport and the `RigAdapter` to bridge
//! rig's agents to our `LlmProvider` trait.

pub mod provider;
mod rig_adapter;

pub use provider::*;
pub use rig_adapter::RigAdapter;

use std::sync::Arc;

use rig::providers::openai;
use secrecy::ExposeSecret;

use crate::error::LlmError;

const OPENAI_BASE_URL: &str = "https://api.openai.com/v1";

/// Supported LLM backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LlmBackend {
    OpenAi,
    OpenAiCompatible,
}

impl LlmBackend {
    pub(crate) fn label(self) -> &'static str {
        match self {
            Self::OpenAi => "openai",
            Self::OpenAiCompatible => "openai-compatible",
        }
    }
}

/// Configuration for creating an LLM provider.
#[derive(Debug, Clone)]
pub struct LlmConfig {
    pub backend: LlmBackend,
    pub api_key: secrecy::SecretString,
    pub model: String,
    /// Required for `OpenAiCompatible`, ignored for `OpenAi`.
    pub base_url: Option<String>,
}

/// Create an LLM provider from configuration.
pub fn create_provider(config: &LlmConfig) -> Result<Arc<dyn LlmProvider>, LlmError> {
    let base_url = match config.backend {
        LlmBackend::OpenAi => OPENAI_BASE_URL,
        LlmBackend::OpenAiCompatible => {
            config
                .base_url
                .as_deref()
                .ok_or_else(|| LlmError::RequestFailed {
                    provider: config.backend.label().to_string(),
                    reason: "OpenAI-compatible backend requires a base URL".to_string(),
                })?
        }
    };

    let client = openai::CompletionsClient::builder()
        .api_key(config.api_key.expose_secret())
        .base_url(base_url)
        .build()
        .map_err(|e| LlmError::RequestFailed {
            provider: config.backend.label().to_string(),
            reason: format!("Failed to create client: {}", e),
        })?;

    tracing::info!(
        backend = config.backend.label(),
        base_url,
        "Using LLM classifier (model: {})",
        config.model
    );
    Ok(Arc::new(RigAdapter::new(
        client,
        &config.model,
        config.backend.label(),
    )))
}
