//! Bridges rig's OpenAI-compatible client to [`LlmProvider`].

use async_trait::async_trait;
use rig::client::CompletionClient;
use rig::completion::Prompt;
use rig::providers::openai;

use crate::error::LlmError;
use crate::llm::provider::{CompletionRequest, CompletionResponse, LlmProvider};

/// rig-core backed provider.
///
/// A fresh agent is built per request because the preamble and sampling
/// settings travel with the request, not with the provider.
pub struct RigAdapter {
    client: openai::CompletionsClient,
    model: String,
    provider: String,
}

impl RigAdapter {
    pub fn new(
        client: openai::CompletionsClient,
        model: impl Into<String>,
        provider: impl Into<String>,
    ) -> Self {
        Self {
            client,
            model: model.into(),
            provider: provider.into(),
        }
    }
}

#[async_trait]
impl LlmProvider for RigAdapter {
    fn model_name(&self) -> &str {
        &self.model
    }

    async fn complete(
        &self,
        request: CompletionRequest,
    ) -> Result<CompletionResponse, LlmError> {
        let prompt = request
            .prompt()
            .ok_or_else(|| LlmError::RequestFailed {
                provider: self.provider.clone(),
                reason: "request has no user message".to_string(),
            })?
            .to_string();

        let mut builder = self
            .client
            .agent(&self.model)
            .preamble(&request.preamble());
        if let Some(temperature) = request.temperature {
            builder = builder.temperature(f64::from(temperature));
        }
        if let Some(max_tokens) = request.max_tokens {
            builder = builder.max_tokens(u64::from(max_tokens));
        }
        let agent = builder.build();

        let content: String = agent.prompt(prompt.as_str()).await.map_err(|e| {
            classify_prompt_error(&self.provider, e.to_string())
        })?;

        into_response(&self.provider, content)
    }
}

/// A blank reply carries nothing to parse.
fn into_response(provider: &str, content: String) -> Result<CompletionResponse, LlmError> {
    if content.trim().is_empty() {
        return Err(LlmError::InvalidResponse {
            provider: provider.to_string(),
            reason: "empty completion".to_string(),
        });
    }
    Ok(CompletionResponse { content })
}

/// Sort a rig error message into our error kinds.
fn classify_prompt_error(provider: &str, reason: String) -> LlmError {
    let lower = reason.to_lowercase();
    if lower.contains("connection refused")
        || lower.contains("error trying to connect")
        || lower.contains("dns error")
    {
        LlmError::Unreachable {
            provider: provider.to_string(),
            reason,
        }
    } else if lower.contains("401") || lower.contains("unauthorized") {
        LlmError::AuthFailed {
            provider: provider.to_string(),
        }
    } else if lower.contains("429") || lower.contains("rate limit") {
        LlmError::RateLimited {
            provider: provider.to_string(),
            retry_after: None,
        }
    } else {
        LlmError::RequestFailed {
            provider: provider.to_string(),
            reason,
        }
    }
}
