//! Error types for the ticket router.

use std::time::Duration;

/// Top-level error type for a distribution run.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Ingest error: {0}")]
    Ingest(#[from] IngestError),

    #[error("LLM error: {0}")]
    Llm(#[from] LlmError),
}

/// Configuration-related errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue { key: String, message: String },
}

/// Errors raised while loading or writing the tabular datasets.
///
/// All of these abort the run before any ticket is distributed. Bad rows
/// are skipped or coerced by the readers and never surface here.
#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    #[error("Dataset '{dataset}' is missing required columns: {}", missing.join(", "))]
    MissingColumns {
        dataset: String,
        missing: Vec<String>,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// LLM provider errors.
#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    #[error("Provider {provider} request failed: {reason}")]
    RequestFailed { provider: String, reason: String },

    #[error("Provider {provider} unreachable: {reason}")]
    Unreachable { provider: String, reason: String },

    #[error("Provider {provider} rate limited, retry after {retry_after:?}")]
    RateLimited {
        provider: String,
        retry_after: Option<Duration>,
    },

    #[error("Invalid response from {provider}: {reason}")]
    InvalidResponse { provider: String, reason: String },

    #[error("Authentication failed for provider {provider}")]
    AuthFailed { provider: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl LlmError {
    /// Whether another attempt against the same provider can succeed.
    ///
    /// A dead endpoint or rejected credentials will not recover between
    /// attempts, so callers stop retrying and fall back immediately.
    pub fn is_retryable(&self) -> bool {
        !matches!(self, Self::Unreachable { .. } | Self::AuthFailed { .. })
    }
}

/// Result type alias for the router.
pub type Result<T> = std::result::Result<T, Error>;
