//! Configuration types.

use std::path::PathBuf;
use std::time::Duration;

use secrecy::SecretString;

use crate::error::ConfigError;
use crate::llm::{LlmBackend, LlmConfig};

/// Engine configuration for a single distribution run.
#[derive(Debug, Clone, Default)]
pub struct DistributionConfig {
    /// When no candidate survives filtering and escalation, hand the ticket
    /// to the whole unfiltered pool of its resolved office instead of
    /// leaving it unassigned.
    pub enable_fallback: bool,
}

/// Tuning for the LLM-backed classifier.
#[derive(Debug, Clone)]
pub struct ClassifierConfig {
    /// Attempts per ticket before falling back to keyword rules.
    pub max_retries: u32,
    /// Pause between attempts.
    pub retry_delay: Duration,
    /// Sampling temperature (kept low, classification should be stable).
    pub temperature: f32,
    /// Max tokens for the reply.
    pub max_tokens: u32,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            retry_delay: Duration::from_secs(1),
            temperature: 0.1,
            max_tokens: 512,
        }
    }
}

/// Process-level configuration for the `ticket-router` binary.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub tickets_path: PathBuf,
    pub managers_path: PathBuf,
    pub units_path: PathBuf,
    pub output_path: PathBuf,
    pub distribution: DistributionConfig,
    /// `None` means keyword classification only.
    pub llm: Option<LlmConfig>,
    pub classifier: ClassifierConfig,
}

const DEFAULT_LLM_MODEL: &str = "local-model";

impl AppConfig {
    /// Build configuration from `TICKET_ROUTER_*` environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup (env, test map).
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let path = |key: &str, default: &str| {
            PathBuf::from(lookup(key).unwrap_or_else(|| default.to_string()))
        };

        let enable_fallback = match lookup("TICKET_ROUTER_FALLBACK") {
            Some(raw) => parse_flag("TICKET_ROUTER_FALLBACK", &raw)?,
            None => false,
        };

        let base_url = lookup("TICKET_ROUTER_LLM_BASE_URL").filter(|v| !v.trim().is_empty());
        let api_key = lookup("TICKET_ROUTER_LLM_API_KEY").filter(|v| !v.trim().is_empty());

        let llm = match (base_url, api_key) {
            (None, None) => None,
            (Some(base_url), api_key) => Some(LlmConfig {
                backend: LlmBackend::OpenAiCompatible,
                // Local inference servers ignore the key but the client wants one.
                api_key: SecretString::from(api_key.unwrap_or_else(|| "not-needed".to_string())),
                model: lookup("TICKET_ROUTER_LLM_MODEL")
                    .unwrap_or_else(|| DEFAULT_LLM_MODEL.to_string()),
                base_url: Some(base_url),
            }),
            (None, Some(api_key)) => Some(LlmConfig {
                backend: LlmBackend::OpenAi,
                api_key: SecretString::from(api_key),
                model: lookup("TICKET_ROUTER_LLM_MODEL")
                    .ok_or_else(|| ConfigError::MissingEnvVar("TICKET_ROUTER_LLM_MODEL".into()))?,
                base_url: None,
            }),
        };

        Ok(Self {
            tickets_path: path("TICKET_ROUTER_TICKETS", "./dataset/tickets.csv"),
            managers_path: path("TICKET_ROUTER_MANAGERS", "./dataset/managers.csv"),
            units_path: path("TICKET_ROUTER_UNITS", "./dataset/business_units.csv"),
            output_path: path(
                "TICKET_ROUTER_OUTPUT",
                "./dataset/processed/assignments.csv",
            ),
            distribution: DistributionConfig { enable_fallback },
            llm,
            classifier: ClassifierConfig::default(),
        })
    }
}

fn parse_flag(key: &str, raw: &str) -> Result<bool, ConfigError> {
    match raw.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        other => Err(ConfigError::InvalidValue {
            key: key.to_string(),
            message: format!("expected a boolean, got '{other}'"),
        }),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_without_environment() {
        let config = AppConfig::from_lookup(lookup_from(&[])).unwrap();
        assert!(!config.distribution.enable_fallback);
        assert!(config.llm.is_none());
        assert_eq!(config.tickets_path, PathBuf::from("./dataset/tickets.csv"));
        assert_eq!(config.classifier.max_retries, 3);
    }

    #[test]
    fn fallback_flag_parsing() {
        let config =
            AppConfig::from_lookup(lookup_from(&[("TICKET_ROUTER_FALLBACK", "yes")])).unwrap();
        assert!(config.distribution.enable_fallback);

        let err = AppConfig::from_lookup(lookup_from(&[("TICKET_ROUTER_FALLBACK", "maybe")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { .. }));
    }

    #[test]
    fn base_url_selects_compatible_backend() {
        let config = AppConfig::from_lookup(lookup_from(&[(
            "TICKET_ROUTER_LLM_BASE_URL",
            "http://localhost:1234/v1",
        )]))
        .unwrap();
        let llm = config.llm.unwrap();
        assert_eq!(llm.backend, LlmBackend::OpenAiCompatible);
        assert_eq!(llm.model, "local-model");
        assert_eq!(llm.base_url.as_deref(), Some("http://localhost:1234/v1"));
    }

    #[test]
    fn hosted_backend_requires_model() {
        let err = AppConfig::from_lookup(lookup_from(&[("TICKET_ROUTER_LLM_API_KEY", "sk-x")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::MissingEnvVar(_)));

        let config = AppConfig::from_lookup(lookup_from(&[
            ("TICKET_ROUTER_LLM_API_KEY", "sk-x"),
            ("TICKET_ROUTER_LLM_MODEL", "gpt-4o-mini"),
        ]))
        .unwrap();
        assert_eq!(config.llm.unwrap().backend, LlmBackend::OpenAi);
    }
}
