//! LLM-backed ticket classifier.
//!
//! Flow per ticket:
//! 1. Empty text short-circuits to the empty record (no LLM call)
//! 2. LLM call with a strict JSON prompt, retried on transient failures
//! 3. Field validation and repair against the closed category sets
//! 4. Keyword classification if every attempt fails
//!
//! A classification failure never aborts a ticket.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tracing::{debug, error, warn};

use crate::classify::rules::KeywordClassifier;
use crate::classify::types::{Classification, Intent, Language, Sentiment};
use crate::classify::Classifier;
use crate::config::ClassifierConfig;
use crate::error::LlmError;
use crate::llm::provider::{ChatMessage, CompletionRequest, LlmProvider};

/// Priority used when the model omits or garbles it.
const DEFAULT_PRIORITY: u8 = 3;

/// Max characters of ticket text sent to the model.
const MAX_PROMPT_CHARS: usize = 4000;

/// Classifier that asks an LLM and falls back to keyword rules.
pub struct LlmClassifier {
    llm: Arc<dyn LlmProvider>,
    fallback: KeywordClassifier,
    config: ClassifierConfig,
}

impl LlmClassifier {
    pub fn new(llm: Arc<dyn LlmProvider>, config: ClassifierConfig) -> Self {
        Self {
            llm,
            fallback: KeywordClassifier::default_rules(),
            config,
        }
    }

    async fn call_with_retry(&self, text: &str) -> Classification {
        let attempts = self.config.max_retries.max(1);
        let mut last_error: Option<String> = None;

        for attempt in 1..=attempts {
            match self.attempt(text).await {
                Ok(classification) => {
                    debug!(
                        attempt,
                        model = self.llm.model_name(),
                        intent = %classification.intent,
                        "LLM classification succeeded"
                    );
                    return classification;
                }
                Err(e) if !e.is_retryable() => {
                    error!(attempt, error = %e, "LLM provider unavailable, not retrying");
                    last_error = Some(e.to_string());
                    break;
                }
                Err(e) => {
                    warn!(attempt, error = %e, "LLM classification attempt failed");
                    last_error = Some(e.to_string());
                }
            }

            if attempt < attempts {
                tokio::time::sleep(self.config.retry_delay).await;
            }
        }

        error!(
            error = last_error.as_deref().unwrap_or("unknown"),
            "LLM classification failed, using keyword fallback"
        );
        self.fallback.analyze(text)
    }

    async fn attempt(&self, text: &str) -> Result<Classification, LlmError> {
        let request = CompletionRequest::new(vec![
            ChatMessage::system(build_system_prompt()),
            ChatMessage::user(build_user_prompt(text)),
        ])
        .with_temperature(self.config.temperature)
        .with_max_tokens(self.config.max_tokens);

        let response = self.llm.complete(request).await?;

        let raw: Value = serde_json::from_str(json_payload(&response.content)).inspect_err(|e| {
            warn!(
                raw_response = %response.content,
                error = %e,
                "Failed to parse classifier response"
            );
        })?;

        Ok(self.validate_and_fix(&raw, text))
    }

    /// Repair every field against its closed set.
    ///
    /// Only an unparsable reply counts as a failure; a structurally valid
    /// JSON object with bad values is repaired field by field.
    fn validate_and_fix(&self, raw: &Value, text: &str) -> Classification {
        let field = |name: &str| raw.get(name).and_then(Value::as_str);

        let intent = match field("intent").and_then(Intent::parse) {
            Some(intent) => intent,
            None => {
                warn!(
                    intent = field("intent").unwrap_or("<missing>"),
                    "Invalid intent from LLM, using keyword intent"
                );
                self.fallback.intent(text)
            }
        };

        let priority = match raw.get("suggested_priority") {
            Some(Value::Number(n)) => n
                .as_i64()
                .or_else(|| n.as_f64().map(|f| f as i64))
                .map(|p| p.clamp(1, 10) as u8)
                .unwrap_or(DEFAULT_PRIORITY),
            Some(Value::String(s)) => s
                .trim()
                .parse::<i64>()
                .map(|p| p.clamp(1, 10) as u8)
                .unwrap_or(DEFAULT_PRIORITY),
            _ => DEFAULT_PRIORITY,
        };

        Classification {
            intent,
            sentiment: field("sentiment")
                .and_then(Sentiment::parse)
                .unwrap_or_default(),
            priority,
            language: field("language").and_then(Language::parse).unwrap_or_default(),
            summary: field("summary")
                .filter(|s| !s.trim().is_empty())
                .unwrap_or("No summary available.")
                .to_string(),
            recommendation: field("recommendation")
                .filter(|s| !s.trim().is_empty())
                .unwrap_or("Handle as standard.")
                .to_string(),
        }
    }
}

#[async_trait]
impl Classifier for LlmClassifier {
    fn name(&self) -> &str {
        "llm"
    }

    async fn classify(&self, text: &str) -> Classification {
        let text = text.trim();
        if text.is_empty() {
            return Classification::empty();
        }
        self.call_with_retry(text).await
    }
}

// ── Prompt construction ─────────────────────────────────────────────

fn build_system_prompt() -> String {
    let intents = Intent::ALL
        .iter()
        .map(|i| format!("\"{}\"", i.label()))
        .collect::<Vec<_>>()
        .join(" | ");

    format!(
        "You are a customer-support ticket analyst. Analyze the ticket text and respond with strict JSON.\n\n\
         Allowed values:\n\
         - intent: {intents}\n\
         - sentiment: \"positive\" | \"neutral\" | \"negative\"\n\
         - suggested_priority: integer 1-10 (fraud/claim -> 8-10, complaint/application failure -> 6-8, others -> 1-5)\n\
         - language: \"RU\" | \"KZ\" | \"ENG\" (KZ if the text has any of ә ғ қ ң ө ұ ү һ і; ENG if Latin script; otherwise RU)\n\
         - summary: 1-2 sentences with the gist\n\
         - recommendation: 1-2 sentences of advice for the specialist\n\n\
         Respond with ONLY a JSON object:\n\
         {{\"intent\": \"...\", \"sentiment\": \"...\", \"suggested_priority\": 5, \"language\": \"...\", \"summary\": \"...\", \"recommendation\": \"...\"}}\n\
         No text before or after the JSON."
    )
}

fn build_user_prompt(text: &str) -> String {
    let preview: String = text.chars().take(MAX_PROMPT_CHARS).collect();
    format!("Analyze the ticket:\n\n\"\"\"\n{preview}\n\"\"\"")
}

// ── Response parsing ────────────────────────────────────────────────

/// The outermost `{...}` span of a reply, or the whole trimmed reply when
/// there is none. Code fences and chatter around the object are dropped.
fn json_payload(reply: &str) -> &str {
    let body = reply.trim();
    match (body.find('{'), body.rfind('}')) {
        (Some(open), Some(close)) if close > open => &body[open..=close],
        _ => body,
    }
}
