//! Ticket text classification.
//!
//! The distribution engine needs an intent and a language for every ticket.
//! Two implementations:
//! 1. `KeywordClassifier`: deterministic rules, no I/O
//! 2. `LlmClassifier`: LLM call with retries, keyword fallback on failure
//!
//! Both always return a complete, valid [`Classification`].

pub mod llm;
pub mod rules;
pub mod types;

pub use llm::LlmClassifier;
pub use rules::KeywordClassifier;
pub use types::{Classification, Intent, Language, Sentiment};

use async_trait::async_trait;

/// Turns ticket text into a [`Classification`].
///
/// Infallible by contract: implementations absorb their own failures and
/// degrade to a local deterministic answer.
#[async_trait]
pub trait Classifier: Send + Sync {
    /// Short name, for logs.
    fn name(&self) -> &str;

    /// Classify one ticket's text.
    async fn classify(&self, text: &str) -> Classification;
}
