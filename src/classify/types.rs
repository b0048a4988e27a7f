//! Classification record and its closed category sets.

use std::fmt;

use serde::{Deserialize, Serialize};

// ── Intent ──────────────────────────────────────────────────────────

/// What the customer wants, from a fixed set of categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    Complaint,
    DataChange,
    Consultation,
    Claim,
    ApplicationFailure,
    Fraud,
    Spam,
}

impl Intent {
    pub const ALL: [Intent; 7] = [
        Self::Complaint,
        Self::DataChange,
        Self::Consultation,
        Self::Claim,
        Self::ApplicationFailure,
        Self::Fraud,
        Self::Spam,
    ];

    /// Human-readable label, used in reports and prompts.
    pub fn label(self) -> &'static str {
        match self {
            Self::Complaint => "complaint",
            Self::DataChange => "data change",
            Self::Consultation => "consultation",
            Self::Claim => "claim",
            Self::ApplicationFailure => "application failure",
            Self::Fraud => "fraud",
            Self::Spam => "spam",
        }
    }

    fn source_label(self) -> &'static str {
        match self {
            Self::Complaint => "жалоба",
            Self::DataChange => "смена данных",
            Self::Consultation => "консультация",
            Self::Claim => "претензия",
            Self::ApplicationFailure => "неработоспособность приложения",
            Self::Fraud => "мошеннические действия",
            Self::Spam => "спам",
        }
    }

    /// Parse from the English label, the snake_case name or the Russian
    /// category name.
    pub fn parse(raw: &str) -> Option<Self> {
        let needle = raw.trim().to_lowercase();
        Self::ALL.into_iter().find(|intent| {
            needle == intent.label()
                || needle == intent.label().replace(' ', "_")
                || needle == intent.source_label()
        })
    }

    /// Reported priority when nothing better is known.
    pub fn default_priority(self) -> u8 {
        match self {
            Self::Fraud => 9,
            Self::Claim => 8,
            Self::Complaint | Self::ApplicationFailure => 7,
            Self::DataChange => 5,
            Self::Consultation => 3,
            Self::Spam => 1,
        }
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ── Sentiment ───────────────────────────────────────────────────────

/// Emotional tone of the ticket. Reported, never used for routing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sentiment {
    Positive,
    #[default]
    Neutral,
    Negative,
}

impl Sentiment {
    pub fn label(self) -> &'static str {
        match self {
            Self::Positive => "positive",
            Self::Neutral => "neutral",
            Self::Negative => "negative",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_lowercase().as_str() {
            "positive" | "позитивный" => Some(Self::Positive),
            "neutral" | "нейтральный" => Some(Self::Neutral),
            "negative" | "негативный" => Some(Self::Negative),
            _ => None,
        }
    }
}

impl fmt::Display for Sentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ── Language ────────────────────────────────────────────────────────

/// Ticket language. Russian is the default and needs no skill.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub enum Language {
    #[default]
    #[serde(rename = "RU")]
    Ru,
    #[serde(rename = "KZ")]
    Kz,
    #[serde(rename = "ENG")]
    Eng,
}

impl Language {
    /// Code as it appears in manager skill sets.
    pub fn code(self) -> &'static str {
        match self {
            Self::Ru => "RU",
            Self::Kz => "KZ",
            Self::Eng => "ENG",
        }
    }

    pub fn is_default(self) -> bool {
        self == Self::Ru
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_uppercase().as_str() {
            "RU" => Some(Self::Ru),
            "KZ" => Some(Self::Kz),
            "ENG" => Some(Self::Eng),
            _ => None,
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

// ── Classification ──────────────────────────────────────────────────

/// Result of classifying one ticket's text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Classification {
    pub intent: Intent,
    pub sentiment: Sentiment,
    /// Suggested priority, 1..=10. Carried through for reporting only.
    pub priority: u8,
    pub language: Language,
    pub summary: String,
    pub recommendation: String,
}

impl Classification {
    /// Record returned for empty or whitespace-only ticket text.
    pub fn empty() -> Self {
        Self {
            intent: Intent::Consultation,
            sentiment: Sentiment::Neutral,
            priority: 1,
            language: Language::Ru,
            summary: "Ticket text is empty.".to_string(),
            recommendation: "Ask the customer to describe the request.".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn intent_parses_all_label_forms() {
        assert_eq!(Intent::parse("data change"), Some(Intent::DataChange));
        assert_eq!(Intent::parse("data_change"), Some(Intent::DataChange));
        assert_eq!(Intent::parse("Смена данных"), Some(Intent::DataChange));
        assert_eq!(
            Intent::parse(" Application Failure "),
            Some(Intent::ApplicationFailure)
        );
        assert_eq!(Intent::parse("escalation"), None);
    }

    #[test]
    fn language_codes() {
        assert_eq!(Language::parse("eng"), Some(Language::Eng));
        assert_eq!(Language::parse("KZ"), Some(Language::Kz));
        assert_eq!(Language::parse("DE"), None);
        assert!(Language::default().is_default());
        assert!(!Language::Kz.is_default());
    }

    #[test]
    fn language_serializes_as_code() {
        let json = serde_json::to_value(Language::Eng).unwrap();
        assert_eq!(json, "ENG");
    }

    #[test]
    fn sentiment_parses_russian_labels() {
        assert_eq!(Sentiment::parse("Негативный"), Some(Sentiment::Negative));
        assert_eq!(Sentiment::parse("positive"), Some(Sentiment::Positive));
        assert_eq!(Sentiment::parse("angry"), None);
    }
}
