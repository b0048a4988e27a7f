//! Local keyword classifier.
//!
//! Deterministic, no network. Used on its own when no LLM is configured and
//! as the fallback whenever the LLM classifier cannot produce a valid record.
//!
//! Intent rules are evaluated in order and the first match wins:
//! fraud → application failure → claim → data change → complaint → spam,
//! otherwise consultation.

use async_trait::async_trait;
use regex::Regex;
use tracing::debug;

use crate::classify::types::{Classification, Intent, Language, Sentiment};
use crate::classify::Classifier;

/// A single intent rule with a compiled keyword regex.
#[derive(Debug, Clone)]
pub struct IntentRule {
    /// Intent assigned on match.
    pub intent: Intent,
    /// Compiled alternation of the rule's keywords.
    pub regex: Regex,
}

/// Keyword-driven classifier.
pub struct KeywordClassifier {
    intent_rules: Vec<IntentRule>,
    negative: Regex,
    positive: Regex,
    kazakh_letters: Regex,
    latin_word: Regex,
}

fn keywords(words: &[&str]) -> Regex {
    let pattern = words
        .iter()
        .map(|w| regex::escape(w))
        .collect::<Vec<_>>()
        .join("|");
    Regex::new(&pattern).unwrap()
}

impl KeywordClassifier {
    /// Classifier with the default Russian-language keyword tables.
    pub fn default_rules() -> Self {
        let intent_rules = vec![
            IntentRule {
                intent: Intent::Fraud,
                regex: keywords(&["мошенник", "украли", "фрод", "взлом", "несанкционир"]),
            },
            IntentRule {
                intent: Intent::ApplicationFailure,
                regex: keywords(&["ошибка", "баг", "не работает", "вылетает", "зависает"]),
            },
            IntentRule {
                intent: Intent::Claim,
                regex: keywords(&["претензия", "возврат", "суд", "компенсация"]),
            },
            IntentRule {
                intent: Intent::DataChange,
                regex: keywords(&["паспорт", "данные", "фио", "смена", "изменить"]),
            },
            IntentRule {
                intent: Intent::Complaint,
                regex: keywords(&["жалоба", "ужасно", "плохо", "недоволен", "отвратительно"]),
            },
            IntentRule {
                intent: Intent::Spam,
                regex: keywords(&["реклама", "выиграли", "приз", "акция", "розыгрыш"]),
            },
        ];

        Self {
            intent_rules,
            negative: keywords(&["плохо", "ужасно", "недоволен", "злой", "мошенник", "украли"]),
            positive: keywords(&["спасибо", "отлично", "хорошо", "помогли", "доволен"]),
            kazakh_letters: Regex::new(r"[әғқңөұүһі]").unwrap(),
            latin_word: Regex::new(r"[a-z]{3,}").unwrap(),
        }
    }

    /// Intent by first matching rule.
    pub fn intent(&self, text: &str) -> Intent {
        let text = text.to_lowercase();
        self.intent_rules
            .iter()
            .find(|rule| rule.regex.is_match(&text))
            .map(|rule| rule.intent)
            .unwrap_or(Intent::Consultation)
    }

    /// Kazakh-specific letters win over Latin words; everything else is Russian.
    pub fn language(&self, text: &str) -> Language {
        let text = text.to_lowercase();
        if self.kazakh_letters.is_match(&text) {
            Language::Kz
        } else if self.latin_word.is_match(&text) {
            Language::Eng
        } else {
            Language::Ru
        }
    }

    pub fn sentiment(&self, text: &str) -> Sentiment {
        let text = text.to_lowercase();
        if self.negative.is_match(&text) {
            Sentiment::Negative
        } else if self.positive.is_match(&text) {
            Sentiment::Positive
        } else {
            Sentiment::Neutral
        }
    }

    /// Full classification of `text`, synchronously.
    pub fn analyze(&self, text: &str) -> Classification {
        if text.trim().is_empty() {
            return Classification::empty();
        }

        let intent = self.intent(text);
        let classification = Classification {
            intent,
            sentiment: self.sentiment(text),
            priority: intent.default_priority(),
            language: self.language(text),
            summary: format!("Ticket of type '{}'.", intent.label()),
            recommendation: "Check the request details.".to_string(),
        };

        debug!(
            intent = %classification.intent,
            language = %classification.language,
            "Keyword classification"
        );
        classification
    }
}

impl Default for KeywordClassifier {
    fn default() -> Self {
        Self::default_rules()
    }
}

#[async_trait]
impl Classifier for KeywordClassifier {
    fn name(&self) -> &str {
        "keywords"
    }

    async fn classify(&self, text: &str) -> Classification {
        self.analyze(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn application_failure_from_error_keyword() {
        let classifier = KeywordClassifier::default_rules();
        let result = classifier.analyze("ошибка в приложении");
        assert_eq!(result.intent, Intent::ApplicationFailure);
        assert_eq!(result.language, Language::Ru);
        assert_eq!(result.priority, 7);
    }

    #[test]
    fn fraud_checked_before_complaint() {
        let classifier = KeywordClassifier::default_rules();
        // "ужасно" is a complaint keyword, but fraud comes first.
        let result = classifier.analyze("Ужасно, мошенники украли деньги");
        assert_eq!(result.intent, Intent::Fraud);
        assert_eq!(result.priority, 9);
        assert_eq!(result.sentiment, Sentiment::Negative);
    }

    #[test]
    fn data_change_keywords() {
        let classifier = KeywordClassifier::default_rules();
        assert_eq!(
            classifier.intent("Хочу изменить номер телефона"),
            Intent::DataChange
        );
    }

    #[test]
    fn no_keywords_means_consultation() {
        let classifier = KeywordClassifier::default_rules();
        let result = classifier.analyze("Подскажите график работы отделения");
        assert_eq!(result.intent, Intent::Consultation);
        assert_eq!(result.priority, 3);
        assert_eq!(result.sentiment, Sentiment::Neutral);
    }

    #[test]
    fn kazakh_letters_detected() {
        let classifier = KeywordClassifier::default_rules();
        assert_eq!(
            classifier.language("Сәлеметсіз бе! Көмегіңіз үшін рахмет"),
            Language::Kz
        );
    }

    #[test]
    fn latin_words_detected_as_english() {
        let classifier = KeywordClassifier::default_rules();
        assert_eq!(classifier.language("The app crashes"), Language::Eng);
        // Two Latin letters are not enough.
        assert_eq!(classifier.language("код ok"), Language::Ru);
    }

    #[test]
    fn positive_sentiment() {
        let classifier = KeywordClassifier::default_rules();
        assert_eq!(
            classifier.sentiment("Спасибо, всё отлично"),
            Sentiment::Positive
        );
    }

    #[test]
    fn empty_text_gets_empty_record() {
        let classifier = KeywordClassifier::default_rules();
        assert_eq!(classifier.analyze("   "), Classification::empty());
    }

    #[tokio::test]
    async fn classifier_trait_delegates_to_analyze() {
        let classifier = KeywordClassifier::default_rules();
        let result = classifier.classify("реклама: вы выиграли приз").await;
        assert_eq!(result.intent, Intent::Spam);
        assert_eq!(result.priority, 1);
    }
}
