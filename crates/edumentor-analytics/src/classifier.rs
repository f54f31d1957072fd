use edumentor_core::config::default_topics;
use edumentor_core::types::TopicRule;

/// Label returned when no keyword matches.
pub const GENERAL_TOPIC: &str = "General STEM";

/// Keyword-substring topic classifier.
///
/// Rules are scanned in order and, within a rule, keywords in order. The first
/// keyword found in the lowercased input decides the topic.
#[derive(Debug, Clone)]
pub struct TopicClassifier {
    rules: Vec<TopicRule>,
}

impl TopicClassifier {
    pub fn new(rules: Vec<TopicRule>) -> Self {
        let rules = rules
            .into_iter()
            .map(|rule| TopicRule {
                label: rule.label,
                keywords: rule.keywords.iter().map(|k| k.to_lowercase()).collect(),
            })
            .collect();
        Self { rules }
    }

    pub fn classify(&self, text: &str) -> String {
        let lower = text.to_lowercase();
        self.rules
            .iter()
            .find(|rule| rule.keywords.iter().any(|k| lower.contains(k.as_str())))
            .map(|rule| rule.label.clone())
            .unwrap_or_else(|| GENERAL_TOPIC.to_string())
    }
}

impl Default for TopicClassifier {
    fn default() -> Self {
        Self::new(default_topics())
    }
}
