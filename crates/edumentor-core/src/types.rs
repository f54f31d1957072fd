use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Structured tutoring answer returned to the learner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TutorReply {
    pub answer: String,
    /// At most three suggested next questions, in model order.
    pub follow_up_suggestions: Vec<String>,
}

/// A single quiz question with its expected answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizItem {
    pub prompt: String,
    /// Multiple-choice options. Current flows never populate this.
    pub choices: Option<Vec<String>>,
    pub answer: String,
}

impl QuizItem {
    pub fn new(prompt: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            choices: None,
            answer: answer.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivityKind {
    Question,
    Quiz,
}

/// One observed learner action. Immutable once recorded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActivityEvent {
    pub id: String,
    pub raw_text: String,
    pub kind: ActivityKind,
    pub topic: String,
    pub date: NaiveDate,
}

impl ActivityEvent {
    pub fn question(raw_text: impl Into<String>, topic: impl Into<String>, date: NaiveDate) -> Self {
        Self::new(ActivityKind::Question, raw_text, topic, date)
    }

    pub fn quiz(raw_text: impl Into<String>, topic: impl Into<String>, date: NaiveDate) -> Self {
        Self::new(ActivityKind::Quiz, raw_text, topic, date)
    }

    fn new(
        kind: ActivityKind,
        raw_text: impl Into<String>,
        topic: impl Into<String>,
        date: NaiveDate,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            raw_text: raw_text.into(),
            kind,
            topic: topic.into(),
            date,
        }
    }
}

/// A topic label and the lowercase keywords that select it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopicRule {
    pub label: String,
    pub keywords: Vec<String>,
}

impl TopicRule {
    pub fn new(label: &str, keywords: &[&str]) -> Self {
        Self {
            label: label.to_string(),
            keywords: keywords.iter().map(|k| k.to_string()).collect(),
        }
    }
}
