//! Prompt templates sent to the completion service.
//!
//! Templates are plain strings with `{placeholder}` slots so the wording and
//! the regional framing can be changed from the config file without touching
//! the parsing contract. The contract the parser relies on:
//!
//! - tutor replies carry one `ANSWER:` line and up to three `FOLLOW_UP_n:` lines
//! - quiz replies carry `Qn:` / `An:` line pairs (extra `En:` lines are ignored)

use serde::{Deserialize, Serialize};

/// Prompt sent once per candidate model during initialization.
pub const SMOKE_PROMPT: &str = "Say hello";

const TUTOR_TEMPLATE: &str = "\
You are EduMentor, an AI tutor for African students.

CORE REQUIREMENT: integrate African examples throughout your explanation, not just at the end.

Student Question: {question}

Instructions:
1. Keep your answer brief and engaging (3-5 short sentences or bullet points)
2. START with a relatable African context or example that connects to the concept
3. Explain the science clearly using simple language
4. Weave 1-2 more African examples into the explanation
5. End with a practical application relevant to African communities
6. Provide 3 short follow-up questions

African Context Examples to Use:
{context_examples}

Format your response as:
ANSWER: [Start with an African example, explain the science briefly with more examples integrated throughout, end with a practical application]
FOLLOW_UP_1: [first follow-up question]
FOLLOW_UP_2: [second follow-up question]
FOLLOW_UP_3: [third follow-up question]
";

const QUIZ_TEMPLATE: &str = "\
You are creating a STEM quiz on: {topic}

Instructions for questions:
- Create {num_questions} clear multiple-choice or short-answer questions that focus on core concepts.
- DO NOT include region-specific or African context in the question text. Keep questions neutral.

Instructions for answers/explanations:
- For each question include the correct answer and a one-sentence explanation that includes a brief African example or application.

Output format exactly as:
Q1: [Question text]
A1: [Correct answer]
E1: [One-sentence explanation that includes a short African example]

Example:
Q1: What is acceleration?
A1: 3 m/s^2
E1: Using a = (v-u)/t; Example: a boda-boda accelerating from 0 to 15 m/s in 5 s gives 3 m/s^2.
";

/// Configurable prompt wording.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PromptTemplates {
    /// Tutor template. Slots: `{question}`, `{context_examples}`.
    pub tutor: String,
    /// Quiz template. Slots: `{topic}`, `{num_questions}`.
    pub quiz: String,
    /// Example categories rendered as a bullet list into the tutor template.
    pub context_examples: Vec<String>,
}

impl Default for PromptTemplates {
    fn default() -> Self {
        Self {
            tutor: TUTOR_TEMPLATE.into(),
            quiz: QUIZ_TEMPLATE.into(),
            context_examples: vec![
                "Transportation: boda-bodas, matatus, tuk-tuks".into(),
                "Agriculture: cassava, maize farming, irrigation".into(),
                "Technology: M-Pesa, solar panels, mobile networks".into(),
                "Geography: Lake Victoria, Mount Kilimanjaro, Sahara Desert".into(),
                "Daily life: marketplaces, water wells, community gatherings".into(),
            ],
        }
    }
}

impl PromptTemplates {
    pub fn render_tutor(&self, question: &str) -> String {
        let examples = self
            .context_examples
            .iter()
            .map(|e| format!("- {}", e))
            .collect::<Vec<_>>()
            .join("\n");
        // Learner text goes in last so it is never scanned for slots.
        self.tutor
            .replace("{context_examples}", &examples)
            .replace("{question}", question)
    }

    pub fn render_quiz(&self, topic: &str, num_questions: usize) -> String {
        self.quiz
            .replace("{num_questions}", &num_questions.to_string())
            .replace("{topic}", topic)
    }
}
