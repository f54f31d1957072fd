//! Best-effort shaping of raw model text into tutor replies and quiz items.
//!
//! Nothing here returns an error. Text that does not follow the prompt
//! contract degrades to a still-valid value: the raw text as the answer, or
//! fewer quiz items.

use crate::types::{QuizItem, TutorReply};
use tracing::{debug, warn};

const ANSWER_MARKER: &str = "ANSWER:";
const FOLLOW_UP_MARKER: &str = "FOLLOW_UP_";

/// Upper bound on follow-ups and quiz items handed back to callers.
pub const MAX_ITEMS: usize = 3;

/// Parse a tutor-mode completion.
///
/// `question` is only used to phrase synthesized follow-ups when the model
/// produced none.
pub fn parse_tutor_reply(text: &str, question: &str) -> TutorReply {
    let Some((answer_lines, mut follow_ups)) = split_tutor_sections(text) else {
        warn!("Tutor reply has a malformed follow-up line, returning raw text");
        return TutorReply {
            answer: text.to_string(),
            follow_up_suggestions: Vec::new(),
        };
    };

    let mut answer = answer_lines.join(" ").trim().to_string();
    if answer.is_empty() {
        debug!("No ANSWER section found, using full completion text");
        answer = text.to_string();
    }

    if follow_ups.is_empty() {
        follow_ups = synthesized_follow_ups(question);
    }
    follow_ups.truncate(MAX_ITEMS);

    TutorReply {
        answer,
        follow_up_suggestions: follow_ups,
    }
}

/// Returns `None` when a `FOLLOW_UP_` line has no colon.
fn split_tutor_sections(text: &str) -> Option<(Vec<String>, Vec<String>)> {
    let mut answer_lines = Vec::new();
    let mut follow_ups = Vec::new();
    let mut in_answer = false;

    for line in text.trim().lines().map(str::trim) {
        if line.starts_with(ANSWER_MARKER) {
            in_answer = true;
            answer_lines.push(line.replace(ANSWER_MARKER, "").trim().to_string());
        } else if line.starts_with(FOLLOW_UP_MARKER) {
            let (_, rest) = line.split_once(':')?;
            follow_ups.push(rest.trim().to_string());
        } else if in_answer && !line.is_empty() {
            answer_lines.push(line.to_string());
        }
    }

    Some((answer_lines, follow_ups))
}

fn synthesized_follow_ups(question: &str) -> Vec<String> {
    let words: Vec<&str> = question.split_whitespace().collect();
    let subject = if words.len() > 1 {
        words[words.len() - 2]
    } else {
        "this topic"
    };
    vec![
        format!("Can you explain more about {}?", subject),
        "How is this applied in real life?".to_string(),
        "What are common misconceptions about this?".to_string(),
    ]
}

/// Parse a quiz-mode completion of `Qn:` / `An:` lines.
///
/// Pairs missing either half are dropped. At most [`MAX_ITEMS`] are returned.
pub fn parse_quiz_items(text: &str) -> Vec<QuizItem> {
    let mut items = Vec::new();
    let mut prompt: Option<String> = None;
    let mut answer: Option<String> = None;

    for line in text.trim().lines().map(str::trim) {
        if line.starts_with('Q') {
            flush_pair(&mut items, prompt.take(), answer.take());
            prompt = Some(after_colon(line));
        } else if line.starts_with('A') {
            answer = Some(after_colon(line));
        }
    }
    flush_pair(&mut items, prompt, answer);

    items.truncate(MAX_ITEMS);
    items
}

fn flush_pair(items: &mut Vec<QuizItem>, prompt: Option<String>, answer: Option<String>) {
    if let (Some(prompt), Some(answer)) = (prompt, answer) {
        if !prompt.is_empty() && !answer.is_empty() {
            items.push(QuizItem::new(prompt, answer));
        }
    }
}

fn after_colon(line: &str) -> String {
    match line.split_once(':') {
        Some((_, rest)) => rest.trim().to_string(),
        None => line.to_string(),
    }
}
