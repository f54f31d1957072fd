//! Engagement aggregation over learner activity.
//!
//! Counts questions and quizzes per topic and per calendar day, then derives
//! the streak, a 0-100 engagement score, and mastered/review topic lists. All
//! derived values are recomputed from the counters on every call.

use chrono::{Duration, Local, NaiveDate};
use edumentor_core::types::{ActivityEvent, ActivityKind, TopicRule};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};
use tracing::debug;

use crate::classifier::TopicClassifier;

/// Tally weight of a tutoring question.
const QUESTION_WEIGHT: u32 = 1;
/// Tally weight of a quiz request.
const QUIZ_WEIGHT: u32 = 2;
/// Minimum tally for a topic to count as mastered.
const MASTERY_THRESHOLD: u32 = 3;
const MAX_MASTERED: usize = 5;
const MAX_REVIEW: usize = 3;

/// Snapshot of learner progress.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EngagementSummary {
    pub streak_days: u32,
    pub engagement_score: u32,
    pub mastered_topics: Vec<String>,
    pub review_topics: Vec<String>,
    pub total_questions: u32,
    pub total_quizzes: u32,
    pub topics_explored: u32,
}

/// In-memory engagement counters for one learner process.
#[derive(Debug, Clone, Default)]
pub struct EngagementAggregator {
    classifier: TopicClassifier,
    /// Append-only activity log.
    events: Vec<ActivityEvent>,
    /// Weighted interactions per topic.
    topic_tally: HashMap<String, u32>,
    /// Quiz requests per normalized topic.
    quiz_tally: HashMap<String, u32>,
    /// Distinct days with any activity.
    active_days: BTreeSet<NaiveDate>,
}

impl EngagementAggregator {
    pub fn new(topics: Vec<TopicRule>) -> Self {
        Self {
            classifier: TopicClassifier::new(topics),
            ..Self::default()
        }
    }

    /// Record a tutoring question asked today.
    pub fn record_question(&mut self, text: &str) {
        self.record_question_on(text, today());
    }

    /// Record a tutoring question on a given day.
    pub fn record_question_on(&mut self, text: &str, date: NaiveDate) {
        let topic = self.classifier.classify(text);
        debug!(topic = %topic, "Recorded question");

        *self.topic_tally.entry(topic.clone()).or_insert(0) += QUESTION_WEIGHT;
        self.events.push(ActivityEvent::question(text, topic, date));
        self.active_days.insert(date);
    }

    /// Record a quiz request made today.
    pub fn record_quiz(&mut self, topic: &str) {
        self.record_quiz_on(topic, today());
    }

    /// Record a quiz request on a given day. The topic is title-cased.
    pub fn record_quiz_on(&mut self, topic: &str, date: NaiveDate) {
        let normalized = title_case(topic);
        debug!(topic = %normalized, "Recorded quiz");

        *self.quiz_tally.entry(normalized.clone()).or_insert(0) += 1;
        *self.topic_tally.entry(normalized.clone()).or_insert(0) += QUIZ_WEIGHT;
        self.events.push(ActivityEvent::quiz(topic, normalized, date));
        self.active_days.insert(date);
    }

    /// Consecutive active days ending at the most recent one.
    pub fn streak_days(&self) -> u32 {
        let mut days = self.active_days.iter().rev();
        let Some(mut current) = days.next().copied() else {
            return 0;
        };

        let mut streak = 1;
        for &day in days {
            if day != current - Duration::days(1) {
                break;
            }
            streak += 1;
            current = day;
        }
        streak
    }

    /// Engagement score in `0..=100`.
    pub fn engagement_score(&self) -> u32 {
        let questions = self.total_questions();
        let quizzes = self.total_quizzes();
        if questions == 0 && quizzes == 0 {
            return 0;
        }

        let score = (questions * 5).min(40)
            + (quizzes * 10).min(30)
            + (self.topics_explored() * 5).min(20)
            + (self.streak_days() * 2).min(10);
        score.min(100)
    }

    /// Topics with a tally of at least three, sorted, at most five.
    pub fn mastered_topics(&self) -> Vec<String> {
        self.topics_where(MAX_MASTERED, |count| count >= MASTERY_THRESHOLD)
    }

    /// Topics seen once or twice, sorted, at most three.
    pub fn review_topics(&self) -> Vec<String> {
        self.topics_where(MAX_REVIEW, |count| (1..MASTERY_THRESHOLD).contains(&count))
    }

    fn topics_where(&self, limit: usize, keep: impl Fn(u32) -> bool) -> Vec<String> {
        let mut topics: Vec<String> = self
            .topic_tally
            .iter()
            .filter(|(_, count)| keep(**count))
            .map(|(topic, _)| topic.clone())
            .collect();
        topics.sort();
        topics.truncate(limit);
        topics
    }

    pub fn total_questions(&self) -> u32 {
        self.events
            .iter()
            .filter(|e| e.kind == ActivityKind::Question)
            .count() as u32
    }

    pub fn total_quizzes(&self) -> u32 {
        self.quiz_tally.values().sum()
    }

    /// Number of distinct topics touched by questions or quizzes.
    pub fn topics_explored(&self) -> u32 {
        self.topic_tally.len() as u32
    }

    /// Weighted tally for a single topic.
    pub fn topic_count(&self, topic: &str) -> u32 {
        self.topic_tally.get(topic).copied().unwrap_or(0)
    }

    pub fn events(&self) -> &[ActivityEvent] {
        &self.events
    }

    pub fn summary(&self) -> EngagementSummary {
        EngagementSummary {
            streak_days: self.streak_days(),
            engagement_score: self.engagement_score(),
            mastered_topics: self.mastered_topics(),
            review_topics: self.review_topics(),
            total_questions: self.total_questions(),
            total_quizzes: self.total_quizzes(),
            topics_explored: self.topics_explored(),
        }
    }

    /// Clear all activity. The classifier table is kept.
    pub fn reset(&mut self) {
        self.events.clear();
        self.topic_tally.clear();
        self.quiz_tally.clear();
        self.active_days.clear();
    }
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Uppercase the first letter of each word and lowercase the rest.
///
/// Apostrophes stay inside a word, so "newton's laws" becomes "Newton's Laws"
/// and lines up with the classifier label.
pub fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_word = false;
    for c in text.chars() {
        if c.is_alphabetic() {
            if in_word {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            in_word = true;
        } else {
            out.push(c);
            in_word = c == '\'' && in_word;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, d).unwrap()
    }

    #[test]
    fn test_empty_aggregator() {
        let agg = EngagementAggregator::default();
        assert_eq!(agg.streak_days(), 0);
        assert_eq!(agg.engagement_score(), 0);
        assert!(agg.mastered_topics().is_empty());
        assert!(agg.review_topics().is_empty());
        assert_eq!(
            agg.summary(),
            EngagementSummary {
                streak_days: 0,
                engagement_score: 0,
                mastered_topics: vec![],
                review_topics: vec![],
                total_questions: 0,
                total_quizzes: 0,
                topics_explored: 0,
            }
        );
    }

    #[test]
    fn test_quiz_weighs_double_and_reaches_mastery() {
        let mut agg = EngagementAggregator::default();

        agg.record_quiz("gravity");
        assert_eq!(agg.topic_count("Gravity"), 2);
        assert_eq!(agg.review_topics(), vec!["Gravity"]);

        agg.record_question("what causes gravity");
        assert_eq!(agg.topic_count("Gravity"), 3);
        assert_eq!(agg.mastered_topics(), vec!["Gravity"]);
        assert!(agg.review_topics().is_empty());
    }

    #[test]
    fn test_question_classification_feeds_tally() {
        let mut agg = EngagementAggregator::default();
        agg.record_question("How does chlorophyll absorb light?");
        agg.record_question("Something else entirely");

        assert_eq!(agg.topic_count("Photosynthesis"), 1);
        assert_eq!(agg.topic_count("General STEM"), 1);
        assert_eq!(agg.total_questions(), 2);
        assert_eq!(agg.topics_explored(), 2);

        let events = agg.events();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].kind, ActivityKind::Question);
        assert_eq!(events[0].topic, "Photosynthesis");
    }

    #[test]
    fn test_quiz_event_logged_with_normalized_topic() {
        let mut agg = EngagementAggregator::default();
        agg.record_quiz_on("renewable ENERGY", day(1));

        let events = agg.events();
        assert_eq!(events[0].kind, ActivityKind::Quiz);
        assert_eq!(events[0].raw_text, "renewable ENERGY");
        assert_eq!(events[0].topic, "Renewable Energy");
        assert_eq!(agg.total_quizzes(), 1);
        assert_eq!(agg.total_questions(), 0);
    }

    #[test]
    fn test_streak_stops_at_gap() {
        let mut agg = EngagementAggregator::default();
        agg.record_question_on("a", day(10));
        agg.record_question_on("b", day(9));
        agg.record_question_on("c", day(7));
        assert_eq!(agg.streak_days(), 2);
    }

    #[test]
    fn test_streak_counts_distinct_days() {
        let mut agg = EngagementAggregator::default();
        agg.record_question_on("a", day(5));
        agg.record_quiz_on("b", day(5));
        agg.record_question_on("c", day(4));
        agg.record_question_on("d", day(3));
        assert_eq!(agg.streak_days(), 3);
    }

    #[test]
    fn test_streak_counts_from_most_recent_day() {
        let mut agg = EngagementAggregator::default();
        agg.record_question_on("old", day(1));
        agg.record_question_on("old", day(2));
        agg.record_question_on("old", day(3));
        agg.record_question_on("new", day(20));
        assert_eq!(agg.streak_days(), 1);
    }

    #[test]
    fn test_engagement_score_formula() {
        let mut agg = EngagementAggregator::default();
        agg.record_question_on("gravity", day(1));
        // 1 question (5) + 0 quizzes + 1 topic (5) + streak 1 (2)
        assert_eq!(agg.engagement_score(), 12);

        agg.record_quiz_on("optics", day(2));
        // 5 + 10 + 2 topics (10) + streak 2 (4)
        assert_eq!(agg.engagement_score(), 29);
    }

    #[test]
    fn test_engagement_score_is_monotone_and_capped() {
        let mut agg = EngagementAggregator::default();
        let mut last = agg.engagement_score();
        assert_eq!(last, 0);

        let questions = [
            "photosynthesis", "newton", "gravity", "voltage", "cell", "rain",
            "atom", "kinetic", "darwin", "algebra", "velocity", "planet",
        ];
        for (i, q) in questions.iter().enumerate() {
            agg.record_question_on(q, day(1 + i as u32));
            agg.record_quiz_on(q, day(1 + i as u32));
            let score = agg.engagement_score();
            assert!(score >= last);
            last = score;
        }
        assert_eq!(last, 100);
    }

    #[test]
    fn test_mastered_sorted_and_truncated() {
        let mut agg = EngagementAggregator::default();
        for topic in ["zeta", "alpha", "mu", "beta", "omega", "delta"] {
            agg.record_quiz_on(topic, day(1));
            agg.record_quiz_on(topic, day(1));
        }
        assert_eq!(
            agg.mastered_topics(),
            vec!["Alpha", "Beta", "Delta", "Mu", "Omega"]
        );
    }

    #[test]
    fn test_review_sorted_and_truncated() {
        let mut agg = EngagementAggregator::default();
        for q in ["gravity", "voltage", "atom", "darwin"] {
            agg.record_question_on(q, day(1));
        }
        assert_eq!(
            agg.review_topics(),
            vec!["Chemistry", "Electricity", "Evolution"]
        );
    }

    #[test]
    fn test_reset_clears_everything() {
        let mut agg = EngagementAggregator::default();
        agg.record_question("gravity");
        agg.record_quiz("gravity");
        agg.reset();

        assert!(agg.events().is_empty());
        assert_eq!(agg.summary(), EngagementAggregator::default().summary());

        // Classifier survives the reset.
        agg.record_question("gravity");
        assert_eq!(agg.topic_count("Gravity"), 1);
    }

    #[test]
    fn test_custom_topic_table() {
        let mut agg = EngagementAggregator::new(vec![TopicRule::new("Robotics", &["robot"])]);
        agg.record_question_on("robot arms", day(1));
        assert_eq!(agg.topic_count("Robotics"), 1);
    }

    #[test]
    fn test_summary_serializes_camel_case() {
        let mut agg = EngagementAggregator::default();
        agg.record_question_on("gravity", day(1));
        let json = serde_json::to_value(agg.summary()).unwrap();
        assert_eq!(json["streakDays"], 1);
        assert_eq!(json["totalQuestions"], 1);
        assert_eq!(json["topicsExplored"], 1);
        assert_eq!(json["reviewTopics"][0], "Gravity");
    }

    #[test]
    fn test_title_case() {
        assert_eq!(title_case("gravity"), "Gravity");
        assert_eq!(title_case("newton's laws"), "Newton's Laws");
        assert_eq!(title_case("WATER cycle"), "Water Cycle");
        assert_eq!(title_case("3d shapes"), "3D Shapes");
        assert_eq!(title_case("  spaced  out "), "  Spaced  Out ");
        assert_eq!(title_case("'quoted'"), "'Quoted'");
    }
}
