//! Learner analytics for edumentor.
//!
//! Classifies questions into topics and aggregates observed activity into
//! streaks, an engagement score, and mastered/review topic lists.

pub mod aggregations;
pub mod classifier;

pub use aggregations::{EngagementAggregator, EngagementSummary};
pub use classifier::{TopicClassifier, GENERAL_TOPIC};
