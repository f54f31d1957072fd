pub mod completion;
pub mod config;
pub mod error;
pub mod parser;
pub mod prompts;
pub mod provider;
pub mod types;

pub use completion::{ClientState, CompletionClient};
pub use config::AppConfig;
pub use error::TutorError;
pub use provider::{CompletionService, OpenAiCompatService};
pub use types::{ActivityEvent, ActivityKind, QuizItem, TopicRule, TutorReply};
