//! Completion client with one-shot model selection and silent fallback.
//!
//! The first call to [`CompletionClient::tutor_completion`] or
//! [`CompletionClient::quiz_completion`] runs initialization: each candidate
//! model gets a smoke prompt and the first one that answers is kept for the
//! life of the process. If none answers, or no credential was configured, the
//! client stays in fallback mode and serves canned responses. Initialization
//! never runs twice, even when it failed.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::OnceCell;
use tracing::{info, warn};

use crate::config::AppConfig;
use crate::error::{Result, TutorError};
use crate::parser::{parse_quiz_items, parse_tutor_reply, MAX_ITEMS};
use crate::prompts::{PromptTemplates, SMOKE_PROMPT};
use crate::provider::{CompletionService, OpenAiCompatService};
use crate::types::{QuizItem, TutorReply};

/// Number of quiz questions requested when the caller has no preference.
pub const DEFAULT_QUIZ_QUESTIONS: usize = 3;

/// Observable initialization state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientState {
    Uninitialized,
    Live { model: String },
    Fallback,
}

#[derive(Debug)]
enum Readiness {
    Live(String),
    Fallback,
}

pub struct CompletionClient {
    service: Option<Arc<dyn CompletionService>>,
    models: Vec<String>,
    templates: PromptTemplates,
    timeout: Duration,
    /// Environment variable named in canned replies.
    credential_env: String,
    readiness: OnceCell<Readiness>,
}

impl CompletionClient {
    /// Build a client against the configured provider.
    ///
    /// A missing or placeholder credential yields a client that will settle
    /// into fallback mode on first use.
    pub fn from_config(config: &AppConfig) -> Self {
        let service = match config.provider.resolve_api_key() {
            Some(key) => match OpenAiCompatService::new(&config.provider, &key) {
                Ok(service) => Some(Arc::new(service) as Arc<dyn CompletionService>),
                Err(e) => {
                    warn!("Failed to build completion service: {}", e);
                    None
                }
            },
            None => {
                warn!(
                    "{} not set, completion client will use fallback responses",
                    config.provider.api_key_env
                );
                None
            }
        };
        Self::new(service, config)
    }

    /// Build a client with an explicit service, or `None` for fallback only.
    pub fn new(service: Option<Arc<dyn CompletionService>>, config: &AppConfig) -> Self {
        Self {
            service,
            models: config.provider.models.clone(),
            templates: config.prompts.clone(),
            timeout: Duration::from_secs(config.provider.timeout_secs),
            credential_env: config.provider.api_key_env.clone(),
            readiness: OnceCell::new(),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn state(&self) -> ClientState {
        match self.readiness.get() {
            None => ClientState::Uninitialized,
            Some(Readiness::Live(model)) => ClientState::Live {
                model: model.clone(),
            },
            Some(Readiness::Fallback) => ClientState::Fallback,
        }
    }

    async fn ready(&self) -> &Readiness {
        self.readiness.get_or_init(|| self.initialize()).await
    }

    async fn initialize(&self) -> Readiness {
        let Some(service) = &self.service else {
            warn!("No completion credential configured, using fallback responses");
            return Readiness::Fallback;
        };

        for model in &self.models {
            match self.bounded(service.complete(model, SMOKE_PROMPT)).await {
                Ok(_) => {
                    info!("Completion service ready with model {}", model);
                    return Readiness::Live(model.clone());
                }
                Err(e) => warn!("Model {} failed smoke test: {}", model, e),
            }
        }

        warn!(
            "All {} candidate models failed, using fallback responses",
            self.models.len()
        );
        Readiness::Fallback
    }

    async fn bounded<F>(&self, call: F) -> Result<String>
    where
        F: Future<Output = Result<String>>,
    {
        let text = tokio::time::timeout(self.timeout, call)
            .await
            .map_err(|_| TutorError::Timeout(self.timeout.as_secs()))??;
        if text.trim().is_empty() {
            return Err(TutorError::Provider("Empty completion".into()));
        }
        Ok(text)
    }

    /// Answer a learner question. Never fails; degrades to a canned reply.
    pub async fn tutor_completion(&self, question: &str) -> TutorReply {
        let (service, model) = match (self.ready().await, &self.service) {
            (Readiness::Live(model), Some(service)) => (service, model),
            _ => return fallback_tutor_reply(question, &self.credential_env),
        };

        let prompt = self.templates.render_tutor(question);
        match self.bounded(service.complete(model, &prompt)).await {
            Ok(text) => parse_tutor_reply(&text, question),
            Err(e) => {
                warn!("Tutor completion failed: {}", e);
                fallback_tutor_reply(question, &self.credential_env)
            }
        }
    }

    /// Generate quiz items for `topic`. Never fails; at most three items.
    pub async fn quiz_completion(&self, topic: &str, num_questions: usize) -> Vec<QuizItem> {
        let (service, model) = match (self.ready().await, &self.service) {
            (Readiness::Live(model), Some(service)) => (service, model),
            _ => return fallback_quiz(topic, &self.credential_env),
        };

        let prompt = self.templates.render_quiz(topic, num_questions);
        match self.bounded(service.complete(model, &prompt)).await {
            Ok(text) => {
                let mut items = parse_quiz_items(&text);
                items.truncate(MAX_ITEMS);
                items
            }
            Err(e) => {
                warn!("Quiz completion failed: {}", e);
                fallback_quiz(topic, &self.credential_env)
            }
        }
    }
}

fn fallback_tutor_reply(question: &str, credential_env: &str) -> TutorReply {
    TutorReply {
        answer: format!(
            "I received your question about '{question}'. \
             To provide intelligent AI-powered responses, please configure the Gemini API key. \
             Visit https://makersuite.google.com/app/apikey to get a free API key, \
             then add it to your .env file as {credential_env}=your_key_here. \
             Once configured, I'll provide detailed, contextual explanations with African examples!"
        ),
        follow_up_suggestions: vec![
            "How do I set up the Gemini API?".into(),
            "What makes EduMentor different from other tutors?".into(),
            "Can you explain STEM topics with African context?".into(),
        ],
    }
}

fn fallback_quiz(topic: &str, credential_env: &str) -> Vec<QuizItem> {
    vec![QuizItem::new(
        format!("To generate intelligent quizzes on '{topic}', please configure the Gemini API."),
        format!("Set up your {credential_env} in the .env file to unlock AI-powered quiz generation."),
    )]
}
