use std::time::Duration;

use async_openai::config::OpenAIConfig;
use async_openai::types::{
    ChatCompletionRequestMessage, ChatCompletionRequestUserMessageArgs,
    CreateChatCompletionRequestArgs,
};
use async_openai::Client;
use async_trait::async_trait;
use tracing::debug;

use crate::config::ProviderConfig;
use crate::error::{Result, TutorError};

/// An opaque text-completion backend: prompt in, text out.
#[async_trait]
pub trait CompletionService: Send + Sync {
    async fn complete(&self, model: &str, prompt: &str) -> Result<String>;
}

/// Completion service speaking the OpenAI chat-completions protocol.
///
/// Gemini exposes a compatible endpoint, which is the default `api_base`.
pub struct OpenAiCompatService {
    client: Client<OpenAIConfig>,
    max_tokens: u32,
    temperature: f32,
}

impl OpenAiCompatService {
    pub fn new(config: &ProviderConfig, api_key: &str) -> Result<Self> {
        let openai_config = OpenAIConfig::new()
            .with_api_base(&config.api_base)
            .with_api_key(api_key);

        // Transport-level bound; the completion client applies its own timeout too.
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client: Client::with_config(openai_config).with_http_client(http_client),
            max_tokens: config.max_tokens,
            temperature: config.temperature,
        })
    }
}

#[async_trait]
impl CompletionService for OpenAiCompatService {
    async fn complete(&self, model: &str, prompt: &str) -> Result<String> {
        let message = ChatCompletionRequestUserMessageArgs::default()
            .content(prompt)
            .build()
            .map_err(|e| TutorError::Provider(e.to_string()))?;
        let messages: Vec<ChatCompletionRequestMessage> = vec![message.into()];

        let request = CreateChatCompletionRequestArgs::default()
            .model(model)
            .messages(messages)
            .temperature(self.temperature)
            .max_completion_tokens(self.max_tokens)
            .build()
            .map_err(|e| TutorError::Provider(e.to_string()))?;

        debug!(model, prompt_len = prompt.len(), "Sending completion request");

        let response = self
            .client
            .chat()
            .create(request)
            .await
            .map_err(|e| TutorError::Provider(e.to_string()))?;

        let choice = response
            .choices
            .first()
            .ok_or_else(|| TutorError::Provider("No choices in response".into()))?;

        non_blank(choice.message.content.clone())
    }
}

/// A choice without text, or with only whitespace, counts as a failed call.
fn non_blank(content: Option<String>) -> Result<String> {
    match content {
        Some(text) if !text.trim().is_empty() => Ok(text),
        _ => Err(TutorError::Provider("Empty completion".into())),
    }
}
