mod client;
pub(crate) mod types;

use std::time::Duration;

use async_trait::async_trait;

use crate::error::AiError;
use crate::traits::{ChatModel, ChatOptions, Message};

use client::OpenAiClient;

/// Default HTTP timeout for a single chat completion.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

// =============================================================================
// OpenAi Agent
// =============================================================================

#[derive(Clone)]
pub struct OpenAi {
    api_key: String,
    pub(crate) model: String,
    base_url: Option<String>,
    timeout: Duration,
}

impl OpenAi {
    /// An empty `api_key` is accepted here; requests then fail with
    /// [`AiError::Config`] instead of reaching the network.
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: model.into(),
            base_url: None,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn from_env(model: impl Into<String>) -> Result<Self, AiError> {
        let api_key = std::env::var("OPENAI_API_KEY")
            .map_err(|_| AiError::Config("OPENAI_API_KEY environment variable not set".into()))?;
        Ok(Self::new(api_key, model))
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Get the model name.
    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub(crate) fn client(&self) -> Result<OpenAiClient, AiError> {
        let client = OpenAiClient::new(&self.api_key, self.timeout)?;
        Ok(match self.base_url {
            Some(ref url) => client.with_base_url(url),
            None => client,
        })
    }

    /// Single chat completion returning the first choice's text.
    pub async fn chat_completion(
        &self,
        messages: Vec<Message>,
        options: ChatOptions,
    ) -> Result<String, AiError> {
        let mut request =
            types::ChatRequest::new(&self.model).messages(messages.into_iter().map(Into::into));

        if types::uses_max_completion_tokens(&self.model) {
            if let Some(max) = options.max_tokens {
                request = request.max_completion_tokens(max);
            }
        } else {
            if let Some(max) = options.max_tokens {
                request = request.max_tokens(max);
            }
            if let Some(temp) = options.temperature {
                request = request.temperature(temp);
            }
        }

        let response = self.client()?.chat(&request).await?;

        response
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .filter(|content| !content.trim().is_empty())
            .ok_or_else(|| AiError::Api("No response from OpenAI".to_string()))
    }
}

// =============================================================================
// ChatModel Implementation
// =============================================================================

#[async_trait]
impl ChatModel for OpenAi {
    async fn chat(&self, messages: Vec<Message>, options: ChatOptions) -> Result<String, AiError> {
        self.chat_completion(messages, options).await
    }
}
