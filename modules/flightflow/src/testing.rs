// Test doubles for the ChatModel boundary.
//
// ScriptedModel replays queued replies in order and records every request,
// so interpreter and session tests run without network or credentials.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use ai_client::{AiError, ChatModel, ChatOptions, Message, MessageRole};
use async_trait::async_trait;

use crate::assistant::Assistant;

enum Scripted {
    Reply(Result<String, AiError>),
    Slow(Duration, String),
}

/// One request seen by a [`ScriptedModel`].
#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub messages: Vec<Message>,
    pub options: ChatOptions,
}

impl RecordedCall {
    pub fn system(&self) -> &str {
        self.turn(MessageRole::System)
    }

    pub fn user(&self) -> &str {
        self.turn(MessageRole::User)
    }

    fn turn(&self, role: MessageRole) -> &str {
        self.messages
            .iter()
            .find(|m| m.role == role)
            .map(|m| m.content.as_str())
            .unwrap_or_default()
    }
}

/// Queue-based chat model. An exhausted queue fails like an unreachable host.
/// Builder pattern: `.reply()`, `.reply_json()`, `.fail()`, `.slow()`.
#[derive(Default)]
pub struct ScriptedModel {
    script: Mutex<VecDeque<Scripted>>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl ScriptedModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reply(self, text: impl Into<String>) -> Self {
        self.push(Scripted::Reply(Ok(text.into())))
    }

    pub fn reply_json(self, value: serde_json::Value) -> Self {
        self.reply(value.to_string())
    }

    pub fn fail(self, error: AiError) -> Self {
        self.push(Scripted::Reply(Err(error)))
    }

    /// Reply with `text` after `delay`.
    pub fn slow(self, delay: Duration, text: impl Into<String>) -> Self {
        self.push(Scripted::Slow(delay, text.into()))
    }

    fn push(self, item: Scripted) -> Self {
        self.script.lock().unwrap().push_back(item);
        self
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn into_assistant(self) -> (Arc<Self>, Assistant) {
        let model = Arc::new(self);
        let assistant = Assistant::new(model.clone());
        (model, assistant)
    }
}

#[async_trait]
impl ChatModel for ScriptedModel {
    async fn chat(&self, messages: Vec<Message>, options: ChatOptions) -> Result<String, AiError> {
        self.calls
            .lock()
            .unwrap()
            .push(RecordedCall { messages, options });

        let next = self.script.lock().unwrap().pop_front();
        match next {
            Some(Scripted::Reply(reply)) => reply,
            Some(Scripted::Slow(delay, text)) => {
                tokio::time::sleep(delay).await;
                Ok(text)
            }
            None => Err(AiError::Network("no scripted reply left".to_string())),
        }
    }
}
