//! Headless chat transcript for the assistant panel.
//!
//! Holds the message list, the search form the assistant writes into, and a
//! busy flag so only one utterance is interpreted at a time.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::task::JoinHandle;
use tracing::debug;

use crate::assistant::Assistant;
use crate::search_form::SearchForm;
use crate::types::{FlightRecord, InterpretationResult};

pub const GREETING: &str = "Hi! I'm your AI flight assistant. I can help you find flights, compare options, and answer travel questions. Try asking me something like 'Find flights from New York to Los Angeles' or 'Show me the cheapest business class options'.";

pub const SUGGESTIONS: [&str; 4] = [
    "Find cheap flights to Europe",
    "Business class to Tokyo",
    "Direct flights only",
    "Morning departures under $300",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    pub id: u64,
    pub role: ChatRole,
    pub content: String,
    pub timestamp: DateTime<Utc>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub flight_suggestions: Vec<FlightRecord>,
}

/// Result of one submitted utterance.
pub struct Turn {
    pub result: InterpretationResult,
    /// Spawned for non-empty filtered results. Await it and pass the text to
    /// [`ChatSession::append_recommendation`], or drop it.
    pub recommendation: Option<JoinHandle<String>>,
}

pub struct ChatSession {
    assistant: Assistant,
    catalog: Vec<FlightRecord>,
    form: SearchForm,
    messages: Vec<ChatMessage>,
    next_id: u64,
    busy: bool,
}

impl ChatSession {
    pub fn new(assistant: Assistant, catalog: Vec<FlightRecord>) -> Self {
        let mut session = Self {
            assistant,
            catalog,
            form: SearchForm::default(),
            messages: Vec::new(),
            next_id: 1,
            busy: false,
        };
        session.push(ChatRole::Assistant, GREETING.to_string(), Vec::new());
        session
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn form(&self) -> &SearchForm {
        &self.form
    }

    pub fn catalog(&self) -> &[FlightRecord] {
        &self.catalog
    }

    pub fn is_busy(&self) -> bool {
        self.busy
    }

    fn push(&mut self, role: ChatRole, content: String, flight_suggestions: Vec<FlightRecord>) {
        self.push_at(role, content, flight_suggestions, Utc::now());
    }

    fn push_at(
        &mut self,
        role: ChatRole,
        content: String,
        flight_suggestions: Vec<FlightRecord>,
        timestamp: DateTime<Utc>,
    ) {
        self.messages.push(ChatMessage {
            id: self.next_id,
            role,
            content,
            timestamp,
            flight_suggestions,
        });
        self.next_id += 1;
    }

    /// Trimmed utterance, or `None` for blank input or while busy.
    fn accept(&self, utterance: &str) -> Option<String> {
        let utterance = utterance.trim();
        if utterance.is_empty() || self.busy {
            debug!(busy = self.busy, "Ignoring utterance");
            return None;
        }
        Some(utterance.to_string())
    }

    /// Record the user's utterance and mark the session busy. Returns the
    /// trimmed utterance, or `None` for blank input or while busy.
    ///
    /// For drivers that show the utterance before the reply arrives; pair
    /// with [`Self::finish`] or [`Self::cancel`].
    pub fn begin(&mut self, utterance: &str) -> Option<String> {
        let utterance = self.accept(utterance)?;
        self.busy = true;
        self.push(ChatRole::User, utterance.clone(), Vec::new());
        Some(utterance)
    }

    /// Record the assistant's reply and apply any search parameters to the form.
    pub fn finish(&mut self, result: &InterpretationResult) {
        match result {
            InterpretationResult::GeneralSearch { parameters, message } => {
                self.form.apply(parameters);
                self.push(ChatRole::Assistant, message.clone(), Vec::new());
            }
            InterpretationResult::SpecificFilter { flights, message } => {
                self.push(ChatRole::Assistant, message.clone(), flights.clone());
            }
        }
        self.busy = false;
    }

    /// Abandon a turn opened with [`Self::begin`]: the pending utterance is
    /// removed and the session accepts input again.
    pub fn cancel(&mut self) {
        if !self.busy {
            return;
        }
        if self.messages.last().is_some_and(|m| m.role == ChatRole::User) {
            self.messages.pop();
        }
        self.busy = false;
    }

    /// Interpret one utterance end to end.
    ///
    /// Nothing is recorded until the reply is in, so dropping the returned
    /// future leaves the session as it was.
    pub async fn submit(&mut self, utterance: &str) -> Option<Turn> {
        let utterance = self.accept(utterance)?;
        let asked_at = Utc::now();

        let result = self.assistant.handle(&utterance, &self.catalog).await;

        self.push_at(ChatRole::User, utterance.clone(), Vec::new(), asked_at);
        self.finish(&result);

        let recommendation = (!result.flights().is_empty()).then(|| {
            self.assistant
                .spawn_recommendation(result.flights().to_vec(), utterance)
        });

        Some(Turn {
            result,
            recommendation,
        })
    }

    pub fn append_recommendation(&mut self, text: impl Into<String>) {
        let text = text.into();
        if !text.trim().is_empty() {
            self.push(ChatRole::Assistant, text, Vec::new());
        }
    }
}
