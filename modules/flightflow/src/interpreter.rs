//! Remote interpretation: ask the chat model to classify an utterance and
//! either extract search parameters or filter the catalog.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use ai_client::{strip_code_blocks, truncate_to_char_boundary, ChatModel, ChatOptions, Message};
use schemars::{schema_for, JsonSchema};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::InterpretError;
use crate::types::{FlightRecord, SearchParameters};

/// Low temperature: classification should be repeatable.
pub const INTERPRET_TEMPERATURE: f32 = 0.3;
pub const INTERPRET_MAX_TOKENS: u32 = 1500;

/// What the model must reply with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ModelReply {
    /// Natural, helpful reply shown to the user
    pub message: String,
    /// true when the user wants the listed flights filtered; false for a new search
    pub is_specific_query: bool,
    /// Extracted search parameters (general searches only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search_query: Option<SearchParameters>,
    /// Matching flights copied from the catalog (specific queries only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filtered_flights: Option<Vec<FlightRecord>>,
}

const TASK_DESCRIPTION: &str = r#"You are a helpful flight booking assistant. Analyze user queries about flights and respond in a natural, conversational way.

Your tasks:
1. Determine if the user is asking for a general flight search or specific filtering
2. Extract search parameters (from, to, departure, return, passengers, class, preferences) if it's a general search
3. If it's a specific query (like "business class flights after 6 PM"), filter the available flights and return the matching ones
4. Provide a helpful, natural response

For general searches (like "flights from Paris to Tokyo"):
- Set isSpecificQuery to false
- Extract search parameters into the searchQuery object
- Provide a message saying you're updating the search form

For specific filtering requests (like "only morning flights in business class"):
- Set isSpecificQuery to true
- Filter the available flights based on the criteria
- Return the matching flights in the filteredFlights array, copied exactly as they appear in the data
- Provide a helpful message about the results

Always respond with a single valid JSON object and nothing else, in this exact format:
{
  "message": "Your natural, helpful response here",
  "searchQuery": { "from": "city", "to": "city" } (only for general searches),
  "filteredFlights": [flight objects] (only for specific filtering),
  "isSpecificQuery": true/false
}"#;

/// Build the system turn: task description, catalog, and reply schema.
pub fn system_prompt(catalog: &[FlightRecord]) -> Result<String, InterpretError> {
    let flights = serde_json::to_string_pretty(catalog)?;
    let schema = serde_json::to_string_pretty(&schema_for!(ModelReply))?;

    Ok(format!(
        "{TASK_DESCRIPTION}\n\nAvailable flights data:\n{flights}\n\nReply JSON schema:\n{schema}"
    ))
}

/// Parse a raw model reply, tolerating surrounding code fences.
pub fn parse_reply(raw: &str) -> Result<ModelReply, InterpretError> {
    let body = strip_code_blocks(raw);
    if body.is_empty() {
        return Err(InterpretError::Parse("empty reply".to_string()));
    }

    let mut reply: ModelReply = serde_json::from_str(body).map_err(|e| {
        InterpretError::Parse(format!(
            "{e} in reply starting {:?}",
            truncate_to_char_boundary(body, 120)
        ))
    })?;

    if reply.message.trim().is_empty() {
        return Err(InterpretError::Parse("reply message is empty".to_string()));
    }

    reply.search_query = reply.search_query.map(SearchParameters::normalized);
    Ok(reply)
}

/// Run `fut`, turning expiry into [`InterpretError::Remote`].
pub(crate) async fn within<T, F>(timeout: Duration, fut: F) -> Result<T, InterpretError>
where
    F: Future<Output = Result<T, InterpretError>>,
{
    tokio::time::timeout(timeout, fut).await.map_err(|_| {
        InterpretError::Remote(format!("no reply within {} ms", timeout.as_millis()))
    })?
}

/// Client for the remote interpretation round trip. One request per call,
/// no retry.
#[derive(Clone)]
pub struct RemoteInterpreter {
    model: Arc<dyn ChatModel>,
}

impl RemoteInterpreter {
    pub fn new(model: Arc<dyn ChatModel>) -> Self {
        Self { model }
    }

    pub async fn interpret(
        &self,
        utterance: &str,
        catalog: &[FlightRecord],
    ) -> Result<ModelReply, InterpretError> {
        let messages = vec![Message::system(system_prompt(catalog)?), Message::user(utterance)];
        let options = ChatOptions::default()
            .temperature(INTERPRET_TEMPERATURE)
            .max_tokens(INTERPRET_MAX_TOKENS);

        debug!(catalog = catalog.len(), "Requesting remote interpretation");

        let raw = self.model.chat(messages, options).await?;
        let reply = parse_reply(&raw)?;

        info!(
            specific = reply.is_specific_query,
            flights = reply.filtered_flights.as_ref().map_or(0, Vec::len),
            "Remote interpretation parsed"
        );

        Ok(reply)
    }
}
