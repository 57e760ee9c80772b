//! Conversational recommendations for an already-filtered flight list.

use std::sync::Arc;
use std::time::Duration;

use ai_client::{ChatModel, ChatOptions, Message};
use tracing::{info, warn};

use crate::error::InterpretError;
use crate::interpreter::within;
use crate::types::FlightRecord;

/// Higher temperature: recommendations should read less canned.
pub const RECOMMEND_TEMPERATURE: f32 = 0.8;
pub const RECOMMEND_MAX_TOKENS: u32 = 200;

pub const GENERIC_RECOMMENDATION: &str = "Here are some great flight options for you!";

pub fn system_prompt(flights: &[FlightRecord], preferences: &str) -> Result<String, InterpretError> {
    let flights = serde_json::to_string_pretty(flights)?;
    let preferences = match preferences.trim() {
        "" => "None specified",
        p => p,
    };

    Ok(format!(
        "You are a travel expert. Given these flight options, provide personalized recommendations in a natural, conversational way.\n\n\
         Flight options:\n{flights}\n\n\
         User preferences: {preferences}\n\n\
         Provide a brief, helpful recommendation highlighting the best options and why. \
         Be conversational and helpful. Keep it under 150 words and don't use JSON formatting."
    ))
}

#[derive(Clone)]
pub struct Recommender {
    model: Arc<dyn ChatModel>,
    timeout: Duration,
}

impl Recommender {
    pub fn new(model: Arc<dyn ChatModel>, timeout: Duration) -> Self {
        Self { model, timeout }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    async fn request(&self, flights: &[FlightRecord], utterance: &str) -> Result<String, InterpretError> {
        let messages = vec![
            Message::system(system_prompt(flights, utterance)?),
            Message::user("What do you recommend?"),
        ];
        let options = ChatOptions::default()
            .temperature(RECOMMEND_TEMPERATURE)
            .max_tokens(RECOMMEND_MAX_TOKENS);

        let text = within(self.timeout, async {
            self.model
                .chat(messages, options)
                .await
                .map_err(InterpretError::from)
        })
        .await?;

        Ok(text.trim().to_string())
    }

    /// Free-text recommendation; [`GENERIC_RECOMMENDATION`] on any failure.
    pub async fn generate(&self, flights: &[FlightRecord], utterance: &str) -> String {
        match self.request(flights, utterance).await {
            Ok(text) if !text.is_empty() => {
                info!(flights = flights.len(), "Recommendation generated");
                text
            }
            Ok(_) => GENERIC_RECOMMENDATION.to_string(),
            Err(e) => {
                warn!(error = %e, kind = e.kind(), "Recommendation failed; using generic text");
                GENERIC_RECOMMENDATION.to_string()
            }
        }
    }
}
