//! The query orchestrator: remote interpretation first, keyword fallback on
//! any failure. [`Assistant::handle`] always produces a renderable result.

use std::sync::Arc;
use std::time::Duration;

use ai_client::{ChatModel, OpenAi};
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::config::Config;
use crate::error::InterpretError;
use crate::interpreter::{within, ModelReply, RemoteInterpreter};
use crate::recommendation::Recommender;
use crate::types::{FlightRecord, InterpretationResult};
use crate::{extractor, keyword_filter};

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

pub const SEARCH_FORM_SUFFIX: &str =
    " I've updated the search form with your preferences. You can view the results in the main area.";
pub const NO_MATCH_MESSAGE: &str = "I couldn't find any flights matching your specific criteria. Try adjusting your requirements or use the main search form to explore more options.";
pub const FALLBACK_SEARCH_MESSAGE: &str =
    "I'll help you search for flights. Let me update the search form with your preferences.";
pub const FALLBACK_TROUBLE_MESSAGE: &str = "I'm having trouble finding flights that match your specific criteria. Please try a different search or use the main search form.";

fn found_message(count: usize) -> String {
    let plural = if count > 1 { "s" } else { "" };
    format!("I found {count} flight{plural} matching your criteria:")
}

/// Map a validated model reply onto the caller-facing result.
fn resolve(reply: ModelReply) -> InterpretationResult {
    if reply.is_specific_query {
        match reply.filtered_flights {
            Some(flights) if !flights.is_empty() => InterpretationResult::SpecificFilter {
                flights,
                message: reply.message,
            },
            _ => InterpretationResult::SpecificFilter {
                flights: Vec::new(),
                message: NO_MATCH_MESSAGE.to_string(),
            },
        }
    } else {
        InterpretationResult::GeneralSearch {
            parameters: reply.search_query.unwrap_or_default(),
            message: format!("{}{}", reply.message.trim_end(), SEARCH_FORM_SUFFIX),
        }
    }
}

fn looks_like_route(utterance: &str) -> bool {
    let text = utterance.to_lowercase();
    text.contains("from") && text.contains("to")
}

/// Deterministic offline interpretation.
///
/// Route-shaped utterances (mentioning both "from" and "to") become a general
/// search; everything else is filtered against the catalog by keyword.
pub fn fallback(utterance: &str, catalog: &[FlightRecord]) -> InterpretationResult {
    if looks_like_route(utterance) {
        return InterpretationResult::GeneralSearch {
            parameters: extractor::extract(utterance),
            message: FALLBACK_SEARCH_MESSAGE.to_string(),
        };
    }

    let flights = keyword_filter::filter(utterance, catalog);
    let message = if flights.is_empty() {
        FALLBACK_TROUBLE_MESSAGE.to_string()
    } else {
        found_message(flights.len())
    };

    InterpretationResult::SpecificFilter { flights, message }
}

#[derive(Clone)]
pub struct Assistant {
    interpreter: RemoteInterpreter,
    recommender: Recommender,
    timeout: Duration,
}

impl Assistant {
    pub fn new(model: Arc<dyn ChatModel>) -> Self {
        Self {
            interpreter: RemoteInterpreter::new(model.clone()),
            recommender: Recommender::new(model, DEFAULT_TIMEOUT),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Bound every remote call; expiry degrades like any other remote failure.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self.recommender = self.recommender.with_timeout(timeout);
        self
    }

    pub fn from_config(config: &Config) -> Self {
        let mut model = OpenAi::new(&config.openai_api_key, &config.openai_model)
            .with_timeout(config.timeout);
        if let Some(ref url) = config.openai_base_url {
            model = model.with_base_url(url);
        }
        Self::new(Arc::new(model)).with_timeout(config.timeout)
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    async fn interpret(
        &self,
        utterance: &str,
        catalog: &[FlightRecord],
    ) -> Result<ModelReply, InterpretError> {
        within(self.timeout, self.interpreter.interpret(utterance, catalog)).await
    }

    /// Interpret `utterance` against `catalog`. Never fails.
    pub async fn handle(&self, utterance: &str, catalog: &[FlightRecord]) -> InterpretationResult {
        match self.interpret(utterance, catalog).await {
            Ok(reply) => {
                let result = resolve(reply);
                info!(
                    specific = result.is_specific(),
                    flights = result.flights().len(),
                    "Utterance interpreted remotely"
                );
                result
            }
            Err(e) => {
                warn!(error = %e, kind = e.kind(), "Remote interpretation failed; using keyword fallback");
                let result = fallback(utterance, catalog);
                info!(
                    specific = result.is_specific(),
                    flights = result.flights().len(),
                    "Utterance interpreted offline"
                );
                result
            }
        }
    }

    /// Conversational text about `flights`. Never fails.
    pub async fn generate_recommendation(&self, flights: &[FlightRecord], utterance: &str) -> String {
        self.recommender.generate(flights, utterance).await
    }

    /// Run [`Self::generate_recommendation`] as its own task. Await the handle
    /// to append the text later, or drop/abort it to discard.
    pub fn spawn_recommendation(
        &self,
        flights: Vec<FlightRecord>,
        utterance: String,
    ) -> JoinHandle<String> {
        let recommender = self.recommender.clone();
        tokio::spawn(async move { recommender.generate(&flights, &utterance).await })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::seed_flights;
    use crate::types::SearchParameters;

    #[test]
    fn general_reply_gets_form_suffix() {
        let result = resolve(ModelReply {
            message: "Looking up Paris to Tokyo.".into(),
            is_specific_query: false,
            search_query: None,
            filtered_flights: None,
        });
        match result {
            InterpretationResult::GeneralSearch { parameters, message } => {
                assert_eq!(parameters, SearchParameters::default());
                assert!(message.starts_with("Looking up Paris to Tokyo."));
                assert!(message.ends_with(SEARCH_FORM_SUFFIX));
            }
            other => panic!("expected general search, got {other:?}"),
        }
    }

    #[test]
    fn specific_reply_without_flights_apologises() {
        let result = resolve(ModelReply {
            message: "Here you go".into(),
            is_specific_query: true,
            search_query: None,
            filtered_flights: Some(Vec::new()),
        });
        assert_eq!(
            result,
            InterpretationResult::SpecificFilter {
                flights: Vec::new(),
                message: NO_MATCH_MESSAGE.to_string(),
            }
        );
    }

    #[test]
    fn fallback_count_message_pluralises() {
        assert_eq!(found_message(1), "I found 1 flight matching your criteria:");
        assert_eq!(found_message(3), "I found 3 flights matching your criteria:");
    }

    #[test]
    fn fallback_routes_on_from_and_to() {
        let catalog = seed_flights();
        assert!(!fallback("FROM Paris TO Tokyo", &catalog).is_specific());
        // "to" only needs to appear somewhere, as in "tomorrow".
        assert!(!fallback("from Denver tomorrow", &catalog).is_specific());
        assert!(fallback("from Denver", &catalog).is_specific());
    }

    #[test]
    fn fallback_with_no_matches_reports_trouble() {
        let result = fallback("business class please", &seed_flights());
        assert_eq!(
            result,
            InterpretationResult::SpecificFilter {
                flights: Vec::new(),
                message: FALLBACK_TROUBLE_MESSAGE.to_string(),
            }
        );
    }
}
