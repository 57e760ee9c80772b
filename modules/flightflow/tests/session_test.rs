//! Chat transcript behaviour: greeting, input guards, form updates and
//! late-arriving recommendations.

use std::time::Duration;

use ai_client::AiError;
use serde_json::json;

use flightflow::catalog::seed_flights;
use flightflow::session::GREETING;
use flightflow::testing::ScriptedModel;
use flightflow::{CabinClass, ChatRole, ChatSession};

#[tokio::test]
async fn session_opens_with_greeting() {
    let (_, assistant) = ScriptedModel::new().into_assistant();
    let session = ChatSession::new(assistant, seed_flights());

    assert_eq!(session.messages().len(), 1);
    assert_eq!(session.messages()[0].role, ChatRole::Assistant);
    assert_eq!(session.messages()[0].content, GREETING);
    assert!(!session.is_busy());
}

#[tokio::test]
async fn blank_input_is_ignored() {
    let (model, assistant) = ScriptedModel::new().into_assistant();
    let mut session = ChatSession::new(assistant, seed_flights());

    assert!(session.submit("   ").await.is_none());
    assert_eq!(session.messages().len(), 1);
    assert!(model.calls().is_empty());
}

#[tokio::test]
async fn input_while_busy_is_ignored() {
    let (_, assistant) = ScriptedModel::new().into_assistant();
    let mut session = ChatSession::new(assistant, seed_flights());

    assert_eq!(session.begin(" direct flights ").as_deref(), Some("direct flights"));
    assert!(session.is_busy());
    assert!(session.begin("morning flights").is_none());
    assert_eq!(session.messages().len(), 2);
}

#[tokio::test]
async fn general_search_fills_the_form() {
    let (_, assistant) = ScriptedModel::new()
        .reply_json(json!({
            "message": "Searching New York to Tokyo.",
            "searchQuery": {"from": "New York", "to": "Tokyo", "class": "premium"},
            "isSpecificQuery": false
        }))
        .into_assistant();
    let mut session = ChatSession::new(assistant, seed_flights());

    let turn = session
        .submit("flights from New York to Tokyo in premium")
        .await
        .expect("turn");

    assert!(turn.recommendation.is_none());
    assert!(!session.is_busy());
    assert_eq!(session.form().from, "New York");
    assert_eq!(session.form().to, "Tokyo");
    assert_eq!(session.form().cabin_class, CabinClass::Premium);
    assert_eq!(session.form().passengers, 1);

    let roles: Vec<ChatRole> = session.messages().iter().map(|m| m.role).collect();
    assert_eq!(roles, vec![ChatRole::Assistant, ChatRole::User, ChatRole::Assistant]);
    assert_eq!(session.messages()[1].content, "flights from New York to Tokyo in premium");
}

#[tokio::test]
async fn filtered_results_attach_suggestions_and_recommendation() {
    // Interpretation fails, so the keyword filter answers; the recommendation
    // call then gets the next scripted reply.
    let (model, assistant) = ScriptedModel::new()
        .fail(AiError::Network("dns".into()))
        .reply("The 19:15 United flight is the cheapest direct option.")
        .into_assistant();
    let mut session = ChatSession::new(assistant, seed_flights());

    let turn = session.submit("cheap flights tonight").await.expect("turn");

    let reply = session.messages().last().unwrap();
    assert_eq!(reply.content, "I found 1 flight matching your criteria:");
    assert_eq!(reply.flight_suggestions.len(), 1);
    assert_eq!(reply.flight_suggestions[0].flight_number, "UA9012");

    let text = turn
        .recommendation
        .expect("recommendation task")
        .await
        .unwrap();
    session.append_recommendation(text);

    let last = session.messages().last().unwrap();
    assert_eq!(last.content, "The 19:15 United flight is the cheapest direct option.");
    assert_eq!(model.calls().len(), 2);

    let ids: Vec<u64> = session.messages().iter().map(|m| m.id).collect();
    assert!(ids.windows(2).all(|w| w[0] < w[1]));
}

#[tokio::test]
async fn empty_specific_result_spawns_no_recommendation() {
    let (model, assistant) = ScriptedModel::new().into_assistant();
    let mut session = ChatSession::new(assistant, seed_flights());

    let turn = session.submit("first class seats").await.expect("turn");

    assert!(turn.result.flights().is_empty());
    assert!(turn.recommendation.is_none());
    assert_eq!(model.calls().len(), 1);
}

#[tokio::test]
async fn dropped_submit_leaves_session_usable() {
    let (model, assistant) = ScriptedModel::new()
        .slow(
            Duration::from_secs(5),
            r#"{"message": "too late", "isSpecificQuery": false}"#,
        )
        .into_assistant();
    let mut session = ChatSession::new(assistant, seed_flights());

    let cancelled =
        tokio::time::timeout(Duration::from_millis(20), session.submit("direct flights")).await;
    assert!(cancelled.is_err());

    assert!(!session.is_busy());
    assert_eq!(session.messages().len(), 1);
    assert_eq!(session.form(), &flightflow::SearchForm::default());

    // Script is exhausted: the keyword fallback answers.
    let turn = session.submit("morning flights").await.expect("accepted");
    assert_eq!(turn.result.flights().len(), 3);
    assert_eq!(session.messages().len(), 3);
    assert_eq!(session.messages()[1].content, "morning flights");
    assert!(model.calls().len() >= 2);
}

#[tokio::test]
async fn cancel_discards_pending_utterance() {
    let (_, assistant) = ScriptedModel::new().into_assistant();
    let mut session = ChatSession::new(assistant, seed_flights());

    session.begin("direct flights").expect("accepted");
    session.cancel();

    assert!(!session.is_busy());
    assert_eq!(session.messages().len(), 1);
    assert!(session.begin("morning flights").is_some());
}
