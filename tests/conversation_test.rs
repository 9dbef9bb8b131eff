mod helpers;

use helpers::{observation_call, observation_count, scripted_orchestrator, shared_db, tool_request};
use lifelog::agent::{Agent, LanguageModel, ModelRequest, ModelTurn};
use lifelog::chat::{ChatSession, Orchestrator};
use lifelog::error::ModelError;

/// A model that always fails, standing in for network or quota trouble.
struct FailingModel;

impl LanguageModel for FailingModel {
    fn complete(&self, _request: &ModelRequest) -> Result<ModelTurn, ModelError> {
        Err(ModelError::Malformed("no output produced".into()))
    }
}

#[test]
fn multi_fact_message_fans_out_into_independent_writes() {
    let db = shared_db();
    let orchestrator = scripted_orchestrator(
        db.clone(),
        vec![ModelTurn {
            tool_calls: vec![
                observation_call("sleep", "Length of sleep", "Slept 8 hours"),
                observation_call("sleep", "Dreams", "No dreams"),
                // Invalid section: this one fails, the others stay committed
                observation_call("sleep", "Bedtime", "Bed at 10pm"),
            ],
            reply: "That sounds like a solid night. How did you feel waking up?".into(),
        }],
    );
    let mut session = ChatSession::new();

    let reply =
        orchestrator.handle_message(&mut session, "Slept 8 hours, no dreams, bedtime 10pm");
    assert!(!reply.response.is_empty());

    let conn = db.lock().unwrap();
    assert_eq!(observation_count(&conn, "sleep"), 2);
    drop(conn);

    let summary = orchestrator.get_summary("sleep").unwrap();
    assert!(summary.sections.contains_key("Length of sleep"));
    assert!(summary.sections.contains_key("Dreams"));
    assert!(!summary.sections.contains_key("Bedtime"));
    assert_eq!(session.current_category.as_deref(), Some("sleep"));
}

#[test]
fn decline_produces_a_reply_and_zero_writes() {
    let db = shared_db();
    let orchestrator = scripted_orchestrator(
        db.clone(),
        vec![ModelTurn {
            tool_calls: Vec::new(),
            reply: "That's completely fine. We can talk about whatever feels right.".into(),
        }],
    );
    let mut session = ChatSession::new();

    let reply = orchestrator.handle_message(&mut session, "I don't want to talk about that");
    assert!(!reply.response.is_empty());
    assert!(session.current_category.is_none());

    let conn = db.lock().unwrap();
    let total: i64 = conn
        .query_row("SELECT COUNT(*) FROM section_observations", [], |r| r.get(0))
        .unwrap();
    assert_eq!(total, 0);
}

#[test]
fn empty_message_is_answered_without_touching_history() {
    let db = shared_db();
    let orchestrator = scripted_orchestrator(db, Vec::new());
    let mut session = ChatSession::new();

    let reply = orchestrator.handle_message(&mut session, "");
    assert!(!reply.response.is_empty());
    assert!(session.history.is_empty());
}

#[test]
fn model_failure_is_a_soft_turn_and_history_is_retryable() {
    let db = shared_db();
    let orchestrator = Orchestrator::new(db.clone(), Agent::new(Box::new(FailingModel)), 5, 14);
    let mut session = ChatSession::new();

    let reply = orchestrator.handle_message(&mut session, "Slept 8 hours");
    assert!(!reply.response.is_empty());
    assert!(session.history.is_empty(), "failed turn must not be recorded");

    let conn = db.lock().unwrap();
    let total: i64 = conn
        .query_row("SELECT COUNT(*) FROM section_observations", [], |r| r.get(0))
        .unwrap();
    assert_eq!(total, 0);
}

#[test]
fn unknown_tool_degrades_to_text_instead_of_failing_the_turn() {
    let db = shared_db();
    let orchestrator = scripted_orchestrator(
        db.clone(),
        vec![ModelTurn {
            tool_calls: vec![tool_request("compose_sonnet", serde_json::json!({}))],
            reply: String::new(),
        }],
    );
    let mut session = ChatSession::new();

    let reply = orchestrator.handle_message(&mut session, "write me a sonnet");
    // The turn still completes conversationally
    assert!(!reply.response.is_empty());
    assert_eq!(session.history.len(), 2);
    assert!(session.current_category.is_none());
}

#[test]
fn successful_turn_seeds_the_next_turns_context() {
    let db = shared_db();
    let orchestrator = scripted_orchestrator(
        db.clone(),
        vec![
            ModelTurn {
                tool_calls: vec![observation_call("sleep", "Schedule", "Bed at 10pm")],
                reply: "Got it, an earlier night then.".into(),
            },
            ModelTurn {
                tool_calls: Vec::new(),
                reply: "Sounds good.".into(),
            },
        ],
    );
    let mut session = ChatSession::new();

    orchestrator.handle_message(&mut session, "Went to bed at 10pm");
    assert_eq!(session.current_category.as_deref(), Some("sleep"));
    assert_eq!(session.history.len(), 2);

    orchestrator.handle_message(&mut session, "thanks");
    assert_eq!(session.history.len(), 4);
    // The documented fact is on file for the category carried across turns
    let summary = orchestrator.get_summary("sleep").unwrap();
    assert_eq!(
        summary.sections.get("Schedule").unwrap()[0].observation,
        "Bed at 10pm"
    );
}

#[test]
fn list_categories_matches_the_registry_order() {
    let db = shared_db();
    let orchestrator = scripted_orchestrator(db, Vec::new());

    let ids: Vec<&str> = orchestrator.list_categories().iter().map(|c| c.id).collect();
    assert_eq!(
        ids,
        vec![
            "journaling",
            "sleep",
            "physical",
            "social",
            "productivity",
            "spiritual",
            "self_care"
        ]
    );
}
