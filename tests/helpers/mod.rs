#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use lifelog::agent::scripted::ScriptedModel;
use lifelog::agent::{Agent, ModelTurn, ToolRequest};
use lifelog::chat::Orchestrator;
use lifelog::db;
use rusqlite::{params, Connection};

/// Open a fresh in-memory database with schema applied and categories seeded.
pub fn test_db() -> Connection {
    db::open_memory_database().unwrap()
}

pub fn shared_db() -> Arc<Mutex<Connection>> {
    Arc::new(Mutex::new(test_db()))
}

/// Build an orchestrator over `db` whose model plays back `turns` in order.
pub fn scripted_orchestrator(db: Arc<Mutex<Connection>>, turns: Vec<ModelTurn>) -> Orchestrator {
    Orchestrator::new(db, Agent::new(Box::new(ScriptedModel::new(turns))), 5, 14)
}

pub fn tool_request(name: &str, arguments: serde_json::Value) -> ToolRequest {
    ToolRequest {
        name: name.to_string(),
        arguments,
    }
}

/// A record_section_observation request as the model would emit it.
pub fn observation_call(category: &str, section: &str, text: &str) -> ToolRequest {
    tool_request(
        "record_section_observation",
        serde_json::json!({
            "category_id": category,
            "section_name": section,
            "observations": text,
        }),
    )
}

/// Insert an observation row with an explicit timestamp, bypassing the
/// store's clock. Used to stage rows outside the summary window.
pub fn insert_observation_at(
    conn: &Connection,
    category: &str,
    section: &str,
    text: &str,
    recorded_at: &str,
) {
    conn.execute(
        "INSERT INTO section_observations (category_id, section_name, observation, recorded_at) \
         VALUES (?1, ?2, ?3, ?4)",
        params![category, section, text, recorded_at],
    )
    .unwrap();
}

/// Count all observation rows for a category, in or out of the window.
pub fn observation_count(conn: &Connection, category: &str) -> i64 {
    conn.query_row(
        "SELECT COUNT(*) FROM section_observations WHERE category_id = ?1",
        params![category],
        |row| row.get(0),
    )
    .unwrap()
}
