//! Conversation orchestrator - session state, context assembly, turn handling.
//!
//! [`ChatSession`] is an explicit state object owned by the front door and
//! passed into every call; the orchestrator itself keeps no per-conversation
//! state. One turn at a time per session: the front door must not start a
//! second `handle_message` against the same session before the previous
//! reply is produced. A failed turn leaves the session history untouched so
//! the user can retry it.

use std::sync::{Arc, Mutex, MutexGuard};

use rusqlite::Connection;
use serde::{Deserialize, Serialize};

use crate::agent::Agent;
use crate::error::StoreError;
use crate::store::{self, CategorySummary};
use crate::taxonomy::{self, Category};

/// Fixed greeting emitted when a session starts. No storage access.
pub const GREETING: &str = "Hey! What's up? How have you been doing?";

const CLARIFICATION: &str = "I'm sorry, I didn't understand that. Could you tell me more?";
const APOLOGY: &str = "I'm having trouble responding right now. Could you try that again?";

/// Who said a turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    User,
    Assistant,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::User => "User",
            Self::Assistant => "Assistant",
        })
    }
}

/// One (role, content) exchange entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatTurn {
    pub role: Role,
    pub content: String,
}

/// Per-conversation state. Created at session start, discarded at logout;
/// never persisted to the documentation store.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct ChatSession {
    /// Full exchange history. Grows unbounded; only the most recent turns
    /// are surfaced into model context.
    pub history: Vec<ChatTurn>,
    /// The last category touched by any successful tool call.
    pub current_category: Option<String>,
}

impl ChatSession {
    pub fn new() -> Self {
        Self::default()
    }
}

/// The reply envelope returned to the front door for every turn.
#[derive(Debug, Serialize)]
pub struct TurnResponse {
    pub response: String,
}

/// Drives conversations: builds context, delegates to the agent, applies
/// the session updates a completed turn implies.
pub struct Orchestrator {
    db: Arc<Mutex<Connection>>,
    agent: Agent,
    history_window: usize,
    summary_window_days: i64,
}

impl Orchestrator {
    pub fn new(
        db: Arc<Mutex<Connection>>,
        agent: Agent,
        history_window: usize,
        summary_window_days: i64,
    ) -> Self {
        Self {
            db,
            agent,
            history_window,
            summary_window_days,
        }
    }

    // Transactions keep the database consistent even if a writer panicked
    // while holding the lock.
    fn conn(&self) -> MutexGuard<'_, Connection> {
        self.db.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Open a session with the fixed greeting.
    pub fn start(&self) -> TurnResponse {
        TurnResponse {
            response: GREETING.to_string(),
        }
    }

    /// The fixed category list, for the front door.
    pub fn list_categories(&self) -> &'static [Category] {
        taxonomy::list_categories()
    }

    /// The windowed summary of one category, for the front door.
    pub fn get_summary(&self, category_id: &str) -> Result<CategorySummary, StoreError> {
        store::get_summary(&self.conn(), category_id, self.summary_window_days)
    }

    /// Process one user message against the given session.
    ///
    /// Empty input short-circuits with a fixed clarification and mutates
    /// nothing. Any failure during the turn is reported as a soft
    /// conversational reply, never a hard error; tool calls that committed
    /// before the failure remain committed.
    pub fn handle_message(&self, session: &mut ChatSession, text: &str) -> TurnResponse {
        if text.is_empty() {
            return TurnResponse {
                response: CLARIFICATION.to_string(),
            };
        }

        let context = self.build_context(session);
        match self
            .agent
            .run_turn(&self.db, self.summary_window_days, &context, text)
        {
            Ok(turn) => {
                if let Some(category) = turn.touched_category {
                    session.current_category = Some(category);
                }
                session.history.push(ChatTurn {
                    role: Role::User,
                    content: text.to_string(),
                });
                session.history.push(ChatTurn {
                    role: Role::Assistant,
                    content: turn.reply.clone(),
                });
                TurnResponse {
                    response: turn.reply,
                }
            }
            Err(err) => {
                tracing::warn!(error = %err, "turn failed, history left unmodified");
                TurnResponse {
                    response: APOLOGY.to_string(),
                }
            }
        }
    }

    /// Render the rolling context: the most recent history turns, then the
    /// documentation already on file for the current category.
    fn build_context(&self, session: &ChatSession) -> String {
        let mut lines: Vec<String> = Vec::new();

        let start = session.history.len().saturating_sub(self.history_window);
        for turn in &session.history[start..] {
            lines.push(format!("{}: {}", turn.role, turn.content));
        }

        if let Some(category_id) = &session.current_category {
            match store::get_summary(&self.conn(), category_id, self.summary_window_days) {
                Ok(summary) => {
                    lines.push(format!("Currently discussing: {category_id}"));
                    if !summary.next_steps.is_empty() {
                        lines.push(format!("Next steps we discussed: {}", summary.next_steps));
                    }
                    if !summary.notes.is_empty() {
                        lines.push(format!("Additional notes: {}", summary.notes));
                    }
                    for (section, entries) in &summary.sections {
                        for entry in entries {
                            lines.push(format!(
                                "{section} [{}]: {}",
                                entry.timestamp, entry.observation
                            ));
                        }
                    }
                }
                Err(err) => {
                    tracing::warn!(category = %category_id, error = %err, "context summary failed")
                }
            }
        }

        lines.join("\n")
    }
}
