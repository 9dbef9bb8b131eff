//! The language-model-driven dispatcher.
//!
//! Provides the [`LanguageModel`] trait (one `complete` call per turn) with
//! two implementations: an OpenAI-compatible HTTP client and a
//! deterministic scripted stand-in. [`Agent`] wraps a model together with
//! the tool table and runs the per-turn loop: one model call, then zero or
//! more tool dispatches, each validated like any external caller and each
//! its own atomic unit. Tool failures degrade to explanatory text; only a
//! model-transport failure is surfaced to the orchestrator.

pub mod openai;
pub mod prompt;
pub mod scripted;

use std::sync::{Arc, Mutex};

use anyhow::Result;
use rusqlite::Connection;

use crate::config::ModelConfig;
use crate::error::ModelError;
use crate::tools::{self, ToolCall, ToolOutcome, ToolSpec};

/// One message in the ordered list handed to the model.
#[derive(Debug, Clone)]
pub struct RequestMessage {
    /// `"user"` or `"assistant"`.
    pub role: String,
    pub content: String,
}

impl RequestMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".into(),
            content: content.into(),
        }
    }
}

/// Everything the model sees for one turn.
#[derive(Debug)]
pub struct ModelRequest {
    pub system_prompt: String,
    pub messages: Vec<RequestMessage>,
    pub tools: Vec<ToolSpec>,
}

/// A tool invocation requested by the model, still unvalidated.
#[derive(Debug)]
pub struct ToolRequest {
    pub name: String,
    pub arguments: serde_json::Value,
}

/// The model's output for one turn: zero or more tool requests plus a
/// natural-language reply (possibly empty when only tools were requested).
#[derive(Debug)]
pub struct ModelTurn {
    pub tool_calls: Vec<ToolRequest>,
    pub reply: String,
}

/// The substitutable language-model capability.
///
/// One synchronous call per conversation turn; no streaming. Callers in
/// async contexts should use `tokio::task::spawn_blocking`.
pub trait LanguageModel: Send + Sync {
    fn complete(&self, request: &ModelRequest) -> Result<ModelTurn, ModelError>;
}

/// Create a language model from config.
///
/// `"openai"` requires an API key in the configured environment variable;
/// without one the scripted stand-in is used so the rest of the app keeps
/// working offline.
pub fn create_model(config: &ModelConfig) -> Result<Box<dyn LanguageModel>> {
    match config.provider.as_str() {
        "openai" => match std::env::var(&config.api_key_env) {
            Ok(key) if !key.is_empty() => Ok(Box::new(openai::OpenAiModel::new(config.clone(), key))),
            _ => {
                tracing::warn!(
                    env = %config.api_key_env,
                    "no API key found, falling back to the scripted model"
                );
                Ok(Box::new(scripted::ScriptedModel::offline()))
            }
        },
        "scripted" => Ok(Box::new(scripted::ScriptedModel::offline())),
        other => anyhow::bail!("unknown model provider: {other}. Supported: openai, scripted"),
    }
}

/// Result of one agent turn.
#[derive(Debug)]
pub struct AgentTurn {
    pub reply: String,
    /// Category of the last successful tool call this turn, if any.
    pub touched_category: Option<String>,
}

const NO_REPLY_FALLBACK: &str = "I'm not sure how to respond to that. Could you tell me more?";

/// A language model bound to the tool table and system prompt.
pub struct Agent {
    model: Box<dyn LanguageModel>,
    system_prompt: String,
    tools: Vec<ToolSpec>,
}

impl Agent {
    pub fn new(model: Box<dyn LanguageModel>) -> Self {
        let tools = tools::specs();
        let system_prompt = prompt::system_prompt(&tools);
        Self {
            model,
            system_prompt,
            tools,
        }
    }

    /// Run one conversation turn: a single model call, then dispatch of any
    /// requested tool calls.
    ///
    /// Tool calls already committed stay committed regardless of later
    /// failures in the same turn. The db lock is taken per tool call, never
    /// across the model call.
    pub fn run_turn(
        &self,
        db: &Arc<Mutex<Connection>>,
        window_days: i64,
        context: &str,
        message: &str,
    ) -> Result<AgentTurn, ModelError> {
        let content = if context.is_empty() {
            message.to_string()
        } else {
            format!("Current context:\n{context}\n\nUser message: {message}")
        };

        let request = ModelRequest {
            system_prompt: self.system_prompt.clone(),
            messages: vec![RequestMessage::user(content)],
            tools: self.tools.clone(),
        };

        let turn = self.model.complete(&request)?;
        tracing::debug!(
            tool_calls = turn.tool_calls.len(),
            reply_len = turn.reply.len(),
            "model turn received"
        );

        let mut touched_category = None;
        let mut acknowledgements = Vec::new();
        for call in turn.tool_calls {
            let name = call.name.clone();
            match execute_tool(db, window_days, call) {
                Ok(outcome) => {
                    if outcome.category_id.is_some() {
                        touched_category = outcome.category_id;
                    }
                    acknowledgements.push(outcome.message);
                }
                Err(err) => {
                    tracing::warn!(tool = %name, error = %err, "tool call failed, degrading to text");
                    acknowledgements.push(format!("(could not document that: {err})"));
                }
            }
        }

        let reply = if !turn.reply.trim().is_empty() {
            turn.reply
        } else if !acknowledgements.is_empty() {
            acknowledgements.join("\n")
        } else {
            NO_REPLY_FALLBACK.to_string()
        };

        Ok(AgentTurn {
            reply,
            touched_category,
        })
    }
}

/// Parse and dispatch one tool request. The agent gets no privileged
/// bypass: validation runs exactly as it would for an external caller.
fn execute_tool(
    db: &Arc<Mutex<Connection>>,
    window_days: i64,
    call: ToolRequest,
) -> Result<ToolOutcome> {
    let parsed = ToolCall::parse(&call.name, call.arguments)?;
    let mut conn = db
        .lock()
        .map_err(|e| anyhow::anyhow!("db lock poisoned: {e}"))?;
    Ok(tools::dispatch(&mut conn, window_days, parsed)?)
}
