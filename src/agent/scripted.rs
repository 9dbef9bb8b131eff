//! Deterministic stand-in for the language-model substrate.
//!
//! Plays back a queue of pre-scripted turns, then falls back to a fixed
//! reply with no tool calls. Used by tests and as the offline mode when no
//! API key is configured; swaps in for the HTTP model without any change to
//! the orchestrator.

use std::collections::VecDeque;
use std::sync::Mutex;

use crate::error::ModelError;

use super::{LanguageModel, ModelRequest, ModelTurn};

const OFFLINE_REPLY: &str = "I'm running without a language model right now, so I can chat \
                             but nothing new will be documented. You can still browse your \
                             categories and summaries.";

pub struct ScriptedModel {
    turns: Mutex<VecDeque<ModelTurn>>,
    fallback: String,
}

impl ScriptedModel {
    /// Play back `turns` in order, then answer with the offline fallback.
    pub fn new(turns: Vec<ModelTurn>) -> Self {
        Self {
            turns: Mutex::new(turns.into()),
            fallback: OFFLINE_REPLY.to_string(),
        }
    }

    /// No scripted turns at all: every message gets the offline fallback.
    pub fn offline() -> Self {
        Self::new(Vec::new())
    }
}

impl LanguageModel for ScriptedModel {
    fn complete(&self, _request: &ModelRequest) -> Result<ModelTurn, ModelError> {
        let mut turns = self
            .turns
            .lock()
            .map_err(|_| ModelError::Malformed("scripted model lock poisoned".into()))?;
        Ok(turns.pop_front().unwrap_or_else(|| ModelTurn {
            tool_calls: Vec::new(),
            reply: self.fallback.clone(),
        }))
    }
}
