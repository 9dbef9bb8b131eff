//! OpenAI-compatible chat-completions client.
//!
//! Talks to any endpoint speaking the `/chat/completions` wire format with
//! native function calling. One blocking request per turn; tool parameter
//! schemas from the tool table are passed through as function schemas.

use std::time::Duration;

use schemars::Schema;
use serde::{Deserialize, Serialize};

use crate::config::ModelConfig;
use crate::error::ModelError;

use super::{LanguageModel, ModelRequest, ModelTurn, ToolRequest};

pub struct OpenAiModel {
    config: ModelConfig,
    api_key: String,
}

impl OpenAiModel {
    pub fn new(config: ModelConfig, api_key: String) -> Self {
        Self { config, api_key }
    }
}

// ── Wire format ───────────────────────────────────────────────────────────────

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<WireMessage<'a>>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    tools: Vec<WireTool<'a>>,
}

#[derive(Serialize)]
struct WireMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Serialize)]
struct WireTool<'a> {
    r#type: &'static str,
    function: WireFunction<'a>,
}

#[derive(Serialize)]
struct WireFunction<'a> {
    name: &'a str,
    description: &'a str,
    parameters: &'a Schema,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
    #[serde(default)]
    tool_calls: Vec<WireToolCall>,
}

#[derive(Deserialize)]
struct WireToolCall {
    function: WireFunctionCall,
}

#[derive(Deserialize)]
struct WireFunctionCall {
    name: String,
    /// JSON-encoded keyword arguments, as a string per the wire format.
    arguments: String,
}

impl LanguageModel for OpenAiModel {
    fn complete(&self, request: &ModelRequest) -> Result<ModelTurn, ModelError> {
        // The blocking client must not be built on an async runtime thread;
        // complete() always runs on a blocking thread, one request per turn.
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(self.config.timeout_secs))
            .build()?;

        let mut messages = vec![WireMessage {
            role: "system",
            content: &request.system_prompt,
        }];
        for message in &request.messages {
            messages.push(WireMessage {
                role: &message.role,
                content: &message.content,
            });
        }

        let body = ChatRequest {
            model: &self.config.model,
            messages,
            tools: request
                .tools
                .iter()
                .map(|tool| WireTool {
                    r#type: "function",
                    function: WireFunction {
                        name: tool.name,
                        description: tool.description,
                        parameters: &tool.parameters,
                    },
                })
                .collect(),
        };

        let url = format!(
            "{}/chat/completions",
            self.config.api_base.trim_end_matches('/')
        );
        tracing::debug!(url = %url, model = %self.config.model, "sending chat completion request");

        let response = client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()?;

        let status = response.status();
        if !status.is_success() {
            return Err(ModelError::Status {
                status: status.as_u16(),
                body: response.text().unwrap_or_default(),
            });
        }

        let parsed: ChatResponse = response.json()?;
        let choice = parsed
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| ModelError::Malformed("no choices in response".into()))?;

        let mut tool_calls = Vec::new();
        for call in choice.message.tool_calls {
            let arguments = serde_json::from_str(&call.function.arguments).map_err(|e| {
                ModelError::Malformed(format!("tool call arguments are not valid JSON: {e}"))
            })?;
            tool_calls.push(ToolRequest {
                name: call.function.name,
                arguments,
            });
        }

        Ok(ModelTurn {
            tool_calls,
            reply: choice.message.content.unwrap_or_default(),
        })
    }
}
