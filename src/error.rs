//! Error taxonomy for the documentation core.
//!
//! Three families: [`ValidationError`] (the caller asked for a category or
//! section that does not exist - never retried, maps to 400 at the web
//! boundary), [`ToolError`] (the agent requested something the tool surface
//! cannot satisfy - recovered internally by degrading to plain text), and
//! [`ModelError`] (the language-model call failed - converted to an
//! apologetic reply at the orchestrator boundary). None of these are fatal
//! to the process.

use thiserror::Error;

/// The caller named a category or section unknown to the taxonomy registry.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("unknown category: {0}")]
    UnknownCategory(String),
    #[error("unknown section '{section}' for category '{category}'")]
    UnknownSection { category: String, section: String },
}

/// Failure from a documentation store operation.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("database error: {0}")]
    Db(#[from] rusqlite::Error),
}

impl StoreError {
    /// `true` when the failure is the caller's fault (unknown category or
    /// section) rather than a storage fault.
    pub fn is_validation(&self) -> bool {
        matches!(self, StoreError::Validation(_))
    }
}

/// Failure from the tool surface: the agent named a tool that does not
/// exist, or supplied arguments that do not match the tool's parameters.
#[derive(Debug, Error)]
pub enum ToolError {
    #[error("unknown tool: {0}")]
    UnknownTool(String),
    #[error("invalid arguments for tool '{tool}': {source}")]
    InvalidArguments {
        tool: String,
        #[source]
        source: serde_json::Error,
    },
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Failure from the language-model substrate.
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("model request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("model returned HTTP {status}: {body}")]
    Status { status: u16, body: String },
    #[error("malformed model response: {0}")]
    Malformed(String),
}
