//! Conversational life-tracking documentation assistant.
//!
//! lifelog pairs a chat interface with a language-model-driven agent that
//! extracts explicitly-stated facts from the conversation and files them
//! into a fixed taxonomy of life-tracking categories (sleep, journaling,
//! physical activity, and so on), persisted to SQLite.
//!
//! # Architecture
//!
//! - **Storage**: SQLite with append-only section observations,
//!   replace-on-write next steps, accumulating notes, and a trailing
//!   14-day summary window
//! - **Tool surface**: a closed set of documentation operations the agent
//!   invokes by name with keyword arguments, validated against the taxonomy
//! - **Agent**: OpenAI-compatible chat completions with native function
//!   calling, or a deterministic scripted stand-in for tests and offline use
//! - **Front doors**: an axum HTTP API with cookie sessions, and a
//!   terminal CLI with interactive, batch, and summary modes
//!
//! # Modules
//!
//! - [`taxonomy`] - the fixed category/section registry
//! - [`store`] - the documentation store
//! - [`tools`] - the tool dispatch table
//! - [`agent`] - the language-model substrate and per-turn tool loop
//! - [`chat`] - the conversation orchestrator and session state
//! - [`config`] - TOML configuration and env overrides
//! - [`db`] - SQLite initialization and schema
//! - [`server`] - HTTP front door
//! - [`cli`] - terminal front door and batch ingestion

pub mod agent;
pub mod chat;
pub mod cli;
pub mod config;
pub mod db;
pub mod error;
pub mod server;
pub mod store;
pub mod taxonomy;
pub mod tools;
