//! HTTP front door - login-gated chat and documentation routes.
//!
//! A thin adapter over the orchestrator: handlers use `start`,
//! `handle_message`, `list_categories`, and `get_summary`, plus direct
//! store writes at the form-submission boundary. Sessions are cookie
//! backed: login issues a token mapped to an in-memory [`ChatSession`],
//! logout discards it. Each session's turns are serialized by its own
//! mutex, so two in-flight messages for one conversation cannot overlap.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use anyhow::Result;
use axum::extract::{Path, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use rusqlite::Connection;
use serde::Deserialize;
use serde_json::json;

use crate::agent::{self, Agent};
use crate::chat::{ChatSession, Orchestrator};
use crate::config::LifelogConfig;
use crate::{db, store};

const SESSION_COOKIE: &str = "session";

type SessionMap = HashMap<String, Arc<Mutex<ChatSession>>>;

#[derive(Clone)]
struct AppState {
    orchestrator: Arc<Orchestrator>,
    db: Arc<Mutex<Connection>>,
    sessions: Arc<Mutex<SessionMap>>,
    config: Arc<LifelogConfig>,
}

/// Start the HTTP server.
pub async fn serve(config: LifelogConfig) -> Result<()> {
    let db_path = config.resolved_db_path();
    let conn = db::open_database(&db_path)?;
    let db = Arc::new(Mutex::new(conn));

    let model = agent::create_model(&config.model)?;
    let orchestrator = Arc::new(Orchestrator::new(
        db.clone(),
        Agent::new(model),
        config.chat.history_window,
        config.storage.summary_window_days,
    ));

    let bind_addr = format!("{}:{}", config.server.host, config.server.port);
    let state = AppState {
        orchestrator,
        db,
        sessions: Arc::new(Mutex::new(HashMap::new())),
        config: Arc::new(config),
    };

    let router = Router::new()
        .route("/login", post(login))
        .route("/logout", post(logout))
        .route("/start-chat", get(start_chat))
        .route("/chat-message", post(chat_message))
        .route("/categories", get(categories))
        .route("/summary/{category_id}", get(summary))
        .route("/data", get(all_data))
        .route("/submit", post(submit))
        .with_state(state);

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!(addr = %bind_addr, "lifelog server listening at http://{bind_addr}");

    axum::serve(listener, router)
        .with_graceful_shutdown(async {
            tokio::signal::ctrl_c()
                .await
                .expect("failed to listen for ctrl-c");
            tracing::info!("shutting down server");
        })
        .await?;

    Ok(())
}

// ── Session plumbing ──────────────────────────────────────────────────────────

fn lock_sessions(state: &AppState) -> std::sync::MutexGuard<'_, SessionMap> {
    state
        .sessions
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Resolve the chat session for the request's cookie, if logged in.
fn session_from_headers(state: &AppState, headers: &HeaderMap) -> Option<Arc<Mutex<ChatSession>>> {
    let cookies = headers.get(header::COOKIE)?.to_str().ok()?;
    let token = cookies
        .split(';')
        .map(str::trim)
        .find_map(|part| part.strip_prefix("session="))?;
    lock_sessions(state).get(token).cloned()
}

fn unauthorized() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({"error": "Not logged in"})),
    )
        .into_response()
}

// ── Handlers ──────────────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct LoginRequest {
    username: String,
    password: String,
}

async fn login(State(state): State<AppState>, Json(body): Json<LoginRequest>) -> Response {
    let auth = &state.config.auth;
    if body.username != auth.username || body.password != auth.password {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({"error": "Invalid username or password"})),
        )
            .into_response();
    }

    let token = uuid::Uuid::new_v4().to_string();
    lock_sessions(&state).insert(token.clone(), Arc::new(Mutex::new(ChatSession::new())));
    tracing::info!(user = %body.username, "session opened");

    let cookie = format!("{SESSION_COOKIE}={token}; HttpOnly; Path=/");
    (
        [(header::SET_COOKIE, cookie)],
        Json(json!({"status": "success"})),
    )
        .into_response()
}

async fn logout(State(state): State<AppState>, headers: HeaderMap) -> Response {
    if let Some(cookies) = headers.get(header::COOKIE).and_then(|v| v.to_str().ok()) {
        if let Some(token) = cookies
            .split(';')
            .map(str::trim)
            .find_map(|part| part.strip_prefix("session="))
        {
            lock_sessions(&state).remove(token);
        }
    }

    // Expire the cookie either way
    let cookie = format!("{SESSION_COOKIE}=; HttpOnly; Path=/; Max-Age=0");
    (
        [(header::SET_COOKIE, cookie)],
        Json(json!({"status": "success"})),
    )
        .into_response()
}

async fn start_chat(State(state): State<AppState>, headers: HeaderMap) -> Response {
    if session_from_headers(&state, &headers).is_none() {
        return unauthorized();
    }
    Json(state.orchestrator.start()).into_response()
}

#[derive(Deserialize)]
struct ChatMessageRequest {
    message: Option<String>,
}

async fn chat_message(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<ChatMessageRequest>,
) -> Response {
    let Some(session) = session_from_headers(&state, &headers) else {
        return unauthorized();
    };
    let Some(message) = body.message else {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({"error": "No message provided"})),
        )
            .into_response();
    };

    // The turn blocks on the model call, so run it off the async runtime.
    // Holding the session lock for the whole turn serializes the session.
    let orchestrator = state.orchestrator.clone();
    let result = tokio::task::spawn_blocking(move || {
        let mut session = session.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        orchestrator.handle_message(&mut session, &message)
    })
    .await;

    match result {
        Ok(turn) => Json(turn).into_response(),
        Err(err) => {
            tracing::error!(error = %err, "chat turn task failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({"error": "Internal server error"})),
            )
                .into_response()
        }
    }
}

async fn categories(State(state): State<AppState>, headers: HeaderMap) -> Response {
    if session_from_headers(&state, &headers).is_none() {
        return unauthorized();
    }
    Json(state.orchestrator.list_categories()).into_response()
}

async fn summary(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(category_id): Path<String>,
) -> Response {
    if session_from_headers(&state, &headers).is_none() {
        return unauthorized();
    }
    match state.orchestrator.get_summary(&category_id) {
        Ok(summary) => Json(summary).into_response(),
        Err(err) if err.is_validation() => (
            StatusCode::BAD_REQUEST,
            Json(json!({"error": err.to_string()})),
        )
            .into_response(),
        Err(err) => {
            tracing::error!(error = %err, "summary read failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({"error": "Internal server error"})),
            )
                .into_response()
        }
    }
}

async fn all_data(State(state): State<AppState>, headers: HeaderMap) -> Response {
    if session_from_headers(&state, &headers).is_none() {
        return unauthorized();
    }

    let mut all = serde_json::Map::new();
    for category in state.orchestrator.list_categories() {
        match state.orchestrator.get_summary(category.id) {
            Ok(summary) => match serde_json::to_value(&summary) {
                Ok(value) => {
                    all.insert(category.id.to_string(), value);
                }
                Err(err) => tracing::error!(category = category.id, error = %err, "summary serialization failed"),
            },
            Err(err) => {
                tracing::error!(category = category.id, error = %err, "summary read failed");
            }
        }
    }
    Json(serde_json::Value::Object(all)).into_response()
}

/// Form-mode documentation write: the present fields select the operation.
#[derive(Deserialize)]
struct SubmitRequest {
    category_id: Option<String>,
    section_name: Option<String>,
    observations: Option<String>,
    next_steps: Option<String>,
    notes: Option<String>,
}

async fn submit(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<SubmitRequest>,
) -> Response {
    if session_from_headers(&state, &headers).is_none() {
        return unauthorized();
    }

    let mut conn = state.db.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
    let result = match body {
        SubmitRequest {
            category_id: Some(category_id),
            section_name: Some(section_name),
            observations: Some(observations),
            ..
        } => store::record_section_observation(&mut conn, &category_id, &section_name, &observations),
        SubmitRequest {
            category_id: Some(category_id),
            next_steps: Some(next_steps),
            ..
        } => store::set_next_steps(&mut conn, &category_id, &next_steps),
        SubmitRequest {
            category_id: Some(category_id),
            notes: Some(notes),
            ..
        } => store::add_notes(&mut conn, &category_id, &notes),
        _ => {
            return (
                StatusCode::BAD_REQUEST,
                Json(json!({"error": "Invalid data format"})),
            )
                .into_response();
        }
    };

    match result {
        Ok(_) => Json(json!({"status": "success"})).into_response(),
        Err(err) if err.is_validation() => (
            StatusCode::BAD_REQUEST,
            Json(json!({"error": err.to_string()})),
        )
            .into_response(),
        Err(err) => {
            tracing::error!(error = %err, "submit failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({"error": "Internal server error"})),
            )
                .into_response()
        }
    }
}
