//! HTTP front end: `POST /ask` and `GET /health`.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::body::Bytes;
use axum::extract::rejection::BytesRejection;
use axum::extract::{DefaultBodyLimit, State};
use axum::http::header::CONTENT_TYPE;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use faq_core::{MatchConfig, MatchResult, Matcher, UnmatchedSink};
use serde_json::{json, Value};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{debug, info, warn};

const JSON_UTF8: &str = "application/json; charset=utf-8";

/// Where each request gets its matcher from.
pub enum KnowledgeSource {
    /// Loaded once at startup and shared by every request.
    Loaded(Arc<Matcher>),
    /// Read from disk on every request.
    Reload { path: PathBuf, config: MatchConfig },
}

impl KnowledgeSource {
    pub fn matcher(&self) -> faq_core::Result<Arc<Matcher>> {
        match self {
            Self::Loaded(matcher) => Ok(Arc::clone(matcher)),
            Self::Reload { path, config } => Matcher::from_path(path, config.clone()).map(Arc::new),
        }
    }

    pub fn config(&self) -> &MatchConfig {
        match self {
            Self::Loaded(matcher) => matcher.config(),
            Self::Reload { config, .. } => config,
        }
    }
}

pub struct AppState {
    pub source: KnowledgeSource,
    pub unmatched: Arc<dyn UnmatchedSink + Send + Sync>,
}

pub fn router(state: Arc<AppState>, max_body_bytes: usize) -> Router {
    Router::new()
        .route("/ask", post(ask))
        .route("/health", get(health))
        .with_state(state)
        .layer(DefaultBodyLimit::max(max_body_bytes))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

/// Unparseable bodies and a missing or non-string `message` read as empty.
fn message_from_body(body: &[u8]) -> String {
    match serde_json::from_slice::<Value>(body) {
        Ok(value) => value
            .get("message")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string(),
        Err(err) => {
            debug!(error = %err, "request body is not JSON");
            String::new()
        }
    }
}

/// Runs on the blocking pool: reload mode reads the knowledge base and a miss
/// appends to the unmatched log.
fn answer_message(state: &AppState, message: &str) -> MatchResult {
    match state.source.matcher() {
        Ok(matcher) => matcher.answer(message, state.unmatched.as_ref()),
        Err(err) => {
            warn!(error = %err, "knowledge base unavailable");
            state.source.config().internal_error()
        }
    }
}

/// Always 200 with a JSON reply. A body that cannot be buffered, including
/// one over the size limit, gets the internal-error reply.
async fn ask(
    State(state): State<Arc<AppState>>,
    body: Result<Bytes, BytesRejection>,
) -> impl IntoResponse {
    let result = match body {
        Ok(body) => {
            let message = message_from_body(&body);
            let worker = Arc::clone(&state);
            tokio::task::spawn_blocking(move || answer_message(&worker, &message))
                .await
                .unwrap_or_else(|err| {
                    warn!(error = %err, "answer task failed");
                    state.source.config().internal_error()
                })
        }
        Err(rejection) => {
            warn!(error = %rejection, "rejected request body");
            state.source.config().internal_error()
        }
    };
    debug!(decision = ?result.decision, score = result.score, "answered");

    ([(CONTENT_TYPE, JSON_UTF8)], Json(result))
}

async fn health(State(state): State<Arc<AppState>>) -> Json<Value> {
    let entries =
        tokio::task::spawn_blocking(move || state.source.matcher().map(|m| m.entries().len()))
            .await;
    match entries {
        Ok(Ok(entries)) => Json(json!({ "status": "ok", "entries": entries })),
        Ok(Err(err)) => Json(json!({ "status": "error", "error": err.to_string() })),
        Err(err) => Json(json!({ "status": "error", "error": err.to_string() })),
    }
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!(error = %err, "failed to listen for ctrl-c");
        std::future::pending::<()>().await;
    }
    info!("Shutting down");
}

pub async fn serve(addr: SocketAddr, state: AppState, max_body_bytes: usize) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("bind {addr}"))?;
    info!("Listening on http://{}", listener.local_addr()?);

    axum::serve(listener, router(Arc::new(state), max_body_bytes))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("http server")
}
