//! Web Chat Server
//!
//! Serves the single chat page (title, greeting, input box, latest reply)
//! plus a small JSON API over the same process-scoped session.

use anyhow::Result;
use axum::{
    extract::{Form, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;
use tokio::sync::Mutex;
use tower_http::trace::TraceLayer;

use crate::core::advisor::Advisor;
use crate::core::interests::labels;
use crate::core::r#loop::{GREETING, INPUT_LABEL, SPEAKER, TITLE};
use crate::core::session::ChatSession;

/// The one live session. The mutex keeps turns strictly sequential.
pub struct ChatState {
    pub advisor: Advisor,
    pub session: Mutex<ChatSession>,
    pub last_reply: Mutex<Option<String>>,
}

impl ChatState {
    pub fn new(advisor: Advisor) -> Self {
        Self {
            advisor,
            session: Mutex::new(ChatSession::new()),
            last_reply: Mutex::new(None),
        }
    }
}

pub type SharedState = Arc<ChatState>;

// --- Request/Response Types ---

#[derive(Debug, Deserialize)]
pub struct ChatForm {
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub reply: String,
    pub interests: Vec<String>,
    pub turns: usize,
}

#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    fn bad_request(msg: impl Into<String>) -> Self {
        Self { status: StatusCode::BAD_REQUEST, message: msg.into() }
    }

    fn upstream(err: anyhow::Error) -> Self {
        Self { status: StatusCode::BAD_GATEWAY, message: format!("{:#}", err) }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "error": self.message }))).into_response()
    }
}

// --- Page Rendering ---

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Escapes the reply, then turns paired `**...**` spans into `<b>`. An unpaired marker stays literal.
fn render_reply(text: &str) -> String {
    let escaped = escape_html(text);
    let pieces: Vec<&str> = escaped.split("**").collect();
    let paired = if pieces.len() % 2 == 1 { pieces.len() } else { pieces.len() - 1 };

    let mut out = String::with_capacity(escaped.len());
    for (i, piece) in pieces.iter().enumerate() {
        if i >= paired {
            out.push_str("**");
            out.push_str(piece);
        } else if i % 2 == 1 {
            out.push_str("<b>");
            out.push_str(piece);
            out.push_str("</b>");
        } else {
            out.push_str(piece);
        }
    }
    out
}

fn render_page(reply: Option<&str>, error: Option<&str>) -> Html<String> {
    let reply_block = reply
        .map(|r| format!("<pre class=\"reply\"><b>{}</b> {}</pre>", SPEAKER, render_reply(r)))
        .unwrap_or_default();
    let error_block = error
        .map(|e| format!("<p class=\"error\">{}</p>", escape_html(e)))
        .unwrap_or_default();

    Html(format!(
        r#"<!DOCTYPE html>
<html>
<head><meta charset="utf-8"><title>{title}</title>
<style>body {{ font-family: sans-serif; max-width: 48rem; margin: 2rem auto; }} pre.reply {{ white-space: pre-wrap; }} .error {{ color: #b00020; }}</style>
</head>
<body>
<h1>{title}</h1>
<p>{greeting}</p>
<form method="post" action="/">
<label for="message">{label}</label><br>
<input id="message" name="message" type="text" size="60" autofocus>
</form>
{error_block}
{reply_block}
</body>
</html>"#,
        title = TITLE,
        greeting = escape_html(GREETING),
        label = INPUT_LABEL,
        error_block = error_block,
        reply_block = reply_block,
    ))
}

// --- Handler Functions ---

async fn health_check() -> impl IntoResponse {
    Json(json!({
        "status": "healthy",
        "service": "zoro",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

async fn chat_page(State(state): State<SharedState>) -> impl IntoResponse {
    let last = state.last_reply.lock().await;
    render_page(last.as_deref(), None)
}

async fn submit_form(State(state): State<SharedState>, Form(form): Form<ChatForm>) -> impl IntoResponse {
    let message = form.message.trim();
    if message.is_empty() {
        let last = state.last_reply.lock().await;
        return render_page(last.as_deref(), None);
    }

    let mut session = state.session.lock().await;
    match state.advisor.respond(&mut session, message).await {
        Ok(reply) => {
            *state.last_reply.lock().await = Some(reply.clone());
            render_page(Some(&reply), None)
        }
        Err(e) => {
            tracing::error!(error = %e, "turn failed");
            render_page(None, Some(&format!("{:#}", e)))
        }
    }
}

async fn chat_api(
    State(state): State<SharedState>,
    Json(request): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, ApiError> {
    let message = request.message.trim();
    if message.is_empty() {
        return Err(ApiError::bad_request("message must not be empty"));
    }

    let mut session = state.session.lock().await;
    let reply = state
        .advisor
        .respond_detailed(&mut session, message)
        .await
        .map_err(ApiError::upstream)?;
    *state.last_reply.lock().await = Some(reply.text.clone());

    Ok(Json(ChatResponse {
        reply: reply.text,
        interests: labels(&reply.interests),
        turns: session.len(),
    }))
}

async fn reset_session(State(state): State<SharedState>) -> impl IntoResponse {
    let mut session = state.session.lock().await;
    tracing::info!(session = %session.id, turns = session.len(), "session reset");
    *session = ChatSession::new();
    *state.last_reply.lock().await = None;
    Json(json!({ "session": session.id }))
}

/// Build the chat router
pub fn build_router(state: SharedState) -> Router {
    Router::new()
        .route("/", get(chat_page).post(submit_form))
        .route("/health", get(health_check))
        .route("/api/chat", post(chat_api))
        .route("/api/reset", post(reset_session))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the chat server
pub async fn start_server(advisor: Advisor, port: u16) -> Result<()> {
    let state = Arc::new(ChatState::new(advisor));
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(format!("127.0.0.1:{}", port)).await?;
    println!("🌐 Zoro chat page listening on http://127.0.0.1:{}", port);

    axum::serve(listener, app).await?;
    Ok(())
}
