//! Chatbot message endpoint and conversation review admin
//!
//! The message endpoint never returns an HTTP error once a valid body has
//! been read: store failures collapse into a fixed apology reply so the
//! widget always has something to show.

use bytes::Bytes;
use http_body_util::Full;
use hyper::body::Incoming;
use hyper::{Request, Response};
use serde::Deserialize;
use serde_json::json;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;
use tracing::warn;

use crate::chatbot::{self, match_message};
use crate::db::schemas::{ConversationDoc, ReviewPatch};
use crate::routes::{attachment_response, json_ok, parse_body, query_param};
use crate::server::AppState;
use crate::types::RoostError;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ChatRequest {
    message: String,
    #[serde(default)]
    session_id: Option<String>,
}

pub async fn message<B>(
    state: Arc<AppState>,
    addr: SocketAddr,
    req: Request<B>,
) -> Result<Response<Full<Bytes>>, RoostError>
where
    B: hyper::body::Body,
    B::Error: std::fmt::Display,
{
    let request: ChatRequest = parse_body(req, state.args.max_body_bytes).await?;
    if request.message.trim().is_empty() {
        // even a blank message gets a reply, never an error status
        return Ok(json_ok(&json!({ "response": chatbot::APOLOGY_REPLY })));
    }

    match state.site.chatbot_enabled().await {
        Ok(false) => {
            return Ok(json_ok(&json!({ "response": chatbot::UNAVAILABLE_REPLY })));
        }
        Ok(true) => {}
        Err(e) => {
            warn!("chatbot settings lookup failed: {}", e);
            return Ok(json_ok(&json!({ "response": chatbot::APOLOGY_REPLY })));
        }
    }

    let started = Instant::now();
    let reply = match_message(&state.knowledge, &request.message);
    let elapsed_ms = started.elapsed().as_millis() as u64;

    let conversation = ConversationDoc::new(
        request.message,
        reply.text.clone(),
        request.session_id,
        reply.category,
        elapsed_ms,
        Some(addr.ip().to_string()),
    );
    if let Err(e) = state.conversations.log(conversation).await {
        warn!("failed to log chatbot conversation: {}", e);
    }

    Ok(json_ok(&json!({ "response": reply.text })))
}

pub async fn list_conversations(
    state: Arc<AppState>,
    req: &Request<Incoming>,
) -> Result<Response<Full<Bytes>>, RoostError> {
    let page = query_param(req.uri(), "page")
        .and_then(|v| v.parse().ok())
        .unwrap_or(1);
    let limit = query_param(req.uri(), "limit")
        .and_then(|v| v.parse().ok())
        .unwrap_or(20);

    let page = state.conversations.page(page, limit).await?;
    Ok(json_ok(&serde_json::to_value(page)?))
}

pub async fn conversation_stats(
    state: Arc<AppState>,
) -> Result<Response<Full<Bytes>>, RoostError> {
    let stats = state.conversations.stats().await?;
    Ok(json_ok(&serde_json::to_value(stats)?))
}

pub async fn search_conversations(
    state: Arc<AppState>,
    req: &Request<Incoming>,
) -> Result<Response<Full<Bytes>>, RoostError> {
    let query = query_param(req.uri(), "q")
        .ok_or_else(|| RoostError::BadRequest("missing query parameter q".to_string()))?;

    let matches = state.conversations.search(&query).await?;
    Ok(json_ok(&serde_json::to_value(matches)?))
}

pub async fn export_conversations(
    state: Arc<AppState>,
) -> Result<Response<Full<Bytes>>, RoostError> {
    let export = state.conversations.export_training().await?;
    Ok(attachment_response("chatbot-training-data.json", &export))
}

pub async fn update_conversation(
    state: Arc<AppState>,
    id: &str,
    req: Request<Incoming>,
) -> Result<Response<Full<Bytes>>, RoostError> {
    let patch: ReviewPatch = parse_body(req, state.args.max_body_bytes).await?;
    let updated = state.conversations.update(id, patch).await?;
    Ok(json_ok(&serde_json::to_value(updated)?))
}

pub async fn delete_conversation(
    state: Arc<AppState>,
    id: &str,
) -> Result<Response<Full<Bytes>>, RoostError> {
    state.conversations.delete(id).await?;
    Ok(json_ok(&json!({ "success": true })))
}
