//! Visitor analytics endpoints
//!
//! Tracking is a sink: a storage failure is reported as a warning inside a
//! `{success: true}` body so the front-end never breaks over analytics.

use bytes::Bytes;
use http_body_util::Full;
use hyper::body::Incoming;
use hyper::{Request, Response};
use serde_json::json;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::warn;

use crate::db::schemas::SessionPatch;
use crate::routes::{json_ok, parse_body, query_param, read_json_body};
use crate::server::AppState;
use crate::types::RoostError;

pub async fn track(
    state: Arc<AppState>,
    addr: SocketAddr,
    req: Request<Incoming>,
) -> Result<Response<Full<Bytes>>, RoostError> {
    let payload = match read_json_body(req, state.args.max_body_bytes).await {
        Ok(payload) => payload,
        Err(e) => {
            warn!("visitor payload rejected: {}", e);
            return Ok(json_ok(&json!({
                "success": true,
                "warning": "visitor tracking unavailable",
            })));
        }
    };

    match state
        .visitors
        .track(&payload, Some(addr.ip().to_string()))
        .await
    {
        Ok(()) => Ok(json_ok(&json!({ "success": true }))),
        Err(e) => {
            warn!("visitor tracking failed: {}", e);
            Ok(json_ok(&json!({
                "success": true,
                "warning": "visitor tracking unavailable",
            })))
        }
    }
}

pub async fn update_session(
    state: Arc<AppState>,
    req: Request<Incoming>,
) -> Result<Response<Full<Bytes>>, RoostError> {
    let patch: SessionPatch = parse_body(req, state.args.max_body_bytes).await?;
    let session_id = patch.session_id.clone();

    if !state.visitors.update_session(patch).await? {
        return Err(RoostError::NotFound(format!("session {}", session_id)));
    }
    Ok(json_ok(&json!({ "success": true })))
}

pub async fn list(
    state: Arc<AppState>,
    req: &Request<Incoming>,
) -> Result<Response<Full<Bytes>>, RoostError> {
    let limit = query_param(req.uri(), "limit")
        .and_then(|v| v.parse().ok())
        .unwrap_or(state.args.visitor_list_cap)
        .min(state.args.visitor_list_cap);

    let visitors = state.visitors.list(limit).await?;
    Ok(json_ok(&serde_json::to_value(visitors)?))
}

pub async fn stats(state: Arc<AppState>) -> Result<Response<Full<Bytes>>, RoostError> {
    let stats = state.visitors.stats().await?;
    Ok(json_ok(&serde_json::to_value(stats)?))
}

pub async fn live_stats(state: Arc<AppState>) -> Result<Response<Full<Bytes>>, RoostError> {
    let stats = state.visitors.live_stats().await?;
    Ok(json_ok(&serde_json::to_value(stats)?))
}

pub async fn delete(state: Arc<AppState>, id: &str) -> Result<Response<Full<Bytes>>, RoostError> {
    state.visitors.delete(id).await?;
    Ok(json_ok(&json!({ "success": true })))
}

pub async fn clear(state: Arc<AppState>) -> Result<Response<Full<Bytes>>, RoostError> {
    let deleted = state.visitors.clear().await?;
    Ok(json_ok(&json!({ "success": true, "deleted": deleted })))
}
