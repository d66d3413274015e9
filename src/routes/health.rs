//! Health check endpoints
//!
//! Kubernetes-style probes:
//! - /health, /healthz - liveness (200 while the process runs)
//! - /ready, /readyz - readiness (503 until storage answers; dev mode is
//!   always ready since the in-memory backend has nothing to wait for)
//! - /version - deployment verification

use bytes::Bytes;
use http_body_util::Full;
use hyper::{Response, StatusCode};
use serde_json::json;
use std::sync::Arc;

use crate::routes::json_response;
use crate::server::AppState;
use crate::types::now_iso;

pub async fn liveness(state: Arc<AppState>) -> Response<Full<Bytes>> {
    let body = json!({
        "status": "ok",
        "nodeId": state.args.node_id.to_string(),
        "version": env!("CARGO_PKG_VERSION"),
        "database": if state.mongo.is_some() { "mongodb" } else { "memory" },
        "connections": state.hub.connection_count(),
        "uptime": state.started_at.elapsed().as_secs(),
        "timestamp": now_iso(),
    });
    json_response(StatusCode::OK, &body)
}

pub async fn readiness(state: Arc<AppState>) -> Response<Full<Bytes>> {
    let ready = match &state.mongo {
        Some(mongo) => mongo.ping().await.is_ok(),
        None => state.args.dev_mode,
    };

    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    json_response(status, &json!({ "ready": ready }))
}

pub fn version() -> Response<Full<Bytes>> {
    let body = json!({
        "name": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
        "gitCommit": env!("GIT_COMMIT_SHORT"),
        "gitCommitFull": env!("GIT_COMMIT_FULL"),
        "buildTimestamp": env!("BUILD_TIMESTAMP"),
    });
    json_response(StatusCode::OK, &body)
}
