//! Project collection endpoints, including the rating flow
//!
//! Every mutation broadcasts the full post-mutation list under `projects`
//! so subscribed dashboards converge without item-level keys.

use bytes::Bytes;
use http_body_util::Full;
use hyper::body::Incoming;
use hyper::{Request, Response};
use serde_json::json;
use std::net::SocketAddr;
use std::sync::Arc;

use crate::db::schemas::{ProjectInput, RatingInput};
use crate::routes::{json_ok, parse_body};
use crate::server::AppState;
use crate::types::RoostError;

pub async fn list(state: Arc<AppState>) -> Result<Response<Full<Bytes>>, RoostError> {
    Ok(json_ok(&state.projects.list_json().await?))
}

pub async fn create(
    state: Arc<AppState>,
    req: Request<Incoming>,
) -> Result<Response<Full<Bytes>>, RoostError> {
    let input: ProjectInput = parse_body(req, state.args.max_body_bytes).await?;
    let project = state.projects.create(input).await?;

    state.hub.notify("projects", state.projects.list_json().await?);
    Ok(json_ok(&serde_json::to_value(project)?))
}

pub async fn update(
    state: Arc<AppState>,
    id: &str,
    req: Request<Incoming>,
) -> Result<Response<Full<Bytes>>, RoostError> {
    let input: ProjectInput = parse_body(req, state.args.max_body_bytes).await?;
    let project = state.projects.update(id, input).await?;

    state.hub.notify("projects", state.projects.list_json().await?);
    Ok(json_ok(&serde_json::to_value(project)?))
}

pub async fn delete(state: Arc<AppState>, id: &str) -> Result<Response<Full<Bytes>>, RoostError> {
    state.projects.delete(id).await?;

    state.hub.notify("projects", state.projects.list_json().await?);
    Ok(json_ok(&json!({ "success": true })))
}

/// `POST /api/projects/:id/rate` — duplicate submissions fail before any
/// write, so nothing is broadcast for them
pub async fn rate(
    state: Arc<AppState>,
    id: &str,
    addr: SocketAddr,
    req: Request<Incoming>,
) -> Result<Response<Full<Bytes>>, RoostError> {
    let input: RatingInput = parse_body(req, state.args.max_body_bytes).await?;
    let summary = state
        .projects
        .rate(id, input, Some(addr.ip().to_string()))
        .await?;

    state.hub.notify("projects", state.projects.list_json().await?);
    Ok(json_ok(&json!({
        "success": true,
        "ratings": summary,
    })))
}

pub async fn ratings(state: Arc<AppState>, id: &str) -> Result<Response<Full<Bytes>>, RoostError> {
    let (summary, entries) = state.projects.ratings_for(id).await?;
    Ok(json_ok(&json!({
        "ratings": summary,
        "entries": entries,
    })))
}

/// `DELETE /api/ratings/:id` — admin removal, reverses the arithmetic
pub async fn delete_rating(
    state: Arc<AppState>,
    id: &str,
) -> Result<Response<Full<Bytes>>, RoostError> {
    state.projects.delete_rating(id).await?;

    state.hub.notify("projects", state.projects.list_json().await?);
    Ok(json_ok(&json!({ "success": true })))
}
