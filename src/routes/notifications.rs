//! Site banner notifications
//!
//! Admin CRUD plus the public active listing. Banners are polled by the
//! front-end rather than pushed, so nothing here broadcasts.

use bytes::Bytes;
use http_body_util::Full;
use hyper::body::Incoming;
use hyper::{Request, Response};
use serde_json::json;
use std::sync::Arc;

use crate::db::schemas::{NotificationInput, NotificationPatch};
use crate::routes::{json_ok, parse_body};
use crate::server::AppState;
use crate::types::RoostError;

pub async fn list(state: Arc<AppState>) -> Result<Response<Full<Bytes>>, RoostError> {
    let notifications = state.notifications.list().await?;
    Ok(json_ok(&serde_json::to_value(notifications)?))
}

pub async fn active(state: Arc<AppState>) -> Result<Response<Full<Bytes>>, RoostError> {
    let notifications = state.notifications.active().await?;
    Ok(json_ok(&serde_json::to_value(notifications)?))
}

pub async fn create(
    state: Arc<AppState>,
    req: Request<Incoming>,
) -> Result<Response<Full<Bytes>>, RoostError> {
    let input: NotificationInput = parse_body(req, state.args.max_body_bytes).await?;
    let notification = state.notifications.create(input).await?;
    Ok(json_ok(&serde_json::to_value(notification)?))
}

pub async fn update(
    state: Arc<AppState>,
    id: &str,
    req: Request<Incoming>,
) -> Result<Response<Full<Bytes>>, RoostError> {
    let patch: NotificationPatch = parse_body(req, state.args.max_body_bytes).await?;
    let notification = state.notifications.update(id, patch).await?;
    Ok(json_ok(&serde_json::to_value(notification)?))
}

pub async fn delete(state: Arc<AppState>, id: &str) -> Result<Response<Full<Bytes>>, RoostError> {
    state.notifications.delete(id).await?;
    Ok(json_ok(&json!({ "success": true })))
}
