//! Visitor intake: contact messages, job applications, project submissions
//!
//! Public POSTs never broadcast (the submitter is the only interested
//! party). Admin deletes broadcast the post-mutation list so open
//! dashboards converge.

use bytes::Bytes;
use http_body_util::Full;
use hyper::body::Incoming;
use hyper::{Request, Response};
use serde_json::json;
use std::sync::Arc;

use crate::db::schemas::{ApplicationInput, MessageInput, ProjectSubmissionInput};
use crate::routes::{json_ok, parse_body};
use crate::server::AppState;
use crate::types::RoostError;

pub async fn submit_message(
    state: Arc<AppState>,
    req: Request<Incoming>,
) -> Result<Response<Full<Bytes>>, RoostError> {
    let input: MessageInput = parse_body(req, state.args.max_body_bytes).await?;
    state.intake.add_message(input).await?;
    Ok(json_ok(&json!({ "success": true })))
}

pub async fn list_messages(state: Arc<AppState>) -> Result<Response<Full<Bytes>>, RoostError> {
    Ok(json_ok(&state.intake.messages_json().await?))
}

pub async fn delete_message(
    state: Arc<AppState>,
    id: &str,
) -> Result<Response<Full<Bytes>>, RoostError> {
    state.intake.delete_message(id).await?;
    state.hub.notify("messages", state.intake.messages_json().await?);
    Ok(json_ok(&json!({ "success": true })))
}

pub async fn submit_application(
    state: Arc<AppState>,
    req: Request<Incoming>,
) -> Result<Response<Full<Bytes>>, RoostError> {
    let input: ApplicationInput = parse_body(req, state.args.max_body_bytes).await?;
    state.intake.add_application(input).await?;
    Ok(json_ok(&json!({ "success": true })))
}

pub async fn list_applications(state: Arc<AppState>) -> Result<Response<Full<Bytes>>, RoostError> {
    Ok(json_ok(&state.intake.applications_json().await?))
}

pub async fn delete_application(
    state: Arc<AppState>,
    id: &str,
) -> Result<Response<Full<Bytes>>, RoostError> {
    state.intake.delete_application(id).await?;
    state
        .hub
        .notify("applications", state.intake.applications_json().await?);
    Ok(json_ok(&json!({ "success": true })))
}

pub async fn submit_project(
    state: Arc<AppState>,
    req: Request<Incoming>,
) -> Result<Response<Full<Bytes>>, RoostError> {
    let input: ProjectSubmissionInput = parse_body(req, state.args.max_body_bytes).await?;
    state.intake.add_project_submission(input).await?;
    Ok(json_ok(&json!({ "success": true })))
}

pub async fn list_project_submissions(
    state: Arc<AppState>,
) -> Result<Response<Full<Bytes>>, RoostError> {
    Ok(json_ok(&state.intake.project_submissions_json().await?))
}

pub async fn delete_project_submission(
    state: Arc<AppState>,
    id: &str,
) -> Result<Response<Full<Bytes>>, RoostError> {
    state.intake.delete_project_submission(id).await?;
    state.hub.notify(
        "projectSubmissions",
        state.intake.project_submissions_json().await?,
    );
    Ok(json_ok(&json!({ "success": true })))
}
