//! Testimonial moderation queue
//!
//! Submissions land pending; approval copies a curated entry into the
//! aggregate's `testimonials` section and broadcasts that section. Deletes
//! do not broadcast since the submissions list is dashboard-polled.

use bytes::Bytes;
use http_body_util::Full;
use hyper::body::Incoming;
use hyper::{Request, Response};
use serde_json::json;
use std::sync::Arc;

use crate::db::schemas::TestimonialSubmissionInput;
use crate::routes::{json_ok, parse_body};
use crate::server::AppState;
use crate::types::RoostError;

pub async fn submit(
    state: Arc<AppState>,
    req: Request<Incoming>,
) -> Result<Response<Full<Bytes>>, RoostError> {
    let input: TestimonialSubmissionInput = parse_body(req, state.args.max_body_bytes).await?;
    state.intake.add_testimonial_submission(input).await?;
    Ok(json_ok(&json!({ "success": true })))
}

pub async fn list_submissions(state: Arc<AppState>) -> Result<Response<Full<Bytes>>, RoostError> {
    let submissions = state.intake.list_testimonial_submissions().await?;
    Ok(json_ok(&serde_json::to_value(submissions)?))
}

pub async fn approve(
    state: Arc<AppState>,
    id: &str,
) -> Result<Response<Full<Bytes>>, RoostError> {
    let (submission, entry) = state.intake.approve_testimonial(id).await?;

    let testimonials = state.site.push_testimonial(entry).await?;
    state.hub.notify("testimonials", testimonials);

    Ok(json_ok(&serde_json::to_value(submission)?))
}

pub async fn delete(state: Arc<AppState>, id: &str) -> Result<Response<Full<Bytes>>, RoostError> {
    state.intake.delete_testimonial_submission(id).await?;
    Ok(json_ok(&json!({ "success": true })))
}
