//! Blog item CRUD on the aggregate's `blog` array
//!
//! Every mutation broadcasts the whole post-mutation array under `blog`,
//! keeping array-valued sections convergent for subscribers.

use bytes::Bytes;
use http_body_util::Full;
use hyper::body::Incoming;
use hyper::{Request, Response};
use serde_json::json;
use std::sync::Arc;

use crate::routes::{json_ok, read_json_body};
use crate::server::AppState;
use crate::site::sections::validate_blog_post;
use crate::site::store::{fill_blog_defaults, shallow_merge};
use crate::types::RoostError;

pub async fn list(state: Arc<AppState>) -> Result<Response<Full<Bytes>>, RoostError> {
    let blog = state.site.value("blog").await?;
    Ok(json_ok(&blog))
}

pub async fn get(state: Arc<AppState>, id: &str) -> Result<Response<Full<Bytes>>, RoostError> {
    let post = state
        .site
        .blog_get(id)
        .await?
        .ok_or_else(|| RoostError::NotFound(format!("blog post {}", id)))?;
    Ok(json_ok(&post))
}

pub async fn create(
    state: Arc<AppState>,
    req: Request<Incoming>,
) -> Result<Response<Full<Bytes>>, RoostError> {
    let mut post = read_json_body(req, state.args.max_body_bytes).await?;
    fill_blog_defaults(&mut post);
    let post = validate_blog_post(post)?;

    let (stored, blog) = state.site.blog_create(post).await?;
    state.hub.notify("blog", blog);
    Ok(json_ok(&stored))
}

/// Shallow-merges the body over the existing post, validates the merged shape
pub async fn update(
    state: Arc<AppState>,
    id: &str,
    req: Request<Incoming>,
) -> Result<Response<Full<Bytes>>, RoostError> {
    let patch = read_json_body(req, state.args.max_body_bytes).await?;

    let existing = state
        .site
        .blog_get(id)
        .await?
        .ok_or_else(|| RoostError::NotFound(format!("blog post {}", id)))?;
    let merged = validate_blog_post(shallow_merge(&existing, &patch))?;

    let (stored, blog) = state
        .site
        .blog_replace(id, merged)
        .await?
        .ok_or_else(|| RoostError::NotFound(format!("blog post {}", id)))?;
    state.hub.notify("blog", blog);
    Ok(json_ok(&stored))
}

pub async fn delete(state: Arc<AppState>, id: &str) -> Result<Response<Full<Bytes>>, RoostError> {
    let blog = state.site.blog_delete(id).await?;
    state.hub.notify("blog", blog);
    Ok(json_ok(&json!({ "success": true })))
}
