//! Section mutators: validate, write, broadcast, return the stored value

use bytes::Bytes;
use http_body_util::Full;
use hyper::body::Incoming;
use hyper::{Request, Response};
use std::sync::Arc;

use crate::routes::{json_ok, read_json_body};
use crate::server::AppState;
use crate::site::sections::{validate_seo_entry, Section, SEO_PAGES};
use crate::types::RoostError;

/// Generic `PUT /api/...` section replacement
pub async fn put_section(
    state: Arc<AppState>,
    section: Section,
    req: Request<Incoming>,
) -> Result<Response<Full<Bytes>>, RoostError> {
    let payload = read_json_body(req, state.args.max_body_bytes).await?;
    let value = section.validate(payload)?;

    let stored = state.site.replace_section(section, value).await?;
    state.hub.notify(section.broadcast_key(), stored.clone());
    Ok(json_ok(&stored))
}

/// `PUT /api/seo/:page` — replaces one page entry, broadcasts the whole
/// `seo` object so subscribers stay convergent on a two-segment key space
pub async fn put_seo(
    state: Arc<AppState>,
    page: &str,
    req: Request<Incoming>,
) -> Result<Response<Full<Bytes>>, RoostError> {
    if !SEO_PAGES.contains(&page) {
        return Err(RoostError::NotFound(format!("seo page {}", page)));
    }

    let payload = read_json_body(req, state.args.max_body_bytes).await?;
    let entry = validate_seo_entry(payload)?;

    let (stored, seo) = state.site.update_seo_page(page, entry).await?;
    state.hub.notify("seo", seo);
    Ok(json_ok(&stored))
}

/// `GET /api/chatbot/settings`
pub async fn get_chatbot_settings(
    state: Arc<AppState>,
) -> Result<Response<Full<Bytes>>, RoostError> {
    let settings = state.site.value("chatbot").await?;
    Ok(json_ok(&settings))
}
