//! Aggregate read endpoint (`GET /api/data`)

use bytes::Bytes;
use http_body_util::Full;
use hyper::Response;
use std::sync::Arc;

use crate::routes::json_ok;
use crate::server::AppState;
use crate::snapshot;
use crate::types::RoostError;

pub async fn aggregate(state: Arc<AppState>) -> Result<Response<Full<Bytes>>, RoostError> {
    let snapshot = snapshot::assemble(&state.site, &state.projects, &state.intake).await?;
    Ok(json_ok(&snapshot))
}
