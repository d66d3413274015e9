//! HTTP route handlers
//!
//! Handlers return `Result<Response<Full<Bytes>>, RoostError>`; the server
//! maps errors to `{"error": ...}` bodies through [`respond`]. Every
//! response carries permissive CORS headers.

pub mod blog;
pub mod chatbot;
pub mod data;
pub mod health;
pub mod intake;
pub mod notifications;
pub mod projects;
pub mod sections;
pub mod testimonials;
pub mod visitors;

use bytes::Bytes;
use http_body_util::{BodyExt, Full};
use hyper::{Request, Response, StatusCode, Uri};
use serde::de::DeserializeOwned;
use serde_json::Value as JsonValue;
use tracing::warn;

use crate::types::RoostError;

/// Build a JSON response with CORS headers
pub fn json_response(status: StatusCode, body: &JsonValue) -> Response<Full<Bytes>> {
    Response::builder()
        .status(status)
        .header("Content-Type", "application/json")
        .header("Access-Control-Allow-Origin", "*")
        .body(Full::new(Bytes::from(body.to_string())))
        .unwrap()
}

pub fn json_ok(body: &JsonValue) -> Response<Full<Bytes>> {
    json_response(StatusCode::OK, body)
}

/// JSON download with a Content-Disposition header
pub fn attachment_response(filename: &str, body: &JsonValue) -> Response<Full<Bytes>> {
    Response::builder()
        .status(StatusCode::OK)
        .header("Content-Type", "application/json")
        .header(
            "Content-Disposition",
            format!("attachment; filename=\"{}\"", filename),
        )
        .header("Access-Control-Allow-Origin", "*")
        .body(Full::new(Bytes::from(body.to_string())))
        .unwrap()
}

/// Map a handler error to its `{"error": ...}` response
pub fn error_response(err: &RoostError) -> Response<Full<Bytes>> {
    json_response(err.status_code(), &serde_json::json!({ "error": err.to_string() }))
}

pub fn respond(
    result: Result<Response<Full<Bytes>>, RoostError>,
) -> Response<Full<Bytes>> {
    match result {
        Ok(response) => response,
        Err(err) => {
            match err.status_code().as_u16() {
                500..=599 => warn!("request failed: {}", err),
                _ => tracing::debug!("request rejected: {}", err),
            }
            error_response(&err)
        }
    }
}

/// CORS preflight response
pub fn cors_preflight() -> Response<Full<Bytes>> {
    Response::builder()
        .status(StatusCode::OK)
        .header("Access-Control-Allow-Origin", "*")
        .header("Access-Control-Allow-Headers", "*")
        .header(
            "Access-Control-Allow-Methods",
            "GET, POST, PUT, DELETE, OPTIONS",
        )
        .body(Full::new(Bytes::new()))
        .unwrap()
}

pub fn not_found(path: &str) -> Response<Full<Bytes>> {
    json_response(
        StatusCode::NOT_FOUND,
        &serde_json::json!({ "error": "Not Found", "path": path }),
    )
}

/// Read a request body as raw bytes, enforcing the configured size cap
pub async fn read_body<B>(req: Request<B>, max_bytes: usize) -> Result<Bytes, RoostError>
where
    B: hyper::body::Body,
    B::Error: std::fmt::Display,
{
    if let Some(length) = req
        .headers()
        .get(hyper::header::CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse::<usize>().ok())
    {
        if length > max_bytes {
            return Err(RoostError::Http(format!(
                "request body exceeds {} bytes",
                max_bytes
            )));
        }
    }

    let bytes = req
        .into_body()
        .collect()
        .await
        .map_err(|e| RoostError::Http(format!("failed to read request body: {}", e)))?
        .to_bytes();

    if bytes.len() > max_bytes {
        return Err(RoostError::Http(format!(
            "request body exceeds {} bytes",
            max_bytes
        )));
    }
    Ok(bytes)
}

/// Read and parse a JSON request body
pub async fn read_json_body<B>(req: Request<B>, max_bytes: usize) -> Result<JsonValue, RoostError>
where
    B: hyper::body::Body,
    B::Error: std::fmt::Display,
{
    let bytes = read_body(req, max_bytes).await?;
    serde_json::from_slice(&bytes).map_err(|e| RoostError::Http(format!("invalid JSON: {}", e)))
}

/// Read and deserialize a typed request body
pub async fn parse_body<T, B>(req: Request<B>, max_bytes: usize) -> Result<T, RoostError>
where
    T: DeserializeOwned,
    B: hyper::body::Body,
    B::Error: std::fmt::Display,
{
    let bytes = read_body(req, max_bytes).await?;
    serde_json::from_slice(&bytes).map_err(|e| RoostError::Http(format!("invalid JSON: {}", e)))
}

/// Extract one query parameter, percent-decoded
pub fn query_param(uri: &Uri, name: &str) -> Option<String> {
    uri.query()?.split('&').find_map(|pair| {
        let raw = pair.strip_prefix(name)?.strip_prefix('=')?;
        let raw = raw.replace('+', " ");
        let decoded = urlencoding::decode(&raw).unwrap_or_default();
        Some(decoded.into_owned())
    })
}
