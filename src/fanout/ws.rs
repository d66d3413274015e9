//! WebSocket subscription endpoint
//!
//! ## Protocol
//!
//! Connect: `ws://host:5000/ws`
//!
//! Server → client frames are JSON text:
//!
//! ```json
//! { "type": "data-update", "key": "home.hero", "data": { "title": "..." } }
//! ```
//!
//! Client → server: a text frame `ping` is answered with `pong`; every
//! other frame is ignored. There is no replay on connect — clients fetch
//! `GET /api/data` first, then subscribe. A subscriber that lags past the
//! channel buffer skips the missed frames and continues.

use bytes::Bytes;
use futures_util::{SinkExt, StreamExt};
use http_body_util::Full;
use hyper::body::Incoming;
use hyper::{Request, Response, StatusCode};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::sync::broadcast;
use tokio_tungstenite::tungstenite::Message as WsMessage;
use tracing::{debug, error, info, warn};

use crate::fanout::FanoutHub;

/// WebSocket type after upgrade
type HyperWebSocket =
    hyper_tungstenite::WebSocketStream<hyper_util::rt::TokioIo<hyper::upgrade::Upgraded>>;

/// Handle a WebSocket upgrade on `/ws`
///
/// The caller has already checked `hyper_tungstenite::is_upgrade_request`.
pub async fn handle_ws_upgrade(
    hub: Arc<FanoutHub>,
    addr: SocketAddr,
    req: Request<Incoming>,
) -> Response<Full<Bytes>> {
    let (response, websocket) = match hyper_tungstenite::upgrade(req, None) {
        Ok((resp, ws)) => (resp, ws),
        Err(e) => {
            error!("WebSocket upgrade failed: {}", e);
            return Response::builder()
                .status(StatusCode::INTERNAL_SERVER_ERROR)
                .body(Full::new(Bytes::from("WebSocket upgrade failed")))
                .unwrap();
        }
    };

    tokio::spawn(async move {
        match websocket.await {
            Ok(ws) => {
                if let Err(e) = handle_connection(hub, addr, ws).await {
                    warn!("WebSocket error from {}: {}", addr, e);
                }
            }
            Err(e) => {
                error!("WebSocket connection from {} failed: {}", addr, e);
            }
        }
    });

    let (parts, _body) = response.into_parts();
    Response::from_parts(parts, Full::new(Bytes::new()))
}

/// Per-connection loop: forward fanout frames, answer pings
async fn handle_connection(
    hub: Arc<FanoutHub>,
    addr: SocketAddr,
    ws: HyperWebSocket,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let (mut sender, mut receiver) = ws.split();
    let connection_id = hub.register_connection(addr.to_string());
    let mut rx = hub.subscribe();

    info!("Subscriber connected from {}", addr);

    loop {
        tokio::select! {
            update = rx.recv() => {
                match update {
                    Ok(update) => {
                        let json = serde_json::to_string(&update)?;
                        if sender.send(WsMessage::Text(json)).await.is_err() {
                            break;
                        }
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        // Lag tolerated; catch-up happens via full reload
                        warn!("Subscriber {} lagged, skipped {} frames", addr, skipped);
                        continue;
                    }
                }
            }

            msg = receiver.next() => {
                match msg {
                    Some(Ok(WsMessage::Text(text))) => {
                        if text.trim() == "ping" {
                            let _ = sender.send(WsMessage::Text("pong".to_string())).await;
                        } else {
                            debug!("Ignoring client frame from {}: {}", addr, text);
                        }
                    }
                    Some(Ok(WsMessage::Ping(data))) => {
                        let _ = sender.send(WsMessage::Pong(data)).await;
                    }
                    Some(Ok(WsMessage::Close(_))) | None => break,
                    Some(Err(e)) => {
                        warn!("WebSocket error from {}: {}", addr, e);
                        break;
                    }
                    _ => {}
                }
            }
        }
    }

    hub.unregister_connection(connection_id);
    info!("Subscriber from {} disconnected", addr);
    Ok(())
}
