//! Fanout channel: push content changes to every open browser tab
//!
//! One `tokio::sync::broadcast` channel per process; every WebSocket
//! connection holds a receiver. Fire-and-forget: no replay, no
//! acknowledgement, no delivery guarantee beyond in-order delivery on a
//! single connection.

pub mod hub;
pub mod ws;

pub use hub::{DataUpdate, FanoutHub};
pub use ws::handle_ws_upgrade;
