//! Broadcast hub for content-change notifications

use dashmap::DashMap;
use serde::Serialize;
use serde_json::Value as JsonValue;
use tokio::sync::broadcast;
use tracing::debug;
use uuid::Uuid;

/// One content-change frame, serialized as
/// `{"type": "data-update", "key": ..., "data": ...}`
#[derive(Debug, Clone, Serialize)]
pub struct DataUpdate {
    #[serde(rename = "type")]
    pub kind: &'static str,
    /// Dotted section key, at most two segments for server-emitted frames
    pub key: String,
    pub data: JsonValue,
    pub timestamp: String,
}

impl DataUpdate {
    pub fn new(key: impl Into<String>, data: JsonValue) -> Self {
        Self {
            kind: "data-update",
            key: key.into(),
            data,
            timestamp: crate::types::now_iso(),
        }
    }
}

/// Hub that fans content changes out to all connected subscribers
pub struct FanoutHub {
    sender: broadcast::Sender<DataUpdate>,
    /// Live connections, keyed by connection id
    connections: DashMap<Uuid, String>,
}

impl FanoutHub {
    pub fn new(buffer: usize) -> Self {
        let (sender, _) = broadcast::channel(buffer);
        Self {
            sender,
            connections: DashMap::new(),
        }
    }

    /// Register a new subscriber; new subscribers see only changes made
    /// after this call, never a backlog
    pub fn subscribe(&self) -> broadcast::Receiver<DataUpdate> {
        self.sender.subscribe()
    }

    /// Broadcast a mutated section to every subscriber.
    ///
    /// Send errors mean nobody is listening and are ignored; a failed
    /// delivery never fails the mutator that triggered it.
    pub fn notify(&self, key: &str, data: JsonValue) {
        debug!("fanout: {} ({} connections)", key, self.connections.len());
        let _ = self.sender.send(DataUpdate::new(key, data));
    }

    /// Track a live connection for the health endpoint
    pub fn register_connection(&self, peer: String) -> Uuid {
        let id = Uuid::new_v4();
        self.connections.insert(id, peer);
        id
    }

    pub fn unregister_connection(&self, id: Uuid) {
        self.connections.remove(&id);
    }

    pub fn connection_count(&self) -> usize {
        self.connections.len()
    }
}
